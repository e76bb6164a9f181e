use rec3d_render::Pose;

pub const LEGEND: &str = "WASD move  arrows look  q quit";

/// One-line status shown under the frame.
pub fn status_line(pose: &Pose, frames: u64, width: usize) -> String {
    let p = pose.position;
    let f = pose.facing.point();
    let status = format!(
        "pos ({:.2}, {:.2}, {:.2})  facing ({:.2}, {:.2}, {:.2})  frame {frames}",
        p.x, p.y, p.z, f.x, f.y, f.z
    );

    if status.len() + LEGEND.len() + 2 <= width {
        let gap = width - status.len() - LEGEND.len();
        format!("{status}{}{LEGEND}", " ".repeat(gap))
    } else {
        fit(&status, width)
    }
}

pub fn center_line(text: &str, width: usize) -> String {
    if text.len() >= width {
        return text.to_string();
    }
    let pad = (width - text.len()) / 2;
    format!("{}{}", " ".repeat(pad), text)
}

fn fit(text: &str, width: usize) -> String {
    text.chars().take(width).collect()
}
