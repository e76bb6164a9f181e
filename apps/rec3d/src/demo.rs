use clap::ValueEnum;
use rec3d_model::{CameraSpec, PrimitiveSpec, SceneFile};

/// Built-in scenes, available without a scene file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Demo {
    /// Two cube pillars topped with spheres, a panel and a lintel.
    Arch,
    /// Two tilted panels over a floor strip, with a cube in the middle.
    Ramp,
}

impl Demo {
    pub fn scene(self) -> SceneFile {
        match self {
            Demo::Arch => arch(),
            Demo::Ramp => ramp(),
        }
    }
}

fn arch() -> SceneFile {
    let offset = 4.0;
    SceneFile {
        version: 1,
        camera: Some(CameraSpec {
            position: Some([-6.0, 2.0, 0.0]),
            facing: Some([1.0, 0.0, 0.0]),
            fov: Some(90.0),
            height: Some(20),
        }),
        primitives: vec![
            panel([10.0, 3.0, 0.0], [1.0, 0.0, 0.0], 1.0, 3.0),
            panel([10.0, 6.0, 0.0], [0.0, 1.0, 0.0], 4.0, 1.0),
            cube([10.0, 1.5, -offset], [1.0, 0.0, 0.0], 3.0),
            cube([10.0, 1.5, offset], [1.0, 0.0, 0.0], 3.0),
            sphere([9.0, 4.0, -offset], 1.0),
            sphere([9.0, 4.0, offset], 1.0),
        ],
    }
}

fn ramp() -> SceneFile {
    SceneFile {
        version: 1,
        camera: Some(CameraSpec {
            position: Some([-5.0, 0.0, 0.0]),
            facing: Some([1.0, 0.0, 0.0]),
            fov: Some(90.0),
            height: Some(20),
        }),
        primitives: vec![
            panel([0.0, 0.3, -2.0], [0.0, 1.0, -1.0], 1.0, 2.0),
            panel([0.0, 0.3, 2.0], [0.0, 1.0, 1.0], 1.0, 2.0),
            // nearly horizontal floor strip
            panel([0.0, -1.0, 0.0], [1.0, 1_000_000.0, 0.0], 2.5, 1.0),
            cube([0.0, 0.0, 0.0], [1.0, 0.0, 1.0], 1.0),
        ],
    }
}

fn panel(point: [f64; 3], normal: [f64; 3], half_width: f64, half_height: f64) -> PrimitiveSpec {
    PrimitiveSpec::BoundedPlane {
        point,
        normal,
        half_width,
        half_height,
    }
}

fn cube(center: [f64; 3], orientation: [f64; 3], edge: f64) -> PrimitiveSpec {
    PrimitiveSpec::Cube {
        center,
        orientation,
        edge,
    }
}

fn sphere(center: [f64; 3], radius: f64) -> PrimitiveSpec {
    PrimitiveSpec::Sphere {
        center,
        orientation: [1.0, 0.0, 0.0],
        radius,
    }
}
