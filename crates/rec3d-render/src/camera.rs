use crate::error::GeometryError;
use crate::geometry::EPSILON;
use crate::math::{rotation_degrees, rotation_radians, Point, Ray, Vector, VectorSpace};

/// Terminal cells are about twice as tall as they are wide.
pub const CELL_ASPECT: usize = 2;

/// Elevation limit for [`Camera::rotate`], in real degrees.
pub const PITCH_LIMIT_DEGREES: f64 = 89.0;

/// Raw vertical axis that walking is projected against.
const UP: Vector = Vector::new(0.0, 1.0, 0.0);

/// Snapshot of where a camera stands and looks.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pose {
    pub position: Point,
    pub facing: Vector,
}

/// Pinhole camera that sweeps rays across a `width` x `height` cell grid.
///
/// Angles (field of view, per-cell offsets, `rotate` deltas) are handed to
/// [`Vector::rotate`], so they share its half-angle conversion.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Point,
    facing: Vector,
    fov: f64,
    height: usize,
    width: usize,
    space: VectorSpace,
}

impl Camera {
    pub fn new(
        position: Point,
        facing: Vector,
        fov: f64,
        height: usize,
        space: VectorSpace,
    ) -> Result<Self, GeometryError> {
        if height == 0 {
            return Err(GeometryError::InvalidCamera("height must be at least 1".to_string()));
        }
        if !(fov.is_finite() && fov > 0.0) {
            return Err(GeometryError::InvalidCamera(format!(
                "field of view must be positive, got {fov}"
            )));
        }
        let width = height.checked_mul(CELL_ASPECT).ok_or_else(|| {
            GeometryError::InvalidCamera(format!("height {height} is too large"))
        })?;
        if facing.dot(facing) < EPSILON {
            return Err(GeometryError::InvalidCamera(
                "facing must not be the zero vector".to_string(),
            ));
        }

        Ok(Self {
            position,
            facing,
            fov,
            height,
            width,
            space,
        })
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn facing(&self) -> Vector {
        self.facing
    }

    pub fn pose(&self) -> Pose {
        Pose {
            position: self.position,
            facing: self.facing,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn fov(&self) -> f64 {
        self.fov
    }

    /// Vertical field of view implied by the cell grid's on-screen aspect.
    pub fn vertical_fov(&self) -> f64 {
        self.fov * (self.height * CELL_ASPECT) as f64 / self.width as f64
    }

    /// Horizontal angle covered by one cell.
    pub fn step(&self) -> f64 {
        self.fov / self.width as f64
    }

    pub fn space(&self) -> &VectorSpace {
        &self.space
    }

    /// Ray through cell `(col, row)`; row 0 is the top of the screen.
    ///
    /// The direction is normalized with [`Vector::normalize`], which measures
    /// length from the space origin. With a non-zero `init_point` the
    /// directions are not Euclidean unit vectors, so hit distances are in
    /// units of that length. Walking steps and cube axes scale the same way.
    pub fn ray(&self, col: usize, row: usize) -> Ray {
        let yaw = (col as f64 - self.width as f64 / 2.0) * self.step();
        let pitch =
            (self.height as f64 / 2.0 - row as f64) * (self.vertical_fov() / self.height as f64);

        let mut direction = self.facing;
        tilt(&mut direction, pitch);
        turn(&mut direction, yaw);
        Ray::new(self.position, direction.normalize(&self.space))
    }

    pub fn move_forward(&mut self, step: f64) {
        self.walk(step, 0.0);
    }

    pub fn move_backward(&mut self, step: f64) {
        self.walk(-step, 0.0);
    }

    pub fn move_left(&mut self, step: f64) {
        self.walk(0.0, -step);
    }

    pub fn move_right(&mut self, step: f64) {
        self.walk(0.0, step);
    }

    /// Turns right by `yaw_delta` and up by `pitch_delta`. Pitch stops at
    /// [`PITCH_LIMIT_DEGREES`] of elevation.
    pub fn rotate(&mut self, yaw_delta: f64, pitch_delta: f64) {
        if pitch_delta != 0.0 {
            let current = elevation(self.facing);
            let limit = PITCH_LIMIT_DEGREES.to_radians();
            let wanted = current + rotation_radians(pitch_delta);
            let target = wanted.clamp(current.min(-limit), current.max(limit));
            if target != wanted {
                tracing::trace!(wanted = wanted.to_degrees(), "pitch clamped");
            }
            tilt(&mut self.facing, rotation_degrees(target - current));
        }
        if yaw_delta != 0.0 {
            turn(&mut self.facing, yaw_delta);
        }
    }

    fn walk(&mut self, forward: f64, right: f64) {
        let flat = self.facing - UP * self.facing.dot(UP);
        if flat.dot(flat) < EPSILON {
            tracing::trace!("facing is vertical, move skipped");
            return;
        }
        let heading = flat.normalize(&self.space);
        let side = heading.cross(UP, &self.space);
        let offset = heading * forward + side * right;
        self.position = self.position + offset.point();
    }
}

/// Elevation of `v` above the horizontal plane, in radians.
fn elevation(v: Vector) -> f64 {
    let p = v.point();
    p.y.atan2((p.x * p.x + p.z * p.z).sqrt())
}

/// Rotates `v` upwards in its own vertical plane: swing the heading onto +X,
/// tilt in the XY plane, swing back.
fn tilt(v: &mut Vector, degrees: f64) {
    if degrees == 0.0 {
        return;
    }
    let p = v.point();
    let heading = rotation_degrees(p.z.atan2(p.x));
    v.rotate(0.0, heading, 0.0);
    v.rotate(0.0, 0.0, degrees);
    v.rotate(0.0, -heading, 0.0);
}

/// Rotates `v` to the right about the vertical axis.
fn turn(v: &mut Vector, degrees: f64) {
    v.rotate(0.0, -degrees, 0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn camera() -> Camera {
        Camera::new(
            Point::new(0.0, 0.0, 0.0),
            Vector::new(1.0, 0.0, 0.0),
            90.0,
            20,
            VectorSpace::standard(),
        )
        .unwrap()
    }

    #[test]
    fn width_is_twice_height() {
        let camera = camera();
        assert_eq!(camera.width(), 40);
        assert_eq!(camera.height(), 20);
        assert!((camera.step() - 90.0 / 40.0).abs() < EPS);
        assert!((camera.vertical_fov() - 90.0).abs() < EPS);
    }

    #[test]
    fn rejects_degenerate_parameters() {
        let space = VectorSpace::standard();
        let facing = Vector::new(1.0, 0.0, 0.0);
        assert!(Camera::new(Point::origin(), facing, 90.0, 0, space).is_err());
        assert!(Camera::new(Point::origin(), facing, 0.0, 10, space).is_err());
        assert!(Camera::new(Point::origin(), facing, f64::NAN, 10, space).is_err());
        assert!(Camera::new(Point::origin(), Vector::default(), 90.0, 10, space).is_err());
    }

    #[test]
    fn oversized_height_is_rejected() {
        let err = Camera::new(
            Point::origin(),
            Vector::new(1.0, 0.0, 0.0),
            90.0,
            usize::MAX,
            VectorSpace::standard(),
        )
        .unwrap_err();
        assert!(matches!(err, GeometryError::InvalidCamera(_)));
    }

    #[test]
    fn center_cell_looks_along_facing() {
        let camera = camera();
        let ray = camera.ray(20, 10);
        assert_eq!(ray.origin, camera.position());
        let d = ray.direction.point();
        assert!((d.x - 1.0).abs() < EPS && d.y.abs() < EPS && d.z.abs() < EPS);
    }

    #[test]
    fn left_edge_uses_half_fov_with_half_angle_rotation() {
        let camera = camera();
        // col 0 is 45 nominal degrees left, which rotate applies as 22.5
        let d = camera.ray(0, 10).direction.point();
        let expected = 22.5f64.to_radians();
        assert!((d.x - expected.cos()).abs() < EPS);
        assert!((d.z + expected.sin()).abs() < EPS);
        assert!(d.y.abs() < EPS);
    }

    #[test]
    fn top_row_looks_up_and_right_columns_look_right() {
        let camera = camera();
        assert!(camera.ray(20, 0).direction.point().y > 0.0);
        assert!(camera.ray(20, 19).direction.point().y < 0.0);
        assert!(camera.ray(39, 10).direction.point().z > 0.0);
    }

    #[test]
    fn ray_directions_are_unit_length() {
        let camera = camera();
        let space = VectorSpace::standard();
        for (col, row) in [(0, 0), (39, 19), (7, 13)] {
            let len = camera.ray(col, row).direction.length(&space);
            assert!((len - 1.0).abs() < EPS);
        }
    }

    #[test]
    fn movement_follows_horizontal_heading() {
        let mut camera = Camera::new(
            Point::new(0.0, 2.0, 0.0),
            Vector::new(1.0, 1.0, 0.0),
            90.0,
            10,
            VectorSpace::standard(),
        )
        .unwrap();

        camera.move_forward(2.0);
        assert_eq!(camera.position(), Point::new(2.0, 2.0, 0.0));
        camera.move_backward(1.0);
        assert_eq!(camera.position(), Point::new(1.0, 2.0, 0.0));
        camera.move_right(3.0);
        assert_eq!(camera.position(), Point::new(1.0, 2.0, 3.0));
        camera.move_left(3.0);
        assert_eq!(camera.position(), Point::new(1.0, 2.0, 0.0));
    }

    #[test]
    fn movement_is_skipped_when_looking_straight_up() {
        let mut camera = Camera::new(
            Point::origin(),
            Vector::new(0.0, 1.0, 0.0),
            90.0,
            10,
            VectorSpace::standard(),
        )
        .unwrap();
        camera.move_forward(1.0);
        assert_eq!(camera.position(), Point::origin());
    }

    #[test]
    fn rotate_yaw_turns_right() {
        let mut camera = camera();
        camera.rotate(180.0, 0.0);
        let d = camera.facing().point();
        assert!(d.x.abs() < EPS && (d.z - 1.0).abs() < EPS);
    }

    #[test]
    fn rotate_pitch_tilts_in_vertical_plane() {
        let mut camera = Camera::new(
            Point::origin(),
            Vector::new(0.0, 0.0, 1.0),
            90.0,
            10,
            VectorSpace::standard(),
        )
        .unwrap();
        // nominal 60 applies 30 degrees
        camera.rotate(0.0, 60.0);
        let d = camera.facing().point();
        assert!(d.x.abs() < EPS);
        assert!((d.y - 30f64.to_radians().sin()).abs() < EPS);
        assert!((d.z - 30f64.to_radians().cos()).abs() < EPS);
    }

    #[test]
    fn pitch_is_clamped_before_vertical() {
        let mut camera = camera();
        for _ in 0..50 {
            camera.rotate(0.0, 20.0);
        }
        let up = elevation(camera.facing()).to_degrees();
        assert!((up - PITCH_LIMIT_DEGREES).abs() < 1e-6, "{up}");
        assert!(camera.facing().point().x > 0.0);

        for _ in 0..100 {
            camera.rotate(0.0, -20.0);
        }
        let down = elevation(camera.facing()).to_degrees();
        assert!((down + PITCH_LIMIT_DEGREES).abs() < 1e-6, "{down}");
    }
}
