use crate::error::GeometryError;
use rec3d_model::SpaceSpec;
use std::f64::consts::PI;
use std::fmt;
use std::ops::{Add, Mul, Neg, Sub};

/// Degree-to-radian divisor used by [`Vector::rotate`]. Angles are converted
/// as `π·deg/360`, so a nominal 90° turn rotates by 45°. Scenes and camera
/// controls are tuned against this value.
pub const ROTATION_DIVISOR: f64 = 360.0;

/// Converts a [`Vector::rotate`] angle into the radians it actually applies.
pub fn rotation_radians(degrees: f64) -> f64 {
    PI * degrees / ROTATION_DIVISOR
}

/// Inverse of [`rotation_radians`].
pub fn rotation_degrees(radians: f64) -> f64 {
    radians * ROTATION_DIVISOR / PI
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }

    pub const fn origin() -> Self {
        Self::new(0.0, 0.0, 0.0)
    }

    /// Builds a point from exactly three finite coordinates.
    pub fn from_slice(coords: &[f64]) -> Result<Self, GeometryError> {
        let [x, y, z] = <[f64; 3]>::try_from(coords).map_err(|_| GeometryError::Arity {
            expected: 3,
            found: coords.len(),
        })?;
        if !(x.is_finite() && y.is_finite() && z.is_finite()) {
            return Err(GeometryError::NonFinite);
        }
        Ok(Self::new(x, y, z))
    }

    pub fn coords(self) -> [f64; 3] {
        [self.x, self.y, self.z]
    }

    pub fn distance(self, other: Self) -> f64 {
        let dx = self.x - other.x;
        let dy = self.y - other.y;
        let dz = self.z - other.z;
        (dx * dx + dy * dy + dz * dz).sqrt()
    }

    pub fn checked_div(self, rhs: f64) -> Result<Self, GeometryError> {
        if rhs == 0.0 {
            return Err(GeometryError::DivisionByZero);
        }
        Ok(Self::new(self.x / rhs, self.y / rhs, self.z / rhs))
    }
}

impl From<[f64; 3]> for Point {
    fn from([x, y, z]: [f64; 3]) -> Self {
        Self::new(x, y, z)
    }
}

impl fmt::Display for Point {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Point({:.4}, {:.4}, {:.4})", self.x, self.y, self.z)
    }
}

impl Add for Point {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Point {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f64> for Point {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Point> for f64 {
    type Output = Point;

    fn mul(self, rhs: Point) -> Self::Output {
        rhs * self
    }
}

impl Neg for Point {
    type Output = Self;

    fn neg(self) -> Self::Output {
        self * -1.0
    }
}

/// Radius vector: anchored at the ambient origin, only the free endpoint is stored.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector {
    point: Point,
}

impl Vector {
    pub const fn new(x: f64, y: f64, z: f64) -> Self {
        Self::from_point(Point::new(x, y, z))
    }

    pub const fn from_point(point: Point) -> Self {
        Self { point }
    }

    /// Vector with the same raw coordinates as `to - from`.
    pub fn between(from: Point, to: Point) -> Self {
        Self::from_point(to - from)
    }

    pub fn point(self) -> Point {
        self.point
    }

    pub fn dot(self, other: Self) -> f64 {
        self.point.x * other.point.x + self.point.y * other.point.y + self.point.z * other.point.z
    }

    /// Cross product expressed in the basis of `space`: each component of the
    /// coordinate cross product scales the matching basis vector.
    pub fn cross(self, other: Self, space: &VectorSpace) -> Self {
        let Point { x: x1, y: y1, z: z1 } = self.point;
        let Point { x: x2, y: y2, z: z2 } = other.point;
        let [e_x, e_y, e_z] = space.basis;

        let x = e_x * (y1 * z2 - y2 * z1);
        let y = e_y * -(x1 * z2 - x2 * z1);
        let z = e_z * (y2 * x1 - y1 * x2);

        x + y + z
    }

    /// Distance from the ambient origin to the endpoint.
    pub fn length(self, space: &VectorSpace) -> f64 {
        space.origin.distance(self.point)
    }

    pub fn normalize(self, space: &VectorSpace) -> Self {
        let len = self.length(space);
        if len == 0.0 {
            self
        } else {
            Self::new(self.point.x / len, self.point.y / len, self.point.z / len)
        }
    }

    pub fn checked_div(self, rhs: f64) -> Result<Self, GeometryError> {
        self.point.checked_div(rhs).map(Self::from_point)
    }

    /// Euler rotation in place: YZ plane by `x_angle` (roll), then XZ by
    /// `y_angle` (pitch), then XY by `z_angle` (yaw). Each stage consumes the
    /// coordinates left by the previous one. Angles go through
    /// [`rotation_radians`].
    pub fn rotate(&mut self, x_angle: f64, y_angle: f64, z_angle: f64) {
        let x_angle = rotation_radians(x_angle);
        let y_angle = rotation_radians(y_angle);
        let z_angle = rotation_radians(z_angle);
        let p = &mut self.point;

        let (y_old, z_old) = (p.y, p.z);
        p.y = y_old * x_angle.cos() - z_old * x_angle.sin();
        p.z = y_old * x_angle.sin() + z_old * x_angle.cos();

        let (x_old, z_old) = (p.x, p.z);
        p.x = x_old * y_angle.cos() + z_old * y_angle.sin();
        p.z = x_old * -y_angle.sin() + z_old * y_angle.cos();

        let (x_old, y_old) = (p.x, p.y);
        p.x = x_old * z_angle.cos() - y_old * z_angle.sin();
        p.y = x_old * z_angle.sin() + y_old * z_angle.cos();
    }
}

impl From<Point> for Vector {
    fn from(point: Point) -> Self {
        Self::from_point(point)
    }
}

impl From<[f64; 3]> for Vector {
    fn from(coords: [f64; 3]) -> Self {
        Self::from_point(coords.into())
    }
}

impl fmt::Display for Vector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let Point { x, y, z } = self.point;
        write!(f, "Vector({x:.4}, {y:.4}, {z:.4})")
    }
}

impl Add for Vector {
    type Output = Self;

    fn add(self, rhs: Self) -> Self::Output {
        Self::from_point(self.point + rhs.point)
    }
}

impl Sub for Vector {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self::Output {
        Self::from_point(self.point - rhs.point)
    }
}

impl Mul<f64> for Vector {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self::Output {
        Self::from_point(self.point * rhs)
    }
}

impl Mul<Vector> for f64 {
    type Output = Vector;

    fn mul(self, rhs: Vector) -> Self::Output {
        rhs * self
    }
}

impl Neg for Vector {
    type Output = Self;

    fn neg(self) -> Self::Output {
        Self::from_point(-self.point)
    }
}

/// The ambient frame every length and cross product is measured against.
/// Vectors keep their raw coordinates when a different space is used.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VectorSpace {
    origin: Point,
    basis: [Vector; 3],
}

impl VectorSpace {
    pub const fn new(origin: Point, basis: [Vector; 3]) -> Self {
        Self { origin, basis }
    }

    pub const fn standard() -> Self {
        Self::new(
            Point::origin(),
            [
                Vector::new(1.0, 0.0, 0.0),
                Vector::new(0.0, 1.0, 0.0),
                Vector::new(0.0, 0.0, 1.0),
            ],
        )
    }

    pub fn from_vectors(origin: Point, basis: &[Vector]) -> Result<Self, GeometryError> {
        let basis = <[Vector; 3]>::try_from(basis)
            .map_err(|_| GeometryError::BasisCount(basis.len()))?;
        Ok(Self::new(origin, basis))
    }

    pub fn origin(&self) -> Point {
        self.origin
    }

    pub fn basis(&self) -> &[Vector; 3] {
        &self.basis
    }
}

impl Default for VectorSpace {
    fn default() -> Self {
        Self::standard()
    }
}

impl TryFrom<&SpaceSpec> for VectorSpace {
    type Error = GeometryError;

    fn try_from(spec: &SpaceSpec) -> Result<Self, Self::Error> {
        let origin = Point::from_slice(&spec.init_point)?;
        let basis = spec
            .basis
            .iter()
            .map(|coords| Point::from_slice(coords).map(Vector::from_point))
            .collect::<Result<Vec<_>, _>>()?;
        Self::from_vectors(origin, &basis)
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Point,
    pub direction: Vector,
}

impl Ray {
    pub fn new(origin: Point, direction: Vector) -> Self {
        Self { origin, direction }
    }

    pub fn at(&self, t: f64) -> Point {
        self.origin + self.direction.point() * t
    }
}

impl fmt::Display for Ray {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Ray({}, {})", self.origin, self.direction)
    }
}
