use crate::math::{Point, Ray, Vector, VectorSpace};

/// Below this a denominator or squared length counts as zero.
pub const EPSILON: f64 = 1e-9;

/// Infinite plane through `point`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub point: Point,
    pub normal: Vector,
}

impl Plane {
    pub fn new(point: Point, normal: Vector) -> Self {
        Self { point, normal }
    }

    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let denom = self.normal.dot(ray.direction);
        if denom.abs() < EPSILON {
            return None;
        }

        let t = self.normal.dot(Vector::between(ray.origin, self.point)) / denom;
        (t >= 0.0).then_some(t)
    }
}

/// Rectangle on a plane, `half_width` along the first local axis and
/// `half_height` along the second.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundedPlane {
    plane: Plane,
    u_axis: Vector,
    v_axis: Vector,
    half_width: f64,
    half_height: f64,
}

impl BoundedPlane {
    pub fn new(
        point: Point,
        normal: Vector,
        half_width: f64,
        half_height: f64,
        space: &VectorSpace,
    ) -> Self {
        let (u_axis, v_axis) = plane_axes(normal, space);
        Self {
            plane: Plane::new(point, normal),
            u_axis,
            v_axis,
            half_width,
            half_height,
        }
    }

    pub fn plane(&self) -> &Plane {
        &self.plane
    }

    pub fn axes(&self) -> (Vector, Vector) {
        (self.u_axis, self.v_axis)
    }

    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let t = self.plane.intersect(ray)?;
        let offset = Vector::between(self.plane.point, ray.at(t));
        let u = offset.dot(self.u_axis);
        let v = offset.dot(self.v_axis);

        (u.abs() <= self.half_width && v.abs() <= self.half_height).then_some(t)
    }
}

/// Two in-plane axes orthogonal to `normal`. The first is horizontal
/// (`normal × e_y`) unless the plane itself is horizontal, then `normal × e_x`.
fn plane_axes(normal: Vector, space: &VectorSpace) -> (Vector, Vector) {
    let [e_x, e_y, _] = *space.basis();
    let normal = normal.normalize(space);

    let mut u = normal.cross(e_y, space);
    if u.dot(u) < EPSILON {
        u = normal.cross(e_x, space);
    }
    let u = u.normalize(space);
    let v = u.cross(normal, space).normalize(space);
    (u, v)
}

/// Cube aligned with the basis of the space it was built in. The orientation
/// is carried along but does not take part in the slab test.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Cube {
    pub center: Point,
    pub orientation: Vector,
    pub edge: f64,
    axes: [Vector; 3],
}

impl Cube {
    pub fn new(center: Point, orientation: Vector, edge: f64, space: &VectorSpace) -> Self {
        let basis = *space.basis();
        let axes = basis.map(|axis| axis.normalize(space));
        Self {
            center,
            orientation,
            edge,
            axes,
        }
    }

    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let half = self.edge * 0.5;
        let offset = Vector::between(self.center, ray.origin);
        let mut t_near = f64::NEG_INFINITY;
        let mut t_far = f64::INFINITY;

        for axis in self.axes {
            let origin = offset.dot(axis);
            let direction = ray.direction.dot(axis);
            if !clip_slab(-half, half, origin, direction, &mut t_near, &mut t_far) {
                return None;
            }
        }

        if t_far < 0.0 {
            return None;
        }
        Some(if t_near >= 0.0 { t_near } else { t_far })
    }
}

fn clip_slab(
    min: f64,
    max: f64,
    origin: f64,
    direction: f64,
    t_near: &mut f64,
    t_far: &mut f64,
) -> bool {
    if direction.abs() < EPSILON {
        return origin >= min && origin <= max;
    }

    let inv_d = 1.0 / direction;
    let mut t0 = (min - origin) * inv_d;
    let mut t1 = (max - origin) * inv_d;
    if inv_d < 0.0 {
        std::mem::swap(&mut t0, &mut t1);
    }

    *t_near = t0.max(*t_near);
    *t_far = t1.min(*t_far);
    *t_far >= *t_near
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sphere {
    pub center: Point,
    /// Kept so every primitive has the same constructor shape; unused.
    pub orientation: Vector,
    pub radius: f64,
}

impl Sphere {
    pub fn new(center: Point, orientation: Vector, radius: f64) -> Self {
        Self {
            center,
            orientation,
            radius,
        }
    }

    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        let oc = Vector::between(self.center, ray.origin);
        let a = ray.direction.dot(ray.direction);
        if a < EPSILON {
            return None;
        }
        let half_b = oc.dot(ray.direction);
        let c = oc.dot(oc) - self.radius * self.radius;
        let discriminant = half_b * half_b - a * c;
        if discriminant < 0.0 {
            return None;
        }
        let sqrt_d = discriminant.sqrt();

        let near = (-half_b - sqrt_d) / a;
        let far = (-half_b + sqrt_d) / a;
        if near >= 0.0 {
            Some(near)
        } else if far >= 0.0 {
            Some(far)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Primitive {
    Plane(Plane),
    BoundedPlane(BoundedPlane),
    Cube(Cube),
    Sphere(Sphere),
}

impl Primitive {
    /// Distance along `ray` to the first surface point at or ahead of the
    /// origin, or `None` when the ray misses.
    pub fn intersect(&self, ray: &Ray) -> Option<f64> {
        match self {
            Primitive::Plane(plane) => plane.intersect(ray),
            Primitive::BoundedPlane(plane) => plane.intersect(ray),
            Primitive::Cube(cube) => cube.intersect(ray),
            Primitive::Sphere(sphere) => sphere.intersect(ray),
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Primitive::Plane(_) => "plane",
            Primitive::BoundedPlane(_) => "bounded_plane",
            Primitive::Cube(_) => "cube",
            Primitive::Sphere(_) => "sphere",
        }
    }
}

impl From<Plane> for Primitive {
    fn from(value: Plane) -> Self {
        Primitive::Plane(value)
    }
}

impl From<BoundedPlane> for Primitive {
    fn from(value: BoundedPlane) -> Self {
        Primitive::BoundedPlane(value)
    }
}

impl From<Cube> for Primitive {
    fn from(value: Cube) -> Self {
        Primitive::Cube(value)
    }
}

impl From<Sphere> for Primitive {
    fn from(value: Sphere) -> Self {
        Primitive::Sphere(value)
    }
}
