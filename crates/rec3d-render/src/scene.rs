use crate::error::GeometryError;
use crate::geometry::{BoundedPlane, Cube, Plane, Primitive, Sphere};
use crate::math::{Point, Ray, Vector, VectorSpace};
use rec3d_model::{PrimitiveSpec, SceneFile};

/// The nearest primitive along a ray: its position in the map and the distance.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hit {
    pub index: usize,
    pub distance: f64,
}

/// Ordered collection of primitives, all built in the same ambient space.
#[derive(Debug, Clone, PartialEq)]
pub struct Map {
    space: VectorSpace,
    primitives: Vec<Primitive>,
}

impl Map {
    pub fn new(space: VectorSpace) -> Self {
        Self {
            space,
            primitives: Vec::new(),
        }
    }

    pub fn space(&self) -> &VectorSpace {
        &self.space
    }

    pub fn push(&mut self, primitive: impl Into<Primitive>) {
        self.primitives.push(primitive.into());
    }

    pub fn len(&self) -> usize {
        self.primitives.len()
    }

    pub fn is_empty(&self) -> bool {
        self.primitives.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Primitive> {
        self.primitives.get(index)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Primitive> {
        self.primitives.iter()
    }

    /// Nearest hit without materialising the per-primitive distances.
    pub fn nearest(&self, ray: &Ray) -> Option<Hit> {
        nearest_hit(self.primitives.iter().map(|primitive| primitive.intersect(ray)))
    }
}

impl Extend<Primitive> for Map {
    fn extend<T: IntoIterator<Item = Primitive>>(&mut self, iter: T) {
        self.primitives.extend(iter);
    }
}

impl<'a> IntoIterator for &'a Map {
    type Item = &'a Primitive;
    type IntoIter = std::slice::Iter<'a, Primitive>;

    fn into_iter(self) -> Self::IntoIter {
        self.primitives.iter()
    }
}

impl Ray {
    /// One entry per primitive, in map order.
    pub fn intersect(&self, map: &Map) -> Vec<Option<f64>> {
        map.iter().map(|primitive| primitive.intersect(self)).collect()
    }
}

/// Smallest reported distance. On exact ties the earlier entry wins.
pub fn nearest_hit(distances: impl IntoIterator<Item = Option<f64>>) -> Option<Hit> {
    let mut closest: Option<Hit> = None;
    for (index, distance) in distances.into_iter().enumerate() {
        let Some(distance) = distance else { continue };
        if closest.map_or(true, |hit| distance < hit.distance) {
            closest = Some(Hit { index, distance });
        }
    }
    closest
}

/// Builds a map from a scene description, keeping file order.
pub fn build_map(scene: &SceneFile, space: VectorSpace) -> Result<Map, GeometryError> {
    let mut map = Map::new(space);

    for (index, spec) in scene.primitives.iter().enumerate() {
        let primitive: Primitive = match *spec {
            PrimitiveSpec::Plane { point, normal } => {
                check_direction(index, "normal", normal)?;
                Plane::new(point.into(), normal.into()).into()
            }
            PrimitiveSpec::BoundedPlane {
                point,
                normal,
                half_width,
                half_height,
            } => {
                check_direction(index, "normal", normal)?;
                check_size(index, "half_width", half_width)?;
                check_size(index, "half_height", half_height)?;
                BoundedPlane::new(point.into(), normal.into(), half_width, half_height, &space)
                    .into()
            }
            PrimitiveSpec::Cube {
                center,
                orientation,
                edge,
            } => {
                check_size(index, "edge", edge)?;
                Cube::new(center.into(), orientation.into(), edge, &space).into()
            }
            PrimitiveSpec::Sphere {
                center,
                orientation,
                radius,
            } => {
                check_size(index, "radius", radius)?;
                Sphere::new(center.into(), orientation.into(), radius).into()
            }
        };
        map.push(primitive);
    }

    tracing::debug!(primitives = map.len(), "scene built");
    Ok(map)
}

fn check_size(index: usize, name: &str, value: f64) -> Result<(), GeometryError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidPrimitive {
            index,
            reason: format!("{name} must be a non-negative number, got {value}"),
        })
    }
}

fn check_direction(index: usize, name: &str, coords: [f64; 3]) -> Result<(), GeometryError> {
    let v = Vector::from_point(Point::from(coords));
    if v.dot(v) > 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidPrimitive {
            index,
            reason: format!("{name} must not be the zero vector"),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearest_hit_picks_smallest_distance() {
        let hit = nearest_hit([None, Some(7.0), Some(3.0), None]);
        assert_eq!(
            hit,
            Some(Hit {
                index: 2,
                distance: 3.0
            })
        );
    }

    #[test]
    fn nearest_hit_ties_go_to_first() {
        let hit = nearest_hit([Some(4.0), Some(4.0)]);
        assert_eq!(hit.map(|hit| hit.index), Some(0));
    }

    #[test]
    fn nearest_hit_of_nothing_is_background() {
        assert_eq!(nearest_hit(Vec::<Option<f64>>::new()), None);
        assert_eq!(nearest_hit([None, None]), None);
    }

    #[test]
    fn zero_distance_is_still_a_hit() {
        assert_eq!(nearest_hit([None, Some(0.0)]).map(|hit| hit.index), Some(1));
    }

    #[test]
    fn build_map_rejects_negative_radius() {
        let scene = SceneFile {
            version: 1,
            camera: None,
            primitives: vec![PrimitiveSpec::Sphere {
                center: [0.0, 0.0, 0.0],
                orientation: [1.0, 0.0, 0.0],
                radius: -1.0,
            }],
        };
        let err = build_map(&scene, VectorSpace::standard()).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidPrimitive { index: 0, .. }));
    }

    #[test]
    fn build_map_rejects_zero_normal() {
        let scene = SceneFile {
            version: 1,
            camera: None,
            primitives: vec![
                PrimitiveSpec::Cube {
                    center: [0.0, 0.0, 0.0],
                    orientation: [1.0, 0.0, 0.0],
                    edge: 1.0,
                },
                PrimitiveSpec::Plane {
                    point: [0.0, 0.0, 0.0],
                    normal: [0.0, 0.0, 0.0],
                },
            ],
        };
        let err = build_map(&scene, VectorSpace::standard()).unwrap_err();
        assert!(matches!(err, GeometryError::InvalidPrimitive { index: 1, .. }));
    }
}
