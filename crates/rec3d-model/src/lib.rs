//! Shared data structures for rec3d.

use serde::{Deserialize, Serialize};

/// Raw ambient frame as read from configuration. Arity is checked when it is
/// turned into a `VectorSpace`, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SpaceSpec {
    pub init_point: Vec<f64>,
    pub basis: Vec<Vec<f64>>,
}

impl Default for SpaceSpec {
    fn default() -> Self {
        Self {
            init_point: vec![0.0, 0.0, 0.0],
            basis: vec![
                vec![1.0, 0.0, 0.0],
                vec![0.0, 1.0, 0.0],
                vec![0.0, 0.0, 1.0],
            ],
        }
    }
}

/// Camera parameters. Every field is optional so that several sources
/// (config file, scene file, command line) can be layered.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct CameraSpec {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub facing: Option<[f64; 3]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fov: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<usize>,
}

impl CameraSpec {
    /// Fills every unset field of `self` from `fallback`.
    pub fn or(self, fallback: &CameraSpec) -> CameraSpec {
        CameraSpec {
            position: self.position.or(fallback.position),
            facing: self.facing.or(fallback.facing),
            fov: self.fov.or(fallback.fov),
            height: self.height.or(fallback.height),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PrimitiveSpec {
    Plane {
        point: [f64; 3],
        normal: [f64; 3],
    },
    BoundedPlane {
        point: [f64; 3],
        normal: [f64; 3],
        half_width: f64,
        half_height: f64,
    },
    Cube {
        center: [f64; 3],
        orientation: [f64; 3],
        edge: f64,
    },
    Sphere {
        center: [f64; 3],
        #[serde(default = "default_orientation")]
        orientation: [f64; 3],
        radius: f64,
    },
}

fn default_orientation() -> [f64; 3] {
    [1.0, 0.0, 0.0]
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SceneFile {
    pub version: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub camera: Option<CameraSpec>,
    pub primitives: Vec<PrimitiveSpec>,
}
