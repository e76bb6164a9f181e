//! Ray casting against analytic primitives, drawn as text.

pub mod math;
pub mod error;
pub mod geometry;
pub mod scene;
pub mod camera;
pub mod console;
pub mod session;

pub use camera::{Camera, Pose};
pub use console::{glyph_for, ConsoleRenderer, Frame, RenderSettings};
pub use error::{GeometryError, RenderError, SessionError};
pub use geometry::{BoundedPlane, Cube, Plane, Primitive, Sphere};
pub use math::{Point, Ray, Vector, VectorSpace};
pub use scene::{build_map, nearest_hit, Hit, Map};
pub use session::{launch, Controls, FrameSink, HeldKeys, InputSource, Key, LoopState, Session};
