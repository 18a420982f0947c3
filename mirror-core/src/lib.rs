/// Mirror Core Library - OBJ loading and scene geometry
///
/// This library provides the stateless core of the planar mirror viewer:
/// the OBJ loading pipeline (parsing, normal synthesis, interleaving),
/// camera and projection, transforms including plane reflection, and the
/// scene description consumed by renderers.

pub mod error;
pub mod face;
pub mod geometry;
pub mod interleave;
pub mod normals;
pub mod obj;
pub mod projection;
pub mod resource;
pub mod scene;
pub mod source;
pub mod transform;
pub mod vector;

// Re-export commonly used types
pub use error::{Attribute, ObjError, ParseErrorKind};
pub use geometry::{InterleavedMesh, RawMesh, Triangle, Vertex};
pub use obj::{load_obj, LoadReport, ObjLoad, ObjLoader};
pub use projection::{Camera, ProjectionMode};
pub use resource::MeshResource;
pub use scene::{Material, MirrorPlane, PointLight, Scene};
pub use transform::{RotationState, Transform};
