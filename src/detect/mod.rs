mod backend;
mod backends;
mod registry;
mod result;
pub mod yolo;

pub use backend::DetectorBackend;
#[cfg(feature = "backend-tract")]
pub use backends::TractBackend;
pub use backends::{ScriptedBackend, StubBackend};
pub use registry::BackendRegistry;
pub use result::{BoundingBox, Detection, DetectionResult};
