/// BoxView Core Library - Box face layout and orientation engine
///
/// This library provides the stateless geometry behind the packaging-mockup
/// previewer: validated box dimensions, the six face placements of the
/// assembled box, pointer-driven viewing orientation and dieline binding.

pub mod config;
pub mod dimensions;
pub mod error;
pub mod layout;
pub mod orientation;
pub mod session;
pub mod texture;
pub mod transform;

// Re-export commonly used types
pub use config::PreviewConfig;
pub use dimensions::{BoxDimensions, DimensionModel};
pub use error::{ConfigError, DimensionError, Field};
pub use layout::{compute_faces, Face, FaceDescriptor, FaceSize, LateralOffset, Placement};
pub use orientation::{
    DragMapping, DragState, Orientation, OrientationTracker, PointerEvent, Viewport,
};
pub use session::EditorSession;
pub use texture::{aspect_fill, CropRect, ImageInfo, ImageSource, TextureBinder};
pub use transform::{Axis, Transform};
