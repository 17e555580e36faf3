/// The editor session: one owned value holding every piece of preview state.
///
/// Render surfaces borrow the session each frame. Dimensions are only changed
/// through [`EditorSession::set_dimensions`] (or a single-field edit), which
/// recomputes the face layout when the edit is accepted.
use nalgebra::Matrix4;
use serde::Serialize;

use crate::config::PreviewConfig;
use crate::dimensions::{BoxDimensions, DimensionModel};
use crate::error::{DimensionError, Field};
use crate::layout::{compute_faces, Face, FaceDescriptor};
use crate::orientation::{Orientation, OrientationTracker, PointerEvent, Viewport};
use crate::texture::{CropRect, ImageInfo, ImageSource, TextureBinder};

/// Payload of the export control.
#[derive(Debug, Serialize)]
struct DimensionsExport {
    unit: &'static str,
    #[serde(flatten)]
    dimensions: BoxDimensions,
}

#[derive(Debug, Clone)]
pub struct EditorSession<I = ImageInfo> {
    dimensions: DimensionModel,
    faces: [FaceDescriptor; 6],
    tracker: OrientationTracker,
    texture: TextureBinder<I>,
}

impl<I: ImageSource> EditorSession<I> {
    pub fn new(config: &PreviewConfig, viewport: Viewport) -> Self {
        Self {
            dimensions: DimensionModel::new(config.dimensions),
            faces: compute_faces(config.dimensions),
            tracker: OrientationTracker::new(config.home, config.drag, viewport),
            texture: TextureBinder::new(),
        }
    }

    pub fn dimensions(&self) -> BoxDimensions {
        self.dimensions.dimensions()
    }

    pub fn revision(&self) -> u64 {
        self.dimensions.revision()
    }

    pub fn faces(&self) -> &[FaceDescriptor; 6] {
        &self.faces
    }

    pub fn face(&self, face: Face) -> &FaceDescriptor {
        &self.faces[face.index()]
    }

    pub fn orientation(&self) -> Orientation {
        self.tracker.orientation()
    }

    pub fn tracker(&self) -> &OrientationTracker {
        &self.tracker
    }

    pub fn texture(&self) -> &TextureBinder<I> {
        &self.texture
    }

    pub fn set_dimensions(
        &mut self,
        width: f64,
        height: f64,
        depth: f64,
    ) -> Result<BoxDimensions, DimensionError> {
        let dims = self.dimensions.set_dimensions(width, height, depth)?;
        self.faces = compute_faces(dims);
        Ok(dims)
    }

    pub fn set_field(&mut self, field: Field, value: f64) -> Result<BoxDimensions, DimensionError> {
        let dims = self.dimensions.set_field(field, value)?;
        self.faces = compute_faces(dims);
        Ok(dims)
    }

    /// Returns `true` when the orientation changed and a redraw is due.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> bool {
        self.tracker.handle(event)
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.tracker.set_viewport(viewport);
    }

    pub fn reset_orientation(&mut self) {
        self.tracker.reset_orientation();
    }

    pub fn bind_image(&mut self, handle: I) {
        self.texture.bind_image(handle);
    }

    pub fn clear_image(&mut self) {
        self.texture.clear();
    }

    /// Aspect-fill crops of the bound image, one per face.
    pub fn crops(&self) -> [Option<CropRect>; 6] {
        self.texture.crops(&self.faces)
    }

    /// Orientation composed with a face's placement.
    pub fn model_matrix(&self, face: Face) -> Matrix4<f64> {
        self.orientation().rotation_matrix() * self.face(face).transform()
    }

    /// Current dimensions as JSON for external use.
    pub fn export_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&DimensionsExport {
            unit: "mm",
            dimensions: self.dimensions(),
        })
    }
}

impl<I: ImageSource> Default for EditorSession<I> {
    fn default() -> Self {
        Self::new(&PreviewConfig::default(), Viewport::default())
    }
}
