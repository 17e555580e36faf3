/// Dieline image binding.
///
/// One image fills all six faces. Each face takes its own aspect-fill crop:
/// the image is scaled to cover the face rectangle and the overflow is cut
/// evenly from both sides. The binder never decodes or copies pixels.
use std::rc::Rc;
use std::sync::Arc;

use serde::Serialize;
use tracing::debug;

use crate::layout::{FaceDescriptor, FaceSize};

/// Anything with an intrinsic pixel size.
pub trait ImageSource {
    fn pixel_size(&self) -> (u32, u32);
}

impl<T: ImageSource + ?Sized> ImageSource for Arc<T> {
    fn pixel_size(&self) -> (u32, u32) {
        (**self).pixel_size()
    }
}

impl<T: ImageSource + ?Sized> ImageSource for Rc<T> {
    fn pixel_size(&self) -> (u32, u32) {
        (**self).pixel_size()
    }
}

#[cfg(feature = "image")]
impl ImageSource for image::DynamicImage {
    fn pixel_size(&self) -> (u32, u32) {
        (self.width(), self.height())
    }
}

/// Size-only handle for images decoded outside this crate (e.g. by a browser).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ImageInfo {
    pub width: u32,
    pub height: u32,
}

impl ImageSource for ImageInfo {
    fn pixel_size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}

/// Source rectangle in image pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CropRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

/// Centred crop of an `image_w × image_h` image covering a face of `size`.
pub fn aspect_fill(image_w: u32, image_h: u32, size: FaceSize) -> Option<CropRect> {
    if image_w == 0 || image_h == 0 || size.w <= 0.0 || size.h <= 0.0 {
        return None;
    }
    let (iw, ih) = (f64::from(image_w), f64::from(image_h));
    let scale = (size.w / iw).max(size.h / ih);
    let width = (size.w / scale).min(iw);
    let height = (size.h / scale).min(ih);
    Some(CropRect {
        x: (iw - width) / 2.0,
        y: (ih - height) / 2.0,
        width,
        height,
    })
}

/// Holds the image shared by every face.
#[derive(Debug, Clone)]
pub struct TextureBinder<I> {
    image: Option<I>,
}

impl<I: ImageSource> TextureBinder<I> {
    pub fn new() -> Self {
        Self { image: None }
    }

    pub fn bind_image(&mut self, handle: I) {
        let (width, height) = handle.pixel_size();
        debug!(width, height, "image bound");
        self.image = Some(handle);
    }

    pub fn image(&self) -> Option<&I> {
        self.image.as_ref()
    }

    pub fn clear(&mut self) {
        self.image = None;
    }

    /// Crop of the bound image for one face size.
    pub fn crop_for(&self, size: FaceSize) -> Option<CropRect> {
        let (w, h) = self.image.as_ref()?.pixel_size();
        aspect_fill(w, h, size)
    }

    /// Crops for a full layout, in the same order.
    pub fn crops(&self, faces: &[FaceDescriptor; 6]) -> [Option<CropRect>; 6] {
        std::array::from_fn(|i| self.crop_for(faces[i].size))
    }
}

impl<I: ImageSource> Default for TextureBinder<I> {
    fn default() -> Self {
        Self::new()
    }
}
