/// BoxView Web - WASM bindings for a CSS 3D box preview
///
/// The page owns the DOM: one container with `transform-style: preserve-3d`
/// holding six face elements, each centred in the container with
/// `transform-origin` at its own centre. This module computes everything
/// those elements need (size, transform, dieline crop) and tracks the
/// pointer-driven orientation applied to the container.
use boxview_core::{
    CropRect, DimensionError, EditorSession, ImageInfo, PointerEvent, PreviewConfig, Viewport,
};
use serde::Serialize;
use wasm_bindgen::prelude::*;

/// Pixels per millimetre used for CSS lengths unless the page changes it
const DEFAULT_PX_PER_MM: f64 = 1.0;

/// Everything a face element needs for one frame
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct FaceView {
    pub name: &'static str,
    pub width_px: f64,
    pub height_px: f64,
    pub transform: String,
    /// Source rectangle of the dieline, in image pixels
    pub crop: Option<CropRect>,
}

#[wasm_bindgen]
pub struct BoxPreview {
    session: EditorSession<ImageInfo>,
    px_per_mm: f64,
}

impl BoxPreview {
    fn from_config(config: &PreviewConfig, viewport_width: f64, viewport_height: f64) -> Self {
        Self {
            session: EditorSession::new(config, Viewport::new(viewport_width, viewport_height)),
            px_per_mm: DEFAULT_PX_PER_MM,
        }
    }

    fn apply_dimensions(&mut self, width: f64, height: f64, depth: f64) -> Result<(), DimensionError> {
        self.session.set_dimensions(width, height, depth).map(|_| ())
    }

    /// Per-face view data in layout order
    pub fn face_views(&self) -> Vec<FaceView> {
        let crops = self.session.crops();
        self.session
            .faces()
            .iter()
            .zip(crops)
            .map(|(desc, crop)| FaceView {
                name: desc.face.name(),
                width_px: desc.size.w * self.px_per_mm,
                height_px: desc.size.h * self.px_per_mm,
                transform: desc.css_transform(self.px_per_mm),
                crop,
            })
            .collect()
    }
}

#[wasm_bindgen]
impl BoxPreview {
    #[wasm_bindgen(constructor)]
    pub fn new(viewport_width: f64, viewport_height: f64) -> BoxPreview {
        Self::from_config(&PreviewConfig::default(), viewport_width, viewport_height)
    }

    /// Build a preview from a JSON [`PreviewConfig`]
    #[wasm_bindgen(js_name = withConfig)]
    pub fn with_config(
        json: &str,
        viewport_width: f64,
        viewport_height: f64,
    ) -> Result<BoxPreview, JsValue> {
        let config = PreviewConfig::from_json_str(json).map_err(to_js_error)?;
        Ok(Self::from_config(&config, viewport_width, viewport_height))
    }

    /// Replace all three dimensions; on error the previous box is kept
    #[wasm_bindgen(js_name = setDimensions)]
    pub fn set_dimensions(&mut self, width: f64, height: f64, depth: f64) -> Result<(), JsValue> {
        self.apply_dimensions(width, height, depth).map_err(to_js_error)
    }

    pub fn width(&self) -> f64 {
        self.session.dimensions().width()
    }

    pub fn height(&self) -> f64 {
        self.session.dimensions().height()
    }

    pub fn depth(&self) -> f64 {
        self.session.dimensions().depth()
    }

    #[wasm_bindgen(js_name = setScale)]
    pub fn set_scale(&mut self, px_per_mm: f64) {
        if px_per_mm.is_finite() && px_per_mm > 0.0 {
            self.px_per_mm = px_per_mm;
        }
    }

    #[wasm_bindgen(js_name = setViewport)]
    pub fn set_viewport(&mut self, width: f64, height: f64) {
        self.session.set_viewport(Viewport::new(width, height));
    }

    /// `button` is `MouseEvent.button`; 0 is the primary button
    #[wasm_bindgen(js_name = pointerDown)]
    pub fn pointer_down(&mut self, x: f64, y: f64, button: i16) -> bool {
        self.session.handle_pointer(PointerEvent::Down {
            x,
            y,
            primary: button == 0,
        })
    }

    /// Returns `true` when the container transform must be updated
    #[wasm_bindgen(js_name = pointerMove)]
    pub fn pointer_move(&mut self, x: f64, y: f64) -> bool {
        self.session.handle_pointer(PointerEvent::Move { x, y })
    }

    #[wasm_bindgen(js_name = pointerUp)]
    pub fn pointer_up(&mut self) {
        self.session.handle_pointer(PointerEvent::Up);
    }

    #[wasm_bindgen(js_name = pointerLeave)]
    pub fn pointer_leave(&mut self) {
        self.session.handle_pointer(PointerEvent::Leave);
    }

    #[wasm_bindgen(js_name = touchStart)]
    pub fn touch_start(&mut self, x: f64, y: f64) {
        self.session.handle_pointer(PointerEvent::TouchStart { x, y });
    }

    #[wasm_bindgen(js_name = touchMove)]
    pub fn touch_move(&mut self, x: f64, y: f64) -> bool {
        self.session.handle_pointer(PointerEvent::TouchMove { x, y })
    }

    #[wasm_bindgen(js_name = touchEnd)]
    pub fn touch_end(&mut self) {
        self.session.handle_pointer(PointerEvent::TouchEnd);
    }

    #[wasm_bindgen(js_name = isDragging)]
    pub fn is_dragging(&self) -> bool {
        self.session.tracker().is_dragging()
    }

    #[wasm_bindgen(js_name = resetOrientation)]
    pub fn reset_orientation(&mut self) {
        self.session.reset_orientation();
    }

    pub fn pitch(&self) -> f64 {
        self.session.orientation().pitch
    }

    pub fn yaw(&self) -> f64 {
        self.session.orientation().yaw
    }

    /// CSS transform for the container holding the six faces
    #[wasm_bindgen(js_name = sceneTransform)]
    pub fn scene_transform(&self) -> String {
        self.session.orientation().css_transform()
    }

    /// Bind the decoded dieline by its natural size
    #[wasm_bindgen(js_name = bindImage)]
    pub fn bind_image(&mut self, natural_width: u32, natural_height: u32) {
        self.session.bind_image(ImageInfo {
            width: natural_width,
            height: natural_height,
        });
    }

    #[wasm_bindgen(js_name = clearImage)]
    pub fn clear_image(&mut self) {
        self.session.clear_image();
    }

    /// Array of `{ name, widthPx, heightPx, transform, crop }` objects
    pub fn faces(&self) -> Result<JsValue, JsValue> {
        serde_wasm_bindgen::to_value(&self.face_views()).map_err(JsValue::from)
    }

    /// Current dimensions as JSON, for the export control
    #[wasm_bindgen(js_name = exportJson)]
    pub fn export_json(&self) -> Result<String, JsValue> {
        self.session.export_json().map_err(to_js_error)
    }
}

fn to_js_error(err: impl std::fmt::Display) -> JsValue {
    let message = err.to_string();
    #[cfg(target_arch = "wasm32")]
    web_sys::console::warn_1(&JsValue::from_str(&message));
    JsValue::from_str(&message)
}

/// Get the version of BoxView
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

#[wasm_bindgen(start)]
pub fn main() {
    // Setup panic hook for better error messages in browser console
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();
}
