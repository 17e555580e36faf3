/// Pointer-driven viewing orientation.
///
/// The tracker is a two-state machine (idle / dragging). While a drag is
/// active, every move sample recomputes pitch and yaw. The default mapping is
/// absolute: the same pointer position always yields the same orientation,
/// whatever path the pointer took to get there.
use nalgebra::Matrix4;
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::transform::Transform;

/// Viewing rotation in degrees. Never wrapped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Orientation {
    pub pitch: f64,
    pub yaw: f64,
}

impl Orientation {
    pub const HOME: Orientation = Orientation {
        pitch: -20.0,
        yaw: 45.0,
    };

    pub fn new(pitch: f64, yaw: f64) -> Self {
        Self { pitch, yaw }
    }

    /// `Rx(pitch) · Ry(yaw)`, the outermost transform of the assembled box.
    pub fn rotation_matrix(&self) -> Matrix4<f64> {
        Transform::orientation_matrix(self.pitch, self.yaw)
    }

    pub fn css_transform(&self) -> String {
        format!("rotateX({}deg) rotateY({}deg)", self.pitch, self.yaw)
    }
}

impl Default for Orientation {
    fn default() -> Self {
        Self::HOME
    }
}

/// Size of the render surface in the same units as pointer positions.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

/// Input sample from the render surface. Positions are relative to its
/// top-left corner.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down { x: f64, y: f64, primary: bool },
    Move { x: f64, y: f64 },
    Up,
    Leave,
    TouchStart { x: f64, y: f64 },
    TouchMove { x: f64, y: f64 },
    TouchEnd,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DragState {
    Idle,
    Dragging,
}

/// How pointer motion maps to orientation while dragging.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum DragMapping {
    /// `pitch = y / height * 360`, `yaw = x / width * 360`.
    #[default]
    Absolute,
    /// Degrees added per unit of pointer travel since the previous sample.
    Delta { sensitivity: f64 },
}

/// Owns the current [`Orientation`] and the drag gesture state.
#[derive(Debug, Clone)]
pub struct OrientationTracker {
    orientation: Orientation,
    home: Orientation,
    state: DragState,
    mapping: DragMapping,
    viewport: Viewport,
    last_sample: Option<(f64, f64)>,
}

impl OrientationTracker {
    pub fn new(home: Orientation, mapping: DragMapping, viewport: Viewport) -> Self {
        Self {
            orientation: home,
            home,
            state: DragState::Idle,
            mapping,
            viewport,
            last_sample: None,
        }
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        self.state == DragState::Dragging
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn set_viewport(&mut self, viewport: Viewport) {
        self.viewport = viewport;
    }

    pub fn mapping(&self) -> DragMapping {
        self.mapping
    }

    /// Feed one input event. Returns `true` when the orientation changed.
    pub fn handle(&mut self, event: PointerEvent) -> bool {
        match event {
            PointerEvent::Down { x, y, primary } => {
                if primary {
                    self.begin_drag(x, y);
                }
                false
            }
            PointerEvent::TouchStart { x, y } => {
                self.begin_drag(x, y);
                false
            }
            PointerEvent::Move { x, y } | PointerEvent::TouchMove { x, y } => {
                if self.state == DragState::Dragging {
                    self.sample(x, y)
                } else {
                    false
                }
            }
            PointerEvent::Up | PointerEvent::Leave | PointerEvent::TouchEnd => {
                if self.state == DragState::Dragging {
                    debug!(
                        pitch = self.orientation.pitch,
                        yaw = self.orientation.yaw,
                        "drag ended"
                    );
                }
                self.state = DragState::Idle;
                self.last_sample = None;
                false
            }
        }
    }

    /// Return to the home orientation without touching the drag state.
    pub fn reset_orientation(&mut self) {
        debug!("orientation reset");
        self.orientation = self.home;
        // Delta drags continue from the current pointer position.
    }

    fn begin_drag(&mut self, x: f64, y: f64) {
        debug!(x, y, "drag started");
        self.state = DragState::Dragging;
        self.last_sample = Some((x, y));
    }

    fn sample(&mut self, x: f64, y: f64) -> bool {
        let before = self.orientation;
        match self.mapping {
            DragMapping::Absolute => {
                if self.viewport.height > 0.0 {
                    self.orientation.pitch = y / self.viewport.height * 360.0;
                }
                if self.viewport.width > 0.0 {
                    self.orientation.yaw = x / self.viewport.width * 360.0;
                }
            }
            DragMapping::Delta { sensitivity } => {
                if let Some((last_x, last_y)) = self.last_sample {
                    self.orientation.pitch += (y - last_y) * sensitivity;
                    self.orientation.yaw += (x - last_x) * sensitivity;
                }
            }
        }
        self.last_sample = Some((x, y));
        trace!(pitch = self.orientation.pitch, yaw = self.orientation.yaw, "drag sample");
        self.orientation != before
    }
}

impl Default for OrientationTracker {
    fn default() -> Self {
        Self::new(Orientation::HOME, DragMapping::Absolute, Viewport::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn dragging_at(tracker: &mut OrientationTracker, x: f64, y: f64) {
        tracker.handle(PointerEvent::Down { x, y, primary: true });
    }

    #[test]
    fn test_absolute_mapping_samples() {
        let mut tracker = OrientationTracker::default();
        dragging_at(&mut tracker, 0.0, 0.0);

        tracker.handle(PointerEvent::Move { x: 400.0, y: 300.0 });
        assert_relative_eq!(tracker.orientation().yaw, 180.0);
        assert_relative_eq!(tracker.orientation().pitch, 180.0);

        tracker.handle(PointerEvent::Move { x: 0.0, y: 0.0 });
        assert_relative_eq!(tracker.orientation().yaw, 0.0);
        assert_relative_eq!(tracker.orientation().pitch, 0.0);

        tracker.handle(PointerEvent::Move { x: 800.0, y: 600.0 });
        assert_relative_eq!(tracker.orientation().yaw, 360.0);
        assert_relative_eq!(tracker.orientation().pitch, 360.0);
    }

    #[test]
    fn test_absolute_mapping_is_path_independent() {
        let mut a = OrientationTracker::default();
        dragging_at(&mut a, 10.0, 10.0);
        a.handle(PointerEvent::Move { x: 250.0, y: 120.0 });

        let mut b = OrientationTracker::default();
        dragging_at(&mut b, 700.0, 500.0);
        for step in 0..20 {
            let t = step as f64;
            b.handle(PointerEvent::Move { x: 700.0 - t * 30.0, y: 20.0 * t });
        }
        b.handle(PointerEvent::Move { x: 250.0, y: 120.0 });

        assert_eq!(a.orientation(), b.orientation());
    }

    #[test]
    fn test_orientation_persists_after_pointer_up() {
        let mut tracker = OrientationTracker::default();
        dragging_at(&mut tracker, 0.0, 0.0);
        tracker.handle(PointerEvent::Move { x: 200.0, y: 150.0 });
        let last = tracker.orientation();

        tracker.handle(PointerEvent::Up);
        assert_eq!(tracker.state(), DragState::Idle);
        assert_eq!(tracker.orientation(), last);

        // Moves without a drag are ignored.
        assert!(!tracker.handle(PointerEvent::Move { x: 600.0, y: 10.0 }));
        assert_eq!(tracker.orientation(), last);
    }

    #[test]
    fn test_down_does_not_move_the_box() {
        let mut tracker = OrientationTracker::default();
        assert!(!tracker.handle(PointerEvent::Down {
            x: 400.0,
            y: 300.0,
            primary: true
        }));
        assert_eq!(tracker.orientation(), Orientation::HOME);
        assert!(tracker.is_dragging());
    }

    #[test]
    fn test_secondary_button_does_not_start_drag() {
        let mut tracker = OrientationTracker::default();
        tracker.handle(PointerEvent::Down {
            x: 0.0,
            y: 0.0,
            primary: false,
        });
        assert_eq!(tracker.state(), DragState::Idle);
    }

    #[test]
    fn test_touch_gesture() {
        let mut tracker = OrientationTracker::default();
        tracker.handle(PointerEvent::TouchStart { x: 5.0, y: 5.0 });
        assert!(tracker.handle(PointerEvent::TouchMove { x: 200.0, y: 450.0 }));
        assert_relative_eq!(tracker.orientation().yaw, 90.0);
        assert_relative_eq!(tracker.orientation().pitch, 270.0);
        tracker.handle(PointerEvent::TouchEnd);
        assert!(!tracker.is_dragging());
    }

    #[test]
    fn test_leave_ends_drag() {
        let mut tracker = OrientationTracker::default();
        dragging_at(&mut tracker, 0.0, 0.0);
        tracker.handle(PointerEvent::Leave);
        assert!(!tracker.is_dragging());
    }

    #[test]
    fn test_reset_keeps_drag_state() {
        let mut tracker = OrientationTracker::default();
        dragging_at(&mut tracker, 0.0, 0.0);
        tracker.handle(PointerEvent::Move { x: 123.0, y: 456.0 });
        tracker.reset_orientation();
        assert_eq!(tracker.orientation(), Orientation::new(-20.0, 45.0));
        assert!(tracker.is_dragging());

        tracker.handle(PointerEvent::Up);
        tracker.reset_orientation();
        assert_eq!(tracker.orientation(), Orientation::HOME);
        assert!(!tracker.is_dragging());
    }

    #[test]
    fn test_zero_viewport_leaves_angles() {
        let mut tracker = OrientationTracker::default();
        tracker.set_viewport(Viewport::new(0.0, 600.0));
        dragging_at(&mut tracker, 0.0, 0.0);
        tracker.handle(PointerEvent::Move { x: 50.0, y: 300.0 });
        assert_eq!(tracker.orientation().yaw, Orientation::HOME.yaw);
        assert_relative_eq!(tracker.orientation().pitch, 180.0);
    }

    #[test]
    fn test_delta_mapping_accumulates() {
        let mut tracker = OrientationTracker::new(
            Orientation::new(0.0, 0.0),
            DragMapping::Delta { sensitivity: 0.5 },
            Viewport::default(),
        );
        dragging_at(&mut tracker, 100.0, 100.0);
        tracker.handle(PointerEvent::Move { x: 140.0, y: 80.0 });
        tracker.handle(PointerEvent::Move { x: 180.0, y: 60.0 });
        assert_relative_eq!(tracker.orientation().yaw, 40.0);
        assert_relative_eq!(tracker.orientation().pitch, -20.0);

        // A new gesture starts from its own anchor, not the old pointer.
        tracker.handle(PointerEvent::Up);
        dragging_at(&mut tracker, 0.0, 0.0);
        tracker.handle(PointerEvent::Move { x: 2.0, y: 0.0 });
        assert_relative_eq!(tracker.orientation().yaw, 41.0);
    }

    #[test]
    fn test_css_transform() {
        assert_eq!(
            Orientation::HOME.css_transform(),
            "rotateX(-20deg) rotateY(45deg)"
        );
    }
}
