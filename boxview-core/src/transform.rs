/// Rigid transform helpers shared by the face layout and the orientation tracker
use nalgebra::{Matrix4, Vector3};
use serde::{Deserialize, Serialize};

/// Principal axis of the box's local frame
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Axis {
    X,
    Y,
    Z,
}

impl Axis {
    pub fn unit(self) -> Vector3<f64> {
        match self {
            Axis::X => Vector3::x(),
            Axis::Y => Vector3::y(),
            Axis::Z => Vector3::z(),
        }
    }

    /// Name used in CSS transform functions (`rotateX`, `translateY`, ...)
    pub fn css_suffix(self) -> &'static str {
        match self {
            Axis::X => "X",
            Axis::Y => "Y",
            Axis::Z => "Z",
        }
    }
}

/// Transform builder for 3D transformations
pub struct Transform;

impl Transform {
    /// Rotation about one principal axis, angle in degrees
    pub fn axis_rotation(axis: Axis, degrees: f64) -> Matrix4<f64> {
        Matrix4::new_rotation(axis.unit() * degrees.to_radians())
    }

    /// Viewing rotation: pitch about X applied after yaw about Y
    pub fn orientation_matrix(pitch_deg: f64, yaw_deg: f64) -> Matrix4<f64> {
        Self::axis_rotation(Axis::X, pitch_deg) * Self::axis_rotation(Axis::Y, yaw_deg)
    }

    /// Create a translation matrix
    pub fn translation_matrix(x: f64, y: f64, z: f64) -> Matrix4<f64> {
        Matrix4::new_translation(&Vector3::new(x, y, z))
    }

    /// Translation of `amount` along one axis
    pub fn axis_translation(axis: Axis, amount: f64) -> Matrix4<f64> {
        Matrix4::new_translation(&(axis.unit() * amount))
    }

    /// Create a uniform scale matrix
    pub fn scale_matrix(s: f64) -> Matrix4<f64> {
        Matrix4::new_scaling(s)
    }

    /// Create a model-view-projection matrix
    pub fn mvp_matrix(
        model: &Matrix4<f64>,
        view: &Matrix4<f64>,
        projection: &Matrix4<f64>,
    ) -> Matrix4<f64> {
        projection * view * model
    }
}
