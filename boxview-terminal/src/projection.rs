/// Camera and projection for the terminal surface
use boxview_core::Transform;
use nalgebra::{Matrix4, Point3, Vector3};

/// Terminal cells are roughly twice as tall as they are wide
pub const CELL_ASPECT: f64 = 2.0;

/// Projection mode for rendering
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ProjectionMode {
    Orthographic,
    Perspective,
}

/// Camera configuration, Y-up, looking down -Z at the origin
pub struct Camera {
    pub position: Point3<f64>,
    pub target: Point3<f64>,
    pub up: Vector3<f64>,
    pub fov: f64,
    pub aspect: f64,
    pub near: f64,
    pub far: f64,
    pub mode: ProjectionMode,
}

impl Camera {
    /// Camera for a terminal of `columns × rows` cells
    pub fn new(columns: u16, rows: u16) -> Self {
        Self {
            position: Point3::new(0.0, 0.0, 5.0),
            target: Point3::origin(),
            up: Vector3::y(),
            fov: std::f64::consts::FRAC_PI_4, // 45 degrees
            aspect: Self::cell_aspect(columns, rows),
            near: 0.1,
            far: 100.0,
            mode: ProjectionMode::Perspective,
        }
    }

    pub fn resize(&mut self, columns: u16, rows: u16) {
        self.aspect = Self::cell_aspect(columns, rows);
    }

    fn cell_aspect(columns: u16, rows: u16) -> f64 {
        f64::from(columns.max(1)) / (f64::from(rows.max(1)) * CELL_ASPECT)
    }

    /// Create the view matrix (camera transformation)
    pub fn view_matrix(&self) -> Matrix4<f64> {
        Matrix4::look_at_rh(&self.position, &self.target, &self.up)
    }

    /// Create the projection matrix
    pub fn projection_matrix(&self) -> Matrix4<f64> {
        match self.mode {
            ProjectionMode::Perspective => {
                Matrix4::new_perspective(self.aspect, self.fov, self.near, self.far)
            }
            ProjectionMode::Orthographic => {
                let height = (self.position - self.target).norm() * (self.fov / 2.0).tan() * 2.0;
                let width = height * self.aspect;
                Matrix4::new_orthographic(
                    -width / 2.0,
                    width / 2.0,
                    -height / 2.0,
                    height / 2.0,
                    self.near,
                    self.far,
                )
            }
        }
    }

    /// Project a model-space point to screen cells, returning `(x, y, depth)`
    ///
    /// Points behind the camera yield `None`; off-screen points are returned
    /// as-is and left to the rasterizer's bounds clipping.
    pub fn project_to_screen(
        &self,
        point: &Point3<f64>,
        model_matrix: &Matrix4<f64>,
        columns: usize,
        rows: usize,
    ) -> Option<(f64, f64, f64)> {
        let mvp = Transform::mvp_matrix(model_matrix, &self.view_matrix(), &self.projection_matrix());
        let clip = mvp * point.to_homogeneous();

        // Prevent division by near-zero depth values
        if clip.w < 1e-6 {
            return None;
        }

        let ndc_x = clip.x / clip.w;
        let ndc_y = clip.y / clip.w;
        let depth = clip.z / clip.w;

        // Convert to screen space
        let screen_x = (ndc_x + 1.0) * 0.5 * columns as f64;
        let screen_y = (1.0 - ndc_y) * 0.5 * rows as f64;

        Some((screen_x, screen_y, depth))
    }
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(80, 24)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_camera_creation() {
        let camera = Camera::new(80, 20);
        assert_eq!(camera.mode, ProjectionMode::Perspective);
        assert_relative_eq!(camera.aspect, 2.0);
    }

    #[test]
    fn test_origin_projects_to_center() {
        let camera = Camera::new(80, 24);
        let (x, y, depth) = camera
            .project_to_screen(&Point3::origin(), &Matrix4::identity(), 80, 24)
            .unwrap();
        assert_relative_eq!(x, 40.0, epsilon = 1e-9);
        assert_relative_eq!(y, 12.0, epsilon = 1e-9);
        assert!(depth > -1.0 && depth < 1.0);
    }

    #[test]
    fn test_nearer_points_have_smaller_depth() {
        let camera = Camera::default();
        let (_, _, near) = camera
            .project_to_screen(&Point3::new(0.0, 0.0, 1.0), &Matrix4::identity(), 80, 24)
            .unwrap();
        let (_, _, far) = camera
            .project_to_screen(&Point3::new(0.0, 0.0, -1.0), &Matrix4::identity(), 80, 24)
            .unwrap();
        assert!(near < far);
    }

    #[test]
    fn test_up_is_up_on_screen() {
        let camera = Camera::default();
        let (_, y, _) = camera
            .project_to_screen(&Point3::new(0.0, 1.0, 0.0), &Matrix4::identity(), 80, 24)
            .unwrap();
        assert!(y < 12.0);
    }

    #[test]
    fn test_behind_camera_is_rejected() {
        let camera = Camera::default();
        assert!(camera
            .project_to_screen(&Point3::new(0.0, 0.0, 10.0), &Matrix4::identity(), 80, 24)
            .is_none());
    }
}
