/// ASCII rasterizer for the assembled box
use boxview_core::{CropRect, EditorSession, Face, ImageSource, Transform};
use crossterm::{
    style::{Color, Print, ResetColor, SetForegroundColor},
    QueueableCommand,
};
use image::DynamicImage;
use nalgebra::{Matrix4, Point3, Vector3};
use std::io::Write;

use crate::projection::Camera;

/// Character luminosity ramp for shading (darkest to lightest)
const LUMINOSITY_RAMP: &[char] = &[' ', '.', ':', '-', '=', '+', '*', '#', '%', '@'];

/// The box frame has Y pointing down; the camera frame has Y up
fn screen_flip() -> Matrix4<f64> {
    Matrix4::new_nonuniform_scaling(&Vector3::new(1.0, -1.0, 1.0))
}

/// Mean colour of each face's dieline crop
pub fn face_fills(image: &DynamicImage, crops: &[Option<CropRect>; 6]) -> [Option<Color>; 6] {
    std::array::from_fn(|i| crops[i].and_then(|crop| mean_color(image, &crop)))
}

fn mean_color(image: &DynamicImage, crop: &CropRect) -> Option<Color> {
    let x = (crop.x.floor().max(0.0) as u32).min(image.width().saturating_sub(1));
    let y = (crop.y.floor().max(0.0) as u32).min(image.height().saturating_sub(1));
    let width = (crop.width.round() as u32)
        .max(1)
        .min(image.width().saturating_sub(x));
    let height = (crop.height.round() as u32)
        .max(1)
        .min(image.height().saturating_sub(y));
    if width == 0 || height == 0 {
        return None;
    }

    let region = image.crop_imm(x, y, width, height).to_rgb8();
    let mut sum = [0u64; 3];
    for pixel in region.pixels() {
        for (acc, channel) in sum.iter_mut().zip(pixel.0) {
            *acc += u64::from(channel);
        }
    }
    let count = u64::from(width) * u64::from(height);
    let [r, g, b] = sum.map(|total| (total / count) as u8);
    Some(Color::Rgb { r, g, b })
}

/// ASCII renderer that converts the six placed faces to terminal characters
pub struct AsciiRenderer {
    width: usize,
    height: usize,
    depth_buffer: Vec<f64>,
    char_buffer: Vec<(char, Option<Color>)>,
}

impl AsciiRenderer {
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            depth_buffer: vec![f64::INFINITY; size],
            char_buffer: vec![(' ', None); size],
        }
    }

    pub fn resize(&mut self, width: usize, height: usize) {
        *self = Self::new(width, height);
    }

    pub fn clear(&mut self) {
        self.depth_buffer.fill(f64::INFINITY);
        self.char_buffer.fill((' ', None));
    }

    /// Character at a cell, or `None` outside the frame
    pub fn cell(&self, x: usize, y: usize) -> Option<char> {
        if x >= self.width || y >= self.height {
            return None;
        }
        self.char_buffer.get(y * self.width + x).map(|&(c, _)| c)
    }

    /// Rasterize every outward-facing face of the session's box
    pub fn render_session<I: ImageSource>(
        &mut self,
        session: &EditorSession<I>,
        camera: &Camera,
        fills: &[Option<Color>; 6],
    ) {
        // Largest dimension spans two world units.
        let fit = Transform::scale_matrix(2.0 / session.dimensions().max_extent());
        let world = screen_flip() * fit * session.orientation().rotation_matrix();

        for face in Face::ALL {
            let desc = session.face(face);
            let placed = world * desc.transform();
            let normal = placed.transform_vector(&Vector3::z()).normalize();
            let center = placed.transform_point(&Point3::origin());
            if (camera.position - center).dot(&normal) <= 0.0 {
                continue; // back face
            }
            let corners = desc.corners();
            let character = shade(&normal);
            let color = fills[face.index()].map(|fill| dim(fill, normal.z));

            let triangles = [
                [corners[0], corners[1], corners[2]],
                [corners[0], corners[2], corners[3]],
            ];
            for triangle in &triangles {
                self.render_triangle(triangle, &world, camera, character, color);
            }
        }
    }

    fn render_triangle(
        &mut self,
        vertices: &[Point3<f64>; 3],
        model_matrix: &Matrix4<f64>,
        camera: &Camera,
        character: char,
        color: Option<Color>,
    ) {
        // Project vertices to screen space
        let mut screen_coords = [(0.0, 0.0, 0.0); 3];
        for (slot, vertex) in screen_coords.iter_mut().zip(vertices) {
            match camera.project_to_screen(vertex, model_matrix, self.width, self.height) {
                Some(coords) => *slot = coords,
                None => return, // Triangle is clipped
            }
        }

        self.rasterize_triangle(&screen_coords, character, color);
    }

    fn rasterize_triangle(
        &mut self,
        coords: &[(f64, f64, f64); 3],
        character: char,
        color: Option<Color>,
    ) {
        if self.width == 0 || self.height == 0 {
            return;
        }
        let (v0, v1, v2) = (coords[0], coords[1], coords[2]);

        // Bounding box
        let min_x = v0.0.min(v1.0).min(v2.0).floor() as i64;
        let max_x = v0.0.max(v1.0).max(v2.0).ceil() as i64;
        let min_y = v0.1.min(v1.1).min(v2.1).floor() as i64;
        let max_y = v0.1.max(v1.1).max(v2.1).ceil() as i64;

        // Clip to screen bounds
        let min_x = min_x.max(0);
        let max_x = max_x.min(self.width as i64 - 1);
        let min_y = min_y.max(0);
        let max_y = max_y.min(self.height as i64 - 1);

        // Scanline rasterization
        for y in min_y..=max_y {
            for x in min_x..=max_x {
                let px = x as f64 + 0.5;
                let py = y as f64 + 0.5;

                // Barycentric coordinates
                if let Some((w0, w1, w2)) =
                    barycentric((v0.0, v0.1), (v1.0, v1.1), (v2.0, v2.1), (px, py))
                {
                    if w0 >= 0.0 && w1 >= 0.0 && w2 >= 0.0 {
                        // Interpolate depth
                        let depth = w0 * v0.2 + w1 * v1.2 + w2 * v2.2;

                        let idx = y as usize * self.width + x as usize;
                        if depth < self.depth_buffer[idx] {
                            self.depth_buffer[idx] = depth;
                            self.char_buffer[idx] = (character, color);
                        }
                    }
                }
            }
        }
    }

    pub fn draw<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        for y in 0..self.height {
            for x in 0..self.width {
                let (c, fill) = self.char_buffer[y * self.width + x];

                // Dieline colour when bound, otherwise by intensity
                let color = fill.unwrap_or(match c {
                    ' ' | '.' | ':' => Color::DarkGrey,
                    '-' | '=' => Color::Grey,
                    '+' | '*' => Color::White,
                    '#' | '%' | '@' => Color::Cyan,
                    _ => Color::White,
                });

                writer.queue(SetForegroundColor(color))?;
                writer.queue(Print(c))?;
            }
            if y + 1 < self.height {
                writer.queue(Print("\r\n"))?;
            }
        }
        writer.queue(ResetColor)?;
        Ok(())
    }
}

/// Map how directly a face looks at the camera onto the luminosity ramp
fn shade(normal: &Vector3<f64>) -> char {
    let brightness = normal.dot(&Vector3::z()).clamp(0.0, 1.0);
    // Faces that are visible at all never drop to blank.
    let index = 1 + (brightness * (LUMINOSITY_RAMP.len() - 2) as f64).round() as usize;
    LUMINOSITY_RAMP[index.min(LUMINOSITY_RAMP.len() - 1)]
}

fn dim(color: Color, brightness: f64) -> Color {
    match color {
        Color::Rgb { r, g, b } => {
            let k = 0.4 + 0.6 * brightness.clamp(0.0, 1.0);
            let scale = |c: u8| (f64::from(c) * k).round() as u8;
            Color::Rgb {
                r: scale(r),
                g: scale(g),
                b: scale(b),
            }
        }
        other => other,
    }
}

/// Calculate barycentric coordinates for a point in a triangle
fn barycentric(
    v0: (f64, f64),
    v1: (f64, f64),
    v2: (f64, f64),
    p: (f64, f64),
) -> Option<(f64, f64, f64)> {
    let denom = (v1.1 - v2.1) * (v0.0 - v2.0) + (v2.0 - v1.0) * (v0.1 - v2.1);

    if denom.abs() < 1e-9 {
        return None;
    }

    let w0 = ((v1.1 - v2.1) * (p.0 - v2.0) + (v2.0 - v1.0) * (p.1 - v2.1)) / denom;
    let w1 = ((v2.1 - v0.1) * (p.0 - v2.0) + (v0.0 - v2.0) * (p.1 - v2.1)) / denom;
    let w2 = 1.0 - w0 - w1;

    Some((w0, w1, w2))
}
