/// Face layout for an assembled box.
///
/// The local frame is screen-aligned: X grows to the right (width), Y grows
/// downward (height) and Z points toward the viewer (depth). The box is
/// centred on the origin.
///
/// Every face rectangle starts in the `z = 0` plane facing `+Z`, centred on
/// the origin, and is then placed by
///
/// ```text
/// T(lateral_offset) · R(axis, rotation_deg) · T(0, 0, translate_along_normal)
/// ```
///
/// The lateral offset is the signed distance between the face's own centre
/// and the centre of the `W × H` front footprint when the face is anchored to
/// that footprint's top-left corner. Anchoring keeps the formulas free of any
/// ordering between W, H and D: opposite faces always translate by amounts
/// summing to the dimension they span.
use nalgebra::{Matrix4, Point3, Vector3};
use serde::Serialize;

use crate::dimensions::BoxDimensions;
use crate::transform::{Axis, Transform};

/// One of the six faces of a box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Face {
    Front,
    Back,
    Top,
    Bottom,
    Left,
    Right,
}

impl Face {
    /// All faces in layout order.
    pub const ALL: [Face; 6] = [
        Face::Front,
        Face::Back,
        Face::Top,
        Face::Bottom,
        Face::Left,
        Face::Right,
    ];

    /// Position of this face in the array returned by [`compute_faces`].
    pub fn index(self) -> usize {
        match self {
            Face::Front => 0,
            Face::Back => 1,
            Face::Top => 2,
            Face::Bottom => 3,
            Face::Left => 4,
            Face::Right => 5,
        }
    }

    pub fn opposite(self) -> Face {
        match self {
            Face::Front => Face::Back,
            Face::Back => Face::Front,
            Face::Top => Face::Bottom,
            Face::Bottom => Face::Top,
            Face::Left => Face::Right,
            Face::Right => Face::Left,
        }
    }

    /// The four faces sharing an edge with this one.
    pub fn neighbors(self) -> [Face; 4] {
        match self {
            Face::Front | Face::Back => [Face::Top, Face::Bottom, Face::Left, Face::Right],
            Face::Top | Face::Bottom => [Face::Front, Face::Back, Face::Left, Face::Right],
            Face::Left | Face::Right => [Face::Front, Face::Back, Face::Top, Face::Bottom],
        }
    }

    /// Axis the face is perpendicular to once placed.
    pub fn normal_axis(self) -> Axis {
        match self {
            Face::Front | Face::Back => Axis::Z,
            Face::Top | Face::Bottom => Axis::Y,
            Face::Left | Face::Right => Axis::X,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Face::Front => "front",
            Face::Back => "back",
            Face::Top => "top",
            Face::Bottom => "bottom",
            Face::Left => "left",
            Face::Right => "right",
        }
    }
}

/// Rectangle size of a face in its own plane.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaceSize {
    pub w: f64,
    pub h: f64,
}

impl FaceSize {
    pub fn aspect(&self) -> f64 {
        self.w / self.h
    }
}

/// In-plane shift applied after rotation and normal translation.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LateralOffset {
    pub axis: Axis,
    pub amount: f64,
}

/// Rigid placement of a face rectangle in the box's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Placement {
    pub axis: Axis,
    pub rotation_deg: f64,
    pub translate_along_normal: f64,
    pub lateral_offset: LateralOffset,
}

impl Placement {
    pub fn matrix(&self) -> Matrix4<f64> {
        Transform::axis_translation(self.lateral_offset.axis, self.lateral_offset.amount)
            * Transform::axis_rotation(self.axis, self.rotation_deg)
            * Transform::axis_translation(Axis::Z, self.translate_along_normal)
    }

    /// The same placement as a CSS transform, lengths in pixels at `px_per_mm`.
    ///
    /// Assumes the face element is centred in its container with
    /// `transform-origin` at its centre.
    pub fn css_transform(&self, px_per_mm: f64) -> String {
        format!(
            "translate{}({}px) rotate{}({}deg) translateZ({}px)",
            self.lateral_offset.axis.css_suffix(),
            self.lateral_offset.amount * px_per_mm,
            self.axis.css_suffix(),
            self.rotation_deg,
            self.translate_along_normal * px_per_mm,
        )
    }
}

/// Size and placement of one face.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FaceDescriptor {
    pub face: Face,
    pub size: FaceSize,
    pub placement: Placement,
}

impl FaceDescriptor {
    pub fn transform(&self) -> Matrix4<f64> {
        self.placement.matrix()
    }

    /// Placed corners, counter-clockwise as seen from outside the box.
    pub fn corners(&self) -> [Point3<f64>; 4] {
        let (hw, hh) = (self.size.w / 2.0, self.size.h / 2.0);
        let m = self.transform();
        // Y grows downward, so this walk is counter-clockwise on screen.
        [
            Point3::new(-hw, hh, 0.0),
            Point3::new(hw, hh, 0.0),
            Point3::new(hw, -hh, 0.0),
            Point3::new(-hw, -hh, 0.0),
        ]
        .map(|p| m.transform_point(&p))
    }

    pub fn center(&self) -> Point3<f64> {
        self.transform().transform_point(&Point3::origin())
    }

    pub fn outward_normal(&self) -> Vector3<f64> {
        self.transform().transform_vector(&Vector3::z())
    }

    pub fn css_transform(&self, px_per_mm: f64) -> String {
        self.placement.css_transform(px_per_mm)
    }
}

/// Compute the six faces of a closed box centred on the origin.
pub fn compute_faces(dims: BoxDimensions) -> [FaceDescriptor; 6] {
    let (w, h, d) = (dims.width(), dims.height(), dims.depth());

    let face = |face, size: (f64, f64), axis, rotation_deg, normal, lateral: (Axis, f64)| {
        FaceDescriptor {
            face,
            size: FaceSize {
                w: size.0,
                h: size.1,
            },
            placement: Placement {
                axis,
                rotation_deg,
                translate_along_normal: normal,
                lateral_offset: LateralOffset {
                    axis: lateral.0,
                    amount: lateral.1,
                },
            },
        }
    };

    let vertical = (Axis::Y, (d - h) / 2.0);
    let horizontal = (Axis::X, (d - w) / 2.0);

    [
        face(Face::Front, (w, h), Axis::Y, 0.0, d / 2.0, (Axis::X, 0.0)),
        face(Face::Back, (w, h), Axis::Y, 180.0, d / 2.0, (Axis::X, 0.0)),
        face(Face::Top, (w, d), Axis::X, 90.0, d / 2.0, vertical),
        face(Face::Bottom, (w, d), Axis::X, -90.0, h - d / 2.0, vertical),
        face(Face::Left, (d, h), Axis::Y, -90.0, d / 2.0, horizontal),
        face(Face::Right, (d, h), Axis::Y, 90.0, w - d / 2.0, horizontal),
    ]
}
