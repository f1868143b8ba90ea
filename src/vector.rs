//! Vector primitives and the small amount of linear algebra shared by the
//! plane and camera code.
//!
//! Points and directions are both `glam::DVec3`; the aliases only document
//! intent. Directions are expected to be unit length but nothing enforces it.

use glam::{DMat3, DVec2, DVec3};

pub type Point3d = DVec3;
pub type Direction3d = DVec3;
pub type Direction2d = DVec2;

/// Values within this distance of an integer are treated as that integer
/// before truncation.
const SNAP_EPSILON: f64 = 1e-6;

/// Rotation by `angle_degrees` about `axis` (right-hand rule), Rodrigues' formula
/// written out element by element. Returns `None` for a zero-length axis.
pub fn rotation_about_axis(axis: Direction3d, angle_degrees: f64) -> Option<DMat3> {
    let n = axis.try_normalize()?;
    let (x, y, z) = (n.x, n.y, n.z);
    let (sin_v, cos_v) = angle_degrees.to_radians().sin_cos();
    let cos_vt = 1.0 - cos_v;

    let m00 = x * x + (1.0 - x * x) * cos_v;
    let m11 = y * y + (1.0 - y * y) * cos_v;
    let m22 = z * z + (1.0 - z * z) * cos_v;
    let m01 = x * y * cos_vt - z * sin_v;
    let m02 = x * z * cos_vt + y * sin_v;
    let m10 = x * y * cos_vt + z * sin_v;
    let m12 = y * z * cos_vt - x * sin_v;
    let m20 = x * z * cos_vt - y * sin_v;
    let m21 = y * z * cos_vt + x * sin_v;

    Some(DMat3::from_cols(
        DVec3::new(m00, m10, m20),
        DVec3::new(m01, m11, m21),
        DVec3::new(m02, m12, m22),
    ))
}

/// Rotate `pt` about `pivot` with `rotation`.
pub fn rotate_about(rotation: &DMat3, pt: Point3d, pivot: Point3d) -> Point3d {
    *rotation * (pt - pivot) + pivot
}

/// Signed distance from `pt` to the plane through `plane_pt` with unit `normal`.
pub fn distance_to_plane(pt: Point3d, normal: Direction3d, plane_pt: Point3d) -> f64 {
    (pt - plane_pt).dot(normal)
}

/// Orthogonal projection of `pt` onto the plane through `plane_pt` with unit `normal`.
pub fn project_onto_plane(pt: Point3d, normal: Direction3d, plane_pt: Point3d) -> Point3d {
    pt - normal * distance_to_plane(pt, normal, plane_pt)
}

/// Gram-Schmidt on an in-plane basis. `dir_h` keeps its direction, `dir_v`
/// is made perpendicular to it. `None` if the pair spans no plane.
pub fn orthonormalize(dir_h: Direction3d, dir_v: Direction3d) -> Option<(Direction3d, Direction3d)> {
    let h = dir_h.try_normalize()?;
    let v = (dir_v - h * dir_v.dot(h)).try_normalize()?;
    Some((h, v))
}

/// Truncate toward zero, snapping values that are an integer up to
/// floating-point noise.
pub fn truncate_steps(value: f64) -> i64 {
    let rounded = value.round();
    if (value - rounded).abs() < SNAP_EPSILON {
        rounded as i64
    } else {
        value.trunc() as i64
    }
}
