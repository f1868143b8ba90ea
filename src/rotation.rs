//! Rotation of the oblique plane group.
//!
//! Rotating about one oblique plane turns the other two planes of the group
//! about that plane's normal through the cross-hair. Each call starts from the
//! current bases, so consecutive calls compose. Bases are re-orthonormalised
//! after every call, which keeps `rotate(a); rotate(b)` equal to `rotate(a + b)`
//! up to rounding.

use crate::enums::PlaneType;
use crate::error::MprError;
use crate::plane::PlaneRegistry;
use crate::vector::{Direction3d, orthonormalize, rotate_about, rotation_about_axis};

use tracing::info;

impl PlaneRegistry {
    /// Rotate the two planes coupled to `pivot_plane` by `angle_degrees`
    /// about its normal. Both planes change or neither does.
    pub fn rotate(&mut self, angle_degrees: f64, pivot_plane: PlaneType) -> Result<(), MprError> {
        if !pivot_plane.is_oblique() {
            return Err(MprError::NotOblique(pivot_plane));
        }
        let axis = self.plane_or_err(pivot_plane)?.normal();
        let rotation =
            rotation_about_axis(axis, angle_degrees).ok_or(MprError::DegenerateBasis(pivot_plane))?;
        let cross_planes = pivot_plane
            .cross_planes()
            .ok_or(MprError::NotOblique(pivot_plane))?;

        let pivot = self.cross_hair.point;
        let mut rotated = Vec::with_capacity(cross_planes.len());
        for plane in cross_planes {
            let info = self.plane_or_err(plane)?;
            let center = self
                .plane_center(plane)
                .ok_or(MprError::PlaneNotFound(plane))?;
            let (width, height) = info.physical_size();
            let half_h = info.dir_h * (width / 2.0);
            let half_v = info.dir_v * (height / 2.0);
            let left_top = rotate_about(&rotation, center - half_h - half_v, pivot);
            let right_top = rotate_about(&rotation, center + half_h - half_v, pivot);
            let left_bottom = rotate_about(&rotation, center - half_h + half_v, pivot);

            let (dir_h, dir_v) = orthonormalize(right_top - left_top, left_bottom - left_top)
                .ok_or(MprError::DegenerateBasis(plane))?;
            rotated.push((plane, dir_h, dir_v));
        }

        for (plane, dir_h, dir_v) in rotated {
            if let Some(info) = self.planes.get_mut(&plane) {
                info.dir_h = dir_h;
                info.dir_v = dir_v;
            }
            self.update_plane_extent(plane)?;
        }
        info!(?pivot_plane, angle_degrees, "rotated oblique planes");
        Ok(())
    }

    /// `plane`'s horizontal direction turned by `angle_degrees` about its
    /// normal, paired with the normal. Used to lay out batch reformats.
    pub fn batch_directions(
        &self,
        angle_degrees: f64,
        plane: PlaneType,
    ) -> Result<(Direction3d, Direction3d), MprError> {
        let info = self.plane_or_err(plane)?;
        let normal = info.normal();
        let rotation =
            rotation_about_axis(normal, angle_degrees).ok_or(MprError::DegenerateBasis(plane))?;
        Ok((rotation * info.dir_h, normal))
    }
}
