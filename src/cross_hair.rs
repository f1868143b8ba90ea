use crate::enums::PlaneType;
use crate::error::MprError;
use crate::plane::PlaneRegistry;
use crate::vector::{Point3d, distance_to_plane, project_onto_plane, truncate_steps};

use serde::{Deserialize, Serialize};
use tracing::debug;

/// The shared intersection point of all planes plus the pivot that slice
/// indices and plane centres are measured from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CrossHair {
    pub point: Point3d,
    pub center: Point3d,
}

impl CrossHair {
    pub fn new(center: Point3d) -> Self {
        Self {
            point: center,
            center,
        }
    }
}

impl PlaneRegistry {
    pub fn cross_hair(&self) -> Point3d {
        self.cross_hair.point
    }

    pub fn center_point(&self) -> Point3d {
        self.cross_hair.center
    }

    /// Move the cross-hair to an arbitrary object-space point.
    pub fn set_cross_hair(&mut self, point: Point3d) {
        self.cross_hair.point = point;
        self.refresh_extents();
    }

    /// Cross-hair in voxel coordinates.
    pub fn cross_hair_voxel(&self) -> Option<Point3d> {
        let geometry = self.geometry.as_ref()?;
        Some(geometry.object_to_voxel(self.cross_hair.point))
    }

    /// Centre of `plane`'s image: the pivot projected along the plane normal
    /// onto the plane through the cross-hair.
    pub fn plane_center(&self, plane: PlaneType) -> Option<Point3d> {
        let info = self.plane_info(plane)?;
        Some(project_onto_plane(
            self.cross_hair.center,
            info.normal(),
            self.cross_hair.point,
        ))
    }

    /// Shift the cross-hair `delta` physical units along `plane`'s normal.
    pub fn browse(&mut self, delta: f64, plane: PlaneType) -> Result<(), MprError> {
        let normal = self.plane_or_err(plane)?.normal();
        self.set_cross_hair(self.cross_hair.point + normal * delta);
        debug!(?plane, delta, "browsed");
        Ok(())
    }

    /// Place the cross-hair on slice `index` of `plane`'s stack.
    pub fn set_plane_index(&mut self, index: i64, plane: PlaneType) -> Result<(), MprError> {
        let spacing = self.geometry.as_ref().ok_or(MprError::NoVolume)?.min_spacing();
        let info = self.plane_or_err(plane)?;
        let normal = info.normal();
        let steps = index - (info.number as i64 - 1) / 2;
        let on_center = project_onto_plane(self.cross_hair.point, normal, self.cross_hair.center);
        self.set_cross_hair(on_center + normal * (steps as f64 * spacing));
        debug!(?plane, index, "set plane index");
        Ok(())
    }

    /// Slice index of the cross-hair within `plane`'s stack.
    pub fn plane_index(&self, plane: PlaneType) -> Option<i64> {
        let spacing = self.geometry.as_ref()?.min_spacing();
        let info = self.plane_info(plane)?;
        let dist = distance_to_plane(self.cross_hair.point, info.normal(), self.cross_hair.center);
        Some(truncate_steps(dist / spacing) + (info.number as i64 - 1) / 2)
    }

    /// Move the cross-hair to the object-space point under image pixel
    /// (`x`, `y`) of `plane`.
    pub fn pan_cross_hair(&mut self, x: f64, y: f64, plane: PlaneType) -> Result<(), MprError> {
        let point = self.image_to_object(x, y, plane)?;
        self.set_cross_hair(point);
        Ok(())
    }

    /// Image pixel coordinates of the cross-hair on `plane`.
    pub fn cross_hair_point(&self, plane: PlaneType) -> Option<(f64, f64)> {
        let info = self.plane_info(plane)?;
        let offset = self.cross_hair.point - self.plane_center(plane)?;
        let x = (info.width as f64 - 1.0) / 2.0 + offset.dot(info.dir_h) / info.pixel_spacing;
        let y = (info.height as f64 - 1.0) / 2.0 + offset.dot(info.dir_v) / info.pixel_spacing;
        Some((x, y))
    }
}
