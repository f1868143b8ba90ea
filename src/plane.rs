use crate::cross_hair::CrossHair;
use crate::enums::{MprType, PlaneType};
use crate::error::MprError;
use crate::vector::{Direction3d, Point3d, distance_to_plane, project_onto_plane, truncate_steps};
use crate::volume_geometry::VolumeGeometry;

use glam::DVec3;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info};

/// Geometry of one reconstruction plane.
///
/// `dir_h` and `dir_v` are kept orthonormal, so the normal `dir_h x dir_v` is
/// unit length too.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PlaneInfo {
    pub plane_type: PlaneType,
    /// Pixel extents of the image
    pub width: usize,
    pub height: usize,
    /// Number of slices that can be stacked along the normal
    pub number: usize,
    pub dir_h: Direction3d,
    pub dir_v: Direction3d,
    pub pixel_spacing: f64,
    pub slice_thickness: f64,
    pub mpr_type: MprType,
}

impl PlaneInfo {
    fn canonical(plane_type: PlaneType, geometry: &VolumeGeometry, mpr_type: MprType) -> Option<Self> {
        let (width, height, number) = geometry.plane_init_size(plane_type)?;
        let (dir_h, dir_v) = match plane_type {
            PlaneType::Axial | PlaneType::AxialOblique => (DVec3::X, DVec3::Y),
            PlaneType::Sagittal | PlaneType::SagittalOblique => (DVec3::Y, DVec3::NEG_Z),
            PlaneType::Coronal | PlaneType::CoronalOblique => (DVec3::X, DVec3::NEG_Z),
            PlaneType::VR | PlaneType::NotDefined => return None,
        };
        let min_spacing = geometry.min_spacing();
        Some(Self {
            plane_type,
            width,
            height,
            number,
            dir_h,
            dir_v,
            pixel_spacing: min_spacing,
            slice_thickness: min_spacing,
            mpr_type,
        })
    }

    pub fn normal(&self) -> Direction3d {
        self.dir_h.cross(self.dir_v)
    }

    /// Physical width and height of the image.
    pub fn physical_size(&self) -> (f64, f64) {
        (
            self.width as f64 * self.pixel_spacing,
            self.height as f64 * self.pixel_spacing,
        )
    }

    /// Object-space position of pixel (0, 0) when the image is centred on
    /// `center`. Pixel (i, j) sits at `left_top + dir_h*i*ps + dir_v*j*ps`, so
    /// the centre lands on pixel ((width-1)/2, (height-1)/2).
    pub fn left_top(&self, center: Point3d) -> Point3d {
        let half_w = (self.width as f64 - 1.0) * 0.5 * self.pixel_spacing;
        let half_h = (self.height as f64 - 1.0) * 0.5 * self.pixel_spacing;
        center - self.dir_h * half_w - self.dir_v * half_h
    }

    /// Rows `dir_h`, `dir_v`, normal, in the order a shader expects.
    pub fn rotate_matrix(&self) -> [f32; 9] {
        let n = self.normal();
        [
            self.dir_h.x as f32,
            self.dir_h.y as f32,
            self.dir_h.z as f32,
            self.dir_v.x as f32,
            self.dir_v.y as f32,
            self.dir_v.z as f32,
            n.x as f32,
            n.y as f32,
            n.z as f32,
        ]
    }
}

/// All plane state of a viewer: one [`PlaneInfo`] per in-volume plane type and
/// the cross-hair that couples them.
#[derive(Debug, Clone, Default)]
pub struct PlaneRegistry {
    pub(crate) planes: BTreeMap<PlaneType, PlaneInfo>,
    pub(crate) cross_hair: CrossHair,
    pub(crate) geometry: Option<VolumeGeometry>,
}

impl PlaneRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Discard every plane and rebuild the six in-volume planes for
    /// `geometry`. Cross-hair and pivot move to the volume midpoint.
    pub fn reset(&mut self, geometry: VolumeGeometry, mpr_type: MprType) {
        let center = geometry.center();
        self.cross_hair = CrossHair::new(center);
        self.planes = PlaneType::IN_VOLUME
            .iter()
            .filter_map(|&plane| PlaneInfo::canonical(plane, &geometry, mpr_type))
            .map(|info| (info.plane_type, info))
            .collect();
        self.geometry = Some(geometry);
        info!(
            dimensions = ?geometry.dimensions,
            spacing = ?geometry.spacing,
            planes = self.planes.len(),
            "reset planes"
        );
    }

    /// Forget all planes, as when the volume is unloaded.
    pub fn clear(&mut self) {
        self.planes.clear();
        self.geometry = None;
        self.cross_hair = CrossHair::default();
    }

    pub fn geometry(&self) -> Option<&VolumeGeometry> {
        self.geometry.as_ref()
    }

    pub fn len(&self) -> usize {
        self.planes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.planes.is_empty()
    }

    pub fn plane_info(&self, plane: PlaneType) -> Option<&PlaneInfo> {
        self.planes.get(&plane)
    }

    pub fn plane_infos(&self) -> impl Iterator<Item = &PlaneInfo> {
        self.planes.values()
    }

    pub(crate) fn plane_or_err(&self, plane: PlaneType) -> Result<&PlaneInfo, MprError> {
        self.planes.get(&plane).ok_or(MprError::PlaneNotFound(plane))
    }

    pub fn plane_size(&self, plane: PlaneType) -> Option<(usize, usize)> {
        self.plane_info(plane).map(|info| (info.width, info.height))
    }

    pub fn plane_number(&self, plane: PlaneType) -> Option<usize> {
        self.plane_info(plane).map(|info| info.number)
    }

    /// Pixel spacing of `plane`, 1.0 when the plane does not exist.
    pub fn pixel_spacing(&self, plane: PlaneType) -> f64 {
        self.plane_info(plane).map_or(1.0, |info| info.pixel_spacing)
    }

    pub fn rotate_matrix(&self, plane: PlaneType) -> Option<[f32; 9]> {
        self.plane_info(plane).map(PlaneInfo::rotate_matrix)
    }

    /// Largest square image `plane` can need. The VR view uses `vr_viewport`.
    pub fn plane_max_size(&self, plane: PlaneType, vr_viewport: [u32; 2]) -> Option<(usize, usize)> {
        if plane == PlaneType::VR {
            return Some((vr_viewport[0] as usize, vr_viewport[1] as usize));
        }
        self.plane_info(plane)?;
        let size = self.geometry.as_ref()?.diagonal_size();
        Some((size, size))
    }

    pub fn thickness(&self, plane: PlaneType) -> Option<f64> {
        self.plane_info(plane).map(|info| info.slice_thickness)
    }

    pub fn set_thickness(&mut self, thickness: f64, plane: PlaneType) -> Result<(), MprError> {
        let info = self.planes.get_mut(&plane).ok_or(MprError::PlaneNotFound(plane))?;
        info.slice_thickness = thickness;
        Ok(())
    }

    /// Apply the same slab thickness to every plane.
    pub fn update_thickness(&mut self, thickness: f64) {
        for info in self.planes.values_mut() {
            info.slice_thickness = thickness;
        }
    }

    pub fn set_mpr_type(&mut self, mpr_type: MprType) {
        for info in self.planes.values_mut() {
            info.mpr_type = mpr_type;
        }
    }

    /// Recompute width, height and number of `plane` from the volume corners
    /// projected onto the plane's local axes. Width and height are anchored at
    /// the cross-hair, the slice count at the pivot that slice indices are
    /// measured from.
    pub fn update_plane_extent(&mut self, plane: PlaneType) -> Result<(), MprError> {
        let geometry = self.geometry.ok_or(MprError::NoVolume)?;
        let cross_hair = self.cross_hair;
        let info = self.planes.get_mut(&plane).ok_or(MprError::PlaneNotFound(plane))?;
        let (width, height) = info.fit_image(&geometry, cross_hair.point);
        info.number = slice_count(info, &geometry, cross_hair.center);
        debug!(?plane, width, height, number = info.number, "updated plane extent");
        Ok(())
    }

    /// Recompute image sizes of every plane after the cross-hair moved. The
    /// slice counts stay put, since the pivot did not move.
    pub(crate) fn refresh_extents(&mut self) {
        let Some(geometry) = self.geometry else {
            return;
        };
        let anchor = self.cross_hair.point;
        for info in self.planes.values_mut() {
            info.fit_image(&geometry, anchor);
        }
    }
}

impl PlaneInfo {
    fn fit_image(&mut self, geometry: &VolumeGeometry, anchor: Point3d) -> (usize, usize) {
        let (width, height, _) = plane_extent(self, geometry, anchor);
        self.width = width;
        self.height = height;
        (width, height)
    }
}

fn slice_count(info: &PlaneInfo, geometry: &VolumeGeometry, pivot: Point3d) -> usize {
    plane_extent(info, geometry, pivot).2
}

/// Asymmetric bounding of the volume corners around `anchor` along the plane's
/// (H, V, normal) axes, converted to pixel counts.
pub(crate) fn plane_extent(
    info: &PlaneInfo,
    geometry: &VolumeGeometry,
    anchor: Point3d,
) -> (usize, usize, usize) {
    let normal = info.normal();
    let mut negative = DVec3::ZERO;
    let mut positive = DVec3::ZERO;
    for vertex in geometry.vertices() {
        let projected = project_onto_plane(vertex, normal, anchor) - anchor;
        let local = DVec3::new(
            projected.dot(info.dir_h),
            projected.dot(info.dir_v),
            distance_to_plane(vertex, normal, anchor),
        );
        negative = negative.min(local);
        positive = positive.max(local);
    }

    let pixels = (positive - negative) / geometry.min_spacing();
    let count = |v: f64| truncate_steps(v).max(0) as usize;
    (count(pixels.x), count(pixels.y), count(pixels.z))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::Orientation;

    fn geometry() -> VolumeGeometry {
        VolumeGeometry {
            dimensions: (256, 256, 128),
            spacing: DVec3::new(1.0, 1.0, 2.0),
            orientation: Orientation::default(),
        }
    }

    fn registry() -> PlaneRegistry {
        let mut registry = PlaneRegistry::new();
        registry.reset(geometry(), MprType::Average);
        registry
    }

    #[test]
    fn test_reset_creates_six_planes() {
        let registry = registry();
        assert_eq!(registry.len(), 6);
        assert!(registry.plane_info(PlaneType::VR).is_none());
        assert!(registry.plane_info(PlaneType::NotDefined).is_none());
        assert_eq!(registry.cross_hair.point, DVec3::new(128.0, 128.0, 128.0));
        assert_eq!(registry.cross_hair.center, registry.cross_hair.point);
    }

    #[test]
    fn test_canonical_bases() {
        let registry = registry();
        let sagittal = registry.plane_info(PlaneType::Sagittal).unwrap();
        assert_eq!(sagittal.dir_h, DVec3::Y);
        assert_eq!(sagittal.dir_v, DVec3::NEG_Z);
        assert_eq!(sagittal.normal(), DVec3::NEG_X);
        let coronal = registry.plane_info(PlaneType::CoronalOblique).unwrap();
        assert_eq!(coronal.normal(), DVec3::Y);
        assert_eq!(coronal.pixel_spacing, 1.0);
        assert_eq!(coronal.slice_thickness, 1.0);
    }

    #[test]
    fn test_extent_matches_initial_size() {
        let mut registry = registry();
        let before = *registry.plane_info(PlaneType::Axial).unwrap();
        registry.update_plane_extent(PlaneType::Axial).unwrap();
        let after = registry.plane_info(PlaneType::Axial).unwrap();
        assert_eq!((before.width, before.height, before.number), (256, 256, 256));
        assert_eq!((after.width, after.height, after.number), (256, 256, 256));
    }

    #[test]
    fn test_extent_is_anchor_independent_inside_volume() {
        let mut registry = registry();
        registry.cross_hair.point = DVec3::new(10.3, 200.7, 5.1);
        registry.refresh_extents();
        assert_eq!(registry.plane_size(PlaneType::Coronal), Some((256, 256)));
        assert_eq!(registry.plane_number(PlaneType::Coronal), Some(256));
    }

    #[test]
    fn test_slice_count_ignores_cross_hair_outside_volume() {
        let mut registry = registry();
        registry.cross_hair.point = DVec3::new(128.0, 128.0, 700.0);
        registry.refresh_extents();
        assert_eq!(registry.plane_number(PlaneType::Axial), Some(256));
        assert_eq!(registry.plane_number(PlaneType::Sagittal), Some(256));
        registry.update_plane_extent(PlaneType::Axial).unwrap();
        assert_eq!(registry.plane_number(PlaneType::Axial), Some(256));
    }

    #[test]
    fn test_unknown_plane_fails_cleanly() {
        let mut registry = registry();
        assert!(matches!(
            registry.update_plane_extent(PlaneType::VR),
            Err(MprError::PlaneNotFound(PlaneType::VR))
        ));
        assert!(registry.set_thickness(3.0, PlaneType::NotDefined).is_err());
        assert_eq!(registry.pixel_spacing(PlaneType::VR), 1.0);
        assert!(PlaneRegistry::new().update_plane_extent(PlaneType::Axial).is_err());
    }

    #[test]
    fn test_thickness_and_mpr_type() {
        let mut registry = registry();
        registry.set_thickness(5.0, PlaneType::Axial).unwrap();
        assert_eq!(registry.thickness(PlaneType::Axial), Some(5.0));
        assert_eq!(registry.thickness(PlaneType::Coronal), Some(1.0));
        registry.update_thickness(2.0);
        assert!(registry.plane_infos().all(|p| p.slice_thickness == 2.0));
        registry.set_mpr_type(MprType::MIP);
        assert!(registry.plane_infos().all(|p| p.mpr_type == MprType::MIP));
    }

    #[test]
    fn test_max_size() {
        let registry = registry();
        assert_eq!(registry.plane_max_size(PlaneType::VR, [512, 512]), Some((512, 512)));
        // sqrt(3 * 256^2) = 443.4
        assert_eq!(registry.plane_max_size(PlaneType::Axial, [512, 512]), Some((444, 444)));
        assert_eq!(registry.plane_max_size(PlaneType::NotDefined, [512, 512]), None);
    }

    #[test]
    fn test_rotate_matrix_rows() {
        let registry = registry();
        let m = registry.rotate_matrix(PlaneType::Coronal).unwrap();
        assert_eq!(m, [1.0, 0.0, 0.0, 0.0, 0.0, -1.0, 0.0, 1.0, 0.0]);
    }

    #[test]
    fn test_left_top_pixel_centre() {
        let registry = registry();
        let info = registry.plane_info(PlaneType::Axial).unwrap();
        let lt = info.left_top(DVec3::new(128.0, 128.0, 128.0));
        assert_eq!(lt, DVec3::new(0.5, 0.5, 128.0));
    }
}
