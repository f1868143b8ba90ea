use crate::enums::{MprType, PlaneGroup, PlaneType};
use crate::error::MprError;
use crate::plane::PlaneRegistry;
use crate::vector::{Direction2d, Direction3d, Point3d};

use bytemuck::{Pod, Zeroable};
use glam::DVec2;

/// Everything a slice renderer needs to resample one plane.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliceGeometry {
    pub plane_type: PlaneType,
    /// Image width, padded to an even number of pixels
    pub width: usize,
    pub height: usize,
    pub dir_h: Direction3d,
    pub dir_v: Direction3d,
    pub normal: Direction3d,
    /// Object-space position of pixel (0, 0)
    pub left_top: Point3d,
    /// Image centre in object space
    pub center: Point3d,
    pub pixel_spacing: f64,
    pub slice_thickness: f64,
    /// Samples on each side of the plane when compositing a slab
    pub half_num: f32,
    pub mpr_type: MprType,
}

/// GPU layout of [`SliceGeometry`], padded to 16-byte rows.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct PlaneUniform {
    pub dir_h: [f32; 3],
    pub pixel_spacing: f32,
    pub dir_v: [f32; 3],
    pub half_num: f32,
    pub normal: [f32; 3],
    pub width: u32,
    pub left_top: [f32; 3],
    pub height: u32,
    pub mpr_type: u32,
    pub _padding: [u32; 3],
}

impl SliceGeometry {
    pub fn uniform(&self) -> PlaneUniform {
        PlaneUniform {
            dir_h: self.dir_h.as_vec3().to_array(),
            pixel_spacing: self.pixel_spacing as f32,
            dir_v: self.dir_v.as_vec3().to_array(),
            half_num: self.half_num,
            normal: self.normal.as_vec3().to_array(),
            width: self.width as u32,
            left_top: self.left_top.as_vec3().to_array(),
            height: self.height as u32,
            mpr_type: self.mpr_type as u32,
            _padding: [0; 3],
        }
    }
}

/// Slab half-width in samples for a thickness at a given pixel spacing.
pub fn slab_half_num(slice_thickness: f64, pixel_spacing: f64) -> f32 {
    let samples = ((slice_thickness / pixel_spacing) as i64).max(1);
    (samples - 1) as f32 / 2.0
}

impl PlaneRegistry {
    /// Object-space point under image pixel (`x`, `y`) of `plane`.
    pub fn image_to_object(&self, x: f64, y: f64, plane: PlaneType) -> Result<Point3d, MprError> {
        let info = self.plane_or_err(plane)?;
        let center = self
            .plane_center(plane)
            .ok_or(MprError::PlaneNotFound(plane))?;
        let left_top = info.left_top(center);
        Ok(left_top + info.dir_h * (x * info.pixel_spacing) + info.dir_v * (y * info.pixel_spacing))
    }

    pub fn object_to_voxel(&self, pt: Point3d) -> Option<Point3d> {
        self.geometry.as_ref().map(|g| g.object_to_voxel(pt))
    }

    fn has_group(&self, plane: PlaneType) -> bool {
        plane
            .group_members()
            .is_some_and(|members| members.iter().all(|p| self.planes.contains_key(p)))
    }

    /// Directions, in `plane`'s image frame, of the lines where the other two
    /// planes of its group cut it.
    pub fn cross_line_directions(&self, plane: PlaneType) -> Option<(Direction2d, Direction2d)> {
        if !self.has_group(plane) {
            return None;
        }
        if plane.group()? == PlaneGroup::Canonical {
            return Some((DVec2::X, DVec2::Y));
        }
        let (h_source, v_source) = match plane {
            PlaneType::AxialOblique => (PlaneType::SagittalOblique, PlaneType::CoronalOblique),
            PlaneType::SagittalOblique => (PlaneType::CoronalOblique, PlaneType::AxialOblique),
            PlaneType::CoronalOblique => (PlaneType::SagittalOblique, PlaneType::AxialOblique),
            _ => return None,
        };
        let this = self.plane_info(plane)?;
        let in_frame = |source: PlaneType| -> Option<Direction2d> {
            let dir = self.plane_info(source)?.normal();
            Some(DVec2::new(dir.dot(this.dir_h), dir.dot(this.dir_v)))
        };
        Some((in_frame(h_source)?, in_frame(v_source)?))
    }

    pub fn slice_geometry(&self, plane: PlaneType) -> Option<SliceGeometry> {
        let info = self.plane_info(plane)?;
        let center = self.plane_center(plane)?;
        let width = info.width + info.width % 2;
        Some(SliceGeometry {
            plane_type: plane,
            width,
            height: info.height,
            dir_h: info.dir_h,
            dir_v: info.dir_v,
            normal: info.normal(),
            left_top: info.left_top(center),
            center,
            pixel_spacing: info.pixel_spacing,
            slice_thickness: info.slice_thickness,
            half_num: slab_half_num(info.slice_thickness, info.pixel_spacing),
            mpr_type: info.mpr_type,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::Orientation;
    use crate::volume_geometry::VolumeGeometry;
    use glam::DVec3;

    const EPS: f64 = 1e-9;

    fn registry() -> PlaneRegistry {
        let mut registry = PlaneRegistry::new();
        registry.reset(
            VolumeGeometry {
                dimensions: (101, 60, 40),
                spacing: DVec3::new(1.0, 1.0, 1.5),
                orientation: Orientation::default(),
            },
            MprType::Average,
        );
        registry
    }

    #[test]
    fn test_image_to_object_centre_pixel() {
        let registry = registry();
        // axial is 101 x 60, pixel (50, 29.5) is the image centre
        let pt = registry.image_to_object(50.0, 29.5, PlaneType::Axial).unwrap();
        assert!((pt - registry.cross_hair()).length() < EPS);
        let corner = registry.image_to_object(0.0, 0.0, PlaneType::Coronal).unwrap();
        assert!((corner - DVec3::new(0.5, 30.0, 59.5)).length() < EPS);
    }

    #[test]
    fn test_image_to_object_unknown_plane() {
        let registry = registry();
        assert!(matches!(
            registry.image_to_object(0.0, 0.0, PlaneType::VR),
            Err(MprError::PlaneNotFound(PlaneType::VR))
        ));
    }

    #[test]
    fn test_cross_lines_canonical_are_axes() {
        let registry = registry();
        assert_eq!(
            registry.cross_line_directions(PlaneType::Sagittal),
            Some((DVec2::X, DVec2::Y))
        );
        assert_eq!(registry.cross_line_directions(PlaneType::VR), None);
    }

    #[test]
    fn test_cross_lines_oblique_follow_rotation() {
        let mut registry = registry();
        let (h, v) = registry.cross_line_directions(PlaneType::AxialOblique).unwrap();
        // sagittal normal is -X, coronal normal is +Y
        assert!((h - DVec2::new(-1.0, 0.0)).length() < EPS);
        assert!((v - DVec2::new(0.0, 1.0)).length() < EPS);

        registry.rotate(90.0, PlaneType::AxialOblique).unwrap();
        let (h, v) = registry.cross_line_directions(PlaneType::AxialOblique).unwrap();
        assert!((h - DVec2::new(0.0, -1.0)).length() < EPS);
        assert!((v - DVec2::new(-1.0, 0.0)).length() < EPS);
    }

    #[test]
    fn test_slice_geometry_pads_width() {
        let mut registry = registry();
        registry.set_thickness(5.0, PlaneType::Axial).unwrap();
        let slice = registry.slice_geometry(PlaneType::Axial).unwrap();
        assert_eq!((slice.width, slice.height), (102, 60));
        assert_eq!(slice.normal, DVec3::Z);
        assert_eq!(slice.half_num, 2.0);
        assert!((slice.left_top - DVec3::new(0.5, 0.5, 30.0)).length() < EPS);

        let uniform = slice.uniform();
        assert_eq!(uniform.width, 102);
        assert_eq!(bytemuck::bytes_of(&uniform).len(), 80);
    }

    #[test]
    fn test_slab_half_num() {
        assert_eq!(slab_half_num(1.0, 1.0), 0.0);
        assert_eq!(slab_half_num(0.2, 1.0), 0.0);
        assert_eq!(slab_half_num(4.0, 1.0), 1.5);
    }
}
