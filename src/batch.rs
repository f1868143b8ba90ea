use crate::enums::{MprType, PlaneType};
use crate::error::MprError;
use crate::plane::PlaneRegistry;
use crate::transform::slab_half_num;
use crate::vector::{Direction3d, Point3d};

use serde::{Deserialize, Serialize};

/// A stack of parallel reformats laid out around one centre point.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatchInfo {
    pub dir_h: Direction3d,
    pub dir_v: Direction3d,
    pub center: Point3d,
    pub num: usize,
    /// Distance between neighbouring slices
    pub slice_distance: f64,
    /// Physical size of each slice along `dir_h` and `dir_v`
    pub length_h: f64,
    pub length_v: f64,
    pub pixel_spacing: f64,
    pub slice_thickness: f64,
    pub mpr_type: MprType,
}

impl BatchInfo {
    pub fn width(&self) -> usize {
        (self.length_h / self.pixel_spacing) as usize
    }

    pub fn height(&self) -> usize {
        (self.length_v / self.pixel_spacing) as usize
    }

    pub fn normal(&self) -> Direction3d {
        self.dir_h.cross(self.dir_v)
    }

    pub fn half_num(&self) -> f32 {
        slab_half_num(self.slice_thickness, self.pixel_spacing)
    }

    /// Signed offsets of each slice from `center` along the normal. An even
    /// count straddles the centre, so no slice sits on it.
    pub fn slice_offsets(&self) -> Vec<f64> {
        let half = (self.num / 2) as i64;
        let even = self.num % 2 == 0;
        (-half..=half)
            .filter(|&i| !(even && i == 0))
            .map(|i| {
                let steps = match (even, i.signum()) {
                    (true, -1) => i as f64 + 0.5,
                    (true, _) => i as f64 - 0.5,
                    (false, _) => i as f64,
                };
                steps * self.slice_distance
            })
            .collect()
    }

    /// Left-top corner of every slice in the batch, nearest-negative first.
    pub fn slice_anchors(&self) -> Vec<Point3d> {
        let normal = self.normal();
        self.slice_offsets()
            .into_iter()
            .map(|offset| {
                let center = self.center + normal * offset;
                center - self.dir_h * (0.5 * self.length_h) - self.dir_v * (0.5 * self.length_v)
            })
            .collect()
    }
}

impl PlaneRegistry {
    /// Batch of `num` slices perpendicular to `plane`, turned `angle_degrees`
    /// about its normal and centred on the cross-hair. Each slice is large
    /// enough to cover the volume at any orientation.
    pub fn batch_info(
        &self,
        angle_degrees: f64,
        plane: PlaneType,
        num: usize,
        slice_distance: f64,
    ) -> Result<BatchInfo, MprError> {
        let geometry = self.geometry.as_ref().ok_or(MprError::NoVolume)?;
        let (dir_h, dir_v) = self.batch_directions(angle_degrees, plane)?;
        let info = self.plane_or_err(plane)?;
        let length = geometry.diagonal_size() as f64 * info.pixel_spacing;
        Ok(BatchInfo {
            dir_h,
            dir_v,
            center: self.cross_hair.point,
            num,
            slice_distance,
            length_h: length,
            length_v: length,
            pixel_spacing: info.pixel_spacing,
            slice_thickness: info.slice_thickness,
            mpr_type: MprType::Average,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::Orientation;
    use crate::volume_geometry::VolumeGeometry;
    use glam::DVec3;

    fn batch(num: usize) -> BatchInfo {
        BatchInfo {
            dir_h: DVec3::X,
            dir_v: DVec3::Y,
            center: DVec3::new(10.0, 10.0, 10.0),
            num,
            slice_distance: 2.0,
            length_h: 8.0,
            length_v: 4.0,
            pixel_spacing: 0.5,
            slice_thickness: 0.5,
            mpr_type: MprType::Average,
        }
    }

    #[test]
    fn test_odd_batch_includes_centre() {
        assert_eq!(batch(3).slice_offsets(), vec![-2.0, 0.0, 2.0]);
    }

    #[test]
    fn test_even_batch_straddles_centre() {
        assert_eq!(batch(4).slice_offsets(), vec![-3.0, -1.0, 1.0, 3.0]);
    }

    #[test]
    fn test_anchors() {
        let b = batch(1);
        assert_eq!((b.width(), b.height()), (16, 8));
        assert_eq!(b.slice_anchors(), vec![DVec3::new(6.0, 8.0, 10.0)]);
    }

    #[test]
    fn test_batch_from_registry() {
        let mut registry = PlaneRegistry::new();
        assert!(matches!(
            registry.batch_info(0.0, PlaneType::Axial, 5, 1.0),
            Err(MprError::NoVolume)
        ));
        registry.reset(
            VolumeGeometry {
                dimensions: (10, 10, 10),
                spacing: DVec3::ONE,
                orientation: Orientation::default(),
            },
            MprType::MIP,
        );
        let b = registry.batch_info(0.0, PlaneType::Axial, 5, 1.0).unwrap();
        assert_eq!(b.dir_h, DVec3::X);
        assert_eq!(b.dir_v, DVec3::Z);
        assert_eq!(b.center, DVec3::new(5.0, 5.0, 5.0));
        assert_eq!(b.slice_anchors().len(), 5);
    }
}
