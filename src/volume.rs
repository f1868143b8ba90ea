use crate::enums::PlaneType;
use crate::error::MprError;
use crate::vector::Direction3d;

use glam::DVec3;
use ndarray::{Array3, ArrayView2, ArrayView3, Zip, s};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// Axis sign of the patient coordinate system along each volume axis.
/// `-1` on `x` means left/right are flipped, `-1` on `y` anterior/posterior.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Orientation {
    pub x: i8,
    pub y: i8,
    pub z: i8,
}

impl Default for Orientation {
    fn default() -> Self {
        Self { x: 1, y: 1, z: 1 }
    }
}

impl Orientation {
    /// Derive axis signs from the direction cosines of the volume axes.
    pub fn from_directions(dir_x: Direction3d, dir_y: Direction3d, dir_z: Direction3d) -> Self {
        let sign = |v: f64| if v < 0.0 { -1 } else { 1 };
        Self {
            x: sign(dir_x.x),
            y: sign(dir_y.y),
            z: sign(dir_z.z),
        }
    }

    pub fn is_left_right_flipped(&self) -> bool {
        self.x == -1
    }

    pub fn is_anterior_posterior_flipped(&self) -> bool {
        self.y == -1
    }
}

/// Storage for the voxel intensities and the label mask.
///
/// Dimensions are reported as (width, height, depth) in voxels and spacing as
/// physical units per voxel along (x, y, z).
pub trait VolumeStore {
    fn dimensions(&self) -> (usize, usize, usize);

    fn spacing(&self) -> DVec3;

    fn min_spacing(&self) -> f64 {
        self.spacing().min_element()
    }

    fn orientation(&self) -> Orientation;

    fn has_data(&self) -> bool;

    fn set_spacing(&mut self, spacing: DVec3) -> Result<(), MprError>;

    /// Stamp `label` on every voxel where `mask` is non-zero.
    fn add_object_mask(&mut self, mask: ArrayView3<'_, u8>, label: u8) -> Result<(), MprError>;

    /// Replace the voxels currently carrying `label` with `mask`.
    fn update_object_mask(&mut self, mask: ArrayView3<'_, u8>, label: u8) -> Result<(), MprError>;
}

/// In-memory volume. Arrays are laid out (depth, height, width).
#[derive(Default)]
pub struct Volume {
    pub data: Array3<i16>,
    pub mask: Array3<u8>,
    pub spacing: DVec3,
    pub orientation: Orientation,
}

impl Volume {
    pub fn new(data: Array3<i16>, spacing: DVec3) -> Self {
        let mask = Array3::zeros(data.dim());
        Self {
            data,
            mask,
            spacing,
            orientation: Orientation::default(),
        }
    }

    /// Get the array dimensions of the volume (depth, height, width)
    pub fn dim(&self) -> (usize, usize, usize) {
        self.data.dim()
    }

    /// Get a reference to the underlying data
    pub fn data(&self) -> &Array3<i16> {
        &self.data
    }

    /// Get a reference to the label mask
    pub fn mask(&self) -> &Array3<u8> {
        &self.mask
    }

    pub fn set_direction(&mut self, dir_x: Direction3d, dir_y: Direction3d, dir_z: Direction3d) {
        self.orientation = Orientation::from_directions(dir_x, dir_y, dir_z);
    }

    /// Voxel slice along one of the canonical planes. `None` for oblique
    /// planes and out-of-range indices.
    pub fn slice(&self, index: usize, plane: PlaneType) -> Option<ArrayView2<'_, i16>> {
        if !self.is_valid_index(index, plane) {
            return None;
        }
        let slice = match plane {
            PlaneType::Axial => self.data.slice(s![index, .., ..]),
            PlaneType::Coronal => self.data.slice(s![.., index, ..]),
            PlaneType::Sagittal => self.data.slice(s![.., .., index]),
            _ => return None,
        };
        Some(slice)
    }

    fn is_valid_index(&self, index: usize, plane: PlaneType) -> bool {
        let dim = self.data.dim();
        let max_index = match plane {
            PlaneType::Axial => dim.0,
            PlaneType::Coronal => dim.1,
            PlaneType::Sagittal => dim.2,
            _ => 0,
        };
        index < max_index
    }

    fn check_mask(&self, mask: &ArrayView3<'_, u8>) -> Result<(), MprError> {
        if mask.dim() != self.data.dim() {
            return Err(MprError::MaskDimensions {
                expected: self.data.dim(),
                found: mask.dim(),
            });
        }
        Ok(())
    }
}

impl VolumeStore for Volume {
    fn dimensions(&self) -> (usize, usize, usize) {
        let (depth, height, width) = self.data.dim();
        (width, height, depth)
    }

    fn spacing(&self) -> DVec3 {
        self.spacing
    }

    fn orientation(&self) -> Orientation {
        self.orientation
    }

    fn has_data(&self) -> bool {
        !self.data.is_empty()
    }

    fn set_spacing(&mut self, spacing: DVec3) -> Result<(), MprError> {
        if spacing.min_element() <= 0.0 || !spacing.is_finite() {
            return Err(MprError::InvalidSpacing);
        }
        self.spacing = spacing;
        Ok(())
    }

    fn add_object_mask(&mut self, mask: ArrayView3<'_, u8>, label: u8) -> Result<(), MprError> {
        self.check_mask(&mask)?;
        Zip::from(&mut self.mask).and(&mask).par_for_each(|dst, &src| {
            if src != 0 {
                *dst = label;
            }
        });
        debug!(label, "stamped object mask");
        Ok(())
    }

    fn update_object_mask(&mut self, mask: ArrayView3<'_, u8>, label: u8) -> Result<(), MprError> {
        self.check_mask(&mask)?;
        Zip::from(&mut self.mask).and(&mask).par_for_each(|dst, &src| {
            if src != 0 {
                *dst = label;
            } else if *dst == label {
                *dst = 0;
            }
        });
        debug!(label, "replaced object mask");
        Ok(())
    }
}
