//! Read-only geometric view over a [`VolumeStore`].
//!
//! Object space has its origin at the corner of voxel (0, 0, 0) and is
//! measured in physical units, so the volume occupies the box from the origin
//! to `dimensions * spacing`.

use crate::enums::PlaneType;
use crate::vector::{Point3d, truncate_steps};
use crate::volume::{Orientation, VolumeStore};

use bytemuck::{Pod, Zeroable};
use glam::DVec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VolumeGeometry {
    /// (width, height, depth) in voxels
    pub dimensions: (usize, usize, usize),
    pub spacing: DVec3,
    pub orientation: Orientation,
}

impl VolumeGeometry {
    /// Snapshot the geometry of `store`. `None` without voxel data or with a
    /// spacing that would make pixel counts meaningless.
    pub fn from_store<V: VolumeStore + ?Sized>(store: &V) -> Option<Self> {
        if !store.has_data() {
            return None;
        }
        let spacing = store.spacing();
        if spacing.min_element() <= 0.0 {
            return None;
        }
        Some(Self {
            dimensions: store.dimensions(),
            spacing,
            orientation: store.orientation(),
        })
    }

    pub fn min_spacing(&self) -> f64 {
        self.spacing.min_element()
    }

    fn dimensions_vec(&self) -> DVec3 {
        let (w, h, d) = self.dimensions;
        DVec3::new(w as f64, h as f64, d as f64)
    }

    /// Physical size of the volume along each axis.
    pub fn extent(&self) -> DVec3 {
        self.dimensions_vec() * self.spacing
    }

    /// Geometric midpoint in object space.
    pub fn center(&self) -> Point3d {
        self.extent() * 0.5
    }

    /// The eight corners of the volume bounding box.
    pub fn vertices(&self) -> [Point3d; 8] {
        let DVec3 { x, y, z } = self.extent();
        [
            DVec3::new(0.0, 0.0, 0.0),
            DVec3::new(x, 0.0, 0.0),
            DVec3::new(0.0, y, 0.0),
            DVec3::new(x, y, 0.0),
            DVec3::new(0.0, 0.0, z),
            DVec3::new(x, 0.0, z),
            DVec3::new(0.0, y, z),
            DVec3::new(x, y, z),
        ]
    }

    /// Voxel counts after resampling every axis to the minimum spacing,
    /// as (x, y, z).
    pub fn isotropic_dimensions(&self) -> (usize, usize, usize) {
        let inv_min_spacing = 1.0 / self.min_spacing();
        let iso = self.extent() * inv_min_spacing;
        let count = |v: f64| truncate_steps(v).max(0) as usize;
        (count(iso.x), count(iso.y), count(iso.z))
    }

    /// Initial (width, height, number) of a plane before any rotation.
    pub fn plane_init_size(&self, plane: PlaneType) -> Option<(usize, usize, usize)> {
        let (x, y, z) = self.isotropic_dimensions();
        match plane {
            PlaneType::Axial | PlaneType::AxialOblique => Some((x, y, z)),
            PlaneType::Sagittal | PlaneType::SagittalOblique => Some((y, z, x)),
            PlaneType::Coronal | PlaneType::CoronalOblique => Some((x, z, y)),
            PlaneType::VR | PlaneType::NotDefined => None,
        }
    }

    /// Side of a square image that holds the volume at any orientation.
    pub fn diagonal_size(&self) -> usize {
        (self.extent().length() / self.min_spacing()) as usize + 1
    }

    pub fn object_to_voxel(&self, pt: Point3d) -> Point3d {
        pt / self.spacing
    }

    /// Convert a VOI given in voxel coordinates into anatomical bounds,
    /// mirroring the axes the orientation flips.
    pub fn normalize_voi(&self, voi: &Voi) -> NormalizedVoi {
        let (width, height, _) = self.dimensions;
        let (left, right) = if self.orientation.is_left_right_flipped() {
            (
                width as i32 - 1 - voi.x_end as i32,
                width as i32 - 1 - voi.x_start as i32,
            )
        } else {
            (voi.x_start as i32, voi.x_end as i32)
        };
        let (posterior, anterior) = if self.orientation.is_anterior_posterior_flipped() {
            (
                height as i32 - 1 - voi.y_end as i32,
                height as i32 - 1 - voi.y_start as i32,
            )
        } else {
            (voi.y_start as i32, voi.y_end as i32)
        };
        NormalizedVoi {
            left,
            right,
            posterior,
            anterior,
            head: voi.z_start as i32,
            foot: voi.z_end as i32,
        }
    }
}

/// Axis-aligned volume of interest in voxel coordinates (inclusive).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Voi {
    pub x_start: f64,
    pub x_end: f64,
    pub y_start: f64,
    pub y_end: f64,
    pub z_start: f64,
    pub z_end: f64,
}

impl Voi {
    /// The VOI covering every voxel.
    pub fn whole(geometry: &VolumeGeometry) -> Self {
        let (w, h, d) = geometry.dimensions;
        Self {
            x_start: 0.0,
            x_end: w.saturating_sub(1) as f64,
            y_start: 0.0,
            y_end: h.saturating_sub(1) as f64,
            z_start: 0.0,
            z_end: d.saturating_sub(1) as f64,
        }
    }
}

#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Pod, Zeroable)]
pub struct NormalizedVoi {
    pub left: i32,
    pub right: i32,
    pub posterior: i32,
    pub anterior: i32,
    pub head: i32,
    pub foot: i32,
}
