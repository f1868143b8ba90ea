//! # MPR-state library
//!
//! This crate holds the spatial state of a multiplanar reconstruction (MPR)
//! viewer: the oriented cutting planes through a volume, the cross-hair that
//! couples them, rotation of the oblique planes and the registry of labelled
//! object masks with their rendering parameters.
//!
//! It produces no pixels. A renderer asks the [`PlaneRegistry`] for the
//! geometry of a plane ([`SliceGeometry`]) and the [`ObjectRegistry`] for
//! per-label transfer functions and windows, and resamples the volume itself.
//!
//! The volume is kept in a [`VolumeStore`]. [`Volume`] is an in-memory store
//! over `ndarray` arrays; any other storage can implement the trait.
//!
//! Six planes exist while a volume is loaded:
//!  - Axial, Sagittal and Coronal, fixed to the volume axes
//!  - AxialOblique, SagittalOblique and CoronalOblique, which rotate as a
//!    group about the cross-hair
//!
//! The volume-rendered view ([`PlaneType::VR`]) has no plane of its own; its
//! camera lives in [`Camera`].
//!
//! Object space is measured in physical units with the origin at the corner
//! of the first voxel.
//!
//! # Examples
//!
//! ## Scrolling and rotating
//!
//! Load a volume, move the axial slice two slices up and tilt the other
//! oblique planes by 30 degrees about the axial normal.
//!
//! ```
//! # use mpr_state::{MprConfig, PlaneType, Viewer, Volume};
//! # use glam::DVec3;
//! # use ndarray::Array3;
//! let volume = Volume::new(Array3::zeros((64, 128, 128)), DVec3::new(0.7, 0.7, 1.5));
//! let mut viewer = Viewer::new(volume, MprConfig::default());
//!
//! let planes = viewer.planes_mut();
//! let index = planes.plane_index(PlaneType::Axial).unwrap();
//! planes.set_plane_index(index + 2, PlaneType::Axial).unwrap();
//! planes.rotate(30.0, PlaneType::AxialOblique).unwrap();
//!
//! let slice = viewer.planes().slice_geometry(PlaneType::SagittalOblique).unwrap();
//! assert_eq!(slice.width % 2, 0);
//! ```

pub mod batch;
pub mod camera;
pub mod config;
pub mod cross_hair;
pub mod enums;
pub mod error;
pub mod object;
pub mod plane;
mod rotation;
pub mod transform;
pub mod vector;
pub mod viewer;
pub mod volume;
pub mod volume_geometry;

pub use batch::BatchInfo;
pub use camera::Camera;
pub use config::{DEFAULT_WINDOW, MAX_OBJECT_COUNT, MprConfig};
pub use cross_hair::CrossHair;
pub use enums::{MprType, PlaneGroup, PlaneType};
pub use error::MprError;
pub use object::{AlphaWindow, ObjectInfo, ObjectRegistry, Rgba, TransferFunctionSampler};
pub use plane::{PlaneInfo, PlaneRegistry};
pub use transform::{PlaneUniform, SliceGeometry};
pub use vector::{Direction2d, Direction3d, Point3d};
pub use viewer::Viewer;
pub use volume::{Orientation, Volume, VolumeStore};
pub use volume_geometry::{NormalizedVoi, Voi, VolumeGeometry};
