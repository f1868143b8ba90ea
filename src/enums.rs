use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlaneType {
    Axial,
    Sagittal,
    Coronal,
    AxialOblique,
    SagittalOblique,
    CoronalOblique,
    /// Volume-rendered 3D view. Has no `PlaneInfo` entry.
    VR,
    NotDefined,
}

/// Groups of mutually coupled planes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlaneGroup {
    Canonical,
    Oblique,
}

impl PlaneType {
    /// The six plane types that live inside the volume, in reset order.
    pub const IN_VOLUME: [PlaneType; 6] = [
        PlaneType::Axial,
        PlaneType::Sagittal,
        PlaneType::Coronal,
        PlaneType::AxialOblique,
        PlaneType::SagittalOblique,
        PlaneType::CoronalOblique,
    ];

    pub fn group(&self) -> Option<PlaneGroup> {
        match self {
            PlaneType::Axial | PlaneType::Sagittal | PlaneType::Coronal => {
                Some(PlaneGroup::Canonical)
            }
            PlaneType::AxialOblique | PlaneType::SagittalOblique | PlaneType::CoronalOblique => {
                Some(PlaneGroup::Oblique)
            }
            PlaneType::VR | PlaneType::NotDefined => None,
        }
    }

    pub fn is_oblique(&self) -> bool {
        matches!(self.group(), Some(PlaneGroup::Oblique))
    }

    /// The two other members of this plane's group.
    pub fn cross_planes(&self) -> Option<[PlaneType; 2]> {
        match self {
            PlaneType::Axial => Some([PlaneType::Sagittal, PlaneType::Coronal]),
            PlaneType::Sagittal => Some([PlaneType::Axial, PlaneType::Coronal]),
            PlaneType::Coronal => Some([PlaneType::Axial, PlaneType::Sagittal]),
            PlaneType::AxialOblique => {
                Some([PlaneType::SagittalOblique, PlaneType::CoronalOblique])
            }
            PlaneType::SagittalOblique => {
                Some([PlaneType::AxialOblique, PlaneType::CoronalOblique])
            }
            PlaneType::CoronalOblique => {
                Some([PlaneType::AxialOblique, PlaneType::SagittalOblique])
            }
            PlaneType::VR | PlaneType::NotDefined => None,
        }
    }

    /// All three members of this plane's group.
    pub fn group_members(&self) -> Option<[PlaneType; 3]> {
        match self.group()? {
            PlaneGroup::Canonical => Some([PlaneType::Axial, PlaneType::Sagittal, PlaneType::Coronal]),
            PlaneGroup::Oblique => Some([
                PlaneType::AxialOblique,
                PlaneType::SagittalOblique,
                PlaneType::CoronalOblique,
            ]),
        }
    }
}

/// How slab samples along the plane normal are composited into one pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum MprType {
    #[default]
    Average,
    /// Maximum intensity projection
    MIP,
    /// Minimum intensity projection
    MinIP,
}
