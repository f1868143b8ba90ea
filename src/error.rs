use crate::enums::PlaneType;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum MprError {
    #[error("No volume loaded")]
    NoVolume,

    #[error("Plane {0:?} is not initialized")]
    PlaneNotFound(PlaneType),

    #[error("Plane {0:?} is not part of the oblique group")]
    NotOblique(PlaneType),

    #[error("Label {0} does not exist, add a mask first")]
    LabelNotFound(u8),

    #[error("Label {0} is out of range")]
    LabelOutOfRange(u8),

    #[error("All object labels are in use")]
    LabelsFull,

    #[error("Rotation would leave plane {0:?} with a degenerate basis")]
    DegenerateBasis(PlaneType),

    #[error("Mask dimensions {found:?} do not match volume dimensions {expected:?}")]
    MaskDimensions {
        expected: (usize, usize, usize),
        found: (usize, usize, usize),
    },

    #[error("Spacing must be positive on every axis")]
    InvalidSpacing,

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Config error: {0}")]
    Config(#[from] toml::de::Error),
}
