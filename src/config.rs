use crate::enums::MprType;
use crate::error::MprError;

use serde::{Deserialize, Serialize};
use std::{fs, path::Path};

/// Highest label a user mask may carry. Label 0 is the whole volume.
pub const MAX_OBJECT_COUNT: u8 = 15;

/// Window width and level of a label nobody has configured yet.
pub const DEFAULT_WINDOW: [f32; 2] = [400.0, 40.0];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MprConfig {
    /// Upper bound for mask labels, label 0 excluded
    pub max_object_count: u8,
    /// Size of the volume-rendered view (width, height)
    pub vr_viewport: [u32; 2],
    pub default_mpr_type: MprType,
    /// Window width and level given to a freshly created label 0
    pub default_window: [f32; 2],
}

impl Default for MprConfig {
    fn default() -> Self {
        Self {
            max_object_count: MAX_OBJECT_COUNT,
            vr_viewport: [512, 512],
            default_mpr_type: MprType::Average,
            default_window: DEFAULT_WINDOW,
        }
    }
}

impl MprConfig {
    pub fn from_toml_str(source: &str) -> Result<Self, MprError> {
        Ok(toml::from_str(source)?)
    }

    /// Load a config file. Missing keys fall back to their defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, MprError> {
        let source = fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&source)
    }
}
