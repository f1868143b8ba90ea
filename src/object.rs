use crate::config::DEFAULT_WINDOW;
use crate::error::MprError;

use bytemuck::{Pod, Zeroable};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use tracing::{debug, info, warn};

#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable, Serialize, Deserialize)]
pub struct Rgba {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Rgba {
    pub fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }
}

/// Rendering parameters of one labelled object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ObjectInfo {
    pub alpha: f32,
    pub ww: f32,
    pub wl: f32,
    /// Transfer function colour control points, intensity index -> colour
    pub color_points: BTreeMap<i32, Rgba>,
    /// Optional separate opacity control points, intensity index -> opacity
    pub alpha_points: BTreeMap<i32, f32>,
}

impl Default for ObjectInfo {
    fn default() -> Self {
        let [ww, wl] = DEFAULT_WINDOW;
        Self::with_window(ww, wl)
    }
}

impl ObjectInfo {
    pub fn with_window(ww: f32, wl: f32) -> Self {
        Self {
            alpha: 1.0,
            ww,
            wl,
            color_points: BTreeMap::new(),
            alpha_points: BTreeMap::new(),
        }
    }

    pub fn alpha_window(&self) -> AlphaWindow {
        AlphaWindow {
            alpha: self.alpha,
            ww: self.ww,
            wl: self.wl,
        }
    }
}

/// Per-label scalars in the layout the renderer uploads.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, Pod, Zeroable)]
pub struct AlphaWindow {
    pub alpha: f32,
    pub ww: f32,
    pub wl: f32,
}

/// Turns the sparse control points of an object into a dense lookup table.
pub trait TransferFunctionSampler {
    /// `None` when the object has no usable control points.
    fn sample(&self, info: &ObjectInfo) -> Option<Vec<Rgba>>;
}

/// Label -> [`ObjectInfo`] map plus the active label.
///
/// Label 0 is the whole volume and exists whenever a volume is loaded.
/// Labels `1..=max_object_count` are user masks.
#[derive(Debug, Clone)]
pub struct ObjectRegistry {
    infos: BTreeMap<u8, ObjectInfo>,
    active: Option<u8>,
    max_object_count: u8,
    template: ObjectInfo,
}

impl ObjectRegistry {
    pub fn new(max_object_count: u8, template: ObjectInfo) -> Self {
        Self {
            infos: BTreeMap::new(),
            active: None,
            max_object_count,
            template,
        }
    }

    /// Drop every label and start over with label 0 active.
    pub fn reset(&mut self) {
        self.infos.clear();
        self.infos.insert(0, self.template.clone());
        self.active = Some(0);
    }

    /// Drop every label, as when no volume is loaded.
    pub fn clear(&mut self) {
        self.infos.clear();
        self.active = None;
    }

    pub fn len(&self) -> usize {
        self.infos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.infos.is_empty()
    }

    pub fn max_object_count(&self) -> u8 {
        self.max_object_count
    }

    /// `None` while no volume is loaded.
    pub fn active_label(&self) -> Option<u8> {
        self.active
    }

    pub fn set_active_label(&mut self, label: u8) -> Result<(), MprError> {
        if !self.infos.contains_key(&label) {
            return Err(MprError::LabelNotFound(label));
        }
        self.active = Some(label);
        Ok(())
    }

    pub fn get(&self, label: u8) -> Option<&ObjectInfo> {
        self.infos.get(&label)
    }

    pub fn object_infos(&self) -> &BTreeMap<u8, ObjectInfo> {
        &self.infos
    }

    /// The label the next [`add_mask`](Self::add_mask) would assign: the
    /// smallest unused label starting from 1.
    pub fn next_label(&self) -> Result<u8, MprError> {
        if self.infos.len() > self.max_object_count as usize {
            return Err(MprError::LabelsFull);
        }
        (1..=self.max_object_count)
            .find(|label| !self.infos.contains_key(label))
            .ok_or(MprError::LabelsFull)
    }

    /// Allocate a new label. It inherits the active label's parameters and
    /// becomes active.
    ///
    /// This only books the label; no voxel is stamped with it. To store a
    /// mask in the volume as well, use
    /// [`Viewer::add_object_mask`](crate::viewer::Viewer::add_object_mask).
    pub fn add_mask(&mut self) -> Result<u8, MprError> {
        let label = match self.next_label() {
            Ok(label) => label,
            Err(err) => {
                warn!("failed to add new mask, all {} labels are in use", self.max_object_count);
                return Err(err);
            }
        };
        self.insert_label(label);
        Ok(label)
    }

    pub(crate) fn insert_label(&mut self, label: u8) {
        if self.infos.is_empty() {
            self.infos.insert(0, self.template.clone());
        }
        let inherited = self
            .active
            .and_then(|active| self.infos.get(&active))
            .or_else(|| self.infos.get(&0))
            .cloned()
            .unwrap_or_else(|| self.template.clone());
        self.infos.insert(label, inherited);
        self.active = Some(label);
        info!(label, "added object mask");
    }

    /// Remove a user label. Label 0 cannot be removed. If the removed label
    /// was active, label 0 becomes active.
    pub fn remove_label(&mut self, label: u8) -> Result<ObjectInfo, MprError> {
        if label == 0 {
            return Err(MprError::LabelOutOfRange(label));
        }
        let removed = self
            .infos
            .remove(&label)
            .ok_or(MprError::LabelNotFound(label))?;
        if self.active == Some(label) {
            self.active = Some(0);
        }
        debug!(label, "removed object mask");
        Ok(removed)
    }

    /// `label`, or the active label when `None`. Fails while no volume is
    /// loaded, whichever label is asked for.
    fn resolve(&self, label: Option<u8>) -> Result<u8, MprError> {
        let active = self.active.ok_or(MprError::NoVolume)?;
        Ok(label.unwrap_or(active))
    }

    fn check_range(&self, label: u8) -> Result<(), MprError> {
        if label > self.max_object_count {
            return Err(MprError::LabelOutOfRange(label));
        }
        Ok(())
    }

    /// Replace the colour control points of `label` (active label when
    /// `None`), and the opacity control points when given. The label must exist.
    pub fn set_transfer_function(
        &mut self,
        color_points: BTreeMap<i32, Rgba>,
        alpha_points: Option<BTreeMap<i32, f32>>,
        label: Option<u8>,
    ) -> Result<(), MprError> {
        let label = self.resolve(label)?;
        self.check_range(label)?;
        let Some(info) = self.infos.get_mut(&label) else {
            tracing::error!(label, "invalid label, add a mask first");
            return Err(MprError::LabelNotFound(label));
        };
        info.color_points = color_points;
        if let Some(alpha_points) = alpha_points {
            info.alpha_points = alpha_points;
        }
        debug!(label, "set transfer function");
        Ok(())
    }

    /// Only the label range is checked. An in-range label that was never
    /// allocated gets a fresh entry.
    pub fn set_window_level(&mut self, ww: f32, wl: f32, label: Option<u8>) -> Result<(), MprError> {
        let label = self.resolve(label)?;
        self.check_range(label)?;
        let info = self.entry(label);
        info.ww = ww;
        info.wl = wl;
        debug!(label, ww, wl, "set window level");
        Ok(())
    }

    /// Only the label range is checked, like [`set_window_level`](Self::set_window_level).
    pub fn set_opacity(&mut self, alpha: f32, label: Option<u8>) -> Result<(), MprError> {
        let label = self.resolve(label)?;
        self.check_range(label)?;
        self.entry(label).alpha = alpha;
        debug!(label, alpha, "set object alpha");
        Ok(())
    }

    fn entry(&mut self, label: u8) -> &mut ObjectInfo {
        let template = &self.template;
        self.infos
            .entry(label)
            .or_insert_with(|| template.clone())
    }

    /// Alpha and window of every label, indexed by label. Unused slots are zero.
    pub fn alpha_window_table(&self) -> Vec<AlphaWindow> {
        let mut table = vec![AlphaWindow::zeroed(); self.max_object_count as usize + 1];
        for (&label, info) in &self.infos {
            if let Some(slot) = table.get_mut(label as usize) {
                *slot = info.alpha_window();
            }
        }
        table
    }

    /// Sampled transfer functions of every label that has one.
    pub fn lookup_tables<S: TransferFunctionSampler + ?Sized>(
        &self,
        sampler: &S,
    ) -> BTreeMap<u8, Vec<Rgba>> {
        self.infos
            .iter()
            .filter_map(|(&label, info)| sampler.sample(info).map(|table| (label, table)))
            .collect()
    }
}
