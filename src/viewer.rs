use crate::camera::Camera;
use crate::config::MprConfig;
use crate::enums::PlaneType;
use crate::error::MprError;
use crate::object::{ObjectInfo, ObjectRegistry, Rgba};
use crate::plane::PlaneRegistry;
use crate::volume::VolumeStore;
use crate::volume_geometry::{NormalizedVoi, Voi, VolumeGeometry};

use glam::DVec3;
use ndarray::{Array3, ArrayView3};
use tracing::{info, warn};

/// One viewer session: the volume, the plane and label state derived from it,
/// and the camera of the 3D view.
///
/// All mutation goes through `&mut self`. A renderer on another thread has to
/// share the whole `Viewer` behind one lock, since a rotation changes two
/// planes at once.
pub struct Viewer<V: VolumeStore> {
    volume: V,
    config: MprConfig,
    planes: PlaneRegistry,
    objects: ObjectRegistry,
    camera: Camera,
    background: Rgba,
}

impl<V: VolumeStore> Viewer<V> {
    pub fn new(volume: V, config: MprConfig) -> Self {
        let [ww, wl] = config.default_window;
        let objects = ObjectRegistry::new(config.max_object_count, ObjectInfo::with_window(ww, wl));
        let mut viewer = Self {
            volume,
            config,
            planes: PlaneRegistry::new(),
            objects,
            camera: Camera::default(),
            background: Rgba::new(0.0, 0.0, 0.0, 1.0),
        };
        viewer.reload();
        viewer
    }

    /// Replace the volume. Planes, cross-hair, labels and camera start over.
    pub fn set_volume(&mut self, volume: V) {
        self.volume = volume;
        self.reload();
    }

    fn reload(&mut self) {
        self.camera = Camera::default();
        match VolumeGeometry::from_store(&self.volume) {
            Some(geometry) => {
                self.planes.reset(geometry, self.config.default_mpr_type);
                self.objects.reset();
                info!(dimensions = ?geometry.dimensions, "loaded volume");
            }
            None => {
                self.planes.clear();
                self.objects.clear();
                warn!("volume has no data, viewer is empty");
            }
        }
    }

    /// Rebuild the planes for the current volume. Labels are kept.
    pub fn reset(&mut self) -> Result<(), MprError> {
        let geometry = VolumeGeometry::from_store(&self.volume).ok_or(MprError::NoVolume)?;
        self.planes.reset(geometry, self.config.default_mpr_type);
        Ok(())
    }

    pub fn set_spacing(&mut self, x: f64, y: f64, z: f64) -> Result<(), MprError> {
        self.volume.set_spacing(DVec3::new(x, y, z))?;
        self.reset()
    }

    pub fn volume(&self) -> &V {
        &self.volume
    }

    pub fn config(&self) -> &MprConfig {
        &self.config
    }

    pub fn planes(&self) -> &PlaneRegistry {
        &self.planes
    }

    pub fn planes_mut(&mut self) -> &mut PlaneRegistry {
        &mut self.planes
    }

    pub fn objects(&self) -> &ObjectRegistry {
        &self.objects
    }

    pub fn objects_mut(&mut self) -> &mut ObjectRegistry {
        &mut self.objects
    }

    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    pub fn camera_mut(&mut self) -> &mut Camera {
        &mut self.camera
    }

    pub fn background(&self) -> Rgba {
        self.background
    }

    pub fn set_background(&mut self, color: Rgba) {
        self.background = color;
    }

    /// Image pixel of the cross-hair on `plane`, including the 3D view.
    pub fn cross_hair_point(&self, plane: PlaneType) -> Option<(f64, f64)> {
        if plane != PlaneType::VR {
            return self.planes.cross_hair_point(plane);
        }
        let geometry = self.planes.geometry()?;
        let offset = self.planes.cross_hair() - self.planes.center_point();
        Some(
            self.camera
                .project(offset, geometry.extent(), self.config.vr_viewport),
        )
    }

    pub fn plane_max_size(&self, plane: PlaneType) -> Option<(usize, usize)> {
        self.planes.plane_max_size(plane, self.config.vr_viewport)
    }

    /// Row-major orientation of `plane`; the camera rotation for the 3D view.
    pub fn plane_rotate_matrix(&self, plane: PlaneType) -> Option<[f32; 9]> {
        if plane == PlaneType::VR {
            return Some(self.camera.rotate_matrix());
        }
        self.planes.rotate_matrix(plane)
    }

    /// VOI bounds in anatomical order; the whole volume when `voi` is `None`.
    pub fn normalized_voi(&self, voi: Option<Voi>) -> Option<NormalizedVoi> {
        let geometry = self.planes.geometry()?;
        let voi = voi.unwrap_or_else(|| Voi::whole(geometry));
        Some(geometry.normalize_voi(&voi))
    }

    /// Store `mask` under a newly allocated label and make it active.
    pub fn add_object_mask(&mut self, mask: ArrayView3<'_, u8>) -> Result<u8, MprError> {
        if !self.volume.has_data() {
            return Err(MprError::NoVolume);
        }
        let label = self.objects.next_label().inspect_err(|_| {
            warn!("failed to add new mask, since the labels are full");
        })?;
        self.volume.add_object_mask(mask, label)?;
        self.objects.insert_label(label);
        Ok(label)
    }

    pub fn update_object_mask(&mut self, mask: ArrayView3<'_, u8>, label: u8) -> Result<(), MprError> {
        if self.objects.get(label).is_none() {
            return Err(MprError::LabelNotFound(label));
        }
        self.volume.update_object_mask(mask, label)
    }

    pub fn update_active_object_mask(&mut self, mask: ArrayView3<'_, u8>) -> Result<(), MprError> {
        let label = self.objects.active_label().ok_or(MprError::NoVolume)?;
        self.update_object_mask(mask, label)
    }

    /// Erase `label` from the mask and free it for reuse.
    pub fn remove_object_mask(&mut self, label: u8) -> Result<ObjectInfo, MprError> {
        if label == 0 {
            return Err(MprError::LabelOutOfRange(label));
        }
        if self.objects.get(label).is_none() {
            return Err(MprError::LabelNotFound(label));
        }
        let (width, height, depth) = self.volume.dimensions();
        let empty = Array3::<u8>::zeros((depth, height, width));
        self.volume.update_object_mask(empty.view(), label)?;
        self.objects.remove_label(label)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::volume::Volume;

    fn viewer() -> Viewer<Volume> {
        let volume = Volume::new(Array3::zeros((8, 10, 12)), DVec3::new(1.0, 1.0, 2.0));
        Viewer::new(volume, MprConfig::default())
    }

    #[test]
    fn test_new_viewer_is_reset() {
        let viewer = viewer();
        assert_eq!(viewer.planes().len(), 6);
        assert_eq!(viewer.objects().active_label(), Some(0));
        assert_eq!(viewer.planes().cross_hair(), DVec3::new(6.0, 5.0, 8.0));
    }

    #[test]
    fn test_empty_volume() {
        let mut viewer = Viewer::new(Volume::default(), MprConfig::default());
        assert!(viewer.planes().is_empty());
        assert!(viewer.objects().is_empty());
        assert_eq!(viewer.objects().active_label(), None);
        assert!(matches!(viewer.reset(), Err(MprError::NoVolume)));
        let mask = Array3::<u8>::zeros((1, 1, 1));
        assert!(matches!(viewer.add_object_mask(mask.view()), Err(MprError::NoVolume)));
    }

    #[test]
    fn test_mask_lifecycle() {
        let mut viewer = viewer();
        let mut mask = Array3::<u8>::zeros((8, 10, 12));
        mask[[1, 2, 3]] = 1;
        let label = viewer.add_object_mask(mask.view()).unwrap();
        assert_eq!(label, 1);
        assert_eq!(viewer.volume().mask()[[1, 2, 3]], 1);

        let mut moved = Array3::<u8>::zeros((8, 10, 12));
        moved[[4, 4, 4]] = 1;
        viewer.update_active_object_mask(moved.view()).unwrap();
        assert_eq!(viewer.volume().mask()[[1, 2, 3]], 0);
        assert_eq!(viewer.volume().mask()[[4, 4, 4]], 1);

        viewer.remove_object_mask(label).unwrap();
        assert_eq!(viewer.volume().mask()[[4, 4, 4]], 0);
        assert!(viewer.objects().get(label).is_none());
    }

    #[test]
    fn test_registry_add_mask_leaves_voxels_alone() {
        let mut viewer = viewer();
        let label = viewer.objects_mut().add_mask().unwrap();
        assert_eq!(viewer.objects().active_label(), Some(label));
        assert!(viewer.volume().mask().iter().all(|&v| v == 0));
    }

    #[test]
    fn test_bad_mask_does_not_allocate_label() {
        let mut viewer = viewer();
        let mask = Array3::<u8>::zeros((2, 2, 2));
        assert!(viewer.add_object_mask(mask.view()).is_err());
        assert_eq!(viewer.objects().len(), 1);
        assert_eq!(viewer.objects().active_label(), Some(0));
    }

    #[test]
    fn test_set_spacing_resets_planes_keeps_labels() {
        let mut viewer = viewer();
        viewer.objects_mut().add_mask().unwrap();
        viewer.planes_mut().browse(3.0, PlaneType::Axial).unwrap();
        viewer.set_spacing(0.5, 0.5, 0.5).unwrap();
        assert_eq!(viewer.planes().cross_hair(), DVec3::new(3.0, 2.5, 2.0));
        assert_eq!(viewer.objects().len(), 2);
        assert!(viewer.set_spacing(0.0, 1.0, 1.0).is_err());
    }

    #[test]
    fn test_vr_queries() {
        let mut viewer = viewer();
        assert_eq!(viewer.plane_max_size(PlaneType::VR), Some((512, 512)));
        assert_eq!(viewer.cross_hair_point(PlaneType::VR), Some((255.5, 255.5)));
        viewer.camera_mut().pan(2.0, 0.0);
        assert_eq!(viewer.cross_hair_point(PlaneType::VR), Some((257.5, 255.5)));
        assert!(viewer.plane_rotate_matrix(PlaneType::VR).is_some());
        assert!(viewer.plane_rotate_matrix(PlaneType::NotDefined).is_none());
    }

    #[test]
    fn test_whole_volume_voi() {
        let viewer = viewer();
        let voi = viewer.normalized_voi(None).unwrap();
        assert_eq!((voi.left, voi.right), (0, 11));
        assert_eq!((voi.head, voi.foot), (0, 7));
    }
}
