//! Camera of the volume-rendered view.
//!
//! The rotation maps view coordinates (screen x, depth, screen y) to object
//! coordinates. Preset views reset the rotation and keep zoom and pan.

use crate::vector::{Point3d, rotation_about_axis};

use glam::{DMat3, DVec2, DVec3};
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Camera {
    rotation: DMat3,
    scale: f64,
    translate: DVec2,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            rotation: DMat3::IDENTITY,
            scale: 1.0,
            translate: DVec2::ZERO,
        }
    }
}

impl Camera {
    pub fn rotation(&self) -> DMat3 {
        self.rotation
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    pub fn translate(&self) -> DVec2 {
        self.translate
    }

    /// Row-major rotation for upload.
    pub fn rotate_matrix(&self) -> [f32; 9] {
        self.rotation.transpose().as_mat3().to_cols_array()
    }

    /// Turn the view by `dx` degrees about the screen's vertical axis and `dy`
    /// degrees about its horizontal axis, on top of the current rotation.
    pub fn rotate(&mut self, dx: f64, dy: f64) {
        let (Some(yaw), Some(pitch)) = (
            rotation_about_axis(DVec3::Z, dx),
            rotation_about_axis(DVec3::X, dy),
        ) else {
            return;
        };
        self.rotation = yaw * pitch * self.rotation;
        debug!(dx, dy, "rotated camera");
    }

    fn preset(&mut self, pitch: f64, yaw: f64) {
        self.rotation = DMat3::IDENTITY;
        self.rotate(yaw, pitch);
    }

    pub fn anterior(&mut self) {
        self.preset(0.0, 0.0);
    }

    pub fn posterior(&mut self) {
        self.preset(0.0, 180.0);
    }

    pub fn left(&mut self) {
        self.preset(0.0, -90.0);
    }

    pub fn right(&mut self) {
        self.preset(0.0, 90.0);
    }

    pub fn head(&mut self) {
        self.preset(90.0, 180.0);
    }

    pub fn foot(&mut self) {
        self.preset(-90.0, 0.0);
    }

    pub fn zoom(&mut self, ratio: f64) {
        self.scale *= ratio;
    }

    pub fn pan(&mut self, dx: f64, dy: f64) {
        self.translate += DVec2::new(dx, dy);
    }

    /// Pixel position of an object-space offset from the volume centre, for a
    /// volume of physical size `extent` fitted into `viewport`.
    pub fn project(&self, offset: Point3d, extent: DVec3, viewport: [u32; 2]) -> (f64, f64) {
        let (width, height) = (viewport[0] as f64, viewport[1] as f64);
        let view = self.rotation.transpose() * offset;
        let spacing = (extent.x / width).max(extent.z / height) / self.scale;
        (
            (width - 1.0) / 2.0 + view.x / spacing + self.translate.x,
            (height - 1.0) / 2.0 + view.z / spacing + self.translate.y,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    #[test]
    fn test_identity_projection() {
        let camera = Camera::default();
        let (x, y) = camera.project(DVec3::new(10.0, 0.0, 5.0), DVec3::splat(100.0), [100, 100]);
        assert!((x - 59.5).abs() < EPS);
        assert!((y - 54.5).abs() < EPS);
    }

    #[test]
    fn test_rotation_then_preset() {
        let mut camera = Camera::default();
        camera.rotate(90.0, 0.0);
        let (x, _) = camera.project(DVec3::new(10.0, 0.0, 5.0), DVec3::splat(100.0), [100, 100]);
        assert!((x - 49.5).abs() < EPS);

        camera.zoom(2.0);
        camera.anterior();
        assert!(camera.rotation().abs_diff_eq(DMat3::IDENTITY, EPS));
        assert_eq!(camera.scale(), 2.0);
    }

    #[test]
    fn test_zoom_and_pan() {
        let mut camera = Camera::default();
        camera.zoom(2.0);
        camera.pan(3.0, -1.0);
        let (x, y) = camera.project(DVec3::new(10.0, 0.0, 0.0), DVec3::splat(100.0), [100, 100]);
        assert!((x - (49.5 + 20.0 + 3.0)).abs() < EPS);
        assert!((y - (49.5 - 1.0)).abs() < EPS);
    }

    #[test]
    fn test_presets_are_rotations() {
        let mut camera = Camera::default();
        let presets: [fn(&mut Camera); 5] = [
            Camera::posterior,
            Camera::left,
            Camera::right,
            Camera::head,
            Camera::foot,
        ];
        for preset in presets {
            preset(&mut camera);
            let r = camera.rotation();
            assert!((r.determinant() - 1.0).abs() < EPS);
            assert!((r * r.transpose()).abs_diff_eq(DMat3::IDENTITY, EPS));
        }
    }

    #[test]
    fn test_rotate_matrix_is_row_major() {
        let mut camera = Camera::default();
        camera.rotate(90.0, 0.0);
        let m = camera.rotate_matrix();
        // first row of R_z(90) is (0, -1, 0)
        assert!((m[1] + 1.0).abs() < 1e-6);
        assert!(m[0].abs() < 1e-6);
    }
}
