use glam::DVec3;
use mpr_state::{MprConfig, MprError, PlaneType, Viewer, Volume};
use ndarray::Array3;
use tracing::info;
use tracing_subscriber::EnvFilter;

fn main() -> Result<(), MprError> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = match std::env::args().nth(1) {
        Some(path) => MprConfig::load(path)?,
        None => MprConfig::default(),
    };

    // A sphere of 1000 HU in a 128 x 128 x 64 block
    let data = Array3::from_shape_fn((64, 128, 128), |(z, y, x)| {
        let d = DVec3::new(x as f64 - 64.0, y as f64 - 64.0, 2.0 * (z as f64 - 32.0));
        if d.length() < 40.0 { 1000 } else { -1000 }
    });
    let sphere = data.mapv(|v| u8::from(v > 0));
    let mut viewer = Viewer::new(Volume::new(data, DVec3::new(0.8, 0.8, 1.6)), config);

    let label = viewer.add_object_mask(sphere.view())?;
    viewer.objects_mut().set_window_level(2000.0, 0.0, Some(label))?;

    let planes = viewer.planes_mut();
    planes.browse(5.0, PlaneType::Axial)?;
    planes.rotate(30.0, PlaneType::AxialOblique)?;
    planes.pan_cross_hair(40.0, 60.0, PlaneType::Coronal)?;

    for plane in PlaneType::IN_VOLUME {
        if let Some(slice) = viewer.planes().slice_geometry(plane) {
            info!(
                ?plane,
                width = slice.width,
                height = slice.height,
                index = viewer.planes().plane_index(plane),
                normal = ?slice.normal,
                "plane geometry"
            );
        }
    }
    info!(cross_hair = ?viewer.planes().cross_hair(), vr = ?viewer.cross_hair_point(PlaneType::VR), "cross-hair");
    Ok(())
}
