//! One-shot buttons of the panel. None of them carries a bound value.

use std::fs;
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::canvas::SimulationHost;
use crate::error::PanelError;
use crate::types::SeedType;

pub const EXPORT_FILE_NAME: &str = "reaction-diffusion.png";

pub fn restart(host: &mut dyn SimulationHost, seed: SeedType) {
    log::info!("restarting simulation with {} seed", seed.label());
    host.draw_first_frame(seed);
}

pub fn toggle_pause(paused: &mut bool) {
    *paused = !*paused;
    log::info!("simulation {}", if *paused { "paused" } else { "resumed" });
}

/// Writes the current surface as `reaction-diffusion.png` inside `dir`.
pub fn save_image(host: &dyn SimulationHost, dir: &Path) -> Result<PathBuf, PanelError> {
    let snapshot = host.snapshot().ok_or(PanelError::EmptySurface)?;
    let (width, height) = (snapshot.width, snapshot.height);
    let image = RgbaImage::from_raw(width, height, snapshot.rgba)
        .ok_or(PanelError::MalformedSurface { width, height })?;

    if !dir.as_os_str().is_empty() {
        fs::create_dir_all(dir)?;
    }
    let path = dir.join(EXPORT_FILE_NAME);
    image
        .save_with_format(&path, ImageFormat::Png)
        .map_err(|source| PanelError::Image {
            path: path.clone(),
            source,
        })?;
    Ok(path)
}

/// Export as triggered from the panel: the outcome is only logged.
pub fn save_image_detached(host: &dyn SimulationHost, dir: &Path) {
    match save_image(host, dir) {
        Ok(path) => log::info!("saved image to {}", path.display()),
        Err(err) => log::error!("failed to save image: {err}"),
    }
}
