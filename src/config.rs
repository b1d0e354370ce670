use std::fs;
use std::path::{Path, PathBuf};

use anyhow::Context;
use serde::{Deserialize, Serialize};

use crate::canvas::ContainerSize;
use crate::gradient::DisabledStopEdits;
use crate::types::{ParameterMetadata, ParameterValues};

pub const CONFIG_ENV_VAR: &str = "RD_PANEL_CONFIG";
pub const CONFIG_FILE_NAME: &str = "reaction-diffusion.json";

/// Startup settings. Every field is optional in the file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub parameters: ParameterValues,
    pub canvas: ContainerSize,
    pub disabled_stop_edits: DisabledStopEdits,
    pub steps_per_frame: usize,
    /// Simulation grid size relative to the canvas.
    pub render_scale: f32,
    pub export_dir: PathBuf,
    pub seed_image: Option<PathBuf>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            parameters: ParameterValues::default(),
            canvas: ContainerSize::default(),
            disabled_stop_edits: DisabledStopEdits::default(),
            steps_per_frame: 8,
            render_scale: 0.5,
            export_dir: PathBuf::from("."),
            seed_image: None,
        }
    }
}

impl AppConfig {
    pub fn default_path() -> PathBuf {
        if let Some(path) = std::env::var_os(CONFIG_ENV_VAR) {
            return PathBuf::from(path);
        }
        std::env::current_dir()
            .unwrap_or_else(|_| PathBuf::from("."))
            .join(CONFIG_FILE_NAME)
    }

    pub fn load_from_disk(path: &Path) -> anyhow::Result<Self> {
        let data = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let mut config: Self = serde_json::from_str(&data)
            .with_context(|| format!("parsing config {}", path.display()))?;
        config.sanitize(&ParameterMetadata::default());
        Ok(config)
    }

    /// Falls back to defaults when the file is absent or unreadable.
    pub fn load_or_default(path: &Path) -> Self {
        if !path.exists() {
            log::info!("no config at {}, using defaults", path.display());
            return Self::default();
        }
        match Self::load_from_disk(path) {
            Ok(config) => {
                log::info!("loaded config from {}", path.display());
                config
            }
            Err(err) => {
                log::warn!("{err:#}; using defaults");
                Self::default()
            }
        }
    }

    pub fn sanitize(&mut self, metadata: &ParameterMetadata) {
        self.parameters.sanitize(metadata);
        self.canvas.width = self.canvas.width.max(1);
        self.canvas.height = self.canvas.height.max(1);
        self.steps_per_frame = self.steps_per_frame.clamp(1, 64);
        self.render_scale = if self.render_scale.is_finite() {
            self.render_scale.clamp(0.1, 1.0)
        } else {
            0.5
        };
    }
}
