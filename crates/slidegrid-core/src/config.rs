//! Editor configuration.

use crate::format::PageFormat;
use crate::interaction::InteractionController;
use crate::settings::GridSettings;
use crate::store::{MAX_ZOOM, MIN_ZOOM, PresentationStore, ZOOM_STEP};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Default export quality multiplier.
pub const EXPORT_SCALE: f64 = 5.0;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Startup settings for a new editing session.
///
/// Every field is optional in the JSON form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct EditorConfig {
    pub default_format: PageFormat,
    pub grid: GridSettings,
    pub initial_zoom: f64,
    pub zoom_step: f64,
    pub export_scale: f64,
    pub export_dir: PathBuf,
}

impl Default for EditorConfig {
    fn default() -> Self {
        Self {
            default_format: PageFormat::Widescreen,
            grid: GridSettings::default(),
            initial_zoom: 1.0,
            zoom_step: ZOOM_STEP,
            export_scale: EXPORT_SCALE,
            export_dir: PathBuf::from("."),
        }
    }
}

impl EditorConfig {
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        Ok(config.normalized())
    }

    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        log::debug!("Loaded config from {}", path.display());
        Self::from_json(&json)
    }

    /// Fresh one-page presentation using the configured format, grid and zoom.
    pub fn new_store(&self) -> PresentationStore {
        PresentationStore::with_settings(self.default_format, self.grid.clone(), self.initial_zoom)
    }

    pub fn new_controller(&self) -> InteractionController {
        InteractionController::new().with_zoom_step(self.zoom_step)
    }

    /// Pull out-of-range values back into their valid ranges.
    pub fn normalized(mut self) -> Self {
        self.grid = self.grid.normalized();
        self.initial_zoom = if self.initial_zoom.is_finite() {
            self.initial_zoom.clamp(MIN_ZOOM, MAX_ZOOM)
        } else {
            1.0
        };
        if !(self.zoom_step.is_finite() && self.zoom_step > 0.0) {
            self.zoom_step = ZOOM_STEP;
        }
        if !(self.export_scale.is_finite() && self.export_scale > 0.0) {
            self.export_scale = EXPORT_SCALE;
        }
        self
    }
}
