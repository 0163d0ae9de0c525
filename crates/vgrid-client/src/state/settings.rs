//! Gallery settings
//!
//! Layered from defaults, the per-user settings file, an explicit file and
//! `VGRID_*` environment variables, in that order.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use vgrid_layout::LayoutConfig;
use vgrid_protocol::Viewport;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    /// Grid tuning
    pub layout: LayoutConfig,
    /// Viewport assumed until the first resize event
    pub viewport: Viewport,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            viewport: Viewport::new(1280, 720),
        }
    }
}

impl Settings {
    /// Get the per-user settings file path
    pub fn settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("vgrid").join("settings.json"))
    }

    /// Load settings, optionally overlaying an explicit file
    pub fn load(explicit: Option<&Path>) -> Result<Self> {
        let mut builder = config::Config::builder();

        match Self::settings_path() {
            Some(path) => {
                tracing::debug!("Looking for settings in {:?}", path);
                builder = builder.add_source(config::File::from(path).required(false));
            }
            None => tracing::warn!("Could not determine config directory"),
        }

        if let Some(path) = explicit {
            builder = builder.add_source(config::File::from(path.to_path_buf()).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("VGRID")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let settings: Settings = builder
            .build()
            .context("Failed to read settings")?
            .try_deserialize()
            .context("Failed to parse settings")?;

        settings
            .layout
            .validate()
            .context("Invalid layout settings")?;

        tracing::info!(
            "Loaded settings: min cell width {}, offset {}, {} tiles per page, origin {:?}",
            settings.layout.min_cell_width,
            settings.layout.offset,
            settings.layout.max_tiles,
            settings.layout.origin
        );
        Ok(settings)
    }
}
