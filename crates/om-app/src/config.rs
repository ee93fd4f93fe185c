//! Dashboard configuration

use std::path::{Path, PathBuf};

use egui::{pos2, vec2, Rect};
use om_core::SelectionState;
use om_data::{SourceConfig, DEFAULT_DISCIPLINE_LIMIT};
use om_views::{DetailConfig, OverviewConfig, TimelineConfig};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

/// Environment variable naming a JSON config file
pub const CONFIG_ENV_VAR: &str = "OM_DASHBOARD_CONFIG";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse config '{}': {source}", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Everything the dashboard needs to start
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct DashboardConfig {
    /// Table locations
    #[serde(flatten)]
    pub source: SourceConfig,

    /// Country focused before any interaction
    pub default_country_code: String,
    pub default_country_name: String,

    /// Rows in the detail heatmap
    pub discipline_limit: usize,

    /// Entries kept per aggregation table
    pub cache_entries: usize,

    /// Treemap area as `[x, y, width, height]`
    pub overview_bounds: [f32; 4],

    pub timeline_width: f32,
    pub timeline_height: f32,

    /// Heatmap cell as `[width, height]`
    pub detail_cell_size: [f32; 2],
}

impl Default for DashboardConfig {
    fn default() -> Self {
        let selection = SelectionState::default();
        Self {
            source: SourceConfig::default(),
            default_country_code: selection.selected_country_code,
            default_country_name: selection.selected_country_name,
            discipline_limit: DEFAULT_DISCIPLINE_LIMIT,
            cache_entries: 64,
            overview_bounds: [0.0, 0.0, 960.0, 480.0],
            timeline_width: 960.0,
            timeline_height: 320.0,
            detail_cell_size: [80.0, 28.0],
        }
    }
}

impl DashboardConfig {
    /// Read a JSON config; missing fields take their defaults
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&text).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        info!(path = %path.display(), "Loaded dashboard config");
        Ok(config)
    }

    /// Load from the file named by `OM_DASHBOARD_CONFIG`, or use defaults
    pub fn from_env() -> Result<Self, ConfigError> {
        match std::env::var_os(CONFIG_ENV_VAR) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => {
                info!("No {CONFIG_ENV_VAR} set, using default config");
                Ok(Self::default())
            }
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.discipline_limit == 0 {
            return Err(ConfigError::Invalid("discipline_limit must be at least 1".to_string()));
        }
        if self.default_country_code.trim().is_empty() {
            return Err(ConfigError::Invalid("default_country_code is empty".to_string()));
        }
        let [_, _, width, height] = self.overview_bounds;
        let sizes = [
            ("overview width", width),
            ("overview height", height),
            ("timeline_width", self.timeline_width),
            ("timeline_height", self.timeline_height),
            ("detail cell width", self.detail_cell_size[0]),
            ("detail cell height", self.detail_cell_size[1]),
        ];
        if let Some((name, _)) = sizes.iter().find(|(_, v)| !(v.is_finite() && *v > 0.0)) {
            return Err(ConfigError::Invalid(format!("{name} must be positive")));
        }
        Ok(())
    }

    pub fn initial_selection(&self) -> SelectionState {
        SelectionState::new(&self.default_country_code, &self.default_country_name)
    }

    pub fn overview_config(&self) -> OverviewConfig {
        let [x, y, width, height] = self.overview_bounds;
        OverviewConfig {
            bounds: Rect::from_min_size(pos2(x, y), vec2(width, height)),
            ..OverviewConfig::default()
        }
    }

    pub fn timeline_config(&self) -> TimelineConfig {
        TimelineConfig {
            bounds: Rect::from_min_size(pos2(0.0, 0.0), vec2(self.timeline_width, self.timeline_height)),
            ..TimelineConfig::default()
        }
    }

    pub fn detail_config(&self) -> DetailConfig {
        let [width, height] = self.detail_cell_size;
        DetailConfig {
            cell_size: vec2(width, height),
            ..DetailConfig::default()
        }
    }
}
