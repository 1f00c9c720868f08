use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Deserialize;

/// Environment variable naming a JSON configuration file.
pub const CONFIG_ENV_VAR: &str = "SALES_DASHBOARD_CONFIG";

/// Configuration file picked up from the working directory when present.
pub const DEFAULT_CONFIG_FILE: &str = "sales_dashboard.json";

// ---------------------------------------------------------------------------
// Configuration types
// ---------------------------------------------------------------------------

/// Top-level dashboard configuration. Every field has a default, so a
/// config file only needs the keys it wants to change.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub source: SourceConfig,
    /// Currency label shown in the metric panels.
    pub currency: String,
    pub map: MapConfig,
}

/// Where the transactions come from and how the sheet is laid out.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(default)]
pub struct SourceConfig {
    pub path: PathBuf,
    /// Worksheet name (spreadsheet sources only).
    pub sheet_name: String,
    /// Rows above the header row (spreadsheet sources only).
    pub skip_rows: usize,
    /// Column-letter range, e.g. `B:R` (spreadsheet sources only).
    pub columns: String,
    /// Maximum number of data rows read.
    pub max_rows: usize,
}

/// Synthetic customer-location layer.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct MapConfig {
    pub center_lat: f64,
    pub center_lon: f64,
    /// Standard deviation of the point cloud, in degrees.
    pub spread_deg: f64,
    pub points: usize,
    pub seed: u64,
    /// Hexagon radius of the density layer, in metres.
    pub hex_radius_m: f64,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            source: SourceConfig::default(),
            currency: "GBP".to_string(),
            map: MapConfig::default(),
        }
    }
}

impl Default for SourceConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from("supermarkt_sales.xlsx"),
            sheet_name: "Sales".to_string(),
            skip_rows: 3,
            columns: "B:R".to_string(),
            max_rows: 1000,
        }
    }
}

impl Default for MapConfig {
    fn default() -> Self {
        Self {
            center_lat: 52.4,
            center_lon: -1.89,
            spread_deg: 1.0 / 50.0,
            points: 1000,
            seed: 42,
            hex_radius_m: 200.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Loading
// ---------------------------------------------------------------------------

impl DashboardConfig {
    /// Parse a JSON configuration file.
    pub fn from_path(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {}", path.display()))?;
        serde_json::from_str(&text)
            .with_context(|| format!("parsing config file {}", path.display()))
    }

    /// Resolve the effective configuration.
    ///
    /// Precedence: `env_path` (from [`CONFIG_ENV_VAR`]), then
    /// [`DEFAULT_CONFIG_FILE`] if it exists, then built-in defaults. The
    /// first positional argument, if any, replaces the source path.
    pub fn resolve(env_path: Option<PathBuf>, mut args: impl Iterator<Item = String>) -> Result<Self> {
        let mut config = match env_path {
            Some(path) => Self::from_path(&path)?,
            None => {
                let local = Path::new(DEFAULT_CONFIG_FILE);
                if local.exists() {
                    Self::from_path(local)?
                } else {
                    log::debug!("no {DEFAULT_CONFIG_FILE} found, using defaults");
                    Self::default()
                }
            }
        };

        if let Some(source) = args.next() {
            config.source.path = PathBuf::from(source);
        }
        Ok(config)
    }
}
