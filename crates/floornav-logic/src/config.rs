//! Planner configuration.
//!
//! Loaded from JSON; every field has a default so a partial (or empty `{}`)
//! file is valid:
//!
//! ```
//! use floornav_logic::config::PlannerConfig;
//!
//! let config = PlannerConfig::from_json_str(r#"{ "astar": { "floor_penalty": 5 } }"#).unwrap();
//! assert_eq!(config.astar.floor_penalty, 5);
//! assert_eq!(config.grid.rows, 40);
//! ```

use crate::error::ConfigError;
use crate::grid::GridSize;
use serde::{Deserialize, Serialize};
use std::path::Path;

mod defaults {
    pub fn grid_dim() -> usize {
        40
    }

    pub fn name_prefix() -> String {
        "Floor".to_string()
    }
}

/// Top-level planner configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlannerConfig {
    #[serde(default)]
    pub grid: GridSection,

    #[serde(default)]
    pub astar: AStarSettings,

    #[serde(default)]
    pub floors: FloorSection,
}

/// Grid dimensions for newly created plans.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridSection {
    #[serde(default = "defaults::grid_dim")]
    pub rows: usize,

    #[serde(default = "defaults::grid_dim")]
    pub cols: usize,
}

impl Default for GridSection {
    fn default() -> Self {
        Self {
            rows: defaults::grid_dim(),
            cols: defaults::grid_dim(),
        }
    }
}

impl GridSection {
    pub fn size(&self) -> GridSize {
        GridSize::new(self.rows, self.cols)
    }
}

/// A* tuning.
///
/// The heuristic is `manhattan(row, col) + floor_penalty * |Δfloor|`. Only a
/// penalty of 0 is admissible in general: an elevator crosses any number of
/// floors in a single step, so any positive penalty can overestimate and the
/// returned route may be longer than the shortest one.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AStarSettings {
    #[serde(default)]
    pub floor_penalty: usize,
}

impl AStarSettings {
    pub fn with_floor_penalty(floor_penalty: usize) -> Self {
        Self { floor_penalty }
    }

    /// True when the heuristic never overestimates, so routes are shortest.
    pub fn is_admissible(&self) -> bool {
        self.floor_penalty == 0
    }
}

/// Naming of floors added without an explicit name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FloorSection {
    #[serde(default = "defaults::name_prefix")]
    pub default_name_prefix: String,
}

impl Default for FloorSection {
    fn default() -> Self {
        Self {
            default_name_prefix: defaults::name_prefix(),
        }
    }
}

impl FloorSection {
    /// Name for the floor at `index` ("Floor 1" for index 0).
    pub fn default_name(&self, index: usize) -> String {
        format!("{} {}", self.default_name_prefix, index + 1)
    }
}

impl PlannerConfig {
    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        let config: PlannerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        Self::from_json_str(&text)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grid.rows == 0 || self.grid.cols == 0 {
            return Err(ConfigError::Invalid(format!(
                "grid must be at least 1x1, got {}x{}",
                self.grid.rows, self.grid.cols
            )));
        }
        if self.floors.default_name_prefix.trim().is_empty() {
            return Err(ConfigError::Invalid(
                "floors.default_name_prefix must not be empty".to_string(),
            ));
        }
        Ok(())
    }
}
