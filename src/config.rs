//! Vignette configuration: rates, geometry, session labels and UI messages.
//!
//! Every field has a default, so a JSON file only needs to carry the values
//! it overrides. Files are cached by path after the first successful load.

use crate::constants::*;
use crate::error::{LabError, LabResult};
use glam::DVec3;
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Cache for configuration files to avoid repeated disk reads
static CONFIG_CACHE: Lazy<Mutex<HashMap<PathBuf, VignetteConfig>>> =
    Lazy::new(|| Mutex::new(HashMap::new()));

/// Labels sent to the session recorder when a run starts
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub user_id: u64,
    pub run_name: String,
    pub run_description: String,
    pub modality: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            user_id: 0,
            run_name: RUN_NAME.to_string(),
            run_description: RUN_DESCRIPTION.to_string(),
            modality: RUN_MODALITY.to_string(),
        }
    }
}

/// Text shown on the message board after each interaction
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionMessages {
    pub solid_taken: String,
    pub already_holding: String,
    pub solid_placed: String,
    pub nothing_to_place: String,
    pub container_busy: String,
    pub heat_on: String,
    pub heat_off: String,
    pub no_action: String,
}

impl Default for InteractionMessages {
    fn default() -> Self {
        Self {
            solid_taken: "You picked up an ice cube.".to_string(),
            already_holding: "You are already holding an ice cube.".to_string(),
            solid_placed: "You placed the ice in the pot.".to_string(),
            nothing_to_place: "You are not holding anything to place.".to_string(),
            container_busy: "The pot is already in use.".to_string(),
            heat_on: "The stove is on.".to_string(),
            heat_off: "The stove is off.".to_string(),
            no_action: "Nothing happens with this object.".to_string(),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VignetteConfig {
    pub heat_rate_c_per_s: f64,
    pub melt_rate_per_s: f64,
    pub rise_rate_per_s: f64,
    pub max_temperature_c: f64,
    pub initial_solid_scale: f64,
    pub melt_threshold_scale: f64,
    pub liquid_seed_height: f64,
    pub liquid_rest_scale: DVec3,
    pub liquid_rest_position: DVec3,
    pub position_rise_factor: f64,
    pub shutdown_delay_s: f64,
    pub session: SessionConfig,
    pub messages: InteractionMessages,
}

impl Default for VignetteConfig {
    fn default() -> Self {
        Self {
            heat_rate_c_per_s: HEAT_RATE_C_PER_S,
            melt_rate_per_s: MELT_RATE_PER_S,
            rise_rate_per_s: RISE_RATE_PER_S,
            max_temperature_c: MAX_TEMPERATURE_C,
            initial_solid_scale: INITIAL_SOLID_SCALE,
            melt_threshold_scale: MELT_THRESHOLD_SCALE,
            liquid_seed_height: LIQUID_SEED_HEIGHT,
            liquid_rest_scale: DVec3::from_array(LIQUID_REST_SCALE),
            liquid_rest_position: DVec3::from_array(LIQUID_REST_POSITION),
            position_rise_factor: POSITION_RISE_FACTOR,
            shutdown_delay_s: SHUTDOWN_DELAY_S,
            session: SessionConfig::default(),
            messages: InteractionMessages::default(),
        }
    }
}

impl VignetteConfig {
    /// Parse and validate a configuration from a JSON string
    pub fn from_json_str(json_str: &str) -> LabResult<Self> {
        let config: VignetteConfig = serde_json::from_str(json_str)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a configuration file, using the cache if it was loaded before
    pub fn load<P: AsRef<Path>>(file_path: P) -> LabResult<Self> {
        let path_buf = file_path.as_ref().to_path_buf();

        if let Ok(cache) = CONFIG_CACHE.lock() {
            if let Some(config) = cache.get(&path_buf) {
                return Ok(config.clone());
            }
        }

        let json_str = fs::read_to_string(&path_buf)?;
        let config = Self::from_json_str(&json_str)?;

        if let Ok(mut cache) = CONFIG_CACHE.lock() {
            cache.insert(path_buf, config.clone());
        }

        Ok(config)
    }

    /// Drop every cached file so the next `load` reads from disk again
    pub fn clear_cache() {
        if let Ok(mut cache) = CONFIG_CACHE.lock() {
            cache.clear();
        }
    }

    pub fn validate(&self) -> LabResult<()> {
        let non_negative = [
            ("heat_rate_c_per_s", self.heat_rate_c_per_s),
            ("melt_rate_per_s", self.melt_rate_per_s),
            ("rise_rate_per_s", self.rise_rate_per_s),
            ("liquid_seed_height", self.liquid_seed_height),
            ("position_rise_factor", self.position_rise_factor),
            ("shutdown_delay_s", self.shutdown_delay_s),
            ("melt_threshold_scale", self.melt_threshold_scale),
        ];
        for (field, value) in non_negative {
            if !value.is_finite() || value < 0.0 {
                return Err(LabError::InvalidConfig {
                    field,
                    reason: format!("must be a finite non-negative number, got {value}"),
                });
            }
        }

        if !(self.max_temperature_c > 0.0) {
            return Err(LabError::InvalidConfig {
                field: "max_temperature_c",
                reason: format!("must be positive, got {}", self.max_temperature_c),
            });
        }

        if self.melt_threshold_scale >= self.initial_solid_scale {
            return Err(LabError::InvalidConfig {
                field: "melt_threshold_scale",
                reason: format!(
                    "must be below initial_solid_scale ({}), got {}",
                    self.initial_solid_scale, self.melt_threshold_scale
                ),
            });
        }

        if self.liquid_seed_height > self.liquid_rest_scale.y {
            return Err(LabError::InvalidConfig {
                field: "liquid_seed_height",
                reason: format!(
                    "must not exceed the liquid rest height ({})",
                    self.liquid_rest_scale.y
                ),
            });
        }

        Ok(())
    }
}
