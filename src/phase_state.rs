use crate::config::VignetteConfig;
use crate::constants::START_TEMPERATURE_C;
use glam::DVec3;
use serde::{Deserialize, Serialize};

/// Where the vignette is in its run
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LabPhase {
    /// Nothing in the container
    Idle,
    /// Solid loaded; melting whenever the heat is on
    Heating,
    /// Solid gone and liquid revealed, before the run is reported
    Transitioned,
    /// Run reported and finalized; the liquid keeps filling while heated
    Completed,
}

/// Mutable simulation state owned by the controller.
///
/// The solid's melt progress is carried by its uniform scale; the liquid
/// level is the y component of the liquid scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PhaseState {
    pub phase: LabPhase,
    pub has_substance_loaded: bool,
    pub heat_enabled: bool,
    pub temperature_c: f64,
    pub transition_complete: bool,

    pub solid_visible: bool,
    pub solid_scale: DVec3,

    pub liquid_visible: bool,
    pub liquid_scale: DVec3,
    pub liquid_position: DVec3,
}

impl PhaseState {
    /// Idle configuration for a given setup
    pub fn idle(config: &VignetteConfig) -> Self {
        Self {
            phase: LabPhase::Idle,
            has_substance_loaded: false,
            heat_enabled: false,
            temperature_c: START_TEMPERATURE_C,
            transition_complete: false,
            solid_visible: false,
            solid_scale: DVec3::splat(config.initial_solid_scale),
            liquid_visible: false,
            liquid_scale: config.liquid_rest_scale,
            liquid_position: config.liquid_rest_position,
        }
    }

    /// Remaining solid proportion, 1.0 for a fresh block and 0.0 when fully melted
    pub fn melt_fraction(&self, config: &VignetteConfig) -> f64 {
        if config.initial_solid_scale <= 0.0 {
            return 0.0;
        }
        (self.solid_scale.x / config.initial_solid_scale).clamp(0.0, 1.0)
    }

    pub fn liquid_level(&self) -> f64 {
        if self.liquid_visible {
            self.liquid_scale.y
        } else {
            0.0
        }
    }
}
