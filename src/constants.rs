// Thermal limits
pub const MAX_TEMPERATURE_C: f64 = 150.0;
pub const START_TEMPERATURE_C: f64 = 0.0;
pub const TO_KELVIN: f64 = 273.15;

// default rates (per second of heated time)
pub const HEAT_RATE_C_PER_S: f64 = 10.0;
pub const MELT_RATE_PER_S: f64 = 0.005;
pub const RISE_RATE_PER_S: f64 = 0.05;

// Solid block geometry
pub const INITIAL_SOLID_SCALE: f64 = 0.2;
pub const MELT_THRESHOLD_SCALE: f64 = 0.05; // solid is "gone" at or below this edge length

/// Float slack applied to the melt threshold so that accumulated tick error
/// does not delay the transition by a frame.
pub const SCALE_COMPARE_EPSILON: f64 = 1e-9;

// Liquid geometry
pub const LIQUID_SEED_HEIGHT: f64 = 0.01;
pub const LIQUID_REST_SCALE: [f64; 3] = [0.3, 0.12, 0.3];
pub const LIQUID_REST_POSITION: [f64; 3] = [0.0, 0.9, 0.0];
/// The container contents rise at half the fill rate (hand-tuned visual coupling).
pub const POSITION_RISE_FACTOR: f64 = 0.5;

// Lifecycle
pub const SHUTDOWN_DELAY_S: f64 = 5.0;
pub const HOVER_MESSAGE_DURATION_S: f64 = 999.0;
pub const ACTION_MESSAGE_DURATION_S: f64 = 3.0;

// Session defaults
pub const RUN_NAME: &str = "Ice melting";
pub const RUN_DESCRIPTION: &str = "Phase change from solid to liquid";
pub const RUN_MODALITY: &str = "VR";
pub const RESULT_LABEL_FINAL_TEMPERATURE: &str = "Final temperature";
pub const RESULT_UNIT_CELSIUS: &str = "°C";
