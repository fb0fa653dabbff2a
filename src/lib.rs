pub mod config;
pub mod constants;
pub mod error;
pub mod interaction;
pub mod inventory;
pub mod lab;
pub mod lifecycle;
pub mod phase_state;
pub mod phase_transition;
pub mod presentation;
pub mod run_registry;
pub mod session;
pub mod sim;
pub mod temp_utils;

pub use config::VignetteConfig;
pub use error::{LabError, LabResult};
pub use lab::Lab;
pub use phase_state::{LabPhase, PhaseState};
pub use phase_transition::PhaseTransitionController;
pub use run_registry::{RunId, RunRegistry, SharedRunRegistry};
pub use session::{SessionEntry, SessionRecorder};
