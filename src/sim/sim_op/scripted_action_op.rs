use crate::interaction::InteractionOutcome;
use crate::sim::sim_op::{SimOp, SimOpHandle};
use crate::sim::Simulation;
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::rc::Rc;
use tracing::{debug, warn};

/// Something the player (or an operator script) does to the lab
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(tag = "action", content = "target", rename_all = "snake_case")]
pub enum LabAction {
    HoverEnter(String),
    HoverExit(String),
    Interact(String),
    Reset,
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScriptedAction {
    pub at_s: f64,
    #[serde(flatten)]
    pub action: LabAction,
}

impl ScriptedAction {
    pub fn new(at_s: f64, action: LabAction) -> Self {
        Self { at_s, action }
    }
}

/// What a scripted action did, stamped with the frame start time it fired on
#[derive(Clone, Debug, PartialEq)]
pub struct ActionRecord {
    pub fired_at_s: f64,
    pub action: LabAction,
    pub outcome: Option<InteractionOutcome>,
}

/// Shared view of the records, readable after the op is boxed into a `Simulation`
pub type ActionLog = Rc<RefCell<Vec<ActionRecord>>>;

/// Scripted Action Operator
///
/// Replays a timed list of player actions. Each action fires once, on the
/// first frame whose start time has reached `at_s`.
#[derive(Debug, Clone)]
pub struct ScriptedActionOp {
    script: Vec<ScriptedAction>,
    next: usize,
    log: ActionLog,
}

impl ScriptedActionOp {
    pub fn new(mut script: Vec<ScriptedAction>) -> Self {
        script.sort_by(|a, b| a.at_s.total_cmp(&b.at_s));
        Self {
            script,
            next: 0,
            log: ActionLog::default(),
        }
    }

    /// Parse a script from JSON, e.g. `[{"at_s": 1.0, "action": "interact", "target": "freezer"}]`
    pub fn from_json_str(json_str: &str) -> serde_json::Result<Self> {
        let script: Vec<ScriptedAction> = serde_json::from_str(json_str)?;
        Ok(Self::new(script))
    }

    pub fn handle(script: Vec<ScriptedAction>) -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::new(script)))
    }

    pub fn log(&self) -> ActionLog {
        self.log.clone()
    }

    pub fn remaining(&self) -> usize {
        self.script.len() - self.next
    }
}

impl SimOp for ScriptedActionOp {
    fn name(&self) -> &str {
        "ScriptedActionOp"
    }

    fn update_sim(&mut self, sim: &mut Simulation) {
        while let Some(scripted) = self.script.get(self.next) {
            if scripted.at_s > sim.elapsed_s {
                break;
            }

            let outcome = match &scripted.action {
                LabAction::HoverEnter(name) => {
                    sim.lab.hover_enter(name);
                    None
                }
                LabAction::HoverExit(name) => {
                    sim.lab.hover_exit(name);
                    None
                }
                LabAction::Interact(name) => sim.lab.interact(name),
                LabAction::Reset => {
                    sim.lab.controller.reset();
                    None
                }
            };

            debug!(at_s = scripted.at_s, action = ?scripted.action, ?outcome, "scripted action");
            self.log.borrow_mut().push(ActionRecord {
                fired_at_s: sim.elapsed_s,
                action: scripted.action.clone(),
                outcome,
            });
            self.next += 1;
        }
    }

    fn after_sim(&mut self, _sim: &mut Simulation) {
        if self.remaining() > 0 {
            warn!(remaining = self.remaining(), "simulation ended before the script finished");
        }
    }
}
