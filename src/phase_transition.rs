use crate::config::VignetteConfig;
use crate::constants::{
    RESULT_LABEL_FINAL_TEMPERATURE, RESULT_UNIT_CELSIUS, SCALE_COMPARE_EPSILON, START_TEMPERATURE_C,
};
use crate::lifecycle::{DeferredAction, DeferredScheduler, LifecycleHost, TaskId};
use crate::phase_state::{LabPhase, PhaseState};
use crate::presentation::Presentation;
use crate::run_registry::{RunId, SharedRunRegistry};
use crate::session::SessionRecorder;
use crate::temp_utils::{display_celsius, elapsed_whole_seconds, format_result_celsius};
use glam::DVec3;
use tracing::{debug, info, warn};

const HEAT_EVENT_DETAIL: &str = "The operator toggled the heat source";

/// The run this controller currently holds in the registry
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ActiveRun {
    pub id: RunId,
    pub started_at_s: f64,
}

/// Drives one solid block through heating, melting and filling.
///
/// All entry points are infallible. A refused action (a second solid while
/// a run is in progress) logs a diagnostic and leaves the state untouched.
/// Presentation and host collaborators are optional; missing ones are skipped.
pub struct PhaseTransitionController {
    config: VignetteConfig,
    state: PhaseState,
    registry: SharedRunRegistry,
    recorder: Box<dyn SessionRecorder>,
    presentation: Presentation,
    host: Option<Box<dyn LifecycleHost>>,
    scheduler: DeferredScheduler,
    shutdown_task: Option<TaskId>,
    run: Option<ActiveRun>,
    clock_s: f64,
    termination_requested: bool,
}

impl PhaseTransitionController {
    pub fn new(
        config: VignetteConfig,
        registry: SharedRunRegistry,
        recorder: impl SessionRecorder + 'static,
    ) -> Self {
        let state = PhaseState::idle(&config);
        Self {
            config,
            state,
            registry,
            recorder: Box::new(recorder),
            presentation: Presentation::default(),
            host: None,
            scheduler: DeferredScheduler::new(),
            shutdown_task: None,
            run: None,
            clock_s: 0.0,
            termination_requested: false,
        }
    }

    pub fn with_presentation(mut self, presentation: Presentation) -> Self {
        self.presentation = presentation;
        self.report_missing_capabilities();
        self.sync_presentation();
        self
    }

    pub fn with_host(mut self, host: impl LifecycleHost + 'static) -> Self {
        self.host = Some(Box::new(host));
        self
    }

    // ----------------------------------------------------
    // Accessors
    // ----------------------------------------------------

    pub fn config(&self) -> &VignetteConfig {
        &self.config
    }

    pub fn state(&self) -> &PhaseState {
        &self.state
    }

    pub fn phase(&self) -> LabPhase {
        self.state.phase
    }

    pub fn temperature_c(&self) -> f64 {
        self.state.temperature_c
    }

    pub fn heat_enabled(&self) -> bool {
        self.state.heat_enabled
    }

    pub fn melt_fraction(&self) -> f64 {
        self.state.melt_fraction(&self.config)
    }

    pub fn active_run(&self) -> Option<ActiveRun> {
        self.run
    }

    pub fn current_run_id(&self) -> Option<RunId> {
        self.run.map(|run| run.id)
    }

    /// Seconds of host time seen through `advance`
    pub fn clock_s(&self) -> f64 {
        self.clock_s
    }

    pub fn shutdown_pending(&self) -> bool {
        self.shutdown_task
            .is_some_and(|task| self.scheduler.is_pending(task))
    }

    pub fn shutdown_remaining_s(&self) -> Option<f64> {
        self.shutdown_task
            .and_then(|task| self.scheduler.remaining_s(task))
    }

    pub fn termination_requested(&self) -> bool {
        self.termination_requested
    }

    /// Whether `receive_solid` would start a run right now
    pub fn can_receive_solid(&self) -> bool {
        !self.registry.borrow().is_active()
    }

    // ----------------------------------------------------
    // Operator actions
    // ----------------------------------------------------

    /// The player puts the solid block into the container and a run starts
    pub fn receive_solid(&mut self) {
        let run_id = {
            let mut registry = self.registry.borrow_mut();
            if let Some(active) = registry.current() {
                warn!(%active, "simulation already active; no new run will be recorded");
                return;
            }
            match registry.try_acquire() {
                Some(id) => id,
                None => {
                    warn!("run registry refused a new run");
                    return;
                }
            }
        };

        self.state.has_substance_loaded = true;
        self.state.temperature_c = START_TEMPERATURE_C;
        self.state.transition_complete = false;
        self.state.solid_visible = true;
        self.state.solid_scale = DVec3::splat(self.config.initial_solid_scale);
        self.state.liquid_visible = false;
        self.state.phase = LabPhase::Heating;

        if let Some(solid) = self.presentation.solid.as_mut() {
            solid.set_visible(true);
            solid.set_scale(self.state.solid_scale);
        }
        if let Some(liquid) = self.presentation.liquid.as_mut() {
            liquid.set_visible(false);
        }
        if let Some(display) = self.presentation.display.as_mut() {
            display.set_temperature_text(display_celsius(self.state.temperature_c));
        }

        self.run = Some(ActiveRun {
            id: run_id,
            started_at_s: self.clock_s,
        });

        let session = &self.config.session;
        self.recorder.start_run(
            run_id,
            session.user_id,
            &session.run_name,
            &session.run_description,
            &session.modality,
        );

        info!(run = %run_id, user_id = session.user_id, "solid received; run started");
    }

    /// Flip the heat source. Has no visible effect until a solid is loaded.
    pub fn toggle_heat(&mut self) {
        self.state.heat_enabled = !self.state.heat_enabled;
        let enabled = self.state.heat_enabled;

        if let Some(light) = self.presentation.light.as_mut() {
            light.set_enabled(enabled);
        }

        let title = if enabled { "Heat enabled" } else { "Heat disabled" };
        self.record_event(title, HEAT_EVENT_DETAIL);

        info!(enabled, "heat source toggled");
    }

    /// Log an operator event against the current run, stamped with the clock
    pub fn record_event(&mut self, title: &str, detail: &str) {
        let run = self.current_run_id();
        self.recorder
            .record_event(run, title, detail, self.clock_s as i64);
    }

    /// Back to idle from any state, including mid-transition.
    ///
    /// An unfinished run is finalized with its run-relative duration and
    /// released. A pending shutdown is cancelled.
    pub fn reset(&mut self) {
        let previous = self.state.phase;
        self.state = PhaseState::idle(&self.config);
        self.sync_presentation();

        if let Some(run) = self.run.take() {
            let duration_s = elapsed_whole_seconds(self.clock_s, run.started_at_s);
            self.recorder.finalize_run(run.id, duration_s);
            self.registry.borrow_mut().release(run.id);
            info!(run = %run.id, duration_s, "run finalized by reset");
        }

        if self.cancel_shutdown() {
            info!("pending shutdown cancelled by reset");
        }

        debug!(?previous, "controller reset to idle");
    }

    /// Returns true if a scheduled shutdown was pending and is now cancelled
    pub fn cancel_shutdown(&mut self) -> bool {
        match self.shutdown_task.take() {
            Some(task) => self.scheduler.cancel(task),
            None => false,
        }
    }

    // ----------------------------------------------------
    // Per-frame update
    // ----------------------------------------------------

    /// Advance by one frame of `dt` seconds.
    ///
    /// Deferred tasks count down every frame. The simulation itself only
    /// moves while a solid is loaded and the heat is on.
    pub fn advance(&mut self, dt: f64) {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        self.clock_s += dt;
        self.run_due_tasks(dt);

        if !self.state.has_substance_loaded || !self.state.heat_enabled {
            return;
        }

        self.integrate_temperature(dt);
        self.melt_solid(dt);
        self.raise_liquid(dt);
    }

    fn integrate_temperature(&mut self, dt: f64) {
        self.state.temperature_c =
            (self.state.temperature_c + dt * self.config.heat_rate_c_per_s)
                .min(self.config.max_temperature_c);

        // the completion message stays up once the run is reported
        if self.state.transition_complete {
            return;
        }
        if let Some(display) = self.presentation.display.as_mut() {
            display.set_temperature_text(display_celsius(self.state.temperature_c));
        }
    }

    fn melt_solid(&mut self, dt: f64) {
        if !self.state.solid_visible || self.state.transition_complete {
            return;
        }

        let shrink = DVec3::splat(dt * self.config.melt_rate_per_s);
        self.state.solid_scale = (self.state.solid_scale - shrink).max(DVec3::ZERO);
        if let Some(solid) = self.presentation.solid.as_mut() {
            solid.set_scale(self.state.solid_scale);
        }

        let threshold = self.config.melt_threshold_scale + SCALE_COMPARE_EPSILON;
        if self.state.solid_scale.x <= threshold && !self.state.transition_complete {
            self.complete_transition();
        }
    }

    /// One-shot: solid out, liquid in, run reported
    fn complete_transition(&mut self) {
        self.state.solid_scale = DVec3::ZERO;
        self.state.solid_visible = false;

        let rest_scale = self.config.liquid_rest_scale;
        self.state.liquid_visible = true;
        self.state.liquid_scale =
            DVec3::new(rest_scale.x, self.config.liquid_seed_height, rest_scale.z);
        self.state.liquid_position = self.config.liquid_rest_position;

        self.state.transition_complete = true;
        self.state.phase = LabPhase::Transitioned;

        if let Some(solid) = self.presentation.solid.as_mut() {
            solid.set_scale(DVec3::ZERO);
            solid.set_visible(false);
        }
        if let Some(liquid) = self.presentation.liquid.as_mut() {
            liquid.set_visible(true);
            liquid.set_scale(self.state.liquid_scale);
            liquid.set_position(self.state.liquid_position);
        }

        info!(temperature_c = self.state.temperature_c, "solid fully melted");

        self.report_completion();
    }

    fn report_completion(&mut self) {
        match self.run.take() {
            Some(run) => {
                self.recorder.record_result(
                    run.id,
                    RESULT_LABEL_FINAL_TEMPERATURE,
                    &format_result_celsius(self.state.temperature_c),
                    RESULT_UNIT_CELSIUS,
                );

                let duration_s = elapsed_whole_seconds(self.clock_s, run.started_at_s);
                self.recorder.finalize_run(run.id, duration_s);
                self.registry.borrow_mut().release(run.id);

                info!(run = %run.id, duration_s, "simulation completed; results sent");
            }
            None => warn!("transition without an active run; nothing to report"),
        }
        self.state.phase = LabPhase::Completed;

        if let Some(display) = self.presentation.display.as_mut() {
            display.set_completion_text();
        }

        if self.shutdown_task.is_none() {
            let task = self
                .scheduler
                .schedule(self.config.shutdown_delay_s, DeferredAction::TerminateApplication);
            self.shutdown_task = Some(task);
        }
    }

    fn raise_liquid(&mut self, dt: f64) {
        if !self.state.liquid_visible {
            return;
        }

        let target = self.config.liquid_rest_scale.y;
        if self.state.liquid_scale.y < target {
            let rise = (dt * self.config.rise_rate_per_s).min(target - self.state.liquid_scale.y);
            self.state.liquid_scale.y += rise;
            self.state.liquid_position.y += rise * self.config.position_rise_factor;

            if let Some(liquid) = self.presentation.liquid.as_mut() {
                liquid.set_scale(self.state.liquid_scale);
                liquid.set_position(self.state.liquid_position);
            }
            if self.state.liquid_scale.y >= target {
                debug!("liquid at full level");
            }
        }
    }

    fn run_due_tasks(&mut self, dt: f64) {
        for action in self.scheduler.advance(dt) {
            match action {
                DeferredAction::TerminateApplication => {
                    self.shutdown_task = None;
                    self.termination_requested = true;
                    info!("closing application");
                    match self.host.as_mut() {
                        Some(host) => host.terminate_application(),
                        None => debug!("no lifecycle host attached; termination only flagged"),
                    }
                }
            }
        }
    }

    // ----------------------------------------------------
    // Presentation sync
    // ----------------------------------------------------

    /// Push the whole state to every attached capability
    fn sync_presentation(&mut self) {
        let state = &self.state;
        if let Some(solid) = self.presentation.solid.as_mut() {
            solid.set_visible(state.solid_visible);
            solid.set_scale(state.solid_scale);
        }
        if let Some(liquid) = self.presentation.liquid.as_mut() {
            liquid.set_visible(state.liquid_visible);
            liquid.set_scale(state.liquid_scale);
            liquid.set_position(state.liquid_position);
        }
        if let Some(light) = self.presentation.light.as_mut() {
            light.set_enabled(state.heat_enabled);
        }
        if let Some(display) = self.presentation.display.as_mut() {
            display.set_temperature_text(display_celsius(state.temperature_c));
        }
    }

    fn report_missing_capabilities(&self) {
        let p = &self.presentation;
        let missing: Vec<&str> = [
            ("display", p.display.is_none()),
            ("solid", p.solid.is_none()),
            ("liquid", p.liquid.is_none()),
            ("light", p.light.is_none()),
        ]
        .into_iter()
        .filter_map(|(name, absent)| absent.then_some(name))
        .collect();

        if !missing.is_empty() {
            debug!(?missing, "presentation capabilities not attached; updates will be skipped");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::presentation::SceneProbe;
    use crate::run_registry::RunRegistry;
    use crate::session::{MemorySessionRecorder, SessionEntry};
    use approx::assert_abs_diff_eq;
    use more_asserts::{assert_ge, assert_le, assert_lt};
    use std::cell::RefCell;
    use std::rc::Rc;

    struct Lab {
        controller: PhaseTransitionController,
        recorder: Rc<RefCell<MemorySessionRecorder>>,
        registry: SharedRunRegistry,
        probe: SceneProbe,
    }

    fn lab() -> Lab {
        let registry = RunRegistry::shared();
        let recorder = Rc::new(RefCell::new(MemorySessionRecorder::new()));
        let probe = SceneProbe::new();
        let controller =
            PhaseTransitionController::new(VignetteConfig::default(), registry.clone(), recorder.clone())
                .with_presentation(probe.presentation());
        Lab {
            controller,
            recorder,
            registry,
            probe,
        }
    }

    fn run_for(controller: &mut PhaseTransitionController, seconds: f64, dt: f64) {
        let frames = (seconds / dt).round() as usize;
        for _ in 0..frames {
            controller.advance(dt);
        }
    }

    #[test]
    fn test_starts_idle_and_hidden() {
        let lab = lab();
        assert_eq!(lab.controller.phase(), LabPhase::Idle);
        assert!(!lab.probe.solid.borrow().visible);
        assert!(!lab.probe.liquid.borrow().visible);
        assert!(!lab.probe.light.borrow().enabled);
        assert_eq!(lab.probe.display.borrow().celsius, 0);
    }

    #[test]
    fn test_ticks_without_heat_change_nothing() {
        let mut lab = lab();
        lab.controller.receive_solid();
        let before = lab.controller.state().clone();

        run_for(&mut lab.controller, 20.0, 0.25);

        assert_eq!(lab.controller.state(), &before);
    }

    #[test]
    fn test_heat_without_solid_changes_nothing() {
        let mut lab = lab();
        lab.controller.toggle_heat();
        run_for(&mut lab.controller, 20.0, 0.5);

        assert_abs_diff_eq!(lab.controller.temperature_c(), 0.0);
        assert_abs_diff_eq!(lab.controller.melt_fraction(), 1.0);
        assert_eq!(lab.controller.phase(), LabPhase::Idle);
    }

    #[test]
    fn test_fifteen_seconds_reaches_max_temperature() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        lab.controller.advance(15.0);

        assert_abs_diff_eq!(lab.controller.temperature_c(), 150.0);
        assert_eq!(lab.probe.display.borrow().celsius, 150);
    }

    #[test]
    fn test_temperature_monotonic_and_clamped() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();

        let mut last = lab.controller.temperature_c();
        for dt in [0.016, 0.5, 3.0, 0.0, 7.25, 12.0, 0.1] {
            lab.controller.advance(dt);
            let now = lab.controller.temperature_c();
            assert_ge!(now, last);
            assert_le!(now, 150.0);
            last = now;
        }
    }

    #[test]
    fn test_display_truncates_temperature() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        lab.controller.advance(0.39);
        assert_eq!(lab.probe.display.borrow().celsius, 3);
    }

    #[test]
    fn test_transition_after_thirty_heated_seconds() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();

        run_for(&mut lab.controller, 29.5, 0.5);
        assert!(!lab.controller.state().transition_complete);
        assert!(lab.probe.solid.borrow().visible);

        run_for(&mut lab.controller, 0.5, 0.5);
        let state = lab.controller.state();
        assert!(state.transition_complete);
        assert!(!state.solid_visible);
        assert!(state.liquid_visible);
        assert_eq!(state.solid_scale, DVec3::ZERO);
        assert!(lab.probe.liquid.borrow().visible);
        assert!(lab.probe.display.borrow().completed);
    }

    #[test]
    fn test_single_large_step_also_transitions() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        lab.controller.advance(30.0);
        assert!(lab.controller.state().transition_complete);
    }

    #[test]
    fn test_transition_fires_once() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        run_for(&mut lab.controller, 120.0, 0.5);

        assert_eq!(lab.probe.liquid.borrow().times_shown, 1);
        assert_eq!(lab.probe.solid.borrow().times_shown, 1);

        let recorder = lab.recorder.borrow();
        let results = recorder
            .entries()
            .iter()
            .filter(|e| matches!(e, SessionEntry::Result { .. }))
            .count();
        assert_eq!(results, 1);
        assert_eq!(recorder.finalized_runs().len(), 1);
    }

    #[test]
    fn test_completion_reports_result_and_duration() {
        let mut lab = lab();
        lab.controller.advance(4.0); // clock runs before the run starts
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        run_for(&mut lab.controller, 30.0, 0.5);

        let recorder = lab.recorder.borrow();
        let result = recorder
            .entries()
            .iter()
            .find_map(|e| match e {
                SessionEntry::Result { label, value, unit, .. } => Some((label.clone(), value.clone(), unit.clone())),
                _ => None,
            })
            .unwrap();
        assert_eq!(result, ("Final temperature".to_string(), "150.0".to_string(), "°C".to_string()));

        let (_, duration) = recorder.finalized_runs()[0];
        assert_eq!(duration, 30);
        assert!(!lab.registry.borrow().is_active());
    }

    #[test]
    fn test_liquid_rises_at_half_position_rate() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        run_for(&mut lab.controller, 30.0, 0.5);
        assert!(lab.controller.state().liquid_visible);

        let target = lab.controller.config().liquid_rest_scale.y;
        let mut prev = lab.controller.state().clone();
        for _ in 0..200 {
            lab.controller.advance(0.1);
            let next = lab.controller.state().clone();
            let d_height = next.liquid_scale.y - prev.liquid_scale.y;
            let d_pos = next.liquid_position.y - prev.liquid_position.y;

            assert_ge!(d_height, 0.0);
            assert_le!(next.liquid_scale.y, target);
            assert_abs_diff_eq!(d_pos, d_height * 0.5, epsilon = 1e-12);
            prev = next;
        }

        assert_abs_diff_eq!(prev.liquid_scale.y, target, epsilon = 1e-12);
        assert_eq!(lab.controller.phase(), LabPhase::Completed);
    }

    #[test]
    fn test_completed_on_transition_tick() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        run_for(&mut lab.controller, 30.0, 0.5);

        assert!(lab.controller.state().transition_complete);
        assert_lt!(lab.controller.state().liquid_level(), 0.12);
        assert_eq!(lab.controller.phase(), LabPhase::Completed);
    }

    #[test]
    fn test_heat_off_after_melt_still_completed_at_shutdown() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        run_for(&mut lab.controller, 30.0, 0.5);
        lab.controller.toggle_heat();

        run_for(&mut lab.controller, 10.0, 0.5);
        assert!(lab.controller.termination_requested());
        assert_eq!(lab.controller.phase(), LabPhase::Completed);
    }

    #[test]
    fn test_new_run_after_completion() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        run_for(&mut lab.controller, 35.0, 0.5);
        assert!(!lab.registry.borrow().is_active());
        assert!(lab.controller.can_receive_solid());

        lab.controller.receive_solid();

        let state = lab.controller.state();
        assert_eq!(lab.controller.current_run_id(), Some(RunId(2)));
        assert_eq!(state.phase, LabPhase::Heating);
        assert!(!state.transition_complete);
        assert!(state.solid_visible);
        assert!(!state.liquid_visible);
        assert_abs_diff_eq!(state.temperature_c, 0.0);
        assert_abs_diff_eq!(lab.controller.melt_fraction(), 1.0);
        // heat is left as the operator set it
        assert!(state.heat_enabled);
        assert!(lab.probe.solid.borrow().visible);
        assert!(!lab.probe.liquid.borrow().visible);
    }

    #[test]
    fn test_heat_off_freezes_filling() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        run_for(&mut lab.controller, 30.0, 0.5);

        lab.controller.toggle_heat();
        let level = lab.controller.state().liquid_level();
        run_for(&mut lab.controller, 2.0, 0.5);
        assert_abs_diff_eq!(lab.controller.state().liquid_level(), level);
    }

    #[test]
    fn test_second_solid_is_refused_during_run() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        run_for(&mut lab.controller, 10.0, 0.5);

        let state = lab.controller.state().clone();
        let run = lab.controller.current_run_id();
        let entries = lab.recorder.borrow().entries().len();

        lab.controller.receive_solid();

        assert_eq!(lab.controller.state(), &state);
        assert_eq!(lab.controller.current_run_id(), run);
        assert_eq!(lab.recorder.borrow().entries().len(), entries);
    }

    #[test]
    fn test_refused_when_another_controller_holds_the_gate() {
        let mut lab = lab();
        let _other = lab.registry.borrow_mut().try_acquire().unwrap();

        lab.controller.receive_solid();
        assert_eq!(lab.controller.phase(), LabPhase::Idle);
        assert_eq!(lab.controller.current_run_id(), None);
        assert!(lab.recorder.borrow().entries().is_empty());
    }

    #[test]
    fn test_toggle_twice_records_in_order() {
        let mut lab = lab();
        lab.controller.receive_solid();
        let original = lab.controller.heat_enabled();

        lab.controller.toggle_heat();
        assert!(lab.probe.light.borrow().enabled);
        lab.controller.toggle_heat();

        assert_eq!(lab.controller.heat_enabled(), original);
        assert!(!lab.probe.light.borrow().enabled);
        assert_eq!(
            lab.recorder.borrow().event_titles(),
            vec!["Heat enabled", "Heat disabled"]
        );
    }

    #[test]
    fn test_heat_event_timestamp_uses_clock() {
        let mut lab = lab();
        lab.controller.advance(7.8);
        lab.controller.toggle_heat();

        let recorder = lab.recorder.borrow();
        match &recorder.entries()[0] {
            SessionEntry::Event { run, timestamp_s, .. } => {
                assert_eq!(*run, None);
                assert_eq!(*timestamp_s, 7);
            }
            other => panic!("unexpected entry {other:?}"),
        }
    }

    #[test]
    fn test_reset_from_every_phase_is_identical() {
        let idle = {
            let mut lab = lab();
            lab.controller.reset();
            lab.controller.state().clone()
        };

        for heated_s in [0.0, 10.0, 30.0, 60.0] {
            let mut lab = lab();
            lab.controller.receive_solid();
            lab.controller.toggle_heat();
            run_for(&mut lab.controller, heated_s, 0.5);

            lab.controller.reset();

            assert_eq!(lab.controller.state(), &idle, "after {heated_s}s of heating");
            assert!(!lab.probe.solid.borrow().visible);
            assert_eq!(
                lab.probe.solid.borrow().scale,
                DVec3::splat(lab.controller.config().initial_solid_scale)
            );
            assert!(!lab.probe.liquid.borrow().visible);
            assert!(!lab.probe.light.borrow().enabled);
            assert_eq!(lab.probe.display.borrow().celsius, 0);
            assert!(!lab.registry.borrow().is_active());
        }
    }

    #[test]
    fn test_reset_finalizes_with_run_duration() {
        let mut lab = lab();
        lab.controller.advance(100.0);
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        run_for(&mut lab.controller, 12.0, 0.5);

        lab.controller.reset();

        let finalized = lab.recorder.borrow().finalized_runs();
        assert_eq!(finalized.len(), 1);
        assert_eq!(finalized[0].1, 12);
    }

    #[test]
    fn test_reset_after_completion_does_not_finalize_twice() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        run_for(&mut lab.controller, 31.0, 0.5);
        lab.controller.reset();

        assert_eq!(lab.recorder.borrow().finalized_runs().len(), 1);
    }

    #[test]
    fn test_new_run_after_reset() {
        let mut lab = lab();
        lab.controller.receive_solid();
        let first = lab.controller.current_run_id().unwrap();
        lab.controller.reset();

        lab.controller.receive_solid();
        let second = lab.controller.current_run_id().unwrap();
        assert_ne!(first, second);
        assert_eq!(lab.controller.phase(), LabPhase::Heating);
    }

    #[test]
    fn test_shutdown_scheduled_and_fires_after_delay() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        run_for(&mut lab.controller, 30.0, 0.5);

        assert!(lab.controller.shutdown_pending());
        assert!(!lab.controller.termination_requested());

        run_for(&mut lab.controller, 4.5, 0.5);
        assert!(!lab.controller.termination_requested());

        run_for(&mut lab.controller, 0.5, 0.5);
        assert!(lab.controller.termination_requested());
        assert!(!lab.controller.shutdown_pending());
    }

    #[test]
    fn test_reset_cancels_pending_shutdown() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        run_for(&mut lab.controller, 30.0, 0.5);
        assert!(lab.controller.shutdown_pending());

        lab.controller.reset();
        run_for(&mut lab.controller, 10.0, 0.5);
        assert!(!lab.controller.termination_requested());
    }

    #[test]
    fn test_runs_without_presentation() {
        let registry = RunRegistry::shared();
        let mut controller = PhaseTransitionController::new(
            VignetteConfig::default(),
            registry,
            MemorySessionRecorder::new(),
        );
        controller.receive_solid();
        controller.toggle_heat();
        run_for(&mut controller, 40.0, 0.5);

        assert!(controller.state().transition_complete);
        controller.reset();
        assert_eq!(controller.phase(), LabPhase::Idle);
    }

    #[test]
    fn test_negative_and_nan_dt_are_ignored() {
        let mut lab = lab();
        lab.controller.receive_solid();
        lab.controller.toggle_heat();
        lab.controller.advance(-5.0);
        lab.controller.advance(f64::NAN);
        assert_abs_diff_eq!(lab.controller.temperature_c(), 0.0);
        assert_abs_diff_eq!(lab.controller.clock_s(), 0.0);
    }
}
