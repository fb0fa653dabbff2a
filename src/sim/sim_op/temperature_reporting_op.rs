/// Temperature reporting operation
/// Reports the pot's thermal state every N% of the frame budget

use crate::phase_state::LabPhase;
use crate::sim::sim_op::{SimOp, SimOpHandle};
use crate::sim::Simulation;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct TemperatureReport {
    pub frame: u64,
    pub elapsed_s: f64,
    pub temperature_c: f64,
    pub melt_fraction: f64,
    pub liquid_level: f64,
    pub phase: LabPhase,
}

/// Shared view of the reports, readable after the op is boxed into a `Simulation`
pub type ReportLog = Rc<RefCell<Vec<TemperatureReport>>>;

pub struct TemperatureReportingOp {
    pub report_frequency_percent: f64,
    last_reported_frame: Option<u64>,
    reports: ReportLog,
}

impl TemperatureReportingOp {
    pub fn new() -> Self {
        Self::with_frequency(10.0) // Report every 10% of simulation
    }

    pub fn with_frequency(report_frequency_percent: f64) -> Self {
        Self {
            report_frequency_percent,
            last_reported_frame: None,
            reports: ReportLog::default(),
        }
    }

    pub fn handle(report_frequency_percent: f64) -> SimOpHandle {
        SimOpHandle::new(Box::new(Self::with_frequency(report_frequency_percent)))
    }

    pub fn reports(&self) -> ReportLog {
        self.reports.clone()
    }

    fn should_report(&self, sim: &Simulation) -> bool {
        if sim.max_frames == 0 || self.report_frequency_percent <= 0.0 {
            return false;
        }

        let milestone = |frame: u64| {
            let progress_percent = frame as f64 / sim.max_frames as f64 * 100.0;
            (progress_percent / self.report_frequency_percent).floor() as i64
        };

        match self.last_reported_frame {
            None => true,
            Some(last) => milestone(sim.frame) > milestone(last),
        }
    }

    fn take_report(&mut self, sim: &Simulation) {
        let controller = &sim.lab.controller;
        let report = TemperatureReport {
            frame: sim.frame,
            elapsed_s: sim.elapsed_s,
            temperature_c: controller.temperature_c(),
            melt_fraction: controller.melt_fraction(),
            liquid_level: controller.state().liquid_level(),
            phase: controller.phase(),
        };

        info!(
            frame = report.frame,
            elapsed_s = report.elapsed_s,
            temperature_c = report.temperature_c,
            melt_fraction = report.melt_fraction,
            liquid_level = report.liquid_level,
            phase = ?report.phase,
            "thermal state"
        );

        self.last_reported_frame = Some(sim.frame);
        self.reports.borrow_mut().push(report);
    }
}

impl Default for TemperatureReportingOp {
    fn default() -> Self {
        Self::new()
    }
}

impl SimOp for TemperatureReportingOp {
    fn name(&self) -> &str {
        "TemperatureReportingOp"
    }

    fn update_sim(&mut self, sim: &mut Simulation) {
        if self.should_report(sim) {
            self.take_report(sim);
        }
    }

    fn after_sim(&mut self, sim: &mut Simulation) {
        self.take_report(sim);
    }
}
