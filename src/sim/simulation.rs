use crate::lab::Lab;
use crate::sim::sim_op::{SimOp, SimOpHandle};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::time::{Duration, Instant};
use tracing::info;

#[derive(Debug, Clone)]
pub struct OpTiming {
    pub op_name: String,
    pub init_time: Duration,
    pub total_update_time: Duration,
    pub update_call_count: u32,
    pub after_time: Duration,
}

impl OpTiming {
    pub fn new(op_name: String) -> Self {
        Self {
            op_name,
            init_time: Duration::ZERO,
            total_update_time: Duration::ZERO,
            update_call_count: 0,
            after_time: Duration::ZERO,
        }
    }

    pub fn avg_update_time(&self) -> Duration {
        if self.update_call_count > 0 {
            self.total_update_time / self.update_call_count
        } else {
            Duration::ZERO
        }
    }

    pub fn total_time(&self) -> Duration {
        self.init_time + self.total_update_time + self.after_time
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// The controller's deferred shutdown fired
    Terminated,
    /// Ran out of frames first
    FrameBudget,
}

/// Caller-owned frame loop around a [`Lab`].
///
/// Each frame runs every op, then advances the controller by the frame's
/// `dt`. Frame times can be jittered to mimic a real render loop.
pub struct Simulation {
    pub lab: Lab,
    pub ops: Vec<Box<dyn SimOp>>,
    pub name: String,
    pub frame: u64,
    pub max_frames: u64,
    pub frame_dt_s: f64,
    pub frame_jitter: f64,
    pub elapsed_s: f64,
    pub op_timings: Vec<OpTiming>,
    rng: StdRng,
}

pub struct SimProps {
    pub lab: Lab,
    pub name: &'static str,
    pub ops: Vec<SimOpHandle>,
    pub frame_dt_s: f64,
    pub max_frames: u64,
    /// Relative frame-time noise, 0.1 means ±10%
    pub frame_jitter: f64,
    pub seed: u64,
}

impl Simulation {
    pub fn new(props: SimProps) -> Simulation {
        let ops: Vec<Box<dyn SimOp>> = props.ops.into_iter().map(|handle| handle.op).collect();
        let op_timings = ops
            .iter()
            .map(|op| OpTiming::new(op.name().to_string()))
            .collect();

        Simulation {
            lab: props.lab,
            ops,
            name: props.name.to_string(),
            frame: 0,
            max_frames: props.max_frames,
            frame_dt_s: props.frame_dt_s.max(0.0),
            frame_jitter: props.frame_jitter.clamp(0.0, 1.0),
            elapsed_s: 0.0,
            op_timings,
            rng: StdRng::seed_from_u64(props.seed),
        }
    }

    /// Run until the vignette asks to close or the frame budget runs out
    pub fn run(&mut self) -> StopReason {
        info!(name = %self.name, max_frames = self.max_frames, "simulation starting");
        self.simulate_init();

        let reason = loop {
            if self.frame >= self.max_frames {
                break StopReason::FrameBudget;
            }
            self.step();
            if self.lab.controller.termination_requested() {
                break StopReason::Terminated;
            }
        };

        self.simulate_end();
        info!(?reason, frames = self.frame, elapsed_s = self.elapsed_s, "simulation finished");
        reason
    }

    /// Run a single frame
    pub fn step(&mut self) {
        let dt = self.next_dt();

        // ops see the clock as it stands at the start of the frame
        self.simulate_step();
        self.lab.controller.advance(dt);

        self.frame += 1;
        self.elapsed_s += dt;
    }

    fn next_dt(&mut self) -> f64 {
        if self.frame_jitter > 0.0 {
            let noise = self.rng.random_range(-self.frame_jitter..=self.frame_jitter);
            self.frame_dt_s * (1.0 + noise)
        } else {
            self.frame_dt_s
        }
    }

    fn simulate_init(&mut self) {
        let mut ops = std::mem::take(&mut self.ops);

        for (i, op) in ops.iter_mut().enumerate() {
            let start = Instant::now();
            op.init_sim(self);
            self.op_timings[i].init_time = start.elapsed();
        }
        self.ops = ops;
    }

    fn simulate_end(&mut self) {
        let mut ops = std::mem::take(&mut self.ops);

        for (i, op) in ops.iter_mut().enumerate() {
            let start = Instant::now();
            op.after_sim(self);
            self.op_timings[i].after_time = start.elapsed();
        }
        self.ops = ops;
    }

    fn simulate_step(&mut self) {
        let mut ops = std::mem::take(&mut self.ops);

        for (i, op) in ops.iter_mut().enumerate() {
            let start = Instant::now();
            op.update_sim(self);
            self.op_timings[i].total_update_time += start.elapsed();
            self.op_timings[i].update_call_count += 1;
        }
        self.ops = ops;
    }

    pub fn log_timing_report(&self) {
        let total_time: Duration = self.op_timings.iter().map(OpTiming::total_time).sum();

        for timing in &self.op_timings {
            let share = if total_time.as_nanos() > 0 {
                timing.total_time().as_nanos() as f64 / total_time.as_nanos() as f64 * 100.0
            } else {
                0.0
            };
            info!(
                op = %timing.op_name,
                total_us = timing.total_time().as_micros() as u64,
                avg_update_us = timing.avg_update_time().as_micros() as u64,
                share_pct = (share * 10.0).round() / 10.0,
                "op timing"
            );
        }
        info!(frames = self.frame, total_us = total_time.as_micros() as u64, "simulation timing");
    }
}
