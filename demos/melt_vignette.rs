/// Melt vignette walkthrough
/// Runs the whole scripted interaction headless at ~60 fps:
/// 1. Player takes ice from the freezer and puts it in the pot
/// 2. Stove goes on, temperature climbs to its cap, the ice melts
/// 3. Results are logged and the app closes 5 s later
///
/// Usage: cargo run --example melt_vignette [config.json]

use colored::Colorize;
use phase_lab_rust::config::VignetteConfig;
use phase_lab_rust::interaction::{InteractionDispatcher, MessageLog};
use phase_lab_rust::lab::{Lab, CONTAINER, FREEZER, HEAT_SWITCH};
use phase_lab_rust::lifecycle::LifecycleHost;
use phase_lab_rust::phase_transition::PhaseTransitionController;
use phase_lab_rust::presentation::SceneProbe;
use phase_lab_rust::run_registry::RunRegistry;
use phase_lab_rust::session::MemorySessionRecorder;
use phase_lab_rust::sim::sim_op::{
    LabAction, ScriptedAction, ScriptedActionOp, SimOpHandle, TemperatureReportingOp,
};
use phase_lab_rust::sim::{SimProps, Simulation, StopReason};
use phase_lab_rust::temp_utils::celsius_to_kelvin;
use std::cell::RefCell;
use std::rc::Rc;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

struct ConsoleHost;

impl LifecycleHost for ConsoleHost {
    fn terminate_application(&mut self) {
        println!("{}", "👋 Application closing".bright_blue());
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let subscriber = FmtSubscriber::builder()
        .with_max_level(Level::INFO)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let config = match std::env::args().nth(1) {
        Some(path) => VignetteConfig::load(path)?,
        None => VignetteConfig::default(),
    };

    println!("{}", "🧊 Ice melting vignette".bold());
    println!("{}", "=".repeat(60));
    println!(
        "   heat {:.1} °C/s | melt {:.4}/s | rise {:.3}/s | cap {:.0} °C",
        config.heat_rate_c_per_s, config.melt_rate_per_s, config.rise_rate_per_s, config.max_temperature_c
    );

    let recorder = Rc::new(RefCell::new(MemorySessionRecorder::new()));
    let board = Rc::new(RefCell::new(MessageLog::default()));
    let probe = SceneProbe::new();

    let dispatcher = InteractionDispatcher::new(config.messages.clone()).with_board(board.clone());
    let controller = PhaseTransitionController::new(config, RunRegistry::shared(), recorder.clone())
        .with_presentation(probe.presentation())
        .with_host(ConsoleHost);

    let script = vec![
        ScriptedAction::new(0.5, LabAction::HoverEnter(FREEZER.to_string())),
        ScriptedAction::new(1.0, LabAction::Interact(FREEZER.to_string())),
        ScriptedAction::new(1.2, LabAction::HoverExit(FREEZER.to_string())),
        ScriptedAction::new(2.5, LabAction::HoverEnter(CONTAINER.to_string())),
        ScriptedAction::new(3.0, LabAction::Interact(CONTAINER.to_string())),
        ScriptedAction::new(3.2, LabAction::HoverExit(CONTAINER.to_string())),
        ScriptedAction::new(4.0, LabAction::Interact(HEAT_SWITCH.to_string())),
    ];

    let reporting = TemperatureReportingOp::with_frequency(10.0);
    let reports = reporting.reports();

    let mut sim = Simulation::new(SimProps {
        lab: Lab::new(controller, dispatcher),
        name: "melt_vignette",
        ops: vec![
            ScriptedActionOp::handle(script),
            SimOpHandle::new(Box::new(reporting)),
        ],
        frame_dt_s: 1.0 / 60.0,
        max_frames: 60 * 120,
        frame_jitter: 0.15,
        seed: 2024,
    });

    let reason = sim.run();
    sim.log_timing_report();

    println!();
    println!("{}", "🌡️  Thermal progress".bold());
    println!("   {:>6} {:>8} {:>8} {:>6} {:>7}  {}", "frame", "time s", "temp °C", "solid", "liquid", "phase");
    for report in reports.borrow().iter() {
        let line = format!(
            "   {:>6} {:>8.2} {:>8.1} {:>5.0}% {:>7.3}  {:?}",
            report.frame,
            report.elapsed_s,
            report.temperature_c,
            report.melt_fraction * 100.0,
            report.liquid_level,
            report.phase
        );
        if report.melt_fraction > 0.0 {
            println!("{}", line.cyan());
        } else {
            println!("{}", line.blue());
        }
    }

    println!();
    println!("{}", "💬 Messages shown:".bold());
    for message in &board.borrow().shown {
        println!("   {}", message);
    }

    let state = sim.lab.controller.state();
    println!();
    println!("{}", "📊 Final state".bold());
    println!("   Phase:        {:?}", state.phase);
    println!(
        "   Temperature:  {:.1} °C ({:.2} K)",
        state.temperature_c,
        celsius_to_kelvin(state.temperature_c)
    );
    println!("   Liquid level: {:.3}", state.liquid_level());
    println!("   Display:      {}", probe.display.borrow().text());

    match reason {
        StopReason::Terminated => println!(
            "{}",
            format!("✅ Completed in {:.1}s of simulated time", sim.elapsed_s).green()
        ),
        StopReason::FrameBudget => println!(
            "{}",
            format!("⚠️  Frame budget exhausted after {:.1}s", sim.elapsed_s).yellow()
        ),
    }

    println!();
    println!("{}", "📝 Session log".bold());
    println!("{}", recorder.borrow().to_json_pretty()?);

    Ok(())
}
