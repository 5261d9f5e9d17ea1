use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use tracing::info;

use aquadron_sim::api::{SimulationResults, StateSnapshot};
use aquadron_sim::config::{load_config, ScenarioConfig};
use aquadron_sim::dynamics::state::{PSI, V1, V2, Y1, Y2, YAW_RATE};
use aquadron_sim::gnc::{approach_speed, BearingMode, GuidanceTarget};
use aquadron_sim::io::{self, RunSummary};
use aquadron_sim::SessionStore;

#[derive(Parser, Debug)]
#[command(name = "aquadron-sim")]
#[command(about = "Guidance simulation for a planar underactuated vehicle")]
#[command(version)]
struct Args {
    /// TOML scenario file; built-in scenario when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[arg(long)]
    target_y1: Option<f64>,

    #[arg(long)]
    target_y2: Option<f64>,

    /// Cruise speed toward the target, m/s
    #[arg(long)]
    speed: Option<f64>,

    #[arg(long)]
    max_time: Option<f64>,

    #[arg(long)]
    step: Option<f64>,

    /// Desired-heading law: raw | quadrant
    #[arg(long)]
    bearing: Option<BearingMode>,

    /// Write simulation results as JSON
    #[arg(long)]
    json: Option<PathBuf>,

    /// Write the full trajectory as CSV
    #[arg(long)]
    csv: Option<PathBuf>,
}

fn scenario(args: &Args) -> Result<ScenarioConfig> {
    let mut cfg = match &args.config {
        Some(path) => load_config(path)?,
        None => ScenarioConfig::default(),
    };
    if let Some(v) = args.target_y1 {
        cfg.target.y1 = v;
    }
    if let Some(v) = args.target_y2 {
        cfg.target.y2 = v;
    }
    if let Some(v) = args.speed {
        cfg.target.speed = v;
    }
    if let Some(v) = args.max_time {
        cfg.run.max_time = v;
    }
    if let Some(v) = args.step {
        cfg.run.step = v;
    }
    if let Some(v) = args.bearing {
        cfg.run.bearing = v;
    }
    Ok(cfg)
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();
    let cfg = scenario(&args)?;
    info!(?cfg, "Scenario loaded");

    let store = SessionStore::with_law(cfg.law()).with_arrival_tolerance(cfg.run.arrival_tolerance);
    let id = store.create(&cfg.vehicle)?;
    let initial = store.state(id)?;

    let request = cfg.simulation_request();
    let trajectory = store.run(id, &request)?;
    let results = SimulationResults::from_trajectory(&trajectory);

    let speed = approach_speed(initial.y[0], request.target_y1, request.target_speed, cfg.run.bearing);
    let target = GuidanceTarget::new([request.target_y1, request.target_y2].into(), speed);
    let summary = RunSummary::from_trajectory(&trajectory, &target);

    print_report(&cfg, &initial, &summary);
    print_table(&trajectory.samples, request.step);

    if let Some(path) = &args.json {
        io::write_json_file(&path.to_string_lossy(), &results)?;
        info!(path = %path.display(), "Results written");
    }
    if let Some(path) = &args.csv {
        io::csv::write_trajectory_file(&path.to_string_lossy(), &trajectory.samples)?;
        info!(path = %path.display(), "Trajectory written");
    }

    Ok(())
}

fn print_report(cfg: &ScenarioConfig, initial: &StateSnapshot, summary: &RunSummary) {
    println!();
    println!("====================================================================");
    println!("  AQUADRON GUIDANCE SIMULATION");
    println!("====================================================================");
    println!();
    println!("  Vehicle");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Weight:        {:>8.2} kg    J:            {:>8.3} kg*m^2",
        initial.weight, initial.j
    );
    println!(
        "  cx1:           {:>8.3}       cx2:          {:>8.3}       mx3: {:.3}",
        initial.cx1, initial.cx2, initial.mx3
    );
    println!(
        "  Start pose:    ({:.2}, {:.2}) m, psi {:.1} deg",
        initial.y[0],
        initial.y[1],
        initial.y[2].to_degrees()
    );
    println!();

    println!("  Guidance");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  Target:        ({:.2}, {:.2}) m at {:.2} m/s   bearing: {}",
        cfg.target.y1, cfg.target.y2, cfg.target.speed, cfg.run.bearing
    );
    println!(
        "  Gains:         T1={}  T2={}  T3={}",
        cfg.control.t1, cfg.control.t2, cfg.control.t3
    );
    println!();

    println!("  Outcome");
    println!("  ──────────────────────────────────────────────────────────────────");
    if summary.arrived {
        println!("  ARRIVED   t={:>7.2}s   miss={:.3} m", summary.stop_time, summary.final_distance);
    } else {
        println!(
            "  TIME LIMIT t={:>6.2}s   distance left={:.2} m",
            summary.stop_time, summary.final_distance
        );
    }
    println!("  Path length:   {:>8.2} m", summary.path_length);
    println!("  Max surge:     {:>8.3} m/s", summary.max_surge);
    println!();
}

fn print_table(samples: &[aquadron_sim::sim::Sample], dt: f64) {
    println!("  Trajectory");
    println!("  ──────────────────────────────────────────────────────────────────");
    println!(
        "  {:>7}  {:>8}  {:>8}  {:>8}  {:>7}  {:>7}  {:>7}",
        "t (s)", "Y1 (m)", "Y2 (m)", "psi(deg)", "v1", "v2", "r"
    );
    println!("  {}", "─".repeat(62));

    let sample_interval = (samples.len() / 30).max(1);
    for (i, s) in samples.iter().enumerate() {
        if i % sample_interval != 0 && i != samples.len() - 1 {
            continue;
        }
        let x = &s.state;
        println!(
            "  {:>7.2}  {:>8.3}  {:>8.3}  {:>8.2}  {:>7.3}  {:>7.3}  {:>7.3}",
            s.time,
            x[Y1],
            x[Y2],
            x[PSI].to_degrees(),
            x[V1],
            x[V2],
            x[YAW_RATE]
        );
    }

    println!();
    println!("  Simulation: {} samples, dt={} s", samples.len(), dt);
    println!("====================================================================");
    println!();
}
