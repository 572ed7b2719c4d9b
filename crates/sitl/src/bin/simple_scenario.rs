//! Tail-vehicle abandonment scenario runner.
//!
//! Builds a platoon from a TOML scenario (or the built-in reference
//! scenario), runs it and prints a summary. The last follower tightens its
//! spacing at t = 10 s and leaves the platoon once the gap has opened.
//!
//! Usage:
//!   cargo run -p platoon_sitl --bin simple_scenario -- [OPTIONS]
//!
//! Logging is controlled with `RUST_LOG` (default: `info`).

use std::path::PathBuf;
use std::process;

use clap::Parser;
use platoon_sitl::{ScenarioConfig, Simulation, SimulationError, TimeMode};
use tracing_subscriber::EnvFilter;

/// Steps run between yields to the runtime in free-running mode.
const STEPS_PER_YIELD: u32 = 100;

#[derive(Debug, Parser)]
#[command(name = "simple_scenario", about = "Platoon abandonment scenario")]
struct Args {
    /// Scenario file (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of vehicles including the leader
    #[arg(short = 'n', long)]
    platoon_size: Option<usize>,

    /// Platoon cruising speed in km/h
    #[arg(long)]
    leader_speed: Option<f64>,

    /// Simulated duration in seconds
    #[arg(short, long)]
    duration: Option<f64>,

    /// Radar noise standard deviation in meters
    #[arg(long)]
    radar_noise: Option<f64>,

    /// Seed for the radar noise
    #[arg(long)]
    seed: Option<u64>,

    /// Run at this multiple of wall-clock time instead of free-running
    #[arg(long)]
    realtime: Option<f32>,
}

impl Args {
    fn scenario(&self) -> Result<ScenarioConfig, SimulationError> {
        let mut config = match &self.config {
            Some(path) => ScenarioConfig::load(path)?,
            None => ScenarioConfig::default(),
        };
        if let Some(size) = self.platoon_size {
            config.platoon_size = size;
        }
        if let Some(speed) = self.leader_speed {
            config.leader_speed_kmh = speed;
        }
        if let Some(duration) = self.duration {
            config.duration_s = duration;
        }
        if let Some(noise) = self.radar_noise {
            config.radar.noise_std_m = noise;
        }
        if self.seed.is_some() {
            config.radar.seed = self.seed;
        }
        config.validate()?;
        Ok(config)
    }

    fn time_mode(&self) -> TimeMode {
        match self.realtime {
            Some(factor) => TimeMode::Scaled { factor },
            None => TimeMode::FreeRunning,
        }
    }
}

async fn run(sim: &mut Simulation, mode: TimeMode) {
    match mode.step_period(sim.step_us()) {
        Some(period) => {
            let mut interval = tokio::time::interval(period);
            while !sim.is_finished() {
                interval.tick().await;
                sim.step();
            }
        }
        None => {
            let mut steps = 0u32;
            while !sim.is_finished() {
                sim.step();
                steps += 1;
                if steps % STEPS_PER_YIELD == 0 {
                    tokio::task::yield_now().await;
                }
            }
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let mode = args.time_mode();
    let mut sim = match args.scenario().and_then(Simulation::from_config) {
        Ok(sim) => sim,
        Err(e) => {
            eprintln!("Error: {e}");
            process::exit(1);
        }
    };

    let config = sim.config();
    println!("=== Platoon abandonment scenario ===");
    println!(
        "  vehicles={}  speed={:.1} km/h  duration={:.1} s  mode={:?}",
        config.platoon_size, config.leader_speed_kmh, config.duration_s, mode
    );
    println!();

    tokio::select! {
        _ = run(&mut sim, mode) => {}
        _ = tokio::signal::ctrl_c() => {
            println!("\nShutdown requested.");
        }
    }

    println!("{}", sim.report());
}
