//! Headless driver: runs the simulation at a fixed 60 Hz frame with a scripted
//! pilot and prints the final world snapshot as RON.

use std::path::PathBuf;
use std::time::Duration;

use aegis_game::{SimConfig, SimEvent, Simulation};
use anyhow::{Context, Result};
use clap::Parser;
use engine_core::FrameClock;
use input::{ElementState, InputState, Intent};

const FRAME: Duration = Duration::from_micros(16_670);

#[derive(Parser, Debug)]
#[command(name = "aegis-headless")]
#[command(about = "Run the Solar Aegis simulation without a window")]
struct Cli {
    /// Config file (RON). Defaults to aegis.ron in the working directory.
    #[arg(long)]
    config: Option<PathBuf>,
    /// Number of 60 Hz frames to simulate.
    #[arg(long, default_value_t = 3_600)]
    ticks: u64,
    /// RNG seed, overriding the config.
    #[arg(long)]
    seed: Option<u64>,
    /// Write the effective config to this path before running.
    #[arg(long)]
    save_config: Option<PathBuf>,
}

/// Scripted flight plan: patrol the shell with guns hot, dive into the
/// sanctum, then climb back out.
struct Autopilot {
    input: InputState,
}

impl Autopilot {
    fn new() -> Self {
        Self {
            input: InputState::new(),
        }
    }

    fn set(&mut self, intent: Intent, on: bool) {
        let state = if on {
            ElementState::Pressed
        } else {
            ElementState::Released
        };
        self.input.process(intent, state);
    }

    fn plan(&mut self, frame: u64) {
        let phase = frame % 1_800;
        self.set(Intent::ThrottleUp, phase < 240);
        // Tap the trigger every eighth frame, once per cooldown
        self.set(Intent::Fire, frame % 8 == 0);
        // Lazy figure-eight
        let turn = (frame / 180) % 4;
        self.set(Intent::YawLeft, turn == 1);
        self.set(Intent::YawRight, turn == 3);
        self.set(Intent::PitchUp, turn == 2 && frame % 3 == 0);
        self.set(Intent::EnterSanctum, phase == 600);
        self.set(Intent::ExitSanctum, phase == 1_200);
    }
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => SimConfig::load_from(path)
            .with_context(|| format!("loading config from {}", path.display()))?,
        None => SimConfig::load(),
    };
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    if let Some(path) = &cli.save_config {
        config
            .save_to(path)
            .with_context(|| format!("writing config to {}", path.display()))?;
        log::info!("Wrote config to {}", path.display());
    }

    let mut sim = Simulation::new(config).context("building simulation")?;
    let mut clock = FrameClock::new();
    let mut autopilot = Autopilot::new();
    log::info!("Running {} frames", cli.ticks);

    for frame in 0..cli.ticks {
        clock.advance(FRAME);
        autopilot.plan(frame);
        let snapshot = autopilot.input.snapshot();
        autopilot.input.begin_frame();

        let report = sim.tick(&snapshot, clock.dt(), clock.now_ms());
        for event in &report.events {
            log_event(report.tick, event);
        }
        if sim.ship().status.is_destroyed() {
            log::warn!("Obsidian Wing hull breached at frame {}", frame);
            break;
        }
    }

    let snapshot = sim.snapshot();
    let (collapsed, total) = snapshot.shell_integrity();
    log::info!(
        "Done after {} ticks: zone {}, {} corroders, alert {:.2}, {}/{} sectors collapsed",
        snapshot.tick,
        snapshot.zone_name,
        snapshot.population,
        snapshot.alert_level,
        collapsed,
        total
    );
    let ron = ron::ser::to_string_pretty(&snapshot, ron::ser::PrettyConfig::default())
        .context("serializing snapshot")?;
    println!("{}", ron);
    Ok(())
}

fn log_event(tick: u64, event: &SimEvent) {
    match event {
        SimEvent::AgentSpawned { kind, cause, .. } => {
            log::debug!("[{}] {} spawned ({:?})", tick, kind.name(), cause)
        }
        SimEvent::AgentDestroyed { kind, cause, .. } => {
            log::info!("[{}] {} gone ({:?})", tick, kind.name(), cause)
        }
        SimEvent::SectorStressed { .. }
        | SimEvent::ShotFired { .. }
        | SimEvent::ShipDamaged { .. } => log::trace!("[{}] {:?}", tick, event),
        SimEvent::SectorCollapsed { sector, vents } => {
            log::info!("[{}] sector {} collapsed, {} vents", tick, sector, vents.len())
        }
        SimEvent::JunctionDestroyed { index, .. } => {
            log::info!("[{}] junction {} lost", tick, index)
        }
        SimEvent::ZoneTransitioned { from, to } => {
            log::info!("[{}] {} -> {}", tick, from.name(), to.name())
        }
    }
}
