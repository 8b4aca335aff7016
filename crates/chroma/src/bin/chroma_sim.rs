//! # CHROMA Simulation
//!
//! Headless autoplay harness: loads a stage file, runs a session for a
//! fixed number of ticks with a steadily climbing player, and prints
//! streaming statistics. Useful for eyeballing window behavior and for
//! profiling long sessions.
//!
//! ```text
//! chroma_sim [stage.toml] [ticks]
//! ```
//!
//! With no arguments the built-in demo stage runs for 10 000 ticks.

use std::process::ExitCode;

use tracing_subscriber::EnvFilter;

use chroma::{GameResult, PickupDescriptor, PickupKind, StageFile};
use chroma_core::SeededSource;
use chroma_selection::ObstacleColorSet;
use chroma_stage::RecordingFactory;

/// Demo stage shipped with the binary.
const DEFAULT_STAGE: &str = include_str!("../../stage.toml");

/// Ticks simulated when no count is given.
const DEFAULT_TICKS: u32 = 10_000;

/// Fixed simulation timestep.
const DT: f32 = 1.0 / 60.0;

/// Player climb per tick.
const CLIMB_PER_TICK: f32 = 0.4;

fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(%err, "simulation aborted");
            ExitCode::FAILURE
        }
    }
}

fn run() -> GameResult<()> {
    let mut args = std::env::args().skip(1);
    let stage_text = match args.next() {
        Some(path) => std::fs::read_to_string(&path).map_err(|err| {
            chroma::GameError::InvalidConfig(format!("cannot read {path}: {err}"))
        })?,
        None => DEFAULT_STAGE.to_owned(),
    };
    let ticks = match args.next() {
        Some(raw) => raw.parse::<u32>().map_err(|err| {
            chroma::GameError::InvalidConfig(format!("tick count {raw}: {err}"))
        })?,
        None => DEFAULT_TICKS,
    };

    let setup = StageFile::from_toml(&stage_text)?.build()?;
    let seed = setup.seed;
    let mut session = chroma::GameSession::new(setup);
    let mut factory = RecordingFactory::new();
    let mut rng = SeededSource::from_seed(seed);

    session.start(&mut factory, &mut rng);

    let star = PickupDescriptor {
        kind: PickupKind::Star,
        color_limit: None,
    };

    let mut retired_total = 0_usize;
    let mut rebase_count = 0_u32;
    let mut max_window = 0_usize;
    for tick in 0..ticks {
        session.move_player(CLIMB_PER_TICK);
        if tick % 120 == 0 {
            session.collect(&star, &mut rng);
        }
        if tick % 300 == 0 {
            // Simulate a color switch placed before a 4-part obstacle: the
            // pickup offers only the colors that obstacle actually uses.
            let obstacle = ObstacleColorSet::assign(session.palette(), &mut rng, 4);
            let switch = PickupDescriptor {
                kind: PickupKind::ColorSwitch,
                color_limit: Some(obstacle.used_colors().to_vec()),
            };
            session.collect(&switch, &mut rng);
        }

        let report = session.tick(DT, &mut factory, &mut rng);
        retired_total += report.retired;
        if report.rebase_shift.is_some() {
            rebase_count += 1;
        }
        max_window = max_window.max(session.streamer().window_len());
    }

    println!("=== CHROMA autoplay ===");
    println!("ticks simulated:   {ticks}");
    println!("segments spawned:  {}", factory.spawned_total());
    println!("segments retired:  {retired_total}");
    println!("live window:       {} (max {max_window})", session.streamer().window_len());
    println!("rebases:           {rebase_count}");
    println!("stars collected:   {}", session.stars());
    println!("final color id:    {}", session.player_color().id);
    println!("player y (rebased): {:.2}", session.player_y());

    session.reset(&mut factory);
    Ok(())
}
