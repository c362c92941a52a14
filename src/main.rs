use anyhow::{bail, Context, Result};
use clap::Parser;
use glam::DVec3;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

use fleet_orders::ecs::init::patrol_orders;
use fleet_orders::movement::{Arrow, Feedback, OrderRequest, OrderTarget};
use fleet_orders::{init_logging, Fleet, FleetConfig};

/// Headless run of ships executing their order queues
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file, written with defaults when missing
    #[arg(short, long, default_value = "config/fleet.json")]
    config: PathBuf,

    /// Simulated seconds to run
    #[arg(long)]
    seconds: Option<f64>,

    /// Seed for the enemy patrol
    #[arg(long)]
    seed: Option<u64>,

    /// Write the order event log to this JSON file
    #[arg(long)]
    events_out: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = FleetConfig::load_or_default(&args.config);
    let demo = &config.demo;
    let kinematics = config.ship.kinematics()?;

    if !(demo.tick_rate > 0.0 && demo.tick_rate.is_finite()) {
        bail!("tick_rate must be positive, got {}", demo.tick_rate);
    }
    let dt = 1.0 / demo.tick_rate;
    let seconds = args.seconds.unwrap_or(demo.duration_secs).max(0.0);
    let seed = args.seed.unwrap_or(demo.seed);

    let mut fleet = Fleet::new();
    let player = fleet.spawn_ship("Player", demo.player_spawn, kinematics);
    let enemy = fleet.spawn_enemy("Raider", demo.enemy_spawn, kinematics);
    fleet.toggle_selection_highlight(player, true)?;

    let mut rng = ChaCha8Rng::seed_from_u64(seed);
    for order in patrol_orders(
        demo.patrol_orders,
        demo.patrol_half_extent_x,
        demo.patrol_half_extent_z,
        &mut rng,
    ) {
        fleet.enqueue(enemy, order, true)?;
    }

    // A drag from `drag_start` to `drag_end`: move there, then face along the drag
    let drag_start = demo.player_spawn + DVec3::new(4.0, 0.0, 2.0);
    let drag_end = drag_start + DVec3::new(-3.0, 0.0, 3.0);
    let move_arrow = Arc::new(Mutex::new(Arrow::from_config(
        drag_start,
        fleet.agent(player)?.forward(),
        &config.arrow,
    )));
    if let Ok(mut arrow) = move_arrow.lock() {
        arrow.set_end(drag_end, true);
    }
    fleet.issue(
        player,
        OrderRequest::Directional {
            target: drag_start,
            facing: drag_end - drag_start,
        },
        Some(Box::new(move_arrow.clone())),
        false,
    )?;

    let follow_arrow = Arc::new(Mutex::new(Arrow::from_config(
        fleet.position(player)?,
        fleet.agent(player)?.forward(),
        &config.arrow,
    )));
    fleet.issue(
        player,
        OrderRequest::Follow {
            target: OrderTarget::Agent(enemy),
        },
        Some(Box::new(follow_arrow.clone())),
        true,
    )?;

    let ticks = (seconds * demo.tick_rate).round() as u64;
    let ticks_per_report = demo.tick_rate.round().max(1.0) as u64;
    log::info!("Running {ticks} ticks at {:.1} Hz (seed {seed})", demo.tick_rate);

    for tick in 1..=ticks {
        fleet.tick(dt);

        if tick % ticks_per_report == 0 {
            let player_agent = fleet.agent(player)?;
            log::info!(
                "t={:6.2}s player {:?} yaw {:5.1} queue {} | enemy {:?} queue {} tracked {}",
                fleet.elapsed(),
                player_agent.position(),
                player_agent.yaw_degrees().unwrap_or(f64::NAN),
                player_agent.queue_len(),
                fleet.position(enemy)?,
                fleet.queue_len(enemy)?,
                fleet.is_tracked(enemy),
            );
        }
    }

    let released = |arrow: &Arc<Mutex<Arrow>>| arrow.lock().map(|a| a.released).unwrap_or(false);
    log::info!(
        "Finished after {:.2}s: move arrow released {}, follow arrow released {}, {} events",
        fleet.elapsed(),
        released(&move_arrow),
        released(&follow_arrow),
        fleet.events().event_count()
    );

    if let Some(path) = args.events_out {
        fleet
            .events()
            .save_to_file(&path)
            .with_context(|| format!("writing event log to {}", path.display()))?;
        log::info!("Event log written to {}", path.display());
    }

    Ok(())
}
