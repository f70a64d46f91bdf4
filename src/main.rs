//! Headless demo run: one map, a villager, a stalker, and a ranged hostile

use manor::prelude::*;

/// 30x12 demo floor: bordered, with a few interior pillars
const DEMO_MAP: &str = "\
1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1
1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 1 0 0 0 0 0 0 0 0 0 1 0 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 1 0 0 0 0 0 0 0 0 0 1 0 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 1 0 0 0 0 0 0 0 0 0 1 0 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 1 0 0 0 0 0 0 0 0 0 1 0 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 1 0 0 0 0 0 0 0 0 0 1 0 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 1 0 0 0 0 0 0 0 0 0 1 0 0 0 0 0 0 0 0 1
1 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 0 1
1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1 1
";

fn build_world() -> Result<World, WorldError> {
    let tuning = Tuning::default();
    let ts = tuning.tile_size;
    let map = TileMap::from_text(DEMO_MAP)?;

    let mut world = World::new(map, tuning, IVec2::new(2 * ts, 2 * ts), 0xDECAF);

    world.spawn_object(0, GameObject::new(ObjectKind::Key, IVec2::new(5 * ts, 9 * ts), ts))?;
    world.spawn_object(0, GameObject::new(ObjectKind::Door, IVec2::new(15 * ts, 5 * ts), ts))?;
    world.spawn_object(0, GameObject::new(ObjectKind::Chest, IVec2::new(27 * ts, 9 * ts), ts))?;

    let wander = world.tuning.wander();
    world.spawn_villager(0, Agent::villager(IVec2::new(7 * ts, 6 * ts), wander, ts))?;
    world.spawn_hostile(0, Agent::stalker(IVec2::new(25 * ts, 2 * ts)))?;
    world.spawn_hostile(0, Agent::ranged(
        "slinger",
        IVec2::new(14 * ts, 9 * ts),
        wander,
        world.tuning.pursuit(),
        world.tuning.shot(),
        ProjectileSpec {
            name: "snowball",
            speed: world.tuning.projectile_speed,
            life_frames: world.tuning.projectile_life_frames,
        },
        4,
    ))?;

    Ok(world)
}

/// Walk a rectangle around the floor, throwing whenever a dagger is free
fn patrol(world: &World) -> PlayerInput {
    let leg = (world.frame() / 120) % 4;
    let dir = match leg {
        0 => Direction::Right,
        1 => Direction::Down,
        2 => Direction::Left,
        _ => Direction::Up,
    };
    PlayerInput {
        dir: Some(dir),
        fire: world.frame() % 10 == 0,
    }
}

fn main() {
    env_logger::init();

    let world = match build_world() {
        Ok(world) => world,
        Err(err) => {
            eprintln!("failed to build world: {err}");
            std::process::exit(1);
        }
    };

    let config = SimConfig::default()
        .with_frames(7200)
        .with_report_every(600);
    let mut sim = Sim::new(world, config);
    let outcome = sim.run(patrol);

    log::info!("run ended: {outcome:?}");
    log::info!("{}", sim.stats().format_stats());
    log::info!(
        "player: life {}/{}, {} coins, {} hostiles left",
        sim.world.player.life,
        sim.world.player.max_life,
        sim.world.player.coins,
        sim.world.hostiles_alive()
    );
}
