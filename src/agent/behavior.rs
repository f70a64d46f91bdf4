//! Per-frame agent decision logic
//!
//! The wander/pursue state machine. Each frame an agent picks a facing
//! (random wander direction or the next pathfinder step toward the player),
//! optionally fires, then runs the full probe set and commits the move only
//! if nothing blocked it. A failed path query is never an error: the agent
//! holds still for the frame and tries again on the next one.

use glam::IVec2;
use rand::Rng;
use rand_pcg::Pcg32;

use crate::agent::{
    Agent, AgentKind, Direction, Projectile, ProjectileOwner, ProjectileSpec, PursuitParams,
    ShotParams, WanderParams,
};
use crate::collision::{probe_agents, probe_objects, probe_player, probe_tiles};
use crate::core::{EventQueue, GameEvent};
use crate::nav::Pathfinder;
use crate::world::{GameObject, Player, TileMap};

/// Everything one agent may see and touch while deciding and executing its
/// move for a frame. The agent itself has been taken out of its registry
/// slot by the caller, so its own slot reads empty to the probes.
pub struct BehaviorCtx<'a> {
    pub map: &'a TileMap,
    pub tile_size: i32,
    pub pathfinder: &'a mut Pathfinder,
    pub objects: &'a [Option<GameObject>],
    pub villagers: &'a [Option<Agent>],
    pub hostiles: &'a [Option<Agent>],
    pub player: &'a mut Player,
    pub projectiles: &'a mut Vec<Projectile>,
    pub rng: &'a mut Pcg32,
    pub events: &'a mut EventQueue,
    /// Life taken from the player on hostile contact
    pub contact_damage: i32,
}

/// Advance one live agent by one frame: decide, move, tick timers.
/// `slot` is the registry slot the agent was taken from.
pub fn update_agent(agent: &mut Agent, slot: usize, ctx: &mut BehaviorCtx<'_>) {
    let should_move = decide(agent, slot, ctx);
    if should_move {
        execute_move(agent, ctx);
    }
    agent.tick();
}

/// Run the kind-specific state machine. Returns whether the agent should
/// attempt to move this frame (a pursuing agent with no path holds still).
fn decide(agent: &mut Agent, slot: usize, ctx: &mut BehaviorCtx<'_>) -> bool {
    match agent.kind.clone() {
        AgentKind::Villager { wander } => {
            wander_step(agent, wander, ctx.rng);
            true
        }
        AgentKind::Stalker => {
            // Stalkers never give up
            agent.pursuing = true;
            pursue_simple(agent, ctx)
        }
        AgentKind::Ranged {
            wander,
            pursuit,
            shot,
            projectile,
        } => {
            update_hysteresis(agent, pursuit, ctx);
            if agent.shot_cooldown < shot.cooldown_frames {
                agent.shot_cooldown += 1;
            }

            let should_move = if agent.pursuing {
                pursue_with_fallback(agent, ctx)
            } else {
                wander_step(agent, wander, ctx.rng);
                true
            };

            // Firing is independent of the movement state
            try_fire(agent, slot, shot, &projectile, ctx);
            should_move
        }
    }
}

/// Flip the pursuing flag on the two-threshold distance rule. The enter
/// threshold sits below the exit threshold so an agent at the boundary
/// cannot toggle every frame.
fn update_hysteresis(agent: &mut Agent, pursuit: PursuitParams, ctx: &BehaviorCtx<'_>) {
    let dx = (agent.pos.x - ctx.player.pos.x).abs();
    let dy = (agent.pos.y - ctx.player.pos.y).abs();
    let tile_distance = (dx + dy) / ctx.tile_size;

    if !agent.pursuing && tile_distance < pursuit.enter_tiles {
        agent.pursuing = true;
    }
    if agent.pursuing && tile_distance > pursuit.exit_tiles {
        agent.pursuing = false;
    }
}

/// Hold the current direction until the lock expires, then sample a new one
/// uniformly from the four cardinals.
fn wander_step(agent: &mut Agent, wander: WanderParams, rng: &mut Pcg32) {
    agent.wander_lock += 1;
    if agent.wander_lock >= wander.lock_frames {
        agent.dir = Direction::ALL[rng.gen_range(0..4)];
        agent.wander_lock = 0;
    }
}

/// The player's cell, clamped into the grid
fn player_goal(ctx: &BehaviorCtx<'_>) -> IVec2 {
    let cell = ctx.player.cell(ctx.tile_size);
    IVec2::new(
        cell.x.clamp(0, ctx.map.cols() as i32 - 1),
        cell.y.clamp(0, ctx.map.rows() as i32 - 1),
    )
}

/// Issue a fresh path query from the agent's cell to the player's cell and
/// return the first step, if any. The full path is recomputed every frame a
/// pursuer stays in pursuit; nothing is cached.
fn query_next_step(agent: &Agent, ctx: &mut BehaviorCtx<'_>) -> Option<IVec2> {
    let start = agent.cell(ctx.tile_size);
    let start = IVec2::new(
        start.x.clamp(0, ctx.map.cols() as i32 - 1),
        start.y.clamp(0, ctx.map.rows() as i32 - 1),
    );
    let goal = player_goal(ctx);

    ctx.pathfinder.set_node(
        start.x as usize,
        start.y as usize,
        goal.x as usize,
        goal.y as usize,
        ctx.map,
    );
    if ctx.pathfinder.search() {
        ctx.pathfinder.path().first().copied()
    } else {
        None
    }
}

/// Plain 4-directional path following: face whichever axis the next cell
/// differs on. Returns whether a path existed.
fn pursue_simple(agent: &mut Agent, ctx: &mut BehaviorCtx<'_>) -> bool {
    let Some(next) = query_next_step(agent, ctx) else {
        return false;
    };
    let here = agent.cell(ctx.tile_size);
    if next.y < here.y {
        agent.dir = Direction::Up;
    } else if next.y > here.y {
        agent.dir = Direction::Down;
    } else if next.x < here.x {
        agent.dir = Direction::Left;
    } else if next.x > here.x {
        agent.dir = Direction::Right;
    }
    true
}

/// Path following that resolves diagonal ambiguity: when the agent's box
/// sits diagonally off the next tile, try the vertical axis first and fall
/// back to the horizontal one if the probe reports it blocked. Returns
/// whether a path existed.
fn pursue_with_fallback(agent: &mut Agent, ctx: &mut BehaviorCtx<'_>) -> bool {
    let Some(next) = query_next_step(agent, ctx) else {
        return false;
    };
    let next_x = next.x * ctx.tile_size;
    let next_y = next.y * ctx.tile_size;
    let ts = ctx.tile_size;
    let world_box = agent.world_box();
    let (left, right) = (world_box.left(), world_box.right());
    let (top, bottom) = (world_box.top(), world_box.bottom());

    if top > next_y && left >= next_x && right < next_x + ts {
        agent.dir = Direction::Up;
    } else if top < next_y && left >= next_x && right < next_x + ts {
        agent.dir = Direction::Down;
    } else if top >= next_y && bottom < next_y + ts {
        // Same row band: purely horizontal
        if left > next_x {
            agent.dir = Direction::Left;
        }
        if left < next_x {
            agent.dir = Direction::Right;
        }
    } else if top > next_y && left > next_x {
        fallback(agent, Direction::Up, Direction::Left, ctx);
    } else if top > next_y && left < next_x {
        fallback(agent, Direction::Up, Direction::Right, ctx);
    } else if top < next_y && left > next_x {
        fallback(agent, Direction::Down, Direction::Left, ctx);
    } else if top < next_y && left < next_x {
        fallback(agent, Direction::Down, Direction::Right, ctx);
    }
    true
}

/// Try the first-choice axis; if the probes say it is blocked, take the
/// perpendicular one instead.
fn fallback(agent: &mut Agent, first: Direction, second: Direction, ctx: &BehaviorCtx<'_>) {
    agent.dir = first;
    if probe_all(agent, ctx) {
        agent.dir = second;
    }
}

/// Whether the agent's next step hits anything at all
fn probe_all(agent: &Agent, ctx: &BehaviorCtx<'_>) -> bool {
    let mover = agent.mover();
    probe_tiles(ctx.map, ctx.tile_size, &mover)
        || probe_objects(ctx.objects, &mover).blocking
        || probe_agents(ctx.villagers, &mover).is_some()
        || probe_agents(ctx.hostiles, &mover).is_some()
        || probe_player(ctx.player, &mover)
}

/// Fire gate: the cooldown must be at its cap, the agent must have no live
/// projectile in flight, and a percentage roll must pass. A shot inherits
/// the agent's position and facing and resets the cooldown.
fn try_fire(
    agent: &mut Agent,
    slot: usize,
    shot: ShotParams,
    spec: &ProjectileSpec,
    ctx: &mut BehaviorCtx<'_>,
) {
    if agent.shot_cooldown < shot.cooldown_frames {
        return;
    }
    let owner = ProjectileOwner::Hostile(slot);
    if ctx.projectiles.iter().any(|p| p.owner == owner && p.alive) {
        return;
    }
    let roll = ctx.rng.gen_range(1..=100);
    if roll > shot.fire_chance_pct {
        return;
    }

    let projectile = Projectile::from_spec(spec, owner, agent.pos, agent.dir, ctx.tile_size);
    log::debug!("{} fired {} {}", agent.name, spec.name, agent.dir);
    ctx.events.push(GameEvent::ProjectileFired {
        slot,
        name: spec.name,
    });
    ctx.projectiles.push(projectile);
    agent.shot_cooldown = 0;
}

/// Run the full probe set for the chosen facing and commit the move if
/// everything is clear. Hostile contact with the player deals damage
/// whether or not the move itself commits.
fn execute_move(agent: &mut Agent, ctx: &mut BehaviorCtx<'_>) {
    agent.collision_on = false;
    let mover = agent.mover();

    if probe_tiles(ctx.map, ctx.tile_size, &mover) {
        agent.collision_on = true;
    }
    if probe_objects(ctx.objects, &mover).blocking {
        agent.collision_on = true;
    }
    if probe_agents(ctx.villagers, &mover).is_some() {
        agent.collision_on = true;
    }
    if probe_agents(ctx.hostiles, &mover).is_some() {
        agent.collision_on = true;
    }
    if probe_player(ctx.player, &mover) {
        agent.collision_on = true;
        if agent.kind.hostile() && ctx.player.take_hit(ctx.contact_damage) {
            ctx.events.push(GameEvent::PlayerDamaged {
                amount: ctx.contact_damage,
                remaining: ctx.player.life,
            });
        }
    }

    if !agent.collision_on {
        agent.pos += agent.dir.delta() * agent.speed;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    const TILE: i32 = 96;

    struct Fixture {
        map: TileMap,
        pathfinder: Pathfinder,
        objects: Vec<Option<GameObject>>,
        villagers: Vec<Option<Agent>>,
        hostiles: Vec<Option<Agent>>,
        player: Player,
        projectiles: Vec<Projectile>,
        rng: Pcg32,
        events: EventQueue,
    }

    impl Fixture {
        fn new(cols: usize, rows: usize) -> Self {
            Self {
                map: TileMap::new(cols, rows),
                pathfinder: Pathfinder::new(cols, rows),
                objects: Vec::new(),
                villagers: Vec::new(),
                hostiles: Vec::new(),
                player: Player::new(IVec2::new(2 * TILE, 2 * TILE), 8, 6),
                projectiles: Vec::new(),
                rng: Pcg32::seed_from_u64(7),
                events: EventQueue::new(),
            }
        }

        fn ctx(&mut self) -> BehaviorCtx<'_> {
            BehaviorCtx {
                map: &self.map,
                tile_size: TILE,
                pathfinder: &mut self.pathfinder,
                objects: &self.objects,
                villagers: &self.villagers,
                hostiles: &self.hostiles,
                player: &mut self.player,
                projectiles: &mut self.projectiles,
                rng: &mut self.rng,
                events: &mut self.events,
                contact_damage: 2,
            }
        }
    }

    fn ranged_at(pos: IVec2) -> Agent {
        Agent::ranged(
            "slinger",
            pos,
            WanderParams::default(),
            PursuitParams::default(),
            ShotParams {
                cooldown_frames: 30,
                fire_chance_pct: 0, // tests opt in to firing explicitly
            },
            ProjectileSpec {
                name: "snowball",
                speed: 10,
                life_frames: 80,
            },
            5,
        )
    }

    #[test]
    fn test_hysteresis_enters_below_eight_tiles() {
        let mut fx = Fixture::new(30, 10);
        let mut agent = ranged_at(IVec2::new(2 * TILE + 7 * TILE, 2 * TILE));
        update_agent(&mut agent, 0, &mut fx.ctx());
        assert!(agent.pursuing);
    }

    #[test]
    fn test_hysteresis_does_not_enter_at_eight_tiles() {
        let mut fx = Fixture::new(30, 10);
        let mut agent = ranged_at(IVec2::new(2 * TILE + 8 * TILE, 2 * TILE));
        update_agent(&mut agent, 0, &mut fx.ctx());
        assert!(!agent.pursuing);
    }

    #[test]
    fn test_hysteresis_holds_at_twenty_tiles() {
        let mut fx = Fixture::new(30, 10);
        let mut agent = ranged_at(IVec2::new(2 * TILE + 20 * TILE, 2 * TILE));
        agent.pursuing = true;
        update_agent(&mut agent, 0, &mut fx.ctx());
        assert!(agent.pursuing);
    }

    #[test]
    fn test_hysteresis_exits_past_twenty_tiles() {
        let mut fx = Fixture::new(30, 10);
        let mut agent = ranged_at(IVec2::new(2 * TILE + 21 * TILE, 2 * TILE));
        agent.pursuing = true;
        update_agent(&mut agent, 0, &mut fx.ctx());
        assert!(!agent.pursuing);
    }

    #[test]
    fn test_stalker_tracks_player() {
        let mut fx = Fixture::new(30, 10);
        fx.player.pos = IVec2::new(5 * TILE, 2 * TILE);
        let mut agent = Agent::stalker(IVec2::new(2 * TILE, 2 * TILE));
        update_agent(&mut agent, 0, &mut fx.ctx());
        assert!(agent.pursuing);
        assert_eq!(agent.dir, Direction::Right);
        assert_eq!(agent.pos, IVec2::new(2 * TILE + 5, 2 * TILE));
    }

    #[test]
    fn test_ranged_pursues_straight_up() {
        let mut fx = Fixture::new(30, 10);
        fx.player.pos = IVec2::new(5 * TILE, 2 * TILE);
        let mut agent = ranged_at(IVec2::new(5 * TILE, 6 * TILE));
        agent.pursuing = true;
        update_agent(&mut agent, 0, &mut fx.ctx());
        assert_eq!(agent.dir, Direction::Up);
        assert_eq!(agent.pos.y, 6 * TILE - 5);
    }

    #[test]
    fn test_no_path_holds_still() {
        let mut fx = Fixture::new(30, 10);
        fx.player.pos = IVec2::new(5 * TILE, 2 * TILE);
        // Wall the player's cell in completely
        let goal = fx.player.cell(TILE);
        let (gc, gr) = (goal.x as usize, goal.y as usize);
        fx.map.set_blocked(gc - 1, gr, true);
        fx.map.set_blocked(gc + 1, gr, true);
        fx.map.set_blocked(gc, gr - 1, true);
        fx.map.set_blocked(gc, gr + 1, true);

        let mut agent = Agent::stalker(IVec2::new(2 * TILE, 2 * TILE));
        let before = agent.pos;
        update_agent(&mut agent, 0, &mut fx.ctx());
        assert_eq!(agent.pos, before);
        assert_eq!(agent.dir, Direction::Down);
    }

    #[test]
    fn test_wander_lock_resets_at_threshold() {
        let mut fx = Fixture::new(30, 10);
        // Keep the villager far from anything
        let mut agent = Agent::villager(
            IVec2::new(20 * TILE, 5 * TILE),
            WanderParams { lock_frames: 2 },
            TILE,
        );
        update_agent(&mut agent, 0, &mut fx.ctx());
        assert_eq!(agent.wander_lock, 1);
        update_agent(&mut agent, 0, &mut fx.ctx());
        assert_eq!(agent.wander_lock, 0);
        assert!(!agent.pursuing);
    }

    #[test]
    fn test_fire_requires_cooldown_cap() {
        let mut fx = Fixture::new(30, 10);
        let mut agent = ranged_at(IVec2::new(20 * TILE, 5 * TILE));
        if let AgentKind::Ranged { shot, .. } = &mut agent.kind {
            shot.cooldown_frames = 5;
            shot.fire_chance_pct = 100;
        }
        for _ in 0..4 {
            update_agent(&mut agent, 0, &mut fx.ctx());
        }
        assert!(fx.projectiles.is_empty());
        update_agent(&mut agent, 0, &mut fx.ctx());
        assert_eq!(fx.projectiles.len(), 1);
        assert_eq!(agent.shot_cooldown, 0);
        assert_eq!(fx.projectiles[0].owner, ProjectileOwner::Hostile(0));
    }

    #[test]
    fn test_no_second_projectile_while_one_lives() {
        let mut fx = Fixture::new(30, 10);
        let mut agent = ranged_at(IVec2::new(20 * TILE, 5 * TILE));
        if let AgentKind::Ranged { shot, .. } = &mut agent.kind {
            shot.cooldown_frames = 0;
            shot.fire_chance_pct = 100;
        }
        update_agent(&mut agent, 0, &mut fx.ctx());
        update_agent(&mut agent, 0, &mut fx.ctx());
        assert_eq!(fx.projectiles.len(), 1);
    }

    #[test]
    fn test_zero_chance_never_fires() {
        let mut fx = Fixture::new(30, 10);
        let mut agent = ranged_at(IVec2::new(20 * TILE, 5 * TILE));
        if let AgentKind::Ranged { shot, .. } = &mut agent.kind {
            shot.cooldown_frames = 0;
        }
        for _ in 0..50 {
            update_agent(&mut agent, 0, &mut fx.ctx());
        }
        assert!(fx.projectiles.is_empty());
    }

    #[test]
    fn test_contact_damages_player_once_per_window() {
        let mut fx = Fixture::new(30, 10);
        // One cell above the player, close enough that the next step down
        // presses the agent's box into the player's
        let mut agent = ranged_at(IVec2::new(2 * TILE, 130));
        update_agent(&mut agent, 0, &mut fx.ctx());
        assert_eq!(fx.player.life, 4);
        assert!(fx.player.invincible);
        assert!(agent.collision_on);
        // Second contact lands inside the invincibility window
        update_agent(&mut agent, 0, &mut fx.ctx());
        assert_eq!(fx.player.life, 4);
    }

    #[test]
    fn test_blocked_move_does_not_commit() {
        let mut fx = Fixture::new(30, 10);
        fx.player.pos = IVec2::new(20 * TILE, 5 * TILE);
        // Wall directly below a villager facing down
        fx.map.set_blocked(2, 3, true);
        let mut agent = Agent::villager(
            IVec2::new(2 * TILE, 2 * TILE),
            WanderParams::default(),
            TILE,
        );
        let before = agent.pos;
        update_agent(&mut agent, 0, &mut fx.ctx());
        assert_eq!(agent.dir, Direction::Down);
        assert!(agent.collision_on);
        assert_eq!(agent.pos, before);
    }
}
