//! The simulated world: maps, registries, and the frame loop
//!
//! The world holds several tile maps; exactly one is active at a time and
//! only its actors update. Every actor lives in a fixed-capacity slot
//! registry so probe results can name things by index. A frame advances in
//! a fixed order: player, then villagers, then hostiles, then projectiles.
//! Each agent is taken out of its slot while it updates, so the probes
//! naturally skip it without any identity bookkeeping.

pub mod map;
pub mod object;
pub mod player;

pub use map::{MapError, TileMap};
pub use object::{GameObject, ObjectKind};
pub use player::{Player, PLAYER_HURT_FRAMES};

use std::fmt;

use glam::IVec2;
use rand::{Rng, SeedableRng};
use rand_pcg::Pcg32;

use crate::agent::{
    update_agent, Agent, BehaviorCtx, Direction, Projectile, ProjectileOwner, ProjectileSpec,
    DYING_FRAMES,
};
use crate::collision::{probe_agents, probe_objects, probe_player, probe_tiles};
use crate::core::{EventQueue, GameEvent, Tuning};
use crate::nav::Pathfinder;

/// Object registry capacity per map
pub const OBJECT_SLOTS: usize = 20;
/// Villager registry capacity per map
pub const VILLAGER_SLOTS: usize = 2;
/// Hostile registry capacity per map
pub const HOSTILE_SLOTS: usize = 8;

/// Errors raised while assembling or mutating a world
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorldError {
    /// The named registry has no free slot on the given map
    SlotsFull(&'static str),
    /// No map with that index exists
    NoSuchMap(usize),
    /// The map failed to load
    Map(MapError),
}

impl fmt::Display for WorldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlotsFull(registry) => write!(f, "no free slot in the {registry} registry"),
            Self::NoSuchMap(index) => write!(f, "no map with index {index}"),
            Self::Map(err) => write!(f, "map error: {err}"),
        }
    }
}

impl std::error::Error for WorldError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Map(err) => Some(err),
            _ => None,
        }
    }
}

impl From<MapError> for WorldError {
    fn from(err: MapError) -> Self {
        Self::Map(err)
    }
}

/// The player's intent for one frame
#[derive(Debug, Clone, Copy, Default)]
pub struct PlayerInput {
    /// Direction to face and walk, or stand still
    pub dir: Option<Direction>,
    /// Throw the player's projectile
    pub fire: bool,
}

/// One map's registries. Slots are nullable so indices stay stable when
/// something is removed.
struct MapState {
    map: TileMap,
    objects: Vec<Option<GameObject>>,
    villagers: Vec<Option<Agent>>,
    hostiles: Vec<Option<Agent>>,
}

impl MapState {
    fn new(map: TileMap) -> Self {
        Self {
            map,
            objects: (0..OBJECT_SLOTS).map(|_| None).collect(),
            villagers: (0..VILLAGER_SLOTS).map(|_| None).collect(),
            hostiles: (0..HOSTILE_SLOTS).map(|_| None).collect(),
        }
    }
}

/// All maps, the player, and the live loop state
pub struct World {
    maps: Vec<MapState>,
    current: usize,
    pub tuning: Tuning,
    pub player: Player,
    pathfinder: Pathfinder,
    projectiles: Vec<Projectile>,
    rng: Pcg32,
    pub events: EventQueue,
    /// Set when the player touches the chest
    pub won: bool,
    frame: u64,
}

impl World {
    /// Build a world with one map active. The seed fixes every random draw
    /// in the run, so two worlds with the same seed and inputs replay the
    /// same.
    #[must_use]
    pub fn new(map: TileMap, tuning: Tuning, player_pos: IVec2, seed: u64) -> Self {
        let pathfinder = Pathfinder::new(map.cols(), map.rows());
        let player = Player::new(player_pos, tuning.player_speed, tuning.player_max_life);
        Self {
            maps: vec![MapState::new(map)],
            current: 0,
            tuning,
            player,
            pathfinder,
            projectiles: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            events: EventQueue::new(),
            won: false,
            frame: 0,
        }
    }

    /// Add another map with empty registries, returning its index
    pub fn add_map(&mut self, map: TileMap) -> usize {
        self.maps.push(MapState::new(map));
        self.maps.len() - 1
    }

    /// Make another map the active one. In-flight projectiles and queued
    /// events do not cross maps.
    pub fn switch_map(&mut self, index: usize, player_pos: IVec2) -> Result<(), WorldError> {
        let state = self.maps.get(index).ok_or(WorldError::NoSuchMap(index))?;
        self.pathfinder.resize(state.map.cols(), state.map.rows());
        self.current = index;
        self.player.pos = player_pos;
        self.projectiles.clear();
        self.events.clear();
        log::info!("switched to map {index}");
        Ok(())
    }

    /// Place an object in the first free slot of map `map_index`
    pub fn spawn_object(
        &mut self,
        map_index: usize,
        object: GameObject,
    ) -> Result<usize, WorldError> {
        let state = self.state_mut(map_index)?;
        Self::place(&mut state.objects, object, "object")
    }

    /// Place a villager in the first free slot of map `map_index`
    pub fn spawn_villager(&mut self, map_index: usize, agent: Agent) -> Result<usize, WorldError> {
        let state = self.state_mut(map_index)?;
        Self::place(&mut state.villagers, agent, "villager")
    }

    /// Place a hostile in the first free slot of map `map_index`
    pub fn spawn_hostile(&mut self, map_index: usize, agent: Agent) -> Result<usize, WorldError> {
        let state = self.state_mut(map_index)?;
        Self::place(&mut state.hostiles, agent, "hostile")
    }

    fn state_mut(&mut self, map_index: usize) -> Result<&mut MapState, WorldError> {
        self.maps
            .get_mut(map_index)
            .ok_or(WorldError::NoSuchMap(map_index))
    }

    fn place<T>(
        slots: &mut [Option<T>],
        value: T,
        registry: &'static str,
    ) -> Result<usize, WorldError> {
        match slots.iter_mut().enumerate().find(|(_, s)| s.is_none()) {
            Some((index, slot)) => {
                *slot = Some(value);
                Ok(index)
            }
            None => Err(WorldError::SlotsFull(registry)),
        }
    }

    /// The active map
    #[must_use]
    pub fn map(&self) -> &TileMap {
        &self.maps[self.current].map
    }

    /// The active map, mutable
    pub fn map_mut(&mut self) -> &mut TileMap {
        &mut self.maps[self.current].map
    }

    #[must_use]
    pub fn current_map(&self) -> usize {
        self.current
    }

    #[must_use]
    pub fn map_count(&self) -> usize {
        self.maps.len()
    }

    /// The active map's object slots
    #[must_use]
    pub fn objects(&self) -> &[Option<GameObject>] {
        &self.maps[self.current].objects
    }

    /// The active map's villager slots
    #[must_use]
    pub fn villagers(&self) -> &[Option<Agent>] {
        &self.maps[self.current].villagers
    }

    /// The active map's hostile slots
    #[must_use]
    pub fn hostiles(&self) -> &[Option<Agent>] {
        &self.maps[self.current].hostiles
    }

    #[must_use]
    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Live hostiles on the active map
    #[must_use]
    pub fn hostiles_alive(&self) -> usize {
        self.maps[self.current].hostiles.iter().flatten().count()
    }

    #[must_use]
    pub fn frame(&self) -> u64 {
        self.frame
    }

    #[must_use]
    pub fn pathfinder(&self) -> &Pathfinder {
        &self.pathfinder
    }

    /// Advance the active map by one frame
    pub fn update(&mut self, input: PlayerInput) {
        self.events.swap();
        self.frame += 1;

        self.update_player(input);
        self.update_villagers();
        self.update_hostiles();
        self.update_projectiles();

        self.player.tick();
    }

    /// Move the player for this frame's input, resolving pickups and doors
    /// along the way. A blocked step still turns the player to face the
    /// obstacle.
    fn update_player(&mut self, input: PlayerInput) {
        if input.fire {
            self.player_fire();
        }
        let Some(dir) = input.dir else {
            return;
        };
        self.player.dir = dir;

        let state = &self.maps[self.current];
        let mover = self.player.mover();
        let mut blocked = probe_tiles(&state.map, self.tuning.tile_size, &mover);

        let hit = probe_objects(&state.objects, &mover);
        if let Some(index) = hit.index {
            self.touch_object(index);
        }
        // Re-read after the touch: an opened door no longer blocks
        let state = &self.maps[self.current];
        if probe_objects(&state.objects, &mover).blocking {
            blocked = true;
        }

        if probe_agents(&state.villagers, &mover).is_some() {
            blocked = true;
        }
        if let Some(slot) = probe_agents(&state.hostiles, &mover) {
            blocked = true;
            let hostile = state.hostiles[slot]
                .as_ref()
                .is_some_and(|a| a.kind.hostile() && !a.dying);
            if hostile && self.player.take_hit(self.tuning.contact_damage) {
                self.events.push(GameEvent::PlayerDamaged {
                    amount: self.tuning.contact_damage,
                    remaining: self.player.life,
                });
            }
        }

        if !blocked {
            self.player.pos += dir.delta() * self.player.speed;
        }
    }

    /// Resolve the player touching object slot `index` on the active map
    fn touch_object(&mut self, index: usize) {
        let Some(object) = self.maps[self.current].objects[index].as_ref() else {
            return;
        };
        let kind = object.kind;
        let cell = object.pos / self.tuning.tile_size;
        let mut consumed = true;

        match kind {
            ObjectKind::Key => self.player.keys += 1,
            ObjectKind::Heart => self.player.heal(2),
            ObjectKind::Money => self.player.coins += 1,
            ObjectKind::Door => {
                if self.player.keys > 0 {
                    self.player.keys -= 1;
                } else {
                    consumed = false;
                }
            }
            ObjectKind::Chest => self.won = true,
        }

        if consumed {
            self.maps[self.current].objects[index] = None;
            log::info!("player touched {kind:?} at {cell}");
            self.events.push(GameEvent::ObjectTouched { kind, cell });
        }
    }

    /// Throw the player's projectile, if none is already in flight
    fn player_fire(&mut self) {
        let live = self
            .projectiles
            .iter()
            .any(|p| p.owner == ProjectileOwner::Player && p.alive);
        if live {
            return;
        }
        let spec = ProjectileSpec {
            name: "dagger",
            speed: self.tuning.projectile_speed,
            life_frames: self.tuning.projectile_life_frames,
        };
        self.projectiles.push(Projectile::from_spec(
            &spec,
            ProjectileOwner::Player,
            self.player.pos,
            self.player.dir,
            self.tuning.tile_size,
        ));
    }

    fn update_villagers(&mut self) {
        for slot in 0..VILLAGER_SLOTS {
            let Some(mut agent) = self.maps[self.current].villagers[slot].take() else {
                continue;
            };
            let state = &self.maps[self.current];
            let mut ctx = BehaviorCtx {
                map: &state.map,
                tile_size: self.tuning.tile_size,
                pathfinder: &mut self.pathfinder,
                objects: &state.objects,
                villagers: &state.villagers,
                hostiles: &state.hostiles,
                player: &mut self.player,
                projectiles: &mut self.projectiles,
                rng: &mut self.rng,
                events: &mut self.events,
                contact_damage: self.tuning.contact_damage,
            };
            update_agent(&mut agent, slot, &mut ctx);
            self.maps[self.current].villagers[slot] = Some(agent);
        }
    }

    fn update_hostiles(&mut self) {
        for slot in 0..HOSTILE_SLOTS {
            let Some(mut agent) = self.maps[self.current].hostiles[slot].take() else {
                continue;
            };

            if agent.dying {
                agent.dying_counter += 1;
                if agent.dying_counter >= DYING_FRAMES {
                    self.reap(slot, agent);
                } else {
                    self.maps[self.current].hostiles[slot] = Some(agent);
                }
                continue;
            }

            let state = &self.maps[self.current];
            let mut ctx = BehaviorCtx {
                map: &state.map,
                tile_size: self.tuning.tile_size,
                pathfinder: &mut self.pathfinder,
                objects: &state.objects,
                villagers: &state.villagers,
                hostiles: &state.hostiles,
                player: &mut self.player,
                projectiles: &mut self.projectiles,
                rng: &mut self.rng,
                events: &mut self.events,
                contact_damage: self.tuning.contact_damage,
            };
            update_agent(&mut agent, slot, &mut ctx);
            self.maps[self.current].hostiles[slot] = Some(agent);
        }
    }

    /// Remove a finished agent and place its drop where it fell
    fn reap(&mut self, slot: usize, agent: Agent) {
        log::info!("{} died in slot {slot}", agent.name);
        self.events.push(GameEvent::AgentDied {
            slot,
            name: agent.name.clone(),
        });

        let ts = self.tuning.tile_size;
        let drop_pos = agent.cell(ts) * ts;
        let kind = if self.rng.gen_range(0..100) < 50 {
            ObjectKind::Heart
        } else {
            ObjectKind::Money
        };
        let drop = GameObject::new(kind, drop_pos, ts);
        // A full registry just means no drop
        if self.spawn_object(self.current, drop).is_err() {
            log::warn!("object registry full, {} dropped nothing", agent.name);
        }
    }

    /// Fly every projectile one step and resolve hits. A projectile expires
    /// on its first hit or when its life runs out.
    fn update_projectiles(&mut self) {
        let mut projectiles = std::mem::take(&mut self.projectiles);

        for projectile in &mut projectiles {
            let mover = projectile.mover();
            match projectile.owner {
                ProjectileOwner::Hostile(_) => {
                    if probe_player(&self.player, &mover) {
                        projectile.alive = false;
                        self.events.push(GameEvent::ProjectileExpended {
                            owner: projectile.owner,
                        });
                        if self.player.take_hit(self.tuning.projectile_damage) {
                            self.events.push(GameEvent::PlayerDamaged {
                                amount: self.tuning.projectile_damage,
                                remaining: self.player.life,
                            });
                        }
                        continue;
                    }
                }
                ProjectileOwner::Player => {
                    let hostiles = &self.maps[self.current].hostiles;
                    if let Some(slot) = probe_agents(hostiles, &mover) {
                        projectile.alive = false;
                        self.events.push(GameEvent::ProjectileExpended {
                            owner: projectile.owner,
                        });
                        if let Some(agent) = self.maps[self.current].hostiles[slot].as_mut() {
                            if !agent.dying {
                                agent.take_hit(self.tuning.projectile_damage, self.player.dir);
                                self.events.push(GameEvent::AgentDamaged {
                                    slot,
                                    remaining: agent.life,
                                });
                            }
                        }
                        continue;
                    }
                }
            }
            projectile.fly();
        }

        projectiles.retain(|p| p.alive);
        self.projectiles = projectiles;
    }
}
