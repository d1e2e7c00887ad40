//! Doors and Hazards
//!
//! Special doors (teleporters, their exit pads, jumpers), static
//! hazards (spikes, lava), and the pool of trap locations that spawn
//! and expire on a timer. Placement is maze-aware when geometry is
//! available: candidates are rejected until their footprint clears the
//! walls and every previously placed entity.
//!
//! Overlap checks run in a fixed priority order, first match wins:
//! teleporter, jumper, trap, spike, lava.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::{DoorConfig, MazeConfig, SessionConfig};
use crate::core::aabb::Aabb;
use crate::core::rng::GameRng;
use crate::game::collision::COLLISION_MARGIN;
use crate::game::maze::Maze;
use crate::game::player::PlayerBody;

/// Placement attempts per entity before it is skipped.
const PLACEMENT_ATTEMPTS: usize = 32;

/// Height above an exit pad where teleported players appear.
const TELEPORT_DROP: f32 = 2.0;

/// What kind of door this is.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub enum DoorKind {
    /// Entry pad that relocates the player to a random exit.
    Teleporter,
    /// Destination pad for teleporters.
    Exit,
    /// Launch pad that throws the player along its direction.
    Jumper {
        /// Unit launch direction, fixed at placement time.
        direction: Vec3,
    },
}

/// A placed door.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Door {
    /// Door behavior.
    pub kind: DoorKind,
    /// Center position.
    pub position: Vec3,
    /// Overlap volume.
    pub volume: Aabb,
}

/// Static hazard variety.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum HazardKind {
    /// Spike patch.
    Spike,
    /// Lava pool.
    Lava,
}

/// A placed static hazard.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct Hazard {
    /// Hazard variety.
    pub kind: HazardKind,
    /// Center position.
    pub position: Vec3,
    /// Overlap volume.
    pub volume: Aabb,
}

/// A fixed candidate spot where traps spawn and expire.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TrapLocation {
    /// Center position.
    pub position: Vec3,
    /// Overlap volume while active.
    pub volume: Aabb,
    active: bool,
    spawned_tick: u64,
    triggered: bool,
}

impl TrapLocation {
    /// Is a trap currently live here?
    pub fn is_active(&self) -> bool {
        self.active
    }
}

/// Result of a hazard overlap check.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum HazardOutcome {
    /// Relocate the player.
    Teleported {
        /// Destination position.
        to: Vec3,
    },
    /// Launch the player with this impulse.
    Launched {
        /// Final impulse to apply, already scaled.
        impulse: Vec3,
    },
    /// An active trap was stepped on.
    TrapHit,
    /// A spike patch was touched.
    SpikeHit,
    /// A lava pool was touched.
    LavaHit,
}

/// All doors, hazards, and trap locations of one level.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct HazardField {
    doors: Vec<Door>,
    hazards: Vec<Hazard>,
    traps: Vec<TrapLocation>,
    // Parallel to `doors`; suppresses jumper re-trigger while the
    // player stays inside the volume.
    jumper_latched: Vec<bool>,
    jumper_force: f32,
    last_trap_spawn: u64,
}

impl HazardField {
    /// Place doors, hazards, and trap locations for a level.
    ///
    /// With maze geometry, candidate positions are random cell centers
    /// whose footprint clears every wall and every entity already
    /// placed; without it, positions are sampled over the nominal map
    /// extent unconstrained. An entity with no valid candidate after a
    /// bounded number of attempts is skipped.
    pub fn place(config: &DoorConfig, geometry: Option<&Maze>, rng: &mut GameRng) -> HazardField {
        // The spawn and goal cells stay free of everything
        let mut taken = Vec::new();
        if let Some(maze) = geometry {
            let cell = Vec3::new(maze.cell_size(), maze.cell_size(), maze.cell_size());
            taken.push(Aabb::from_center_size(
                maze.cell_center(maze.entrance_col(), 0),
                cell,
            ));
            taken.push(Aabb::from_center_size(
                maze.cell_center(maze.exit_col(), maze.size() - 1),
                cell,
            ));
        }
        let mut placer = Placer {
            config,
            geometry,
            rng,
            taken,
        };

        let mut doors = Vec::new();
        for _ in 0..config.teleporter_count {
            if let Some((position, volume)) = placer.floor_spot(0.0) {
                doors.push(Door {
                    kind: DoorKind::Teleporter,
                    position,
                    volume,
                });
            }
        }
        // Exit pads sit at increasing elevations so teleports feel
        // like progress
        for idx in 0..config.exit_count {
            if let Some((position, volume)) = placer.floor_spot((idx + 1) as f32) {
                doors.push(Door {
                    kind: DoorKind::Exit,
                    position,
                    volume,
                });
            }
        }
        for _ in 0..config.jumper_count {
            if let Some((position, volume)) = placer.floor_spot(0.0) {
                let direction = placer.rng.unit_dir_with_lift(0.5);
                doors.push(Door {
                    kind: DoorKind::Jumper { direction },
                    position,
                    volume,
                });
            }
        }

        let mut hazards = Vec::new();
        for (kind, count) in [
            (HazardKind::Spike, config.spike_count),
            (HazardKind::Lava, config.lava_count),
        ] {
            for _ in 0..count {
                if let Some((position, volume)) = placer.floor_spot(0.0) {
                    hazards.push(Hazard {
                        kind,
                        position,
                        volume,
                    });
                }
            }
        }

        let mut traps = Vec::new();
        for _ in 0..config.trap_location_count {
            if let Some((position, volume)) = placer.floor_spot(0.0) {
                traps.push(TrapLocation {
                    position,
                    volume,
                    active: false,
                    spawned_tick: 0,
                    triggered: false,
                });
            }
        }

        let jumper_latched = vec![false; doors.len()];
        debug!(
            doors = doors.len(),
            hazards = hazards.len(),
            trap_locations = traps.len(),
            "hazard field placed"
        );
        HazardField {
            doors,
            hazards,
            traps,
            jumper_latched,
            jumper_force: config.jumper_force,
            last_trap_spawn: 0,
        }
    }

    /// All placed doors.
    pub fn doors(&self) -> &[Door] {
        &self.doors
    }

    /// All placed static hazards.
    pub fn hazards(&self) -> &[Hazard] {
        &self.hazards
    }

    /// All trap locations, active or not.
    pub fn traps(&self) -> &[TrapLocation] {
        &self.traps
    }

    fn exits(&self) -> impl Iterator<Item = &Door> {
        self.doors
            .iter()
            .filter(|d| matches!(d.kind, DoorKind::Exit))
    }

    /// Spawn and expire traps against the tick clock.
    ///
    /// No trap spawns before `grace_until`; afterwards one trap spawns
    /// at a random inactive location every spawn interval and expires
    /// after the configured duration.
    pub fn update_traps(
        &mut self,
        tick: u64,
        grace_until: u64,
        config: &SessionConfig,
        rng: &mut GameRng,
    ) {
        for trap in &mut self.traps {
            if trap.active && tick.saturating_sub(trap.spawned_tick) > config.trap_duration_ticks {
                trap.active = false;
                trap.triggered = false;
            }
        }

        if tick < grace_until {
            return;
        }
        if tick.saturating_sub(self.last_trap_spawn) < config.trap_spawn_interval_ticks {
            return;
        }

        let inactive: Vec<usize> = self
            .traps
            .iter()
            .enumerate()
            .filter(|(_, t)| !t.active)
            .map(|(i, _)| i)
            .collect();
        if let Some(&idx) = inactive.get(rng.index(inactive.len())) {
            let trap = &mut self.traps[idx];
            trap.active = true;
            trap.spawned_tick = tick;
            trap.triggered = false;
            self.last_trap_spawn = tick;
            debug!(location = idx, tick, "trap spawned");
        }
    }

    /// Check the player against everything, in priority order.
    ///
    /// Mutates latch state, so call exactly once per tick.
    pub fn check(
        &mut self,
        body: &PlayerBody,
        geometry: Option<&Maze>,
        in_grace: bool,
        rng: &mut GameRng,
    ) -> Option<HazardOutcome> {
        let player_box =
            Aabb::from_sphere(body.position, body.radius).expanded(COLLISION_MARGIN);

        // Clear jumper latches the player has rolled away from
        for (idx, door) in self.doors.iter().enumerate() {
            if matches!(door.kind, DoorKind::Jumper { .. })
                && !player_box.intersects(&door.volume.expanded(COLLISION_MARGIN))
            {
                self.jumper_latched[idx] = false;
            }
        }

        for door in &self.doors {
            if matches!(door.kind, DoorKind::Teleporter)
                && player_box.intersects(&door.volume.expanded(COLLISION_MARGIN))
            {
                if let Some(to) = self.pick_teleport_destination(body.radius, geometry, rng) {
                    return Some(HazardOutcome::Teleported { to });
                }
            }
        }

        for idx in 0..self.doors.len() {
            let door = self.doors[idx];
            if let DoorKind::Jumper { direction } = door.kind {
                if player_box.intersects(&door.volume.expanded(COLLISION_MARGIN))
                    && !self.jumper_latched[idx]
                {
                    self.jumper_latched[idx] = true;
                    let impulse = launch_impulse(direction, body.velocity, self.jumper_force);
                    return Some(HazardOutcome::Launched { impulse });
                }
            }
        }

        if !in_grace {
            for trap in &mut self.traps {
                if trap.active && !trap.triggered && player_box.intersects(&trap.volume) {
                    trap.triggered = true;
                    return Some(HazardOutcome::TrapHit);
                }
            }
        }

        for kind in [HazardKind::Spike, HazardKind::Lava] {
            for hazard in &self.hazards {
                if hazard.kind == kind && player_box.intersects(&hazard.volume) {
                    return Some(match kind {
                        HazardKind::Spike => HazardOutcome::SpikeHit,
                        HazardKind::Lava => HazardOutcome::LavaHit,
                    });
                }
            }
        }

        None
    }

    /// A random exit pad, lifted above the slab, re-validated against
    /// the walls by searching outward in cell rings when the raw
    /// destination would land inside one.
    fn pick_teleport_destination(
        &self,
        radius: f32,
        geometry: Option<&Maze>,
        rng: &mut GameRng,
    ) -> Option<Vec3> {
        let exits: Vec<&Door> = self.exits().collect();
        let exit = *exits.get(rng.index(exits.len()))?;
        let raw = exit.position + Vec3::new(0.0, TELEPORT_DROP, 0.0);

        let maze = match geometry {
            Some(m) => m,
            None => return Some(raw),
        };
        if maze.footprint_clear(&Aabb::from_sphere(raw, radius)) {
            return Some(raw);
        }

        let (ci, cj) = maze.cell_of(raw)?;
        for ring in 1..maze.size() {
            for (i, j) in ring_cells(ci, cj, ring, maze.size()) {
                let candidate = maze.cell_center(i, j) + Vec3::new(0.0, raw.y, 0.0);
                if maze.footprint_clear(&Aabb::from_sphere(candidate, radius)) {
                    return Some(candidate);
                }
            }
        }
        Some(raw)
    }
}

/// Jumper impulse: mostly the door's own direction, with a kick of
/// reversed approach so the player is thrown back the way they came.
/// A stationary approach degenerates to the pure door direction, so
/// the impulse magnitude is exactly `force`.
fn launch_impulse(direction: Vec3, velocity: Vec3, force: f32) -> Vec3 {
    let approach = Vec3::new(velocity.x, 0.0, velocity.z);
    let blended = if approach.length() > 1e-6 {
        0.7 * direction - 0.3 * approach.normalize()
    } else {
        direction
    };
    blended.normalize() * force
}

/// Cells at exactly Chebyshev distance `ring` from `(ci, cj)`.
fn ring_cells(
    ci: usize,
    cj: usize,
    ring: usize,
    size: usize,
) -> impl Iterator<Item = (usize, usize)> {
    let r = ring as isize;
    let (ci, cj) = (ci as isize, cj as isize);
    let n = size as isize;
    (-r..=r)
        .flat_map(move |dj| (-r..=r).map(move |di| (di, dj)))
        .filter(move |&(di, dj)| di.abs() == r || dj.abs() == r)
        .filter_map(move |(di, dj)| {
            let (i, j) = (ci + di, cj + dj);
            (i >= 0 && i < n && j >= 0 && j < n).then_some((i as usize, j as usize))
        })
}

struct Placer<'a> {
    config: &'a DoorConfig,
    geometry: Option<&'a Maze>,
    rng: &'a mut GameRng,
    taken: Vec<Aabb>,
}

impl Placer<'_> {
    /// Find a clear floor spot, returning its center (lifted by
    /// `elevation`) and overlap volume. `None` after too many failed
    /// attempts.
    fn floor_spot(&mut self, elevation: f32) -> Option<(Vec3, Aabb)> {
        let size = Vec3::new(
            self.config.door_size,
            self.config.door_height,
            self.config.door_size,
        );

        for _ in 0..PLACEMENT_ATTEMPTS {
            let base = match self.geometry {
                Some(maze) => {
                    let i = self.rng.index(maze.size());
                    let j = self.rng.index(maze.size());
                    maze.cell_center(i, j)
                }
                None => {
                    let extent = MazeConfig::default();
                    let w = extent.size as f32 * extent.cell_size;
                    Vec3::new(
                        self.rng.range_f32(-w * 0.5, w * 0.5),
                        0.0,
                        self.rng.range_f32(-w, 0.0),
                    )
                }
            };
            let position = base + Vec3::new(0.0, self.config.door_height + elevation, 0.0);
            let volume = Aabb::from_center_size(position, size);
            let footprint = volume.expanded(COLLISION_MARGIN);

            let clear = self
                .geometry
                .map_or(true, |maze| maze.footprint_clear(&footprint));
            if clear && !self.taken.iter().any(|t| t.intersects(&footprint)) {
                self.taken.push(footprint);
                return Some((position, volume));
            }
        }

        debug!("no valid position found, entity skipped");
        None
    }
}
