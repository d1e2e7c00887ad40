//! Game Session State
//!
//! One session owns the maze, the hazard field, the player body, and
//! the bookkeeping around them: lives, score, the tick clock, the
//! grace deadline, and the phase machine. Construction is explicit and
//! ordered so a seed fully determines the level: RNG first, maze from
//! the RNG, hazards from the maze, player at the maze's spawn point.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::config::GameConfig;
use crate::core::rng::GameRng;
use crate::game::events::{EventKind, GameEvent};
use crate::game::hazard::HazardField;
use crate::game::maze::Maze;
use crate::game::player::PlayerBody;
use crate::TICK_MS;

/// Where the session is in its lifecycle.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum SessionPhase {
    /// The simulation advances every tick.
    Running,
    /// Frozen; ticks are no-ops until unpaused.
    Paused,
    /// Lives ran out. Terminal until restart.
    GameOver,
    /// The goal was reached. Terminal until restart.
    LevelComplete,
}

/// A complete game session.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct GameSession {
    pub(crate) config: GameConfig,
    pub(crate) rng: GameRng,
    pub(crate) maze: Maze,
    pub(crate) hazards: HazardField,
    pub(crate) player: PlayerBody,
    pub(crate) phase: SessionPhase,
    pub(crate) tick: u64,
    pub(crate) lives: u32,
    pub(crate) score: u32,
    pub(crate) grace_until: u64,
    pub(crate) midpoint_claimed: bool,
    pub(crate) pending_events: Vec<GameEvent>,
}

impl GameSession {
    /// Build a session from a configuration and a seed.
    pub fn new(config: GameConfig, seed: u64) -> GameSession {
        let mut rng = GameRng::new(seed);
        let maze = Maze::generate(&config.maze, &mut rng);
        let hazards = HazardField::place(&config.doors, Some(&maze), &mut rng);
        let player = PlayerBody::new(maze.spawn_point(), config.tire.radius);

        info!(seed, maze_size = config.maze.size, "session created");
        GameSession {
            grace_until: config.session.grace_period_ticks,
            lives: config.session.initial_lives,
            config,
            rng,
            maze,
            hazards,
            player,
            phase: SessionPhase::Running,
            tick: 0,
            score: 0,
            midpoint_claimed: false,
            pending_events: Vec::new(),
        }
    }

    /// Current lifecycle phase.
    pub fn phase(&self) -> SessionPhase {
        self.phase
    }

    /// Ticks advanced so far.
    pub fn tick_count(&self) -> u64 {
        self.tick
    }

    /// Session time in milliseconds, derived from the tick counter.
    pub fn elapsed_ms(&self) -> u64 {
        self.tick * TICK_MS
    }

    /// Remaining lives.
    pub fn lives(&self) -> u32 {
        self.lives
    }

    /// Accumulated score.
    pub fn score(&self) -> u32 {
        self.score
    }

    /// The maze geometry, for renderers.
    pub fn maze(&self) -> &Maze {
        &self.maze
    }

    /// Doors, hazards, and traps, for renderers.
    pub fn hazards(&self) -> &HazardField {
        &self.hazards
    }

    /// The player body, for renderers and cameras.
    pub fn player(&self) -> &PlayerBody {
        &self.player
    }

    /// The configuration the session runs with.
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    /// Is the post-spawn grace period still in effect?
    pub fn in_grace(&self) -> bool {
        self.tick < self.grace_until
    }

    /// Flip between Running and Paused. Terminal phases stay put.
    pub fn toggle_pause(&mut self) {
        self.phase = match self.phase {
            SessionPhase::Running => SessionPhase::Paused,
            SessionPhase::Paused => SessionPhase::Running,
            terminal => terminal,
        };
        debug!(phase = ?self.phase, "pause toggled");
    }

    /// Start over from any phase: a fresh maze and hazard field from
    /// the next RNG draws, the player back at spawn, lives, score,
    /// clock, and one-shot flags reset.
    pub fn restart(&mut self) {
        self.maze = Maze::generate(&self.config.maze, &mut self.rng);
        self.hazards = HazardField::place(&self.config.doors, Some(&self.maze), &mut self.rng);
        self.player = PlayerBody::new(self.maze.spawn_point(), self.config.tire.radius);
        self.phase = SessionPhase::Running;
        self.tick = 0;
        self.lives = self.config.session.initial_lives;
        self.score = 0;
        self.grace_until = self.config.session.grace_period_ticks;
        self.midpoint_claimed = false;
        self.pending_events.clear();
        info!("session restarted");
    }

    /// Queue an event stamped with the current tick.
    pub(crate) fn push_event(&mut self, kind: EventKind) {
        self.pending_events.push(GameEvent::new(self.tick, kind));
    }

    /// Hand out everything queued since the last drain.
    pub(crate) fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.pending_events)
    }

    /// Take a hit: lose a life, then either respawn under a fresh
    /// grace period or end the game.
    pub(crate) fn lose_life(&mut self) {
        self.lives = self.lives.saturating_sub(1);
        self.push_event(EventKind::LivesChanged { lives: self.lives });

        if self.lives == 0 {
            self.phase = SessionPhase::GameOver;
            self.push_event(EventKind::GameOver);
            info!(score = self.score, "game over");
        } else {
            self.player.reset(self.maze.spawn_point());
            self.grace_until = self.tick + self.config.session.grace_period_ticks;
            debug!(lives = self.lives, "respawned");
        }
    }

    /// First visit to the midpoint: one extra life.
    pub(crate) fn claim_midpoint(&mut self) {
        self.midpoint_claimed = true;
        self.lives += 1;
        self.push_event(EventKind::MidpointBonus);
        self.push_event(EventKind::LivesChanged { lives: self.lives });
    }

    /// Enter the terminal LevelComplete phase.
    pub(crate) fn complete_level(&mut self) {
        self.score += self.config.session.level_score;
        self.phase = SessionPhase::LevelComplete;
        self.push_event(EventKind::GoalReached);
        self.push_event(EventKind::LevelComplete {
            elapsed_ms: self.elapsed_ms(),
            lives_remaining: self.lives,
        });
        info!(elapsed_ms = self.elapsed_ms(), score = self.score, "level complete");
    }
}
