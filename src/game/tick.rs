//! Per-Frame Update
//!
//! One call to [`tick`] advances a running session by exactly one
//! simulation frame. The mutation order inside a tick is fixed:
//!
//! 1. Phase gate: paused and terminal sessions do not advance
//! 2. Clock: tick counter, HUD timer event, score trickle
//! 3. Player physics integration
//! 4. Wall collision resolution
//! 5. Trap spawn/expiry timers
//! 6. Hazard overlap checks and their outcomes
//! 7. Midpoint bonus
//! 8. Goal detection
//! 9. Out-of-bounds check
//! 10. Event drain into the returned result
//!
//! Replays depend on this order never changing between runs.

use serde::{Deserialize, Serialize};

use crate::config::GameConfig;
use crate::game::collision::resolve_walls;
use crate::game::events::{EventKind, GameEvent};
use crate::game::hazard::HazardOutcome;
use crate::game::input::InputFrame;
use crate::game::state::{GameSession, SessionPhase};
use crate::TICK_RATE;

/// Ticks between score trickle awards.
const SCORE_TRICKLE_INTERVAL: u64 = 100;

/// What one tick produced.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct TickResult {
    /// Tick counter after the update.
    pub tick: u64,
    /// Phase after the update.
    pub phase: SessionPhase,
    /// True once the session is in a terminal phase.
    pub ended: bool,
    /// Events emitted during this tick.
    pub events: Vec<GameEvent>,
}

/// Advance the session one frame.
pub fn tick(session: &mut GameSession, input: &InputFrame) -> TickResult {
    match session.phase() {
        SessionPhase::Paused => {
            return TickResult {
                tick: session.tick_count(),
                phase: SessionPhase::Paused,
                ended: false,
                events: Vec::new(),
            }
        }
        SessionPhase::GameOver | SessionPhase::LevelComplete => {
            return TickResult {
                tick: session.tick_count(),
                phase: session.phase(),
                ended: true,
                events: Vec::new(),
            }
        }
        SessionPhase::Running => {}
    }

    session.tick += 1;
    if session.tick % TICK_RATE as u64 == 0 {
        session.push_event(EventKind::TimerTick {
            elapsed_ms: session.elapsed_ms(),
        });
    }
    if session.tick % SCORE_TRICKLE_INTERVAL == 0 {
        session.score += 1;
    }

    session
        .player
        .update(input, &session.config.tire, &session.config.physics);

    resolve_walls(
        &mut session.player,
        session.maze.wall_segments(),
        &session.config.physics,
        &mut session.rng,
    );

    let grace_until = session.grace_until;
    session.hazards.update_traps(
        session.tick,
        grace_until,
        &session.config.session,
        &mut session.rng,
    );

    let in_grace = session.in_grace();
    let outcome = session.hazards.check(
        &session.player,
        Some(&session.maze),
        in_grace,
        &mut session.rng,
    );
    if let Some(outcome) = outcome {
        apply_hazard_outcome(session, outcome);
    }

    if session.phase() == SessionPhase::Running
        && !session.midpoint_claimed
        && session
            .maze
            .midpoint_volume()
            .contains_point(session.player.position)
    {
        session.claim_midpoint();
    }

    if session.phase() == SessionPhase::Running
        && session
            .maze
            .goal_volume()
            .contains_point(session.player.position)
    {
        session.complete_level();
    }

    if session.phase() == SessionPhase::Running
        && !session.in_grace()
        && !session.maze.in_bounds(
            session.player.position,
            session.config.session.bounds_buffer,
            session.config.session.fall_floor_y,
        )
    {
        session.lose_life();
    }

    let phase = session.phase();
    TickResult {
        tick: session.tick_count(),
        phase,
        ended: matches!(
            phase,
            SessionPhase::GameOver | SessionPhase::LevelComplete
        ),
        events: session.take_events(),
    }
}

fn apply_hazard_outcome(session: &mut GameSession, outcome: HazardOutcome) {
    match outcome {
        HazardOutcome::Teleported { to } => {
            let from = session.player.position;
            session.player.position = to;
            session.score += session.config.session.teleport_score;
            session.push_event(EventKind::Teleported { from, to });
        }
        HazardOutcome::Launched { impulse } => {
            session.player.apply_force(impulse);
            session.score += session.config.session.jump_score;
            session.push_event(EventKind::Jumped { impulse });
        }
        HazardOutcome::TrapHit => {
            session.push_event(EventKind::TrapHit);
            session.lose_life();
        }
        HazardOutcome::SpikeHit => {
            session.push_event(EventKind::SpikeHit);
            session.lose_life();
        }
        HazardOutcome::LavaHit => {
            session.push_event(EventKind::LavaHit);
            session.lose_life();
        }
    }
}

/// Run a fresh session against a scripted input sequence, collecting
/// every emitted event. Stops early if the session ends.
pub fn replay_session(config: &GameConfig, seed: u64, inputs: &[InputFrame]) -> Vec<GameEvent> {
    let mut session = GameSession::new(*config, seed);
    let mut events = Vec::new();
    for input in inputs {
        let result = tick(&mut session, input);
        events.extend(result.events);
        if result.ended {
            break;
        }
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;

    fn session() -> GameSession {
        GameSession::new(GameConfig::default(), 42)
    }

    fn run_idle(session: &mut GameSession, ticks: usize) -> Vec<GameEvent> {
        let mut events = Vec::new();
        for _ in 0..ticks {
            events.extend(tick(session, &InputFrame::idle()).events);
        }
        events
    }

    #[test]
    fn test_tick_advances_clock() {
        let mut s = session();
        let result = tick(&mut s, &InputFrame::idle());
        assert_eq!(result.tick, 1);
        assert!(!result.ended);
    }

    #[test]
    fn test_timer_event_once_per_second() {
        let mut s = session();
        let events = run_idle(&mut s, TICK_RATE as usize * 3);
        let timer_ticks = events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::TimerTick { .. }))
            .count();
        assert_eq!(timer_ticks, 3);
    }

    #[test]
    fn test_score_trickle() {
        let mut s = session();
        run_idle(&mut s, 250);
        assert_eq!(s.score(), 2);
    }

    #[test]
    fn test_paused_session_is_frozen() {
        let mut s = session();
        run_idle(&mut s, 10);
        let tick_before = s.tick_count();
        let pos_before = s.player().position;
        let elapsed_before = s.elapsed_ms();

        s.toggle_pause();
        for _ in 0..100 {
            let result = tick(&mut s, &InputFrame::idle());
            assert!(result.events.is_empty());
            assert!(!result.ended);
        }
        assert_eq!(s.tick_count(), tick_before);
        assert_eq!(s.player().position, pos_before);
        assert_eq!(s.elapsed_ms(), elapsed_before);

        s.toggle_pause();
        tick(&mut s, &InputFrame::idle());
        assert_eq!(s.tick_count(), tick_before + 1);
    }

    #[test]
    fn test_terminal_phase_reports_ended() {
        let mut s = session();
        s.lives = 1;
        s.lose_life();
        s.take_events();

        let result = tick(&mut s, &InputFrame::idle());
        assert!(result.ended);
        assert_eq!(result.phase, SessionPhase::GameOver);
        assert_eq!(s.tick_count(), 0, "terminal sessions do not advance");
    }

    #[test]
    fn test_goal_completes_level_once() {
        let mut s = session();
        run_idle(&mut s, 5);
        let goal = s.maze().goal_volume().center();
        s.player.position = Vec3::new(goal.x, 1.0, goal.z);
        s.player.velocity = Vec3::ZERO;

        let result = tick(&mut s, &InputFrame::idle());
        assert_eq!(result.phase, SessionPhase::LevelComplete);
        let completes = result
            .events
            .iter()
            .filter(|e| matches!(e.kind, EventKind::LevelComplete { .. }))
            .count();
        assert_eq!(completes, 1);

        // Further ticks change nothing
        let again = tick(&mut s, &InputFrame::idle());
        assert!(again.ended);
        assert!(again.events.is_empty());
    }

    #[test]
    fn test_goal_awards_level_score() {
        let mut s = session();
        let goal = s.maze().goal_volume().center();
        s.player.position = Vec3::new(goal.x, 1.0, goal.z);

        tick(&mut s, &InputFrame::idle());
        assert!(s.score() >= s.config().session.level_score);
    }

    // Far past the right edge plus the bounds buffer
    fn escaped_position(s: &GameSession) -> Vec3 {
        let half_w = s.maze().world_width() * 0.5;
        Vec3::new(half_w + s.config().session.bounds_buffer + 5.0, 1.0, -5.0)
    }

    #[test]
    fn test_out_of_bounds_suppressed_during_grace() {
        let mut s = session();
        s.player.position = escaped_position(&s);

        let result = tick(&mut s, &InputFrame::idle());
        assert_eq!(s.lives(), s.config().session.initial_lives);
        assert!(!result.ended);
    }

    #[test]
    fn test_out_of_bounds_costs_a_life() {
        let mut s = session();
        s.tick = s.grace_until;
        s.player.position = escaped_position(&s);

        tick(&mut s, &InputFrame::idle());
        assert_eq!(s.lives(), s.config().session.initial_lives - 1);
        assert_eq!(s.player().position, s.maze().spawn_point());
    }

    #[test]
    fn test_midpoint_bonus_fires_once() {
        let mut s = session();
        s.tick = s.grace_until;
        let mid = s.maze().midpoint_volume().center();

        s.player.position = Vec3::new(mid.x, 1.0, mid.z);
        let first = tick(&mut s, &InputFrame::idle());
        assert!(first
            .events
            .iter()
            .any(|e| matches!(e.kind, EventKind::MidpointBonus)));

        s.player.position = Vec3::new(mid.x, 1.0, mid.z);
        let second = tick(&mut s, &InputFrame::idle());
        assert!(!second
            .events
            .iter()
            .any(|e| matches!(e.kind, EventKind::MidpointBonus)));
    }

    #[test]
    fn test_lives_never_negative() {
        let mut s = session();
        s.tick = s.grace_until;
        for _ in 0..10 {
            s.player.position = escaped_position(&s);
            s.grace_until = 0;
            let result = tick(&mut s, &InputFrame::idle());
            if result.ended {
                break;
            }
        }
        assert_eq!(s.lives(), 0);
        assert_eq!(s.phase(), SessionPhase::GameOver);
    }

    #[test]
    fn test_replay_determinism() {
        let config = GameConfig::default();
        let script: Vec<InputFrame> = (0..1200)
            .map(|i| InputFrame {
                forward: true,
                left: i % 120 < 40,
                right: i % 120 >= 80,
                backward: false,
            })
            .collect();

        let a = replay_session(&config, 777, &script);
        let b = replay_session(&config, 777, &script);
        assert_eq!(a, b);
    }

    #[test]
    fn test_different_seeds_different_mazes() {
        let a = GameSession::new(GameConfig::default(), 1);
        let b = GameSession::new(GameConfig::default(), 2);
        assert_ne!(a.maze().wall_segments(), b.maze().wall_segments());
    }
}
