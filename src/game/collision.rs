//! Wall Collision Resolution
//!
//! The player is tested as its bounding cube, expanded by a small
//! margin so grazing contacts register reliably. Resolution is
//! minimum-penetration-axis: reflect the velocity component on that
//! axis, push the body out, damp the whole velocity.

use glam::Vec3;
use tracing::trace;

use crate::config::PhysicsConfig;
use crate::core::aabb::Aabb;
use crate::core::rng::GameRng;
use crate::game::player::PlayerBody;

/// Expansion applied to the player box before overlap tests.
pub const COLLISION_MARGIN: f32 = 0.1;

/// Extra separation added when pushing the body out of a wall.
const PUSH_EPSILON: f32 = 0.001;

/// Below this horizontal speed a body counts as resting for the
/// anti-stuck check.
const REST_SPEED: f32 = 0.01;

/// Axis along which a collision was resolved.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResolvedAxis {
    /// Side hit on a wall running along z.
    X,
    /// Landed on top of (or bumped under) a wall.
    Y,
    /// Side hit on a wall running along x.
    Z,
}

/// Resolve the player against the wall set.
///
/// Only the first overlapping wall is resolved per tick; at tire scale
/// a second simultaneous overlap is a corner case the next tick picks
/// up. Returns the resolved axis, if any.
pub fn resolve_walls(
    body: &mut PlayerBody,
    walls: &[Aabb],
    physics: &PhysicsConfig,
    rng: &mut GameRng,
) -> Option<ResolvedAxis> {
    let player_box = Aabb::from_sphere(body.position, body.radius).expanded(COLLISION_MARGIN);

    let hit = walls.iter().find(|wall| player_box.intersects(wall))?;
    let depths = player_box.overlap_depths(hit);
    let wall_center = hit.center();

    let axis = if depths.x < depths.y && depths.x < depths.z {
        let push = depths.x + PUSH_EPSILON;
        body.velocity.x = -body.velocity.x * physics.restitution;
        body.position.x += if body.position.x < wall_center.x {
            -push
        } else {
            push
        };
        ResolvedAxis::X
    } else if depths.y < depths.x && depths.y < depths.z {
        let push = depths.y + PUSH_EPSILON;
        body.velocity.y = -body.velocity.y * physics.restitution;
        body.position.y += if body.position.y < wall_center.y {
            -push
        } else {
            push
        };
        ResolvedAxis::Y
    } else {
        let push = depths.z + PUSH_EPSILON;
        body.velocity.z = -body.velocity.z * physics.restitution;
        body.position.z += if body.position.z < wall_center.z {
            -push
        } else {
            push
        };
        ResolvedAxis::Z
    };

    body.velocity *= physics.collision_damping;
    trace!(?axis, ?depths, "wall collision resolved");

    nudge_if_resting_on_wall(body, hit, rng);
    Some(axis)
}

/// A tire that comes to rest balanced on a wall's top face can sit
/// there forever, out of reach of its own controls. Detect that pose
/// and knock it off with a small random sideways shove and a downward
/// push.
fn nudge_if_resting_on_wall(body: &mut PlayerBody, wall: &Aabb, rng: &mut GameRng) {
    let horizontal = Vec3::new(body.velocity.x, 0.0, body.velocity.z);
    if horizontal.length() > REST_SPEED {
        return;
    }

    let bottom = body.position.y - body.radius;
    let on_top = (bottom - wall.max.y).abs() < 0.3
        && body.position.x > wall.min.x
        && body.position.x < wall.max.x
        && body.position.z > wall.min.z
        && body.position.z < wall.max.z;
    if !on_top {
        return;
    }

    body.velocity.x += rng.range_f32(-0.05, 0.05);
    body.velocity.z += rng.range_f32(-0.05, 0.05);
    body.velocity.y = -0.05;
    trace!(position = ?body.position, "nudged body off wall top");
}

#[cfg(test)]
mod tests {
    use super::*;

    fn wall_along_z(x: f32) -> Aabb {
        Aabb::from_center_size(Vec3::new(x, 1.5, 0.0), Vec3::new(0.5, 3.0, 5.0))
    }

    #[test]
    fn test_no_walls_no_resolution() {
        let mut body = PlayerBody::new(Vec3::new(0.0, 1.0, 0.0), 1.0);
        let mut rng = GameRng::new(0);
        assert_eq!(
            resolve_walls(&mut body, &[], &PhysicsConfig::default(), &mut rng),
            None
        );
    }

    #[test]
    fn test_side_hit_reflects_and_pushes_out() {
        let physics = PhysicsConfig::default();
        let mut rng = GameRng::new(0);
        let wall = wall_along_z(2.0);

        let mut body = PlayerBody::new(Vec3::new(1.0, 1.0, 0.0), 1.0);
        body.velocity = Vec3::new(0.1, 0.0, 0.0);

        let axis = resolve_walls(&mut body, &[wall], &physics, &mut rng);
        assert_eq!(axis, Some(ResolvedAxis::X));
        assert!(body.velocity.x < 0.0, "bounced back");
        assert!(
            body.velocity.x.abs() <= 0.1 * physics.restitution * physics.collision_damping + 1e-6
        );

        // Separated after resolution
        let player_box = Aabb::from_sphere(body.position, body.radius).expanded(COLLISION_MARGIN);
        assert!(!player_box.intersects(&wall));
    }

    #[test]
    fn test_approach_from_far_side() {
        let physics = PhysicsConfig::default();
        let mut rng = GameRng::new(0);
        let wall = wall_along_z(-2.0);

        let mut body = PlayerBody::new(Vec3::new(-1.0, 1.0, 0.0), 1.0);
        body.velocity = Vec3::new(-0.1, 0.0, 0.0);

        resolve_walls(&mut body, &[wall], &physics, &mut rng);
        assert!(body.velocity.x > 0.0);
        assert!(body.position.x > -1.0, "pushed away from the wall");
    }

    #[test]
    fn test_rest_on_wall_top_gets_nudged() {
        let physics = PhysicsConfig::default();
        let mut rng = GameRng::new(1);
        let wall = wall_along_z(0.0);

        // Balanced on top of the wall (top at y = 3), barely overlapping
        let mut body = PlayerBody::new(Vec3::new(0.0, 3.95, 0.0), 1.0);
        body.velocity = Vec3::ZERO;

        resolve_walls(&mut body, &[wall], &physics, &mut rng);
        let horizontal = Vec3::new(body.velocity.x, 0.0, body.velocity.z);
        assert!(horizontal.length() > 0.0, "sideways shove applied");
        assert!(body.velocity.y < 0.0, "pushed downward");
    }

    #[test]
    fn test_moving_body_on_wall_top_not_nudged() {
        let physics = PhysicsConfig::default();
        let mut rng = GameRng::new(1);
        let wall = wall_along_z(0.0);

        let mut body = PlayerBody::new(Vec3::new(0.0, 3.95, 0.0), 1.0);
        body.velocity = Vec3::new(0.0, 0.0, 0.09);

        resolve_walls(&mut body, &[wall], &physics, &mut rng);
        assert!(body.velocity.y >= -1e-6, "no downward shove while rolling");
    }
}
