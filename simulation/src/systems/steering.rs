//! Steering kernel shared by all mobile agents.
//!
//! Runs once per tick per agent, after its behavior has set a tentative
//! velocity: obstacle avoidance (which overrides the behavior's choice),
//! position integration, reflective boundary bounce, clamp, and trail
//! append. This operation never fails; degenerate zero-length vectors mean
//! "no directional change".

use hecs::{Entity, World};

use crate::components::{Position, Speed, Trail, Velocity};
use crate::config::SimulationConfig;
use crate::math::Vec2;
use crate::systems::views::{self, ObstacleView};

/// Accumulated push away from every obstacle whose influence circle
/// (`radius + avoidance_offset`) contains the agent. Closer obstacles
/// dominate via the `1 / max(distance, 1)` falloff. An agent exactly on an
/// obstacle center contributes nothing.
pub fn avoidance(position: Vec2, obstacles: &[ObstacleView], avoidance_offset: f32) -> Vec2 {
    let mut push = Vec2::ZERO;
    for obstacle in obstacles {
        let distance = position.distance_to(obstacle.position);
        if distance < obstacle.radius + avoidance_offset {
            if let Some(direction) = (position - obstacle.position).try_normalize() {
                push += direction * (1.0 / distance.max(1.0));
            }
        }
    }
    push
}

/// Advance one agent by one tick.
///
/// Bounce and clamp run every tick the integrated position is out of range,
/// not only on first contact; the sign flip is checked against the
/// pre-clamp coordinate.
pub fn update_position(
    position: &mut Vec2,
    velocity: &mut Vec2,
    speed: f32,
    trail: &mut Trail,
    obstacles: &[ObstacleView],
    config: &SimulationConfig,
) {
    // Obstacle avoidance has strictly higher priority than the behavior's
    // chosen direction.
    if let Some(direction) = avoidance(*position, obstacles, config.avoidance_offset).try_normalize()
    {
        *velocity = direction;
    }

    *position += *velocity * speed;

    if position.x < 0.0 || position.x > config.width {
        velocity.x = -velocity.x;
    }
    if position.y < 0.0 || position.y > config.height {
        velocity.y = -velocity.y;
    }

    position.x = position.x.clamp(0.0, config.width);
    position.y = position.y.clamp(0.0, config.height);

    trail.push(*position);
}

/// Run the kernel for one ECS entity against the current obstacle set.
pub fn steer(world: &mut World, config: &SimulationConfig, entity: Entity) {
    let obstacles = views::collect_obstacles(world);
    let speed = match world.get::<&Speed>(entity) {
        Ok(speed) => speed.0,
        Err(_) => return,
    };
    if let Ok((position, velocity, trail)) =
        world.query_one_mut::<(&mut Position, &mut Velocity, &mut Trail)>(entity)
    {
        update_position(
            &mut position.0,
            &mut velocity.0,
            speed,
            trail,
            &obstacles,
            config,
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_config() -> SimulationConfig {
        SimulationConfig {
            width: 100.0,
            height: 100.0,
            ..Default::default()
        }
    }

    #[test]
    fn test_position_stays_in_bounds() {
        let config = test_config();
        let mut position = Vec2::new(99.0, 50.0);
        let mut velocity = Vec2::new(1.0, 0.0);
        let mut trail = Trail::default();

        for _ in 0..50 {
            update_position(&mut position, &mut velocity, 5.0, &mut trail, &[], &config);
            assert!(position.x >= 0.0 && position.x <= config.width);
            assert!(position.y >= 0.0 && position.y <= config.height);
        }
    }

    #[test]
    fn test_boundary_bounce_flips_velocity() {
        let config = test_config();
        let mut position = Vec2::new(99.0, 50.0);
        let mut velocity = Vec2::new(1.0, 0.0);
        let mut trail = Trail::default();

        update_position(&mut position, &mut velocity, 5.0, &mut trail, &[], &config);
        assert_eq!(velocity, Vec2::new(-1.0, 0.0));
        assert_eq!(position, Vec2::new(100.0, 50.0));

        // Next tick moves back inside; no further flip.
        update_position(&mut position, &mut velocity, 5.0, &mut trail, &[], &config);
        assert_eq!(velocity, Vec2::new(-1.0, 0.0));
        assert_eq!(position, Vec2::new(95.0, 50.0));
    }

    #[test]
    fn test_clamp_is_idempotent_in_bounds() {
        let config = test_config();
        let mut position = Vec2::new(40.0, 40.0);
        let mut velocity = Vec2::new(0.0, 1.0);
        let mut trail = Trail::default();

        // Zero speed: integration is a no-op, so two updates must leave the
        // in-bounds position untouched.
        update_position(&mut position, &mut velocity, 0.0, &mut trail, &[], &config);
        update_position(&mut position, &mut velocity, 0.0, &mut trail, &[], &config);
        assert_eq!(position, Vec2::new(40.0, 40.0));
        assert_eq!(velocity, Vec2::new(0.0, 1.0));
    }

    #[test]
    fn test_avoidance_overrides_behavior_velocity() {
        let config = test_config();
        let obstacles = [ObstacleView {
            position: Vec2::new(60.0, 50.0),
            radius: 10.0,
        }];
        // Heading straight at an obstacle 20 units away, inside its
        // influence radius of 10 + 30.
        let mut position = Vec2::new(40.0, 50.0);
        let mut velocity = Vec2::new(1.0, 0.0);
        let mut trail = Trail::default();

        update_position(&mut position, &mut velocity, 2.0, &mut trail, &obstacles, &config);
        // Velocity was replaced with the unit vector away from the obstacle.
        assert_eq!(velocity, Vec2::new(-1.0, 0.0));
        assert_eq!(position, Vec2::new(38.0, 50.0));
    }

    #[test]
    fn test_agent_on_obstacle_center_is_no_change() {
        let obstacles = [ObstacleView {
            position: Vec2::new(50.0, 50.0),
            radius: 10.0,
        }];
        let push = avoidance(Vec2::new(50.0, 50.0), &obstacles, 30.0);
        assert_eq!(push, Vec2::ZERO);
    }

    #[test]
    fn test_closer_obstacle_dominates() {
        let obstacles = [
            ObstacleView {
                position: Vec2::new(10.0, 0.0),
                radius: 10.0,
            },
            ObstacleView {
                position: Vec2::new(-30.0, 0.0),
                radius: 10.0,
            },
        ];
        let push = avoidance(Vec2::ZERO, &obstacles, 30.0);
        // Near obstacle pushes -x with weight 1/10, far one pushes +x with
        // weight 1/30; net is away from the near obstacle.
        assert!(push.x < 0.0);
    }

    #[test]
    fn test_trail_appended_each_update() {
        let config = test_config();
        let mut position = Vec2::new(50.0, 50.0);
        let mut velocity = Vec2::new(1.0, 0.0);
        let mut trail = Trail::default();

        for _ in 0..3 {
            update_position(&mut position, &mut velocity, 1.0, &mut trail, &[], &config);
        }
        assert_eq!(trail.len(), 3);
        assert_eq!(trail.iter().last().unwrap().x, 53.0);
    }
}
