//! Read-only snapshots of the population for behavior computations.
//!
//! Behaviors never hold references into the ECS while mutating it; they work
//! from these copied views, re-collected per acting agent so effects applied
//! earlier in a phase (a removed food item, a moved flockmate) are visible to
//! later agents. Every collector sorts by `SpawnId`, which makes "first
//! match" and nearest-neighbor tie-breaks mean insertion order.

use hecs::{Entity, World};

use crate::components::{Food, Obstacle, Position, Predator, Prey, SpawnId, Velocity};
use crate::math::Vec2;

/// A mobile agent as seen by another agent's behavior.
#[derive(Debug, Clone, Copy)]
pub struct AgentView {
    pub entity: Entity,
    pub id: SpawnId,
    pub position: Vec2,
    pub velocity: Vec2,
}

#[derive(Debug, Clone, Copy)]
pub struct FoodView {
    pub entity: Entity,
    pub id: SpawnId,
    pub position: Vec2,
}

#[derive(Debug, Clone, Copy)]
pub struct ObstacleView {
    pub position: Vec2,
    pub radius: f32,
}

pub fn collect_prey(world: &World) -> Vec<AgentView> {
    let mut views: Vec<AgentView> = world
        .query::<(&SpawnId, &Position, &Velocity)>()
        .with::<&Prey>()
        .iter()
        .map(|(entity, (id, position, velocity))| AgentView {
            entity,
            id: *id,
            position: position.0,
            velocity: velocity.0,
        })
        .collect();
    views.sort_by_key(|view| view.id);
    views
}

pub fn collect_predators(world: &World) -> Vec<AgentView> {
    let mut views: Vec<AgentView> = world
        .query::<(&SpawnId, &Position, &Velocity)>()
        .with::<&Predator>()
        .iter()
        .map(|(entity, (id, position, velocity))| AgentView {
            entity,
            id: *id,
            position: position.0,
            velocity: velocity.0,
        })
        .collect();
    views.sort_by_key(|view| view.id);
    views
}

pub fn collect_food(world: &World) -> Vec<FoodView> {
    let mut views: Vec<FoodView> = world
        .query::<(&SpawnId, &Position, &Food)>()
        .iter()
        .map(|(entity, (id, position, _))| FoodView {
            entity,
            id: *id,
            position: position.0,
        })
        .collect();
    views.sort_by_key(|view| view.id);
    views
}

pub fn collect_obstacles(world: &World) -> Vec<ObstacleView> {
    let mut views: Vec<(SpawnId, ObstacleView)> = world
        .query::<(&SpawnId, &Position, &Obstacle)>()
        .iter()
        .map(|(_, (id, position, obstacle))| {
            (
                *id,
                ObstacleView {
                    position: position.0,
                    radius: obstacle.radius,
                },
            )
        })
        .collect();
    views.sort_by_key(|(id, _)| *id);
    views.into_iter().map(|(_, view)| view).collect()
}

/// Nearest agent within `range` (strict `<`), skipping `exclude`.
/// Ties resolve to the earliest-spawned candidate.
pub fn nearest_agent(
    from: Vec2,
    agents: &[AgentView],
    range: f32,
    exclude: Option<Entity>,
) -> Option<AgentView> {
    let mut nearest = None;
    let mut min_dist = range;
    for view in agents {
        if exclude == Some(view.entity) {
            continue;
        }
        let dist = from.distance_to(view.position);
        if dist < min_dist {
            min_dist = dist;
            nearest = Some(*view);
        }
    }
    nearest
}

/// Nearest food item within `range` (strict `<`).
pub fn nearest_food(from: Vec2, food: &[FoodView], range: f32) -> Option<FoodView> {
    let mut nearest = None;
    let mut min_dist = range;
    for view in food {
        let dist = from.distance_to(view.position);
        if dist < min_dist {
            min_dist = dist;
            nearest = Some(*view);
        }
    }
    nearest
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::components::{Energy, ReproductionCooldown, Speed, Trail, Vision};

    fn spawn_prey(world: &mut World, id: u64, position: Vec2) -> Entity {
        world.spawn((
            SpawnId(id),
            Prey,
            Position(position),
            Velocity(Vec2::new(1.0, 0.0)),
            Speed(2.0),
            Trail::default(),
            Energy(100.0),
            ReproductionCooldown::default(),
            Vision(100.0),
        ))
    }

    #[test]
    fn test_collect_sorts_by_spawn_order() {
        let mut world = World::new();
        // Spawn out of order to make sure sorting is doing the work.
        spawn_prey(&mut world, 7, Vec2::new(1.0, 0.0));
        spawn_prey(&mut world, 3, Vec2::new(2.0, 0.0));
        spawn_prey(&mut world, 5, Vec2::new(3.0, 0.0));

        let views = collect_prey(&world);
        let ids: Vec<u64> = views.iter().map(|v| v.id.0).collect();
        assert_eq!(ids, vec![3, 5, 7]);
    }

    #[test]
    fn test_nearest_agent_strict_range_and_exclusion() {
        let mut world = World::new();
        let near = spawn_prey(&mut world, 1, Vec2::new(10.0, 0.0));
        spawn_prey(&mut world, 2, Vec2::new(20.0, 0.0));
        let views = collect_prey(&world);

        // Exactly at range is not "within" (strict <).
        assert!(nearest_agent(Vec2::ZERO, &views, 10.0, None).is_none());

        let found = nearest_agent(Vec2::ZERO, &views, 15.0, None).unwrap();
        assert_eq!(found.entity, near);

        // Excluding the nearest falls back to nothing inside the range.
        assert!(nearest_agent(Vec2::ZERO, &views, 15.0, Some(near)).is_none());
    }

    #[test]
    fn test_nearest_tie_breaks_by_insertion_order() {
        let mut world = World::new();
        let first = spawn_prey(&mut world, 1, Vec2::new(10.0, 0.0));
        spawn_prey(&mut world, 2, Vec2::new(-10.0, 0.0));
        let views = collect_prey(&world);

        let found = nearest_agent(Vec2::ZERO, &views, 50.0, None).unwrap();
        assert_eq!(found.entity, first);
    }
}
