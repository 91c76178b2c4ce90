//! Prey phase: flee/forage/flock decision plus lifecycle resolution.
//!
//! Each prey takes exactly one steering decision per tick, by strict
//! priority: flee a predator in vision, else forage when hungry, else flock
//! with nearby prey. The decision runs before the steering kernel, so
//! obstacle avoidance can still override the chosen direction.

use hecs::{Entity, World};
use rand::rngs::SmallRng;

use crate::components::{
    Energy, FoodVision, Position, Prey, ReproductionCooldown, Speed, Velocity, Vision,
};
use crate::config::SimulationConfig;
use crate::math::Vec2;
use crate::stats::Counters;
use crate::systems::lifecycle::{self, ReproductionRules};
use crate::systems::{steering, views};
use crate::world::spawn_prey_at;

fn reproduction_rules(config: &SimulationConfig) -> ReproductionRules {
    ReproductionRules {
        min_energy: config.prey.reproduction_energy,
        cost: config.prey.reproduction_cost,
        cooldown: config.prey.reproduction_cooldown,
        mating_range: config.prey_mating_range,
        birth_offset: config.birth_offset,
    }
}

/// Run behavior, steering, starvation, eating, and reproduction for every
/// prey alive at phase start. The roster is a membership snapshot: newborns
/// spawned mid-phase do not act until the next tick, while state effects
/// (eaten food, partner cooldown resets, moved flockmates) are visible to
/// later prey immediately.
pub fn prey_phase(
    world: &mut World,
    config: &SimulationConfig,
    rng: &mut SmallRng,
    next_spawn_id: &mut u64,
    counters: &mut Counters,
) {
    let roster = views::collect_prey(world);
    for view in roster {
        let entity = view.entity;

        behavior(world, config, entity);
        steering::steer(world, config, entity);

        if lifecycle::is_starved(world, entity) {
            let _ = world.despawn(entity);
            counters.record_prey_death();
            continue;
        }

        eat_nearby_food(world, config, entity);

        if let Some(birth_position) =
            lifecycle::try_reproduce::<Prey>(world, &reproduction_rules(config), rng, entity)
        {
            spawn_prey_at(world, config, rng, next_spawn_id, birth_position);
            counters.record_prey_birth();
        }
    }
}

fn behavior(world: &mut World, config: &SimulationConfig, entity: Entity) {
    if let Ok(mut energy) = world.get::<&mut Energy>(entity) {
        energy.drain(config.prey.metabolic_loss);
    }
    if let Ok(mut cooldown) = world.get::<&mut ReproductionCooldown>(entity) {
        cooldown.tick_down();
    }

    let (position, energy, vision, food_vision) = {
        let Ok(position) = world.get::<&Position>(entity) else {
            return;
        };
        let Ok(energy) = world.get::<&Energy>(entity) else {
            return;
        };
        let Ok(vision) = world.get::<&Vision>(entity) else {
            return;
        };
        let Ok(food_vision) = world.get::<&FoodVision>(entity) else {
            return;
        };
        (position.0, energy.0, vision.0, food_vision.0)
    };

    let predators = views::collect_predators(world);
    if let Some(threat) = views::nearest_agent(position, &predators, vision, None) {
        flee_from(world, entity, position, threat.position);
        return;
    }

    if energy < config.prey.forage_threshold {
        let food = views::collect_food(world);
        if let Some(target) = views::nearest_food(position, &food, food_vision) {
            move_towards(world, entity, position, target.position);
            return;
        }
        // No food in sight: fall through to flocking.
    }

    flock(world, config, entity, position);
}

/// Set velocity to the unit vector pointing away from the threat.
fn flee_from(world: &mut World, entity: Entity, position: Vec2, threat: Vec2) {
    if let Some(direction) = (position - threat).try_normalize() {
        if let Ok(mut velocity) = world.get::<&mut Velocity>(entity) {
            velocity.0 = direction;
        }
    }
}

fn move_towards(world: &mut World, entity: Entity, position: Vec2, target: Vec2) {
    if let Some(direction) = (target - position).try_normalize() {
        if let Ok(mut velocity) = world.get::<&mut Velocity>(entity) {
            velocity.0 = direction;
        }
    }
}

/// Three-rule flocking over the other prey within the flocking radius:
/// separation (only inside the tighter separation sub-radius), alignment,
/// and cohesion, combined by configured weights. Flocking also boosts speed
/// with group size, up to a cap; with no neighbors, speed resets to base and
/// velocity keeps its previous direction.
fn flock(world: &mut World, config: &SimulationConfig, entity: Entity, position: Vec2) {
    let flockmates = views::collect_prey(world);

    let mut separation = Vec2::ZERO;
    let mut alignment = Vec2::ZERO;
    let mut cohesion = Vec2::ZERO;
    let mut neighbors = 0u32;

    for other in &flockmates {
        if other.entity == entity {
            continue;
        }
        let distance = position.distance_to(other.position);
        if distance < config.flocking.radius {
            neighbors += 1;
            if distance < config.flocking.separation_radius {
                separation += position - other.position;
            }
            alignment += other.velocity;
            cohesion += other.position;
        }
    }

    if neighbors > 0 {
        let count = neighbors as f32;
        let alignment = alignment * (1.0 / count);
        let cohesion = cohesion * (1.0 / count) - position;

        let combined = separation * config.flocking.separation_weight
            + alignment * config.flocking.alignment_weight
            + cohesion * config.flocking.cohesion_weight;
        if let Some(direction) = combined.try_normalize() {
            if let Ok(mut velocity) = world.get::<&mut Velocity>(entity) {
                velocity.0 = direction;
            }
        }

        let bonus = (count * config.flocking.speed_bonus).min(config.flocking.speed_bonus_cap);
        if let Ok(mut speed) = world.get::<&mut Speed>(entity) {
            speed.0 = config.prey.base_speed + bonus;
        }
    } else if let Ok(mut speed) = world.get::<&mut Speed>(entity) {
        speed.0 = config.prey.base_speed;
    }
}

/// Consume the first food item (in spawn order) within eating range: energy
/// gain clamped to max, food removed. At most one per prey per tick.
fn eat_nearby_food(world: &mut World, config: &SimulationConfig, entity: Entity) {
    let Ok(position) = world.get::<&Position>(entity).map(|p| p.0) else {
        return;
    };
    let food = views::collect_food(world);
    for item in &food {
        if position.distance_to(item.position) < config.prey_eat_range {
            if let Ok(mut energy) = world.get::<&mut Energy>(entity) {
                energy.gain(config.prey.food_energy_gain, config.prey.max_energy);
            }
            let _ = world.despawn(item.entity);
            break;
        }
    }
}
