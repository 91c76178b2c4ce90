//! Predator phase: nearest-prey pursuit plus lifecycle resolution.
//!
//! Runs after the prey phase has fully resolved, so predators always see the
//! post-prey-phase population.

use hecs::{Entity, World};
use rand::rngs::SmallRng;

use crate::components::{Energy, Position, Predator, ReproductionCooldown, Velocity, Vision};
use crate::config::SimulationConfig;
use crate::stats::Counters;
use crate::systems::lifecycle::{self, ReproductionRules};
use crate::systems::{steering, views};
use crate::world::spawn_predator_at;

fn reproduction_rules(config: &SimulationConfig) -> ReproductionRules {
    ReproductionRules {
        min_energy: config.predator.reproduction_energy,
        cost: config.predator.reproduction_cost,
        cooldown: config.predator.reproduction_cooldown,
        mating_range: config.predator_mating_range,
        birth_offset: config.birth_offset,
    }
}

/// Run behavior, steering, starvation, hunting, and reproduction for every
/// predator alive at phase start, under the same membership-snapshot
/// discipline as the prey phase.
pub fn predator_phase(
    world: &mut World,
    config: &SimulationConfig,
    rng: &mut SmallRng,
    next_spawn_id: &mut u64,
    counters: &mut Counters,
) {
    let roster = views::collect_predators(world);
    for view in roster {
        let entity = view.entity;

        behavior(world, config, entity);
        steering::steer(world, config, entity);

        if lifecycle::is_starved(world, entity) {
            let _ = world.despawn(entity);
            counters.record_predator_death();
            continue;
        }

        eat_nearby_prey(world, config, counters, entity);

        if let Some(birth_position) =
            lifecycle::try_reproduce::<Predator>(world, &reproduction_rules(config), rng, entity)
        {
            spawn_predator_at(world, config, rng, next_spawn_id, birth_position);
            counters.record_predator_birth();
        }
    }
}

/// Metabolism, cooldown, then pursuit: steer toward the nearest prey within
/// vision. With no prey in range the previous velocity carries (inertia),
/// still subject to the steering kernel's obstacle override.
fn behavior(world: &mut World, config: &SimulationConfig, entity: Entity) {
    if let Ok(mut energy) = world.get::<&mut Energy>(entity) {
        energy.drain(config.predator.metabolic_loss);
    }
    if let Ok(mut cooldown) = world.get::<&mut ReproductionCooldown>(entity) {
        cooldown.tick_down();
    }

    let (position, vision) = {
        let Ok(position) = world.get::<&Position>(entity) else {
            return;
        };
        let Ok(vision) = world.get::<&Vision>(entity) else {
            return;
        };
        (position.0, vision.0)
    };

    let prey = views::collect_prey(world);
    if prey.is_empty() {
        return;
    }
    if let Some(target) = views::nearest_agent(position, &prey, vision, None) {
        if let Some(direction) = (target.position - position).try_normalize() {
            if let Ok(mut velocity) = world.get::<&mut Velocity>(entity) {
                velocity.0 = direction;
            }
        }
    }
}

/// Consume the first prey (in spawn order) within eating range: energy gain
/// clamped to max, prey removed and counted as a death. At most one prey per
/// predator per tick.
fn eat_nearby_prey(
    world: &mut World,
    config: &SimulationConfig,
    counters: &mut Counters,
    entity: Entity,
) {
    let Ok(position) = world.get::<&Position>(entity).map(|p| p.0) else {
        return;
    };
    let prey = views::collect_prey(world);
    for target in &prey {
        if position.distance_to(target.position) < config.predator_eat_range {
            if let Ok(mut energy) = world.get::<&mut Energy>(entity) {
                energy.gain(config.predator.prey_energy_gain, config.predator.max_energy);
            }
            let _ = world.despawn(target.entity);
            counters.record_prey_death();
            break;
        }
    }
}
