//! Reproduction and death rules shared by both species.
//!
//! Species differ only in their constants and in the offspring they spawn,
//! so eligibility and partner search are generic over the species marker.

use hecs::{Entity, World};
use rand::rngs::SmallRng;
use rand::Rng;

use crate::components::{Energy, Position, ReproductionCooldown, SpawnId};
use crate::math::Vec2;

/// Species-specific reproduction constants.
#[derive(Debug, Clone, Copy)]
pub struct ReproductionRules {
    /// Minimum energy to be eligible.
    pub min_energy: f32,
    /// Energy paid by the initiator (never clamped).
    pub cost: f32,
    /// Cooldown value set on both initiator and partner.
    pub cooldown: u32,
    /// Maximum distance to a partner (strict `<`).
    pub mating_range: f32,
    /// Offspring offset range per axis: `[-birth_offset, birth_offset]`.
    pub birth_offset: i32,
}

pub fn is_eligible(energy: &Energy, cooldown: &ReproductionCooldown, min_energy: f32) -> bool {
    energy.0 >= min_energy && cooldown.is_ready()
}

/// Attempt one reproduction for `entity` against the live population of its
/// species. On success the initiator pays the cost and both agents' cooldowns
/// reset (the partner's energy is untouched, modeling a mating cost paid only
/// by the initiator); the offspring spawn position is returned for the caller
/// to spawn the species-specific bundle. At most one reproduction per agent
/// per tick.
pub fn try_reproduce<S: hecs::Component>(
    world: &mut World,
    rules: &ReproductionRules,
    rng: &mut SmallRng,
    entity: Entity,
) -> Option<Vec2> {
    let position = world.get::<&Position>(entity).ok()?.0;
    {
        let energy = world.get::<&Energy>(entity).ok()?;
        let cooldown = world.get::<&ReproductionCooldown>(entity).ok()?;
        if !is_eligible(&energy, &cooldown, rules.min_energy) {
            return None;
        }
    }

    // Partner: first distinct eligible agent of the same species, in spawn
    // order, within mating range. This scans the live population, so agents
    // born or reset earlier in the same phase are seen.
    let mut candidates: Vec<(SpawnId, Entity, Vec2)> = world
        .query::<(&SpawnId, &Position, &Energy, &ReproductionCooldown)>()
        .with::<&S>()
        .iter()
        .filter(|&(other, (_, _, energy, cooldown))| {
            other != entity && is_eligible(energy, cooldown, rules.min_energy)
        })
        .map(|(other, (id, pos, _, _))| (*id, other, pos.0))
        .collect();
    candidates.sort_by_key(|(id, _, _)| *id);

    let (_, partner, _) = *candidates
        .iter()
        .find(|(_, _, pos)| position.distance_to(*pos) < rules.mating_range)?;

    if let Ok(mut energy) = world.get::<&mut Energy>(entity) {
        energy.drain(rules.cost);
    }
    if let Ok(mut cooldown) = world.get::<&mut ReproductionCooldown>(entity) {
        cooldown.0 = rules.cooldown;
    }
    if let Ok(mut cooldown) = world.get::<&mut ReproductionCooldown>(partner) {
        cooldown.0 = rules.cooldown;
    }

    let offset = Vec2::new(
        rng.gen_range(-rules.birth_offset..=rules.birth_offset) as f32,
        rng.gen_range(-rules.birth_offset..=rules.birth_offset) as f32,
    );
    Some(position + offset)
}

/// True when the agent's energy has run out and it must be removed.
pub fn is_starved(world: &World, entity: Entity) -> bool {
    world
        .get::<&Energy>(entity)
        .map(|energy| energy.is_depleted())
        .unwrap_or(true)
}
