//! Simulation world - main orchestrator.
//!
//! Owns the four populations (prey, predators, food, obstacles), the RNG,
//! and all counters. One `tick()` advances the ecosystem by one frame:
//! the full prey phase, then the full predator phase, then timed food
//! replenishment, and finally the tick's statistics snapshot.

use hecs::{Entity, World};
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use tracing::info;

use crate::command::Command;
use crate::components::*;
use crate::config::SimulationConfig;
use crate::math::Vec2;
use crate::stats::{average, Counters, TickStats};
use crate::systems;

/// Margin from the arena edge for randomly placed agents.
const AGENT_SPAWN_MARGIN: f32 = 50.0;
/// Margin for randomly placed food.
const FOOD_SPAWN_MARGIN: f32 = 20.0;
/// Margin for randomly placed obstacles at reset.
const OBSTACLE_SPAWN_MARGIN: f32 = 100.0;
/// Radius range for randomly placed obstacles.
const OBSTACLE_RADIUS_RANGE: std::ops::RangeInclusive<f32> = 30.0..=60.0;

/// A random unit direction for a freshly spawned agent.
pub fn random_unit_velocity(rng: &mut SmallRng) -> Vec2 {
    loop {
        let raw = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        if let Some(unit) = raw.try_normalize() {
            return unit;
        }
    }
}

/// Spawn one prey. Free function so the reproduction path inside the prey
/// phase can spawn offspring without going through `SimulationWorld`.
pub fn spawn_prey_at(
    world: &mut World,
    config: &SimulationConfig,
    rng: &mut SmallRng,
    next_spawn_id: &mut u64,
    position: Vec2,
) -> Entity {
    let id = SpawnId(*next_spawn_id);
    *next_spawn_id += 1;
    world.spawn((
        id,
        Prey,
        Position(position),
        Velocity(random_unit_velocity(rng)),
        Speed(config.prey.base_speed),
        Trail::default(),
        Energy(config.prey.initial_energy),
        ReproductionCooldown::default(),
        Vision(config.prey.vision),
        FoodVision(config.prey.food_vision),
    ))
}

/// Spawn one predator.
pub fn spawn_predator_at(
    world: &mut World,
    config: &SimulationConfig,
    rng: &mut SmallRng,
    next_spawn_id: &mut u64,
    position: Vec2,
) -> Entity {
    let id = SpawnId(*next_spawn_id);
    *next_spawn_id += 1;
    world.spawn((
        id,
        Predator,
        Position(position),
        Velocity(random_unit_velocity(rng)),
        Speed(config.predator.base_speed),
        Trail::default(),
        Energy(config.predator.initial_energy),
        ReproductionCooldown::default(),
        Vision(config.predator.vision),
    ))
}

pub struct SimulationWorld {
    pub world: World,
    pub config: SimulationConfig,
    pub counters: Counters,
    rng: SmallRng,
    next_spawn_id: u64,
    food_spawn_timer: u32,
    tick_index: u64,
}

impl SimulationWorld {
    /// An empty world with entropy-seeded randomness. Call `reset()` to
    /// populate it from the configured initial counts.
    pub fn new(config: SimulationConfig) -> Self {
        Self::with_rng(config, SmallRng::from_entropy())
    }

    /// An empty world with deterministic randomness, for tests and
    /// reproducible runs.
    pub fn with_seed(config: SimulationConfig, seed: u64) -> Self {
        Self::with_rng(config, SmallRng::seed_from_u64(seed))
    }

    fn with_rng(config: SimulationConfig, rng: SmallRng) -> Self {
        Self {
            world: World::new(),
            config,
            counters: Counters::default(),
            rng,
            next_spawn_id: 1,
            food_spawn_timer: 0,
            tick_index: 0,
        }
    }

    /// Clear everything and repopulate all four collections from the
    /// configured initial counts. Counters and the tick index restart at
    /// zero.
    pub fn reset(&mut self) {
        self.world.clear();
        self.counters = Counters::default();
        self.food_spawn_timer = 0;
        self.tick_index = 0;

        for _ in 0..self.config.initial_prey {
            let position = self.random_position(AGENT_SPAWN_MARGIN);
            self.spawn_prey_at_position(position);
        }
        for _ in 0..self.config.initial_predators {
            let position = self.random_position(AGENT_SPAWN_MARGIN);
            self.spawn_predator_at_position(position);
        }
        for _ in 0..self.config.initial_food {
            let position = self.random_position(FOOD_SPAWN_MARGIN);
            self.spawn_food_at(position);
        }
        for _ in 0..self.config.initial_obstacles {
            let position = self.random_position(OBSTACLE_SPAWN_MARGIN);
            let radius = self.rng.gen_range(OBSTACLE_RADIUS_RANGE);
            self.spawn_obstacle_at(position, radius);
        }

        info!(
            prey = self.prey_count(),
            predators = self.predator_count(),
            food = self.food_count(),
            obstacles = self.obstacle_count(),
            "simulation reset"
        );
    }

    /// Advance the ecosystem by one frame and report its statistics.
    pub fn tick(&mut self) -> TickStats {
        self.counters.begin_tick();
        self.tick_index += 1;

        systems::prey_phase(
            &mut self.world,
            &self.config,
            &mut self.rng,
            &mut self.next_spawn_id,
            &mut self.counters,
        );
        systems::predator_phase(
            &mut self.world,
            &self.config,
            &mut self.rng,
            &mut self.next_spawn_id,
            &mut self.counters,
        );
        self.replenish_food();

        self.snapshot()
    }

    /// Timed food replenishment: once the timer reaches the configured
    /// interval and the arena is below the food cap, one item appears at a
    /// random in-bounds position and the timer restarts. At the cap the
    /// timer stays expired, so the next free slot fills immediately.
    fn replenish_food(&mut self) {
        self.food_spawn_timer += 1;
        if self.food_spawn_timer >= self.config.food.spawn_interval
            && self.food_count() < self.config.food.max_food
        {
            let position = self.random_position(FOOD_SPAWN_MARGIN);
            self.spawn_food_at(position);
            self.food_spawn_timer = 0;
        }
    }

    /// The per-tick snapshot handed to the statistics collector.
    pub fn snapshot(&self) -> TickStats {
        let (prey_count, prey_energy_sum) = self.energy_totals::<Prey>();
        let (predator_count, predator_energy_sum) = self.energy_totals::<Predator>();
        TickStats {
            tick: self.tick_index,
            prey_count,
            predator_count,
            food_count: self.food_count(),
            prey_births: self.counters.prey_births_this_tick,
            predator_births: self.counters.predator_births_this_tick,
            prey_avg_energy: average(prey_energy_sum, prey_count),
            predator_avg_energy: average(predator_energy_sum, predator_count),
        }
    }

    fn energy_totals<S: hecs::Component>(&self) -> (usize, f32) {
        let mut count = 0;
        let mut sum = 0.0;
        for (_, energy) in self.world.query::<&Energy>().with::<&S>().iter() {
            count += 1;
            sum += energy.0;
        }
        (count, sum)
    }

    pub fn prey_count(&self) -> usize {
        self.world.query::<&Prey>().iter().count()
    }

    pub fn predator_count(&self) -> usize {
        self.world.query::<&Predator>().iter().count()
    }

    pub fn food_count(&self) -> usize {
        self.world.query::<&Food>().iter().count()
    }

    pub fn obstacle_count(&self) -> usize {
        self.world.query::<&Obstacle>().iter().count()
    }

    // ------------------------------------------------------------------
    // Spawn surface (input-controller commands and tests)
    // ------------------------------------------------------------------

    pub fn spawn_prey_at_position(&mut self, position: Vec2) -> Entity {
        spawn_prey_at(
            &mut self.world,
            &self.config,
            &mut self.rng,
            &mut self.next_spawn_id,
            position,
        )
    }

    pub fn spawn_predator_at_position(&mut self, position: Vec2) -> Entity {
        spawn_predator_at(
            &mut self.world,
            &self.config,
            &mut self.rng,
            &mut self.next_spawn_id,
            position,
        )
    }

    pub fn spawn_food_at(&mut self, position: Vec2) -> Entity {
        let id = SpawnId(self.next_spawn_id);
        self.next_spawn_id += 1;
        self.world.spawn((
            id,
            Food {
                radius: self.config.food.radius,
            },
            Position(position),
        ))
    }

    pub fn spawn_obstacle_at(&mut self, position: Vec2, radius: f32) -> Entity {
        let id = SpawnId(self.next_spawn_id);
        self.next_spawn_id += 1;
        self.world
            .spawn((id, Obstacle { radius }, Position(position)))
    }

    pub fn clear_obstacles(&mut self) {
        let obstacles: Vec<Entity> = self
            .world
            .query::<&Obstacle>()
            .iter()
            .map(|(entity, _)| entity)
            .collect();
        for entity in obstacles {
            let _ = self.world.despawn(entity);
        }
    }

    /// Apply one input-controller command. `Pause`/`Resume` are a runner
    /// concern and do nothing here.
    pub fn apply_command(&mut self, command: Command) {
        match command {
            Command::Pause | Command::Resume => {}
            Command::Reset => self.reset(),
            Command::SpawnPrey => {
                let position = self.random_position(AGENT_SPAWN_MARGIN);
                self.spawn_prey_at_position(position);
            }
            Command::SpawnPredator => {
                let position = self.random_position(AGENT_SPAWN_MARGIN);
                self.spawn_predator_at_position(position);
            }
            Command::SpawnFood(count) => {
                for _ in 0..count {
                    let position = self.random_position(FOOD_SPAWN_MARGIN);
                    self.spawn_food_at(position);
                }
            }
            Command::SpawnObstacle { position, radius } => {
                self.spawn_obstacle_at(position, radius);
            }
            Command::ClearObstacles => self.clear_obstacles(),
        }
    }

    fn random_position(&mut self, margin: f32) -> Vec2 {
        let mx = margin.min(self.config.width / 2.0);
        let my = margin.min(self.config.height / 2.0);
        Vec2::new(
            self.rng.gen_range(mx..=self.config.width - mx),
            self.rng.gen_range(my..=self.config.height - my),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::Command;

    fn quiet_config() -> SimulationConfig {
        let mut config = SimulationConfig::default();
        config.initial_prey = 0;
        config.initial_predators = 0;
        config.initial_food = 0;
        config.initial_obstacles = 0;
        config
    }

    #[test]
    fn test_reset_seeds_configured_counts() {
        let config = SimulationConfig {
            initial_prey: 12,
            initial_predators: 4,
            initial_food: 9,
            initial_obstacles: 2,
            ..Default::default()
        };
        let mut sim = SimulationWorld::with_seed(config, 42);
        sim.reset();

        assert_eq!(sim.prey_count(), 12);
        assert_eq!(sim.predator_count(), 4);
        assert_eq!(sim.food_count(), 9);
        assert_eq!(sim.obstacle_count(), 2);
        assert_eq!(sim.counters.total_prey_births, 0);
    }

    #[test]
    fn test_lone_prey_starves_at_exact_tick() {
        let mut config = quiet_config();
        config.prey.initial_energy = 1.0;
        config.prey.max_energy = 1.0;
        config.prey.metabolic_loss = 0.25;
        let mut sim = SimulationWorld::with_seed(config, 3);
        let prey = sim.spawn_prey_at_position(Vec2::new(600.0, 400.0));

        // 1.0 / 0.25 = 4 ticks to zero; death triggers on the tick energy
        // first reaches <= 0.
        for expected in [0.75f32, 0.5, 0.25] {
            sim.tick();
            let energy = sim.world.get::<&Energy>(prey).unwrap().0;
            assert!((energy - expected).abs() < 1e-6);
        }
        sim.tick();
        assert!(!sim.world.contains(prey));
        assert_eq!(sim.prey_count(), 0);
        assert_eq!(sim.counters.total_prey_deaths, 1);
    }

    #[test]
    fn test_food_cap_holds_over_many_ticks() {
        let mut config = quiet_config();
        config.food.spawn_interval = 1;
        config.food.max_food = 5;
        let mut sim = SimulationWorld::with_seed(config, 5);

        for _ in 0..50 {
            sim.tick();
            assert!(sim.food_count() <= 5);
        }
        assert_eq!(sim.food_count(), 5);
    }

    #[test]
    fn test_food_spawn_interval_timing() {
        let mut config = quiet_config();
        config.food.spawn_interval = 10;
        let mut sim = SimulationWorld::with_seed(config, 5);

        for _ in 0..9 {
            sim.tick();
        }
        assert_eq!(sim.food_count(), 0);
        sim.tick();
        assert_eq!(sim.food_count(), 1);
        // Timer restarted: the next item takes another full interval.
        for _ in 0..9 {
            sim.tick();
        }
        assert_eq!(sim.food_count(), 1);
        sim.tick();
        assert_eq!(sim.food_count(), 2);
    }

    #[test]
    fn test_snapshot_counts_and_average_energy() {
        let mut config = quiet_config();
        config.prey.metabolic_loss = 0.0;
        let mut sim = SimulationWorld::with_seed(config, 9);

        let a = sim.spawn_prey_at_position(Vec2::new(100.0, 100.0));
        let b = sim.spawn_prey_at_position(Vec2::new(700.0, 600.0));
        if let Ok(mut energy) = sim.world.get::<&mut Energy>(a) {
            energy.0 = 60.0;
        }
        if let Ok(mut energy) = sim.world.get::<&mut Energy>(b) {
            energy.0 = 100.0;
        }

        let stats = sim.snapshot();
        assert_eq!(stats.prey_count, 2);
        assert_eq!(stats.predator_count, 0);
        assert!((stats.prey_avg_energy - 80.0).abs() < 1e-6);
        // Zero-count guard: no predators means average 0, not NaN.
        assert_eq!(stats.predator_avg_energy, 0.0);
    }

    #[test]
    fn test_commands_mutate_populations() {
        let mut sim = SimulationWorld::with_seed(quiet_config(), 11);

        sim.apply_command(Command::SpawnPrey);
        sim.apply_command(Command::SpawnPredator);
        sim.apply_command(Command::SpawnFood(5));
        sim.apply_command(Command::SpawnObstacle {
            position: Vec2::new(300.0, 300.0),
            radius: 40.0,
        });
        assert_eq!(sim.prey_count(), 1);
        assert_eq!(sim.predator_count(), 1);
        assert_eq!(sim.food_count(), 5);
        assert_eq!(sim.obstacle_count(), 1);

        sim.apply_command(Command::ClearObstacles);
        assert_eq!(sim.obstacle_count(), 0);

        sim.apply_command(Command::Reset);
        assert_eq!(sim.prey_count(), 0); // quiet config has zero initials
        assert_eq!(sim.food_count(), 0);
    }

    #[test]
    fn test_tick_index_advances_in_snapshot() {
        let mut sim = SimulationWorld::with_seed(quiet_config(), 13);
        assert_eq!(sim.tick().tick, 1);
        assert_eq!(sim.tick().tick, 2);
        sim.reset();
        assert_eq!(sim.tick().tick, 1);
    }

    #[test]
    fn test_seeded_runs_are_reproducible() {
        let config = SimulationConfig {
            initial_prey: 20,
            initial_predators: 3,
            initial_food: 15,
            initial_obstacles: 2,
            ..Default::default()
        };
        let mut a = SimulationWorld::with_seed(config.clone(), 99);
        let mut b = SimulationWorld::with_seed(config, 99);
        a.reset();
        b.reset();

        for _ in 0..100 {
            let sa = a.tick();
            let sb = b.tick();
            assert_eq!(sa.prey_count, sb.prey_count);
            assert_eq!(sa.predator_count, sb.predator_count);
            assert_eq!(sa.food_count, sb.food_count);
            assert_eq!(sa.prey_avg_energy, sb.prey_avg_energy);
        }
    }
}
