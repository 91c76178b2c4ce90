//! Per-tick statistics snapshots and running birth/death totals.
//!
//! The core has no opinion about what a collector does with a snapshot;
//! plotting and export live outside the engine.

use serde::{Deserialize, Serialize};

/// Snapshot reported to the statistics collector once per tick.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct TickStats {
    pub tick: u64,
    pub prey_count: usize,
    pub predator_count: usize,
    pub food_count: usize,
    /// Births that happened during this tick.
    pub prey_births: u32,
    pub predator_births: u32,
    /// Mean energy over the living population, 0 when empty.
    pub prey_avg_energy: f32,
    pub predator_avg_energy: f32,
}

/// Birth/death accounting across the lifetime of a run.
///
/// Each counter moves by exactly one per event: a birth on each successful
/// reproduction, a death on each starvation or predation removal.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct Counters {
    pub prey_births_this_tick: u32,
    pub predator_births_this_tick: u32,
    pub total_prey_births: u64,
    pub total_predator_births: u64,
    pub total_prey_deaths: u64,
    pub total_predator_deaths: u64,
}

impl Counters {
    /// Called at the top of every tick.
    pub fn begin_tick(&mut self) {
        self.prey_births_this_tick = 0;
        self.predator_births_this_tick = 0;
    }

    pub fn record_prey_birth(&mut self) {
        self.prey_births_this_tick += 1;
        self.total_prey_births += 1;
    }

    pub fn record_predator_birth(&mut self) {
        self.predator_births_this_tick += 1;
        self.total_predator_births += 1;
    }

    pub fn record_prey_death(&mut self) {
        self.total_prey_deaths += 1;
    }

    pub fn record_predator_death(&mut self) {
        self.total_predator_deaths += 1;
    }
}

/// Mean of `values`, guarding the empty case.
pub fn average(sum: f32, count: usize) -> f32 {
    if count > 0 {
        sum / count as f32
    } else {
        0.0
    }
}
