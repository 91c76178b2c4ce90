//! Per-tick systems, run by the world orchestrator.

pub mod lifecycle;
pub mod predator;
pub mod prey;
pub mod steering;
pub mod views;

pub use predator::predator_phase;
pub use prey::prey_phase;
