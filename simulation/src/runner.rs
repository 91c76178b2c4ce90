//! Background thread that ticks the simulation at regular intervals.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{info, warn};

use crate::command::Command;
use crate::stats::TickStats;
use crate::world::SimulationWorld;

/// Drives a shared `SimulationWorld` on a fixed interval. One tick per
/// interval, no overlap; pausing skips ticks without losing state.
pub struct SimulationRunner {
    world: Arc<Mutex<SimulationWorld>>,
    is_running: Arc<AtomicBool>,
    is_paused: Arc<AtomicBool>,
    thread_handle: Option<JoinHandle<()>>,
}

impl SimulationRunner {
    pub fn new(world: Arc<Mutex<SimulationWorld>>) -> Self {
        Self {
            world,
            is_running: Arc::new(AtomicBool::new(false)),
            is_paused: Arc::new(AtomicBool::new(false)),
            thread_handle: None,
        }
    }

    /// Start ticking at the specified interval.
    ///
    /// # Arguments
    /// * `interval_ms` - Milliseconds between ticks
    /// * `callback` - Receives each tick's statistics snapshot (e.g. for a
    ///   renderer or stats collector)
    pub fn start<F>(&mut self, interval_ms: u64, callback: F)
    where
        F: Fn(TickStats) + Send + 'static,
    {
        if self.is_running.load(Ordering::Relaxed) {
            warn!("simulation runner already running");
            return;
        }

        info!(interval_ms, "starting simulation runner");
        self.is_running.store(true, Ordering::Relaxed);
        let running = Arc::clone(&self.is_running);
        let paused = Arc::clone(&self.is_paused);
        let world = Arc::clone(&self.world);

        let handle = thread::spawn(move || {
            while running.load(Ordering::Relaxed) {
                if !paused.load(Ordering::Relaxed) {
                    let stats = {
                        let mut w = world.lock().unwrap();
                        w.tick()
                    };
                    callback(stats);
                }
                thread::sleep(Duration::from_millis(interval_ms));
            }
            info!("simulation runner thread stopped");
        });

        self.thread_handle = Some(handle);
    }

    /// Apply an input-controller command. Pause/resume are handled here;
    /// everything else goes to the world under its lock.
    pub fn apply(&self, command: Command) {
        match command {
            Command::Pause => self.pause(),
            Command::Resume => self.resume(),
            other => self.world.lock().unwrap().apply_command(other),
        }
    }

    pub fn pause(&self) {
        self.is_paused.store(true, Ordering::Relaxed);
        info!("simulation paused");
    }

    pub fn resume(&self) {
        self.is_paused.store(false, Ordering::Relaxed);
        info!("simulation resumed");
    }

    pub fn is_paused(&self) -> bool {
        self.is_paused.load(Ordering::Relaxed)
    }

    pub fn is_running(&self) -> bool {
        self.is_running.load(Ordering::Relaxed)
    }

    /// Stop the tick thread and wait for it to finish.
    pub fn stop(&mut self) {
        if !self.is_running.load(Ordering::Relaxed) {
            return;
        }

        info!("stopping simulation runner");
        self.is_running.store(false, Ordering::Relaxed);

        if let Some(handle) = self.thread_handle.take() {
            let _ = handle.join();
        }
    }
}

impl Drop for SimulationRunner {
    fn drop(&mut self) {
        self.stop();
    }
}
