//! Step observer trait for monitoring physics simulation progress.

/// Trait for observing physics simulation steps.
///
/// Implement this trait to monitor solver progress (e.g., for debugging,
/// visualization, or performance profiling). All methods have default
/// no-op implementations.
pub trait StepObserver {
    /// Called after all particles have been integrated (Verlet step).
    fn on_integrate(&mut self) {}

    /// Called after each constraint iteration.
    fn on_constraint_iteration(&mut self, _iteration: usize) {}

    /// Called when a joint exceeds its break force and detaches.
    fn on_joint_broken(&mut self, _joint: usize) {}

    /// Called when a simulation step is fully complete.
    fn on_step_complete(&mut self) {}
}

/// A no-op observer that does nothing. Use as default when no observation needed.
pub struct NoOpStepObserver;

impl StepObserver for NoOpStepObserver {}

/// Emits a `log` record at `trace` for every integration, constraint
/// iteration and completed step. Broken joints are logged by the solver
/// itself at `debug`. Install any `log` backend to see the records.
#[derive(Debug, Default)]
pub struct LogStepObserver {
    steps: u64,
}

impl LogStepObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of completed steps seen so far.
    pub fn steps(&self) -> u64 {
        self.steps
    }
}

impl StepObserver for LogStepObserver {
    fn on_integrate(&mut self) {
        log::trace!("step {}: integrated", self.steps);
    }

    fn on_constraint_iteration(&mut self, iteration: usize) {
        log::trace!("step {}: constraint iteration {}", self.steps, iteration);
    }

    fn on_step_complete(&mut self) {
        log::trace!("step {} complete", self.steps);
        self.steps += 1;
    }
}
