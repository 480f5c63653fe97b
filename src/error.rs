//! Error types for soft body construction.

use thiserror::Error;

/// Errors raised while validating settings or building a soft body.
///
/// Only construction is fallible. Per-frame paths (`update`, `step`,
/// `debug_lines`) never return errors.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SoftbodyError {
    /// The ring needs at least three particles to form a cycle.
    #[error("soft body needs at least 3 ring particles, got {count}")]
    InsufficientParticles { count: usize },
    /// Radius must be positive and finite.
    #[error("radius must be positive and finite")]
    InvalidRadius,
    /// Mass must be positive and finite.
    #[error("mass must be positive and finite")]
    InvalidMass,
    /// Frequency must be zero (rigid) or positive, and finite.
    #[error("frequency must be finite and non-negative")]
    InvalidFrequency,
    /// Damping ratio must be finite and non-negative.
    #[error("damping ratio must be finite and non-negative")]
    InvalidDampingRatio,
    /// Fixed joint distance must be finite and non-negative.
    #[error("joint distance must be finite and non-negative")]
    InvalidDistance,
    /// Particle index is out of bounds.
    #[error("particle index {index} out of bounds (count: {count})")]
    ParticleOutOfBounds { index: usize, count: usize },
}

/// Convenience alias for `Result<T, SoftbodyError>`.
pub type Result<T> = core::result::Result<T, SoftbodyError>;
