//! Configuration types: solver parameters and soft body settings.

use crate::error::{Result, SoftbodyError};
use crate::float::Float;
use crate::topology::MIN_RING_PARTICLES;
use crate::vec::{Vec, Vec2};

/// Configuration for the constraint solver and simulation.
///
/// # Builder Pattern
/// ```
/// use softbody2d::config::SolverConfig;
/// use softbody2d::vec::Vec2;
///
/// let config: SolverConfig<f32> = SolverConfig::new()
///     .with_iterations(8)
///     .with_gravity(Vec2::new(0.0, -9.81))
///     .with_damping(0.99)
///     .with_sub_steps(2);
/// ```
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SolverConfig<F: Float> {
    /// Number of constraint solver iterations per sub-step.
    /// More iterations = more accurate but slower. Default: 4.
    pub iterations: usize,
    /// Gravity acceleration vector. Default: zero (no gravity).
    pub gravity: Vec2<F>,
    /// Velocity kept per frame [0, 1]. 1.0 = no damping. Default: 0.99.
    ///
    /// The solver spreads it over the sub-steps as `damping^(1/sub_steps)`,
    /// so changing `sub_steps` does not change how fast motion dies out.
    pub damping: F,
    /// Number of sub-steps per frame. Higher = more stable. Default: 1.
    pub sub_steps: usize,
}

impl<F: Float> SolverConfig<F> {
    /// Create a new config with default values.
    pub fn new() -> Self {
        SolverConfig {
            iterations: 4,
            gravity: Vec2::zero(),
            damping: F::from_f32(0.99),
            sub_steps: 1,
        }
    }

    /// Set the number of constraint iterations.
    pub fn with_iterations(mut self, iterations: usize) -> Self {
        self.iterations = iterations;
        self
    }

    /// Set the gravity vector.
    pub fn with_gravity(mut self, gravity: Vec2<F>) -> Self {
        self.gravity = gravity;
        self
    }

    /// Set the damping factor.
    pub fn with_damping(mut self, damping: F) -> Self {
        self.damping = damping;
        self
    }

    /// Set the number of sub-steps.
    pub fn with_sub_steps(mut self, sub_steps: usize) -> Self {
        self.sub_steps = sub_steps.max(1);
        self
    }
}

impl<F: Float> Default for SolverConfig<F> {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything needed to build a soft body, plus the two stiffness values
/// that may change every frame.
///
/// The create-time fields only take effect on the next
/// [`Softbody2D::create`](crate::softbody::Softbody2D::create).
#[derive(Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct SoftbodySettings<F: Float> {
    /// Number of ring particles.
    pub particle_count: usize,
    /// Ring radius.
    pub radius: F,
    /// Rest length of ring joints comes from the built positions.
    pub around_configure_distance: bool,
    /// Rest length of center joints comes from the built positions.
    pub center_configure_distance: bool,
    /// Ring joint rest length when not auto-configured.
    pub around_distance: F,
    /// Center joint rest length when not auto-configured.
    pub center_distance: F,
    pub particle_mass: F,
    /// Collision radius of each particle.
    pub particle_radius: F,
    pub damping_ratio: F,
    pub break_force: Option<F>,

    /// Stiffness (Hz) of ring-to-ring joints.
    pub around_frequency: F,
    /// Stiffness (Hz) of ring-to-center joints.
    pub center_frequency: F,
}

impl<F: Float> Default for SoftbodySettings<F> {
    fn default() -> Self {
        SoftbodySettings {
            particle_count: 32,
            radius: F::from_f32(4.0),
            around_configure_distance: true,
            center_configure_distance: true,
            around_distance: F::one(),
            center_distance: F::one(),
            particle_mass: F::one(),
            particle_radius: F::from_f32(0.25),
            damping_ratio: F::zero(),
            break_force: None,
            around_frequency: F::two(),
            center_frequency: F::two(),
        }
    }
}

fn non_negative<F: Float>(v: F) -> bool {
    v.is_finite() && v >= F::zero()
}

impl<F: Float> SoftbodySettings<F> {
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    pub fn with_radius(mut self, radius: F) -> Self {
        self.radius = radius;
        self
    }

    pub fn with_frequencies(mut self, around: F, center: F) -> Self {
        self.around_frequency = around;
        self.center_frequency = center;
        self
    }

    pub fn with_damping_ratio(mut self, damping_ratio: F) -> Self {
        self.damping_ratio = damping_ratio;
        self
    }

    pub fn with_break_force(mut self, break_force: F) -> Self {
        self.break_force = Some(break_force);
        self
    }

    /// Use fixed rest lengths instead of the built positions.
    pub fn with_fixed_distances(mut self, around: F, center: F) -> Self {
        self.around_configure_distance = false;
        self.center_configure_distance = false;
        self.around_distance = around;
        self.center_distance = center;
        self
    }

    pub fn with_particle_radius(mut self, radius: F) -> Self {
        self.particle_radius = radius;
        self
    }

    /// Check the runtime stiffness values only.
    pub fn validate_frequencies(&self) -> Result<()> {
        if !non_negative(self.around_frequency) || !non_negative(self.center_frequency) {
            return Err(SoftbodyError::InvalidFrequency);
        }
        Ok(())
    }

    /// Check every field needed by `create`.
    pub fn validate(&self) -> Result<()> {
        if self.particle_count < MIN_RING_PARTICLES {
            return Err(SoftbodyError::InsufficientParticles { count: self.particle_count });
        }
        if !self.radius.is_finite() || self.radius <= F::zero() {
            return Err(SoftbodyError::InvalidRadius);
        }
        if !self.particle_mass.is_finite() || self.particle_mass <= F::zero() {
            return Err(SoftbodyError::InvalidMass);
        }
        if !non_negative(self.particle_radius) {
            return Err(SoftbodyError::InvalidRadius);
        }
        if !non_negative(self.damping_ratio) {
            return Err(SoftbodyError::InvalidDampingRatio);
        }
        if !self.around_configure_distance && !non_negative(self.around_distance) {
            return Err(SoftbodyError::InvalidDistance);
        }
        if !self.center_configure_distance && !non_negative(self.center_distance) {
            return Err(SoftbodyError::InvalidDistance);
        }
        self.validate_frequencies()
    }
}
