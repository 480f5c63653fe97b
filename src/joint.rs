//! Spring joints between two particles.
//!
//! A joint with a positive `frequency` behaves as a damped spring whose
//! stiffness is expressed as an oscillation frequency in Hz together with
//! a damping ratio, independent of the attached masses. It is solved
//! implicitly, so any frequency is stable at any step size. A frequency of
//! zero makes the joint rigid; it is then enforced as a distance
//! constraint during the solver's iteration passes.

use crate::float::Float;
use crate::vec::{Vec, Vec2};
use crate::particle::Particle;
use crate::constraint::DistanceConstraint;

/// Which family of connections a joint belongs to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum JointGroup {
    /// Ring particle to its circular neighbour.
    Around,
    /// Ring particle to the center particle.
    Center,
}

/// An unconfigured edge between two particles.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Connection {
    pub a: usize,
    pub b: usize,
    pub group: JointGroup,
}

impl Connection {
    pub fn new(a: usize, b: usize, group: JointGroup) -> Self {
        Connection { a, b, group }
    }

    /// True when this edge joins `x` and `y`, in either order.
    pub fn joins(&self, x: usize, y: usize) -> bool {
        (self.a == x && self.b == y) || (self.a == y && self.b == x)
    }
}

struct SoftState<F: Float> {
    normal: Vec2<F>,
    w_total: F,
    stiffness: F,
    damping: F,
    load: F,
}

/// A damped spring between particles `a` and `b`.
#[derive(Clone, Debug)]
pub struct SpringJoint<F: Float> {
    pub a: usize,
    pub b: usize,
    pub group: JointGroup,
    /// Rest length.
    pub distance: F,
    /// Oscillation frequency in Hz. Zero means rigid.
    pub frequency: F,
    /// 0 = undamped, 1 = critically damped.
    pub damping_ratio: F,
    /// Take `distance` from the particles' positions when configured.
    pub auto_configure_distance: bool,
    /// Allow the two attached particles to collide with each other.
    pub enable_collision: bool,
    /// Force magnitude above which the joint breaks. `None` never breaks.
    pub break_force: Option<F>,
    broken: bool,
}

impl<F: Float> SpringJoint<F> {
    pub fn new(connection: Connection, distance: F, frequency: F) -> Self {
        SpringJoint {
            a: connection.a,
            b: connection.b,
            group: connection.group,
            distance,
            frequency,
            damping_ratio: F::zero(),
            auto_configure_distance: false,
            enable_collision: false,
            break_force: None,
            broken: false,
        }
    }

    pub fn with_damping_ratio(mut self, damping_ratio: F) -> Self {
        self.damping_ratio = damping_ratio;
        self
    }

    pub fn with_auto_configure_distance(mut self, auto: bool) -> Self {
        self.auto_configure_distance = auto;
        self
    }

    pub fn with_enable_collision(mut self, enable: bool) -> Self {
        self.enable_collision = enable;
        self
    }

    pub fn with_break_force(mut self, break_force: Option<F>) -> Self {
        self.break_force = break_force;
        self
    }

    pub fn connection(&self) -> Connection {
        Connection::new(self.a, self.b, self.group)
    }

    /// Angular frequency ω = 2πf.
    pub fn angular_freq(&self) -> F {
        F::tau() * self.frequency
    }

    pub fn is_rigid(&self) -> bool {
        self.frequency.is_near_zero(F::from_f32(1e-6))
    }

    pub fn is_broken(&self) -> bool {
        self.broken
    }

    /// Detach the joint. It stops acting on its particles for good.
    pub fn break_joint(&mut self) {
        self.broken = true;
    }

    /// Set the rest length from current positions if auto-configuration is on.
    pub fn configure_distance(&mut self, particles: &[Particle<Vec2<F>>]) {
        if self.auto_configure_distance {
            self.distance = particles[self.a].pos.distance(particles[self.b].pos);
        }
    }

    /// Current separation minus rest length.
    pub fn stretch(&self, particles: &[Particle<Vec2<F>>]) -> F {
        particles[self.a].pos.distance(particles[self.b].pos) - self.distance
    }

    /// Axis, inverse-mass sum and implicit-step terms for a step of `dt`.
    fn soft_state(&self, particles: &[Particle<Vec2<F>>], dt: F) -> Option<SoftState<F>> {
        if self.broken || self.is_rigid() || dt.is_near_zero(F::from_f32(1e-30)) {
            return None;
        }
        let pa = &particles[self.a];
        let pb = &particles[self.b];

        let w_total = pa.inv_mass + pb.inv_mass;
        if w_total.is_near_zero(F::from_f32(1e-10)) {
            return None;
        }

        let delta = pb.pos - pa.pos;
        let dist = delta.length();
        if dist.is_near_zero(F::from_f32(1e-10)) {
            return None;
        }
        let normal = delta.scale(F::one() / dist);

        let hw = (dt * self.angular_freq()).abs();
        let stiffness = hw * hw;
        let damping = F::two() * self.damping_ratio * hw;
        if (stiffness + damping).is_near_zero(F::from_f32(1e-30)) {
            return None;
        }
        // Relative velocity along the axis, times dt.
        let closing = ((pb.pos - pb.prev_pos) - (pa.pos - pa.prev_pos)).dot(normal);
        Some(SoftState {
            normal,
            w_total,
            stiffness,
            damping,
            load: stiffness * (dist - self.distance) + damping * closing,
        })
    }

    /// Magnitude of the spring force an implicit step of `dt` would apply.
    ///
    /// With `k = m_eff·ω²` and `c = 2·m_eff·ζ·ω` this is
    /// `(k·C + c·v) / (1 + c·dt/m_eff + k·dt²/m_eff)`, the force left after
    /// the step. Rigid and broken joints report zero.
    pub fn spring_force(&self, particles: &[Particle<Vec2<F>>], dt: F) -> F {
        match self.soft_state(particles, dt) {
            Some(st) => {
                let shift = st.load / (F::one() + st.stiffness + st.damping);
                (shift / (st.w_total * dt * dt)).abs()
            }
            None => F::zero(),
        }
    }

    /// One half of an implicit spring-damper step over `dt`.
    ///
    /// Moves both ends along the joint axis, weighted by inverse mass. Two
    /// calls remove the fraction `(h²ω² + 2ζhω) / (1 + h²ω² + 2ζhω)` of the
    /// spring's error, which is exactly one implicit Euler step and stays
    /// below one at any frequency. The solver runs one call per joint
    /// forward and one backward, so the combined sweep is symmetric.
    /// Rigid and broken joints do nothing.
    pub fn solve_soft(&self, particles: &mut [Particle<Vec2<F>>], dt: F) {
        let st = match self.soft_state(particles, dt) {
            Some(st) => st,
            None => return,
        };
        let total = st.stiffness + st.damping;
        let fraction = F::one() - F::one() / (F::one() + total).sqrt();
        // Positive shift pulls the particles together.
        let shift = fraction * st.load / total;

        let correction = st.normal.scale(shift / st.w_total);
        let (a_inv, b_inv) = (particles[self.a].inv_mass, particles[self.b].inv_mass);
        if !particles[self.a].pinned {
            particles[self.a].pos = particles[self.a].pos + correction.scale(a_inv);
        }
        if !particles[self.b].pinned {
            particles[self.b].pos = particles[self.b].pos - correction.scale(b_inv);
        }
    }

    /// Project the particles back to `distance` when the joint is rigid.
    pub fn solve_rigid(&self, particles: &mut [Particle<Vec2<F>>]) {
        if self.broken || !self.is_rigid() {
            return;
        }
        DistanceConstraint::new(self.a, self.b, self.distance, F::one()).solve(particles);
    }

    /// True when the spring `force` exceeds this joint's `break_force`.
    pub fn exceeds_break_force(&self, force: F) -> bool {
        match self.break_force {
            Some(limit) => force > limit,
            None => false,
        }
    }
}
