//! The ring-and-center soft body component.

use crate::config::{SoftbodySettings, SolverConfig};
use crate::constraint::BoundsConstraint;
use crate::debug::DebugLine;
use crate::error::Result;
use crate::float::Float;
use crate::joint::{JointGroup, SpringJoint};
use crate::observer::StepObserver;
use crate::particle::{Particle, ParticleRole};
use crate::solver::SpringSolver;
use crate::topology::{self, Topology};
use crate::vec::{Vec, Vec2};
use alloc::vec::Vec as AllocVec;

/// A 2D soft body: a ring of particles around one center particle, held
/// together by spring joints.
///
/// Nothing exists until [`create`](Self::create) is called. `create` may be
/// called again at any time to rebuild from the current settings.
///
/// ```
/// use softbody2d::{Softbody2D, SoftbodySettings, SolverConfig, Vec2, NoOpStepObserver};
///
/// let mut body = Softbody2D::new(Vec2::new(0.0f32, 10.0), SoftbodySettings::default());
/// body.create().unwrap();
///
/// let config = SolverConfig::new().with_gravity(Vec2::new(0.0, -9.81));
/// body.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
/// assert_eq!(body.around_particles().len(), 32);
/// ```
#[derive(Clone, Debug)]
pub struct Softbody2D<F: Float> {
    origin: Vec2<F>,
    settings: SoftbodySettings<F>,
    solver: SpringSolver<F>,
    around_particles: AllocVec<usize>,
    center_particle: Option<usize>,
    around_joints: AllocVec<usize>,
    center_joints: AllocVec<usize>,
}

impl<F: Float> Softbody2D<F> {
    pub fn new(origin: Vec2<F>, settings: SoftbodySettings<F>) -> Self {
        Softbody2D {
            origin,
            settings,
            solver: SpringSolver::new(),
            around_particles: AllocVec::new(),
            center_particle: None,
            around_joints: AllocVec::new(),
            center_joints: AllocVec::new(),
        }
    }

    /// Build the particles and joints from the current settings, discarding
    /// whatever was built before.
    ///
    /// On error the previous body is left untouched.
    pub fn create(&mut self) -> Result<()> {
        if let Err(e) = self.settings.validate() {
            log::warn!("softbody not created: {}", e);
            return Err(e);
        }
        let topo = topology::build(self.settings.particle_count, self.settings.radius)?;

        self.destroy();
        self.create_particles(&topo);
        self.create_joints(&topo)?;

        log::debug!(
            "softbody created: {} particles, {} around joints, {} center joints",
            self.solver.particle_count(),
            self.around_joints.len(),
            self.center_joints.len(),
        );
        Ok(())
    }

    fn destroy(&mut self) {
        if self.is_created() {
            log::debug!(
                "destroying previous softbody ({} particles)",
                self.solver.particle_count()
            );
        }
        self.solver.clear();
        self.around_particles.clear();
        self.center_particle = None;
        self.around_joints.clear();
        self.center_joints.clear();
    }

    fn create_particles(&mut self, topo: &Topology<F>) {
        let s = &self.settings;
        for (i, local) in topo.positions().iter().enumerate() {
            let is_center = i == Topology::<F>::center_index();
            let role = if is_center { ParticleRole::Center } else { ParticleRole::Ring(i - 1) };
            let particle = Particle::new(self.origin + *local, s.particle_mass)
                .with_role(role)
                .with_radius(s.particle_radius);
            let idx = self.solver.add_particle(particle);
            if is_center {
                self.center_particle = Some(idx);
            } else {
                self.around_particles.push(idx);
            }
        }
    }

    fn create_joints(&mut self, topo: &Topology<F>) -> Result<()> {
        for connection in topo.connections() {
            let s = &self.settings;
            let (auto, distance, frequency) = match connection.group {
                JointGroup::Around => {
                    (s.around_configure_distance, s.around_distance, s.around_frequency)
                }
                JointGroup::Center => {
                    (s.center_configure_distance, s.center_distance, s.center_frequency)
                }
            };
            let joint = SpringJoint::new(*connection, distance, frequency)
                .with_auto_configure_distance(auto)
                .with_enable_collision(false)
                .with_damping_ratio(s.damping_ratio)
                .with_break_force(s.break_force);
            let idx = self.solver.add_joint(joint)?;
            match connection.group {
                JointGroup::Around => self.around_joints.push(idx),
                JointGroup::Center => self.center_joints.push(idx),
            }
        }
        Ok(())
    }

    /// Copy the runtime frequencies onto every live joint of each group.
    pub fn update(&mut self) {
        let around = self.settings.around_frequency;
        let center = self.settings.center_frequency;
        for &idx in &self.around_joints {
            let joint = &mut self.solver.joints[idx];
            if !joint.is_broken() {
                joint.frequency = around;
            }
        }
        for &idx in &self.center_joints {
            let joint = &mut self.solver.joints[idx];
            if !joint.is_broken() {
                joint.frequency = center;
            }
        }
    }

    /// Propagate frequencies, then advance the simulation by `dt`.
    pub fn step<O: StepObserver>(
        &mut self,
        dt: F,
        config: &SolverConfig<F>,
        observer: &mut O,
    ) {
        self.update();
        self.solver.step(dt, config, observer);
    }

    pub fn set_around_frequency(&mut self, hz: F) -> Result<()> {
        let previous = self.settings.around_frequency;
        self.settings.around_frequency = hz;
        if let Err(e) = self.settings.validate_frequencies() {
            self.settings.around_frequency = previous;
            return Err(e);
        }
        Ok(())
    }

    pub fn set_center_frequency(&mut self, hz: F) -> Result<()> {
        let previous = self.settings.center_frequency;
        self.settings.center_frequency = hz;
        if let Err(e) = self.settings.validate_frequencies() {
            self.settings.center_frequency = previous;
            return Err(e);
        }
        Ok(())
    }

    /// Replace the settings. Create-time fields apply on the next `create`.
    pub fn set_settings(&mut self, settings: SoftbodySettings<F>) {
        self.settings = settings;
    }

    pub fn set_origin(&mut self, origin: Vec2<F>) {
        self.origin = origin;
    }

    pub fn set_bounds(&mut self, bounds: Option<BoundsConstraint<F>>) {
        self.solver.bounds = bounds;
    }

    /// One segment per live joint: around joints first, then center joints.
    pub fn debug_lines(&self) -> AllocVec<DebugLine<F>> {
        self.around_joints
            .iter()
            .chain(self.center_joints.iter())
            .map(|&idx| self.solver.joint(idx))
            .filter(|joint| !joint.is_broken())
            .map(|joint| {
                DebugLine::new(
                    self.solver.particle(joint.a).pos,
                    self.solver.particle(joint.b).pos,
                    joint.group,
                )
            })
            .collect()
    }

    pub fn apply_force(&mut self, force: Vec2<F>) {
        for p in self.solver.particles.iter_mut() {
            p.apply_force(force);
        }
    }

    /// Apply an impulse at the nearest particle to `point`.
    pub fn poke(&mut self, point: Vec2<F>, impulse: Vec2<F>) {
        let particles = &mut self.solver.particles;
        if particles.is_empty() {
            return;
        }
        let mut nearest_idx = 0;
        let mut nearest_dist_sq = particles[0].pos.distance_sq(point);
        for (i, p) in particles.iter().enumerate().skip(1) {
            let d = p.pos.distance_sq(point);
            if d < nearest_dist_sq {
                nearest_dist_sq = d;
                nearest_idx = i;
            }
        }
        particles[nearest_idx].add_impulse(impulse);
    }

    fn ring(&self) -> impl Iterator<Item = Vec2<F>> + '_ {
        self.around_particles.iter().map(|&i| self.solver.particle(i).pos)
    }

    /// Area enclosed by the ring (shoelace formula).
    pub fn area(&self) -> F {
        let ring: AllocVec<Vec2<F>> = self.ring().collect();
        let n = ring.len();
        if n < 3 {
            return F::zero();
        }
        let mut sum = F::zero();
        for i in 0..n {
            let j = (i + 1) % n;
            sum = sum + ring[i].cross(ring[j]);
        }
        (sum * F::half()).abs()
    }

    /// Check if a point is inside the ring using ray casting.
    pub fn contains(&self, point: Vec2<F>) -> bool {
        let ring: AllocVec<Vec2<F>> = self.ring().collect();
        let n = ring.len();
        if n < 3 {
            return false;
        }
        let mut inside = false;
        let mut j = n - 1;
        for i in 0..n {
            let pi = ring[i];
            let pj = ring[j];
            let dy = pj.y - pi.y;
            if !dy.is_near_zero(F::from_f32(1e-10))
                && ((pi.y > point.y) != (pj.y > point.y))
                && (point.x < (pj.x - pi.x) * (point.y - pi.y) / dy + pi.x)
            {
                inside = !inside;
            }
            j = i;
        }
        inside
    }

    /// Average position of all particles.
    pub fn centroid(&self) -> Vec2<F> {
        let particles = &self.solver.particles;
        if particles.is_empty() {
            return Vec2::zero();
        }
        let n = F::from_usize(particles.len());
        let mut sum = Vec2::zero();
        for p in particles {
            sum = sum + p.pos;
        }
        sum.scale(F::one() / n)
    }

    pub fn positions(&self) -> AllocVec<Vec2<F>> {
        self.solver.particles.iter().map(|p| p.pos).collect()
    }

    pub fn is_created(&self) -> bool {
        self.center_particle.is_some()
    }

    pub fn settings(&self) -> &SoftbodySettings<F> { &self.settings }
    pub fn origin(&self) -> Vec2<F> { self.origin }
    pub fn solver(&self) -> &SpringSolver<F> { &self.solver }
    pub fn solver_mut(&mut self) -> &mut SpringSolver<F> { &mut self.solver }
    pub fn particle_count(&self) -> usize { self.solver.particle_count() }

    /// Particle indices of the ring, in ring order.
    pub fn around_particles(&self) -> &[usize] { &self.around_particles }
    pub fn center_particle(&self) -> Option<usize> { self.center_particle }
    /// Joint indices of ring-to-ring joints.
    pub fn around_joints(&self) -> &[usize] { &self.around_joints }
    /// Joint indices of ring-to-center joints.
    pub fn center_joints(&self) -> &[usize] { &self.center_joints }

    pub fn particle(&self, index: usize) -> &Particle<Vec2<F>> { self.solver.particle(index) }
    pub fn joint(&self, index: usize) -> &SpringJoint<F> { self.solver.joint(index) }
}
