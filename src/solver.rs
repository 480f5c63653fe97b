//! Spring-joint solver for 2D Verlet particles.

use crate::collision;
use crate::config::SolverConfig;
use crate::constraint::BoundsConstraint;
use crate::error::{Result, SoftbodyError};
use crate::float::Float;
use crate::joint::SpringJoint;
use crate::observer::StepObserver;
use crate::particle::Particle;
use crate::vec::Vec2;
use alloc::vec::Vec as AllocVec;

/// Owns particles and the spring joints between them and advances them in
/// time.
///
/// Each sub-step applies gravity and integrates, solves the soft joints
/// implicitly, then runs `iterations` passes of rigid joints, particle
/// contacts and bounds.
#[derive(Clone, Debug)]
pub struct SpringSolver<F: Float> {
    pub particles: AllocVec<Particle<Vec2<F>>>,
    pub joints: AllocVec<SpringJoint<F>>,
    pub bounds: Option<BoundsConstraint<F>>,
}

impl<F: Float> SpringSolver<F> {
    pub fn new() -> Self {
        SpringSolver {
            particles: AllocVec::new(),
            joints: AllocVec::new(),
            bounds: None,
        }
    }

    pub fn add_particle(&mut self, particle: Particle<Vec2<F>>) -> usize {
        let idx = self.particles.len();
        self.particles.push(particle);
        idx
    }

    /// Add a joint, configuring its rest length from current positions if
    /// it asks for that. Both ends must already exist.
    pub fn add_joint(&mut self, mut joint: SpringJoint<F>) -> Result<usize> {
        let count = self.particles.len();
        for index in [joint.a, joint.b] {
            if index >= count {
                return Err(SoftbodyError::ParticleOutOfBounds { index, count });
            }
        }
        joint.configure_distance(&self.particles);
        let idx = self.joints.len();
        self.joints.push(joint);
        Ok(idx)
    }

    /// Drop every particle and joint. Bounds are kept.
    pub fn clear(&mut self) {
        self.particles.clear();
        self.joints.clear();
    }

    pub fn step<O: StepObserver>(
        &mut self,
        dt: F,
        config: &SolverConfig<F>,
        observer: &mut O,
    ) {
        let sub_steps = F::from_usize(config.sub_steps);
        let sub_dt = dt / sub_steps;
        let damping = config.damping.powf(F::one() / sub_steps);

        for _sub in 0..config.sub_steps {
            for p in self.particles.iter_mut() {
                p.apply_acceleration(config.gravity);
                p.integrate(sub_dt, damping);
            }
            observer.on_integrate();

            self.solve_soft_joints(sub_dt, observer);

            for i in 0..config.iterations {
                for joint in self.joints.iter() {
                    joint.solve_rigid(&mut self.particles);
                }
                collision::resolve_contacts(&mut self.particles, &self.joints);
                if let Some(bounds) = &self.bounds {
                    bounds.solve(&mut self.particles);
                }
                observer.on_constraint_iteration(i);
            }
        }

        observer.on_step_complete();
    }

    /// Forward sweep breaks overloaded joints and solves the rest, backward
    /// sweep finishes the implicit step.
    fn solve_soft_joints<O: StepObserver>(&mut self, dt: F, observer: &mut O) {
        for (idx, joint) in self.joints.iter_mut().enumerate() {
            if joint.is_broken() {
                continue;
            }
            let force = joint.spring_force(&self.particles, dt);
            if joint.exceeds_break_force(force) {
                joint.break_joint();
                log::debug!("joint {} ({}-{}) broke at force {}", idx, joint.a, joint.b, force);
                observer.on_joint_broken(idx);
                continue;
            }
            joint.solve_soft(&mut self.particles, dt);
        }
        for joint in self.joints.iter().rev() {
            joint.solve_soft(&mut self.particles, dt);
        }
    }

    pub fn particle_count(&self) -> usize { self.particles.len() }
    pub fn joint_count(&self) -> usize { self.joints.len() }
    pub fn particle(&self, index: usize) -> &Particle<Vec2<F>> { &self.particles[index] }
    pub fn particle_mut(&mut self, index: usize) -> &mut Particle<Vec2<F>> { &mut self.particles[index] }
    pub fn joint(&self, index: usize) -> &SpringJoint<F> { &self.joints[index] }

    /// Joints that have not broken.
    pub fn live_joints(&self) -> impl Iterator<Item = &SpringJoint<F>> {
        self.joints.iter().filter(|j| !j.is_broken())
    }
}

impl<F: Float> Default for SpringSolver<F> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::{Connection, JointGroup};
    use crate::observer::NoOpStepObserver;
    use crate::vec::Vec;

    fn two_body(frequency: f32) -> SpringSolver<f32> {
        let mut solver = SpringSolver::new();
        solver.add_particle(Particle::new(Vec2::new(0.0, 0.0), 1.0));
        solver.add_particle(Particle::new(Vec2::new(1.0, 0.0), 1.0));
        let joint = SpringJoint::new(Connection::new(0, 1, JointGroup::Around), 1.0, frequency)
            .with_damping_ratio(0.5);
        solver.add_joint(joint).unwrap();
        solver
    }

    #[test]
    fn joint_to_missing_particle_rejected() {
        let mut solver: SpringSolver<f32> = SpringSolver::new();
        solver.add_particle(Particle::new(Vec2::zero(), 1.0));
        let joint = SpringJoint::new(Connection::new(0, 3, JointGroup::Center), 1.0, 2.0);
        assert_eq!(
            solver.add_joint(joint),
            Err(SoftbodyError::ParticleOutOfBounds { index: 3, count: 1 })
        );
    }

    #[test]
    fn stretched_spring_recovers_rest_length() {
        let mut solver = two_body(2.0);
        solver.particle_mut(1).pos = Vec2::new(2.0, 0.0);
        solver.particle_mut(1).prev_pos = Vec2::new(2.0, 0.0);

        let config = SolverConfig::new().with_sub_steps(4);
        for _ in 0..600 {
            solver.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
        }
        let d = solver.particle(0).pos.distance(solver.particle(1).pos);
        assert!((d - 1.0).abs() < 0.05, "distance = {}", d);
    }

    #[test]
    fn rigid_joint_holds_distance() {
        let mut solver = two_body(0.0);
        solver.particle_mut(1).pos = Vec2::new(3.0, 0.0);
        let config = SolverConfig::new().with_iterations(8);
        solver.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
        let d = solver.particle(0).pos.distance(solver.particle(1).pos);
        assert!((d - 1.0).abs() < 0.05, "distance = {}", d);
    }

    #[test]
    fn stiff_spring_settles_in_one_sub_step() {
        let mut solver = two_body(60.0);
        solver.particle_mut(1).pos = Vec2::new(2.0, 0.0);
        solver.particle_mut(1).prev_pos = Vec2::new(2.0, 0.0);

        let config = SolverConfig::new();
        for _ in 0..120 {
            solver.step(1.0 / 60.0, &config, &mut NoOpStepObserver);
            let d = solver.particle(0).pos.distance(solver.particle(1).pos);
            assert!(d.is_finite() && d < 2.5, "distance = {}", d);
        }
        let d = solver.particle(0).pos.distance(solver.particle(1).pos);
        assert!((d - 1.0).abs() < 0.01, "distance = {}", d);
    }
}
