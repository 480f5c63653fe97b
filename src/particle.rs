//! Verlet particles with position-based dynamics.

use crate::float::Float;
use crate::vec::Vec;

/// Where a particle sits in the soft body.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ParticleRole {
    /// Ring particle at the given position around the ring.
    Ring(usize),
    /// The single center particle.
    Center,
    /// Not part of a soft body layout.
    Free,
}

/// A Verlet particle: position-based dynamics with implicit velocity.
#[derive(Clone, Debug)]
pub struct Particle<V: Vec> {
    pub pos: V,
    pub prev_pos: V,
    pub acceleration: V,
    pub mass: V::Scalar,
    pub inv_mass: V::Scalar,
    /// Collision radius; zero disables particle contacts.
    pub radius: V::Scalar,
    pub pinned: bool,
    pub role: ParticleRole,
}

fn inverse_mass<F: Float>(mass: F) -> F {
    if mass.is_near_zero(F::from_f32(1e-10)) {
        F::zero()
    } else {
        F::one() / mass
    }
}

impl<V: Vec> Particle<V> {
    pub fn new(pos: V, mass: V::Scalar) -> Self {
        Particle {
            pos,
            prev_pos: pos,
            acceleration: V::zero(),
            mass,
            inv_mass: inverse_mass(mass),
            radius: V::Scalar::zero(),
            pinned: false,
            role: ParticleRole::Free,
        }
    }

    pub fn pinned(pos: V) -> Self {
        Particle {
            pos,
            prev_pos: pos,
            acceleration: V::zero(),
            mass: V::Scalar::zero(),
            inv_mass: V::Scalar::zero(),
            radius: V::Scalar::zero(),
            pinned: true,
            role: ParticleRole::Free,
        }
    }

    pub fn with_role(mut self, role: ParticleRole) -> Self {
        self.role = role;
        self
    }

    pub fn with_radius(mut self, radius: V::Scalar) -> Self {
        self.radius = radius;
        self
    }

    pub fn apply_force(&mut self, force: V) {
        if !self.pinned {
            self.acceleration = self.acceleration + force.scale(self.inv_mass);
        }
    }

    pub fn apply_acceleration(&mut self, accel: V) {
        if !self.pinned {
            self.acceleration = self.acceleration + accel;
        }
    }

    pub fn integrate(&mut self, dt: V::Scalar, damping: V::Scalar) {
        if self.pinned {
            self.acceleration = V::zero();
            return;
        }
        let velocity = (self.pos - self.prev_pos).scale(damping);
        let new_pos = self.pos + velocity + self.acceleration.scale(dt * dt);
        self.prev_pos = self.pos;
        self.pos = new_pos;
        self.acceleration = V::zero();
    }

    pub fn velocity(&self, dt: V::Scalar) -> V {
        if dt.is_near_zero(V::Scalar::from_f32(1e-30)) {
            return V::zero();
        }
        (self.pos - self.prev_pos).scale(V::Scalar::one() / dt)
    }

    /// Add an instantaneous velocity change, expressed per step.
    pub fn add_impulse(&mut self, impulse: V) {
        if !self.pinned {
            self.prev_pos = self.prev_pos - impulse;
        }
    }

    pub fn pin(&mut self) {
        self.pinned = true;
        self.inv_mass = V::Scalar::zero();
        self.prev_pos = self.pos;
    }

    pub fn unpin(&mut self, mass: V::Scalar) {
        self.pinned = false;
        self.mass = mass;
        self.inv_mass = inverse_mass(mass);
    }

    pub fn is_center(&self) -> bool {
        self.role == ParticleRole::Center
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::vec::Vec2;

    #[test]
    fn pinned_particle_ignores_forces() {
        let mut p: Particle<Vec2<f32>> = Particle::pinned(Vec2::new(5.0, 5.0));
        p.apply_force(Vec2::new(1000.0, 1000.0));
        p.integrate(1.0 / 60.0, 1.0);
        assert_eq!(p.pos, Vec2::new(5.0, 5.0));
    }

    #[test]
    fn impulse_becomes_velocity() {
        let mut p: Particle<Vec2<f32>> = Particle::new(Vec2::new(0.0, 0.0), 1.0);
        p.add_impulse(Vec2::new(0.5, 0.0));
        p.integrate(1.0 / 60.0, 1.0);
        assert!((p.pos.x - 0.5).abs() < 1e-6);
    }

    #[test]
    fn unpin_restores_inverse_mass() {
        let mut p: Particle<Vec2<f32>> = Particle::new(Vec2::zero(), 2.0);
        p.pin();
        assert_eq!(p.inv_mass, 0.0);
        p.unpin(4.0);
        assert!((p.inv_mass - 0.25).abs() < 1e-6);
    }

    #[test]
    fn role_builder() {
        let p: Particle<Vec2<f64>> = Particle::new(Vec2::zero(), 1.0).with_role(ParticleRole::Ring(3));
        assert_eq!(p.role, ParticleRole::Ring(3));
        assert!(!p.is_center());
    }

    #[test]
    fn standalone_particles_have_no_body_role() {
        let free: Particle<Vec2<f32>> = Particle::new(Vec2::zero(), 1.0);
        let anchor: Particle<Vec2<f32>> = Particle::pinned(Vec2::zero());
        assert_eq!(free.role, ParticleRole::Free);
        assert_eq!(anchor.role, ParticleRole::Free);
        assert!(!free.is_center());
        assert!(!anchor.is_center());
    }
}
