//! Position constraints: distance projection and world bounds.

use crate::float::Float;
use crate::vec::{Vec, Vec2};
use crate::particle::Particle;

/// Keeps two particles at `rest_length`, weighted by inverse mass.
#[derive(Clone, Debug)]
pub struct DistanceConstraint<V: Vec> {
    pub a: usize,
    pub b: usize,
    pub rest_length: V::Scalar,
    pub stiffness: V::Scalar,
}

/// Axis-aligned box that particles cannot leave.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct BoundsConstraint<F: Float> {
    pub min: Vec2<F>,
    pub max: Vec2<F>,
    pub restitution: F,
}

impl<V: Vec> DistanceConstraint<V> {
    pub fn new(a: usize, b: usize, rest_length: V::Scalar, stiffness: V::Scalar) -> Self {
        DistanceConstraint { a, b, rest_length, stiffness }
    }

    pub fn solve(&self, particles: &mut [Particle<V>]) {
        let a_pos = particles[self.a].pos;
        let b_pos = particles[self.b].pos;
        let a_inv = particles[self.a].inv_mass;
        let b_inv = particles[self.b].inv_mass;

        let w_total = a_inv + b_inv;
        if w_total.is_near_zero(V::Scalar::from_f32(1e-10)) {
            return; // both pinned
        }

        let delta = b_pos - a_pos;
        let dist = delta.length();
        if dist.is_near_zero(V::Scalar::from_f32(1e-10)) {
            return; // degenerate
        }

        let error = dist - self.rest_length;
        let correction = delta.scale(error * self.stiffness / dist);

        if !particles[self.a].pinned {
            particles[self.a].pos = particles[self.a].pos + correction.scale(a_inv / w_total);
        }
        if !particles[self.b].pinned {
            particles[self.b].pos = particles[self.b].pos - correction.scale(b_inv / w_total);
        }
    }
}

impl<F: Float> BoundsConstraint<F> {
    pub fn new(min: Vec2<F>, max: Vec2<F>, restitution: F) -> Self {
        BoundsConstraint { min, max, restitution }
    }

    /// Clamp every particle, padded by its radius, and reflect the velocity
    /// component that crossed the wall.
    pub fn solve(&self, particles: &mut [Particle<Vec2<F>>]) {
        for p in particles.iter_mut() {
            if p.pinned { continue; }
            let r = p.radius;
            if p.pos.x < self.min.x + r {
                p.pos.x = self.min.x + r;
                let vel_x = p.pos.x - p.prev_pos.x;
                p.prev_pos.x = p.pos.x + vel_x * self.restitution;
            } else if p.pos.x > self.max.x - r {
                p.pos.x = self.max.x - r;
                let vel_x = p.pos.x - p.prev_pos.x;
                p.prev_pos.x = p.pos.x + vel_x * self.restitution;
            }
            if p.pos.y < self.min.y + r {
                p.pos.y = self.min.y + r;
                let vel_y = p.pos.y - p.prev_pos.y;
                p.prev_pos.y = p.pos.y + vel_y * self.restitution;
            } else if p.pos.y > self.max.y - r {
                p.pos.y = self.max.y - r;
                let vel_y = p.pos.y - p.prev_pos.y;
                p.prev_pos.y = p.pos.y + vel_y * self.restitution;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn heavier_particle_moves_less() {
        let mut particles = [
            Particle::new(Vec2::new(0.0f32, 0.0), 10.0),
            Particle::new(Vec2::new(10.0f32, 0.0), 1.0),
        ];
        let constraint = DistanceConstraint::new(0, 1, 5.0, 1.0);
        constraint.solve(&mut particles);

        let heavy = particles[0].pos.distance(Vec2::new(0.0, 0.0));
        let light = particles[1].pos.distance(Vec2::new(10.0, 0.0));
        assert!(heavy < light, "heavy moved {}, light moved {}", heavy, light);
        assert!((particles[0].pos.distance(particles[1].pos) - 5.0).abs() < 1e-4);
    }

    #[test]
    fn bounds_clamp_with_radius() {
        let bounds = BoundsConstraint::new(Vec2::new(-1.0f32, -1.0), Vec2::new(1.0, 1.0), 0.0);
        let mut particles = [Particle::new(Vec2::new(0.0f32, -3.0), 1.0).with_radius(0.25)];
        bounds.solve(&mut particles);
        assert!((particles[0].pos.y - (-0.75)).abs() < 1e-6);
    }
}
