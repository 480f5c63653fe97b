//! Particle-vs-particle contacts.
//!
//! Particles are circles of `Particle::radius`. Overlapping pairs are pushed
//! apart along the line between their centers, weighted by inverse mass.
//! Pairs held together by a joint with `enable_collision == false` never
//! collide with each other.

use crate::float::Float;
use crate::joint::SpringJoint;
use crate::particle::Particle;
use crate::vec::{Vec, Vec2};

/// True when some live joint links `i` and `j` and disables their contact.
fn excluded<F: Float>(joints: &[SpringJoint<F>], i: usize, j: usize) -> bool {
    joints
        .iter()
        .any(|jt| !jt.is_broken() && !jt.enable_collision && jt.connection().joins(i, j))
}

/// Resolve every overlapping particle pair once.
///
/// Returns the number of contacts resolved.
pub fn resolve_contacts<F: Float>(
    particles: &mut [Particle<Vec2<F>>],
    joints: &[SpringJoint<F>],
) -> usize {
    let n = particles.len();
    let mut contacts = 0;
    for i in 0..n {
        for j in (i + 1)..n {
            let min_dist = particles[i].radius + particles[j].radius;
            if min_dist <= F::zero() {
                continue;
            }
            let delta = particles[j].pos - particles[i].pos;
            let dist_sq = delta.length_sq();
            if dist_sq >= min_dist * min_dist {
                continue;
            }

            let w_i = particles[i].inv_mass;
            let w_j = particles[j].inv_mass;
            let w_total = w_i + w_j;
            if w_total.is_near_zero(F::from_f32(1e-10)) {
                continue;
            }
            if excluded(joints, i, j) {
                continue;
            }

            let dist = dist_sq.sqrt();
            let normal = if dist.is_near_zero(F::from_f32(1e-10)) {
                Vec2::new(F::one(), F::zero())
            } else {
                delta.scale(F::one() / dist)
            };
            let push = normal.scale(min_dist - dist);

            if !particles[i].pinned {
                particles[i].pos = particles[i].pos - push.scale(w_i / w_total);
            }
            if !particles[j].pinned {
                particles[j].pos = particles[j].pos + push.scale(w_j / w_total);
            }
            contacts += 1;
        }
    }
    contacts
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::joint::{Connection, JointGroup};
    use alloc::vec;

    fn overlapping() -> alloc::vec::Vec<Particle<Vec2<f32>>> {
        vec![
            Particle::new(Vec2::new(0.0, 0.0), 1.0).with_radius(0.5),
            Particle::new(Vec2::new(0.6, 0.0), 1.0).with_radius(0.5),
        ]
    }

    #[test]
    fn overlap_is_separated() {
        let mut particles = overlapping();
        let contacts = resolve_contacts::<f32>(&mut particles, &[]);
        assert_eq!(contacts, 1);
        let d = particles[0].pos.distance(particles[1].pos);
        assert!((d - 1.0).abs() < 1e-5, "d = {}", d);
    }

    #[test]
    fn jointed_pair_is_excluded() {
        let mut particles = overlapping();
        let joint = SpringJoint::new(Connection::new(1, 0, JointGroup::Around), 0.6f32, 2.0);
        let contacts = resolve_contacts(&mut particles, &[joint]);
        assert_eq!(contacts, 0);
        assert_eq!(particles[1].pos, Vec2::new(0.6, 0.0));
    }

    #[test]
    fn collision_enabled_joint_still_collides() {
        let mut particles = overlapping();
        let joint = SpringJoint::new(Connection::new(0, 1, JointGroup::Around), 0.6f32, 2.0)
            .with_enable_collision(true);
        assert_eq!(resolve_contacts(&mut particles, &[joint]), 1);
    }
}
