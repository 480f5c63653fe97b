//! Ring-plus-center topology: particle placement and connection wiring.
//!
//! Particle `0` is the center, particles `1..=count` form the ring in
//! counter-clockwise order starting on the +X axis. Every ring particle is
//! joined to its successor (closing the cycle) and to the center.

use crate::error::{Result, SoftbodyError};
use crate::float::Float;
use crate::joint::{Connection, JointGroup};
use crate::vec::{Vec, Vec2};
use alloc::vec::Vec as AllocVec;

/// Smallest ring that still forms a cycle.
pub const MIN_RING_PARTICLES: usize = 3;

/// Particle placement and connection lists for one soft body.
#[derive(Clone, Debug)]
pub struct Topology<F: Float> {
    positions: AllocVec<Vec2<F>>,
    around: AllocVec<Connection>,
    center: AllocVec<Connection>,
}

/// Evenly spaced points on a circle of `radius` around the origin.
pub fn ring_positions<F: Float>(count: usize, radius: F) -> AllocVec<Vec2<F>> {
    (0..count)
        .map(|i| {
            let angle = F::tau() * F::from_usize(i) / F::from_usize(count);
            Vec2::from_angle(angle).scale(radius)
        })
        .collect()
}

/// Build the topology for `count` ring particles on a circle of `radius`.
pub fn build<F: Float>(count: usize, radius: F) -> Result<Topology<F>> {
    if count < MIN_RING_PARTICLES {
        return Err(SoftbodyError::InsufficientParticles { count });
    }
    if !radius.is_finite() || radius <= F::zero() {
        return Err(SoftbodyError::InvalidRadius);
    }

    let mut positions = AllocVec::with_capacity(count + 1);
    positions.push(Vec2::new(F::zero(), F::zero()));
    positions.extend(ring_positions(count, radius));

    let mut around = AllocVec::with_capacity(count);
    let mut center = AllocVec::with_capacity(count);
    for i in 0..count {
        let a = Topology::<F>::ring_index(i);
        let b = Topology::<F>::ring_index((i + 1) % count);
        around.push(Connection::new(a, b, JointGroup::Around));
        center.push(Connection::new(a, Topology::<F>::center_index(), JointGroup::Center));
    }

    Ok(Topology { positions, around, center })
}

impl<F: Float> Topology<F> {
    pub const fn center_index() -> usize {
        0
    }

    /// Particle index of the `i`-th ring particle.
    pub const fn ring_index(i: usize) -> usize {
        i + 1
    }

    pub fn positions(&self) -> &[Vec2<F>] {
        &self.positions
    }

    pub fn around(&self) -> &[Connection] {
        &self.around
    }

    pub fn center(&self) -> &[Connection] {
        &self.center
    }

    /// Around connections followed by center connections.
    pub fn connections(&self) -> impl Iterator<Item = &Connection> {
        self.around.iter().chain(self.center.iter())
    }

    pub fn ring_count(&self) -> usize {
        self.around.len()
    }

    pub fn particle_count(&self) -> usize {
        self.positions.len()
    }
}
