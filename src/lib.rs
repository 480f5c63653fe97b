//! Ring-and-center 2D soft bodies built from particles and spring joints.
//!
//! `softbody2d` places a ring of particles around a single center particle,
//! wires spring joints between ring neighbours and from every ring particle
//! to the center, and simulates the result with Verlet integration.
//!
//! # Features
//!
//! - **Topology builder**: evenly spaced ring plus center, cycle and spoke connections
//! - **Spring joints**: stiffness as frequency (Hz) and damping ratio, solved implicitly; zero frequency is rigid
//! - **Runtime stiffness**: `update()` pushes the around/center frequencies onto live joints
//! - **Break force**: overloaded joints detach and drop out of simulation and drawing
//! - **Contacts**: particle circles collide, except pairs joined by a collision-disabled joint
//! - **Debug lines**: coloured joint segments for any renderer
//! - **Observable**: Monitor physics steps via the `StepObserver` trait
//! - **`no_std` compatible**: Works in embedded and WASM environments

#![no_std]

extern crate alloc;

pub mod float;
pub mod vec;
pub mod particle;
pub mod constraint;
pub mod joint;
pub mod topology;
pub mod collision;
pub mod solver;
pub mod softbody;
pub mod debug;
pub mod observer;
pub mod config;
pub mod error;

// Re-export primary API
pub use float::Float;
pub use vec::{Vec, Vec2};
pub use particle::{Particle, ParticleRole};
pub use constraint::{DistanceConstraint, BoundsConstraint};
pub use joint::{Connection, JointGroup, SpringJoint};
pub use topology::Topology;
pub use solver::SpringSolver;
pub use softbody::Softbody2D;
pub use debug::{DebugColor, DebugLine};
pub use config::{SolverConfig, SoftbodySettings};
pub use observer::{StepObserver, NoOpStepObserver, LogStepObserver};
pub use error::SoftbodyError;
