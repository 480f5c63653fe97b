//! Line segments for drawing the joint graph.

use crate::float::Float;
use crate::joint::JointGroup;
use crate::vec::Vec2;

/// Colour of a debug line.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DebugColor {
    Red,
    Yellow,
}

impl DebugColor {
    pub fn for_group(group: JointGroup) -> Self {
        match group {
            JointGroup::Around => DebugColor::Red,
            JointGroup::Center => DebugColor::Yellow,
        }
    }

    /// Linear RGBA in [0, 1].
    pub fn rgba(self) -> [f32; 4] {
        match self {
            DebugColor::Red => [1.0, 0.0, 0.0, 1.0],
            DebugColor::Yellow => [1.0, 0.92, 0.016, 1.0],
        }
    }
}

/// One joint drawn as a segment between its two particles.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct DebugLine<F: Float> {
    pub from: Vec2<F>,
    pub to: Vec2<F>,
    pub group: JointGroup,
    pub color: DebugColor,
}

impl<F: Float> DebugLine<F> {
    pub fn new(from: Vec2<F>, to: Vec2<F>, group: JointGroup) -> Self {
        DebugLine { from, to, group, color: DebugColor::for_group(group) }
    }
}
