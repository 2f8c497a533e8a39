//! Contract between the animation system and the scene graph that hosts it.
//!
//! Animations address scene storage purely by index. The graph exposes three
//! flat arrays (animations, per-node channel lists, transforms); these traits
//! let the animation crate drive any graph that provides them.

use glam::{Quat, Vec3};

use crate::animation::Animation;
use crate::channel::AnimationChannel;

/// A transform the animation system can write to.
///
/// Each setter must mark the transform dirty for the graph's hierarchy pass.
pub trait AnimatedTransform {
    fn set_position(&mut self, position: Vec3);
    fn set_scale(&mut self, scale: Vec3);
    fn set_orientation(&mut self, orientation: Quat);
}

/// A scene node an [`Animation`] can bind to.
pub trait AnimationNode {
    /// Index of the node's transform in the graph's transform array.
    fn node_id(&self) -> usize;

    /// Index of the node's channel list, if the node is animated.
    fn channel_list_id(&self) -> Option<usize>;
}

/// Disjoint borrows of the storage one animation frame touches.
pub struct AnimationView<'a, T> {
    pub animations: &'a [Animation],
    pub channel_lists: &'a [Vec<AnimationChannel>],
    pub transforms: &'a mut [T],
}

/// A graph that owns animations, channel lists and transforms.
pub trait AnimationTarget {
    type Transform: AnimatedTransform;

    fn animation_view(&mut self) -> AnimationView<'_, Self::Transform>;
}
