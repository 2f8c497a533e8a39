//! # Ember
//!
//! Scene graph and skeletal animation core of a CPU software renderer.
//!
//! This umbrella crate re-exports the engine crates under one namespace:
//!
//! - [`ember_core`]: errors, name hashing, settings
//! - [`animation`]: keyframe tracks, channels, animations and players
//! - [`scene`]: the flat scene graph and its transform hierarchy
//!
//! # Frame loop
//!
//! ```rust,ignore
//! use ember::prelude::*;
//!
//! let mut player = AnimationPlayer::new();
//! player.play();
//!
//! loop {
//!     player.tick(&mut graph, walk, elapsed_ms, 0);
//!     graph.update();
//!     // draw using graph.transforms()
//! }
//! ```

pub use ember_animation as animation;
pub use ember_core;
pub use ember_scene as scene;

pub use ember_animation::{
    Animation, AnimationBuilder, AnimationChannel, AnimationFlags, AnimationPlayer, KeyframeTrack, PlayCount,
    PlayMode, PlayState,
};
pub use ember_core::{AnimationSettings, EmberError, Result};
pub use ember_scene::{NodeType, SceneGraph, Transform};

pub use glam;

pub mod prelude {
    pub use ember_animation::{
        AnimatedTransform, Animation, AnimationBuilder, AnimationChannel, AnimationFlags, AnimationPlayer,
        AnimationTarget, Binding, ChannelFrame, KeyframeTrack, PlayCount, PlayMode, PlayState,
    };
    pub use ember_core::{AnimationSettings, EmberError, Result};
    pub use ember_scene::{IndexRemap, NodeType, SceneGraph, SceneNode, Transform};
    pub use glam::{Quat, Vec3};
}
