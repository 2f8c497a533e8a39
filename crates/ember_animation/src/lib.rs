//! Skeletal animation for the Ember engine.
//!
//! - [`KeyframeTrack`]: time-ordered keyframes for one property
//! - [`AnimationChannel`]: position, scale and rotation tracks for one node
//! - [`Animation`]: bindings from channels to scene transforms
//! - [`AnimationPlayer`]: playback state advanced once per frame
//!
//! The scene graph owns all storage; animations refer to it by index through
//! the traits in [`target`].

pub mod animation;
pub mod channel;
pub mod flags;
pub mod player;
pub mod target;
pub mod tracks;
pub mod values;

pub use animation::{Animation, AnimationBuilder, Binding, PlayMode};
pub use channel::{AnimationChannel, ChannelFrame};
pub use flags::AnimationFlags;
pub use player::{AnimationPlayer, PlayCount, PlayState};
pub use target::{AnimatedTransform, AnimationNode, AnimationTarget, AnimationView};
pub use tracks::KeyframeTrack;
pub use values::Interpolatable;
