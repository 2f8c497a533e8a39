//! Core utilities shared by the Ember engine crates.

pub mod errors;
pub mod hash;
pub mod settings;

pub use errors::{EmberError, Result};
pub use hash::{NameId, hash_name};
pub use settings::{AnimationSettings, DEFAULT_TICKS_PER_SECOND};
