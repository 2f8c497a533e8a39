//! Scene graph for the Ember engine.
//!
//! - [`SceneGraph`]: flat node / transform / channel-list / animation storage
//! - [`Transform`]: TRS component with cached matrices and dirty tracking
//! - [`transform_system`]: world-matrix update pass
//! - [`remap`]: index rewriting shared by every structural edit

pub mod graph;
pub mod node;
pub mod remap;
pub mod transform;
pub mod transform_system;

pub use graph::SceneGraph;
pub use node::{NodeType, SceneNode};
pub use remap::IndexRemap;
pub use transform::Transform;
