//! Error Types
//!
//! This module defines the error types used throughout the engine.
//!
//! # Overview
//!
//! The main error type [`EmberError`] covers the failure modes of the
//! animation and scene-graph layers:
//! - Keyframe storage allocation failures
//! - Rejected animation mode combinations
//! - Structural scene-graph errors (bad indices, hierarchy cycles)
//! - Configuration parsing errors
//!
//! Precondition violations on the per-frame hot path (`animate`, `tick`) are
//! not reported through this type; they are caught by debug assertions.
//!
//! # Usage
//!
//! ```rust,ignore
//! use ember_core::errors::{EmberError, Result};
//!
//! fn import_track() -> Result<()> {
//!     // Operations that may fail return Result
//!     Ok(())
//! }
//! ```

use thiserror::Error;

/// The main error type for the Ember engine.
#[derive(Error, Debug)]
pub enum EmberError {
    // ========================================================================
    // Animation Storage Errors
    // ========================================================================
    /// Keyframe storage could not be allocated. The affected track or channel
    /// has been rolled back to its empty state.
    #[error("Failed to allocate storage for {requested} keyframes")]
    AllocationFailed {
        /// Number of keyframes that were requested
        requested: usize,
    },

    /// Keyframe times and values were supplied in different numbers.
    #[error("Keyframe count mismatch: {times} times, {values} values")]
    KeyframeCountMismatch {
        /// Number of keyframe times
        times: usize,
        /// Number of keyframe values
        values: usize,
    },

    /// A combination of animation mode flags that cannot be honored.
    #[error("Invalid animation flags: {0:#06b}")]
    InvalidAnimationFlags(u8),

    // ========================================================================
    // Scene Graph Errors
    // ========================================================================
    /// Index out of bounds while addressing scene-graph storage.
    #[error("Index out of bounds: {context} (index: {index})")]
    IndexOutOfBounds {
        /// Description of what was being accessed
        context: &'static str,
        /// The invalid index
        index: usize,
    },

    /// The node has no channel list, so no animation can bind to it.
    #[error("Node {0} has no animation channel list")]
    NodeNotAnimated(usize),

    /// Reparenting would make a node its own ancestor.
    #[error("Cannot parent node {node} under {parent}: the parent lies in the node's subtree")]
    HierarchyCycle {
        /// Node being moved
        node: usize,
        /// Requested new parent
        parent: usize,
    },

    // ========================================================================
    // Configuration Errors
    // ========================================================================
    /// A settings value failed validation.
    #[error("Invalid settings: {0}")]
    Settings(String),

    /// JSON parsing error.
    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Alias for `Result<T, EmberError>`.
pub type Result<T> = std::result::Result<T, EmberError>;
