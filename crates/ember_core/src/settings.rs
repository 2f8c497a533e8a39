//! Animation Settings
//!
//! Engine-wide defaults consulted when animation data is imported or a
//! player is created.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use ember_core::settings::AnimationSettings;
//!
//! // Defaults: 24 ticks per second fallback, normal speed playback
//! let settings = AnimationSettings::default();
//!
//! // Loaded from a JSON config file
//! let settings = AnimationSettings::from_json_str(r#"{ "fallback_ticks_per_second": 30.0 }"#)?;
//! ```

use serde::{Deserialize, Serialize};

use crate::errors::{EmberError, Result};

/// Playback rate used when a source file specifies none, or a non-positive one.
pub const DEFAULT_TICKS_PER_SECOND: f32 = 24.0;

/// Defaults for animation import and playback.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnimationSettings {
    /// Ticks per second applied to animations whose authored rate is missing
    /// or not positive. Must be greater than zero.
    pub fallback_ticks_per_second: f32,

    /// Time dilation new players start with. Must not be negative.
    pub default_time_dilation: f32,
}

impl Default for AnimationSettings {
    #[inline]
    fn default() -> Self {
        Self {
            fallback_ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            default_time_dilation: 1.0,
        }
    }
}

impl AnimationSettings {
    /// Parses settings from JSON. Missing fields take their default values.
    pub fn from_json_str(json: &str) -> Result<Self> {
        let settings: Self = serde_json::from_str(json)?;
        settings.validate()?;
        Ok(settings)
    }

    /// Checks that every value is usable.
    pub fn validate(&self) -> Result<()> {
        if !(self.fallback_ticks_per_second.is_finite() && self.fallback_ticks_per_second > 0.0) {
            return Err(EmberError::Settings(format!(
                "fallback_ticks_per_second must be positive, got {}",
                self.fallback_ticks_per_second
            )));
        }
        if !(self.default_time_dilation.is_finite() && self.default_time_dilation >= 0.0) {
            return Err(EmberError::Settings(format!(
                "default_time_dilation must not be negative, got {}",
                self.default_time_dilation
            )));
        }
        Ok(())
    }

    /// Returns `ticks_per_second` if it is usable, otherwise the fallback.
    #[must_use]
    pub fn resolve_ticks_per_second(&self, ticks_per_second: Option<f32>) -> f32 {
        match ticks_per_second {
            Some(tps) if tps.is_finite() && tps > 0.0 => tps,
            Some(tps) => {
                log::warn!(
                    "Ticks per second {tps} is not positive, using fallback {}",
                    self.fallback_ticks_per_second
                );
                self.fallback_ticks_per_second
            }
            None => self.fallback_ticks_per_second,
        }
    }
}
