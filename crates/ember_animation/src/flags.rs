use bitflags::bitflags;
use ember_core::errors::{EmberError, Result};

bitflags! {
    /// Controls how a channel samples its tracks between and beyond keyframes.
    ///
    /// An empty set behaves like [`INTERPOLATE`](Self::INTERPOLATE).
    #[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Default)]
    pub struct AnimationFlags: u8 {
        /// Snap to the current keyframe (step function).
        const IMMEDIATE   = 1 << 0;
        /// Blend between the current and next keyframe.
        const INTERPOLATE = 1 << 1;
        /// Past the last keyframe, blend back toward the first one instead of
        /// holding the last value.
        const REPEAT      = 1 << 2;
    }
}

impl AnimationFlags {
    /// Returns the flags unchanged if they can be honored.
    ///
    /// `IMMEDIATE` and `INTERPOLATE` are mutually exclusive.
    pub fn validate(self) -> Result<Self> {
        if self.contains(Self::IMMEDIATE | Self::INTERPOLATE) {
            return Err(EmberError::InvalidAnimationFlags(self.bits()));
        }
        Ok(self)
    }

    #[inline]
    #[must_use]
    pub fn is_immediate(self) -> bool {
        self.contains(Self::IMMEDIATE)
    }

    #[inline]
    #[must_use]
    pub fn is_repeating(self) -> bool {
        self.contains(Self::REPEAT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_rejects_conflict() {
        assert!((AnimationFlags::IMMEDIATE | AnimationFlags::INTERPOLATE).validate().is_err());
        assert!((AnimationFlags::IMMEDIATE | AnimationFlags::REPEAT).validate().is_ok());
        assert!(AnimationFlags::empty().validate().is_ok());
    }
}
