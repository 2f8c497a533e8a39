use ember_core::errors::Result;
use glam::{Quat, Vec3};

use crate::flags::AnimationFlags;
use crate::tracks::KeyframeTrack;

/// All three properties sampled from a channel at one point in time.
///
/// A property is `None` when the channel has no keyframes for it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChannelFrame {
    pub position: Option<Vec3>,
    pub scale: Option<Vec3>,
    pub rotation: Option<Quat>,
}

/// The keyframe data animating one scene node within one animation.
///
/// Any subset of the three tracks may be empty; an empty track never touches
/// its transform component.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AnimationChannel {
    mode: AnimationFlags,
    pub position_frames: KeyframeTrack<Vec3>,
    pub scale_frames: KeyframeTrack<Vec3>,
    pub rotation_frames: KeyframeTrack<Quat>,
}

impl AnimationChannel {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    #[must_use]
    pub fn mode(&self) -> AnimationFlags {
        self.mode
    }

    /// Sets the sampling mode. Contradictory combinations are rejected and
    /// leave the current mode in place.
    pub fn set_mode(&mut self, mode: AnimationFlags) -> Result<()> {
        self.mode = mode.validate()?;
        Ok(())
    }

    /// Allocates all three tracks at once. If any allocation fails, every
    /// track is cleared.
    pub fn set_num_frames(&mut self, position: usize, scale: usize, rotation: usize) -> Result<()> {
        let allocated = self
            .position_frames
            .init(position)
            .and_then(|()| self.scale_frames.init(scale))
            .and_then(|()| self.rotation_frames.init(rotation));

        if let Err(err) = allocated {
            self.clear();
            return Err(err);
        }
        Ok(())
    }

    pub fn clear(&mut self) {
        self.position_frames.clear();
        self.scale_frames.clear();
        self.rotation_frames.clear();
    }

    /// `true` if no track holds a keyframe.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.position_frames.is_valid() || self.scale_frames.is_valid() || self.rotation_frames.is_valid())
    }

    // ========================================================================
    // Range membership
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn has_position_frame(&self, percent: f32) -> bool {
        self.position_frames.is_valid()
            && percent >= self.position_frames.start_time()
            && percent <= self.position_frames.end_time()
    }

    #[inline]
    #[must_use]
    pub fn has_scale_frame(&self, percent: f32) -> bool {
        self.scale_frames.is_valid()
            && percent >= self.scale_frames.start_time()
            && percent <= self.scale_frames.end_time()
    }

    #[inline]
    #[must_use]
    pub fn has_rotation_frame(&self, percent: f32) -> bool {
        self.rotation_frames.is_valid()
            && percent >= self.rotation_frames.start_time()
            && percent <= self.rotation_frames.end_time()
    }

    // ========================================================================
    // Sampling
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn position_frame(&self, percent: f32) -> Option<Vec3> {
        self.position_frames.get_interpolated_data(percent, self.mode)
    }

    #[inline]
    #[must_use]
    pub fn scale_frame(&self, percent: f32) -> Option<Vec3> {
        self.scale_frames.get_interpolated_data(percent, self.mode)
    }

    #[inline]
    #[must_use]
    pub fn rotation_frame(&self, percent: f32) -> Option<Quat> {
        self.rotation_frames.get_interpolated_data(percent, self.mode)
    }

    /// Samples every track regardless of whether `percent` lies inside it.
    #[must_use]
    pub fn get_frame(&self, percent: f32) -> ChannelFrame {
        ChannelFrame {
            position: self.position_frame(percent),
            scale: self.scale_frame(percent),
            rotation: self.rotation_frame(percent),
        }
    }

    // ========================================================================
    // Timing
    // ========================================================================

    /// Earliest start time among the non-empty tracks, 0 if all are empty.
    #[must_use]
    pub fn start_time(&self) -> f32 {
        self.track_bounds().map_or(0.0, |(start, _)| start)
    }

    /// Latest end time among the non-empty tracks, 0 if all are empty.
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.track_bounds().map_or(0.0, |(_, end)| end)
    }

    #[must_use]
    pub fn duration(&self) -> f32 {
        self.end_time() - self.start_time()
    }

    fn track_bounds(&self) -> Option<(f32, f32)> {
        let bounds = [
            self.position_frames
                .is_valid()
                .then(|| (self.position_frames.start_time(), self.position_frames.end_time())),
            self.scale_frames
                .is_valid()
                .then(|| (self.scale_frames.start_time(), self.scale_frames.end_time())),
            self.rotation_frames
                .is_valid()
                .then(|| (self.rotation_frames.start_time(), self.rotation_frames.end_time())),
        ];

        bounds
            .into_iter()
            .flatten()
            .reduce(|(s0, e0), (s1, e1)| (s0.min(s1), e0.max(e1)))
    }
}
