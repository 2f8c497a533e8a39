use ember_core::errors::{EmberError, Result};

use crate::flags::AnimationFlags;
use crate::values::Interpolatable;

const TIME_EPSILON: f32 = 1e-6;

/// An ordered list of `(time, value)` keyframes for one property of one node.
///
/// Times are normalized to `[0, 1]` of the owning animation's duration and
/// must be non-decreasing. `times` and `values` always have the same length.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KeyframeTrack<T: Interpolatable> {
    times: Vec<f32>,
    values: Vec<T>,
}

impl<T: Interpolatable> KeyframeTrack<T> {
    /// Creates an empty track.
    #[must_use]
    pub fn new() -> Self {
        Self {
            times: Vec::new(),
            values: Vec::new(),
        }
    }

    /// Builds a track from already sorted keyframes.
    pub fn from_keyframes(times: Vec<f32>, values: Vec<T>) -> Result<Self> {
        if times.len() != values.len() {
            return Err(EmberError::KeyframeCountMismatch {
                times: times.len(),
                values: values.len(),
            });
        }
        let track = Self { times, values };
        debug_assert!(track.is_sorted(), "keyframe times must be non-decreasing");
        Ok(track)
    }

    /// (Re)allocates storage for `count` keyframes, zero-filled.
    ///
    /// On failure the track is left empty. `count == 0` simply clears it.
    pub fn init(&mut self, count: usize) -> Result<()> {
        self.clear();
        if count == 0 {
            return Ok(());
        }

        let reserved = self
            .times
            .try_reserve_exact(count)
            .and_then(|()| self.values.try_reserve_exact(count));
        if reserved.is_err() {
            self.clear();
            return Err(EmberError::AllocationFailed { requested: count });
        }

        self.times.resize(count, 0.0);
        self.values.resize(count, T::default());
        Ok(())
    }

    /// Releases all keyframe storage.
    pub fn clear(&mut self) {
        self.times = Vec::new();
        self.values = Vec::new();
    }

    /// Assigns keyframe `index`. No re-sort happens: successive calls must
    /// supply non-decreasing times.
    pub fn set_frame(&mut self, index: usize, time: f32, value: T) {
        debug_assert!(index < self.times.len(), "keyframe index {index} out of range");
        debug_assert!(
            index == 0 || self.times.get(index - 1).is_none_or(|&prev| prev <= time),
            "keyframe {index} at {time} precedes the previous keyframe"
        );

        if let (Some(t), Some(v)) = (self.times.get_mut(index), self.values.get_mut(index)) {
            *t = time;
            *v = value;
        }
    }

    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.times.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.times.is_empty()
    }

    /// A track is valid once it holds at least one keyframe.
    #[inline]
    #[must_use]
    pub fn is_valid(&self) -> bool {
        !self.times.is_empty()
    }

    #[inline]
    #[must_use]
    pub fn times(&self) -> &[f32] {
        &self.times
    }

    #[inline]
    #[must_use]
    pub fn values(&self) -> &[T] {
        &self.values
    }

    #[must_use]
    pub fn frame(&self, index: usize) -> Option<(f32, T)> {
        Some((*self.times.get(index)?, *self.values.get(index)?))
    }

    #[inline]
    #[must_use]
    pub fn first_value(&self) -> Option<T> {
        self.values.first().copied()
    }

    #[inline]
    #[must_use]
    pub fn last_value(&self) -> Option<T> {
        self.values.last().copied()
    }

    /// Time of the first keyframe, or 0 for an empty track.
    #[inline]
    #[must_use]
    pub fn start_time(&self) -> f32 {
        self.times.first().copied().unwrap_or(0.0)
    }

    /// Time of the last keyframe, or 0 for an empty track.
    #[inline]
    #[must_use]
    pub fn end_time(&self) -> f32 {
        self.times.last().copied().unwrap_or(0.0)
    }

    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.end_time() - self.start_time()
    }

    /// Returns `true` if the keyframe times never decrease.
    #[must_use]
    pub fn is_sorted(&self) -> bool {
        self.times.is_sorted()
    }

    /// Shifts every keyframe so the first one lands on `offset`, clamping the
    /// shifted times into `[0, 1]`.
    pub fn set_start_time(&mut self, offset: f32) {
        debug_assert!((0.0..1.0).contains(&offset), "start offset {offset} outside [0, 1)");

        let delta = offset - self.start_time();
        for t in &mut self.times {
            *t = (*t + delta).clamp(0.0, 1.0);
        }
    }

    /// Finds the keyframe pair surrounding `percent`.
    ///
    /// Returns `(current, next, fraction)` where `fraction` is the position of
    /// `percent` between the two keyframe times. The fraction is not clamped
    /// and leaves `[0, 1]` when `percent` lies outside the track.
    ///
    /// This is a forward linear scan, O(n) per call. Tracks are short; a
    /// binary search would return the same pair.
    #[must_use]
    pub fn calc_frame_interpolation(&self, percent: f32) -> (usize, usize, f32) {
        let Some(last) = self.times.len().checked_sub(1) else {
            return (0, 0, 0.0);
        };

        let mut curr = 0;
        let mut next = 0;
        while next < last && self.times[next] <= percent {
            curr = next;
            next += 1;
        }

        let span = self.times[next] - self.times[curr];
        let fraction = if span.abs() > TIME_EPSILON {
            1.0 - (self.times[next] - percent) / span
        } else {
            0.0
        };

        (curr, next, fraction)
    }

    /// Samples the track at `percent` according to `flags`.
    ///
    /// Before the first keyframe the first value is returned as-is; after the
    /// last keyframe the last value is held unless `REPEAT` is set. With
    /// `REPEAT`, a percent past the end samples the final keyframe pair with
    /// the fraction clamped, which lands on the last value when interpolating
    /// and on the second-to-last one in `IMMEDIATE` mode. Returns `None` for an
    /// empty track.
    #[must_use]
    pub fn get_interpolated_data(&self, percent: f32, flags: AnimationFlags) -> Option<T> {
        let first = self.first_value()?;
        let last = self.last_value()?;

        if percent <= self.start_time() {
            return Some(first);
        }

        if percent >= self.end_time() && !flags.is_repeating() {
            return Some(last);
        }

        let (curr, next, fraction) = self.calc_frame_interpolation(percent);
        let v0 = self.values[curr];
        if flags.is_immediate() {
            return Some(v0);
        }

        let v1 = self.values[next];
        Some(T::interpolate_linear(v0, v1, fraction.clamp(0.0, 1.0)))
    }
}
