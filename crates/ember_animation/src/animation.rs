use ember_core::errors::{EmberError, Result};
use ember_core::hash::{NameId, hash_name};
use ember_core::settings::{AnimationSettings, DEFAULT_TICKS_PER_SECOND};

use crate::channel::AnimationChannel;
use crate::target::{AnimatedTransform, AnimationNode};

/// Default playback policy of an animation, consulted by
/// [`AnimationPlayer`](crate::player::AnimationPlayer) when no explicit play
/// count was requested.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayMode {
    #[default]
    Once,
    Repeat,
}

/// One `(channel list, track, transform)` index triple: "animate transform
/// `transform_id` with channel `track_id` of channel list `channel_list_id`".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Binding {
    pub channel_list_id: usize,
    pub track_id: usize,
    pub transform_id: usize,
}

/// A named, timed set of bindings from keyframe channels to scene transforms.
///
/// Bindings reference scene storage by plain index and own none of it. Any
/// structural change to the scene graph must rewrite them through
/// [`rebind`](Self::rebind).
#[derive(Debug, Clone, PartialEq)]
pub struct Animation {
    id: NameId,
    name: String,
    total_duration: f32,
    ticks_per_second: f32,
    play_mode: PlayMode,

    // Parallel arrays, always the same length.
    channel_list_ids: Vec<usize>,
    track_ids: Vec<usize>,
    transform_ids: Vec<usize>,
}

impl Default for Animation {
    fn default() -> Self {
        Self::new("")
    }
}

impl Animation {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            id: hash_name(name),
            name: name.to_owned(),
            total_duration: 0.0,
            ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            play_mode: PlayMode::Once,
            channel_list_ids: Vec::new(),
            track_ids: Vec::new(),
            transform_ids: Vec::new(),
        }
    }

    // ========================================================================
    // Metadata
    // ========================================================================

    /// Hash of the animation's name.
    #[inline]
    #[must_use]
    pub fn id(&self) -> NameId {
        self.id
    }

    #[inline]
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: &str) {
        self.id = hash_name(name);
        self.name = name.to_owned();
    }

    /// Duration in ticks.
    #[inline]
    #[must_use]
    pub fn duration(&self) -> f32 {
        self.total_duration
    }

    pub fn set_duration(&mut self, ticks: f32) {
        debug_assert!(ticks >= 0.0, "animation duration {ticks} is negative");
        self.total_duration = ticks;
    }

    #[inline]
    #[must_use]
    pub fn ticks_per_second(&self) -> f32 {
        self.ticks_per_second
    }

    /// Sets the playback rate. A non-positive rate is replaced with
    /// [`DEFAULT_TICKS_PER_SECOND`]; use
    /// [`set_ticks_per_second_with`](Self::set_ticks_per_second_with) to
    /// honor configured settings.
    pub fn set_ticks_per_second(&mut self, ticks_per_second: f32) {
        self.set_ticks_per_second_with(ticks_per_second, &AnimationSettings::default());
    }

    /// Sets the playback rate, substituting `settings.fallback_ticks_per_second`
    /// for a non-positive rate.
    pub fn set_ticks_per_second_with(&mut self, ticks_per_second: f32, settings: &AnimationSettings) {
        self.ticks_per_second = settings.resolve_ticks_per_second(Some(ticks_per_second));
    }

    /// Duration in seconds at the authored rate.
    #[must_use]
    pub fn duration_seconds(&self) -> f32 {
        self.total_duration / self.ticks_per_second
    }

    #[inline]
    #[must_use]
    pub fn play_mode(&self) -> PlayMode {
        self.play_mode
    }

    pub fn set_play_mode(&mut self, play_mode: PlayMode) {
        self.play_mode = play_mode;
    }

    // ========================================================================
    // Bindings
    // ========================================================================

    /// Binds `node`'s transform to track `track_id` of the node's own channel
    /// list. Indices are not checked against the graph.
    pub fn add_channel<N: AnimationNode>(&mut self, node: &N, track_id: usize) -> Result<()> {
        let channel_list_id = node
            .channel_list_id()
            .ok_or_else(|| EmberError::NodeNotAnimated(node.node_id()))?;

        self.push_binding(Binding {
            channel_list_id,
            track_id,
            transform_id: node.node_id(),
        });
        Ok(())
    }

    /// Appends a binding as-is.
    pub fn push_binding(&mut self, binding: Binding) {
        self.channel_list_ids.push(binding.channel_list_id);
        self.track_ids.push(binding.track_id);
        self.transform_ids.push(binding.transform_id);
    }

    /// Removes binding `index` from all three arrays.
    pub fn erase(&mut self, index: usize) {
        debug_assert!(index < self.size(), "binding index {index} out of range");
        if index >= self.size() {
            return;
        }
        self.channel_list_ids.remove(index);
        self.track_ids.remove(index);
        self.transform_ids.remove(index);
    }

    pub fn clear(&mut self) {
        self.channel_list_ids.clear();
        self.track_ids.clear();
        self.transform_ids.clear();
    }

    pub fn reserve(&mut self, additional: usize) {
        self.channel_list_ids.reserve(additional);
        self.track_ids.reserve(additional);
        self.transform_ids.reserve(additional);
    }

    /// Number of bindings.
    #[must_use]
    pub fn size(&self) -> usize {
        debug_assert!(
            self.channel_list_ids.len() == self.track_ids.len()
                && self.track_ids.len() == self.transform_ids.len(),
            "binding arrays out of step"
        );
        self.transform_ids.len()
    }

    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.size() == 0
    }

    #[must_use]
    pub fn binding(&self, index: usize) -> Option<Binding> {
        Some(Binding {
            channel_list_id: *self.channel_list_ids.get(index)?,
            track_id: *self.track_ids.get(index)?,
            transform_id: *self.transform_ids.get(index)?,
        })
    }

    pub fn bindings(&self) -> impl Iterator<Item = Binding> + '_ {
        (0..self.size()).filter_map(|i| self.binding(i))
    }

    #[inline]
    #[must_use]
    pub fn channel_list_ids(&self) -> &[usize] {
        &self.channel_list_ids
    }

    #[inline]
    #[must_use]
    pub fn track_ids(&self) -> &[usize] {
        &self.track_ids
    }

    #[inline]
    #[must_use]
    pub fn transform_ids(&self) -> &[usize] {
        &self.transform_ids
    }

    /// Rewrites every binding through `f`, dropping those for which it
    /// returns `None`. The three arrays stay in lockstep.
    pub fn rebind<F>(&mut self, mut f: F)
    where
        F: FnMut(Binding) -> Option<Binding>,
    {
        let mut kept = 0;
        for i in 0..self.size() {
            let binding = Binding {
                channel_list_id: self.channel_list_ids[i],
                track_id: self.track_ids[i],
                transform_id: self.transform_ids[i],
            };
            if let Some(updated) = f(binding) {
                self.channel_list_ids[kept] = updated.channel_list_id;
                self.track_ids[kept] = updated.track_id;
                self.transform_ids[kept] = updated.transform_id;
                kept += 1;
            }
        }
        self.channel_list_ids.truncate(kept);
        self.track_ids.truncate(kept);
        self.transform_ids.truncate(kept);
    }

    /// `true` if the distinct bound transform indices form one contiguous run,
    /// so the bindings can be replayed on another copy of the skeleton with a
    /// plain index offset.
    #[must_use]
    pub fn have_monotonic_transforms(&self) -> bool {
        let mut ids = self.transform_ids.clone();
        ids.sort_unstable();
        ids.dedup();
        ids.windows(2).all(|pair| pair[1] == pair[0] + 1)
    }

    // ========================================================================
    // Sampling
    // ========================================================================

    /// Samples every binding at `percent` and writes the results into
    /// `transforms[transform_id + transform_offset]`.
    ///
    /// A transform component is only written when `percent` lies inside the
    /// matching track. World matrices are not recomputed here.
    pub fn animate<T: AnimatedTransform>(
        &self,
        channel_lists: &[Vec<AnimationChannel>],
        transforms: &mut [T],
        percent: f32,
        transform_offset: usize,
    ) {
        debug_assert!(percent >= 0.0, "animation percent {percent} is negative");

        for binding in self.bindings() {
            let Some(channel) = resolve_channel(channel_lists, binding) else {
                continue;
            };
            let Some(transform) = resolve_transform(transforms, binding.transform_id + transform_offset) else {
                continue;
            };

            if channel.has_position_frame(percent)
                && let Some(position) = channel.position_frame(percent)
            {
                transform.set_position(position);
            }
            if channel.has_scale_frame(percent)
                && let Some(scale) = channel.scale_frame(percent)
            {
                transform.set_scale(scale);
            }
            if channel.has_rotation_frame(percent)
                && let Some(rotation) = channel.rotation_frame(percent)
            {
                transform.set_orientation(rotation);
            }
        }
    }

    /// Snaps every bound transform to the first (`at_start`) or last keyframe
    /// of each non-empty track, bypassing interpolation.
    pub fn init<T: AnimatedTransform>(&self, channel_lists: &[Vec<AnimationChannel>], transforms: &mut [T], at_start: bool) {
        for binding in self.bindings() {
            let Some(channel) = resolve_channel(channel_lists, binding) else {
                continue;
            };
            let Some(transform) = resolve_transform(transforms, binding.transform_id) else {
                continue;
            };

            let (position, scale, rotation) = if at_start {
                (
                    channel.position_frames.first_value(),
                    channel.scale_frames.first_value(),
                    channel.rotation_frames.first_value(),
                )
            } else {
                (
                    channel.position_frames.last_value(),
                    channel.scale_frames.last_value(),
                    channel.rotation_frames.last_value(),
                )
            };

            if let Some(position) = position {
                transform.set_position(position);
            }
            if let Some(scale) = scale {
                transform.set_scale(scale);
            }
            if let Some(rotation) = rotation {
                transform.set_orientation(rotation);
            }
        }
    }
}

fn resolve_channel(channel_lists: &[Vec<AnimationChannel>], binding: Binding) -> Option<&AnimationChannel> {
    let channel = channel_lists
        .get(binding.channel_list_id)
        .and_then(|list| list.get(binding.track_id));
    debug_assert!(
        channel.is_some(),
        "binding references missing channel {}/{}",
        binding.channel_list_id,
        binding.track_id
    );
    channel
}

fn resolve_transform<T>(transforms: &mut [T], index: usize) -> Option<&mut T> {
    let len = transforms.len();
    let transform = transforms.get_mut(index);
    debug_assert!(transform.is_some(), "binding references transform {index} of {len}");
    transform
}

/// Builder for [`Animation`] metadata, applying import fallbacks.
///
/// ```rust,ignore
/// let walk = AnimationBuilder::new("walk")
///     .duration(48.0)
///     .ticks_per_second(24.0)
///     .play_mode(PlayMode::Repeat)
///     .build();
/// ```
#[derive(Debug, Clone)]
pub struct AnimationBuilder {
    name: String,
    duration: f32,
    ticks_per_second: Option<f32>,
    play_mode: PlayMode,
    capacity: usize,
}

impl AnimationBuilder {
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_owned(),
            duration: 0.0,
            ticks_per_second: None,
            play_mode: PlayMode::Once,
            capacity: 0,
        }
    }

    #[must_use]
    pub fn duration(mut self, ticks: f32) -> Self {
        self.duration = ticks;
        self
    }

    #[must_use]
    pub fn ticks_per_second(mut self, ticks_per_second: f32) -> Self {
        self.ticks_per_second = Some(ticks_per_second);
        self
    }

    #[must_use]
    pub fn play_mode(mut self, play_mode: PlayMode) -> Self {
        self.play_mode = play_mode;
        self
    }

    /// Reserves room for `bindings` bindings.
    #[must_use]
    pub fn with_capacity(mut self, bindings: usize) -> Self {
        self.capacity = bindings;
        self
    }

    #[must_use]
    pub fn build(self) -> Animation {
        self.build_with(&AnimationSettings::default())
    }

    /// Builds the animation, substituting `settings.fallback_ticks_per_second`
    /// for a missing or non-positive rate.
    #[must_use]
    pub fn build_with(self, settings: &AnimationSettings) -> Animation {
        let mut animation = Animation::new(&self.name);
        animation.set_duration(self.duration.max(0.0));
        animation.ticks_per_second = settings.resolve_ticks_per_second(self.ticks_per_second);
        animation.play_mode = self.play_mode;
        animation.reserve(self.capacity);
        animation
    }
}
