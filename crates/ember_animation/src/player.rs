use ember_core::settings::AnimationSettings;

use crate::animation::{Animation, PlayMode};
use crate::channel::AnimationChannel;
use crate::target::{AnimatedTransform, AnimationTarget, AnimationView};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayState {
    #[default]
    Stopped,
    Playing,
    Paused,
}

/// How many more times a player runs through its animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PlayCount {
    /// Decide from the animation's own [`PlayMode`] on the next tick.
    #[default]
    Auto,
    /// Loop until stopped.
    Forever,
    /// Stop after this many more completed loops.
    Times(u32),
}

impl PlayCount {
    #[must_use]
    fn for_mode(mode: PlayMode) -> Self {
        match mode {
            PlayMode::Once => Self::Times(1),
            PlayMode::Repeat => Self::Forever,
        }
    }

    #[inline]
    #[must_use]
    pub fn is_exhausted(self) -> bool {
        self == Self::Times(0)
    }
}

/// Playback state of one animated instance.
///
/// A player holds no reference to what it plays. Each [`tick`](Self::tick)
/// names the animation by index and advances the stored position, expressed
/// as a fraction of that animation's duration.
///
/// ```text
/// Stopped ──play──▶ Playing ◀──▶ Paused
///    ▲                 │
///    └── stop / plays exhausted ──┘
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AnimationPlayer {
    state: PlayState,
    remaining_plays: PlayCount,
    current_percent: f32,
    time_dilation: f32,
}

impl Default for AnimationPlayer {
    fn default() -> Self {
        Self::new()
    }
}

impl AnimationPlayer {
    #[must_use]
    pub fn new() -> Self {
        Self {
            state: PlayState::Stopped,
            remaining_plays: PlayCount::Auto,
            current_percent: 0.0,
            time_dilation: 1.0,
        }
    }

    /// Creates a stopped player using the configured default time dilation.
    #[must_use]
    pub fn with_settings(settings: &AnimationSettings) -> Self {
        let mut player = Self::new();
        player.set_time_dilation(settings.default_time_dilation);
        player
    }

    /// Restores every field to its default.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    // ========================================================================
    // State machine
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn play_state(&self) -> PlayState {
        self.state
    }

    pub fn set_play_state(&mut self, state: PlayState) {
        if state == self.state {
            return;
        }

        match state {
            PlayState::Playing if self.state == PlayState::Stopped => self.current_percent = 0.0,
            PlayState::Stopped => self.current_percent = 0.0,
            _ => {}
        }

        log::debug!("Animation player: {:?} -> {:?}", self.state, state);
        self.state = state;
    }

    #[inline]
    pub fn play(&mut self) {
        self.set_play_state(PlayState::Playing);
    }

    #[inline]
    pub fn pause(&mut self) {
        self.set_play_state(PlayState::Paused);
    }

    #[inline]
    pub fn stop_anim(&mut self) {
        self.set_play_state(PlayState::Stopped);
    }

    #[inline]
    #[must_use]
    pub fn is_playing(&self) -> bool {
        self.state == PlayState::Playing
    }

    #[inline]
    #[must_use]
    pub fn is_paused(&self) -> bool {
        self.state == PlayState::Paused
    }

    #[inline]
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        self.state == PlayState::Stopped
    }

    // ========================================================================
    // Accessors
    // ========================================================================

    #[inline]
    #[must_use]
    pub fn num_plays(&self) -> PlayCount {
        self.remaining_plays
    }

    pub fn set_num_plays(&mut self, plays: PlayCount) {
        self.remaining_plays = plays;
    }

    /// Elapsed fraction of the animation, in `[0, 1)`.
    #[inline]
    #[must_use]
    pub fn current_percent(&self) -> f32 {
        self.current_percent
    }

    /// Same as [`current_percent`](Self::current_percent); kept for callers
    /// that address playback position by this name.
    #[inline]
    #[must_use]
    pub fn get_current_ticks(&self) -> f32 {
        self.current_percent
    }

    #[inline]
    #[must_use]
    pub fn time_dilation(&self) -> f32 {
        self.time_dilation
    }

    /// Scales elapsed time. Negative dilation is not supported and is clamped
    /// to zero.
    pub fn set_time_dilation(&mut self, dilation: f32) {
        debug_assert!(dilation >= 0.0, "time dilation {dilation} is negative");
        self.time_dilation = dilation.max(0.0);
    }

    // ========================================================================
    // Playback
    // ========================================================================

    /// Advances playback of animation `animation_index` in `graph` by
    /// `elapsed_millis` and poses the bound transforms.
    ///
    /// Does nothing unless the player is playing. Negative elapsed time scrubs
    /// backward and wraps around the start.
    pub fn tick<G: AnimationTarget>(
        &mut self,
        graph: &mut G,
        animation_index: usize,
        elapsed_millis: f32,
        transform_offset: usize,
    ) {
        if !self.is_playing() {
            return;
        }

        let AnimationView {
            animations,
            channel_lists,
            transforms,
        } = graph.animation_view();

        let Some(animation) = animations.get(animation_index) else {
            log::warn!("Animation player ticked with missing animation {animation_index}");
            return;
        };

        self.advance(animation, channel_lists, transforms, elapsed_millis, transform_offset);
    }

    /// [`tick`](Self::tick) against explicitly borrowed storage.
    pub fn advance<T: AnimatedTransform>(
        &mut self,
        animation: &Animation,
        channel_lists: &[Vec<AnimationChannel>],
        transforms: &mut [T],
        elapsed_millis: f32,
        transform_offset: usize,
    ) {
        if !self.is_playing() {
            return;
        }

        if self.remaining_plays == PlayCount::Auto {
            self.remaining_plays = PlayCount::for_mode(animation.play_mode());
        }

        if self.remaining_plays.is_exhausted() {
            self.stop_anim();
            return;
        }

        // A zero-length animation completes one play per tick.
        let percent_delta = if animation.duration() > 0.0 {
            let ticks_delta = (elapsed_millis / 1000.0) * animation.ticks_per_second() * self.time_dilation;
            ticks_delta / animation.duration()
        } else {
            1.0
        };

        let raw_percent = self.current_percent + percent_delta;
        let wrapped_percent = if raw_percent < 0.0 {
            raw_percent.rem_euclid(1.0)
        } else {
            raw_percent
        };

        animation.animate(channel_lists, transforms, wrapped_percent, transform_offset);

        let looped = raw_percent >= 1.0 || (self.current_percent > 0.0 && raw_percent < 0.0);
        if looped && let PlayCount::Times(remaining) = self.remaining_plays {
            self.remaining_plays = PlayCount::Times(remaining.saturating_sub(1));
        }

        self.current_percent = wrapped_percent.fract();

        if self.remaining_plays.is_exhausted() {
            self.stop_anim();
        }
    }
}
