use glam::{Quat, Vec3};

/// Interpolation strategy for a keyframe payload.
///
/// Only vectors and quaternions implement this trait, so a
/// [`KeyframeTrack`](crate::tracks::KeyframeTrack) over any other payload is
/// rejected at compile time rather than silently sampling a default.
pub trait Interpolatable: Copy + Default + PartialEq + std::fmt::Debug {
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self;
}

impl Interpolatable for Vec3 {
    #[inline]
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        start.lerp(end, t)
    }
}

impl Interpolatable for Quat {
    /// Spherical interpolation along the shortest arc.
    ///
    /// `q` and `-q` describe the same orientation; blending toward whichever
    /// of the two lies in the same hemisphere as `start` keeps the rotation
    /// under 180 degrees.
    #[inline]
    fn interpolate_linear(start: Self, end: Self, t: f32) -> Self {
        let end = if start.dot(end) < 0.0 { -end } else { end };
        start.slerp(end, t).normalize()
    }
}
