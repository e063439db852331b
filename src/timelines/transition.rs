use simple_easing::{cubic_in, cubic_in_out, cubic_out};

/// Represents how the *approach* to a keyframe is interpolated from the previous one.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Interpolation {
    /// No interpolation: the keyframe value applies as-is for the whole segment (step function).
    Step,
    /// Straight-line interpolation between the previous keyframe and this one (default).
    #[default]
    Linear,
    /// Catmull-Rom style cubic-Hermite spline through the surrounding four keyframes.
    CubicHermite,
}

impl Interpolation {
    /// Returns the numeric code used by the file format (0=Step, 1=Linear, 2=CubicHermite).
    pub fn as_code(&self) -> u8 {
        match self {
            Interpolation::Step => 0,
            Interpolation::Linear => 1,
            Interpolation::CubicHermite => 2,
        }
    }

    /// Builds an interpolation mode from its file format code, if valid.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Interpolation::Step),
            1 => Some(Interpolation::Linear),
            2 => Some(Interpolation::CubicHermite),
            _ => None,
        }
    }
}

/// Transition metadata attached to every keyframe point.
///
/// A `Transition` carries the absolute keyframe time (in seconds), the interpolation mode
/// used to approach the keyframe, and the per-segment ease-in/ease-out flags. It is a plain
/// value copied into every point of a [`KeyframePath`](crate::timelines::KeyframePath).
///
/// # Example
/// ```
/// use campath::timelines::{Interpolation, Transition};
/// let transition = Transition::new(2.5)
///     .set_interpolation(Interpolation::CubicHermite)
///     .set_ease_in(true);
/// assert_eq!(transition.time, 2.5);
/// ```
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transition {
    /// The interpolation mode used when approaching this keyframe.
    pub interpolation: Interpolation,
    /// The absolute keyframe time, in seconds (negative values are clamped on insertion).
    pub time: f32,
    /// Eases the start of the segment leading to this keyframe.
    pub ease_in: bool,
    /// Eases the end of the segment leading to this keyframe.
    pub ease_out: bool,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            interpolation: Interpolation::default(),
            time: 0.0,
            ease_in: false,
            ease_out: false,
        }
    }
}

impl Transition {
    /// Creates a new `Transition` at the given time (seconds) with linear interpolation
    /// and no easing.
    pub fn new(time: f32) -> Self {
        Self {
            time,
            ..Default::default()
        }
    }

    /// Sets the interpolation mode.
    pub fn set_interpolation(mut self, interpolation: Interpolation) -> Self {
        self.interpolation = interpolation;
        self
    }

    /// Sets the ease-in flag.
    pub fn set_ease_in(mut self, ease_in: bool) -> Self {
        self.ease_in = ease_in;
        self
    }

    /// Sets the ease-out flag.
    pub fn set_ease_out(mut self, ease_out: bool) -> Self {
        self.ease_out = ease_out;
        self
    }

    /// Applies this transition's easing flags to a linear progress in `[0, 1]`.
    pub fn eased(&self, progress: f32) -> f32 {
        ease(progress, self.ease_in, self.ease_out)
    }
}

/// Applies a smoothstep-family curve to a linear progress according to the easing flags.
///
/// - neither flag: identity,
/// - `ease_in` only: cubic acceleration from a standstill,
/// - `ease_out` only: cubic deceleration into the target,
/// - both: symmetric S-curve.
pub fn ease(progress: f32, ease_in: bool, ease_out: bool) -> f32 {
    let t = progress.clamp(0.0, 1.0);
    match (ease_in, ease_out) {
        (true, true) => cubic_in_out(t),
        (true, false) => cubic_in(t),
        (false, true) => cubic_out(t),
        (false, false) => t,
    }
}
