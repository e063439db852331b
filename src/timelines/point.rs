use std::f32::consts::{PI, TAU};
use std::ops::{Add, Mul, Sub};

use crate::timelines::Transition;

/// Tolerance used for near-equality of times, positions and angles.
pub const EPSILON: f32 = 1e-4;

/// Normalizes an angle (radians) to the canonical `(-π, π]` range.
pub fn wrap_angle(angle: f32) -> f32 {
    let mut wrapped = angle % TAU;
    if wrapped > PI {
        wrapped -= TAU;
    } else if wrapped <= -PI {
        wrapped += TAU;
    }
    wrapped
}

/// Re-expresses an angle as `reference` plus the shortest signed delta, so that two
/// neighboring keyframe angles never differ by more than π once unwrapped.
pub fn unwrap_angle_near(angle: f32, reference: f32) -> f32 {
    reference + wrap_angle(angle - reference)
}

/// A 3D position in world space.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    pub fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Component-wise near-equality within [`EPSILON`].
    pub fn nearly_equals(&self, other: &Self) -> bool {
        (self.x - other.x).abs() < EPSILON
            && (self.y - other.y).abs() < EPSILON
            && (self.z - other.z).abs() < EPSILON
    }
}

impl Add for Vector3 {
    type Output = Vector3;
    fn add(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;
    fn sub(self, rhs: Vector3) -> Vector3 {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;
    fn mul(self, factor: f32) -> Vector3 {
        Vector3::new(self.x * factor, self.y * factor, self.z * factor)
    }
}

/// A camera orientation: pitch and yaw, in radians.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct Angles {
    pub pitch: f32,
    pub yaw: f32,
}

impl Angles {
    pub fn new(pitch: f32, yaw: f32) -> Self {
        Self { pitch, yaw }
    }

    /// Component-wise near-equality within [`EPSILON`] (on the raw, unwrapped components).
    pub fn nearly_equals(&self, other: &Self) -> bool {
        (self.pitch - other.pitch).abs() < EPSILON && (self.yaw - other.yaw).abs() < EPSILON
    }

    /// Returns the orientation with both components normalized to `(-π, π]`.
    pub fn wrapped(&self) -> Self {
        Self::new(wrap_angle(self.pitch), wrap_angle(self.yaw))
    }

    /// Returns the orientation re-expressed as `reference` plus the shortest signed delta,
    /// component by component.
    pub fn unwrapped_near(&self, reference: &Self) -> Self {
        Self::new(
            unwrap_angle_near(self.pitch, reference.pitch),
            unwrap_angle_near(self.yaw, reference.yaw),
        )
    }
}

impl Add for Angles {
    type Output = Angles;
    fn add(self, rhs: Angles) -> Angles {
        Angles::new(self.pitch + rhs.pitch, self.yaw + rhs.yaw)
    }
}

impl Sub for Angles {
    type Output = Angles;
    fn sub(self, rhs: Angles) -> Angles {
        Angles::new(self.pitch - rhs.pitch, self.yaw - rhs.yaw)
    }
}

impl Mul<f32> for Angles {
    type Output = Angles;
    fn mul(self, factor: f32) -> Angles {
        Angles::new(self.pitch * factor, self.yaw * factor)
    }
}

/// Capability interface implemented by the two concrete keyframe point kinds.
///
/// The sampling algorithm in [`TimelineTrack`](crate::timelines::TimelineTrack) is written
/// once against this trait: arithmetic for the spline math, near-equality for degenerate
/// segments, and wrap/unwrap for the angular kind (no-ops in linear space).
pub trait PathPoint: Clone + Default {
    /// Returns the transition metadata of the point.
    fn transition(&self) -> &Transition;

    /// Returns a mutable handle to the transition metadata.
    fn transition_mut(&mut self) -> &mut Transition;

    /// Shorthand for the keyframe time of the point.
    fn time(&self) -> f32 {
        self.transition().time
    }

    /// Component-wise addition of the point values (the transition stays `self`'s).
    fn add(&self, other: &Self) -> Self;

    /// Component-wise subtraction of the point values.
    fn sub(&self, other: &Self) -> Self;

    /// Component-wise scaling of the point value.
    fn scale(&self, factor: f32) -> Self;

    /// Near-equality of the point *values* (transitions are ignored).
    fn nearly_equals(&self, other: &Self) -> bool;

    /// Normalizes the value to its canonical range (identity for linear space).
    fn wrapped(&self) -> Self;

    /// Re-expresses the value next to `reference` (identity for linear space).
    fn unwrapped_near(&self, reference: &Self) -> Self;

    /// Whether the point value is anchored to the live camera state and must be
    /// refreshed when playback starts.
    fn is_live_capture(&self) -> bool;
}

/// A translation keyframe: a [`Transition`] plus a 3D position.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct TranslationPoint {
    /// Time / interpolation / easing metadata.
    pub transition: Transition,
    /// The position this keyframe passes through.
    pub value: Vector3,
    /// When set, the value is re-sampled from the camera at every playback start.
    pub live_capture: bool,
}

impl TranslationPoint {
    pub fn new(value: Vector3, transition: Transition) -> Self {
        Self {
            transition,
            value,
            live_capture: false,
        }
    }

    /// Marks the point as anchored to the live camera position.
    pub fn set_live_capture(mut self, live_capture: bool) -> Self {
        self.live_capture = live_capture;
        self
    }
}

impl PathPoint for TranslationPoint {
    fn transition(&self) -> &Transition {
        &self.transition
    }

    fn transition_mut(&mut self) -> &mut Transition {
        &mut self.transition
    }

    fn add(&self, other: &Self) -> Self {
        Self {
            value: self.value + other.value,
            ..*self
        }
    }

    fn sub(&self, other: &Self) -> Self {
        Self {
            value: self.value - other.value,
            ..*self
        }
    }

    fn scale(&self, factor: f32) -> Self {
        Self {
            value: self.value * factor,
            ..*self
        }
    }

    fn nearly_equals(&self, other: &Self) -> bool {
        self.value.nearly_equals(&other.value)
    }

    // Linear space has no periodicity: wrap and unwrap are identities.
    fn wrapped(&self) -> Self {
        *self
    }

    fn unwrapped_near(&self, _reference: &Self) -> Self {
        *self
    }

    fn is_live_capture(&self) -> bool {
        self.live_capture
    }
}

/// A rotation keyframe: a [`Transition`] plus a pitch/yaw orientation in radians.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Copy, Debug, PartialEq)]
pub struct RotationPoint {
    /// Time / interpolation / easing metadata.
    pub transition: Transition,
    /// The orientation this keyframe passes through (raw, possibly unwrapped, radians).
    pub angles: Angles,
    /// When set, the value is re-sampled from the camera at every playback start.
    pub live_capture: bool,
}

impl RotationPoint {
    pub fn new(angles: Angles, transition: Transition) -> Self {
        Self {
            transition,
            angles,
            live_capture: false,
        }
    }

    /// Marks the point as anchored to the live camera orientation.
    pub fn set_live_capture(mut self, live_capture: bool) -> Self {
        self.live_capture = live_capture;
        self
    }
}

impl PathPoint for RotationPoint {
    fn transition(&self) -> &Transition {
        &self.transition
    }

    fn transition_mut(&mut self) -> &mut Transition {
        &mut self.transition
    }

    // Arithmetic operates on the raw (unwrapped) components so the spline math is
    // free to work outside the canonical range.
    fn add(&self, other: &Self) -> Self {
        Self {
            angles: self.angles + other.angles,
            ..*self
        }
    }

    fn sub(&self, other: &Self) -> Self {
        Self {
            angles: self.angles - other.angles,
            ..*self
        }
    }

    fn scale(&self, factor: f32) -> Self {
        Self {
            angles: self.angles * factor,
            ..*self
        }
    }

    fn nearly_equals(&self, other: &Self) -> bool {
        self.angles.nearly_equals(&other.angles)
    }

    fn wrapped(&self) -> Self {
        Self {
            angles: self.angles.wrapped(),
            ..*self
        }
    }

    fn unwrapped_near(&self, reference: &Self) -> Self {
        Self {
            angles: self.angles.unwrapped_near(&reference.angles),
            ..*self
        }
    }

    fn is_live_capture(&self) -> bool {
        self.live_capture
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_wrap_angle() {
        assert!((wrap_angle(0.0)).abs() < 1e-6);
        assert!((wrap_angle(PI) - PI).abs() < 1e-6);
        assert!((wrap_angle(-PI) - PI).abs() < 1e-6); // -π maps to the closed bound +π
        assert!((wrap_angle(TAU)).abs() < 1e-6);
        assert!((wrap_angle(3.0 * PI) - PI).abs() < 1e-5);
        assert!((wrap_angle(PI + 0.1) - (-PI + 0.1)).abs() < 1e-5);
        assert!((wrap_angle(-PI - 0.1) - (PI - 0.1)).abs() < 1e-5);
    }

    #[test]
    fn test_unwrap_angle_near() {
        // Crossing the ±π seam takes the short way.
        let unwrapped = unwrap_angle_near(-3.0, 3.0);
        assert!((unwrapped - (3.0 + (TAU - 6.0))).abs() < 1e-5);
        // Already close: unchanged.
        assert!((unwrap_angle_near(1.0, 1.2) - 1.0).abs() < 1e-6);
        // Multiple turns away still resolves to the nearest expression.
        assert!((unwrap_angle_near(0.1 + 2.0 * TAU, 0.0) - 0.1).abs() < 1e-4);
    }

    #[test]
    fn test_vector3_arithmetic() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(0.5, -1.0, 2.0);
        assert_eq!(a + b, Vector3::new(1.5, 1.0, 5.0));
        assert_eq!(a - b, Vector3::new(0.5, 3.0, 1.0));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
    }

    #[test]
    fn test_vector3_nearly_equals() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        assert!(a.nearly_equals(&Vector3::new(1.00005, 2.0, 3.0)));
        assert!(!a.nearly_equals(&Vector3::new(1.001, 2.0, 3.0)));
    }

    #[test]
    fn test_angles_wrap_unwrap() {
        let angles = Angles::new(PI + 0.2, -PI - 0.2);
        let wrapped = angles.wrapped();
        assert!((wrapped.pitch - (-PI + 0.2)).abs() < 1e-5);
        assert!((wrapped.yaw - (PI - 0.2)).abs() < 1e-5);

        let reference = Angles::new(3.0, 3.0);
        let unwrapped = Angles::new(-3.0, -3.0).unwrapped_near(&reference);
        assert!(unwrapped.pitch > 3.0);
        assert!(unwrapped.yaw > 3.0);
        assert!((wrap_angle(unwrapped.pitch - (-3.0))).abs() < 1e-5);
    }

    #[test]
    fn test_translation_point_arithmetic() {
        let transition = Transition::new(1.0);
        let a = TranslationPoint::new(Vector3::new(1.0, 0.0, 0.0), transition);
        let b = TranslationPoint::new(Vector3::new(3.0, 4.0, 0.0), Transition::new(2.0));

        let sum = a.add(&b);
        assert_eq!(sum.value, Vector3::new(4.0, 4.0, 0.0));
        // Arithmetic keeps `self`'s transition.
        assert_eq!(sum.transition.time, 1.0);

        assert_eq!(b.sub(&a).value, Vector3::new(2.0, 4.0, 0.0));
        assert_eq!(a.scale(3.0).value, Vector3::new(3.0, 0.0, 0.0));

        // Wrap/unwrap are no-ops in linear space.
        assert_eq!(a.wrapped().value, a.value);
        assert_eq!(a.unwrapped_near(&b).value, a.value);
    }

    #[test]
    fn test_rotation_point_unwrap() {
        let reference = RotationPoint::new(Angles::new(3.0, 0.0), Transition::new(0.0));
        let point = RotationPoint::new(Angles::new(-3.0, 0.0), Transition::new(1.0));

        let unwrapped = point.unwrapped_near(&reference);
        // The short way from 3.0 to -3.0 goes through π, not through 0.
        assert!(unwrapped.angles.pitch > 3.0);
        assert!((unwrapped.angles.pitch - (3.0 + (TAU - 6.0))).abs() < 1e-5);
    }

    #[test]
    fn test_live_capture_flag() {
        let point = TranslationPoint::new(Vector3::default(), Transition::default());
        assert!(!point.is_live_capture());
        let point = point.set_live_capture(true);
        assert!(point.is_live_capture());

        let point = RotationPoint::new(Angles::default(), Transition::default())
            .set_live_capture(true);
        assert!(point.is_live_capture());
    }
}
