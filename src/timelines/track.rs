use crate::timelines::point::EPSILON;
use crate::timelines::{Interpolation, KeyframePath, PathPoint};

/// Determines what happens when the playback clock reaches the last keyframe.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlaybackMode {
    /// Playback clamps to the last keyframe and stops (default).
    #[default]
    End,
    /// Playback wraps around through a virtual segment connecting the last keyframe back
    /// to the first one, whose duration is the loop-time-offset.
    Loop,
}

impl PlaybackMode {
    /// Returns the numeric code used by the file format (0=End, 1=Loop).
    pub fn as_code(&self) -> u8 {
        match self {
            PlaybackMode::End => 0,
            PlaybackMode::Loop => 1,
        }
    }

    /// Builds a playback mode from its file format code, if valid.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(PlaybackMode::End),
            1 => Some(PlaybackMode::Loop),
            _ => None,
        }
    }
}

/// A playback engine over one [`KeyframePath`]: holds the playback clock and state, and
/// computes the interpolated value at an arbitrary sample time.
///
/// The track is generic over the point kind; the same sampling algorithm serves the
/// translation channel and the (wrap-aware) rotation channel.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Default, Clone, Debug)]
pub struct TimelineTrack<P: PathPoint> {
    path: KeyframePath<P>,
    playback_time: f32,
    is_playing: bool,
    is_paused: bool,
    mode: PlaybackMode,
    loop_time_offset: f32,
}

impl<P: PathPoint> TimelineTrack<P> {
    /// Creates a track with an empty path, in `End` mode.
    pub fn new() -> Self {
        Self {
            path: KeyframePath::new(),
            playback_time: 0.0,
            is_playing: false,
            is_paused: false,
            mode: PlaybackMode::default(),
            loop_time_offset: 0.0,
        }
    }

    /// Returns the underlying keyframe path.
    pub fn path(&self) -> &KeyframePath<P> {
        &self.path
    }

    /// Returns a mutable handle to the underlying keyframe path.
    pub fn path_mut(&mut self) -> &mut KeyframePath<P> {
        &mut self.path
    }

    /// Returns the playback mode.
    pub fn get_mode(&self) -> PlaybackMode {
        self.mode
    }

    /// Sets the playback mode.
    pub fn set_mode(&mut self, mode: PlaybackMode) {
        self.mode = mode;
    }

    /// Returns the loop-time-offset (seconds): the duration of the virtual return segment.
    pub fn get_loop_time_offset(&self) -> f32 {
        self.loop_time_offset
    }

    /// Sets the loop-time-offset. Negative values are clamped to 0.
    pub fn set_loop_time_offset(&mut self, offset: f32) {
        self.loop_time_offset = offset.max(0.0);
    }

    /// Returns the current playback clock (seconds).
    pub fn get_playback_time(&self) -> f32 {
        self.playback_time
    }

    /// Indicates if the track is currently playing.
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    /// Indicates if the track is currently paused.
    pub fn is_paused(&self) -> bool {
        self.is_paused
    }

    /// Total duration of the track: the time of the last keyframe, plus the
    /// loop-time-offset when looping.
    pub fn get_duration(&self) -> f32 {
        if self.path.is_empty() {
            return 0.0;
        }
        match self.mode {
            PlaybackMode::End => self.path.last_time(),
            PlaybackMode::Loop => self.path.last_time() + self.loop_time_offset,
        }
    }

    /// Starts (or restarts after a pause) playing the track.
    pub fn start_playback(&mut self) {
        self.is_playing = true;
        self.is_paused = false;
    }

    /// Pauses the playback clock without losing the position.
    pub fn pause_playback(&mut self) {
        self.is_paused = true;
    }

    /// Resumes a paused playback.
    pub fn resume_playback(&mut self) {
        self.is_paused = false;
    }

    /// Stops playing and rewinds: zeroes the playback clock, clears playing/paused.
    pub fn reset(&mut self) {
        self.playback_time = 0.0;
        self.is_playing = false;
        self.is_paused = false;
    }

    /// Advances the playback clock by `dt` seconds.
    ///
    /// No-op when paused or stopped. Reaching the duration wraps (modulo, preserving the
    /// overshoot phase) in `Loop` mode, or clamps and stops in `End` mode. A track with
    /// no keyframes stops immediately.
    pub fn advance(&mut self, dt: f32) {
        if !self.is_playing || self.is_paused {
            return;
        }
        if self.path.is_empty() {
            self.is_playing = false;
            return;
        }

        self.playback_time += dt;

        let duration = self.get_duration();
        if duration <= 0.0 {
            self.playback_time = 0.0;
            self.is_playing = false;
            return;
        }
        if self.playback_time >= duration {
            match self.mode {
                PlaybackMode::Loop => self.playback_time %= duration,
                PlaybackMode::End => {
                    self.playback_time = duration;
                    self.is_playing = false;
                }
            }
        }
    }

    /// Computes the interpolated point value at an arbitrary sample time.
    ///
    /// Returns the default value for an empty path. In `Loop` mode, times beyond the last
    /// keyframe fall into the virtual return segment from the last point back to the
    /// first. Interpolation and easing are governed by the transition of the segment's
    /// *endpoint* keyframe.
    pub fn get_point_at_time(&self, time: f32) -> P {
        let points = self.path.points();
        let count = points.len();
        if count == 0 {
            return P::default();
        }

        // Virtual return segment: last point back to the first.
        let last_time = self.path.last_time();
        if self.mode == PlaybackMode::Loop && time > last_time && self.loop_time_offset > 0.0 {
            let progress = ((time - last_time) / self.loop_time_offset).clamp(0.0, 1.0);
            let prev_index = count - 1;
            let curr_index = 0;
            return self.interpolate_segment(prev_index, curr_index, progress, true);
        }

        // Locate the first keyframe whose time >= the sample time: the segment endpoint.
        let found = points.partition_point(|point| point.time() < time);
        let (prev_index, curr_index, progress) = if found >= count {
            // Beyond the last keyframe: full progress against the final segment.
            (count.saturating_sub(2), count - 1, 1.0)
        } else {
            let curr_index = found;
            let prev_index = curr_index.saturating_sub(1);
            let span = points[curr_index].time() - points[prev_index].time();
            let progress = if span < EPSILON {
                1.0
            } else {
                ((time - points[prev_index].time()) / span).clamp(0.0, 1.0)
            };
            (prev_index, curr_index, progress)
        };

        self.interpolate_segment(prev_index, curr_index, progress, false)
    }

    /// Interpolates within the segment `prev → curr` at the given linear progress.
    ///
    /// `virtual_segment` marks the loop return segment, where `curr` is the first point
    /// of the path and neighbor indices wrap across the seam.
    fn interpolate_segment(
        &self,
        prev_index: usize,
        curr_index: usize,
        progress: f32,
        virtual_segment: bool,
    ) -> P {
        let points = self.path.points();
        let count = points.len();
        let prev = &points[prev_index];
        let curr = &points[curr_index];
        let transition = curr.transition();

        match transition.interpolation {
            Interpolation::Step => curr.clone(),
            Interpolation::Linear => {
                if prev.nearly_equals(curr) {
                    return curr.clone();
                }
                let eased = transition.eased(progress);
                // Blend toward the endpoint expressed next to `prev` so angular channels
                // never take the long way around the seam.
                let end = curr.unwrapped_near(prev);
                prev.add(&end.sub(prev).scale(eased)).wrapped()
            }
            Interpolation::CubicHermite => {
                let eased = transition.eased(progress);
                let (before_index, after_index) = match self.mode {
                    // Neighbor indices wrap modulo count.
                    PlaybackMode::Loop => (
                        (prev_index + count - 1) % count,
                        if virtual_segment {
                            1 % count
                        } else {
                            (curr_index + 1) % count
                        },
                    ),
                    // Missing neighbors duplicate the nearest boundary point.
                    PlaybackMode::End => (
                        prev_index.saturating_sub(1),
                        (curr_index + 1).min(count - 1),
                    ),
                };

                let p1 = prev.clone();
                // Re-express the neighbors next to the segment endpoints so tangents and
                // the endpoint itself stay on the short angular path.
                let p2 = points[curr_index].unwrapped_near(&p1);
                let p0 = points[before_index].unwrapped_near(&p1);
                let p3 = points[after_index].unwrapped_near(&p2);

                // Centered finite-difference tangents.
                let m1 = p2.sub(&p0).scale(0.5);
                let m2 = p3.sub(&p1).scale(0.5);

                let t = eased;
                let t2 = t * t;
                let t3 = t2 * t;
                let h00 = 2.0 * t3 - 3.0 * t2 + 1.0;
                let h10 = t3 - 2.0 * t2 + t;
                let h01 = -2.0 * t3 + 3.0 * t2;
                let h11 = t3 - t2;

                p1.scale(h00)
                    .add(&m1.scale(h10))
                    .add(&p2.scale(h01))
                    .add(&m2.scale(h11))
                    .wrapped()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::f32::consts::PI;

    use super::*;
    use crate::timelines::{
        Angles, RotationPoint, Transition, TranslationPoint, Vector3,
    };

    fn linear_point(time: f32, x: f32) -> TranslationPoint {
        TranslationPoint::new(Vector3::new(x, 0.0, 0.0), Transition::new(time))
    }

    fn track_with(points: &[TranslationPoint]) -> TimelineTrack<TranslationPoint> {
        let mut track = TimelineTrack::new();
        for point in points {
            track.path_mut().add_point(*point);
        }
        track
    }

    #[test]
    fn test_empty_track_samples_default() {
        let track: TimelineTrack<TranslationPoint> = TimelineTrack::new();
        assert_eq!(track.get_point_at_time(3.0).value, Vector3::default());
        assert_eq!(track.get_duration(), 0.0);
    }

    #[test]
    fn test_linear_sampling() {
        let track = track_with(&[linear_point(0.0, 0.0), linear_point(10.0, 100.0)]);
        assert!((track.get_point_at_time(5.0).value.x - 50.0).abs() < 1e-3);
        assert!((track.get_point_at_time(2.5).value.x - 25.0).abs() < 1e-3);
        // Before the first / after the last keyframe: clamped to the boundary values.
        assert!((track.get_point_at_time(-1.0).value.x).abs() < 1e-4);
        assert!((track.get_point_at_time(42.0).value.x - 100.0).abs() < 1e-4);
    }

    #[test]
    fn test_linear_sampling_eased() {
        let mut end = linear_point(10.0, 100.0);
        end.transition = end.transition.set_ease_in(true).set_ease_out(true);
        let track = track_with(&[linear_point(0.0, 0.0), end]);

        // Midpoint of a symmetric S-curve is still the midpoint.
        assert!((track.get_point_at_time(5.0).value.x - 50.0).abs() < 1e-3);
        // Early progress is slowed down by the ease-in side.
        assert!(track.get_point_at_time(2.0).value.x < 20.0);
    }

    #[test]
    fn test_step_sampling() {
        let mut end = linear_point(10.0, 100.0);
        end.transition = end.transition.set_interpolation(Interpolation::Step);
        let track = track_with(&[linear_point(0.0, 0.0), end]);

        // Step: the endpoint's raw value over the whole segment.
        assert_eq!(track.get_point_at_time(0.5).value.x, 100.0);
        assert_eq!(track.get_point_at_time(9.9).value.x, 100.0);
    }

    #[test]
    fn test_linear_degenerate_segment_returns_endpoint() {
        // Two nearly-equal values: interpolation is skipped entirely.
        let track = track_with(&[linear_point(0.0, 5.0), linear_point(10.0, 5.00001)]);
        assert_eq!(track.get_point_at_time(5.0).value.x, 5.00001);

        // Zero-duration segment: progress resolves to 1.
        let track = track_with(&[linear_point(2.0, 0.0), linear_point(2.0, 80.0)]);
        assert_eq!(track.get_point_at_time(2.0).value.x, 80.0);
    }

    #[test]
    fn test_cubic_hermite_passes_through_keyframes() {
        let mut points = vec![];
        for (time, x) in [(0.0, 0.0), (1.0, 10.0), (2.0, -5.0), (3.0, 20.0)] {
            let mut point = linear_point(time, x);
            point.transition = point
                .transition
                .set_interpolation(Interpolation::CubicHermite);
            points.push(point);
        }
        let track = track_with(&points);

        // At each keyframe time, the spline passes exactly through the keyframe.
        for point in &points {
            let sampled = track.get_point_at_time(point.time());
            assert!(
                (sampled.value.x - point.value.x).abs() < 1e-3,
                "at t={}: {} != {}",
                point.time(),
                sampled.value.x,
                point.value.x
            );
        }

        // Between keyframes the spline stays finite and smooth-ish (sanity bound).
        let mid = track.get_point_at_time(1.5);
        assert!(mid.value.x.abs() < 50.0);
    }

    #[test]
    fn test_cubic_hermite_rotation_crosses_seam_short_way() {
        let mut points = vec![];
        for (time, yaw) in [(0.0, 3.0), (1.0, -3.0)] {
            let transition = Transition::new(time).set_interpolation(Interpolation::CubicHermite);
            points.push(RotationPoint::new(Angles::new(0.0, yaw), transition));
        }
        let mut track = TimelineTrack::new();
        for point in &points {
            track.path_mut().add_point(*point);
        }

        // Halfway between yaw=3.0 and yaw=-3.0 the short path passes near ±π,
        // not near 0.
        let mid = track.get_point_at_time(0.5).angles.yaw;
        assert!(
            mid.abs() > 3.0 || (mid.abs() - PI).abs() < 0.2,
            "midpoint {} took the long way",
            mid
        );
    }

    #[test]
    fn test_loop_wrap_continuity() {
        // First and last keyframes are equal: sampling just before the wrap and just
        // after the start must agree.
        let mut track = track_with(&[
            linear_point(0.0, 1.0),
            linear_point(5.0, 9.0),
            linear_point(10.0, 1.0),
        ]);
        track.set_mode(PlaybackMode::Loop);
        track.set_loop_time_offset(2.0);

        let duration = track.get_duration();
        assert_eq!(duration, 12.0);

        let before_wrap = track.get_point_at_time(duration - 1e-3);
        let after_wrap = track.get_point_at_time(1e-3);
        assert!(
            (before_wrap.value.x - after_wrap.value.x).abs() < 1e-2,
            "{} vs {}",
            before_wrap.value.x,
            after_wrap.value.x
        );
    }

    #[test]
    fn test_loop_virtual_segment_progress() {
        let mut track = track_with(&[linear_point(0.0, 0.0), linear_point(10.0, 100.0)]);
        track.set_mode(PlaybackMode::Loop);
        track.set_loop_time_offset(4.0);

        // Halfway through the return segment: halfway from 100 back to 0.
        let half = track.get_point_at_time(12.0);
        assert!((half.value.x - 50.0).abs() < 1e-3);
    }

    #[test]
    fn test_advance_end_mode_clamps_and_stops() {
        let mut track = track_with(&[linear_point(0.0, 0.0), linear_point(2.0, 10.0)]);
        track.start_playback();
        assert!(track.is_playing());

        track.advance(1.0);
        assert!(track.is_playing());
        assert_eq!(track.get_playback_time(), 1.0);

        track.advance(5.0);
        assert!(!track.is_playing());
        assert_eq!(track.get_playback_time(), 2.0);
    }

    #[test]
    fn test_advance_loop_mode_preserves_overshoot_phase() {
        let mut track = track_with(&[linear_point(0.0, 0.0), linear_point(2.0, 10.0)]);
        track.set_mode(PlaybackMode::Loop);
        track.set_loop_time_offset(1.0); // duration = 3.0
        track.start_playback();

        track.advance(3.5);
        assert!(track.is_playing());
        assert!((track.get_playback_time() - 0.5).abs() < 1e-5);
    }

    #[test]
    fn test_advance_paused_and_stopped() {
        let mut track = track_with(&[linear_point(0.0, 0.0), linear_point(2.0, 10.0)]);

        // Not playing: no-op.
        track.advance(1.0);
        assert_eq!(track.get_playback_time(), 0.0);

        track.start_playback();
        track.pause_playback();
        track.advance(1.0);
        assert_eq!(track.get_playback_time(), 0.0);
        assert!(track.is_paused());

        track.resume_playback();
        track.advance(1.0);
        assert_eq!(track.get_playback_time(), 1.0);
    }

    #[test]
    fn test_advance_empty_track_stops() {
        let mut track: TimelineTrack<TranslationPoint> = TimelineTrack::new();
        track.start_playback();
        track.advance(0.1);
        assert!(!track.is_playing());
    }

    #[test]
    fn test_reset() {
        let mut track = track_with(&[linear_point(0.0, 0.0), linear_point(2.0, 10.0)]);
        track.start_playback();
        track.advance(1.0);
        track.pause_playback();

        track.reset();
        assert_eq!(track.get_playback_time(), 0.0);
        assert!(!track.is_playing());
        assert!(!track.is_paused());
    }

    #[test]
    fn test_duration_modes() {
        let mut track = track_with(&[linear_point(0.0, 0.0), linear_point(8.0, 1.0)]);
        assert_eq!(track.get_duration(), 8.0);

        track.set_mode(PlaybackMode::Loop);
        track.set_loop_time_offset(2.5);
        assert_eq!(track.get_duration(), 10.5);

        track.set_loop_time_offset(-3.0);
        assert_eq!(track.get_loop_time_offset(), 0.0);
    }

    #[test]
    fn test_playback_mode_codes() {
        assert_eq!(PlaybackMode::End.as_code(), 0);
        assert_eq!(PlaybackMode::Loop.as_code(), 1);
        assert_eq!(PlaybackMode::from_code(0), Some(PlaybackMode::End));
        assert_eq!(PlaybackMode::from_code(1), Some(PlaybackMode::Loop));
        assert_eq!(PlaybackMode::from_code(7), None);
    }
}
