use std::fmt::{Display, Formatter};

use crate::timelines::{
    PlaybackMode, RotationPoint, TimelineTrack, TranslationPoint,
};

/// Unique, never-reused identifier of a timeline inside the registry.
pub type TimelineId = u32;

/// A camera-path timeline: one translation track and one rotation track advanced together,
/// plus the global playback parameters (speed multiplier, whole-span easing flags).
///
/// Global easing is distinct from the per-segment easing carried by each keyframe's
/// [`Transition`](crate::timelines::Transition): it shapes the progress of the *entire*
/// playback span.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Clone, Debug)]
pub struct Timeline {
    id: TimelineId,
    translation: TimelineTrack<TranslationPoint>,
    rotation: TimelineTrack<RotationPoint>,
    playback_speed: f32,
    ease_in: bool,
    ease_out: bool,
}

impl Timeline {
    /// Creates an empty timeline with the given identifier.
    pub fn new(id: TimelineId) -> Self {
        Self {
            id,
            translation: TimelineTrack::new(),
            rotation: TimelineTrack::new(),
            playback_speed: 1.0,
            ease_in: false,
            ease_out: false,
        }
    }

    /// Returns the timeline identifier.
    pub fn get_id(&self) -> TimelineId {
        self.id
    }

    /// Returns the translation track.
    pub fn translation(&self) -> &TimelineTrack<TranslationPoint> {
        &self.translation
    }

    /// Returns a mutable handle to the translation track.
    pub fn translation_mut(&mut self) -> &mut TimelineTrack<TranslationPoint> {
        &mut self.translation
    }

    /// Returns the rotation track.
    pub fn rotation(&self) -> &TimelineTrack<RotationPoint> {
        &self.rotation
    }

    /// Returns a mutable handle to the rotation track.
    pub fn rotation_mut(&mut self) -> &mut TimelineTrack<RotationPoint> {
        &mut self.rotation
    }

    /// Returns the playback-speed multiplier.
    pub fn get_playback_speed(&self) -> f32 {
        self.playback_speed
    }

    /// Sets the playback-speed multiplier (used by [`advance`](Timeline::advance)).
    pub fn set_playback_speed(&mut self, speed: f32) {
        self.playback_speed = speed;
    }

    /// Returns the global (whole-span) easing flags.
    pub fn get_global_easing(&self) -> (bool, bool) {
        (self.ease_in, self.ease_out)
    }

    /// Sets the global (whole-span) easing flags.
    pub fn set_global_easing(&mut self, ease_in: bool, ease_out: bool) {
        self.ease_in = ease_in;
        self.ease_out = ease_out;
    }

    /// Total number of keyframes across both tracks.
    pub fn total_points(&self) -> usize {
        self.translation.path().len() + self.rotation.path().len()
    }

    /// Total duration: the longer of the two tracks (they may hold different keyframes).
    pub fn get_duration(&self) -> f32 {
        self.translation
            .get_duration()
            .max(self.rotation.get_duration())
    }

    /// Current playback clock: the further along of the two tracks.
    pub fn get_playback_time(&self) -> f32 {
        self.translation
            .get_playback_time()
            .max(self.rotation.get_playback_time())
    }

    /// Indicates if either track is currently playing.
    pub fn is_playing(&self) -> bool {
        self.translation.is_playing() || self.rotation.is_playing()
    }

    /// Indicates if either track is currently paused.
    pub fn is_paused(&self) -> bool {
        self.translation.is_paused() || self.rotation.is_paused()
    }

    /// Sets the playback mode on both tracks.
    pub fn set_playback_mode(&mut self, mode: PlaybackMode) {
        self.translation.set_mode(mode);
        self.rotation.set_mode(mode);
    }

    /// Returns the playback mode (both tracks always share it).
    pub fn get_playback_mode(&self) -> PlaybackMode {
        self.translation.get_mode()
    }

    /// Sets the loop-time-offset on both tracks.
    pub fn set_loop_time_offset(&mut self, offset: f32) {
        self.translation.set_loop_time_offset(offset);
        self.rotation.set_loop_time_offset(offset);
    }

    /// Returns the loop-time-offset (both tracks always share it).
    pub fn get_loop_time_offset(&self) -> f32 {
        self.translation.get_loop_time_offset()
    }

    /// Starts both tracks playing.
    pub fn start_playback(&mut self) {
        self.translation.start_playback();
        self.rotation.start_playback();
    }

    /// Pauses both tracks.
    pub fn pause_playback(&mut self) {
        self.translation.pause_playback();
        self.rotation.pause_playback();
    }

    /// Resumes both tracks.
    pub fn resume_playback(&mut self) {
        self.translation.resume_playback();
        self.rotation.resume_playback();
    }

    /// Stops and rewinds both tracks.
    pub fn reset(&mut self) {
        self.translation.reset();
        self.rotation.reset();
    }

    /// Clears all keyframes from both tracks and rewinds.
    pub fn clear(&mut self) {
        self.translation.path_mut().clear();
        self.rotation.path_mut().clear();
        self.reset();
    }

    /// Advances both playback clocks by the same (speed-scaled) delta.
    pub fn advance(&mut self, dt: f32) {
        let scaled = dt * self.playback_speed;
        self.translation.advance(scaled);
        self.rotation.advance(scaled);
    }
}

impl Display for Timeline {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Timeline #{} [duration={:.3}s, translation={} points, rotation={} points]",
            self.id,
            self.get_duration(),
            self.translation.path().len(),
            self.rotation.path().len()
        )
    }
}
