//! Ownership-checked, lock-serialized timeline registry.
//!
//! The [`TimelineManager`] owns every [`Timeline`] in the process, keyed by a
//! monotonically increasing, never-reused [`TimelineId`]. It enforces the system-wide
//! invariant that at most one timeline records or plays at any instant (a single active
//! slot), validates client ownership on every mutating call, and drives recording and
//! playback from the per-tick [`update`](TimelineManager::update).
//!
//! Every public method takes the one process-wide lock for its full duration. Internal
//! cross-calls happen on the already-locked registry, so no reentrant locking is needed.

use std::collections::BTreeMap;
use std::path::Path;

use log::{debug, warn};
use parking_lot::Mutex;

use crate::camera::CameraRig;
use crate::errors::Error;
use crate::format::TimelineFile;
use crate::timelines::{
    ease, Angles, Interpolation, PathPoint, PlaybackMode, RotationPoint, Timeline, TimelineId,
    Transition, TranslationPoint, Vector3,
};

/// Seconds between two keyframes sampled while recording.
pub const RECORD_SAMPLE_INTERVAL: f32 = 0.1;

/// Opaque handle identifying a client plugin. Every owner-scoped call must present the
/// handle given at registration time.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ClientHandle(pub u64);

/// Where a new keyframe's value comes from.
#[derive(Clone, Copy, Debug)]
pub enum PointSource<V> {
    /// The caller supplies the value directly.
    Absolute(V),
    /// The supplied offset is added to the current camera pose.
    RelativeToCamera(V),
    /// The value is sampled from the camera now, and refreshed again at every
    /// playback start.
    LiveCapture,
}

/// Pacing choice for a playback run.
#[derive(Clone, Copy, Debug)]
pub enum PlaybackPace {
    /// Speed multiplier over the natural timeline duration.
    Speed(f32),
    /// Total wall-clock duration (seconds) the whole timeline is stretched into.
    Duration(f32),
}

/// Options for [`TimelineManager::start_playback`].
#[derive(Clone, Copy, Debug)]
pub struct PlaybackOptions {
    pub pace: PlaybackPace,
    /// Ease the start of the *whole* playback span (distinct from per-segment easing).
    pub ease_in: bool,
    /// Ease the end of the whole playback span.
    pub ease_out: bool,
    /// Keep menus/UI visible while playing back.
    pub keep_ui_visible: bool,
    /// Permit user-driven rotation on top of the played-back orientation.
    pub allow_free_look: bool,
}

impl Default for PlaybackOptions {
    fn default() -> Self {
        Self {
            pace: PlaybackPace::Speed(1.0),
            ease_in: false,
            ease_out: false,
            keep_ui_visible: false,
            allow_free_look: false,
        }
    }
}

/// Registry entry: a timeline plus its bookkeeping.
#[derive(Debug)]
struct TimelineState {
    timeline: Timeline,
    owner: ClientHandle,
    name: String,
    is_recording: bool,
    is_playing_back: bool,
    /// Recording clock (seconds since recording started).
    recording_time: f32,
    /// Recording time of the last captured sample.
    last_sample_time: f32,
    keep_ui_visible: bool,
    allow_free_look: bool,
    /// Camera pose captured at playback start, restored on stop.
    saved_pose: Option<(Vector3, Angles)>,
    /// Persistent angular offset applied on top of the sampled orientation while the
    /// user free-looks during playback.
    rotation_offset: Angles,
    /// Set by [`TimelineManager::notify_free_look`]; consumed by the next tick.
    free_look_pending: bool,
}

impl TimelineState {
    fn new(id: TimelineId, owner: ClientHandle, name: String) -> Self {
        Self {
            timeline: Timeline::new(id),
            owner,
            name,
            is_recording: false,
            is_playing_back: false,
            recording_time: 0.0,
            last_sample_time: 0.0,
            keep_ui_visible: false,
            allow_free_look: false,
            saved_pose: None,
            rotation_offset: Angles::default(),
            free_look_pending: false,
        }
    }
}

/// The unlocked registry core. All methods assume the caller holds the manager lock.
struct Registry {
    timelines: BTreeMap<TimelineId, TimelineState>,
    next_id: TimelineId,
    active_id: Option<TimelineId>,
    camera: Box<dyn CameraRig>,
}

impl Registry {
    fn new(camera: Box<dyn CameraRig>) -> Self {
        Self {
            timelines: BTreeMap::new(),
            next_id: 1,
            active_id: None,
            camera,
        }
    }

    // ########################################
    // Lookup helpers

    fn state(&self, id: TimelineId) -> Result<&TimelineState, Error> {
        self.timelines.get(&id).ok_or(Error::NotFound { id })
    }

    fn state_mut(&mut self, id: TimelineId) -> Result<&mut TimelineState, Error> {
        self.timelines.get_mut(&id).ok_or(Error::NotFound { id })
    }

    /// Validates existence and ownership without borrowing the entry past the call.
    fn check_owner(&self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        if self.state(id)?.owner != owner {
            return Err(Error::OwnershipDenied { id });
        }
        Ok(())
    }

    /// Preconditions shared by every keyframe mutation: ownership, not recording, and a
    /// playing timeline is stopped first (logged, not failed) so no mutation runs
    /// against a moving playback cursor.
    fn prepare_mutation(&mut self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.check_owner(id, owner)?;
        let state = self.state(id)?;
        if state.is_recording {
            return Err(Error::invalid_state("timeline is recording"));
        }
        if state.is_playing_back {
            debug!("Timeline {}: playback stopped before mutation", id);
            self.stop_playback_core(id);
        }
        Ok(())
    }

    // ########################################
    // Lifecycle

    fn register(&mut self, owner: ClientHandle, name: &str) -> TimelineId {
        let id = self.next_id;
        self.next_id += 1;
        self.timelines
            .insert(id, TimelineState::new(id, owner, name.to_string()));
        debug!("Timeline {} ({}) registered", id, name);
        id
    }

    fn unregister(&mut self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.check_owner(id, owner)?;
        self.force_stop(id);
        self.timelines.remove(&id);
        debug!("Timeline {} unregistered", id);
        Ok(())
    }

    /// Force-stops whatever the timeline is doing, used before removal.
    fn force_stop(&mut self, id: TimelineId) {
        if self.active_id != Some(id) {
            return;
        }
        if let Some(state) = self.timelines.get_mut(&id) {
            if state.is_recording {
                state.is_recording = false;
                self.active_id = None;
                debug!("Timeline {}: recording force-stopped", id);
            }
        }
        self.stop_playback_core(id);
    }

    // ########################################
    // Point mutations

    fn resolve_translation(&self, source: PointSource<Vector3>) -> (Vector3, bool) {
        match source {
            PointSource::Absolute(value) => (value, false),
            PointSource::RelativeToCamera(offset) => (self.camera.get_position() + offset, false),
            PointSource::LiveCapture => (self.camera.get_position(), true),
        }
    }

    fn resolve_rotation(&self, source: PointSource<Angles>) -> (Angles, bool) {
        match source {
            PointSource::Absolute(value) => (value, false),
            PointSource::RelativeToCamera(offset) => {
                (self.camera.get_orientation() + offset, false)
            }
            PointSource::LiveCapture => (self.camera.get_orientation(), true),
        }
    }

    fn add_translation_point(
        &mut self,
        id: TimelineId,
        owner: ClientHandle,
        source: PointSource<Vector3>,
        transition: Transition,
    ) -> Result<usize, Error> {
        self.prepare_mutation(id, owner)?;
        let (value, live) = self.resolve_translation(source);
        let point = TranslationPoint::new(value, transition).set_live_capture(live);
        Ok(self
            .state_mut(id)?
            .timeline
            .translation_mut()
            .path_mut()
            .add_point(point))
    }

    fn add_rotation_point(
        &mut self,
        id: TimelineId,
        owner: ClientHandle,
        source: PointSource<Angles>,
        transition: Transition,
    ) -> Result<usize, Error> {
        self.prepare_mutation(id, owner)?;
        let (value, live) = self.resolve_rotation(source);
        let point = RotationPoint::new(value, transition).set_live_capture(live);
        Ok(self
            .state_mut(id)?
            .timeline
            .rotation_mut()
            .path_mut()
            .add_point(point))
    }

    fn edit_translation_point(
        &mut self,
        id: TimelineId,
        owner: ClientHandle,
        index: usize,
        source: PointSource<Vector3>,
        transition: Transition,
    ) -> Result<usize, Error> {
        self.prepare_mutation(id, owner)?;
        let (value, live) = self.resolve_translation(source);
        let point = TranslationPoint::new(value, transition).set_live_capture(live);
        self.state_mut(id)?
            .timeline
            .translation_mut()
            .path_mut()
            .edit_point(index, point)
    }

    fn edit_rotation_point(
        &mut self,
        id: TimelineId,
        owner: ClientHandle,
        index: usize,
        source: PointSource<Angles>,
        transition: Transition,
    ) -> Result<usize, Error> {
        self.prepare_mutation(id, owner)?;
        let (value, live) = self.resolve_rotation(source);
        let point = RotationPoint::new(value, transition).set_live_capture(live);
        self.state_mut(id)?
            .timeline
            .rotation_mut()
            .path_mut()
            .edit_point(index, point)
    }

    fn remove_translation_point(
        &mut self,
        id: TimelineId,
        owner: ClientHandle,
        index: usize,
    ) -> Result<(), Error> {
        self.prepare_mutation(id, owner)?;
        self.state_mut(id)?
            .timeline
            .translation_mut()
            .path_mut()
            .remove_point(index);
        Ok(())
    }

    fn remove_rotation_point(
        &mut self,
        id: TimelineId,
        owner: ClientHandle,
        index: usize,
    ) -> Result<(), Error> {
        self.prepare_mutation(id, owner)?;
        self.state_mut(id)?
            .timeline
            .rotation_mut()
            .path_mut()
            .remove_point(index);
        Ok(())
    }

    fn clear_timeline(&mut self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.prepare_mutation(id, owner)?;
        self.state_mut(id)?.timeline.clear();
        Ok(())
    }

    fn set_playback_mode(
        &mut self,
        id: TimelineId,
        owner: ClientHandle,
        mode: PlaybackMode,
    ) -> Result<(), Error> {
        self.prepare_mutation(id, owner)?;
        self.state_mut(id)?.timeline.set_playback_mode(mode);
        Ok(())
    }

    fn set_loop_time_offset(
        &mut self,
        id: TimelineId,
        owner: ClientHandle,
        offset: f32,
    ) -> Result<(), Error> {
        self.prepare_mutation(id, owner)?;
        self.state_mut(id)?.timeline.set_loop_time_offset(offset);
        Ok(())
    }

    // ########################################
    // Recording

    fn start_recording(&mut self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        if let Some(active) = self.active_id {
            return Err(Error::invalid_state(format!(
                "timeline {} is already active",
                active
            )));
        }
        self.check_owner(id, owner)?;
        if !self.camera.is_in_capture_mode() {
            return Err(Error::invalid_state("camera is not in capture mode"));
        }

        let position = self.camera.get_position();
        let orientation = self.camera.get_orientation();

        let state = self.state_mut(id)?;
        state.timeline.clear();
        let transition = Transition::new(0.0)
            .set_interpolation(Interpolation::CubicHermite)
            .set_ease_in(true);
        state
            .timeline
            .translation_mut()
            .path_mut()
            .add_point(TranslationPoint::new(position, transition));
        state
            .timeline
            .rotation_mut()
            .path_mut()
            .add_point(RotationPoint::new(orientation, transition));
        state.is_recording = true;
        state.recording_time = 0.0;
        state.last_sample_time = 0.0;

        self.active_id = Some(id);
        debug!("Timeline {}: recording started", id);
        Ok(())
    }

    fn stop_recording(&mut self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.check_owner(id, owner)?;
        if !self.state(id)?.is_recording || self.active_id != Some(id) {
            return Err(Error::invalid_state("timeline is not recording"));
        }

        let position = self.camera.get_position();
        let orientation = self.camera.get_orientation();

        let state = self.state_mut(id)?;
        let transition = Transition::new(state.recording_time)
            .set_interpolation(Interpolation::CubicHermite)
            .set_ease_out(true);
        state
            .timeline
            .translation_mut()
            .path_mut()
            .add_point(TranslationPoint::new(position, transition));
        state
            .timeline
            .rotation_mut()
            .path_mut()
            .add_point(RotationPoint::new(orientation, transition));
        state.is_recording = false;

        self.active_id = None;
        debug!("Timeline {}: recording stopped", id);
        Ok(())
    }

    // ########################################
    // Playback

    fn start_playback(
        &mut self,
        id: TimelineId,
        owner: ClientHandle,
        options: PlaybackOptions,
    ) -> Result<(), Error> {
        if let Some(active) = self.active_id {
            return Err(Error::invalid_state(format!(
                "timeline {} is already active",
                active
            )));
        }
        self.check_owner(id, owner)?;
        if self.state(id)?.timeline.total_points() == 0 {
            return Err(Error::EmptyTimeline { id });
        }
        if self.camera.is_in_capture_mode() {
            return Err(Error::invalid_state("camera is already in capture mode"));
        }

        let duration = self.state(id)?.timeline.get_duration();
        if duration <= 0.0 {
            return Err(Error::invalid_state("playback duration is zero"));
        }
        let speed = match options.pace {
            PlaybackPace::Speed(speed) if speed <= 0.0 => {
                warn!("Invalid playback speed {}, defaulting to 1.0", speed);
                1.0
            }
            PlaybackPace::Speed(speed) => speed,
            PlaybackPace::Duration(wall) if wall <= 0.0 => {
                warn!(
                    "Invalid playback duration {}, defaulting to the natural duration",
                    wall
                );
                1.0
            }
            PlaybackPace::Duration(wall) => duration / wall,
        };

        let position = self.camera.get_position();
        let orientation = self.camera.get_orientation();

        let state = self.state_mut(id)?;
        // Points anchored to the live camera pick up the present pose.
        for point in state.timeline.translation_mut().path_mut().points_mut() {
            if point.is_live_capture() {
                point.value = position;
            }
        }
        for point in state.timeline.rotation_mut().path_mut().points_mut() {
            if point.is_live_capture() {
                point.angles = orientation;
            }
        }

        state.timeline.set_playback_speed(speed);
        state
            .timeline
            .set_global_easing(options.ease_in, options.ease_out);
        state.timeline.reset();
        state.timeline.start_playback();
        state.keep_ui_visible = options.keep_ui_visible;
        state.allow_free_look = options.allow_free_look;
        state.rotation_offset = Angles::default();
        state.free_look_pending = false;
        state.saved_pose = Some((position, orientation));
        state.is_playing_back = true;

        self.camera.enter_capture_mode();
        self.active_id = Some(id);
        debug!("Timeline {}: playback started (speed {})", id, speed);
        Ok(())
    }

    fn stop_playback(&mut self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.check_owner(id, owner)?;
        if !self.state(id)?.is_playing_back || self.active_id != Some(id) {
            return Err(Error::invalid_state("timeline is not playing"));
        }
        self.stop_playback_core(id);
        Ok(())
    }

    /// Unchecked playback teardown, shared by the public stop, the tick handler, forced
    /// stops before mutation and unregistration. No-op when the timeline is not playing.
    fn stop_playback_core(&mut self, id: TimelineId) {
        let saved_pose = match self.timelines.get_mut(&id) {
            Some(state) if state.is_playing_back => {
                state.timeline.reset();
                state.is_playing_back = false;
                state.rotation_offset = Angles::default();
                state.free_look_pending = false;
                state.saved_pose.take()
            }
            _ => return,
        };
        self.camera.exit_capture_mode();
        if let Some((position, orientation)) = saved_pose {
            self.camera.set_position(position);
            self.camera.set_orientation(orientation);
        }
        if self.active_id == Some(id) {
            self.active_id = None;
        }
        debug!("Timeline {}: playback stopped", id);
    }

    fn pause_playback(&mut self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.check_owner(id, owner)?;
        if !self.state(id)?.is_playing_back || self.active_id != Some(id) {
            return Err(Error::invalid_state("timeline is not playing"));
        }
        self.state_mut(id)?.timeline.pause_playback();
        Ok(())
    }

    fn resume_playback(&mut self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.check_owner(id, owner)?;
        if !self.state(id)?.is_playing_back || self.active_id != Some(id) {
            return Err(Error::invalid_state("timeline is not playing"));
        }
        self.state_mut(id)?.timeline.resume_playback();
        Ok(())
    }

    fn notify_free_look(&mut self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.check_owner(id, owner)?;
        let state = self.state_mut(id)?;
        if state.is_playing_back && state.allow_free_look {
            state.free_look_pending = true;
        }
        Ok(())
    }

    // ########################################
    // Per-tick driver

    fn update(&mut self, dt: f32) {
        let Some(id) = self.active_id else {
            return;
        };
        let Some(state) = self.timelines.get_mut(&id) else {
            self.active_id = None;
            return;
        };

        let mut deactivate = false;
        let mut finished_playback = false;

        if state.is_recording {
            if !self.camera.is_in_capture_mode() {
                // The external precondition is gone: stop without a final keyframe.
                warn!("Timeline {}: capture mode lost, recording stopped", id);
                state.is_recording = false;
                deactivate = true;
            } else {
                state.recording_time += dt;
                if state.recording_time - state.last_sample_time >= RECORD_SAMPLE_INTERVAL {
                    let transition = Transition::new(state.recording_time)
                        .set_interpolation(Interpolation::CubicHermite);
                    state
                        .timeline
                        .translation_mut()
                        .path_mut()
                        .add_point(TranslationPoint::new(
                            self.camera.get_position(),
                            transition,
                        ));
                    state
                        .timeline
                        .rotation_mut()
                        .path_mut()
                        .add_point(RotationPoint::new(
                            self.camera.get_orientation(),
                            transition,
                        ));
                    state.last_sample_time = state.recording_time;
                }
            }
        }

        if state.is_playing_back {
            state.timeline.advance(dt);
            let duration = state.timeline.get_duration();
            if duration > 0.0 {
                // Global easing over the whole span, applied on top of the per-segment
                // easing inside track sampling.
                let linear = (state.timeline.get_playback_time() / duration).clamp(0.0, 1.0);
                let (ease_in, ease_out) = state.timeline.get_global_easing();
                let sample_time = ease(linear, ease_in, ease_out) * duration;

                let position = state
                    .timeline
                    .translation()
                    .get_point_at_time(sample_time)
                    .value;
                let orientation = state
                    .timeline
                    .rotation()
                    .get_point_at_time(sample_time)
                    .angles;

                if state.free_look_pending && state.allow_free_look {
                    // Recompute the offset once so the user-turned view does not snap
                    // back to the path; it is then held until the next notification.
                    state.rotation_offset =
                        (self.camera.get_orientation() - orientation).wrapped();
                    state.free_look_pending = false;
                }

                self.camera.set_position(position);
                self.camera
                    .set_orientation((orientation + state.rotation_offset).wrapped());
            }
            if !state.timeline.is_playing() {
                finished_playback = true;
            }
        }

        if deactivate {
            self.active_id = None;
        }
        if finished_playback {
            self.stop_playback_core(id);
        }
    }

    // ########################################
    // Import / export

    fn apply_import(
        &mut self,
        id: TimelineId,
        owner: ClientHandle,
        file: TimelineFile,
    ) -> Result<(), Error> {
        self.prepare_mutation(id, owner)?;
        file.apply_to(&mut self.state_mut(id)?.timeline);
        Ok(())
    }

    fn export(&self, id: TimelineId, owner: ClientHandle) -> Result<TimelineFile, Error> {
        self.check_owner(id, owner)?;
        Ok(TimelineFile::from_timeline(&self.state(id)?.timeline))
    }
}

/// The process-wide timeline registry service.
///
/// Construct exactly one per host process, hand it the camera sink, and share it by
/// reference with the per-tick driver and the client plugins. All methods are safe to
/// call from any thread.
pub struct TimelineManager {
    inner: Mutex<Registry>,
}

impl TimelineManager {
    /// Creates a manager driving the given camera sink.
    pub fn new(camera: Box<dyn CameraRig>) -> Self {
        Self {
            inner: Mutex::new(Registry::new(camera)),
        }
    }

    // ########################################
    // Lifecycle

    /// Registers a new timeline for `owner` and returns its never-reused id.
    pub fn register_timeline(&self, owner: ClientHandle, name: &str) -> TimelineId {
        self.inner.lock().register(owner, name)
    }

    /// Removes a timeline, force-stopping any recording or playback it is running.
    pub fn unregister_timeline(&self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.inner.lock().unregister(id, owner)
    }

    // ########################################
    // Keyframe authoring

    /// Adds a translation keyframe and returns its index.
    pub fn add_translation_point(
        &self,
        id: TimelineId,
        owner: ClientHandle,
        source: PointSource<Vector3>,
        transition: Transition,
    ) -> Result<usize, Error> {
        self.inner
            .lock()
            .add_translation_point(id, owner, source, transition)
    }

    /// Adds a rotation keyframe and returns its index.
    pub fn add_rotation_point(
        &self,
        id: TimelineId,
        owner: ClientHandle,
        source: PointSource<Angles>,
        transition: Transition,
    ) -> Result<usize, Error> {
        self.inner
            .lock()
            .add_rotation_point(id, owner, source, transition)
    }

    /// Replaces a translation keyframe; the returned index may differ when the time
    /// changed.
    pub fn edit_translation_point(
        &self,
        id: TimelineId,
        owner: ClientHandle,
        index: usize,
        source: PointSource<Vector3>,
        transition: Transition,
    ) -> Result<usize, Error> {
        self.inner
            .lock()
            .edit_translation_point(id, owner, index, source, transition)
    }

    /// Replaces a rotation keyframe; the returned index may differ when the time changed.
    pub fn edit_rotation_point(
        &self,
        id: TimelineId,
        owner: ClientHandle,
        index: usize,
        source: PointSource<Angles>,
        transition: Transition,
    ) -> Result<usize, Error> {
        self.inner
            .lock()
            .edit_rotation_point(id, owner, index, source, transition)
    }

    /// Removes a translation keyframe (out-of-range indices are ignored).
    pub fn remove_translation_point(
        &self,
        id: TimelineId,
        owner: ClientHandle,
        index: usize,
    ) -> Result<(), Error> {
        self.inner.lock().remove_translation_point(id, owner, index)
    }

    /// Removes a rotation keyframe (out-of-range indices are ignored).
    pub fn remove_rotation_point(
        &self,
        id: TimelineId,
        owner: ClientHandle,
        index: usize,
    ) -> Result<(), Error> {
        self.inner.lock().remove_rotation_point(id, owner, index)
    }

    /// Empties both tracks. Fails while the timeline is recording.
    pub fn clear_timeline(&self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.inner.lock().clear_timeline(id, owner)
    }

    /// Sets the playback mode on both tracks.
    pub fn set_playback_mode(
        &self,
        id: TimelineId,
        owner: ClientHandle,
        mode: PlaybackMode,
    ) -> Result<(), Error> {
        self.inner.lock().set_playback_mode(id, owner, mode)
    }

    /// Sets the loop-time-offset (seconds) on both tracks.
    pub fn set_loop_time_offset(
        &self,
        id: TimelineId,
        owner: ClientHandle,
        offset: f32,
    ) -> Result<(), Error> {
        self.inner.lock().set_loop_time_offset(id, owner, offset)
    }

    // ########################################
    // Recording & playback control

    /// Starts recording: clears the timeline, captures an initial ease-in keyframe from
    /// the camera and marks the timeline active.
    pub fn start_recording(&self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.inner.lock().start_recording(id, owner)
    }

    /// Stops recording, appending a final ease-out keyframe at the current recording
    /// time.
    pub fn stop_recording(&self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.inner.lock().stop_recording(id, owner)
    }

    /// Starts playback with the given pacing and global easing.
    pub fn start_playback(
        &self,
        id: TimelineId,
        owner: ClientHandle,
        options: PlaybackOptions,
    ) -> Result<(), Error> {
        self.inner.lock().start_playback(id, owner, options)
    }

    /// Stops playback and restores the camera pose captured at start.
    pub fn stop_playback(&self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.inner.lock().stop_playback(id, owner)
    }

    /// Pauses the playback clock without losing the position.
    pub fn pause_playback(&self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.inner.lock().pause_playback(id, owner)
    }

    /// Resumes a paused playback.
    pub fn resume_playback(&self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.inner.lock().resume_playback(id, owner)
    }

    /// Reports user-initiated rotation input: the next tick recomputes the free-look
    /// offset once instead of snapping the view back onto the path.
    pub fn notify_free_look(&self, id: TimelineId, owner: ClientHandle) -> Result<(), Error> {
        self.inner.lock().notify_free_look(id, owner)
    }

    /// Per-tick driver entry point. `dt` is a real-time delta in seconds.
    pub fn update(&self, dt: f32) {
        self.inner.lock().update(dt);
    }

    // ########################################
    // Queries

    /// Returns the id of the timeline currently recording or playing, if any.
    pub fn active_timeline(&self) -> Option<TimelineId> {
        self.inner.lock().active_id
    }

    /// Returns the display name given at registration.
    pub fn get_name(&self, id: TimelineId) -> Result<String, Error> {
        Ok(self.inner.lock().state(id)?.name.clone())
    }

    /// Number of translation keyframes.
    pub fn get_translation_count(&self, id: TimelineId) -> Result<usize, Error> {
        Ok(self.inner.lock().state(id)?.timeline.translation().path().len())
    }

    /// Number of rotation keyframes.
    pub fn get_rotation_count(&self, id: TimelineId) -> Result<usize, Error> {
        Ok(self.inner.lock().state(id)?.timeline.rotation().path().len())
    }

    /// Total timeline duration (the longer of the two tracks).
    pub fn get_duration(&self, id: TimelineId) -> Result<f32, Error> {
        Ok(self.inner.lock().state(id)?.timeline.get_duration())
    }

    pub fn is_recording(&self, id: TimelineId) -> Result<bool, Error> {
        Ok(self.inner.lock().state(id)?.is_recording)
    }

    pub fn is_playing(&self, id: TimelineId) -> Result<bool, Error> {
        Ok(self.inner.lock().state(id)?.is_playing_back)
    }

    pub fn is_paused(&self, id: TimelineId) -> Result<bool, Error> {
        Ok(self.inner.lock().state(id)?.timeline.is_paused())
    }

    /// Whether menus stay visible while this timeline plays back.
    pub fn keeps_ui_visible(&self, id: TimelineId) -> Result<bool, Error> {
        Ok(self.inner.lock().state(id)?.keep_ui_visible)
    }

    /// Samples the translation track at an arbitrary time (seconds).
    pub fn sample_translation(&self, id: TimelineId, time: f32) -> Result<Vector3, Error> {
        Ok(self
            .inner
            .lock()
            .state(id)?
            .timeline
            .translation()
            .get_point_at_time(time)
            .value)
    }

    /// Samples the rotation track at an arbitrary time (seconds).
    pub fn sample_rotation(&self, id: TimelineId, time: f32) -> Result<Angles, Error> {
        Ok(self
            .inner
            .lock()
            .state(id)?
            .timeline
            .rotation()
            .get_point_at_time(time)
            .angles)
    }

    // ########################################
    // Import / export

    /// Replaces the timeline content with a parsed file. The file is read and validated
    /// in full before anything touches the timeline.
    pub fn import_timeline<P: AsRef<Path>>(
        &self,
        id: TimelineId,
        owner: ClientHandle,
        path: P,
    ) -> Result<(), Error> {
        let text = std::fs::read_to_string(path)?;
        let file = TimelineFile::parse(&text)?;
        self.inner.lock().apply_import(id, owner, file)
    }

    /// Serializes the timeline (angles in degrees) and writes it to `path`.
    pub fn export_timeline<P: AsRef<Path>>(
        &self,
        id: TimelineId,
        owner: ClientHandle,
        path: P,
    ) -> Result<(), Error> {
        let file = self.inner.lock().export(id, owner)?;
        std::fs::write(path, file.to_text(true))?;
        Ok(())
    }
}
