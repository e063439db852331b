use std::sync::Arc;

use parking_lot::RwLock;

use crate::camera::CameraRig;
use crate::timelines::{Angles, Vector3};

#[derive(Default, Debug)]
struct MockCameraState {
    position: Vector3,
    orientation: Angles,
    capture_mode: bool,
    enter_calls: usize,
    exit_calls: usize,
    positions_written: Vec<Vector3>,
    orientations_written: Vec<Angles>,
}

/// Mock [`CameraRig`] for testing purposes.
///
/// Clones share the same inner state, so a test can keep a handle while the manager owns
/// the boxed rig, drive the "live" pose from outside and inspect everything the engine
/// wrote back.
#[derive(Default, Clone, Debug)]
pub struct MockCameraRig {
    inner: Arc<RwLock<MockCameraState>>,
}

impl MockCameraRig {
    pub fn new() -> Self {
        Self::default()
    }

    /// Moves the mocked "live" camera, as the player would.
    pub fn place(&self, position: Vector3, orientation: Angles) {
        let mut state = self.inner.write();
        state.position = position;
        state.orientation = orientation;
    }

    /// Forces the capture-mode flag, simulating an external mode change.
    pub fn force_capture_mode(&self, active: bool) {
        self.inner.write().capture_mode = active;
    }

    /// Every position the engine wrote during playback, in order.
    pub fn positions_written(&self) -> Vec<Vector3> {
        self.inner.read().positions_written.clone()
    }

    /// Every orientation the engine wrote during playback, in order.
    pub fn orientations_written(&self) -> Vec<Angles> {
        self.inner.read().orientations_written.clone()
    }

    pub fn enter_calls(&self) -> usize {
        self.inner.read().enter_calls
    }

    pub fn exit_calls(&self) -> usize {
        self.inner.read().exit_calls
    }
}

impl CameraRig for MockCameraRig {
    fn get_position(&self) -> Vector3 {
        self.inner.read().position
    }

    fn get_orientation(&self) -> Angles {
        self.inner.read().orientation
    }

    fn set_position(&mut self, position: Vector3) {
        let mut state = self.inner.write();
        state.position = position;
        state.positions_written.push(position);
    }

    fn set_orientation(&mut self, angles: Angles) {
        let mut state = self.inner.write();
        state.orientation = angles;
        state.orientations_written.push(angles);
    }

    fn is_in_capture_mode(&self) -> bool {
        self.inner.read().capture_mode
    }

    fn enter_capture_mode(&mut self) {
        let mut state = self.inner.write();
        state.capture_mode = true;
        state.enter_calls += 1;
    }

    fn exit_capture_mode(&mut self) {
        let mut state = self.inner.write();
        state.capture_mode = false;
        state.exit_calls += 1;
    }
}
