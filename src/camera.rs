use crate::timelines::{Angles, Vector3};

/// The external camera sink the engine records from and plays back into.
///
/// The registry samples the live pose through this trait during recording, writes the
/// interpolated pose through it during playback, and gates recording/playback on the
/// capture-mode flag. The engine never reaches into camera internals beyond this boundary.
pub trait CameraRig: Send {
    /// Returns the current camera position.
    fn get_position(&self) -> Vector3;

    /// Returns the current camera orientation (pitch, yaw in radians).
    fn get_orientation(&self) -> Angles;

    /// Moves the camera to the given position.
    fn set_position(&mut self, position: Vector3);

    /// Orients the camera to the given pitch/yaw.
    fn set_orientation(&mut self, angles: Angles);

    /// Indicates if the free/capture camera mode is currently active.
    fn is_in_capture_mode(&self) -> bool;

    /// Switches the camera into capture mode (used when playback starts).
    fn enter_capture_mode(&mut self);

    /// Leaves capture mode (used when playback stops).
    fn exit_capture_mode(&mut self);
}
