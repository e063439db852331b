//! Mocked collaborators for tests.

pub mod camera_rig;

pub use camera_rig::MockCameraRig;
