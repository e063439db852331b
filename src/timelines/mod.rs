//! Keyframe timelines: transitions, points, paths, tracks and the two-track timeline.

pub mod path;
pub mod point;
pub mod timeline;
pub mod track;
pub mod transition;

pub use path::KeyframePath;
pub use point::{
    unwrap_angle_near, wrap_angle, Angles, PathPoint, RotationPoint, TranslationPoint, Vector3,
    EPSILON,
};
pub use timeline::{Timeline, TimelineId};
pub use track::{PlaybackMode, TimelineTrack};
pub use transition::{ease, Interpolation, Transition};
