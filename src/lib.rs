#![doc(html_root_url = "https://docs.rs/campath/0.1.0")]

//! <h1 align="center">CAMPATH - Camera-Path Timeline Engine</h1>
//! <div style="text-align:center;font-style:italic;">Campath is a keyframe-based camera-path recording and playback engine - written in Rust.</div>
//! <br/>
//!
//! # Features
//!
//! **Campath** lets multiple client plugins author, record and play back camera flight
//! paths against a single shared camera:
//!
//! - Author keyframe [`Timeline`](timelines::Timeline)s with independent translation and
//!   rotation tracks, each keyframe carrying its own interpolation mode and easing flags
//! - Sample tracks with step, linear or Catmull-Rom-tangent cubic Hermite interpolation,
//!   seam-aware for angles (the path always takes the short way around ±π)
//! - Record the live camera into a timeline at a fixed sampling cadence, play it back at
//!   a chosen speed or stretched into a fixed wall-clock duration
//! - Share the engine safely: the [`TimelineManager`](manager::TimelineManager) checks
//!   client ownership on every mutation and guarantees at most one timeline records or
//!   plays at a time
//! - Persist timelines to a simple INI-style text format (angles in degrees on disk)
//!
//! The engine is synchronous and tick-driven: the host calls
//! [`TimelineManager::update`](manager::TimelineManager::update) once per frame with the
//! elapsed real time, and the engine writes poses through the [`CameraRig`](camera::CameraRig)
//! trait the host implements.
//!
//! # Getting Started
//!
//! ```rust
//! use campath::manager::{ClientHandle, PlaybackOptions, PointSource, TimelineManager};
//! use campath::timelines::{Transition, Vector3};
//! # use campath::camera::CameraRig;
//! # use campath::timelines::Angles;
//! # #[derive(Default)]
//! # struct HostRig { position: Vector3, orientation: Angles, capture: bool }
//! # impl CameraRig for HostRig {
//! #     fn get_position(&self) -> Vector3 { self.position }
//! #     fn get_orientation(&self) -> Angles { self.orientation }
//! #     fn set_position(&mut self, position: Vector3) { self.position = position; }
//! #     fn set_orientation(&mut self, angles: Angles) { self.orientation = angles; }
//! #     fn is_in_capture_mode(&self) -> bool { self.capture }
//! #     fn enter_capture_mode(&mut self) { self.capture = true; }
//! #     fn exit_capture_mode(&mut self) { self.capture = false; }
//! # }
//!
//! let manager = TimelineManager::new(Box::new(HostRig::default()));
//!
//! // Register a timeline and author a straight 10-second path.
//! let owner = ClientHandle(1);
//! let id = manager.register_timeline(owner, "flyby");
//! manager.add_translation_point(
//!     id,
//!     owner,
//!     PointSource::Absolute(Vector3::new(0.0, 0.0, 0.0)),
//!     Transition::new(0.0),
//! )?;
//! manager.add_translation_point(
//!     id,
//!     owner,
//!     PointSource::Absolute(Vector3::new(100.0, 0.0, 0.0)),
//!     Transition::new(10.0),
//! )?;
//!
//! // Play it back: the host then calls `manager.update(dt)` every frame.
//! manager.start_playback(id, owner, PlaybackOptions::default())?;
//! # Ok::<(), campath::errors::Error>(())
//! ```
//!
//! # Feature flags
//!
//! - **serde** -- Enables serialize/deserialize capabilities for the timeline entities.
//! - **mocks** -- Provides a mocked [`CameraRig`](camera::CameraRig) (useful for tests mostly).

#[cfg(test)]
extern crate self as campath;

pub mod camera;
pub mod errors;
pub mod format;
pub mod manager;
#[cfg(any(test, feature = "mocks"))]
pub mod mocks;
pub mod timelines;
