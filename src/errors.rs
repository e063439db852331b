use log::error;
use snafu::Snafu;

pub use crate::errors::Error::*;
use crate::timelines::TimelineId;

#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum Error {
    /// Timeline {id} not found.
    NotFound { id: TimelineId },
    /// Timeline {id} belongs to another client.
    OwnershipDenied { id: TimelineId },
    /// Invalid state: {reason}.
    InvalidState { reason: String },
    /// Point index {index} out of range (count: {count}).
    IndexOutOfRange { index: usize, count: usize },
    /// I/O failure: {info}.
    IoFailure { info: String },
    /// Timeline {id} has no keyframes.
    EmptyTimeline { id: TimelineId },
    /// Parse failure on line {line}: {info}.
    ParseFailure { line: usize, info: String },
}

impl Error {
    /// Shorthand for an [`Error::InvalidState`] with the given reason.
    pub(crate) fn invalid_state<S: Into<String>>(reason: S) -> Self {
        InvalidState {
            reason: reason.into(),
        }
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        error!("std::io error {:?}", error);
        Self::IoFailure {
            info: error.to_string(),
        }
    }
}
