// Copyright 2025 the Fibermap Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Error types of the editing session and the notices they become.

use fibermap_model::{CableId, DraftError, ObjectId};
use fibermap_splice::SpliceError;

/// A failed call to the backend or the geocoder.
#[derive(Debug, thiserror::Error)]
pub enum BackendError {
    /// The request never produced a response.
    #[error("request failed: {0}")]
    Transport(String),
    /// The server answered with a non-success status.
    #[error("server responded {status}: {detail}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Server-provided reason, or the status text.
        detail: String,
    },
    /// The response body did not have the expected shape.
    #[error("unexpected response: {0}")]
    Decode(String),
}

impl From<reqwest::Error> for BackendError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            Self::Decode(err.to_string())
        } else {
            Self::Transport(err.to_string())
        }
    }
}

/// Why an editing operation did not happen.
///
/// None of these is fatal; each becomes a [`Notice`] and local state is left
/// as it was before the operation.
#[derive(Debug, thiserror::Error)]
pub enum EditorError {
    /// A form failed validation; nothing was sent.
    #[error(transparent)]
    Draft(#[from] DraftError),
    /// A splice was rejected; nothing was sent.
    #[error(transparent)]
    Splice(#[from] SpliceError),
    /// A collaborator call failed.
    #[error("network request failed: {0}")]
    NetworkFailure(#[from] BackendError),
    /// The object is not in the local mirror.
    #[error("unknown object {0}")]
    UnknownObject(ObjectId),
    /// The cable is not in the local mirror.
    #[error("unknown cable {0}")]
    UnknownCable(CableId),
    /// Splices start from the selected cable; this one is not selected.
    #[error("select cable {0} before splicing its fibers")]
    SourceNotSelected(CableId),
}

/// Severity of a [`Notice`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum NoticeLevel {
    /// A completed operation.
    Success,
    /// Something the operator should know about.
    Info,
    /// A rejected input; fix and retry.
    Warning,
    /// A failed collaborator call.
    Error,
}

/// A transient, dismissable message for the operator.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Notice {
    /// Severity.
    pub level: NoticeLevel,
    /// Text shown to the operator.
    pub message: String,
}

impl Notice {
    /// A success notice.
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    /// An informational notice.
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }
}

impl From<&EditorError> for Notice {
    fn from(err: &EditorError) -> Self {
        let level = match err {
            EditorError::Draft(_)
            | EditorError::Splice(_)
            | EditorError::SourceNotSelected(_) => NoticeLevel::Warning,
            EditorError::NetworkFailure(_)
            | EditorError::UnknownObject(_)
            | EditorError::UnknownCable(_) => NoticeLevel::Error,
        };
        Self {
            level,
            message: err.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fibermap_model::FiberEnd;

    #[test]
    fn validation_errors_warn_and_failures_error() {
        let draft = EditorError::from(DraftError::MissingName);
        assert_eq!(Notice::from(&draft).level, NoticeLevel::Warning);

        let splice = EditorError::from(SpliceError::SelfSpliceRejected(FiberEnd::new(
            CableId(1),
            0,
        )));
        let notice = Notice::from(&splice);
        assert_eq!(notice.level, NoticeLevel::Warning);
        assert_eq!(notice.message, splice.to_string());

        let net = EditorError::from(BackendError::Status {
            status: 404,
            detail: "Cable not found".into(),
        });
        let notice = Notice::from(&net);
        assert_eq!(notice.level, NoticeLevel::Error);
        assert!(notice.message.contains("404"));
        assert!(notice.message.contains("Cable not found"));
    }
}
