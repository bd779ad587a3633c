//! Error types surfaced by the stores and routines.
//!
//! # Design
//! - Keep error messages constant while carrying context fields for debugging.
//! - Every error is caught at the operation boundary and turned into store state;
//!   nothing here is propagated to UI callers as a panic or re-thrown failure.
//! - Absence (no cookie, no token) is never an error.

use thiserror::Error;

/// Failures raised by a persistence adapter.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// The backing medium is not reachable (no document, storage disabled).
    #[error("persistence medium unavailable")]
    Unavailable {
        /// Medium identifier (`cookie`, `local_storage`).
        medium: &'static str,
    },
    /// Writing a value failed.
    #[error("persistence write failed")]
    Write {
        /// Key being written.
        key: String,
        /// Adapter-specific detail.
        detail: String,
    },
}

/// Failures raised while reflecting state onto the host document.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum HostError {
    /// A DOM operation failed.
    #[error("document operation failed")]
    Dom {
        /// Operation identifier.
        operation: &'static str,
        /// Browser-provided detail.
        detail: String,
    },
}

/// Failures raised while decoding a persisted session token.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The token did not contain a payload segment.
    #[error("invalid token: missing payload segment")]
    MissingPayload,
    /// The payload segment was not valid base64url.
    #[error("invalid token: payload is not base64url")]
    Base64 {
        /// Decoder detail.
        detail: String,
    },
    /// The payload did not deserialize into the expected claim set.
    #[error("invalid token: payload is not a valid claim set")]
    Json {
        /// Deserializer detail.
        detail: String,
    },
}

/// Failures raised by request routines.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum FetchError {
    /// The server answered with a non-success status.
    #[error("request failed with status {status}")]
    Status {
        /// HTTP status code.
        status: u16,
    },
    /// The request could not be sent or the response could not be read.
    #[error("{message}")]
    Transport {
        /// Transport-provided message.
        message: String,
    },
    /// The response body did not match the expected shape.
    #[error("{message}")]
    Decode {
        /// Deserializer message.
        message: String,
    },
    /// The transport failed with a value that carries no usable message.
    #[error("unknown request error")]
    Unknown,
}

impl FetchError {
    pub(crate) fn transport(message: impl Into<String>) -> Self {
        let message = message.into();
        if message.trim().is_empty() {
            Self::Unknown
        } else {
            Self::Transport { message }
        }
    }
}

/// Failures raised while loading client configuration.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ConfigError {
    /// The environment name was not recognised.
    #[error("invalid environment name")]
    InvalidEnvironment {
        /// Raw value supplied by the caller.
        value: String,
    },
    /// The API base URL was empty or lacked a scheme.
    #[error("invalid api base url")]
    InvalidBaseUrl {
        /// Raw value supplied by the caller.
        value: String,
    },
}
