//! Error types for the HTTP signaling endpoint

use http::StatusCode;
use thiserror::Error;

/// Errors reported by the connection layer (registry, factory, negotiated connection)
#[derive(Error, Debug)]
pub enum ConnectionError {
    /// Creating the offer failed
    #[error("Failed to create offer: {0}")]
    Offer(String),

    /// The remote description was rejected
    #[error("Failed to apply answer: {0}")]
    Answer(String),

    /// The connection could not be set up
    #[error("Failed to set up connection: {0}")]
    Setup(String),

    /// A connection with this id is already registered
    #[error("Duplicate connection id: {0}")]
    DuplicateId(String),

    /// The connection is already closed
    #[error("Connection closed")]
    Closed,
}

/// The request body could not be read
#[derive(Error, Debug)]
#[error("Failed to read body: {0}")]
pub struct BodyError(pub String);

/// A connection id that is not 24 ASCII alphanumerics
#[derive(Error, Debug, PartialEq, Eq)]
#[error("Invalid connection id: {0:?}")]
pub struct InvalidConnectionId(pub String);

/// Errors that end a signaling request
///
/// Every variant maps to exactly one HTTP status, see [`SignalingError::status`].
#[derive(Error, Debug)]
pub enum SignalingError {
    /// No operation matches this path/method inside the namespace
    #[error("Not found")]
    NotFound,

    /// No live connection has this id
    #[error("Unknown connection")]
    UnknownConnection,

    /// The registry refused to create a connection
    #[error("Registry answered with status {0}")]
    Upstream(u16),

    /// The registry reported success without a connection
    #[error("Registry returned no connection")]
    MissingConnection,

    /// Creating the connection or its offer failed
    #[error("Failed to create connection: {0}")]
    Create(ConnectionError),

    /// The answer body is not a session description
    #[error("Invalid answer: {0}")]
    InvalidAnswer(serde_json::Error),

    /// The connection rejected the answer
    #[error("Answer rejected: {0}")]
    Answer(ConnectionError),

    /// Draining additional candidates failed
    #[error("Failed to read candidates: {0}")]
    Candidates(ConnectionError),

    /// The request body could not be read
    #[error(transparent)]
    Body(#[from] BodyError),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl SignalingError {
    /// The status this error terminates the response with
    pub fn status(&self) -> StatusCode {
        match self {
            Self::NotFound | Self::UnknownConnection => StatusCode::NOT_FOUND,
            Self::Upstream(status) => (100..600)
                .contains(status)
                .then(|| StatusCode::from_u16(*status).ok())
                .flatten()
                .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR),
            Self::MissingConnection | Self::Create(_) | Self::Json(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            Self::InvalidAnswer(_) | Self::Answer(_) | Self::Candidates(_) | Self::Body(_) => {
                StatusCode::BAD_REQUEST
            }
        }
    }
}
