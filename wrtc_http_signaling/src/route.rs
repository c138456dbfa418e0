//! Path matching for the signaling namespace

use crate::connection::ConnectionId;
use http::Method;
use regex::Regex;
use std::sync::LazyLock;

static ID_TOKEN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[0-9a-zA-Z]{24}").unwrap());

/// Operation selected for an in-namespace request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// `POST <root>/connections`
    CreateSession,
    /// `POST <root>/connections/{id}/remote-description`
    ApplyAnswer(ConnectionId),
    /// `GET <root>/connections/{id}/additional-candidates`
    PollCandidates(ConnectionId),
    /// `POST <root>/connections/{id}/close`
    CloseSession(ConnectionId),
    /// Inside the namespace, but nothing matches
    NotFound,
}

/// Classification of an inbound request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Route {
    /// Outside the namespace; belongs to whatever served the listener before
    Unmatched,
    Namespace(Operation),
}

/// Classifies `(method, path)` pairs against the routing root
#[derive(Debug, Clone)]
pub struct Router {
    root: String,
}

impl Router {
    /// `root` is the `/<namespace>/<version>` prefix
    pub fn new(root: impl Into<String>) -> Self {
        Self { root: root.into() }
    }

    pub fn classify(&self, method: &Method, path: &str) -> Route {
        let Some(rest) = path.strip_prefix(self.root.as_str()) else {
            return Route::Unmatched;
        };
        // "/.wrtc/v10" must not fall into "/.wrtc/v1"
        if !rest.is_empty() && !rest.starts_with('/') {
            return Route::Unmatched;
        }

        let segments: Vec<&str> = rest.split('/').skip(1).collect();
        let operation = match (method, segments.as_slice()) {
            (&Method::POST, ["connections"]) => Operation::CreateSession,
            (&Method::POST, ["connections", id, "remote-description"]) => {
                with_id(rest, id, Operation::ApplyAnswer)
            }
            (&Method::GET, ["connections", id, "additional-candidates"]) => {
                with_id(rest, id, Operation::PollCandidates)
            }
            (&Method::POST, ["connections", id, "close"]) => {
                with_id(rest, id, Operation::CloseSession)
            }
            _ => Operation::NotFound,
        };
        Route::Namespace(operation)
    }
}

/// Build an id-carrying operation when the path holds exactly one id token
/// and `segment` is that token
fn with_id(path: &str, segment: &str, operation: fn(ConnectionId) -> Operation) -> Operation {
    let tokens = id_tokens(path);
    match tokens.as_slice() {
        [token] if *token == segment => segment
            .parse()
            .map(operation)
            .unwrap_or(Operation::NotFound),
        _ => Operation::NotFound,
    }
}

/// Non-overlapping runs of 24 alphanumerics, scanning left to right
fn id_tokens(path: &str) -> Vec<&str> {
    ID_TOKEN.find_iter(path).map(|m| m.as_str()).collect()
}
