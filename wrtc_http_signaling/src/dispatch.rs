//! Executes signaling operations against the connection registry

use crate::connection::{
    Connection, ConnectionDescription, ConnectionId, ConnectionManager, SessionDescription,
};
use crate::error::SignalingError;
use crate::poller::{CandidatePoller, Timer};
use crate::route::Operation;
use http::StatusCode;
use serde::Serialize;
use tracing::{debug, info, warn};

/// Terminal outcome of one operation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub status: StatusCode,
    /// JSON document, or `None` for an empty body
    pub body: Option<String>,
}

impl Reply {
    pub fn empty(status: StatusCode) -> Self {
        Self { status, body: None }
    }

    pub fn json<T: Serialize + ?Sized>(value: &T) -> Result<Self, SignalingError> {
        Ok(Self {
            status: StatusCode::OK,
            body: Some(serde_json::to_string(value)?),
        })
    }
}

/// Body of a successful creation
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct SessionCreated {
    user_data: serde_json::Value,
    #[serde(flatten)]
    connection: ConnectionDescription,
}

/// The parts of a request an operation may look at
#[derive(Debug, Default, Clone)]
pub struct SessionRequest {
    /// Raw `Authorization` header
    pub authorization: Option<String>,
    /// Decoded request body
    pub body: String,
}

/// Runs exactly one operation per request and turns its outcome into a [`Reply`]
#[derive(Debug, Clone)]
pub struct Dispatcher<M, T> {
    manager: M,
    poller: CandidatePoller<T>,
}

impl<M: ConnectionManager, T: Timer> Dispatcher<M, T> {
    pub fn new(manager: M, poller: CandidatePoller<T>) -> Self {
        Self { manager, poller }
    }

    /// Failures never escape: each one ends as the status it maps to
    pub async fn dispatch(&self, operation: Operation, request: &SessionRequest) -> Reply {
        let result = match operation {
            Operation::CreateSession => {
                self.create_session(request.authorization.as_deref()).await
            }
            Operation::ApplyAnswer(id) => self.apply_answer(&id, &request.body).await,
            Operation::PollCandidates(id) => self.poll_candidates(&id).await,
            Operation::CloseSession(id) => Ok(self.close_session(&id)),
            Operation::NotFound => Err(SignalingError::NotFound),
        };

        result.unwrap_or_else(|error| {
            let status = error.status();
            if status.is_server_error() {
                warn!(%status, %error, "Signaling request failed");
            } else {
                debug!(%status, %error, "Signaling request rejected");
            }
            Reply::empty(status)
        })
    }

    async fn create_session(&self, authorization: Option<&str>) -> Result<Reply, SignalingError> {
        let created = self
            .manager
            .create_connection(authorization)
            .await
            .map_err(SignalingError::Create)?;

        if created.status != 200 {
            return Err(SignalingError::Upstream(created.status));
        }
        let connection = created.connection.ok_or(SignalingError::MissingConnection)?;

        connection.do_offer().await.map_err(SignalingError::Create)?;
        info!(connection_id = %connection.id(), "Connection created");

        Reply::json(&SessionCreated {
            user_data: created.user_data,
            connection: connection.describe(),
        })
    }

    async fn apply_answer(&self, id: &ConnectionId, body: &str) -> Result<Reply, SignalingError> {
        let connection = self
            .manager
            .get_connection(id)
            .ok_or(SignalingError::UnknownConnection)?;

        let answer: SessionDescription =
            serde_json::from_str(body).map_err(SignalingError::InvalidAnswer)?;
        connection
            .apply_answer(answer)
            .await
            .map_err(SignalingError::Answer)?;
        debug!(connection_id = %id, "Remote description applied");

        Reply::json(&connection.describe().remote_description)
    }

    async fn poll_candidates(&self, id: &ConnectionId) -> Result<Reply, SignalingError> {
        if self.manager.get_connection(id).is_none() {
            return Err(SignalingError::UnknownConnection);
        }

        let candidates = self
            .poller
            .poll(&self.manager, id)
            .await
            .map_err(SignalingError::Candidates)?;

        Reply::json(&candidates)
    }

    fn close_session(&self, id: &ConnectionId) -> Reply {
        match self.manager.remove_connection(id) {
            Some(connection) => {
                connection.close();
                info!(connection_id = %id, "Connection closed");
            }
            None => debug!(connection_id = %id, "Close for unknown connection"),
        }
        Reply::empty(StatusCode::OK)
    }
}
