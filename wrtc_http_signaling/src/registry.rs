//! In-memory connection registry
//!
//! Holds live connections by id for the lifetime of the process. The actual
//! peer connections are produced by a [`ConnectionFactory`], which is also
//! where the `Authorization` header of a creation request gets checked.

use crate::connection::{Connection, ConnectionId, ConnectionManager, Created, SignalingState};
use crate::error::ConnectionError;
use std::collections::HashMap;
use std::collections::hash_map::Entry;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use tracing::{debug, info};

/// Result of checking a creation request's credentials
#[derive(Debug, Clone, PartialEq)]
pub enum Authorization {
    /// Go ahead; the value is echoed to the client as `userData`
    Granted(serde_json::Value),
    /// Refuse with this HTTP status
    Denied(u16),
}

/// Builds connections for the registry
pub trait ConnectionFactory {
    type Connection: Connection;

    /// Check the raw `Authorization` header. Everyone is let in by default.
    fn authorize(&self, _authorization: Option<&str>) -> impl Future<Output = Authorization> {
        async { Authorization::Granted(serde_json::Value::Null) }
    }

    /// Set up a connection under `id`
    fn connect(
        &self,
        id: ConnectionId,
    ) -> impl Future<Output = Result<Self::Connection, ConnectionError>>;
}

/// Live connections keyed by id; clones share the same map
pub struct ConnectionRegistry<F: ConnectionFactory> {
    factory: Arc<F>,
    connections: Arc<Mutex<HashMap<ConnectionId, F::Connection>>>,
}

impl<F: ConnectionFactory> Clone for ConnectionRegistry<F> {
    fn clone(&self) -> Self {
        Self {
            factory: Arc::clone(&self.factory),
            connections: Arc::clone(&self.connections),
        }
    }
}

impl<F: ConnectionFactory> ConnectionRegistry<F> {
    pub fn new(factory: F) -> Self {
        Self {
            factory: Arc::new(factory),
            connections: Arc::default(),
        }
    }

    fn connections(&self) -> MutexGuard<'_, HashMap<ConnectionId, F::Connection>> {
        self.connections
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
    }

    pub fn len(&self) -> usize {
        self.connections().len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections().is_empty()
    }

    fn unused_id(&self) -> ConnectionId {
        let connections = self.connections();
        loop {
            let id = ConnectionId::generate();
            if !connections.contains_key(&id) {
                return id;
            }
        }
    }
}

impl<F: ConnectionFactory> ConnectionManager for ConnectionRegistry<F> {
    type Connection = F::Connection;

    async fn create_connection(
        &self,
        authorization: Option<&str>,
    ) -> Result<Created<Self::Connection>, ConnectionError> {
        let user_data = match self.factory.authorize(authorization).await {
            Authorization::Granted(user_data) => user_data,
            Authorization::Denied(status) => {
                info!(status, "Connection refused by authorization");
                return Ok(Created {
                    status,
                    connection: None,
                    user_data: serde_json::Value::Null,
                });
            }
        };

        let id = self.unused_id();
        let connection = self.factory.connect(id.clone()).await?;

        let mut connections = self.connections();
        // connections whose transport closed on its own are never looked up again
        connections.retain(|_, registered| {
            registered.signaling_state() != SignalingState::Closed
        });
        match connections.entry(id) {
            Entry::Occupied(entry) => Err(ConnectionError::DuplicateId(entry.key().to_string())),
            Entry::Vacant(entry) => {
                debug!(connection_id = %entry.key(), "Registered connection");
                entry.insert(connection.clone());
                Ok(Created {
                    status: 200,
                    connection: Some(connection),
                    user_data,
                })
            }
        }
    }

    fn get_connection(&self, id: &ConnectionId) -> Option<Self::Connection> {
        let mut connections = self.connections();
        let connection = connections.get(id)?;
        if connection.signaling_state() == SignalingState::Closed {
            debug!(connection_id = %id, "Evicting closed connection");
            connections.remove(id);
            return None;
        }
        Some(connection.clone())
    }

    fn remove_connection(&self, id: &ConnectionId) -> Option<Self::Connection> {
        let connection = self.connections().remove(id)?;
        debug!(connection_id = %id, "Removed connection");
        Some(connection)
    }
}
