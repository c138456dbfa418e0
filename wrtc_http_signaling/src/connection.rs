//! Connection boundary: ids, wire descriptors and the traits the endpoint
//! drives the negotiation engine through.
//!
//! The negotiation engine itself lives outside this crate. It is reached only
//! through [`Connection`] and [`ConnectionManager`], and everything it exposes
//! on the wire goes through the explicit descriptor types below.

use crate::error::{ConnectionError, InvalidConnectionId};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::future::Future;
use std::str::FromStr;

/// Length of a connection id
pub const CONNECTION_ID_LEN: usize = 24;

/// Connection identifier: 24 ASCII alphanumerics
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct ConnectionId(String);

impl ConnectionId {
    /// Draw a fresh random id
    pub fn generate() -> Self {
        let mut id = uuid::Uuid::new_v4().simple().to_string();
        id.truncate(CONNECTION_ID_LEN);
        Self(id)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl FromStr for ConnectionId {
    type Err = InvalidConnectionId;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.len() == CONNECTION_ID_LEN && s.bytes().all(|b| b.is_ascii_alphanumeric()) {
            Ok(Self(s.to_string()))
        } else {
            Err(InvalidConnectionId(s.to_string()))
        }
    }
}

impl TryFrom<String> for ConnectionId {
    type Error = InvalidConnectionId;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<ConnectionId> for String {
    fn from(id: ConnectionId) -> Self {
        id.0
    }
}

impl fmt::Display for ConnectionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SdpType {
    Offer,
    Pranswer,
    Answer,
    Rollback,
}

/// One half of the offer/answer exchange
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionDescription {
    #[serde(rename = "type")]
    pub kind: SdpType,
    pub sdp: String,
}

/// A network candidate discovered after the offer was sent
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IceCandidate {
    pub candidate: String,
    #[serde(default)]
    pub sdp_mid: Option<String>,
    #[serde(default)]
    pub sdp_m_line_index: Option<u16>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub username_fragment: Option<String>,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IceConnectionState {
    #[default]
    New,
    Checking,
    Connected,
    Completed,
    Disconnected,
    Failed,
    Closed,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum SignalingState {
    #[default]
    Stable,
    HaveLocalOffer,
    HaveRemoteOffer,
    HaveLocalPranswer,
    HaveRemotePranswer,
    Closed,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PeerConnectionState {
    #[default]
    New,
    Connecting,
    Connected,
    Disconnected,
    Failed,
    Closed,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IceGatheringState {
    #[default]
    New,
    Gathering,
    Complete,
}

/// What a client gets to see of the underlying peer connection
#[derive(Debug, Default, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PeerConnectionSummary {
    pub connection_state: PeerConnectionState,
    pub ice_gathering_state: IceGatheringState,
}

/// Snapshot of a connection as sent to the client
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionDescription {
    pub id: ConnectionId,
    pub ice_connection_state: IceConnectionState,
    pub peer_connection: PeerConnectionSummary,
    pub remote_description: Option<SessionDescription>,
    pub local_description: Option<SessionDescription>,
    pub signaling_state: SignalingState,
}

/// A negotiated connection owned by the registry
///
/// Handles are cheap to clone and share state with the registry's copy.
pub trait Connection: Clone {
    fn id(&self) -> &ConnectionId;

    fn signaling_state(&self) -> SignalingState;

    /// Create the local offer and start gathering candidates
    fn do_offer(&self) -> impl Future<Output = Result<(), ConnectionError>>;

    /// Apply the remote peer's answer
    fn apply_answer(
        &self,
        answer: SessionDescription,
    ) -> impl Future<Output = Result<(), ConnectionError>>;

    fn describe(&self) -> ConnectionDescription;

    /// Take every candidate gathered since the last call
    ///
    /// Draining is destructive: a returned candidate is never returned again.
    fn take_additional_candidates(&self) -> Result<Vec<IceCandidate>, ConnectionError>;

    /// Close the connection. Closing twice is a no-op.
    fn close(&self);
}

/// Outcome of asking the registry for a new connection
#[derive(Debug)]
pub struct Created<C> {
    /// HTTP status chosen by the registry; anything but 200 is a refusal
    pub status: u16,
    pub connection: Option<C>,
    /// Data attached by the authorization step, echoed to the client
    pub user_data: serde_json::Value,
}

/// Registry of live connections
pub trait ConnectionManager {
    type Connection: Connection;

    /// Create a connection for a client presenting `authorization`
    fn create_connection(
        &self,
        authorization: Option<&str>,
    ) -> impl Future<Output = Result<Created<Self::Connection>, ConnectionError>>;

    /// Look a connection up. Unknown ids yield `None`.
    fn get_connection(&self, id: &ConnectionId) -> Option<Self::Connection>;

    /// Forget a connection, handing it back if it was registered
    fn remove_connection(&self, id: &ConnectionId) -> Option<Self::Connection>;
}
