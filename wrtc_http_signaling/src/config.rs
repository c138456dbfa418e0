//! Endpoint configuration

use crate::cors::CorsPolicy;
use serde::Deserialize;
use std::time::Duration;

/// Configuration of the signaling endpoint
///
/// Every field has a default, so a partial JSON document is enough:
///
/// ```
/// use wrtc_http_signaling::SignalingConfig;
///
/// let config = SignalingConfig::from_json(r#"{"poll": {"max_attempts": 8}}"#).unwrap();
/// assert_eq!(config.root(), "/.wrtc/v1");
/// assert_eq!(config.poll.max_attempts, 8);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct SignalingConfig {
    /// First path segment reserved for the endpoint
    pub namespace: String,
    /// Second path segment reserved for the endpoint
    pub version: String,
    pub cors: CorsPolicy,
    pub poll: PollBudget,
}

impl Default for SignalingConfig {
    fn default() -> Self {
        Self {
            namespace: ".wrtc".to_string(),
            version: "v1".to_string(),
            cors: CorsPolicy::default(),
            poll: PollBudget::default(),
        }
    }
}

impl SignalingConfig {
    /// Parse a configuration from JSON
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// The routing root, `/<namespace>/<version>`
    pub fn root(&self) -> String {
        format!("/{}/{}", self.namespace, self.version)
    }
}

/// How long a candidate poll may wait before answering with an empty list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PollBudget {
    pub interval_ms: u64,
    pub max_attempts: u32,
}

impl Default for PollBudget {
    fn default() -> Self {
        Self {
            interval_ms: 250,
            max_attempts: 40,
        }
    }
}

impl PollBudget {
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.interval_ms)
    }
}
