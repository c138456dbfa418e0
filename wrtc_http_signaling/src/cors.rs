//! Cross-origin headers for the signaling namespace

use http::header::{
    ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS, ACCESS_CONTROL_ALLOW_ORIGIN,
    ACCESS_CONTROL_REQUEST_METHOD, ORIGIN,
};
use http::{HeaderMap, HeaderValue};
use serde::Deserialize;

/// Which origin is allowed to call the endpoint
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CorsOrigin {
    /// `*`
    #[default]
    Any,
    /// A single fixed origin
    Exact(String),
    /// Echo the request's `Origin` header
    Mirror,
}

/// Cross-origin policy applied to every in-namespace response
#[derive(Debug, Default, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct CorsPolicy {
    pub origin: CorsOrigin,
    /// Let browsers send an `Authorization` header
    pub allow_authorization: bool,
}

impl CorsPolicy {
    /// Headers for a response to a request carrying `request_headers`
    pub fn headers(&self, request_headers: &HeaderMap) -> HeaderMap {
        let any = HeaderValue::from_static("*");
        let origin = match &self.origin {
            CorsOrigin::Any => any,
            CorsOrigin::Exact(origin) => HeaderValue::from_str(origin).unwrap_or(any),
            CorsOrigin::Mirror => request_headers.get(ORIGIN).cloned().unwrap_or(any),
        };

        let mut headers = HeaderMap::with_capacity(4);
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin);
        headers.insert(ACCESS_CONTROL_REQUEST_METHOD, HeaderValue::from_static("*"));
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("OPTIONS, GET, POST"),
        );
        headers.insert(
            ACCESS_CONTROL_ALLOW_HEADERS,
            if self.allow_authorization {
                HeaderValue::from_static("X-Requested-With, Content-Type, Authorization")
            } else {
                HeaderValue::from_static("X-Requested-With, Content-Type")
            },
        );
        headers
    }
}
