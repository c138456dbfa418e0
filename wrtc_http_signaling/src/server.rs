//! Request pipeline: namespace routing in front of the handlers an
//! application already had
//!
//! [`Pipeline::install`] takes over the listener's prior handlers. Requests
//! outside the signaling namespace are handed to them, in registration
//! order, exactly as they came in. Requests inside the namespace never reach
//! them.

use crate::config::SignalingConfig;
use crate::connection::ConnectionManager;
use crate::cors::CorsPolicy;
use crate::dispatch::{Dispatcher, SessionRequest};
use crate::error::{BodyError, SignalingError};
use crate::poller::{CandidatePoller, Timer};
use crate::route::{Route, Router};
use async_trait::async_trait;
use http::header::{AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderMap, HeaderValue, Method, Request, Response, StatusCode};
use std::future::Future;
use tracing::{debug, trace};

/// Turns a request body into text
pub trait DecodeBody {
    fn decode(self) -> impl Future<Output = Result<String, BodyError>>;
}

impl DecodeBody for String {
    async fn decode(self) -> Result<String, BodyError> {
        Ok(self)
    }
}

/// What a prior handler did with a request
pub enum Forward<B, R> {
    Handled(Response<R>),
    /// Not for this handler; the request is handed back untouched
    Declined(Request<B>),
}

/// A handler that served the listener before the signaling endpoint was installed
#[async_trait(?Send)]
pub trait RequestHandler<B, R> {
    async fn handle(&self, request: Request<B>) -> Forward<B, R>;
}

/// The single entry point of the listener once signaling is installed
pub struct Pipeline<M, T, B, R> {
    router: Router,
    cors: CorsPolicy,
    dispatcher: Dispatcher<M, T>,
    prior: Vec<Box<dyn RequestHandler<B, R>>>,
}

impl<M, T, B, R> Pipeline<M, T, B, R>
where
    M: ConnectionManager,
    T: Timer,
    B: DecodeBody,
    R: From<String>,
{
    /// Compose the endpoint with the handlers previously registered on the
    /// listener. Done once, at startup.
    pub fn install(
        config: SignalingConfig,
        manager: M,
        timer: T,
        prior: Vec<Box<dyn RequestHandler<B, R>>>,
    ) -> Self {
        debug!(root = %config.root(), prior = prior.len(), "Installing signaling endpoint");
        Self {
            router: Router::new(config.root()),
            cors: config.cors,
            dispatcher: Dispatcher::new(manager, CandidatePoller::new(timer, config.poll)),
            prior,
        }
    }

    /// Produce the one response for `request`
    pub async fn handle(&self, request: Request<B>) -> Response<R> {
        let operation = match self.router.classify(request.method(), request.uri().path()) {
            Route::Unmatched => return self.forward(request).await,
            Route::Namespace(operation) => operation,
        };

        let mut headers = self.cors.headers(request.headers());
        if *request.method() == Method::OPTIONS {
            return respond(StatusCode::OK, headers, None);
        }

        let (parts, body) = request.into_parts();
        let body = match body.decode().await {
            Ok(body) => body,
            Err(error) => {
                let error = SignalingError::from(error);
                debug!(%error, "Rejecting undecodable body");
                return respond(error.status(), headers, None);
            }
        };
        let session_request = SessionRequest {
            authorization: parts
                .headers
                .get(AUTHORIZATION)
                .and_then(|value| value.to_str().ok())
                .map(str::to_owned),
            body,
        };

        let reply = self.dispatcher.dispatch(operation, &session_request).await;
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
        respond(reply.status, headers, reply.body)
    }

    async fn forward(&self, mut request: Request<B>) -> Response<R> {
        trace!(path = request.uri().path(), "Forwarding to prior handlers");
        for handler in &self.prior {
            match handler.handle(request).await {
                Forward::Handled(response) => return response,
                Forward::Declined(unchanged) => request = unchanged,
            }
        }
        respond(StatusCode::NOT_FOUND, HeaderMap::new(), None)
    }
}

fn respond<R: From<String>>(
    status: StatusCode,
    headers: HeaderMap,
    body: Option<String>,
) -> Response<R> {
    let mut response = Response::new(R::from(body.unwrap_or_default()));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    response
}
