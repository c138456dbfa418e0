//! `wstd` glue: runs the signaling pipeline inside a WASI HTTP component

use crate::connection::ConnectionManager;
use crate::error::BodyError;
use crate::poller::Timer;
use crate::server::{DecodeBody, Pipeline};
use std::time::Duration;
use wstd::http::{Body, Request, Response};

/// Pipeline over `wstd` request and response bodies
pub type WasiPipeline<M> = Pipeline<M, WasiTimer, Body, Body>;

/// Interval sleeps on the WASI reactor
#[derive(Debug, Default, Clone, Copy)]
pub struct WasiTimer;

impl Timer for WasiTimer {
    async fn sleep(&self, duration: Duration) {
        wstd::task::sleep(wstd::time::Duration::from(duration)).await;
    }
}

impl DecodeBody for Body {
    async fn decode(mut self) -> Result<String, BodyError> {
        self.str_contents()
            .await
            .map(str::to_owned)
            .map_err(|e| BodyError(format!("{:?}", e)))
    }
}

/// Handle an HTTP request - main entry point
///
/// Call this from the component's `#[wstd::http_server]` function.
pub async fn handle_request<M: ConnectionManager>(
    request: Request<Body>,
    pipeline: &WasiPipeline<M>,
) -> Result<Response<Body>, wstd::http::Error> {
    Ok(pipeline.handle(request).await)
}
