//! HTTP signaling endpoint for WebRTC connections
//!
//! This crate drives the offer/answer exchange and the trickling of ICE
//! candidates for peer connections owned by a [`ConnectionManager`], over a
//! handful of plain HTTP routes. It is layered in front of an existing
//! request pipeline: anything outside its namespace is handed to the
//! handlers that were there before.
//!
//! # Protocol
//!
//! All routes live under `/<namespace>/<version>` (`/.wrtc/v1` by default):
//!
//! - **POST /connections** - Create a connection and its offer
//! - **POST /connections/{id}/remote-description** - Apply the client's answer
//! - **GET /connections/{id}/additional-candidates** - Long-poll for new ICE candidates
//! - **POST /connections/{id}/close** - Close a connection
//! - **OPTIONS** anything - CORS preflight
//!
//! Connection ids are 24 ASCII alphanumerics.
//!
//! ## Responses
//!
//! Creation answers with the connection snapshot:
//! ```json
//! {
//!   "userData": null,
//!   "id": "<id>",
//!   "iceConnectionState": "new",
//!   "peerConnection": {"connectionState": "new", "iceGatheringState": "gathering"},
//!   "remoteDescription": null,
//!   "localDescription": {"type": "offer", "sdp": "..."},
//!   "signalingState": "have-local-offer"
//! }
//! ```
//!
//! Applying an answer returns the connection's remote description, polling
//! returns a (possibly empty) array of candidates, and closing returns an
//! empty 200 whether or not the connection existed.
//!
//! # Example
//!
//! ```ignore
//! use std::rc::Rc;
//! use wrtc_http_signaling::{ConnectionRegistry, SignalingConfig, WasiPipeline, WasiTimer};
//! use wstd::http::{Body, Request, Response};
//!
//! thread_local! {
//!     static PIPELINE: Rc<WasiPipeline<ConnectionRegistry<MyEngine>>> = Rc::new(
//!         WasiPipeline::install(
//!             SignalingConfig::default(),
//!             ConnectionRegistry::new(MyEngine::default()),
//!             WasiTimer,
//!             vec![Box::new(MyExistingRoutes)],
//!         ),
//!     );
//! }
//!
//! #[wstd::http_server]
//! async fn main(request: Request<Body>) -> Result<Response<Body>, wstd::http::Error> {
//!     let pipeline = PIPELINE.with(Rc::clone);
//!     wrtc_http_signaling::handle_request(request, &pipeline).await
//! }
//! ```

#![forbid(unsafe_code)]

pub mod config;
pub mod connection;
pub mod cors;
pub mod dispatch;
pub mod error;
pub mod handler;
pub mod poller;
pub mod registry;
pub mod route;
pub mod server;

pub use config::{PollBudget, SignalingConfig};
pub use connection::{
    Connection, ConnectionDescription, ConnectionId, ConnectionManager, Created, IceCandidate,
    SessionDescription,
};
pub use cors::{CorsOrigin, CorsPolicy};
pub use dispatch::{Dispatcher, Reply, SessionRequest};
pub use error::{BodyError, ConnectionError, SignalingError};
pub use handler::{WasiPipeline, WasiTimer, handle_request};
pub use poller::{CandidatePoller, Timer};
pub use registry::{Authorization, ConnectionFactory, ConnectionRegistry};
pub use route::{Operation, Route, Router};
pub use server::{DecodeBody, Forward, Pipeline, RequestHandler};
