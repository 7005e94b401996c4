mod event;
mod handlers;
mod state;

use std::future::Future;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use axum::http::{HeaderValue, Method};
use axum::routing::get;
use axum::Router;
use tower_http::classify::{ServerErrorsAsFailures, SharedClassifier};
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::{DefaultOnResponse, TraceLayer};
use tower_http::LatencyUnit;
use tracing::{info, Level};

use crate::signaling::Signaling;

use self::state::ServerState;

pub use self::handlers::dispatch;

pub struct Server {
  addr: SocketAddr,
  signaling: Signaling,
  public_dir: PathBuf,
  allow_origin: Option<HeaderValue>,
  heartbeat_interval: Duration,
}

impl Server {
  pub fn new(addr: SocketAddr, signaling: Signaling) -> Self {
    Self {
      addr,
      signaling,
      public_dir: PathBuf::from("public"),
      allow_origin: None,
      heartbeat_interval: Duration::from_secs(10),
    }
  }

  /// Directory served for static assets. Its `index.html` answers every unknown path.
  pub fn public_dir(mut self, public_dir: impl Into<PathBuf>) -> Self {
    self.public_dir = public_dir.into();
    self
  }

  /// Restricts CORS to a single origin instead of any.
  pub fn allow_origin(mut self, allow_origin: Option<HeaderValue>) -> Self {
    self.allow_origin = allow_origin;
    self
  }

  pub fn heartbeat_interval(mut self, heartbeat_interval: Duration) -> Self {
    self.heartbeat_interval = heartbeat_interval;
    self
  }

  pub async fn listen(self, shutdown: impl Future<Output = ()>) -> Result<()> {
    let index = self.public_dir.join("index.html");
    let assets = ServeDir::new(&self.public_dir).fallback(ServeFile::new(index));

    let state = ServerState::new(self.signaling, self.heartbeat_interval);
    let app = Router::new()
      .route("/ws", get(handlers::socket))
      .route("/health", get(handlers::health))
      .fallback_service(assets)
      .layer(cors(self.allow_origin))
      .layer(trace())
      .with_state(state);

    info!("starting server: {}", self.addr);
    axum::Server::bind(&self.addr)
      .serve(app.into_make_service_with_connect_info::<SocketAddr>())
      .with_graceful_shutdown(shutdown)
      .await?;

    Ok(())
  }
}

fn cors(allow_origin: Option<HeaderValue>) -> CorsLayer {
  let cors = CorsLayer::new().allow_methods([Method::GET]);
  match allow_origin {
    Some(origin) => cors.allow_origin(origin),
    None => cors.allow_origin(Any),
  }
}

fn trace() -> TraceLayer<SharedClassifier<ServerErrorsAsFailures>> {
  TraceLayer::new_for_http()
    .on_response(DefaultOnResponse::new().level(Level::INFO).latency_unit(LatencyUnit::Micros))
}
