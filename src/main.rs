use std::net::{IpAddr, SocketAddr};
use std::path::PathBuf;
use std::time::Duration;

use anyhow::Result;
use axum::http::HeaderValue;
use clap::Parser;
use morse_signal::{Config, Server, Signaling};
use tracing::{error, info, Level};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
  /// Server port
  #[arg(short, long, env, default_value_t = 3000, value_parser = clap::value_parser!(u16).range(1025..))]
  port: u16,

  /// Address to bind
  #[arg(long, env, default_value = "0.0.0.0")]
  host: IpAddr,

  /// Directory of static assets
  #[arg(long, env, default_value = "public")]
  public_dir: PathBuf,

  /// Only origin allowed by CORS, any if unset
  #[arg(long, env)]
  allow_origin: Option<HeaderValue>,

  /// Seconds an emptied room is kept for a returning user
  #[arg(long, env, default_value_t = 30)]
  grace_period: u64,

  /// Seconds between sweeps of idle rooms
  #[arg(long, env, default_value_t = 60)]
  reap_interval: u64,

  /// Seconds after which an empty room is swept
  #[arg(long, env, default_value_t = 3600)]
  idle_ttl: u64,

  /// Seconds between websocket pings
  #[arg(long, env, default_value_t = 10)]
  heartbeat_interval: u64,
}

impl Args {
  fn config(&self) -> Config {
    Config {
      grace_period: Duration::from_secs(self.grace_period),
      reap_interval: Duration::from_secs(self.reap_interval),
      idle_ttl: Duration::from_secs(self.idle_ttl),
      ..Default::default()
    }
  }
}

#[tokio::main]
async fn main() -> Result<()> {
  let filter = |level: Level| -> Result<EnvFilter> {
    Ok(
      EnvFilter::builder()
        .with_default_directive(level.into())
        .from_env_lossy()
        .add_directive("hyper=off".parse()?)
        .add_directive("tungstenite=off".parse()?),
    )
  };

  if cfg!(not(debug_assertions)) {
    tracing_subscriber::fmt().with_env_filter(filter(Level::INFO)?).init();
  } else {
    tracing_subscriber::fmt().with_env_filter(filter(Level::DEBUG)?).without_time().init();
  }

  let args = Args::parse();
  let signaling = Signaling::new(args.config());
  let reaper = tokio::spawn(signaling.clone().run());

  let server = Server::new(SocketAddr::new(args.host, args.port), signaling.clone())
    .public_dir(args.public_dir)
    .allow_origin(args.allow_origin)
    .heartbeat_interval(Duration::from_secs(args.heartbeat_interval));
  server.listen(shutdown_signal()).await?;

  signaling.shutdown();
  reaper.await?
}

async fn shutdown_signal() {
  if let Err(e) = tokio::signal::ctrl_c().await {
    error!("cannot listen for shutdown: {e}");
    std::future::pending::<()>().await;
  }
  info!("shutting down");
}
