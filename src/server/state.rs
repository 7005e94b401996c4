use std::time::Duration;

use crate::signaling::Signaling;

#[derive(Clone)]
pub(crate) struct ServerState {
  pub signaling: Signaling,
  pub heartbeat_interval: Duration,
}

impl ServerState {
  pub fn new(signaling: Signaling, heartbeat_interval: Duration) -> Self {
    Self { signaling, heartbeat_interval }
  }
}
