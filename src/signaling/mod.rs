mod error;
mod event;
mod message;
mod peer;
mod reaper;
mod registry;
mod relay;
mod room;
mod session;

use std::sync::Arc;
use std::time::Duration;

use parking_lot::RwLock;
use tokio_util::sync::CancellationToken;
use tracing::debug;

pub use self::error::SignalingError;
pub use self::event::Event;
pub use self::message::{Message, Outgoing};
pub use self::peer::{PeerId, PeerSender};
pub use self::registry::Registry;
pub use self::room::{Participant, Room, RoomId};
pub use self::session::{Joined, Session};

#[derive(Clone, Copy, Debug)]
pub struct Config {
  /// How long an emptied room survives, waiting for someone to come back.
  pub grace_period: Duration,
  /// Period of the sweep over long idle rooms.
  pub reap_interval: Duration,
  /// Age past which an empty room is swept.
  pub idle_ttl: Duration,
  pub history_limit: usize,
  pub capacity: usize,
  /// Largest accepted text plus signal payload, in bytes.
  pub max_message_len: usize,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      grace_period: Duration::from_secs(30),
      reap_interval: Duration::from_secs(60),
      idle_ttl: Duration::from_secs(60 * 60),
      history_limit: 50,
      capacity: 2,
      max_message_len: 4 * 1024,
    }
  }
}

/// Room coordination service. Cheap to clone, all clones share the same rooms.
#[derive(Clone, Debug)]
pub struct Signaling {
  config: Config,
  registry: Registry,
  cancel: CancellationToken,
}

impl Default for Signaling {
  fn default() -> Self {
    Self::new(Config::default())
  }
}

impl Signaling {
  pub fn new(config: Config) -> Self {
    Self { config, registry: Registry::new(config.history_limit), cancel: CancellationToken::new() }
  }

  pub fn registry(&self) -> &Registry {
    &self.registry
  }

  /// Opens a session for a new connection. Events for it are pushed into `sender`.
  pub fn connect(&self, sender: PeerSender) -> Session {
    let session = Session::new(PeerId::new(), sender, self.clone());
    debug!("add peer peer={}", session.id());
    session
  }

  pub fn room(&self, room_id: &RoomId) -> Option<Arc<RwLock<Room>>> {
    self.registry.get(room_id)
  }

  pub fn room_count(&self) -> usize {
    self.registry.count()
  }

  pub fn user_count(&self) -> usize {
    self.registry.user_count()
  }

  /// Stops the sweep and every pending room cleanup.
  pub fn shutdown(&self) {
    debug!("shutdown");
    self.cancel.cancel();
  }
}
