use std::fmt;

use serde::{Deserialize, Serialize};
use tokio::sync::mpsc::UnboundedSender;
use ulid::Ulid;

use super::event::Event;

/// Outbound half of a connection, as seen by the core.
pub type PeerSender = UnboundedSender<Event>;

#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq, Hash)]
pub struct PeerId(Ulid);

impl PeerId {
  pub(super) fn new() -> Self {
    Self(Ulid::new())
  }

  /// Display name used when a client joins without one, e.g. `NODE_7K2Q`.
  ///
  /// Derived from the random tail of the id so that peers connecting in the same millisecond
  /// still get distinct names.
  pub fn fallback_username(&self) -> String {
    let id = self.0.to_string();
    format!("NODE_{}", &id[id.len() - 4..])
  }
}

impl fmt::Display for PeerId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0.to_string().to_lowercase())
  }
}
