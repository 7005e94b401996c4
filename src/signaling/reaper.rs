use anyhow::Result;
use futures_util::StreamExt;
use tokio_stream::wrappers::IntervalStream;
use tracing::{debug, info};

use super::room::RoomId;
use super::Signaling;

impl Signaling {
  /// Periodically sweeps empty rooms older than the idle TTL, until shutdown.
  pub async fn run(self) -> Result<()> {
    let mut stream = IntervalStream::new(tokio::time::interval(self.config.reap_interval));

    loop {
      tokio::select! {
        _ = self.cancel.cancelled() => break,
        tick = stream.next() => {
          if tick.is_none() {
            break;
          }
          self.reap();
        }
      }
    }

    Ok(())
  }

  /// Removes every empty room created more than the idle TTL ago. Returns how many were removed.
  pub fn reap(&self) -> usize {
    debug!("garbage collect");

    let idle_ttl = self.config.idle_ttl;
    let removed = self.registry.retain(|room| !(room.is_empty() && room.created_at.elapsed() > idle_ttl));
    if removed > 0 {
      info!("removed {removed} idle rooms");
    }
    removed
  }

  /// Removes `room_id` after the grace period if it is still empty by then.
  ///
  /// Outside of a runtime nothing is scheduled and the sweep is left to collect the room.
  pub(super) fn schedule_removal(&self, room_id: RoomId) {
    let Ok(handle) = tokio::runtime::Handle::try_current() else {
      debug!("no runtime, skip removal room_id={room_id}");
      return;
    };
    debug!("schedule removal room_id={room_id}");

    let registry = self.registry.clone();
    let grace_period = self.config.grace_period;
    let cancel = self.cancel.clone();
    handle.spawn(async move {
      tokio::select! {
        _ = cancel.cancelled() => {},
        _ = tokio::time::sleep(grace_period) => {
          if registry.remove_if_empty(&room_id) {
            info!("removed empty room room_id={room_id}");
          }
        }
      }
    });
  }
}
