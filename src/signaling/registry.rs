use std::collections::HashMap;
use std::sync::Arc;

use parking_lot::{RwLock, RwLockReadGuard, RwLockWriteGuard};
use tracing::debug;

use super::room::{Room, RoomId};

/// Process-wide map of live rooms.
#[derive(Clone, Debug)]
pub struct Registry {
  rooms: Arc<RwLock<Rooms>>,
}

#[derive(Debug)]
pub struct Rooms {
  rooms: HashMap<RoomId, Arc<RwLock<Room>>>,
  history_limit: usize,
}

impl Registry {
  pub fn new(history_limit: usize) -> Self {
    Self { rooms: Arc::new(RwLock::new(Rooms { rooms: Default::default(), history_limit })) }
  }

  pub fn get_or_create(&self, room_id: &RoomId) -> Arc<RwLock<Room>> {
    self.rooms.write().get_or_create(room_id)
  }

  pub fn get(&self, room_id: &RoomId) -> Option<Arc<RwLock<Room>>> {
    self.rooms.read().get(room_id)
  }

  pub fn remove(&self, room_id: &RoomId) -> bool {
    self.rooms.write().remove(room_id)
  }

  /// Removes the room only if nobody is in it. Used by deferred cleanups that may fire after
  /// someone came back.
  pub fn remove_if_empty(&self, room_id: &RoomId) -> bool {
    let mut rooms = self.rooms.write();
    match rooms.get(room_id) {
      Some(room) if room.read().is_empty() => rooms.remove(room_id),
      _ => false,
    }
  }

  pub fn count(&self) -> usize {
    self.rooms.read().rooms.len()
  }

  pub fn user_count(&self) -> usize {
    self.rooms.read().rooms.values().map(|room| room.read().len()).sum()
  }

  /// Drops every room for which `keep` returns false, returning how many went away.
  pub fn retain(&self, mut keep: impl FnMut(&Room) -> bool) -> usize {
    let mut rooms = self.rooms.write();
    let before = rooms.rooms.len();
    rooms.rooms.retain(|_, room| keep(&*room.read()));
    before - rooms.rooms.len()
  }

  pub(super) fn read(&self) -> RwLockReadGuard<'_, Rooms> {
    self.rooms.read()
  }

  pub(super) fn write(&self) -> RwLockWriteGuard<'_, Rooms> {
    self.rooms.write()
  }
}

impl Rooms {
  pub fn get(&self, room_id: &RoomId) -> Option<Arc<RwLock<Room>>> {
    self.rooms.get(room_id).cloned()
  }

  pub fn get_or_create(&mut self, room_id: &RoomId) -> Arc<RwLock<Room>> {
    let history_limit = self.history_limit;
    self
      .rooms
      .entry(room_id.clone())
      .or_insert_with(|| {
        debug!("create room room_id={room_id}");
        Arc::new(RwLock::new(Room::new(room_id.clone(), history_limit)))
      })
      .clone()
  }

  pub fn remove(&mut self, room_id: &RoomId) -> bool {
    self.rooms.remove(room_id).is_some()
  }
}
