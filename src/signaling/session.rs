use tracing::{debug, info};

use super::error::SignalingError;
use super::event::Event;
use super::message::{now_millis, Message, Outgoing};
use super::peer::{PeerId, PeerSender};
use super::registry::Rooms;
use super::room::{Participant, RoomId};
use super::Signaling;

/// What a successful join hands back to the joiner.
#[derive(Clone, Debug, PartialEq)]
pub struct Joined {
  pub room_id: RoomId,
  pub users: Vec<String>,
  pub messages: Vec<Message>,
}

impl From<Joined> for Event {
  fn from(joined: Joined) -> Self {
    Event::RoomJoined { room_id: joined.room_id, users: joined.users, messages: joined.messages }
  }
}

/// Membership state of one connection. Unbound until it joins a room, bound to at most one room
/// at a time.
#[derive(Debug)]
pub struct Session {
  id: PeerId,
  sender: PeerSender,
  room: Option<RoomId>,
  signaling: Signaling,
}

impl Session {
  pub(super) fn new(id: PeerId, sender: PeerSender, signaling: Signaling) -> Self {
    Self { id, sender, room: None, signaling }
  }

  pub fn id(&self) -> PeerId {
    self.id
  }

  pub fn room(&self) -> Option<&RoomId> {
    self.room.as_ref()
  }

  /// Joins `room_id`, creating it if needed, and leaves the current room first.
  ///
  /// A full room is rejected before anything else happens, so the connection keeps its current
  /// membership when the join fails. The username is kept as given unless it is blank.
  pub fn join(&mut self, room_id: RoomId, username: &str) -> Result<Joined, SignalingError> {
    if room_id.is_blank() {
      return Err(SignalingError::InvalidRoomId(room_id));
    }

    let username = match username.trim() {
      "" => self.id.fallback_username(),
      _ => username.to_owned(),
    };

    let mut emptied = None;
    let joined = {
      let mut rooms = self.signaling.registry.write();
      let room = rooms.get_or_create(&room_id);

      if self.room.as_ref() == Some(&room_id) {
        debug!("already in room room_id={room_id}");
        let room = room.read();
        return Ok(Joined {
          room_id,
          users: room.usernames(),
          messages: room.history().cloned().collect(),
        });
      }

      if room.read().len() >= self.signaling.config.capacity {
        info!("room full room_id={room_id}");
        return Err(SignalingError::RoomFull(room_id));
      }

      if let Some(previous) = self.room.take() {
        if leave_room(&rooms, self.id, &previous) {
          emptied = Some(previous);
        }
      }

      let mut room = room.write();
      let participant =
        Participant { username: username.clone(), joined_at: now_millis(), sender: self.sender.clone() };
      room.insert(self.id, participant);
      for other in room.others(self.id) {
        notify(&other.sender, Event::UserJoined { username: username.clone() });
      }

      self.room = Some(room_id.clone());
      info!("{username} joined room room_id={room_id}");
      Joined { room_id, users: room.usernames(), messages: room.history().cloned().collect() }
    };

    if let Some(previous) = emptied {
      self.signaling.schedule_removal(previous);
    }

    Ok(joined)
  }

  /// Leaves the current room, if any. An emptied room is removed after the grace period unless
  /// someone rejoins it in the meantime.
  pub fn leave(&mut self) {
    let Some(room_id) = self.room.take() else {
      return;
    };

    let emptied = leave_room(&self.signaling.registry.read(), self.id, &room_id);
    if emptied {
      self.signaling.schedule_removal(room_id);
    }
  }

  /// Relays a message to the other occupant and returns the acknowledgement copy.
  pub fn send(&self, outgoing: Outgoing) -> Result<Message, SignalingError> {
    let room_id = self.room.as_ref().ok_or(SignalingError::StaleSender)?;
    self.signaling.relay(self.id, room_id, outgoing)
  }

  /// Pushes an event to this connection.
  pub fn notify(&self, event: Event) {
    notify(&self.sender, event);
  }

  /// Suggests a fresh room id. Nothing is created.
  pub fn request_room_id(&self) -> RoomId {
    RoomId::generate()
  }
}

/// A dropped connection leaves its room, whatever path tore it down.
impl Drop for Session {
  fn drop(&mut self) {
    self.leave();
  }
}

/// Removes `peer_id` from `room_id` and tells whoever is left. Returns whether the room is now
/// empty.
fn leave_room(rooms: &Rooms, peer_id: PeerId, room_id: &RoomId) -> bool {
  let Some(room) = rooms.get(room_id) else {
    return false;
  };

  let mut room = room.write();
  if let Some(participant) = room.remove(&peer_id) {
    info!("{} left room room_id={room_id}", participant.username);
    for other in room.others(peer_id) {
      notify(&other.sender, Event::UserLeft { username: participant.username.clone() });
    }
  }

  room.is_empty()
}

pub(super) fn notify(sender: &PeerSender, event: Event) {
  if sender.send(event).is_err() {
    debug!("dropped event for closed connection");
  }
}
