use std::collections::VecDeque;
use std::fmt;

use rand::Rng;
use serde::{Deserialize, Serialize};
use tokio::time::Instant;

use super::message::Message;
use super::peer::{PeerId, PeerSender};

const ROOM_ID_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
const ROOM_ID_LEN: usize = 6;

/// Case-insensitive room identifier, stored uppercase.
#[derive(Clone, Debug, Serialize, PartialEq, Eq, Hash)]
pub struct RoomId(String);

impl RoomId {
  pub fn new(id: impl AsRef<str>) -> Self {
    Self(id.as_ref().to_uppercase())
  }

  /// Whether the id has no visible characters. Such ids are refused on join.
  pub fn is_blank(&self) -> bool {
    self.0.trim().is_empty()
  }

  /// Random short identifier. Not checked against live rooms: 36^6 ids is plenty for the number
  /// of rooms open at once.
  pub fn generate() -> Self {
    let mut rng = rand::thread_rng();
    let id = (0..ROOM_ID_LEN)
      .map(|_| ROOM_ID_ALPHABET[rng.gen_range(0..ROOM_ID_ALPHABET.len())] as char)
      .collect();
    Self(id)
  }

  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl<'de> Deserialize<'de> for RoomId {
  fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
    String::deserialize(deserializer).map(Self::new)
  }
}

impl fmt::Display for RoomId {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&self.0)
  }
}

/// A connection's membership record within a room.
#[derive(Debug)]
pub struct Participant {
  pub username: String,
  pub joined_at: u64,
  pub(super) sender: PeerSender,
}

#[derive(Debug)]
pub struct Room {
  pub id: RoomId,
  pub created_at: Instant,
  members: Vec<(PeerId, Participant)>,
  history: VecDeque<Message>,
  history_limit: usize,
}

impl Room {
  pub(super) fn new(id: RoomId, history_limit: usize) -> Self {
    Self {
      id,
      created_at: Instant::now(),
      members: Default::default(),
      history: Default::default(),
      history_limit,
    }
  }

  pub fn len(&self) -> usize {
    self.members.len()
  }

  pub fn is_empty(&self) -> bool {
    self.members.is_empty()
  }

  pub fn member(&self, peer_id: &PeerId) -> Option<&Participant> {
    self.members.iter().find(|(id, _)| id == peer_id).map(|(_, participant)| participant)
  }

  /// Usernames of current members, in join order.
  pub fn usernames(&self) -> Vec<String> {
    self.members.iter().map(|(_, participant)| participant.username.clone()).collect()
  }

  pub fn history(&self) -> impl Iterator<Item = &Message> {
    self.history.iter()
  }

  pub(super) fn others(&self, peer_id: PeerId) -> impl Iterator<Item = &Participant> {
    self.members.iter().filter(move |(id, _)| *id != peer_id).map(|(_, participant)| participant)
  }

  pub(super) fn insert(&mut self, peer_id: PeerId, participant: Participant) {
    self.remove(&peer_id);
    self.members.push((peer_id, participant));
  }

  pub(super) fn remove(&mut self, peer_id: &PeerId) -> Option<Participant> {
    let index = self.members.iter().position(|(id, _)| id == peer_id)?;
    Some(self.members.remove(index).1)
  }

  pub(super) fn push(&mut self, message: Message) {
    self.history.push_back(message);
    while self.history.len() > self.history_limit {
      self.history.pop_front();
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::signaling::message::Outgoing;

  #[test]
  fn room_id_is_case_insensitive() {
    assert_eq!(RoomId::new("abc123"), RoomId::new("ABC123"));
    assert_eq!(RoomId::new("aBc 12").as_str(), "ABC 12");
    assert!(RoomId::new("  ").is_blank());
    assert!(!RoomId::new("a").is_blank());

    let id: RoomId = serde_json::from_str("\"xyz\"").unwrap();
    assert_eq!(id.as_str(), "XYZ");
  }

  #[test]
  fn generated_room_id_is_short_uppercase_alphanumeric() {
    for _ in 0..100 {
      let id = RoomId::generate();
      assert_eq!(id.as_str().len(), ROOM_ID_LEN);
      assert!(id.as_str().bytes().all(|b| ROOM_ID_ALPHABET.contains(&b)));
    }
  }

  #[test]
  fn history_keeps_most_recent_entries() {
    let mut room = Room::new(RoomId::new("ABC123"), 50);
    for i in 0..60 {
      let outgoing = Outgoing { message: i.to_string(), raw_signal: String::new(), timestamp: None };
      room.push(Message::new(outgoing, "A".into()));
    }

    let history: Vec<_> = room.history().map(|message| message.message.clone()).collect();
    assert_eq!(history.len(), 50);
    assert_eq!(history.first().map(String::as_str), Some("10"));
    assert_eq!(history.last().map(String::as_str), Some("59"));
  }
}
