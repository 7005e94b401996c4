use std::fmt;

use serde::{Deserialize, Serialize};

use super::message::Message;
use super::room::RoomId;

/// Notifications the core pushes to a connection.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum Event {
  RoomJoined {
    #[serde(rename = "roomId")]
    room_id: RoomId,
    users: Vec<String>,
    messages: Vec<Message>,
  },
  RoomFull {
    #[serde(rename = "roomId")]
    room_id: RoomId,
  },
  InvalidRoomId {
    #[serde(rename = "roomId")]
    room_id: RoomId,
  },
  UserJoined {
    username: String,
  },
  UserLeft {
    username: String,
  },
  SignalMessage(Message),
  SignalMessageSent(Message),
  RoomIdGenerated {
    #[serde(rename = "roomId")]
    room_id: RoomId,
  },
  Pong,
}

impl fmt::Display for Event {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&serde_json::to_string(self).map_err(|_| fmt::Error)?)
  }
}

#[cfg(test)]
mod tests {
  use serde_json::json;

  use super::*;

  #[test]
  fn serializes_with_kebab_case_tag() {
    let event = Event::RoomJoined { room_id: RoomId::new("abc123"), users: vec!["A".into()], messages: vec![] };
    assert_eq!(
      serde_json::to_value(&event).unwrap(),
      json!({ "type": "room-joined", "roomId": "ABC123", "users": ["A"], "messages": [] })
    );

    assert_eq!(Event::UserLeft { username: "A".into() }.to_string(), r#"{"type":"user-left","username":"A"}"#);
    assert_eq!(Event::Pong.to_string(), r#"{"type":"pong"}"#);
  }

  #[test]
  fn message_events_inline_the_message() {
    let message = Message {
      id: "01H".into(),
      message: "HI".into(),
      raw_signal: ".... ..".into(),
      username: "A".into(),
      timestamp: 1,
    };
    assert_eq!(
      serde_json::to_value(Event::SignalMessageSent(message)).unwrap(),
      json!({
        "type": "signal-message-sent",
        "id": "01H",
        "message": "HI",
        "morse": ".... ..",
        "username": "A",
        "timestamp": 1,
      })
    );
  }
}
