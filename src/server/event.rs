use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::signaling::{Outgoing, RoomId};

/// Frames a client may send.
#[derive(Debug, Deserialize, Serialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub(super) enum Event {
  JoinRoom {
    #[serde(rename = "roomId")]
    room_id: RoomId,
    #[serde(default)]
    username: String,
  },
  #[serde(alias = "morse-message")]
  SignalMessage(Outgoing),
  RequestRoomId,
  LeaveRoom,
  Ping,
}

impl fmt::Display for Event {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(&serde_json::to_string(self).map_err(|_| fmt::Error)?)
  }
}

impl FromStr for Event {
  type Err = serde_json::Error;

  fn from_str(s: &str) -> serde_json::Result<Self> {
    serde_json::from_str(s)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn parses_join_room() {
    let event: Event = r#"{"type":"join-room","roomId":"abc123","username":"A"}"#.parse().unwrap();
    assert!(matches!(
      event,
      Event::JoinRoom { room_id, username } if room_id.as_str() == "ABC123" && username == "A"
    ));

    let event: Event = r#"{"type":"join-room","roomId":"abc123"}"#.parse().unwrap();
    assert!(matches!(event, Event::JoinRoom { username, .. } if username.is_empty()));
  }

  #[test]
  fn parses_signal_message() {
    let event: Event =
      r#"{"type":"signal-message","message":"HI","morse":".... ..","timestamp":7}"#.parse().unwrap();
    assert!(matches!(
      event,
      Event::SignalMessage(Outgoing { message, raw_signal, timestamp: Some(7) })
        if message == "HI" && raw_signal == ".... .."
    ));

    let event: Event = r#"{"type":"morse-message","morse":"..."}"#.parse().unwrap();
    assert!(matches!(event, Event::SignalMessage(Outgoing { timestamp: None, .. })));
  }

  #[test]
  fn parses_unit_events() {
    assert!(matches!(r#"{"type":"request-room-id"}"#.parse::<Event>().unwrap(), Event::RequestRoomId));
    assert!(matches!(r#"{"type":"leave-room"}"#.parse::<Event>().unwrap(), Event::LeaveRoom));
    assert!(matches!(r#"{"type":"ping"}"#.parse::<Event>().unwrap(), Event::Ping));
  }

  #[test]
  fn rejects_unknown_events() {
    assert!(r#"{"type":"subscribe","topics":[]}"#.parse::<Event>().is_err());
    assert!("not json".parse::<Event>().is_err());
  }
}
