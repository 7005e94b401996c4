use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use ulid::Ulid;

use crate::morse;

/// Payload of a signal-message as sent by a client.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq)]
pub struct Outgoing {
  #[serde(default)]
  pub message: String,
  #[serde(default, rename = "morse", alias = "rawSignal")]
  pub raw_signal: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub timestamp: Option<u64>,
}

/// A relayed message, as stored in room history and delivered to both occupants.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq)]
pub struct Message {
  pub id: String,
  pub message: String,
  #[serde(rename = "morse")]
  pub raw_signal: String,
  pub username: String,
  pub timestamp: u64,
}

impl Message {
  /// Stamps an outgoing payload with an id, a timestamp and the sender's name.
  ///
  /// Whichever of the two representations is missing is filled in from the other one.
  pub fn new(outgoing: Outgoing, username: String) -> Self {
    let Outgoing { mut message, mut raw_signal, timestamp } = outgoing;
    if message.is_empty() {
      message = morse::decode(&raw_signal);
    } else if raw_signal.is_empty() {
      raw_signal = morse::encode(&message);
    }

    Self {
      id: Ulid::new().to_string(),
      message,
      raw_signal,
      username,
      timestamp: timestamp.unwrap_or_else(now_millis),
    }
  }
}

pub(crate) fn now_millis() -> u64 {
  SystemTime::now().duration_since(UNIX_EPOCH).map(|d| d.as_millis() as u64).unwrap_or(0)
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fills_missing_representation() {
    let from_text = Message::new(
      Outgoing { message: "HI".into(), raw_signal: String::new(), timestamp: Some(42) },
      "A".into(),
    );
    assert_eq!(from_text.raw_signal, ".... ..");
    assert_eq!(from_text.timestamp, 42);

    let from_signal = Message::new(
      Outgoing { message: String::new(), raw_signal: "... --- ...".into(), timestamp: None },
      "B".into(),
    );
    assert_eq!(from_signal.message, "SOS");
    assert!(from_signal.timestamp > 0);
  }

  #[test]
  fn keeps_both_representations_when_present() {
    let message = Message::new(
      Outgoing { message: "HI".into(), raw_signal: "<keyed>".into(), timestamp: None },
      "A".into(),
    );
    assert_eq!(message.message, "HI");
    assert_eq!(message.raw_signal, "<keyed>");
    assert_eq!(message.username, "A");
  }

  #[test]
  fn ids_are_unique() {
    let a = Message::new(Outgoing::default(), "A".into());
    let b = Message::new(Outgoing::default(), "A".into());
    assert_ne!(a.id, b.id);
  }

  #[test]
  fn wire_format() {
    let outgoing: Outgoing = serde_json::from_str(r#"{"message":"HI","morse":".... .."}"#).unwrap();
    assert_eq!(outgoing.raw_signal, ".... ..");
    assert_eq!(outgoing.timestamp, None);

    let message = Message::new(outgoing, "A".into());
    let json = serde_json::to_value(&message).unwrap();
    assert_eq!(json["morse"], ".... ..");
    assert_eq!(json["username"], "A");
  }
}
