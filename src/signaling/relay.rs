use tracing::debug;

use super::error::SignalingError;
use super::event::Event;
use super::message::{Message, Outgoing};
use super::peer::PeerId;
use super::room::RoomId;
use super::session::notify;
use super::Signaling;

impl Signaling {
  /// Records a message from `peer_id` in the history of `room_id` and forwards it to the other
  /// occupant. Returns the stored message, to be echoed back to the sender.
  ///
  /// Fails with [`SignalingError::StaleSender`] if the room is gone or the peer is no longer in it,
  /// and with [`SignalingError::MessageTooLarge`] if the payload exceeds the configured size.
  pub fn relay(
    &self,
    peer_id: PeerId,
    room_id: &RoomId,
    outgoing: Outgoing,
  ) -> Result<Message, SignalingError> {
    let rooms = self.registry.read();
    let room = rooms.get(room_id).ok_or(SignalingError::StaleSender)?;
    let mut room = room.write();

    let username = room.member(&peer_id).ok_or(SignalingError::StaleSender)?.username.clone();
    let len = outgoing.message.len() + outgoing.raw_signal.len();
    if len > self.config.max_message_len {
      return Err(SignalingError::MessageTooLarge(len));
    }

    let message = Message::new(outgoing, username);
    debug!("relay room_id={room_id} message={} morse={}", message.message, message.raw_signal);

    room.push(message.clone());
    for other in room.others(peer_id) {
      notify(&other.sender, Event::SignalMessage(message.clone()));
    }

    Ok(message)
  }
}
