use super::room::RoomId;

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum SignalingError {
  /// The room already holds two participants.
  #[error("room {0} is full")]
  RoomFull(RoomId),

  /// The room id is empty or only whitespace.
  #[error("invalid room id {0:?}")]
  InvalidRoomId(RoomId),

  #[error("message of {0} bytes is too large")]
  MessageTooLarge(usize),

  /// A message came from a connection that is no longer a member of its room.
  #[error("sender is not a member of a room")]
  StaleSender,
}
