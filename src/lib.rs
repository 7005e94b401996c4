pub mod morse;
mod server;
mod signaling;

pub use self::server::{dispatch, Server};
pub use self::signaling::{
  Config, Event, Joined, Message, Outgoing, Participant, PeerId, PeerSender, Registry, Room, RoomId, Session, Signaling,
  SignalingError,
};
