use std::net::SocketAddr;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Result};
use axum::extract::ws::{Message, WebSocket};
use axum::extract::{ConnectInfo, State, WebSocketUpgrade};
use axum::response::IntoResponse;
use futures_util::stream::{self, SplitSink, SplitStream};
use futures_util::StreamExt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio_stream::wrappers::{IntervalStream, UnboundedReceiverStream};
use tracing::{debug, error, info, instrument};

use crate::server::event::Event;
use crate::server::state::ServerState;
use crate::signaling::{self, PeerId, Session, SignalingError};

/// Frames are short JSON objects carrying a few words of text and their keyed signal.
const MAX_FRAME_SIZE: usize = 16 * 1024;

pub(crate) async fn socket(
  ws: WebSocketUpgrade,
  State(state): State<ServerState>,
  ConnectInfo(addr): ConnectInfo<SocketAddr>,
) -> impl IntoResponse {
  ws.max_message_size(MAX_FRAME_SIZE)
    .max_frame_size(MAX_FRAME_SIZE)
    .on_upgrade(move |socket| handle_socket(socket, state, addr))
}

#[instrument(name = "socket", skip_all, fields(addr = addr.to_string()))]
async fn handle_socket(socket: WebSocket, state: ServerState, addr: SocketAddr) {
  let (ws_sender, ws_receiver) = socket.split();
  let (sender, receiver) = mpsc::unbounded_channel();
  let (control_sender, control_receiver) = mpsc::unbounded_channel();
  let alive = Arc::new(AtomicBool::new(true));

  let mut session = state.signaling.connect(sender);
  let peer_id = session.id();
  info!("{peer_id} connected");

  tokio::select! {
    _ = handle_channel(receiver, control_receiver, ws_sender) => {},
    _ = handle_heartbeats(peer_id, alive.clone(), control_sender, state.heartbeat_interval) => {},
    _ = handle_messages(&mut session, ws_receiver, &alive) => {},
  }

  drop(session);
  info!("{peer_id} left");
}

/// Writes core events and control frames to the socket.
async fn handle_channel(
  events: UnboundedReceiver<signaling::Event>,
  control: UnboundedReceiver<Message>,
  ws_sender: SplitSink<WebSocket, Message>,
) -> Result<()> {
  let events = UnboundedReceiverStream::new(events).map(|event| Ok(Message::Text(event.to_string())));
  let control = UnboundedReceiverStream::new(control).map(Ok::<_, axum::Error>);
  stream::select(events, control).forward(ws_sender).await.map_err(Into::into)
}

#[instrument(name = "heartbeat", skip_all, fields(peer = peer_id.to_string()))]
async fn handle_heartbeats(
  peer_id: PeerId,
  alive: Arc<AtomicBool>,
  control: UnboundedSender<Message>,
  period: Duration,
) -> Result<()> {
  let mut stream = IntervalStream::new(tokio::time::interval(period));
  while stream.next().await.is_some() {
    if alive.swap(false, Ordering::Relaxed) {
      debug!("send ping");
      control.send(Message::Ping(Vec::new()))?;
    } else {
      info!("connection timeout");
      break;
    }
  }
  Ok(())
}

#[instrument(name = "message", skip_all, fields(peer = session.id().to_string()))]
async fn handle_messages(session: &mut Session, mut ws_receiver: SplitStream<WebSocket>, alive: &AtomicBool) {
  while let Some(Ok(message)) = ws_receiver.next().await {
    if let Message::Close(_) = message {
      info!("disconnected");
      break;
    }

    if let Err(e) = handle_message(message, session, alive) {
      error!("{e}")
    }
  }
}

fn handle_message(message: Message, session: &mut Session, alive: &AtomicBool) -> Result<()> {
  match message {
    Message::Text(payload) => dispatch(&payload, session),
    Message::Binary(_) => bail!("unsupported binary message"),
    Message::Pong(_) => {
      debug!("recv pong");
      alive.store(true, Ordering::Relaxed);
      Ok(())
    }
    Message::Ping(_) | Message::Close(_) => Ok(()),
  }
}

/// Applies one text frame from a client to its session. Replies go out through the session.
///
/// Malformed frames are an error and leave the session untouched.
pub fn dispatch(payload: &str, session: &mut Session) -> Result<()> {
  let event: Event = payload.parse()?;
  debug!("recv event event={event}");

  match event {
    Event::JoinRoom { room_id, username } => match session.join(room_id, &username) {
      Ok(joined) => session.notify(joined.into()),
      Err(SignalingError::RoomFull(room_id)) => session.notify(signaling::Event::RoomFull { room_id }),
      Err(SignalingError::InvalidRoomId(room_id)) => {
        session.notify(signaling::Event::InvalidRoomId { room_id })
      }
      Err(e) => bail!(e),
    },
    Event::SignalMessage(outgoing) => match session.send(outgoing) {
      Ok(message) => session.notify(signaling::Event::SignalMessageSent(message)),
      Err(e) => debug!("drop message: {e}"),
    },
    Event::RequestRoomId => {
      let room_id = session.request_room_id();
      session.notify(signaling::Event::RoomIdGenerated { room_id })
    }
    Event::LeaveRoom => session.leave(),
    Event::Ping => session.notify(signaling::Event::Pong),
  }

  Ok(())
}
