use axum::extract::State;
use axum::response::IntoResponse;
use axum::Json;
use serde::Serialize;

use crate::server::state::ServerState;
use crate::signaling::Signaling;

#[derive(Debug, Serialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
struct Health {
  status: &'static str,
  rooms: usize,
  total_users: usize,
}

impl Health {
  fn of(signaling: &Signaling) -> Self {
    Self { status: "ok", rooms: signaling.room_count(), total_users: signaling.user_count() }
  }
}

pub(crate) async fn health(State(state): State<ServerState>) -> impl IntoResponse {
  Json(Health::of(&state.signaling))
}
