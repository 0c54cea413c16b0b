use crate::store::RelayStore;
use axum::Router;
use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::routing::get;
use medlink_core::{IceCandidate, PeerRole, SessionDescription};
use tracing::debug;

pub fn router(store: RelayStore) -> Router {
    Router::new()
        .route(
            "/rooms/{room_id}/offer",
            get(fetch_offer).post(publish_offer),
        )
        .route(
            "/rooms/{room_id}/answer",
            get(fetch_answer).post(publish_answer),
        )
        .route(
            "/rooms/{room_id}/candidates/{role}",
            get(fetch_candidates).post(publish_candidate),
        )
        .with_state(store)
}

async fn publish_offer(
    State(store): State<RelayStore>,
    Path(room_id): Path<String>,
    Json(desc): Json<SessionDescription>,
) -> StatusCode {
    debug!("offer published for room {room_id}");
    store.set_offer(&room_id, desc);
    StatusCode::NO_CONTENT
}

async fn fetch_offer(
    State(store): State<RelayStore>,
    Path(room_id): Path<String>,
) -> Result<Json<SessionDescription>, StatusCode> {
    store.offer(&room_id).map(Json).ok_or(StatusCode::NOT_FOUND)
}

async fn publish_answer(
    State(store): State<RelayStore>,
    Path(room_id): Path<String>,
    Json(desc): Json<SessionDescription>,
) -> StatusCode {
    debug!("answer published for room {room_id}");
    store.set_answer(&room_id, desc);
    StatusCode::NO_CONTENT
}

async fn fetch_answer(
    State(store): State<RelayStore>,
    Path(room_id): Path<String>,
) -> Result<Json<SessionDescription>, StatusCode> {
    store
        .answer(&room_id)
        .map(Json)
        .ok_or(StatusCode::NOT_FOUND)
}

async fn publish_candidate(
    State(store): State<RelayStore>,
    Path((room_id, role)): Path<(String, String)>,
    Json(candidate): Json<IceCandidate>,
) -> StatusCode {
    let Ok(role) = role.parse::<PeerRole>() else {
        return StatusCode::BAD_REQUEST;
    };
    store.append_candidate(&room_id, role, candidate);
    StatusCode::NO_CONTENT
}

async fn fetch_candidates(
    State(store): State<RelayStore>,
    Path((room_id, role)): Path<(String, String)>,
) -> Result<Json<Vec<IceCandidate>>, StatusCode> {
    let Ok(role) = role.parse::<PeerRole>() else {
        return Err(StatusCode::BAD_REQUEST);
    };
    Ok(Json(store.candidates(&room_id, role)))
}
