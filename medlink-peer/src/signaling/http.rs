use super::SignalingClient;
use crate::error::SignalingError;
use async_trait::async_trait;
use medlink_core::{IceCandidate, PeerRole, RoomId, SessionDescription};
use reqwest::StatusCode;
use serde::Serialize;

/// `SignalingClient` over the relay's REST boundary:
/// `/rooms/{room}/offer`, `/rooms/{room}/answer`,
/// `/rooms/{room}/candidates/{role}`.
pub struct HttpSignalingClient {
    base_url: String,
    http: reqwest::Client,
}

impl HttpSignalingClient {
    pub fn new(base_url: impl Into<String>) -> Self {
        let base_url = base_url.into();
        Self {
            base_url: base_url.trim_end_matches('/').to_owned(),
            http: reqwest::Client::new(),
        }
    }

    fn room_url(&self, room: &RoomId, tail: &str) -> String {
        format!("{}/rooms/{}/{}", self.base_url, room, tail)
    }

    async fn post_json<T: Serialize + Sync>(
        &self,
        url: String,
        body: &T,
    ) -> Result<(), SignalingError> {
        self.http
            .post(url)
            .json(body)
            .send()
            .await
            .map_err(transport_err)?
            .error_for_status()
            .map_err(transport_err)?;
        Ok(())
    }

    async fn get_description(
        &self,
        url: String,
    ) -> Result<Option<SessionDescription>, SignalingError> {
        let response = self.http.get(url).send().await.map_err(transport_err)?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = response.error_for_status().map_err(transport_err)?;
        let desc = response.json().await.map_err(decode_err)?;
        Ok(Some(desc))
    }
}

fn transport_err(err: reqwest::Error) -> SignalingError {
    SignalingError::RelayUnavailable(err.to_string())
}

fn decode_err(err: reqwest::Error) -> SignalingError {
    SignalingError::MalformedResponse(err.to_string())
}

#[async_trait]
impl SignalingClient for HttpSignalingClient {
    async fn publish_offer(
        &self,
        room: &RoomId,
        offer: &SessionDescription,
    ) -> Result<(), SignalingError> {
        self.post_json(self.room_url(room, "offer"), offer).await
    }

    async fn fetch_offer(
        &self,
        room: &RoomId,
    ) -> Result<Option<SessionDescription>, SignalingError> {
        self.get_description(self.room_url(room, "offer")).await
    }

    async fn publish_answer(
        &self,
        room: &RoomId,
        answer: &SessionDescription,
    ) -> Result<(), SignalingError> {
        self.post_json(self.room_url(room, "answer"), answer).await
    }

    async fn fetch_answer(
        &self,
        room: &RoomId,
    ) -> Result<Option<SessionDescription>, SignalingError> {
        self.get_description(self.room_url(room, "answer")).await
    }

    async fn publish_candidate(
        &self,
        room: &RoomId,
        role: PeerRole,
        candidate: &IceCandidate,
    ) -> Result<(), SignalingError> {
        self.post_json(self.room_url(room, &format!("candidates/{role}")), candidate)
            .await
    }

    async fn fetch_candidates(
        &self,
        room: &RoomId,
        role: PeerRole,
    ) -> Result<Vec<IceCandidate>, SignalingError> {
        let url = self.room_url(room, &format!("candidates/{role}"));
        let response = self
            .http
            .get(url)
            .send()
            .await
            .map_err(transport_err)?
            .error_for_status()
            .map_err(transport_err)?;
        response.json().await.map_err(decode_err)
    }
}
