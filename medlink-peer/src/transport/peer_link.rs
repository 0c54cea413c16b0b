use crate::config::NegotiationConfig;
use crate::transport::PeerEvent;
use anyhow::{Context, Result};
use medlink_core::{IceCandidate, SdpKind, SessionDescription};
use std::sync::Arc;
use tokio::sync::mpsc;
use tracing::debug;
use webrtc::api::APIBuilder;
use webrtc::api::interceptor_registry::register_default_interceptors;
use webrtc::api::media_engine::MediaEngine;
use webrtc::data_channel::RTCDataChannel;
use webrtc::ice_transport::ice_candidate::{RTCIceCandidate, RTCIceCandidateInit};
use webrtc::ice_transport::ice_server::RTCIceServer;
use webrtc::interceptor::registry::Registry;
use webrtc::peer_connection::RTCPeerConnection;
use webrtc::peer_connection::configuration::RTCConfiguration;
use webrtc::peer_connection::sdp::session_description::RTCSessionDescription;

/// Wrapper around one `RTCPeerConnection`. Connection callbacks are
/// turned into `PeerEvent`s on the channel handed to `new`, so the
/// session's event loop is the only place that reacts to them.
pub struct PeerLink {
    peer_connection: Arc<RTCPeerConnection>,
    event_tx: mpsc::Sender<PeerEvent>,
}

impl PeerLink {
    pub async fn new(
        config: &NegotiationConfig,
        event_tx: mpsc::Sender<PeerEvent>,
    ) -> Result<Self> {
        let mut media_engine = MediaEngine::default();
        media_engine.register_default_codecs()?;
        let registry = register_default_interceptors(Registry::new(), &mut media_engine)?;

        let api = APIBuilder::new()
            .with_media_engine(media_engine)
            .with_interceptor_registry(registry)
            .build();

        let ice_servers = if config.ice_servers.is_empty() {
            vec![]
        } else {
            vec![RTCIceServer {
                urls: config.ice_servers.clone(),
                ..Default::default()
            }]
        };

        let rtc_config = RTCConfiguration {
            ice_servers,
            ..Default::default()
        };

        let peer_connection = Arc::new(api.new_peer_connection(rtc_config).await?);

        let state_tx = event_tx.clone();
        peer_connection.on_peer_connection_state_change(Box::new(move |state| {
            let tx = state_tx.clone();
            Box::pin(async move {
                debug!("peer connection state changed: {state:?}");
                let _ = tx.send(PeerEvent::StateChanged(state)).await;
            })
        }));

        // Trickle ICE: every locally discovered candidate goes to the
        // session for publishing.
        let ice_tx = event_tx.clone();
        peer_connection.on_ice_candidate(Box::new(move |candidate: Option<RTCIceCandidate>| {
            let tx = ice_tx.clone();
            Box::pin(async move {
                let Some(candidate) = candidate else { return };
                let Ok(init) = candidate.to_json() else {
                    return;
                };
                let Ok(payload) = serde_json::to_string(&init) else {
                    return;
                };
                let _ = tx
                    .send(PeerEvent::LocalCandidate(IceCandidate::new(payload)))
                    .await;
            })
        }));

        // Channel announced by the counterpart (callee side of the call).
        let dc_tx = event_tx.clone();
        peer_connection.on_data_channel(Box::new(move |dc: Arc<RTCDataChannel>| {
            let tx = dc_tx.clone();
            Box::pin(async move {
                debug!("data channel '{}' announced by remote", dc.label());

                let channel = dc.clone();
                let tx_open = tx.clone();
                dc.on_open(Box::new(move || {
                    let tx = tx_open.clone();
                    let channel = channel.clone();
                    Box::pin(async move {
                        let _ = tx.send(PeerEvent::DataChannelOpen(channel)).await;
                    })
                }));
            })
        }));

        Ok(Self {
            peer_connection,
            event_tx,
        })
    }

    /// Create the data channel ahead of the offer (caller side).
    pub async fn open_data_channel(&self, label: &str) -> Result<()> {
        let dc = self
            .peer_connection
            .create_data_channel(label, None)
            .await
            .context("failed to create data channel")?;

        let tx = self.event_tx.clone();
        let channel = dc.clone();
        dc.on_open(Box::new(move || {
            let tx = tx.clone();
            let channel = channel.clone();
            Box::pin(async move {
                let _ = tx.send(PeerEvent::DataChannelOpen(channel)).await;
            })
        }));

        Ok(())
    }

    /// Create an SDP offer and install it as the local description.
    pub async fn create_offer(&self) -> Result<SessionDescription> {
        let offer = self
            .peer_connection
            .create_offer(None)
            .await
            .context("failed to create offer")?;
        self.peer_connection
            .set_local_description(offer.clone())
            .await
            .context("failed to set local offer")?;
        Ok(SessionDescription::offer(offer.sdp))
    }

    /// Create an SDP answer and install it as the local description.
    /// Valid only after the remote offer was applied.
    pub async fn create_answer(&self) -> Result<SessionDescription> {
        let answer = self
            .peer_connection
            .create_answer(None)
            .await
            .context("failed to create answer")?;
        self.peer_connection
            .set_local_description(answer.clone())
            .await
            .context("failed to set local answer")?;
        Ok(SessionDescription::answer(answer.sdp))
    }

    pub async fn apply_remote_description(&self, desc: &SessionDescription) -> Result<()> {
        let desc = match desc.kind {
            SdpKind::Offer => RTCSessionDescription::offer(desc.sdp.clone())?,
            SdpKind::Answer => RTCSessionDescription::answer(desc.sdp.clone())?,
        };
        self.peer_connection
            .set_remote_description(desc)
            .await
            .context("failed to set remote description")?;
        Ok(())
    }

    pub async fn apply_remote_candidate(&self, candidate: &IceCandidate) -> Result<()> {
        let init: RTCIceCandidateInit = serde_json::from_str(candidate.payload())
            .context("failed to parse ICE candidate JSON")?;
        self.peer_connection
            .add_ice_candidate(init)
            .await
            .context("failed to add ICE candidate")?;
        Ok(())
    }

    pub async fn close(&self) -> Result<()> {
        self.peer_connection
            .close()
            .await
            .context("failed to close peer connection")?;
        Ok(())
    }
}
