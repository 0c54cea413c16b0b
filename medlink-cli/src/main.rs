use anyhow::{Context, Result};
use bytes::Bytes;
use clap::{Parser, Subcommand};
use colored::*;
use medlink_core::{PeerRole, RoomId};
use medlink_peer::signaling::HttpSignalingClient;
use medlink_peer::{CallHandle, CallState, NegotiationConfig, start_as_callee, start_as_caller};
use medlink_relay::RelayStore;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use webrtc::data_channel::RTCDataChannel;

#[derive(Parser)]
#[command(name = "medlink")]
#[command(about = "Peer-to-peer call negotiation over a polling relay")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the in-memory signaling relay.
    Relay {
        #[arg(long, default_value = "127.0.0.1:7878")]
        listen: SocketAddr,
    },
    /// Open a room and call into it. Prints the room id for the callee.
    Call {
        #[arg(long, default_value = "http://127.0.0.1:7878")]
        relay: String,

        /// Room to use; a fresh one is generated when omitted.
        #[arg(long)]
        room: Option<String>,
    },
    /// Join an existing room as the callee.
    Join {
        #[arg(long, default_value = "http://127.0.0.1:7878")]
        relay: String,

        #[arg(long)]
        room: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    match Cli::parse().command {
        Commands::Relay { listen } => {
            let listener = TcpListener::bind(listen)
                .await
                .with_context(|| format!("failed to bind {listen}"))?;
            println!("{} {}", "relay listening on".green().bold(), listen);
            medlink_relay::serve(listener, RelayStore::new()).await?;
        }
        Commands::Call { relay, room } => {
            let room = match room {
                Some(id) => RoomId::from(id),
                None => RoomId::generate(),
            };
            println!("{} {}", "room:".bold(), room.to_string().cyan());
            let signaling = Arc::new(HttpSignalingClient::new(relay));
            let handle = start_as_caller(signaling, room, NegotiationConfig::default())
                .await
                .context("failed to start call")?;
            run_call(handle).await?;
        }
        Commands::Join { relay, room } => {
            let signaling = Arc::new(HttpSignalingClient::new(relay));
            let handle = start_as_callee(signaling, RoomId::from(room), NegotiationConfig::default())
                .await
                .context("failed to join call")?;
            run_call(handle).await?;
        }
    }

    Ok(())
}

/// Follow the session until it ends or the user hits Ctrl-C, echoing
/// state transitions and anything arriving on the data channel.
async fn run_call(handle: CallHandle) -> Result<()> {
    let mut states = handle.watch_state();
    let mut greeted = false;

    loop {
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {
                println!("{}", "hanging up".yellow());
                break;
            }
            changed = states.changed() => {
                if changed.is_err() {
                    break;
                }
                let state = *states.borrow_and_update();
                report_state(state);
                if state == CallState::Connected && !greeted {
                    if let Some(channel) = handle.data_channel().await {
                        wire_channel(&channel);
                        greet(&channel, handle.role()).await;
                        greeted = true;
                    }
                }
                if state.is_terminal() {
                    break;
                }
            }
        }
    }

    handle.close().await.context("failed to close the call")?;
    Ok(())
}

fn report_state(state: CallState) {
    let line = format!("{state:?}");
    match state {
        CallState::Connected => println!("{}", line.green().bold()),
        CallState::Failed(_) | CallState::Disconnected => println!("{}", line.red().bold()),
        _ => println!("{}", line.cyan()),
    }
}

fn wire_channel(channel: &Arc<RTCDataChannel>) {
    channel.on_message(Box::new(move |msg| {
        Box::pin(async move {
            match std::str::from_utf8(&msg.data) {
                Ok(text) => println!("{} {}", "peer:".magenta().bold(), text),
                Err(_) => println!("{} {} bytes", "peer:".magenta().bold(), msg.data.len()),
            }
        })
    }));
}

async fn greet(channel: &Arc<RTCDataChannel>, role: PeerRole) {
    let greeting = format!("hello from the {role}");
    if let Err(err) = channel.send(&Bytes::from(greeting)).await {
        tracing::warn!("failed to send greeting: {err}");
    }
}
