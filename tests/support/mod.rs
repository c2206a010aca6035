// Shared helpers for booting a host and talking to it over a raw socket.
#![allow(dead_code)]

use dungeon_coop::SessionRuntime;
use dungeon_coop::interface_adapters::protocol::{self, StatePacket, WireMessage};
use dungeon_coop::use_cases::SessionSettings;
use futures::SinkExt;
use futures_util::StreamExt;
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

pub type RawPeer = WebSocketStream<MaybeTlsStream<TcpStream>>;

// Generous bound for anything that should happen within a few ticks.
pub const WAIT: Duration = Duration::from_secs(5);
pub const TICK: Duration = Duration::from_millis(16);

// Start a host on an ephemeral port; the run begins without a loading pause.
pub async fn start_host() -> SessionRuntime {
    let settings = SessionSettings {
        loading_delay: Duration::ZERO,
        seed: Some(7),
        ..SessionSettings::default()
    };
    SessionRuntime::start_host("127.0.0.1:0", settings, TICK)
        .await
        .expect("host should bind an ephemeral port")
}

// Dial the host's socket directly, bypassing the client transport.
pub async fn raw_peer(host_id: &str) -> RawPeer {
    let (socket, _response) = tokio_tungstenite::connect_async(format!("ws://{host_id}/ws"))
        .await
        .expect("peer should connect");
    socket
}

pub async fn send_text(peer: &mut RawPeer, text: &str) {
    peer.send(Message::Text(text.into()))
        .await
        .expect("peer send should succeed");
}

pub fn input_json(player_id: &str, keys: &[&str]) -> String {
    serde_json::json!({ "type": "INPUT", "playerId": player_id, "keys": keys }).to_string()
}

// Read frames until a STATE satisfies `accept`, re-sending `resend` between reads so
// the host keeps seeing fresh input.
pub async fn wait_for_state<F>(peer: &mut RawPeer, resend: &str, mut accept: F) -> StatePacket
where
    F: FnMut(&StatePacket) -> bool,
{
    tokio::time::timeout(WAIT, async {
        loop {
            send_text(peer, resend).await;
            let frame = peer
                .next()
                .await
                .expect("host closed the socket")
                .expect("frame should be readable");
            let Message::Text(text) = frame else {
                continue;
            };
            if let Ok(WireMessage::State(packet)) = protocol::decode(text.as_str()) {
                if accept(&packet) {
                    return packet;
                }
            }
        }
    })
    .await
    .expect("expected STATE did not arrive in time")
}
