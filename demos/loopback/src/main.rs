//! Loopback demo: the full session stack over the in-memory transport,
//! with a scripted peer playing a short survival round.
//!
//! Run with `cargo run -p loopback`; set `RUST_LOG` to adjust verbosity.

use std::sync::Arc;

use glaive::{
    instance_protocol, ChannelTransport, CharacterId, Command, Connection,
    ConnectionState, Message, MessageDispatcher, MessageKind, SkillId,
};
use serde_json::{json, Value};
use tokio::sync::mpsc;

fn envelope(value: Value) -> Vec<u8> {
    serde_json::to_vec(&value).expect("static JSON")
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info".into()),
        )
        .init();

    let (transport, mut peer) = ChannelTransport::pair();
    let dispatcher = MessageDispatcher::new();
    let connection = Connection::new(
        transport,
        Arc::new(instance_protocol()),
        dispatcher.clone(),
    );

    dispatcher.subscribe(MessageKind::InitialData, |message| {
        if let Message::InitialData { scenario, .. } = message {
            tracing::info!(%scenario, "initial data received");
        }
    });
    dispatcher.subscribe(MessageKind::CharacterSpawned, |message| {
        if let Message::CharacterSpawned { character, .. } = message {
            tracing::info!(%character, "character spawned");
        }
    });
    dispatcher.subscribe(MessageKind::ServerMessage, |message| {
        if let Message::ServerMessage { message } = message {
            tracing::info!(%message, "server says");
        }
    });
    dispatcher.subscribe(MessageKind::CharacterGotDamage, |message| {
        if let Message::CharacterGotDamage {
            character_id,
            damage,
        } = message
        {
            tracing::info!(%character_id, damage, "character got damage");
        }
    });
    dispatcher.subscribe(MessageKind::CharacterDied, |message| {
        if let Message::CharacterDied { character_id } = message {
            tracing::info!(%character_id, "character died");
        }
    });
    dispatcher.subscribe(MessageKind::ScenarioEnd, |message| {
        if let Message::ScenarioEnd { resolution } = message {
            tracing::info!(?resolution, "scenario ended");
        }
    });

    let (done_tx, mut done) = mpsc::unbounded_channel();
    connection.state().subscribe(move |state| {
        if *state == ConnectionState::Disconnected {
            let _ = done_tx.send(());
        }
    });

    connection
        .connect("instance-1", "dev-token")
        .await
        .expect("connect over the channel transport");

    // Scripted instance server: greet, take two commands, resolve the
    // round, close.
    let server = tokio::spawn(async move {
        peer.send(&envelope(json!([
            11,
            {"characters": []},
            {"type": "survival", "map": "arena", "difficultyLevel": 1}
        ])));
        peer.send(&envelope(json!([
            5,
            {"id": 1, "nick": "dym"},
            {"x": 0.0, "y": 0.0},
            {"health": 200}
        ])));
        peer.send(&envelope(json!([12, "wave 1 incoming"])));

        for _ in 0..2 {
            if let Some(bytes) = peer.recv().await {
                tracing::info!(
                    payload = %String::from_utf8_lossy(&bytes),
                    "client command"
                );
            }
        }

        peer.send(&envelope(json!([9, 1, 12.5])));
        peer.send(&envelope(json!([6, 2])));
        peer.send(&envelope(json!([19, "Victory"])));
        peer.close();
    });

    connection
        .send_command(&Command::Move { x: 5.0, y: 2.5 })
        .await
        .expect("send move");
    connection
        .send_command(&Command::UseSkillOnCharacter {
            skill_id: SkillId(1),
            target_id: CharacterId(2),
        })
        .await
        .expect("send skill use");

    done.recv().await;
    server.await.expect("server script");
    tracing::info!("session over");
}
