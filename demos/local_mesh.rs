//! Local rendezvous mesh example
//!
//! Run with: cargo run --example local_mesh
//!
//! Wires two in-memory peers into one provider over duplex streams,
//! subscribes both to the "chat" namespace and publishes two
//! registrations. Each peer prints the records it receives; a peer that
//! subscribes after the first registration would receive the cached
//! record immediately as its confirmation.

use std::time::Duration;

use bytes::Bytes;
use rendezvous_sync::wire::{
    FrameReader, FrameWriter, RegistrationRecord, Request, DEFAULT_MAX_FRAME_SIZE,
};
use rendezvous_sync::{PeerId, SyncProvider};
use tokio::io::split;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("rendezvous_sync=debug".parse()?)
                .add_directive("local_mesh=info".parse()?),
        )
        .init();

    let provider = SyncProvider::with_defaults(PeerId::from("rendezvous-host"));

    // What a remote peer would use to target its subscribe request.
    let descriptor = provider.subscribe("chat")?;
    println!("subscription descriptor: {}", descriptor);

    let mut receivers = Vec::new();
    for name in ["bob", "carol"] {
        let (client, server) = tokio::io::duplex(4096);
        let _session = provider.spawn_session(PeerId::from(name), server);

        let (read_half, write_half) = split(client);
        let mut writer = FrameWriter::new(write_half);
        writer
            .write_message(&Request::DiscoverSubscribe {
                namespace: "chat".to_string(),
            })
            .await?;

        let name = name.to_string();
        receivers.push(tokio::spawn(async move {
            // Keep the write half alive while we read announcements.
            let _writer = writer;
            let mut reader = FrameReader::new(read_half, DEFAULT_MAX_FRAME_SIZE);

            for _ in 0..2 {
                match reader.read_message::<RegistrationRecord>().await {
                    Ok(record) => println!(
                        "[{}] {} registered under '{}' with {} address(es), expires at {}",
                        name,
                        record.peer_id,
                        record.namespace,
                        record.addresses.len(),
                        record.expires_at_ms,
                    ),
                    Err(err) => {
                        eprintln!("[{}] stream failed: {}", name, err);
                        return;
                    }
                }
            }
        }));
    }

    // Let both sessions process their subscriptions before publishing.
    let topic = provider.registry().get_or_create("chat");
    while topic.subscriber_count() < 2 {
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    provider
        .register(
            &PeerId::from("alice"),
            "chat",
            vec![Bytes::from_static(b"/ip4/127.0.0.1/tcp/4001")],
            3600,
            1,
        )
        .await;
    provider
        .register(
            &PeerId::from("alice"),
            "chat",
            vec![Bytes::from_static(b"/ip4/10.0.0.7/tcp/4001")],
            3600,
            2,
        )
        .await;

    for task in receivers {
        task.await?;
    }

    Ok(())
}
