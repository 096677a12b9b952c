// Switchboard - An accessibility-first Mastodon client
// Copyright (C) 2025 Switchboard Contributors
//
// This program is free software: you can redistribute it and/or modify
// it under the terms of the GNU Affero General Public License as published by
// the Free Software Foundation, either version 3 of the License, or
// (at your option) any later version.
//
// This program is distributed in the hope that it will be useful,
// but WITHOUT ANY WARRANTY; without even the implied warranty of
// MERCHANTABILITY or FITNESS FOR A PARTICULAR PURPOSE.  See the
// GNU Affero General Public License for more details.
//
// You should have received a copy of the GNU Affero General Public License
// along with this program.  If not, see <https://www.gnu.org/licenses/>.

//! IPC server: JSON lines over a unix socket or a Windows named pipe

use anyhow::{Context, Result};
use std::sync::Arc;
use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::sync::{broadcast, Mutex};
use tracing::{debug, error, info, warn};

use crate::models::{error_codes, IpcError, IpcMessage};

use super::handler::MessageHandler;

/// Run the IPC server until a client requests shutdown
pub async fn run_server(handler: Arc<MessageHandler>, pipe_name: &str) -> Result<()> {
    info!("Starting IPC server on {}", pipe_name);

    let forwarders = handler.spawn_event_forwarders();
    let shutdown = handler.shutdown_signal();

    #[cfg(windows)]
    let result = run_windows_pipe_server(handler, pipe_name, shutdown).await;

    #[cfg(not(windows))]
    let result = run_unix_socket_server(handler, pipe_name, shutdown).await;

    for task in forwarders {
        task.abort();
    }

    result
}

#[cfg(windows)]
async fn run_windows_pipe_server(
    handler: Arc<MessageHandler>,
    pipe_name: &str,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    use tokio::net::windows::named_pipe::{PipeMode, ServerOptions};

    let mut first = true;
    loop {
        // Create a new pipe instance
        let pipe = ServerOptions::new()
            .first_pipe_instance(first)
            .pipe_mode(PipeMode::Byte)
            .create(pipe_name)
            .context("Failed to create named pipe")?;
        first = false;

        info!("Waiting for client connection...");

        tokio::select! {
            result = pipe.connect() => {
                match result {
                    Ok(()) => {
                        info!("Client connected");
                        let handler_clone = handler.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_client(pipe, handler_clone).await {
                                error!("Client handler error: {:#}", e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                    }
                }
            }
            _ = shutdown.recv() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    Ok(())
}

#[cfg(not(windows))]
async fn run_unix_socket_server(
    handler: Arc<MessageHandler>,
    pipe_name: &str,
    mut shutdown: broadcast::Receiver<()>,
) -> Result<()> {
    use tokio::net::UnixListener;

    // A stale socket from a crashed run blocks bind
    let _ = std::fs::remove_file(pipe_name);

    let listener = UnixListener::bind(pipe_name)
        .with_context(|| format!("Failed to bind Unix socket {}", pipe_name))?;

    info!("Listening on {}", pipe_name);

    loop {
        tokio::select! {
            result = listener.accept() => {
                match result {
                    Ok((stream, _)) => {
                        info!("Client connected");
                        let handler_clone = handler.clone();
                        tokio::spawn(async move {
                            if let Err(e) = handle_client(stream, handler_clone).await {
                                error!("Client handler error: {:#}", e);
                            }
                        });
                    }
                    Err(e) => {
                        error!("Failed to accept connection: {}", e);
                    }
                }
            }
            _ = shutdown.recv() => {
                info!("Shutdown signal received");
                break;
            }
        }
    }

    // Cleanup
    let _ = std::fs::remove_file(pipe_name);

    Ok(())
}

/// Write one message as a JSON line
async fn write_message<W>(writer: &Mutex<W>, msg: &IpcMessage) -> Result<()>
where
    W: AsyncWrite + Unpin,
{
    let json = serde_json::to_string(msg)?;

    let mut w = writer.lock().await;
    w.write_all(json.as_bytes()).await?;
    w.write_all(b"\n").await?;
    w.flush().await?;

    debug!("Sent message: {}", json);
    Ok(())
}

/// Serve one connected client: answer its requests and push every event
async fn handle_client<S>(stream: S, handler: Arc<MessageHandler>) -> Result<()>
where
    S: AsyncRead + AsyncWrite + Send + 'static,
{
    let (reader, writer) = tokio::io::split(stream);
    let mut reader = BufReader::new(reader);
    let writer = Arc::new(Mutex::new(writer));

    let mut events = handler.subscribe_events();
    let event_writer = writer.clone();
    let pusher = tokio::spawn(async move {
        loop {
            match events.recv().await {
                Ok(event) => {
                    if let Err(e) = write_message(&event_writer, &event).await {
                        warn!("Failed to push event: {:#}", e);
                        break;
                    }
                }
                Err(broadcast::error::RecvError::Lagged(skipped)) => {
                    warn!("Client lagging, dropped {} events", skipped);
                }
                Err(broadcast::error::RecvError::Closed) => break,
            }
        }
    });

    let mut line = String::new();

    let result = loop {
        line.clear();
        match reader.read_line(&mut line).await {
            Ok(0) => {
                info!("Client disconnected");
                break Ok(());
            }
            Ok(_) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                debug!("Received message: {}", trimmed);

                let response = match serde_json::from_str::<IpcMessage>(trimmed) {
                    Ok(msg) => handler.handle_message(msg).await,
                    Err(e) => {
                        warn!("Failed to parse message: {}", e);
                        IpcMessage::response_err(
                            "unknown",
                            IpcError::new(
                                error_codes::PARSE_ERROR,
                                format!("Failed to parse message: {}", e),
                            ),
                        )
                    }
                };

                if let Err(e) = write_message(&writer, &response).await {
                    break Err(e);
                }
            }
            Err(e) => {
                error!("Read error: {}", e);
                break Ok(());
            }
        }
    };

    pusher.abort();
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheManager;
    use crate::context::AccountRegistry;
    use crate::ipc::handler::Collaborators;
    use crate::models::{events, methods, MessageType};
    use crate::test_support::{account, RecordingFollowRequests, StaticFeed, StubFetcher};

    async fn handler() -> Arc<MessageHandler> {
        Arc::new(MessageHandler::new(
            Arc::new(AccountRegistry::new(Vec::new(), None)),
            Arc::new(CacheManager::in_memory().await.unwrap()),
            Collaborators {
                profiles: Arc::new(StubFetcher::succeeding(account("1", "alice"))),
                feed: Arc::new(StaticFeed::default()),
                follow_actions: Arc::new(RecordingFollowRequests::default()),
            },
            20,
        ))
    }

    async fn read_message<R: AsyncBufReadExt + Unpin>(reader: &mut R) -> IpcMessage {
        let mut line = String::new();
        reader.read_line(&mut line).await.unwrap();
        serde_json::from_str(&line).unwrap()
    }

    #[tokio::test]
    async fn answers_requests_and_pushes_events() {
        let handler = handler().await;
        let (client, server) = tokio::io::duplex(64 * 1024);
        let task = tokio::spawn(handle_client(server, handler.clone()));

        let (reader, mut writer) = tokio::io::split(client);
        let mut reader = BufReader::new(reader);

        let ping = IpcMessage::request(methods::PING, None);
        writer
            .write_all(format!("{}\n", serde_json::to_string(&ping).unwrap()).as_bytes())
            .await
            .unwrap();
        let response = read_message(&mut reader).await;
        assert_eq!(response.id, ping.id);
        assert_eq!(response.message_type, MessageType::Response);

        let dispatch = IpcMessage::request(
            methods::INTENT_DISPATCH,
            Some(serde_json::json!({ "intents": [{ "kind": "haptic", "haptic": "light_tap" }] })),
        );
        writer
            .write_all(format!("{}\n", serde_json::to_string(&dispatch).unwrap()).as_bytes())
            .await
            .unwrap();

        // the event and the response race; both must arrive
        let mut seen_event = false;
        let mut seen_response = false;
        while !(seen_event && seen_response) {
            let msg = read_message(&mut reader).await;
            match msg.message_type {
                MessageType::Event => {
                    assert_eq!(msg.method.as_deref(), Some(events::HAPTIC));
                    seen_event = true;
                }
                _ => {
                    assert_eq!(msg.id, dispatch.id);
                    seen_response = true;
                }
            }
        }

        drop(writer);
        drop(reader);
        task.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn garbage_gets_a_parse_error() {
        let handler = handler().await;
        let (client, server) = tokio::io::duplex(4096);
        tokio::spawn(handle_client(server, handler));

        let (reader, mut writer) = tokio::io::split(client);
        let mut reader = BufReader::new(reader);

        writer.write_all(b"{not json\n").await.unwrap();
        let response = read_message(&mut reader).await;
        assert_eq!(response.error.map(|e| e.code), Some(error_codes::PARSE_ERROR));
    }
}
