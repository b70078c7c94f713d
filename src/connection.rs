// src/connection.rs

use crate::{error::ClientError, models::ClientMessage};
use futures_util::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};
use tracing::{error, info};

/// The client's end of the one socket it ever opens.
///
/// Outbound intents go into `outbound` and are serialized and written by
/// a background task; inbound text frames arrive on `inbound`. When the
/// socket closes, both channels shut down and are never re-established.
#[derive(Debug)]
pub struct Connection {
    pub outbound: mpsc::UnboundedSender<ClientMessage>,
    pub inbound: mpsc::UnboundedReceiver<String>,
}

/// Opens the socket and spawns the writer and reader tasks.
pub async fn connect(url: &str) -> Result<Connection, ClientError> {
    let (ws_stream, _) = connect_async(url)
        .await
        .map_err(|source| ClientError::Connect {
            url: url.to_string(),
            source,
        })?;
    info!(%url, "WebSocket connection established");

    let (mut ws_sender, mut ws_receiver) = ws_stream.split();
    let (tx_out, mut rx_out) = mpsc::unbounded_channel::<ClientMessage>();
    let (tx_in, rx_in) = mpsc::unbounded_channel::<String>();

    // Writer: serialize each intent and push it onto the socket.
    tokio::spawn(async move {
        while let Some(message) = rx_out.recv().await {
            let text = match serde_json::to_string(&message) {
                Ok(text) => text,
                Err(e) => {
                    error!("failed to serialize outbound message: {e}");
                    continue;
                }
            };
            if ws_sender.send(Message::Text(text.into())).await.is_err() {
                break;
            }
        }
    });

    // Reader: forward text frames until the socket errors or closes.
    tokio::spawn(async move {
        while let Some(frame) = ws_receiver.next().await {
            match frame {
                Ok(Message::Text(text)) => {
                    if tx_in.send(text.as_str().to_owned()).is_err() {
                        break;
                    }
                }
                Ok(Message::Close(_)) => {
                    info!("WebSocket connection closed");
                    break;
                }
                Ok(_) => {} // ping/pong/binary frames carry no chat traffic
                Err(e) => {
                    error!("WebSocket error: {e}");
                    break;
                }
            }
        }
    });

    Ok(Connection {
        outbound: tx_out,
        inbound: rx_in,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn round_trips_frames_through_a_live_socket() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.unwrap();
            let mut ws = tokio_tungstenite::accept_async(stream).await.unwrap();

            let frame = ws.next().await.unwrap().unwrap();
            let text = frame.into_text().unwrap();
            let value: serde_json::Value = serde_json::from_str(text.as_str()).unwrap();
            assert_eq!(value["action"], "chat");
            assert_eq!(value["message"], "hello");

            ws.send(Message::Text(
                r#"{"username":"bob","message":"hi"}"#.into(),
            ))
            .await
            .unwrap();
        });

        let mut connection = connect(&format!("ws://{addr}")).await.unwrap();
        connection
            .outbound
            .send(ClientMessage::Chat {
                username: "alice".to_string(),
                message: "hello".to_string(),
            })
            .unwrap();

        let text = connection.inbound.recv().await.unwrap();
        assert_eq!(text, r#"{"username":"bob","message":"hi"}"#);
        server.await.unwrap();

        // The server hung up; the inbound channel drains and closes for good.
        assert_eq!(connection.inbound.recv().await, None);
    }

    #[tokio::test]
    async fn connect_failure_surfaces_the_url() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let err = connect(&format!("ws://{addr}")).await.unwrap_err();
        assert!(err.to_string().contains(&addr.to_string()));
    }
}
