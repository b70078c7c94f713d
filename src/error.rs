// src/error.rs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ClientError {
    #[error("failed to connect to {url}: {source}")]
    Connect {
        url: String,
        #[source]
        source: tokio_tungstenite::tungstenite::Error,
    },
    #[error("malformed message from server: {0}")]
    Protocol(#[from] serde_json::Error),
    #[error("failed to read file: {0}")]
    FileRead(#[from] std::io::Error),
}
