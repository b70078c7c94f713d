// src/models.rs

use serde::{Deserialize, Serialize};

/// A message sent from this client to the server.
/// Serialized into JSON text for sending.
///
/// The wire shape uses a single `action` discriminator for every intent.
/// Field spellings (`roomName`, `passcode`, `data` as an array of byte
/// values) follow the server's expected traffic.
#[derive(Serialize, Clone, Debug, PartialEq)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum ClientMessage {
    Join {
        username: String,
    },
    Chat {
        username: String,
        message: String,
    },
    FileUpload {
        filename: String,
        data: Vec<u8>,
    },
    Calculate {
        calculation: String,
    },
    CreateRoom {
        #[serde(rename = "roomName")]
        room_name: String,
        passcode: String,
    },
    JoinRoom {
        #[serde(rename = "roomName")]
        room_name: String,
        passcode: String,
    },
    LeaveRoom {
        username: String,
    },
}

/// A message received from the server.
/// Deserialized from incoming JSON text.
///
/// Result frames carry a `type` discriminator; plain chat messages carry
/// none and are the fallback case.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(untagged)]
pub enum ServerMessage {
    Event(ServerEvent),
    Chat { username: String, message: String },
}

/// Server frames discriminated by a `type` field.
#[derive(Deserialize, Debug, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ServerEvent {
    CalculationResult {
        result: String,
    },
    FileResult {
        filename: String,
        content: String,
        #[serde(rename = "downloadUrl")]
        download_url: String,
    },
}
