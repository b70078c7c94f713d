// src/dispatch.rs

use crate::{
    error::ClientError,
    models::{ClientMessage, ServerEvent, ServerMessage},
    render::{InputField, Modal, RenderCommand, Renderer},
    session::Session,
};
use tokio::sync::mpsc::UnboundedSender;
use tracing::{debug, info, warn};

/// Uploads below this size are rejected before anything is sent.
pub const MIN_UPLOAD_BYTES: usize = 10 * 1024;

/// A fully buffered file picked for upload. The whole content is held in
/// memory; there is no chunking or streaming.
#[derive(Debug, Clone, PartialEq)]
pub struct FileSelection {
    pub filename: String,
    pub data: Vec<u8>,
}

/// Translates user intents into wire messages and inbound frames into
/// render commands.
///
/// Owns the session state. Talks to the socket only through the outbound
/// channel and to the screen only through the renderer, so every
/// operation here runs without a live connection or terminal.
pub struct Dispatcher<R: Renderer> {
    session: Session,
    outbound: UnboundedSender<ClientMessage>,
    renderer: R,
}

impl<R: Renderer> Dispatcher<R> {
    pub fn new(session: Session, outbound: UnboundedSender<ClientMessage>, renderer: R) -> Self {
        Dispatcher {
            session,
            outbound,
            renderer,
        }
    }

    /// Stores the trimmed name as the session identity and announces the
    /// join. Not idempotent: a second call re-sends the join and silently
    /// overwrites the identity.
    pub fn set_username(&mut self, name: &str) {
        let name = name.trim();
        if name.is_empty() {
            self.alert("Username cannot be empty");
            return;
        }
        self.session.set_username(name.to_string());
        self.renderer.render(RenderCommand::HideUsernamePrompt);
        self.send(ClientMessage::Join {
            username: name.to_string(),
        });
        info!(username = name, "joined chat");
    }

    /// Sends a chat message carrying the session identity and the text
    /// verbatim, embedded newlines included.
    pub fn send_message(&mut self, text: &str) {
        let Some(username) = self.session.username() else {
            self.alert("Please enter your username");
            return;
        };
        let username = username.to_string();
        self.send(ClientMessage::Chat {
            username,
            message: text.to_string(),
        });
        self.renderer
            .render(RenderCommand::ClearInput(InputField::Message));
    }

    /// Sends a selected file as a byte array. Gated on a minimum size
    /// only; there is no upper bound.
    pub fn upload_file(&mut self, selection: Option<FileSelection>) {
        let Some(selection) = selection else {
            self.alert("No file selected!");
            return;
        };
        if selection.data.len() < MIN_UPLOAD_BYTES {
            self.alert("Please upload a .txt file equal to or larger than 10KB.");
            return;
        }
        info!(filename = %selection.filename, size = selection.data.len(), "sending file");
        self.send(ClientMessage::FileUpload {
            filename: selection.filename,
            data: selection.data,
        });
    }

    /// Surfaces a failed local file read; nothing is sent.
    pub fn file_read_failed(&mut self, error: &ClientError) {
        warn!(%error, "failed to read selected file");
        self.alert("An error occurred while reading the file.");
    }

    pub fn send_calculation(&mut self, expression: &str) {
        let expression = expression.trim();
        if expression.is_empty() {
            self.alert("Please enter a calculation.");
            return;
        }
        debug!(expression, "sending calculation request");
        self.send(ClientMessage::Calculate {
            calculation: expression.to_string(),
        });
        self.renderer
            .render(RenderCommand::ClearInput(InputField::Calculation));
    }

    pub fn create_room(&mut self, room_name: &str, passcode: &str) {
        let (room_name, passcode) = (room_name.trim(), passcode.trim());
        if room_name.is_empty() || passcode.is_empty() {
            // The modal stays open on validation failure.
            self.alert("Both room name and passcode are required.");
            return;
        }
        self.send(ClientMessage::CreateRoom {
            room_name: room_name.to_string(),
            passcode: passcode.to_string(),
        });
        // Dismissed on send, not on server acknowledgment.
        self.renderer
            .render(RenderCommand::CloseModal(Modal::CreateRoom));
    }

    pub fn join_room(&mut self, room_name: &str, passcode: &str) {
        let (room_name, passcode) = (room_name.trim(), passcode.trim());
        if room_name.is_empty() || passcode.is_empty() {
            self.alert("Both room name and passcode are required.");
            return;
        }
        self.send(ClientMessage::JoinRoom {
            room_name: room_name.to_string(),
            passcode: passcode.to_string(),
        });
        self.renderer
            .render(RenderCommand::CloseModal(Modal::JoinRoom));
    }

    /// Announces the departure and confirms it regardless of any server
    /// response. With no identity set, the username goes out empty.
    pub fn leave_room(&mut self) {
        let username = self.session.username().unwrap_or_default().to_string();
        self.send(ClientMessage::LeaveRoom { username });
        self.alert("You have left the current room and rejoined the main chat.");
    }

    pub fn set_font(&mut self, font: &str) {
        debug!(font, "selected font");
        self.session.set_font(font.to_string());
    }

    /// Dispatches one inbound text frame to the renderer. A malformed
    /// frame aborts processing of that frame only; the caller logs the
    /// error and keeps reading.
    pub fn handle_inbound(&mut self, text: &str) -> Result<(), ClientError> {
        match serde_json::from_str::<ServerMessage>(text)? {
            ServerMessage::Event(ServerEvent::CalculationResult { result }) => {
                self.renderer
                    .render(RenderCommand::AppendCalculationResult { result });
            }
            ServerMessage::Event(ServerEvent::FileResult {
                filename,
                content,
                download_url,
            }) => {
                self.renderer.render(RenderCommand::AppendFileResult {
                    filename,
                    content,
                    download_url,
                });
            }
            ServerMessage::Chat { username, message } => {
                let font = self.session.selected_font().to_string();
                self.renderer.render(RenderCommand::AppendChat {
                    username,
                    message,
                    font,
                });
            }
        }
        Ok(())
    }

    fn alert(&mut self, text: &str) {
        self.renderer.render(RenderCommand::Alert(text.to_string()));
    }

    fn send(&mut self, message: ClientMessage) {
        // The connection is never re-established; once the writer task
        // is gone the message is dropped.
        if self.outbound.send(message).is_err() {
            warn!("connection closed, dropping outbound message");
        }
    }
}
