// src/main.rs

mod connection;
mod dispatch;
mod error;
mod models;
mod render;
mod session;

use clap::Parser;
use dispatch::{Dispatcher, FileSelection};
use error::ClientError;
use render::{Renderer, TerminalRenderer};
use session::Session;
use std::path::Path;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Terminal chat client: one WebSocket to the chat server, slash
/// commands for everything beyond plain chat messages.
#[derive(Parser, Debug)]
#[command(name = "chat_client")]
struct Args {
    /// WebSocket address of the chat server.
    #[arg(long, default_value = "ws://localhost:8080/ws")]
    url: String,

    /// Join with this username immediately instead of picking one with /user.
    #[arg(long)]
    username: Option<String>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}

/// The main entry point for our application.
#[tokio::main]
async fn main() -> Result<(), ClientError> {
    init_tracing();
    let args = Args::parse();

    let mut connection = connection::connect(&args.url).await?;
    let mut dispatcher = Dispatcher::new(
        Session::new(),
        connection.outbound.clone(),
        TerminalRenderer,
    );

    if let Some(username) = &args.username {
        dispatcher.set_username(username);
    }

    println!(
        "Commands: /user <name>, /calc <expr>, /upload <path>, /create <room> <passcode>, \
         /join <room> <passcode>, /leave, /font <font>. Anything else is sent as chat."
    );

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut inbound_open = true;

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => handle_line(&mut dispatcher, &line).await,
                Ok(None) => break, // stdin closed
                Err(e) => {
                    warn!("failed to read input: {e}");
                    break;
                }
            },
            frame = connection.inbound.recv(), if inbound_open => match frame {
                Some(text) => {
                    // A malformed frame is dropped; the loop keeps reading.
                    if let Err(e) = dispatcher.handle_inbound(&text) {
                        warn!("dropping inbound frame: {e}");
                    }
                }
                None => {
                    // Terminal state: the socket never reopens. Input is
                    // still taken, later sends are dropped.
                    info!("server connection closed");
                    inbound_open = false;
                }
            },
        }
    }

    Ok(())
}

/// Routes one input line: slash commands map to dispatcher operations,
/// anything else goes out as chat. Blank lines are ignored.
async fn handle_line<R: Renderer>(dispatcher: &mut Dispatcher<R>, line: &str) {
    if line.trim().is_empty() {
        return;
    }
    if !line.starts_with('/') {
        dispatcher.send_message(line);
        return;
    }

    let (command, rest) = match line.split_once(' ') {
        Some((command, rest)) => (command, rest.trim()),
        None => (line, ""),
    };

    match command {
        "/user" => dispatcher.set_username(rest),
        "/calc" => dispatcher.send_calculation(rest),
        "/upload" => {
            if rest.is_empty() {
                dispatcher.upload_file(None);
            } else {
                match read_file_selection(rest).await {
                    Ok(selection) => dispatcher.upload_file(Some(selection)),
                    Err(e) => dispatcher.file_read_failed(&e),
                }
            }
        }
        "/create" => {
            let (room_name, passcode) = rest.split_once(' ').unwrap_or((rest, ""));
            dispatcher.create_room(room_name, passcode);
        }
        "/join" => {
            let (room_name, passcode) = rest.split_once(' ').unwrap_or((rest, ""));
            dispatcher.join_room(room_name, passcode);
        }
        "/leave" => dispatcher.leave_room(),
        "/font" => dispatcher.set_font(rest),
        other => warn!("unknown command: {other}"),
    }
}

/// Buffers the whole file into memory before sending, so the byte array
/// goes out as one message.
async fn read_file_selection(path: &str) -> Result<FileSelection, ClientError> {
    let data = tokio::fs::read(path).await?;
    let filename = Path::new(path)
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or(path)
        .to_string();
    Ok(FileSelection { filename, data })
}
