// src/render.rs

use tracing::debug;

/// The two room dialogs the dispatcher can dismiss.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Modal {
    CreateRoom,
    JoinRoom,
}

/// Input fields the dispatcher clears after a successful send.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputField {
    Message,
    Calculation,
}

/// A display action emitted by the dispatcher.
///
/// The dispatcher never touches the screen itself; it emits these and a
/// `Renderer` turns them into output. Appended entries go to an
/// append-only log that stays scrolled to the newest entry.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderCommand {
    /// Blocking user-facing warning.
    Alert(String),
    /// Chat entry attributed to a sender, styled with the font selected
    /// at the time the entry arrived. Embedded newlines become visible
    /// line separators.
    AppendChat {
        username: String,
        message: String,
        font: String,
    },
    AppendCalculationResult {
        result: String,
    },
    /// Processed-file content plus a download affordance.
    AppendFileResult {
        filename: String,
        content: String,
        download_url: String,
    },
    HideUsernamePrompt,
    CloseModal(Modal),
    ClearInput(InputField),
}

/// Consumes render commands. Implemented by the terminal renderer here
/// and by recording renderers in tests.
pub trait Renderer {
    fn render(&mut self, command: RenderCommand);
}

/// Renders the chat log to stdout.
///
/// Commands that only make sense for a windowed surface (hiding the
/// username prompt, dismissing modals, clearing inputs) have no terminal
/// counterpart and are logged at debug level.
pub struct TerminalRenderer;

impl Renderer for TerminalRenderer {
    fn render(&mut self, command: RenderCommand) {
        match command {
            RenderCommand::Alert(text) => println!("[!] {text}"),
            RenderCommand::AppendChat {
                username, message, ..
            } => {
                for line in chat_lines(&username, &message) {
                    println!("{line}");
                }
            }
            RenderCommand::AppendCalculationResult { result } => {
                println!("Calculator result: {result}");
            }
            RenderCommand::AppendFileResult {
                filename,
                content,
                download_url,
            } => {
                println!("Modified file content:");
                for line in content.split('\n') {
                    println!("{line}");
                }
                println!("Download modified file {filename}: {download_url}");
            }
            other => debug!(?other, "no terminal counterpart for render command"),
        }
    }
}

/// Splits a chat entry into display lines: the first line carries the
/// sender attribution, each embedded newline starts a new line, order
/// and content preserved.
pub fn chat_lines(username: &str, message: &str) -> Vec<String> {
    let mut lines = message.split('\n');
    let mut out = Vec::new();
    if let Some(first) = lines.next() {
        out.push(format!("{username}: {first}"));
    }
    out.extend(lines.map(str::to_string));
    out
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::{RenderCommand, Renderer};
    use std::cell::RefCell;
    use std::rc::Rc;

    /// Records every command for later assertions. Cloning shares the
    /// underlying buffer so tests can keep a handle after handing the
    /// renderer to a dispatcher.
    #[derive(Clone, Default)]
    pub struct RecordingRenderer {
        pub commands: Rc<RefCell<Vec<RenderCommand>>>,
    }

    impl RecordingRenderer {
        pub fn snapshot(&self) -> Vec<RenderCommand> {
            self.commands.borrow().clone()
        }
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, command: RenderCommand) {
            self.commands.borrow_mut().push(command);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn multi_line_message_becomes_separate_display_lines() {
        let lines = chat_lines("alice", "first\nsecond\nthird");
        assert_eq!(lines, vec!["alice: first", "second", "third"]);
    }

    #[test]
    fn single_line_message_keeps_attribution() {
        assert_eq!(chat_lines("alice", "hi"), vec!["alice: hi"]);
    }

    #[test]
    fn empty_message_still_renders_an_entry() {
        assert_eq!(chat_lines("alice", ""), vec!["alice: "]);
    }
}
