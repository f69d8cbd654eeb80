use std::io::Write;
use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use rustyline::DefaultEditor;
use rustyline::error::ReadlineError;

use crate::chat::{ChatMessage, ChatSession, ChatView, Sender};
use crate::core::AppConfig;
use crate::gemini::Source;

static BOLD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\*\*(.*?)\*\*").expect("Invalid bold regex"));

/// Turn `**bold**` spans into ANSI bold for the terminal.
pub fn render_bold(text: &str) -> String {
    BOLD.replace_all(text, "\x1b[1m$1\x1b[0m").into_owned()
}

/// List the pages the model cited under its reply.
pub fn render_sources(sources: &[Source]) -> String {
    let mut out = String::from("Sources:");
    for source in sources {
        out.push_str(&format!("\n  - {} <{}>", source.label(), source.uri));
    }
    out
}

/// Prints the conversation to stdout. Input comes from the readline
/// loop and is handed over with `set_input`.
#[derive(Default)]
pub struct TerminalView {
    input: String,
}

impl TerminalView {
    pub fn set_input(&mut self, line: &str) {
        self.input = line.to_string();
    }
}

impl ChatView for TerminalView {
    fn append_message(&mut self, msg: &ChatMessage, sources: &[Source]) {
        // The user's own line is already on screen
        if msg.sender == Sender::User {
            return;
        }
        println!("{}", render_bold(&msg.text));
        if !sources.is_empty() {
            println!("{}", render_sources(sources));
        }
    }

    fn set_loading(&mut self, loading: bool) {
        if loading {
            print!("...");
        } else {
            // Erase the loading dots
            print!("\r\x1b[2K");
        }
        if let Err(e) = std::io::stdout().flush() {
            tracing::debug!("Failed to flush stdout: {}", e);
        }
    }

    fn read_input(&self) -> String {
        self.input.clone()
    }

    fn clear_input(&mut self) {
        self.input.clear();
    }
}

pub async fn run(config: AppConfig) -> Result<()> {
    let mut rl = DefaultEditor::new()?;
    let mut session = ChatSession::new(config.chat_client(), TerminalView::default());

    loop {
        let readline = rl.readline(">>> ");
        match readline {
            Ok(line) => {
                if !line.trim().is_empty() {
                    let _ = rl.add_history_entry(line.as_str());
                }
                session.view_mut().set_input(&line);
                session.handle_send().await;
            }
            Err(ReadlineError::Interrupted) => break,
            Err(ReadlineError::Eof) => break,
            Err(err) => {
                println!("Error: {:?}", err);
                break;
            }
        }
    }

    tracing::debug!(
        "Chat ended after {} message(s)",
        session.transcript().len()
    );

    Ok(())
}
