//! One-shot question handler.

use anyhow::{Result, bail};
use std::io::{self, IsTerminal};

use super::chat::load_session_config;
use crate::chat::{ChatSession, print_answer};
use crate::config::ResolveOptions;
use crate::input::{InputReader, load_image};
use crate::ui::{Spinner, Style};

pub struct AskOptions {
    pub prompt: Vec<String>,
    pub image: Option<String>,
    pub provider: Option<String>,
    pub model: Option<String>,
    pub persona: Option<String>,
}

/// Asks a single question and prints the answer to stdout.
///
/// Returns the process exit code: `exitcode::OK` on an answer, otherwise
/// the code from [`crate::error::ChatError::exit_code`] after reporting it.
pub async fn run_ask(options: AskOptions) -> Result<exitcode::ExitCode> {
    let text = InputReader::read_prompt(&options.prompt)?;

    if text.is_empty() && options.image.is_none() {
        bail!(
            "Error: No question given\n\n\
             Usage:\n  \
             gmc \"your question\"\n  \
             echo \"your question\" | gmc\n  \
             gmc chat"
        );
    }
    if text.starts_with('/') {
        bail!("Error: Slash commands are only available in interactive mode (gmc chat)");
    }

    let config = load_session_config(&ResolveOptions {
        provider: options.provider,
        model: options.model,
        persona: options.persona,
    })?;
    let attachment = options.image.as_deref().map(load_image).transpose()?;
    if let (Some(path), Some(attachment)) = (&options.image, &attachment) {
        crate::info!(
            "{} {path} ({})",
            Style::secondary("Attached"),
            attachment.mime_type
        );
    }

    let mut session = ChatSession::new(config);

    let spinner = Spinner::new("Thinking...");
    let result = session.submit(&text, attachment.as_ref()).await;
    spinner.stop();

    match result {
        Ok(answer) => {
            if io::stdout().is_terminal() {
                print_answer(&answer);
            } else {
                println!("{answer}");
            }
            Ok(exitcode::OK)
        }
        Err(e) => {
            crate::warn!("{} {e}", Style::error("Error:"));
            Ok(e.exit_code())
        }
    }
}
