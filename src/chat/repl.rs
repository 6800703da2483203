use anyhow::Result;
use chrono::Local;
use inquire::ui::{Attributes, Color, RenderConfig, StyleSheet, Styled};
use inquire::{Confirm, Text};
use std::io::Write;
use std::sync::{Arc, Mutex, PoisonError};

use super::attachment::Attachment;
use super::command::{Input, SlashCommand, SlashCommandCompleter, parse_input};
use super::reminder::{PendingReminder, TimeOfDay};
use super::session::{ChatSession, CommandOutcome, SessionConfig, SessionEvent, SessionObserver};
use super::ui;
use crate::error::ChatError;
use crate::gemini::CompletionBackend;
use crate::input::load_image;
use crate::ui::{Spinner, Style, handle_prompt_cancellation, is_prompt_cancelled};

fn ring_bell() {
    let mut stdout = std::io::stdout();
    let _ = stdout.write_all(b"\x07");
    let _ = stdout.flush();
}

/// Renders session events on the terminal.
struct TerminalObserver {
    bell: bool,
    spinner: Mutex<Option<Spinner>>,
}

impl TerminalObserver {
    const fn new(bell: bool) -> Self {
        Self {
            bell,
            spinner: Mutex::new(None),
        }
    }

    fn set_spinner(&self, spinner: Option<Spinner>) {
        let mut slot = self.spinner.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(old) = slot.take() {
            old.stop();
        }
        *slot = spinner;
    }
}

impl SessionObserver for TerminalObserver {
    fn on_event(&self, event: &SessionEvent<'_>) {
        match event {
            SessionEvent::UserEcho { attachment, .. } => {
                let message = if attachment.is_some() {
                    "Looking at the image..."
                } else {
                    "Thinking..."
                };
                self.set_spinner(Some(Spinner::new(message)));
            }
            SessionEvent::AiText(text) => {
                self.set_spinner(None);
                ui::print_answer(text);
            }
            SessionEvent::AiBlocked(reason) => {
                self.set_spinner(None);
                let err = ChatError::Blocked {
                    reason: reason.map(str::to_string),
                };
                ui::print_blocked(&err.to_string());
            }
            SessionEvent::AiError(err) => {
                self.set_spinner(None);
                ui::print_error(&err.to_string());
            }
            SessionEvent::CommandResult(outcome) => print_outcome(outcome),
        }
    }

    fn on_complete(&self) {
        self.set_spinner(None);
        if self.bell {
            ring_bell();
        }
    }
}

fn print_outcome(outcome: &CommandOutcome) {
    match outcome {
        CommandOutcome::Answer(_) | CommandOutcome::ReminderRequested(_) => {}
        CommandOutcome::Credits(credits) => ui::print_credits(credits),
        CommandOutcome::InfoUpdate(changelog) => ui::print_changelog(changelog),
        CommandOutcome::PersonaChanged(persona) => {
            ui::print_success(&format!("Persona set to: {}", Style::value(persona)));
        }
        CommandOutcome::Cleared { removed } => {
            ui::print_success(&format!("Conversation cleared ({removed} messages removed)"));
        }
        CommandOutcome::ReminderScheduled(reminder) => ui::print_reminder_scheduled(reminder),
        CommandOutcome::ReminderCancelled(Some(reminder)) => {
            ui::print_success(&format!("Reminder cancelled: {}", reminder.text));
        }
        CommandOutcome::ReminderCancelled(None) => {
            println!("{}", Style::hint("No reminder is pending."));
            println!();
        }
        CommandOutcome::Unknown(name) => ui::print_error(&format!("Unknown command: /{name}")),
    }
}

/// Interactive read-eval-print loop around a [`ChatSession`].
pub struct ChatRepl<B: CompletionBackend> {
    session: ChatSession<B>,
    staged: Option<Attachment>,
}

impl ChatRepl<crate::gemini::GeminiClient> {
    /// Creates a REPL talking to the configured endpoint.
    pub fn new(config: SessionConfig) -> Self {
        Self::from_session(ChatSession::new(config))
    }
}

impl<B: CompletionBackend> ChatRepl<B> {
    /// Wires terminal rendering and reminder notifications into `session`.
    pub fn from_session(session: ChatSession<B>) -> Self {
        let bell = session.config().bell;
        let session = session
            .with_observer(Box::new(TerminalObserver::new(bell)))
            .with_reminder_notifier(Arc::new(move |reminder: &PendingReminder| {
                ui::print_reminder_fired(reminder);
                if bell {
                    ring_bell();
                }
            }));

        Self {
            session,
            staged: None,
        }
    }

    /// Runs the interactive chat loop.
    pub async fn run(&mut self) -> Result<()> {
        ui::print_header();

        let prompt_style = Styled::new("❯")
            .with_fg(Color::LightBlue)
            .with_attr(Attributes::BOLD);
        let mut render_config = RenderConfig::default()
            .with_prompt_prefix(prompt_style)
            .with_answered_prompt_prefix(prompt_style);

        // Non-highlighted suggestions: gray
        render_config.option = StyleSheet::new().with_fg(Color::Grey);
        // Highlighted suggestion: purple
        render_config.selected_option = Some(StyleSheet::new().with_fg(Color::DarkMagenta));

        loop {
            let help = if self.staged.is_some() {
                "Image attached. Type a message to send it, /image to remove"
            } else {
                "Type a message, /help for commands, Ctrl+C to quit"
            };
            let input = Text::new("")
                .with_render_config(render_config)
                .with_autocomplete(SlashCommandCompleter)
                .with_help_message(help)
                .prompt();

            match input {
                Ok(line) => {
                    if !self.dispatch(&line).await? {
                        break;
                    }
                }
                Err(e) if is_prompt_cancelled(&e) => {
                    println!(); // Clear line before goodbye message
                    break;
                }
                Err(e) => return Err(e.into()),
            }
        }

        if self.session.cancel_reminder().is_some() {
            log::debug!("dropped pending reminder on exit");
        }
        ui::print_goodbye();
        Ok(())
    }

    /// Handles one line. Returns `false` when the user asked to quit.
    async fn dispatch(&mut self, line: &str) -> Result<bool> {
        match parse_input(line) {
            Input::Empty => {
                if self.staged.is_some() {
                    self.send("").await;
                }
            }
            Input::Text(text) | Input::Command(SlashCommand::Ai(text)) => self.send(&text).await,
            Input::Command(cmd) if cmd.is_local() => return Ok(self.handle_local(cmd)),
            Input::Command(cmd) => {
                // Failures were already rendered by the observer
                if let Ok(CommandOutcome::ReminderRequested(text)) =
                    self.session.run_command(cmd, None).await
                {
                    handle_prompt_cancellation(|| self.prompt_reminder(&text))?;
                }
            }
        }
        Ok(true)
    }

    async fn send(&mut self, text: &str) {
        let attachment = self.staged.take();
        let result = self.session.submit(text, attachment.as_ref()).await;

        // A rejected message keeps the image for the next attempt
        if matches!(result, Err(ChatError::Validation(_))) {
            self.staged = attachment;
        }
    }

    fn handle_local(&mut self, cmd: SlashCommand) -> bool {
        match cmd {
            SlashCommand::Image(Some(path)) => self.stage_image(&path),
            SlashCommand::Image(None) => {
                if self.staged.take().is_some() {
                    ui::print_success("Attachment removed");
                } else {
                    println!("{}", Style::hint("Usage: /image <path>"));
                    println!();
                }
            }
            SlashCommand::Config => {
                ui::print_config(
                    self.session.config(),
                    self.session.persona(),
                    self.session.history().exchanges(),
                );
                if let Some(reminder) = self.session.pending_reminder() {
                    ui::print_reminder_pending(&reminder);
                }
            }
            SlashCommand::Help => ui::print_help(),
            SlashCommand::Quit => return false,
            _ => {}
        }
        true
    }

    fn stage_image(&mut self, path: &str) {
        let attachment = match load_image(path) {
            Ok(attachment) => attachment,
            Err(e) => {
                ui::print_error(&e.to_string());
                return;
            }
        };
        if let Err(e) = attachment.validate() {
            ui::print_error(&e.to_string());
            return;
        }

        ui::print_success(&format!(
            "Attached {} ({:.1} KB), sent with your next message",
            Style::value(path),
            attachment.decoded_len() as f64 / 1024.0
        ));
        self.staged = Some(attachment);
    }

    /// Asks for the time of a reminder whose text is already known.
    fn prompt_reminder(&mut self, text: &str) -> Result<()> {
        let hour = Text::new("Hour (0-23):").prompt()?;
        let minute = Text::new("Minute (0-59):").with_default("0").prompt()?;
        let second = Text::new("Second (0-59):").with_default("0").prompt()?;

        let time = match TimeOfDay::from_parts(&hour, &minute, &second) {
            Ok(time) => time,
            Err(e) => {
                ui::print_error(&e.to_string());
                return Ok(());
            }
        };

        let confirmed = Confirm::new(&format!("Remind you at {time}: \"{text}\"?"))
            .with_default(true)
            .prompt()?;
        if !confirmed {
            println!("{}", Style::hint("Reminder not scheduled."));
            println!();
            return Ok(());
        }

        match self
            .session
            .schedule_reminder(text, time, Local::now().naive_local())
        {
            Ok(reminder) => ui::print_reminder_scheduled(&reminder),
            Err(e) => ui::print_error(&e.to_string()),
        }
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn config() -> SessionConfig {
        SessionConfig {
            provider_name: "gemini".to_string(),
            endpoint: "http://127.0.0.1:9".to_string(),
            model: "gemini-2.5-flash".to_string(),
            vision_model: None,
            api_key: None,
            persona_name: None,
            persona: String::new(),
            bell: false,
        }
    }

    #[tokio::test]
    async fn test_local_commands_do_not_reach_the_session() {
        let mut repl = ChatRepl::new(config());

        assert!(repl.dispatch("/help").await.unwrap());
        assert!(!repl.dispatch("/quit").await.unwrap());
        assert!(repl.session.history().is_empty());
    }

    #[tokio::test]
    async fn test_empty_line_without_image_is_ignored() {
        let mut repl = ChatRepl::new(config());
        assert!(repl.dispatch("   ").await.unwrap());
        assert!(repl.session.history().is_empty());
    }

    #[tokio::test]
    async fn test_missing_image_is_not_staged() {
        let mut repl = ChatRepl::new(config());
        repl.dispatch("/image /nonexistent/cat.png").await.unwrap();
        assert!(repl.staged.is_none());
    }

    #[tokio::test]
    async fn test_image_without_path_unstages() {
        let mut repl = ChatRepl::new(config());
        repl.staged = Some(Attachment::from_bytes("image/png", b"png"));

        repl.dispatch("/image").await.unwrap();
        assert!(repl.staged.is_none());
    }

    #[tokio::test]
    async fn test_scheduled_reminder_is_pending() {
        let mut repl = ChatRepl::new(config());
        repl.dispatch("/ai2 23:59:59 stretch").await.unwrap();

        let reminder = repl.session.pending_reminder().unwrap();
        assert_eq!(reminder.text, "stretch");

        repl.dispatch("/cancel").await.unwrap();
        assert!(repl.session.pending_reminder().is_none());
    }
}
