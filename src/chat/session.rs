use chrono::{Local, NaiveDateTime};
use std::sync::Arc;

use super::attachment::Attachment;
use super::command::{Input, SlashCommand, parse_input};
use super::history::History;
use super::info::{CHANGELOG, CREDITS, ChangelogEntry, CreditLine};
use super::reminder::{PendingReminder, ReminderNotifier, ReminderScheduler, TimeOfDay};
use crate::error::{ChatError, ValidationError};
use crate::gemini::{
    Completion, CompletionBackend, GeminiClient, GenerateContentRequest, Message, Part, Role,
};

/// Configuration for a chat session.
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// The provider name.
    pub provider_name: String,
    /// The API endpoint URL.
    pub endpoint: String,
    /// The model used for text-only turns.
    pub model: String,
    /// The model used when an image is attached (falls back to `model`).
    pub vision_model: Option<String>,
    /// The API key (if required).
    pub api_key: Option<String>,
    /// The persona key it was resolved from (for display).
    pub persona_name: Option<String>,
    /// The initial system instruction.
    pub persona: String,
    /// Ring the terminal bell when an answer arrives.
    pub bell: bool,
}

/// Something the rendering layer should show.
#[derive(Debug)]
pub enum SessionEvent<'a> {
    UserEcho {
        text: &'a str,
        attachment: Option<&'a Attachment>,
    },
    AiText(&'a str),
    AiBlocked(Option<&'a str>),
    AiError(&'a ChatError),
    CommandResult(&'a CommandOutcome),
}

/// Receives session events. Both hooks default to doing nothing.
pub trait SessionObserver: Send + Sync {
    fn on_event(&self, _event: &SessionEvent<'_>) {}

    /// Called once per submission, whatever its outcome.
    fn on_complete(&self) {}
}

struct NoopObserver;

impl SessionObserver for NoopObserver {}

/// Result of an input that did not fail.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Text answer from the model.
    Answer(String),
    Credits(&'static [CreditLine]),
    PersonaChanged(String),
    InfoUpdate(&'static [ChangelogEntry]),
    Cleared { removed: usize },
    /// `/ai2` without a time: the caller should ask for one.
    ReminderRequested(String),
    ReminderScheduled(PendingReminder),
    ReminderCancelled(Option<PendingReminder>),
    Unknown(String),
}

const PERSONA_USAGE: &str = "/persona <description>";
const REMINDER_USAGE: &str = "/ai2 [HH:MM[:SS]] <text>";

/// Conversation state plus the backend it talks to.
///
/// `submit` takes `&mut self`, so a session never has two requests in flight.
pub struct ChatSession<B = GeminiClient> {
    config: SessionConfig,
    backend: B,
    history: History,
    persona: String,
    reminders: ReminderScheduler,
    observer: Box<dyn SessionObserver>,
}

impl ChatSession<GeminiClient> {
    /// Creates a new chat session talking to the configured endpoint.
    pub fn new(config: SessionConfig) -> Self {
        let client = GeminiClient::new(config.endpoint.clone(), config.api_key.clone());
        Self::with_backend(config, client)
    }
}

impl<B: CompletionBackend> ChatSession<B> {
    pub fn with_backend(config: SessionConfig, backend: B) -> Self {
        let persona = config.persona.clone();
        Self {
            config,
            backend,
            history: History::new(),
            persona,
            reminders: ReminderScheduler::new(Arc::new(|r: &PendingReminder| {
                log::info!("reminder: {}", r.text);
            })),
            observer: Box::new(NoopObserver),
        }
    }

    #[must_use]
    pub fn with_observer(mut self, observer: Box<dyn SessionObserver>) -> Self {
        self.observer = observer;
        self
    }

    /// Replaces the callback invoked when a reminder fires.
    #[must_use]
    pub fn with_reminder_notifier(mut self, notifier: ReminderNotifier) -> Self {
        self.reminders = ReminderScheduler::new(notifier);
        self
    }

    pub const fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub const fn history(&self) -> &History {
        &self.history
    }

    pub fn persona(&self) -> &str {
        &self.persona
    }

    pub fn pending_reminder(&self) -> Option<PendingReminder> {
        self.reminders.pending()
    }

    /// Model used for a turn, depending on whether it carries an image.
    pub fn model_for(&self, with_attachment: bool) -> &str {
        if with_attachment {
            self.config
                .vision_model
                .as_deref()
                .unwrap_or(&self.config.model)
        } else {
            &self.config.model
        }
    }

    /// Routes one line of user input.
    ///
    /// Slash commands are handled locally; anything else goes to the model.
    pub async fn handle_input(
        &mut self,
        raw: &str,
        attachment: Option<&Attachment>,
    ) -> Result<CommandOutcome, ChatError> {
        match parse_input(raw) {
            Input::Empty => self
                .submit("", attachment)
                .await
                .map(CommandOutcome::Answer),
            Input::Text(text) => self
                .submit(&text, attachment)
                .await
                .map(CommandOutcome::Answer),
            Input::Command(command) => self.run_command(command, attachment).await,
        }
    }

    /// Sends `text` (and an optional image) with the conversation so far.
    ///
    /// History only grows when the model returns a usable answer; blocked
    /// and failed exchanges leave it as it was.
    pub async fn submit(
        &mut self,
        text: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, ChatError> {
        let result = self.exchange(text.trim(), attachment).await;

        match &result {
            Ok(answer) => self.emit(&SessionEvent::AiText(answer)),
            Err(ChatError::Blocked { reason }) => {
                self.emit(&SessionEvent::AiBlocked(reason.as_deref()));
            }
            Err(e) => self.emit(&SessionEvent::AiError(e)),
        }
        self.observer.on_complete();

        result
    }

    async fn exchange(
        &mut self,
        text: &str,
        attachment: Option<&Attachment>,
    ) -> Result<String, ChatError> {
        if let Some(attachment) = attachment {
            attachment.validate()?;
        } else if text.is_empty() {
            return Err(ValidationError::EmptyInput.into());
        }

        self.emit(&SessionEvent::UserEcho { text, attachment });

        let mut parts = Vec::with_capacity(2);
        if !text.is_empty() {
            parts.push(Part::text(text));
        }
        if let Some(attachment) = attachment {
            parts.push(attachment.to_part());
        }

        let mut request = GenerateContentRequest::new(
            self.history.messages(),
            Message::new(Role::User, parts),
            Some(&self.persona),
        );
        let model = self.model_for(attachment.is_some()).to_string();

        let response = self.backend.generate(&model, &request).await?;

        match response.into_completion() {
            Completion::Text(answer) => {
                if let Some(user) = request.contents.pop() {
                    self.history
                        .push_exchange(user, Message::model_text(answer.clone()));
                }
                Ok(answer)
            }
            Completion::Blocked(reason) => Err(ChatError::Blocked { reason }),
        }
    }

    /// Executes a parsed slash command.
    ///
    /// Interactive-only commands (`/help`, `/image`, ...) have no meaning
    /// here and come back as [`CommandOutcome::Unknown`].
    pub async fn run_command(
        &mut self,
        command: SlashCommand,
        attachment: Option<&Attachment>,
    ) -> Result<CommandOutcome, ChatError> {
        let result = match command {
            SlashCommand::Ai(text) => {
                return self
                    .submit(&text, attachment)
                    .await
                    .map(CommandOutcome::Answer);
            }
            SlashCommand::Credits => Ok(CommandOutcome::Credits(CREDITS)),
            SlashCommand::InfoUpdate => Ok(CommandOutcome::InfoUpdate(CHANGELOG)),
            SlashCommand::Persona(description) => self.set_persona(&description),
            SlashCommand::Clear => Ok(CommandOutcome::Cleared {
                removed: self.history.clear(),
            }),
            SlashCommand::Reminder(arg) => self.reminder_command(&arg),
            SlashCommand::CancelReminder => {
                Ok(CommandOutcome::ReminderCancelled(self.cancel_reminder()))
            }
            SlashCommand::Unknown(name) => Ok(CommandOutcome::Unknown(name)),
            SlashCommand::Image(_) => Ok(CommandOutcome::Unknown("image".to_string())),
            SlashCommand::Config => Ok(CommandOutcome::Unknown("config".to_string())),
            SlashCommand::Help => Ok(CommandOutcome::Unknown("help".to_string())),
            SlashCommand::Quit => Ok(CommandOutcome::Unknown("quit".to_string())),
        };

        match &result {
            Ok(outcome) => self.emit(&SessionEvent::CommandResult(outcome)),
            Err(e) => self.emit(&SessionEvent::AiError(e)),
        }
        result
    }

    fn set_persona(&mut self, description: &str) -> Result<CommandOutcome, ChatError> {
        let description = description.trim();
        if description.is_empty() {
            return Err(ValidationError::MissingArgument {
                usage: PERSONA_USAGE,
            }
            .into());
        }

        self.persona = description.to_string();
        Ok(CommandOutcome::PersonaChanged(self.persona.clone()))
    }

    fn reminder_command(&mut self, arg: &str) -> Result<CommandOutcome, ChatError> {
        let arg = arg.trim();
        if arg.is_empty() {
            return Err(ValidationError::MissingArgument {
                usage: REMINDER_USAGE,
            }
            .into());
        }

        let (first, rest) = arg
            .split_once(char::is_whitespace)
            .map_or((arg, ""), |(first, rest)| (first, rest.trim()));

        // A token with a colon is a time, even when it is out of range
        if !first.contains(':') {
            return Ok(CommandOutcome::ReminderRequested(arg.to_string()));
        }

        let time = first.parse::<TimeOfDay>()?;
        let reminder = self.schedule_reminder(rest, time, Local::now().naive_local())?;
        Ok(CommandOutcome::ReminderScheduled(reminder))
    }

    /// Schedules a reminder for the next occurrence of `time` after `now`.
    ///
    /// Replaces any reminder that is still pending.
    pub fn schedule_reminder(
        &mut self,
        text: &str,
        time: TimeOfDay,
        now: NaiveDateTime,
    ) -> Result<PendingReminder, ChatError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(ValidationError::MissingArgument {
                usage: REMINDER_USAGE,
            }
            .into());
        }

        Ok(self.reminders.schedule(text.to_string(), time, now))
    }

    /// Cancels the pending reminder and its timer.
    pub fn cancel_reminder(&mut self) -> Option<PendingReminder> {
        self.reminders.cancel()
    }

    fn emit(&self, event: &SessionEvent<'_>) {
        self.observer.on_event(event);
    }
}
