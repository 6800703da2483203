//! Interactive Gemini chat.
//!
//! [`ChatSession`] owns the conversation and talks to the backend;
//! [`ChatRepl`] puts a terminal prompt in front of it.

mod attachment;
/// Slash command parsing and autocomplete.
pub mod command;
mod history;
mod info;
mod reminder;
/// Terminal rendering of model answers.
pub mod render;
mod repl;
mod session;
mod ui;

pub use attachment::{Attachment, MAX_ATTACHMENT_BYTES};
pub use history::History;
pub use info::{CHANGELOG, CREDITS, ChangelogEntry, CreditLine};
pub use reminder::{
    PendingReminder, ReminderNotifier, ReminderScheduler, TimeOfDay, delay_until,
    next_occurrence,
};
pub use repl::ChatRepl;
pub use session::{
    ChatSession, CommandOutcome, SessionConfig, SessionEvent, SessionObserver,
};
pub use ui::print_answer;
