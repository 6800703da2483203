//! Chat mode UI components.

use crate::ui::Style;

use super::command::SLASH_COMMANDS;
use super::info::{ChangelogEntry, CreditLine};
use super::reminder::PendingReminder;
use super::render::render_answer;
use super::session::SessionConfig;

const VERSION: &str = env!("CARGO_PKG_VERSION");

pub fn print_header() {
    println!(
        "{} {} - Gemini Chat",
        Style::header("gmc"),
        Style::version(format!("v{VERSION}"))
    );
    println!();
}

pub fn print_goodbye() {
    println!("{}", Style::success("Goodbye!"));
}

pub fn print_config(config: &SessionConfig, persona: &str, turns: usize) {
    println!("{}", Style::header("Configuration"));
    println!(
        "  {}   {}",
        Style::label("provider"),
        Style::value(&config.provider_name)
    );
    println!(
        "  {}      {}",
        Style::label("model"),
        Style::value(&config.model)
    );
    if let Some(vision) = &config.vision_model {
        println!("  {}     {}", Style::label("vision"), Style::value(vision));
    }
    println!(
        "  {}    {}",
        Style::label("persona"),
        config
            .persona_name
            .as_deref()
            .map_or_else(|| Style::secondary("(custom)"), Style::value)
    );
    println!("  {}     {}", Style::label("prompt"), Style::secondary(persona));
    println!(
        "  {}   {}",
        Style::label("endpoint"),
        Style::secondary(&config.endpoint)
    );
    println!(
        "  {}    {}",
        Style::label("history"),
        Style::secondary(format!("{turns} exchanges"))
    );
    println!();
}

pub fn print_help() {
    println!("{}", Style::header("Available commands"));
    let width = SLASH_COMMANDS
        .iter()
        .map(|(cmd, _)| cmd.len())
        .max()
        .unwrap_or(0);
    for (cmd, desc) in SLASH_COMMANDS {
        println!(
            "  {}  {}",
            Style::command(format!("{cmd:width$}")),
            Style::secondary(desc)
        );
    }
    println!();
}

pub fn print_answer(text: &str) {
    let rendered = render_answer(text);
    println!("{}", rendered.trim_end());
    println!();
}

pub fn print_credits(credits: &[CreditLine]) {
    println!("{}", Style::header("Credits & Info"));
    for line in credits {
        println!(
            "  {}  {}",
            Style::label(format!("{:8}", line.label)),
            Style::value(line.value)
        );
    }
    println!();
}

pub fn print_changelog(changelog: &[ChangelogEntry]) {
    println!("{}", Style::header("What's new"));
    for entry in changelog {
        println!("  {}", Style::version(format!("v{}", entry.version)));
        for change in entry.changes {
            println!("    - {change}");
        }
    }
    println!();
}

pub fn print_success(message: &str) {
    println!("{} {message}", Style::success("✓"));
    println!();
}

pub fn print_reminder_scheduled(reminder: &PendingReminder) {
    print_success(&format!(
        "Reminder set for {}: {}",
        Style::value(reminder.fire_at.format("%Y-%m-%d %H:%M:%S")),
        reminder.text
    ));
}

pub fn print_reminder_pending(reminder: &PendingReminder) {
    println!(
        "  {}   {} at {}",
        Style::label("reminder"),
        reminder.text,
        Style::value(reminder.fire_at.format("%H:%M:%S"))
    );
    println!();
}

pub fn print_reminder_fired(reminder: &PendingReminder) {
    // The prompt line is active while timers fire, so start on a fresh line
    println!();
    println!("{} {}", Style::warning("⏰ Reminder:"), reminder.text);
}

pub fn print_blocked(message: &str) {
    eprintln!("{} {message}", Style::warning("Blocked:"));
    eprintln!();
}

pub fn print_error(message: &str) {
    eprintln!("{} {message}", Style::error("Error:"));
    eprintln!();
}
