use inquire::autocompletion::{Autocomplete, Replacement};

// Available slash commands: (command, description)
pub const SLASH_COMMANDS: &[(&str, &str)] = &[
    ("/ai", "Ask the AI (same as typing without a command)"),
    ("/ai2", "Set a reminder at a time of day"),
    ("/cancel", "Cancel the pending reminder"),
    ("/clear", "Start a new conversation"),
    ("/config", "Show current configuration"),
    ("/credits", "Show credits"),
    ("/help", "Show available commands"),
    ("/image", "Attach an image to the next message"),
    ("/infoupdate", "Show what's new"),
    ("/persona", "Change how the AI answers"),
    ("/quit", "Exit chat mode"),
];

/// Slash command autocompleter
#[derive(Clone, Default)]
pub struct SlashCommandCompleter;

impl Autocomplete for SlashCommandCompleter {
    fn get_suggestions(&mut self, input: &str) -> Result<Vec<String>, inquire::CustomUserError> {
        if !input.starts_with('/') || input.contains(char::is_whitespace) {
            return Ok(vec![]);
        }

        let suggestions: Vec<String> = SLASH_COMMANDS
            .iter()
            .filter(|(cmd, _)| cmd.starts_with(input))
            .map(|(cmd, desc)| format!("{cmd}  {desc}"))
            .collect();

        Ok(suggestions)
    }

    fn get_completion(
        &mut self,
        _input: &str,
        highlighted_suggestion: Option<String>,
    ) -> Result<Replacement, inquire::CustomUserError> {
        let replacement =
            highlighted_suggestion.map(|s| s.split_whitespace().next().unwrap_or("").to_string());
        Ok(replacement)
    }
}

/// Slash command types
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SlashCommand {
    Credits,
    Persona(String),
    InfoUpdate,
    Clear,
    Ai(String),
    Reminder(String),
    CancelReminder,
    Image(Option<String>),
    Config,
    Help,
    Quit,
    Unknown(String),
}

impl SlashCommand {
    /// Commands the interactive loop handles itself instead of the session.
    pub const fn is_local(&self) -> bool {
        matches!(
            self,
            Self::Image(_) | Self::Config | Self::Help | Self::Quit
        )
    }
}

/// Input types
#[derive(Debug, PartialEq, Eq)]
pub enum Input {
    Text(String),
    Command(SlashCommand),
    Empty,
}

pub fn parse_input(input: &str) -> Input {
    let input = input.trim();

    if input.is_empty() {
        return Input::Empty;
    }

    input.strip_prefix('/').map_or_else(
        || Input::Text(input.to_string()),
        |cmd| Input::Command(parse_slash_command(cmd)),
    )
}

/// Parses the text after the leading `/`.
///
/// The first whitespace-delimited token selects the command (case-sensitive);
/// the rest of the line, trimmed, is its argument.
pub fn parse_slash_command(cmd: &str) -> SlashCommand {
    let (name, rest) = cmd
        .split_once(char::is_whitespace)
        .map_or((cmd, ""), |(name, rest)| (name, rest.trim()));
    let arg = rest.to_string();

    match name {
        "credits" => SlashCommand::Credits,
        "persona" => SlashCommand::Persona(arg),
        "infoupdate" => SlashCommand::InfoUpdate,
        "clear" => SlashCommand::Clear,
        "ai" => SlashCommand::Ai(arg),
        "ai2" => SlashCommand::Reminder(arg),
        "cancel" => SlashCommand::CancelReminder,
        "image" => SlashCommand::Image((!arg.is_empty()).then_some(arg)),
        "config" => SlashCommand::Config,
        "help" => SlashCommand::Help,
        "quit" | "exit" | "q" => SlashCommand::Quit,
        _ => SlashCommand::Unknown(name.to_string()),
    }
}
