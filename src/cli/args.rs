use clap::{Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(name = "gmc")]
#[command(about = "Chat with Google Gemini from the terminal")]
#[command(version)]
pub struct Args {
    /// Question to ask (reads from stdin if not provided)
    pub prompt: Vec<String>,

    /// Image file to send along with the prompt
    #[arg(short = 'i', long)]
    pub image: Option<String>,

    /// Provider name (from config.toml, or the built-in "gemini")
    #[arg(short = 'p', long)]
    pub provider: Option<String>,

    /// Model name
    #[arg(short = 'm', long)]
    pub model: Option<String>,

    /// Persona key or free-text system instruction
    #[arg(long)]
    pub persona: Option<String>,

    /// Suppress status output
    #[arg(short = 'q', long, global = true)]
    pub quiet: bool,

    /// Disable colored output (also honours NO_COLOR)
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Interactive chat with slash commands
    Chat {
        /// Provider name
        #[arg(short = 'p', long)]
        provider: Option<String>,

        /// Model name
        #[arg(short = 'm', long)]
        model: Option<String>,

        /// Persona key or free-text system instruction
        #[arg(long)]
        persona: Option<String>,
    },
    /// List configured providers
    Providers {
        /// Show details for a specific provider
        provider: Option<String>,
    },
    /// List or show personas
    Personas {
        #[command(subcommand)]
        command: Option<PersonasCommand>,
    },
    /// Configure gmc defaults
    Configure {
        /// Show current configuration
        #[arg(long)]
        show: bool,
    },
}

#[derive(Subcommand, Debug)]
pub enum PersonasCommand {
    /// Show a persona's system instruction
    Show {
        /// Persona key
        key: String,
    },
}
