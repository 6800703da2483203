use anyhow::Result;
use clap::Parser;

use gmc_cli::cli::commands::{ask, chat, configure, personas, providers};
use gmc_cli::cli::{Args, Command, PersonasCommand};
use gmc_cli::output::{self, OutputConfig};

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let args = Args::parse();

    output::init(OutputConfig {
        quiet: args.quiet,
        no_color: args.no_color || std::env::var_os("NO_COLOR").is_some(),
    });

    match args.command {
        Some(Command::Providers { provider }) => {
            providers::print_providers(provider.as_deref())?;
        }
        Some(Command::Personas { command }) => match command {
            Some(PersonasCommand::Show { key }) => personas::show_persona(&key)?,
            None => personas::list_personas()?,
        },
        Some(Command::Configure { show }) => {
            configure::run_configure(show)?;
        }
        Some(Command::Chat {
            provider,
            model,
            persona,
        }) => {
            let options = chat::ChatOptions {
                provider: provider.or(args.provider),
                model: model.or(args.model),
                persona: persona.or(args.persona),
            };
            chat::run_chat(options).await?;
        }
        None => {
            let options = ask::AskOptions {
                prompt: args.prompt,
                image: args.image,
                provider: args.provider,
                model: args.model,
                persona: args.persona,
            };
            let code = ask::run_ask(options).await?;
            if code != exitcode::OK {
                std::process::exit(code);
            }
        }
    }

    Ok(())
}
