//! Configure command handler for editing default settings.

use anyhow::{Result, bail};
use inquire::{Confirm, Select, Text};

use crate::config::{
    ConfigFile, ConfigManager, DEFAULT_MODEL, DEFAULT_PROVIDER, GmcConfig, ProviderConfig,
};
use crate::persona::{DEFAULT_PERSONA, PRESETS, sorted_custom_keys};
use crate::ui::{Style, handle_prompt_cancellation};

/// Runs the configure command.
///
/// With `show`, prints the current defaults. Otherwise asks for the default
/// provider, model, persona and bell setting and saves them.
pub fn run_configure(show: bool) -> Result<()> {
    if show {
        let manager = ConfigManager::new()?;
        let config = manager.load_or_default()?;
        print_current_defaults(&config);
        println!(
            "{} {}",
            Style::label("file"),
            Style::secondary(manager.config_path().display())
        );
        return Ok(());
    }
    handle_prompt_cancellation(run_configure_inner)
}

fn run_configure_inner() -> Result<()> {
    let manager = ConfigManager::new()?;
    let mut config = manager.load_or_default()?;

    print_current_defaults(&config);

    let mut provider_names: Vec<String> = config.providers.keys().cloned().collect();
    if !config.providers.contains_key(DEFAULT_PROVIDER) {
        provider_names.push(DEFAULT_PROVIDER.to_string());
    }
    provider_names.sort();

    let provider = select_provider(&provider_names, config.gmc.provider.as_deref())?;

    let available_models = config
        .provider(&provider)
        .map(|p: ProviderConfig| p.models)
        .unwrap_or_default();
    let model = select_model(&available_models, config.gmc.model.as_deref())?;

    let persona = select_persona(&config, config.gmc.persona.as_deref())?;

    let bell = Confirm::new("Ring the terminal bell when an answer arrives?")
        .with_default(config.gmc.bell.unwrap_or(true))
        .prompt()?;

    config.gmc = GmcConfig {
        provider: Some(provider),
        model: Some(model),
        vision_model: config.gmc.vision_model.take(),
        persona,
        bell: Some(bell),
    };

    manager.save(&config)?;

    crate::status!();
    crate::status!(
        "{} Configuration saved to {}",
        Style::success("✓"),
        Style::secondary(manager.config_path().display().to_string())
    );

    Ok(())
}

fn print_current_defaults(config: &ConfigFile) {
    let or_unset =
        |value: Option<&str>| value.map_or_else(|| Style::secondary("(not set)"), Style::value);

    println!("{}", Style::header("Current defaults"));
    println!(
        "  {}  {}",
        Style::label("provider"),
        or_unset(config.gmc.provider.as_deref())
    );
    println!(
        "  {}     {}",
        Style::label("model"),
        or_unset(config.gmc.model.as_deref())
    );
    println!(
        "  {}    {}",
        Style::label("vision"),
        or_unset(config.gmc.vision_model.as_deref())
    );
    println!(
        "  {}   {}",
        Style::label("persona"),
        or_unset(config.gmc.persona.as_deref())
    );
    println!(
        "  {}      {}",
        Style::label("bell"),
        config
            .gmc
            .bell
            .map_or_else(|| Style::secondary("(not set)"), Style::value)
    );
    println!();
}

fn select_provider(providers: &[String], default: Option<&str>) -> Result<String> {
    let default_index = default
        .and_then(|d| providers.iter().position(|p| p == d))
        .unwrap_or(0);

    let selection = Select::new("Default provider:", providers.to_vec())
        .with_starting_cursor(default_index)
        .prompt()?;

    Ok(selection)
}

fn select_model(available_models: &[String], default: Option<&str>) -> Result<String> {
    if available_models.is_empty() {
        let model = Text::new("Default model:")
            .with_help_message("Enter the model name")
            .with_default(default.unwrap_or(DEFAULT_MODEL))
            .prompt()?;

        if model.trim().is_empty() {
            bail!("Model name cannot be empty");
        }

        Ok(model.trim().to_string())
    } else {
        let default_index = default
            .and_then(|d| available_models.iter().position(|m| m == d))
            .unwrap_or(0);

        let selection = Select::new("Default model:", available_models.to_vec())
            .with_starting_cursor(default_index)
            .prompt()?;

        Ok(selection)
    }
}

/// Offers presets and custom personas; a literal persona is kept as is.
fn select_persona(config: &ConfigFile, default: Option<&str>) -> Result<Option<String>> {
    let mut keys: Vec<&str> = PRESETS.iter().map(|p| p.key).collect();
    let custom_keys = sorted_custom_keys(&config.personas);
    keys.extend(custom_keys.iter().map(|k| k.as_str()));

    let literal = default.filter(|d| !keys.contains(d));

    let mut options: Vec<String> = Vec::with_capacity(keys.len() + 1);
    if literal.is_some() {
        options.push("(keep current text)".to_string());
    }
    for preset in PRESETS {
        options.push(format!("{} - {}", preset.key, preset.description));
    }
    for key in &custom_keys {
        let desc = config
            .personas
            .get(*key)
            .map_or("", |p| p.description.as_str());
        options.push(format!("{key} - {desc}"));
    }

    let offset = usize::from(literal.is_some());
    let default_index = keys
        .iter()
        .position(|k| *k == default.unwrap_or(DEFAULT_PERSONA))
        .map_or(0, |idx| idx + offset);

    let selection = Select::new("Default persona:", options)
        .with_starting_cursor(default_index)
        .prompt()?;

    if literal.is_some() && selection.starts_with('(') {
        return Ok(literal.map(str::to_string));
    }

    let key = selection.split(" - ").next().unwrap_or(&selection);
    Ok(Some(key.to_string()))
}
