//! Persona listing command handler.

use anyhow::Result;

use crate::config::ConfigManager;
use crate::persona::{PRESETS, ResolvedPersona, find_persona, sorted_custom_keys};
use crate::ui::Style;

/// Lists all available personas (presets and custom).
pub fn list_personas() -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;
    let default = config.gmc.persona.as_deref();

    let marker = |key: &str| {
        if default == Some(key) {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        }
    };

    println!("{}", Style::header("Preset personas"));
    for preset in PRESETS {
        println!(
            "  {}  {}{}",
            Style::value(format!("{:10}", preset.key)),
            Style::secondary(preset.description),
            marker(preset.key)
        );
    }

    if !config.personas.is_empty() {
        println!();
        println!("{}", Style::header("Custom personas"));
        for key in sorted_custom_keys(&config.personas) {
            let description = config
                .personas
                .get(key)
                .map_or("", |p| p.description.as_str());
            println!(
                "  {}  {}{}",
                Style::value(format!("{key:10}")),
                Style::secondary(description),
                marker(key)
            );
        }
    }

    println!();
    println!(
        "{}",
        Style::hint("Any other text passed to --persona is used as the instruction itself.")
    );

    Ok(())
}

/// Shows a persona's description and system instruction.
pub fn show_persona(key: &str) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;

    let persona = find_persona(key, &config.personas)?;
    let (kind, description) = match &persona {
        ResolvedPersona::Preset(preset) => ("Preset persona", preset.description),
        ResolvedPersona::Custom { key, .. } => (
            "Custom persona",
            config
                .personas
                .get(key)
                .map_or("", |p| p.description.as_str()),
        ),
        ResolvedPersona::Literal(_) => ("Persona", ""),
    };

    println!("{}", Style::header(kind));
    println!();
    println!("  {}  {}", Style::label("Name:"), Style::value(key));
    println!("  {}  {}", Style::label("Desc:"), Style::secondary(description));
    println!();
    println!("{}", Style::label("Prompt:"));
    println!("{}", persona.prompt());

    Ok(())
}
