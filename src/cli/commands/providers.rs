//! Provider listing command handler.

use anyhow::Result;

use crate::config::{ConfigFile, ConfigManager, DEFAULT_PROVIDER, ProviderConfig};
use crate::ui::Style;

/// Prints providers to stdout.
///
/// The built-in `gemini` provider is listed unless the config file
/// overrides it. With `specific_provider`, shows details for that one.
pub fn print_providers(specific_provider: Option<&str>) -> Result<()> {
    let manager = ConfigManager::new()?;
    let config = manager.load_or_default()?;
    let default_provider = config.gmc.provider.as_deref().unwrap_or(DEFAULT_PROVIDER);

    if let Some(provider_name) = specific_provider {
        let provider = config
            .provider(provider_name)
            .ok_or_else(|| anyhow::anyhow!("Provider '{provider_name}' not found"))?;
        print_provider_details(provider_name, &provider, default_provider == provider_name);
        return Ok(());
    }

    println!("{}", Style::header("Providers"));
    for (name, provider) in all_providers(&config) {
        let is_default = default_provider == name;
        println!(
            "  {}{}",
            Style::value(&name),
            if is_default {
                format!(" {}", Style::default_marker())
            } else {
                String::new()
            }
        );
        println!(
            "    {} {}",
            Style::label("endpoint:"),
            Style::secondary(&provider.endpoint)
        );
        if !provider.models.is_empty() {
            println!(
                "    {}   {}",
                Style::label("models:"),
                provider.models.join(", ")
            );
        }
    }

    Ok(())
}

/// Configured providers plus the built-in one, sorted by name.
fn all_providers(config: &ConfigFile) -> Vec<(String, ProviderConfig)> {
    let mut providers: Vec<_> = config
        .providers
        .iter()
        .map(|(name, p)| (name.clone(), p.clone()))
        .collect();
    if !config.providers.contains_key(DEFAULT_PROVIDER) {
        providers.push((
            DEFAULT_PROVIDER.to_string(),
            ProviderConfig::builtin_gemini(),
        ));
    }
    providers.sort_by(|a, b| a.0.cmp(&b.0));
    providers
}

fn print_provider_details(name: &str, provider: &ProviderConfig, is_default: bool) {
    println!(
        "Provider: {}{}",
        Style::value(name),
        if is_default {
            format!(" {}", Style::default_marker())
        } else {
            String::new()
        }
    );
    println!("  endpoint = {}", provider.endpoint);
    if provider.requires_api_key() {
        let has_key = provider.get_api_key().is_some();
        let source = provider.api_key_env.as_deref().unwrap_or("config file");
        println!(
            "  api_key  = {} ({source})",
            if has_key { "(set)" } else { "(not set)" }
        );
    }
    if provider.models.is_empty() {
        println!("  models   = (none configured)");
    } else {
        println!("  models:");
        for model in &provider.models {
            println!("    - {model}");
        }
    }
}
