use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs;
use std::path::PathBuf;

use crate::fs::atomic_write;
use crate::gemini::DEFAULT_ENDPOINT;
use crate::paths;
use crate::persona::{DEFAULT_PERSONA, resolve_persona};
use crate::ui::Style;

/// Provider used when neither the CLI nor the config file names one.
pub const DEFAULT_PROVIDER: &str = "gemini";
/// Model used when neither the CLI nor the config file names one.
pub const DEFAULT_MODEL: &str = "gemini-2.5-flash";
/// Environment variable holding the key for the built-in provider.
pub const DEFAULT_API_KEY_ENV: &str = "GEMINI_API_KEY";

/// Default settings in the `[gmc]` section of config.toml.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GmcConfig {
    /// Default provider name.
    pub provider: Option<String>,
    /// Default model for text turns.
    pub model: Option<String>,
    /// Model for turns with an image attached.
    pub vision_model: Option<String>,
    /// Default persona key (or literal instruction text).
    pub persona: Option<String>,
    /// Ring the terminal bell when an answer arrives.
    pub bell: Option<bool>,
}

/// Configuration for a Gemini-compatible provider.
///
/// Each provider has an endpoint and optional API key settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    /// Base URL, e.g. `https://generativelanguage.googleapis.com/v1beta`.
    pub endpoint: String,
    /// API key stored directly in config (not recommended).
    #[serde(default)]
    pub api_key: Option<String>,
    /// Environment variable name containing the API key.
    #[serde(default)]
    pub api_key_env: Option<String>,
    /// List of available models for this provider.
    #[serde(default)]
    pub models: Vec<String>,
}

impl ProviderConfig {
    /// The public Gemini endpoint, keyed by `GEMINI_API_KEY`.
    pub fn builtin_gemini() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: None,
            api_key_env: Some(DEFAULT_API_KEY_ENV.to_string()),
            models: vec![DEFAULT_MODEL.to_string(), "gemini-2.5-pro".to_string()],
        }
    }

    /// Gets the API key, preferring environment variable over config file.
    pub fn get_api_key(&self) -> Option<String> {
        if let Some(env_var) = &self.api_key_env
            && let Ok(key) = std::env::var(env_var)
            && !key.is_empty()
        {
            return Some(key);
        }
        self.api_key.clone()
    }

    /// Returns `true` if this provider requires an API key.
    pub const fn requires_api_key(&self) -> bool {
        self.api_key.is_some() || self.api_key_env.is_some()
    }
}

/// A user-defined persona in the `[personas]` table.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CustomPersona {
    /// Human-readable description.
    #[serde(default)]
    pub description: String,
    /// System instruction sent to the model.
    pub prompt: String,
}

/// The complete configuration file structure.
///
/// Corresponds to `~/.config/gmc/config.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    /// Default settings.
    #[serde(default)]
    pub gmc: GmcConfig,
    /// Provider configurations keyed by name.
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
    /// Custom personas keyed by name.
    #[serde(default)]
    pub personas: HashMap<String, CustomPersona>,
}

impl ConfigFile {
    /// Looks up a provider, falling back to the built-in one for its name.
    pub fn provider(&self, name: &str) -> Option<ProviderConfig> {
        self.providers
            .get(name)
            .cloned()
            .or_else(|| (name == DEFAULT_PROVIDER).then(ProviderConfig::builtin_gemini))
    }
}

/// Resolved configuration after merging CLI arguments and config file.
#[derive(Debug, Clone)]
pub struct ResolvedConfig {
    /// The selected provider name.
    pub provider_name: String,
    /// The API endpoint URL.
    pub endpoint: String,
    /// The model for text turns.
    pub model: String,
    /// The model for image turns, if different.
    pub vision_model: Option<String>,
    /// The API key (if required).
    pub api_key: Option<String>,
    /// Persona key, when the persona is a named one.
    pub persona_name: Option<String>,
    /// The system instruction.
    pub persona_prompt: String,
    /// Ring the terminal bell when an answer arrives.
    pub bell: bool,
}

/// Options for resolving configuration.
///
/// Contains CLI overrides that take precedence over config file values.
#[derive(Debug, Clone, Default)]
pub struct ResolveOptions {
    /// Provider name override.
    pub provider: Option<String>,
    /// Model name override.
    pub model: Option<String>,
    /// Persona key or literal text override.
    pub persona: Option<String>,
}

/// Resolves configuration by merging CLI options with config file settings.
///
/// CLI options take precedence over config file values, which take
/// precedence over built-in defaults.
///
/// # Errors
///
/// Returns an error if the provider is not found or its API key is missing.
pub fn resolve_config(
    options: &ResolveOptions,
    config_file: &ConfigFile,
) -> Result<ResolvedConfig> {
    // Resolve provider
    let provider_name = options
        .provider
        .as_ref()
        .or(config_file.gmc.provider.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_PROVIDER.to_string());

    // Get provider config
    let provider_config = config_file.provider(&provider_name).ok_or_else(|| {
        let mut available: Vec<_> = config_file.providers.keys().map(String::as_str).collect();
        if !available.contains(&DEFAULT_PROVIDER) {
            available.push(DEFAULT_PROVIDER);
        }
        available.sort_unstable();
        anyhow::anyhow!(
            "Provider '{provider_name}' not found\n\n\
             Available providers:\n  \
             - {}\n\n\
             Add providers to ~/.config/gmc/config.toml",
            available.join("\n  - ")
        )
    })?;

    // Resolve model
    let model = options
        .model
        .as_ref()
        .or(config_file.gmc.model.as_ref())
        .cloned()
        .unwrap_or_else(|| DEFAULT_MODEL.to_string());

    // Warn if model is not in provider's models list
    if !provider_config.models.is_empty() && !provider_config.models.contains(&model) {
        crate::warn!(
            "{} Model '{}' is not in the configured models list for '{}'\n\
             Configured models: {}\n\
             Proceeding anyway...\n",
            Style::warning("Warning:"),
            model,
            provider_name,
            provider_config.models.join(", ")
        );
    }

    // Resolve persona
    let persona_key = options
        .persona
        .as_deref()
        .or(config_file.gmc.persona.as_deref())
        .unwrap_or(DEFAULT_PERSONA);
    let persona = resolve_persona(persona_key, &config_file.personas);

    // Get API key
    let api_key = provider_config.get_api_key();

    // Check if API key is required but missing
    if provider_config.requires_api_key() && api_key.is_none() {
        let env_var = provider_config.api_key_env.as_deref().unwrap_or("API_KEY");
        bail!(
            "Provider '{provider_name}' requires an API key\n\n\
             Set the {env_var} environment variable:\n  \
             export {env_var}=\"your-api-key\"\n\n\
             Or set api_key in ~/.config/gmc/config.toml"
        );
    }

    Ok(ResolvedConfig {
        provider_name,
        endpoint: provider_config.endpoint,
        model,
        vision_model: config_file.gmc.vision_model.clone(),
        api_key,
        persona_name: persona.key().map(str::to_string),
        persona_prompt: persona.prompt().to_string(),
        bell: config_file.gmc.bell.unwrap_or(true),
    })
}

/// Manages loading and saving configuration files.
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Creates a new config manager.
    ///
    /// Configuration is stored at `$XDG_CONFIG_HOME/gmc/config.toml`
    /// or `~/.config/gmc/config.toml` if `XDG_CONFIG_HOME` is not set.
    pub fn new() -> Result<Self> {
        Ok(Self {
            config_path: paths::config_dir()?.join("config.toml"),
        })
    }

    pub const fn config_path(&self) -> &PathBuf {
        &self.config_path
    }

    pub fn load(&self) -> Result<ConfigFile> {
        let contents = fs::read_to_string(&self.config_path).with_context(|| {
            format!("Failed to read config file: {}", self.config_path.display())
        })?;

        let config_file: ConfigFile =
            toml::from_str(&contents).with_context(|| "Failed to parse config file")?;

        Ok(config_file)
    }

    pub fn save(&self, config: &ConfigFile) -> Result<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).with_context(|| {
                format!("Failed to create config directory: {}", parent.display())
            })?;
        }

        let contents = toml::to_string_pretty(config).context("Failed to serialize config")?;

        atomic_write(&self.config_path, &contents).with_context(|| {
            format!(
                "Failed to write config file: {}",
                self.config_path.display()
            )
        })?;

        Ok(())
    }

    /// Loads the config file, falling back to defaults if it is missing.
    ///
    /// A file that exists but cannot be parsed is reported, not ignored.
    pub fn load_or_default(&self) -> Result<ConfigFile> {
        if !self.config_path.exists() {
            log::debug!("no config at {}", self.config_path.display());
            return Ok(ConfigFile::default());
        }
        self.load()
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    fn create_test_manager(temp_dir: &TempDir) -> ConfigManager {
        ConfigManager {
            config_path: temp_dir.path().join("config.toml"),
        }
    }

    #[test]
    fn test_save_and_load_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        let mut providers = HashMap::new();
        providers.insert(
            "proxy".to_string(),
            ProviderConfig {
                endpoint: "http://localhost:8080/v1beta".to_string(),
                api_key: None,
                api_key_env: None,
                models: vec!["gemini-2.5-flash".to_string()],
            },
        );

        let mut personas = HashMap::new();
        personas.insert(
            "pirate".to_string(),
            CustomPersona {
                description: "Pirate talk".to_string(),
                prompt: "Answer like a pirate.".to_string(),
            },
        );

        let config = ConfigFile {
            gmc: GmcConfig {
                provider: Some("proxy".to_string()),
                model: Some("gemini-2.5-flash".to_string()),
                vision_model: None,
                persona: Some("pirate".to_string()),
                bell: Some(false),
            },
            providers,
            personas,
        };

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded.gmc.provider, Some("proxy".to_string()));
        assert_eq!(loaded.gmc.model, Some("gemini-2.5-flash".to_string()));
        assert_eq!(loaded.gmc.persona, Some("pirate".to_string()));
        assert_eq!(loaded.gmc.bell, Some(false));
        assert!(loaded.providers.contains_key("proxy"));
        assert_eq!(loaded.personas["pirate"].prompt, "Answer like a pirate.");
    }

    #[test]
    fn test_load_nonexistent_config() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);

        assert!(manager.load().is_err());
        assert!(manager.load_or_default().unwrap().providers.is_empty());
    }

    #[test]
    fn test_load_or_default_reports_parse_errors() {
        let temp_dir = TempDir::new().unwrap();
        let manager = create_test_manager(&temp_dir);
        fs::write(manager.config_path(), "[gmc\nmodel = ").unwrap();

        assert!(manager.load_or_default().is_err());
    }

    #[test]
    #[serial]
    fn test_provider_get_api_key_from_env() {
        // SAFETY: serialized with the other env-mutating tests
        unsafe {
            std::env::set_var("GMC_TEST_API_KEY", "test-key-value");
        }

        let provider = ProviderConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("GMC_TEST_API_KEY".to_string()),
            models: vec![],
        };

        // Environment variable takes priority
        assert_eq!(provider.get_api_key(), Some("test-key-value".to_string()));

        // SAFETY: Cleanup test env var
        unsafe {
            std::env::remove_var("GMC_TEST_API_KEY");
        }
    }

    #[test]
    #[serial]
    fn test_provider_get_api_key_fallback() {
        // SAFETY: serialized with the other env-mutating tests
        unsafe {
            std::env::remove_var("GMC_NONEXISTENT_KEY");
        }

        let provider = ProviderConfig {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            api_key: Some("fallback-key".to_string()),
            api_key_env: Some("GMC_NONEXISTENT_KEY".to_string()),
            models: vec![],
        };

        // Falls back to api_key when env var not set
        assert_eq!(provider.get_api_key(), Some("fallback-key".to_string()));
    }

    #[test]
    fn test_provider_requires_api_key() {
        assert!(ProviderConfig::builtin_gemini().requires_api_key());

        let provider_without = ProviderConfig {
            endpoint: "http://localhost:8080".to_string(),
            api_key: None,
            api_key_env: None,
            models: vec![],
        };
        assert!(!provider_without.requires_api_key());
    }

    // resolve_config tests

    fn create_test_config() -> ConfigFile {
        let mut providers = HashMap::new();
        providers.insert(
            "local".to_string(),
            ProviderConfig {
                endpoint: "http://localhost:8080/v1beta".to_string(),
                api_key: None,
                api_key_env: None,
                models: vec!["gemini-2.5-flash".to_string(), "gemini-2.5-pro".to_string()],
            },
        );
        providers.insert(
            "locked".to_string(),
            ProviderConfig {
                endpoint: "https://example.invalid/v1beta".to_string(),
                api_key: None,
                api_key_env: Some("GMC_TEST_NONEXISTENT_API_KEY".to_string()),
                models: vec![],
            },
        );

        ConfigFile {
            gmc: GmcConfig {
                provider: Some("local".to_string()),
                model: Some("gemini-2.5-flash".to_string()),
                vision_model: Some("gemini-2.5-pro".to_string()),
                persona: Some("concise".to_string()),
                bell: None,
            },
            providers,
            personas: HashMap::new(),
        }
    }

    #[test]
    fn test_resolve_config_falls_back_to_file() {
        let resolved = resolve_config(&ResolveOptions::default(), &create_test_config()).unwrap();

        assert_eq!(resolved.provider_name, "local");
        assert_eq!(resolved.endpoint, "http://localhost:8080/v1beta");
        assert_eq!(resolved.model, "gemini-2.5-flash");
        assert_eq!(resolved.vision_model, Some("gemini-2.5-pro".to_string()));
        assert_eq!(resolved.persona_name, Some("concise".to_string()));
        assert!(resolved.api_key.is_none());
        assert!(resolved.bell);
    }

    #[test]
    fn test_resolve_config_cli_overrides_file() {
        let options = ResolveOptions {
            provider: None,
            model: Some("gemini-2.5-pro".to_string()),
            persona: Some("Reply in French.".to_string()),
        };

        let resolved = resolve_config(&options, &create_test_config()).unwrap();

        assert_eq!(resolved.model, "gemini-2.5-pro");
        assert_eq!(resolved.persona_name, None);
        assert_eq!(resolved.persona_prompt, "Reply in French.");
    }

    #[test]
    fn test_resolve_config_provider_not_found() {
        let options = ResolveOptions {
            provider: Some("nonexistent".to_string()),
            ..ResolveOptions::default()
        };

        let result = resolve_config(&options, &create_test_config());

        let msg = result.unwrap_err().to_string();
        assert!(msg.contains("not found"));
        assert!(msg.contains("local"));
    }

    #[test]
    fn test_resolve_config_api_key_required_but_missing() {
        let options = ResolveOptions {
            provider: Some("locked".to_string()),
            ..ResolveOptions::default()
        };

        let result = resolve_config(&options, &create_test_config());

        assert!(result.unwrap_err().to_string().contains("API key"));
    }

    #[test]
    #[serial]
    fn test_resolve_config_builtin_provider() {
        // SAFETY: serialized with the other env-mutating tests
        unsafe {
            std::env::set_var(DEFAULT_API_KEY_ENV, "builtin-key");
        }

        let resolved = resolve_config(&ResolveOptions::default(), &ConfigFile::default()).unwrap();

        assert_eq!(resolved.provider_name, DEFAULT_PROVIDER);
        assert_eq!(resolved.endpoint, DEFAULT_ENDPOINT);
        assert_eq!(resolved.model, DEFAULT_MODEL);
        assert_eq!(resolved.api_key, Some("builtin-key".to_string()));
        assert_eq!(resolved.persona_name, Some(DEFAULT_PERSONA.to_string()));

        // SAFETY: Cleanup test env var
        unsafe {
            std::env::remove_var(DEFAULT_API_KEY_ENV);
        }
    }
}
