use anyhow::Result;

use crate::chat::{ChatRepl, SessionConfig};
use crate::config::{ConfigManager, ResolveOptions, ResolvedConfig, resolve_config};

pub struct ChatOptions {
    pub provider: Option<String>,
    pub model: Option<String>,
    pub persona: Option<String>,
}

pub async fn run_chat(options: ChatOptions) -> Result<()> {
    let config = load_session_config(&ResolveOptions {
        provider: options.provider,
        model: options.model,
        persona: options.persona,
    })?;
    let mut repl = ChatRepl::new(config);
    repl.run().await
}

/// Merges CLI overrides with the config file into a [`SessionConfig`].
pub fn load_session_config(options: &ResolveOptions) -> Result<SessionConfig> {
    let manager = ConfigManager::new()?;
    let file_config = manager.load_or_default()?;
    let resolved = resolve_config(options, &file_config)?;
    log::debug!(
        "provider={} model={} endpoint={}",
        resolved.provider_name,
        resolved.model,
        resolved.endpoint
    );
    Ok(session_config(resolved))
}

fn session_config(resolved: ResolvedConfig) -> SessionConfig {
    SessionConfig {
        provider_name: resolved.provider_name,
        endpoint: resolved.endpoint,
        model: resolved.model,
        vision_model: resolved.vision_model,
        api_key: resolved.api_key,
        persona_name: resolved.persona_name,
        persona: resolved.persona_prompt,
        bell: resolved.bell,
    }
}
