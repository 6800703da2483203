mod manager;

pub use manager::{
    ConfigFile, ConfigManager, CustomPersona, DEFAULT_API_KEY_ENV, DEFAULT_MODEL,
    DEFAULT_PROVIDER, GmcConfig, ProviderConfig, ResolveOptions, ResolvedConfig, resolve_config,
};
