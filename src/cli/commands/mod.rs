//! Subcommand implementations.

/// One-shot question handler.
pub mod ask;

/// Chat mode command handler.
pub mod chat;

/// Configure command handler.
pub mod configure;

/// Persona listing command handler.
pub mod personas;

/// Provider listing command handler.
pub mod providers;
