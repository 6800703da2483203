//! Persona management.
//!
//! A persona is the system instruction sent with every request. It comes
//! from a preset, a custom persona in the config file, or literal text.

use std::collections::HashMap;
use thiserror::Error;

use crate::config::CustomPersona;

/// A preset persona (hardcoded, not modifiable by users).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PresetPersona {
    /// The persona key (e.g., "default", "coder").
    pub key: &'static str,
    /// Human-readable description.
    pub description: &'static str,
    /// System instruction sent to the model.
    pub prompt: &'static str,
}

/// Key of the persona used when nothing else is configured.
pub const DEFAULT_PERSONA: &str = "default";

/// All available preset personas.
pub const PRESETS: &[PresetPersona] = &[
    PresetPersona {
        key: "default",
        description: "Friendly general assistant",
        prompt: "You are a friendly, helpful assistant. Answer clearly and use \
                 Markdown code blocks for code.",
    },
    PresetPersona {
        key: "concise",
        description: "Short, direct answers",
        prompt: "Answer as briefly as possible. Skip preambles and summaries.",
    },
    PresetPersona {
        key: "tutor",
        description: "Patient step-by-step explanations",
        prompt: "You are a patient tutor. Explain step by step, check \
                 assumptions, and finish with a short recap.",
    },
    PresetPersona {
        key: "coder",
        description: "Senior software engineer",
        prompt: "You are a senior software engineer. Prefer working code over \
                 prose, point out edge cases, and keep explanations brief.",
    },
];

/// Resolved persona information.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ResolvedPersona {
    /// A preset persona.
    Preset(&'static PresetPersona),
    /// A custom persona from the config file.
    Custom { key: String, prompt: String },
    /// Free text used as-is.
    Literal(String),
}

impl ResolvedPersona {
    /// Returns the system instruction for this persona.
    pub fn prompt(&self) -> &str {
        match self {
            Self::Preset(preset) => preset.prompt,
            Self::Custom { prompt, .. } => prompt,
            Self::Literal(text) => text,
        }
    }

    /// Returns the key for named personas.
    pub fn key(&self) -> Option<&str> {
        match self {
            Self::Preset(preset) => Some(preset.key),
            Self::Custom { key, .. } => Some(key),
            Self::Literal(_) => None,
        }
    }
}

/// Looks up a preset persona by key.
pub fn get_preset(key: &str) -> Option<&'static PresetPersona> {
    PRESETS.iter().find(|p| p.key == key)
}

/// Returns custom persona keys sorted alphabetically.
#[allow(clippy::implicit_hasher)]
pub fn sorted_custom_keys(personas: &HashMap<String, CustomPersona>) -> Vec<&String> {
    let mut keys: Vec<_> = personas.keys().collect();
    keys.sort();
    keys
}

/// Looks up a named persona, presets first.
#[allow(clippy::implicit_hasher)]
pub fn find_persona(
    key: &str,
    custom_personas: &HashMap<String, CustomPersona>,
) -> Result<ResolvedPersona, PersonaError> {
    if let Some(preset) = get_preset(key) {
        return Ok(ResolvedPersona::Preset(preset));
    }

    if let Some(custom) = custom_personas.get(key) {
        return Ok(ResolvedPersona::Custom {
            key: key.to_string(),
            prompt: custom.prompt.clone(),
        });
    }

    let custom_keys: Vec<String> = sorted_custom_keys(custom_personas)
        .into_iter()
        .cloned()
        .collect();
    Err(PersonaError::NotFound {
        key: key.to_string(),
        custom_keys,
    })
}

/// Resolves a persona key, treating anything that is not a known key as
/// literal instruction text.
#[allow(clippy::implicit_hasher)]
pub fn resolve_persona(
    key_or_text: &str,
    custom_personas: &HashMap<String, CustomPersona>,
) -> ResolvedPersona {
    let key_or_text = key_or_text.trim();
    find_persona(key_or_text, custom_personas)
        .unwrap_or_else(|_| ResolvedPersona::Literal(key_or_text.to_string()))
}

/// Persona-related errors.
#[derive(Debug, Clone, Error)]
pub enum PersonaError {
    /// Persona not found. Contains the key and list of custom persona keys.
    #[error("{}", not_found_message(.key, .custom_keys))]
    NotFound {
        key: String,
        custom_keys: Vec<String>,
    },
}

fn not_found_message(key: &str, custom_keys: &[String]) -> String {
    let mut all_keys: Vec<&str> = PRESETS.iter().map(|p| p.key).collect();
    all_keys.extend(custom_keys.iter().map(String::as_str));
    format!(
        "Persona '{key}' not found\n\nAvailable personas: {}",
        all_keys.join(", ")
    )
}
