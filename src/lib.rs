//! # gmc - Gemini chat from the terminal
//!
//! `gmc` sends text and images to the Google Gemini `generateContent` API.
//! It keeps a conversation history per session, lets you swap the system
//! instruction (persona) on the fly, and can set a wall-clock reminder.
//!
//! ## Quick Start
//!
//! ```bash
//! export GEMINI_API_KEY="..."
//!
//! # One question
//! gmc "what does the borrow checker check?"
//!
//! # From stdin, with an image
//! echo "what is in this picture?" | gmc --image cat.png
//!
//! # Interactive chat
//! gmc chat --persona coder
//! ```
//!
//! ## Configuration
//!
//! Settings are stored in `~/.config/gmc/config.toml`:
//!
//! ```toml
//! [gmc]
//! model = "gemini-2.5-flash"
//! persona = "concise"
//!
//! [personas.pirate]
//! description = "Talks like a pirate"
//! prompt = "Answer like a friendly pirate."
//! ```

/// Chat session, slash commands, reminders and the interactive loop.
pub mod chat;

/// Command-line interface definitions and handlers.
pub mod cli;

/// Configuration file management and provider settings.
pub mod config;

/// Session error types.
pub mod error;

/// File system utilities.
pub mod fs;

/// Gemini wire types and HTTP client.
pub mod gemini;

/// Input reading from arguments, stdin and image files.
pub mod input;

/// Global output configuration (quiet mode, colors, stderr/stdout routing).
pub mod output;

/// XDG-style path utilities for configuration.
pub mod paths;

/// Persona management (presets and custom personas).
pub mod persona;

/// Terminal UI components (spinner, colors).
pub mod ui;
