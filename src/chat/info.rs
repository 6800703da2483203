//! Static informational payloads for `/credits` and `/infoupdate`.

/// One labelled line of the credits card.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreditLine {
    pub label: &'static str,
    pub value: &'static str,
}

pub const CREDITS: &[CreditLine] = &[
    CreditLine {
        label: "Client",
        value: concat!("gmc v", env!("CARGO_PKG_VERSION"), ", written in Rust"),
    },
    CreditLine {
        label: "AI",
        value: "Powered by Google Gemini",
    },
    CreditLine {
        label: "License",
        value: env!("CARGO_PKG_LICENSE"),
    },
];

/// A released version and what changed in it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ChangelogEntry {
    pub version: &'static str,
    pub changes: &'static [&'static str],
}

/// Newest first.
pub const CHANGELOG: &[ChangelogEntry] = &[
    ChangelogEntry {
        version: "0.3.0",
        changes: &[
            "Reminders with /ai2 fire at a time of day; /cancel stops them",
            "Personas: presets, custom personas in config, /persona in chat",
            "Code blocks in answers are framed with their language",
        ],
    },
    ChangelogEntry {
        version: "0.2.0",
        changes: &[
            "Attach images with /image or --image (up to 10 MiB)",
            "Separate vision model for image turns",
            "/clear resets the conversation",
        ],
    },
    ChangelogEntry {
        version: "0.1.0",
        changes: &[
            "Interactive chat with conversation history",
            "One-shot questions from arguments or stdin",
            "/credits",
        ],
    },
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_changelog_newest_first_matches_package() {
        assert_eq!(CHANGELOG[0].version, env!("CARGO_PKG_VERSION"));
        assert!(CHANGELOG.iter().all(|e| !e.changes.is_empty()));
    }

    #[test]
    fn test_credits_mention_provider() {
        assert!(CREDITS.iter().any(|c| c.value.contains("Gemini")));
    }
}
