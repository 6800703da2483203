//! Terminal rendering of model answers.
//!
//! Fenced code blocks are framed with a header naming their language;
//! everything else passes through unchanged.

use crate::ui::Style;

/// A run of answer text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment<'a> {
    Prose(&'a str),
    Code { language: &'a str, code: &'a str },
}

/// Splits an answer into prose and fenced code blocks.
///
/// An unterminated fence is treated as prose.
pub fn segments(text: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = text;

    while let Some(start) = rest.find("```") {
        let after_fence = &rest[start + 3..];
        let Some(newline) = after_fence.find('\n') else {
            break;
        };
        let language = after_fence[..newline].trim();
        let body = &after_fence[newline + 1..];
        let Some(end) = body.find("```") else {
            break;
        };

        if start > 0 {
            out.push(Segment::Prose(&rest[..start]));
        }
        out.push(Segment::Code {
            language,
            code: body[..end].trim_end_matches('\n'),
        });

        rest = &body[end + 3..];
        rest = rest.strip_prefix('\n').unwrap_or(rest);
    }

    if !rest.is_empty() {
        out.push(Segment::Prose(rest));
    }

    out
}

/// Renders an answer for the terminal.
pub fn render_answer(text: &str) -> String {
    let mut out = String::with_capacity(text.len() + 64);

    for segment in segments(text) {
        match segment {
            Segment::Prose(prose) => out.push_str(prose),
            Segment::Code { language, code } => {
                let language = if language.is_empty() { "code" } else { language };
                if !out.is_empty() && !out.ends_with('\n') {
                    out.push('\n');
                }
                out.push_str(&Style::secondary(format!("┌─ {language}")));
                out.push('\n');
                for line in code.lines() {
                    out.push_str(&Style::secondary("│ "));
                    out.push_str(line);
                    out.push('\n');
                }
                out.push_str(&Style::secondary("└─"));
                out.push('\n');
            }
        }
    }

    out
}
