use anyhow::{Context, Result, bail};
use std::io::{self, IsTerminal, Read};

const MAX_INPUT_SIZE: usize = 1024 * 1024; // 1MB

pub struct InputReader;

impl InputReader {
    /// Returns the prompt given on the command line, or reads it from stdin.
    ///
    /// An interactive stdin is never read; the prompt is then empty.
    pub fn read_prompt(words: &[String]) -> Result<String> {
        if words.is_empty() {
            let stdin = io::stdin();
            if stdin.is_terminal() {
                return Ok(String::new());
            }
            Self::read_limited(stdin.lock()).map(|s| s.trim().to_string())
        } else {
            Ok(words.join(" ").trim().to_string())
        }
    }

    fn read_limited(mut reader: impl Read) -> Result<String> {
        let mut buffer = Vec::new();
        let mut chunk = [0u8; 8192];

        loop {
            let bytes_read = reader
                .read(&mut chunk)
                .context("Failed to read from stdin")?;

            if bytes_read == 0 {
                break;
            }

            buffer.extend_from_slice(&chunk[..bytes_read]);

            if buffer.len() > MAX_INPUT_SIZE {
                bail!(
                    "Error: Input size ({:.1} MB) exceeds maximum allowed size (1 MB).\n\n\
                     Consider asking about a smaller excerpt.",
                    buffer.len() as f64 / 1024.0 / 1024.0
                );
            }
        }

        String::from_utf8(buffer).context("Input is not valid UTF-8")
    }
}
