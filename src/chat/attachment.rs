use base64::Engine;
use base64::engine::general_purpose::STANDARD as BASE64_STANDARD;

use crate::error::ValidationError;
use crate::gemini::Part;

/// Largest decoded attachment accepted for a single message.
pub const MAX_ATTACHMENT_BYTES: usize = 10 * 1024 * 1024; // 10 MiB

/// A binary payload handed to the session, already base64-encoded.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attachment {
    pub mime_type: String,
    pub data: String,
}

impl Attachment {
    pub fn new(mime_type: impl Into<String>, data: impl Into<String>) -> Self {
        Self {
            mime_type: mime_type.into(),
            data: data.into(),
        }
    }

    /// Encodes raw bytes.
    pub fn from_bytes(mime_type: impl Into<String>, bytes: &[u8]) -> Self {
        Self::new(mime_type, BASE64_STANDARD.encode(bytes))
    }

    /// Size of the payload once decoded, computed from the encoded length.
    pub fn decoded_len(&self) -> usize {
        let data = self.data.trim_end();
        let padding = data.bytes().rev().take_while(|&b| b == b'=').count();
        (data.len() / 4 * 3 + (data.len() % 4) * 3 / 4).saturating_sub(padding)
    }

    /// Checks that the attachment is an image within the size limit.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !self.mime_type.starts_with("image/") {
            return Err(ValidationError::AttachmentNotImage(self.mime_type.clone()));
        }

        let size = self.decoded_len();
        if size > MAX_ATTACHMENT_BYTES {
            return Err(ValidationError::AttachmentTooLarge {
                size,
                max: MAX_ATTACHMENT_BYTES,
            });
        }

        // Checked after the size so an oversized payload is never decoded
        match BASE64_STANDARD.decode(self.data.as_bytes()) {
            Ok(bytes) if !bytes.is_empty() => {}
            _ => return Err(ValidationError::AttachmentEncoding),
        }

        Ok(())
    }

    pub fn to_part(&self) -> Part {
        Part::inline_data(&self.mime_type, &self.data)
    }
}
