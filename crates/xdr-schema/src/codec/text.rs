//! Text transports for XDR payloads.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;

use crate::error::DecodeError;

/// How XDR bytes are carried inside text (JSON, URLs, logs).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TextEncoding {
    /// Lowercase hex on output; either case accepted on input.
    Hex,
    /// Standard alphabet with padding.
    Base64,
}

impl TextEncoding {
    pub fn name(self) -> &'static str {
        match self {
            TextEncoding::Hex => "hex",
            TextEncoding::Base64 => "base64",
        }
    }

    pub fn encode(self, bytes: &[u8]) -> String {
        match self {
            TextEncoding::Hex => hex::encode(bytes),
            TextEncoding::Base64 => STANDARD.encode(bytes),
        }
    }

    pub fn decode(self, text: &str) -> Result<Vec<u8>, DecodeError> {
        let decoded = match self {
            TextEncoding::Hex => hex::decode(text).map_err(|e| e.to_string()),
            TextEncoding::Base64 => STANDARD.decode(text).map_err(|e| e.to_string()),
        };
        decoded.map_err(|message| DecodeError::InvalidText {
            encoding: self.name(),
            message,
        })
    }
}
