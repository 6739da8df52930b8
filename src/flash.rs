//! Signed single-use flash notices, carried in a cookie.
//!
//! Cookie value: `{level}.{hex(message)}.{sha256_hex(secret|level|hex)}`.
//! The message is hex-encoded so the value stays cookie-safe; the signature
//! covers level and payload, so a tampered cookie decodes to nothing.

use sha2::{Digest, Sha256};

pub const FLASH_COOKIE: &str = "flash";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlashLevel {
    Error,
    Warning,
}

impl FlashLevel {
    fn as_str(self) -> &'static str {
        match self {
            FlashLevel::Error => "error",
            FlashLevel::Warning => "warning",
        }
    }

    fn parse(s: &str) -> Option<Self> {
        match s {
            "error" => Some(FlashLevel::Error),
            "warning" => Some(FlashLevel::Warning),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flash {
    pub level: FlashLevel,
    pub message: String,
}

impl Flash {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Error,
            message: message.into(),
        }
    }

    pub fn warning(message: impl Into<String>) -> Self {
        Self {
            level: FlashLevel::Warning,
            message: message.into(),
        }
    }
}

/// Encode a flash into a signed cookie value.
pub fn encode(secret: &str, flash: &Flash) -> String {
    let level = flash.level.as_str();
    let payload = hex_encode(flash.message.as_bytes());
    let sig = sign(secret, level, &payload);
    format!("{level}.{payload}.{sig}")
}

/// Decode and verify a cookie value. Malformed or tampered input yields `None`.
pub fn decode(secret: &str, value: &str) -> Option<Flash> {
    let mut parts = value.splitn(3, '.');
    let level_str = parts.next()?;
    let payload = parts.next()?;
    let sig = parts.next()?;

    let level = FlashLevel::parse(level_str)?;
    if sign(secret, level_str, payload) != sig {
        return None;
    }
    let bytes = hex_decode(payload)?;
    let message = String::from_utf8(bytes).ok()?;
    Some(Flash { level, message })
}

fn sign(secret: &str, level: &str, payload: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(secret.as_bytes());
    hasher.update(b"|");
    hasher.update(level.as_bytes());
    hasher.update(b"|");
    hasher.update(payload.as_bytes());
    hex_encode(&hasher.finalize())
}

fn hex_encode(bytes: &[u8]) -> String {
    let mut out = String::with_capacity(bytes.len() * 2);
    for b in bytes {
        out.push_str(&format!("{b:02x}"));
    }
    out
}

fn hex_decode(s: &str) -> Option<Vec<u8>> {
    if s.len() % 2 != 0 {
        return None;
    }
    (0..s.len())
        .step_by(2)
        .map(|i| u8::from_str_radix(s.get(i..i + 2)?, 16).ok())
        .collect()
}
