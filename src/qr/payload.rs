//! WiFi network QR text grammar: `WIFI:T:<token>;S:<ssid>;P:<password>;;`

use crate::credentials::Credentials;
use crate::error::{Error, Result};

const PREFIX: &str = "WIFI:";
const RESERVED: [char; 4] = ['\\', ';', ',', ':'];

/// Escape reserved characters (`\`, `;`, `,`, `:`) with a single backslash.
pub fn escape_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len() + 4);
    for c in value.chars() {
        if RESERVED.contains(&c) {
            out.push('\\');
        }
        out.push(c);
    }
    out
}

/// Remove exactly one backslash in front of every escaped character.
pub fn unescape_field(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut chars = value.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(next) = chars.next() {
                out.push(next);
            }
        } else {
            out.push(c);
        }
    }
    out
}

/// Format credentials into the WiFi QR payload text.
pub fn encode_payload(credentials: &Credentials) -> String {
    format!(
        "{PREFIX}T:{};S:{};P:{};;",
        credentials.security().qr_token(),
        escape_field(credentials.ssid()),
        escape_field(credentials.password()),
    )
}

/// Fields recovered from a WiFi QR payload
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct ParsedPayload {
    /// Raw `T:` token (`WPA`, `WEP`, `nopass`)
    pub security: String,
    /// Unescaped `S:` value
    pub ssid: String,
    /// Unescaped `P:` value
    pub password: String,
}

impl ParsedPayload {
    /// Whether these fields describe the given credentials.
    pub fn matches(&self, credentials: &Credentials) -> bool {
        self.security == credentials.security().qr_token()
            && self.ssid == credentials.ssid()
            && self.password == credentials.password()
    }
}

/// Parse a WiFi QR payload. Fields may appear in any order; unknown fields are skipped.
pub fn parse_payload(text: &str) -> Result<ParsedPayload> {
    let body = text
        .strip_prefix(PREFIX)
        .ok_or_else(|| Error::QrDecode(format!("payload does not start with {PREFIX}")))?;

    let mut parsed = ParsedPayload::default();
    let mut field = String::new();
    let mut terminated = false;
    let mut chars = body.chars();

    while let Some(c) = chars.next() {
        match c {
            '\\' => {
                field.push(c);
                match chars.next() {
                    Some(next) => field.push(next),
                    None => return Err(Error::QrDecode("dangling escape".to_string())),
                }
            }
            ';' if field.is_empty() => {
                terminated = true;
                break;
            }
            ';' => {
                apply_field(&mut parsed, &field)?;
                field.clear();
            }
            _ => field.push(c),
        }
    }

    if !terminated || chars.next().is_some() {
        return Err(Error::QrDecode(
            "payload must end with a single ';;' terminator".to_string(),
        ));
    }

    Ok(parsed)
}

fn apply_field(parsed: &mut ParsedPayload, field: &str) -> Result<()> {
    let (key, value) = field
        .split_once(':')
        .ok_or_else(|| Error::QrDecode(format!("malformed field '{field}'")))?;

    match key {
        "T" => parsed.security = unescape_field(value),
        "S" => parsed.ssid = unescape_field(value),
        "P" => parsed.password = unescape_field(value),
        other => tracing::debug!(field = other, "Skipping unknown WiFi payload field"),
    }
    Ok(())
}
