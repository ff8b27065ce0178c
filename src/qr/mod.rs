//! WiFi QR code generation
//!
//! This module turns [`Credentials`] into the WiFi network payload text and a
//! rendered code image, optionally carrying a centered logo. Codes with a logo
//! are decoded again before being handed to the renderer.

mod decoder;
mod encoder;
pub mod logo;
pub mod payload;

pub use decoder::QrDecoder;
pub use encoder::QrEncoder;
pub use payload::{ParsedPayload, encode_payload, escape_field, parse_payload, unescape_field};

use crate::credentials::Credentials;
use crate::error::{Error, Result};
use image::DynamicImage;
use qrcode::EcLevel;
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Raw QR payload data
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QrPayload {
    /// The raw data
    pub data: Vec<u8>,
    /// String representation if valid UTF-8
    pub text: Option<String>,
}

impl QrPayload {
    /// Create a new QR payload from a string
    pub fn from_string(s: String) -> Self {
        Self {
            data: s.as_bytes().to_vec(),
            text: Some(s),
        }
    }

    /// Payload text for the given credentials
    pub fn from_credentials(credentials: &Credentials) -> Self {
        Self::from_string(encode_payload(credentials))
    }

    /// Get the payload as a string, if valid UTF-8
    pub fn as_str(&self) -> Option<&str> {
        self.text.as_deref()
    }

    /// Get the raw bytes
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }
}

/// A rendered WiFi code ready for placement on the page
#[derive(Debug, Clone)]
pub struct WifiQr {
    /// Payload text carried by the code
    pub payload: QrPayload,
    /// Rendered code, grayscale without a logo and RGB with one
    pub image: DynamicImage,
    /// Error correction level used
    pub ecc_level: EcLevel,
    /// Whether a logo was composited
    pub has_logo: bool,
}

/// Build the code image for `credentials`, embedding the logo at `logo_path` if given.
///
/// A logo raises error correction to High and the result is verified by
/// decoding it; an unreadable logo or an undecodable result is an asset error.
pub fn build_wifi_qr(credentials: &Credentials, logo_path: Option<&Path>) -> Result<WifiQr> {
    let payload = QrPayload::from_credentials(credentials);

    let Some(logo_path) = logo_path else {
        let encoder = QrEncoder::new();
        let image = encoder.encode(&payload)?;
        return Ok(WifiQr {
            payload,
            image,
            ecc_level: encoder.ecc_level(),
            has_logo: false,
        });
    };

    let encoder = QrEncoder::for_logo();
    let code = encoder.encode(&payload)?;
    let fit_edge = logo::logo_fit_edge(code.width().min(code.height()));
    let logo_image = logo::load_logo(logo_path, fit_edge)?;
    let image = logo::embed_logo(&code, &logo_image)?;

    verify_decodes(&image, credentials)?;
    tracing::info!(logo = %logo_path.display(), "Logo embedded and verified");

    Ok(WifiQr {
        payload,
        image,
        ecc_level: encoder.ecc_level(),
        has_logo: true,
    })
}

fn verify_decodes(image: &DynamicImage, credentials: &Credentials) -> Result<()> {
    let decoded = QrDecoder::new()
        .decode(image)
        .map_err(|e| Error::Asset(format!("QR code is unreadable with logo: {e}")))?;

    let text = decoded
        .as_str()
        .ok_or_else(|| Error::Asset("QR code with logo decoded to binary data".to_string()))?;

    let parsed = parse_payload(text)
        .map_err(|e| Error::Asset(format!("QR code with logo decoded to garbage: {e}")))?;

    if !parsed.matches(credentials) {
        return Err(Error::Asset(
            "QR code with logo no longer matches the credentials".to_string(),
        ));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::credentials::SecurityMode;
    use image::{Rgb, RgbImage};

    fn office() -> Credentials {
        Credentials::new("Office-Guest", "Secret123!", SecurityMode::Wpa2).unwrap()
    }

    #[test]
    fn test_plain_code_uses_medium_ecc() {
        let qr = build_wifi_qr(&office(), None).unwrap();
        assert_eq!(qr.ecc_level, EcLevel::M);
        assert!(!qr.has_logo);
        assert_eq!(
            qr.payload.as_str(),
            Some("WIFI:T:WPA;S:Office-Guest;P:Secret123!;;")
        );

        let decoded = QrDecoder::new().decode(&qr.image).unwrap();
        assert_eq!(decoded.as_str(), qr.payload.as_str());
    }

    #[test]
    fn test_logo_raises_ecc_and_still_decodes() {
        let dir = tempfile::tempdir().unwrap();
        let logo_path = dir.path().join("logo.png");
        RgbImage::from_pixel(96, 48, Rgb([220, 30, 30]))
            .save(&logo_path)
            .unwrap();

        let qr = build_wifi_qr(&office(), Some(&logo_path)).unwrap();
        assert_eq!(qr.ecc_level, EcLevel::H);
        assert!(qr.has_logo);

        let decoded = QrDecoder::new().decode(&qr.image).unwrap();
        let parsed = parse_payload(decoded.as_str().unwrap()).unwrap();
        assert!(parsed.matches(&office()));
    }

    #[test]
    fn test_corrupt_logo_is_asset_error() {
        let dir = tempfile::tempdir().unwrap();
        let logo_path = dir.path().join("logo.jpg");
        std::fs::write(&logo_path, b"definitely not an image").unwrap();

        let err = build_wifi_qr(&office(), Some(&logo_path)).unwrap_err();
        assert!(matches!(err, Error::Asset(_)), "unexpected error: {err}");
    }
}
