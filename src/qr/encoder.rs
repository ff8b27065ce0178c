//! QR code encoder

use crate::error::{Error, Result};
use crate::qr::QrPayload;
use image::{DynamicImage, Luma};
use qrcode::{EcLevel, QrCode};

/// Minimum edge length of the rendered code, including the quiet zone
const MIN_DIMENSION: u32 = 400;

/// QR code encoder
pub struct QrEncoder {
    /// Error correction level
    ecc_level: EcLevel,
}

impl QrEncoder {
    /// Create a new QR encoder with default settings (Medium ECC)
    pub fn new() -> Self {
        Self {
            ecc_level: EcLevel::M,
        }
    }

    /// Create a new QR encoder with a specific error correction level
    pub fn with_ecc_level(ecc_level: EcLevel) -> Self {
        Self { ecc_level }
    }

    /// Encoder suited for codes that will carry a logo overlay (High ECC)
    pub fn for_logo() -> Self {
        Self::with_ecc_level(EcLevel::H)
    }

    /// Configured error correction level
    pub fn ecc_level(&self) -> EcLevel {
        self.ecc_level
    }

    /// Encode data into a QR code image
    pub fn encode(&self, payload: &QrPayload) -> Result<DynamicImage> {
        let code = QrCode::with_error_correction_level(&payload.data, self.ecc_level)
            .map_err(|e| Error::QrEncode(format!("Failed to create QR code: {}", e)))?;

        tracing::debug!(
            version = ?code.version(),
            ecc_level = ?self.ecc_level,
            modules = code.width(),
            "Encoded QR code"
        );

        let image = code
            .render::<Luma<u8>>()
            .quiet_zone(true)
            .min_dimensions(MIN_DIMENSION, MIN_DIMENSION)
            .build();

        Ok(DynamicImage::ImageLuma8(image))
    }

    /// Encode a string into a QR code image
    pub fn encode_string(&self, data: &str) -> Result<DynamicImage> {
        let payload = QrPayload::from_string(data.to_string());
        self.encode(&payload)
    }
}

impl Default for QrEncoder {
    fn default() -> Self {
        Self::new()
    }
}
