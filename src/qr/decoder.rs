//! Reading codes back with rqrr

use crate::error::{Error, Result};
use crate::qr::QrPayload;
use image::{DynamicImage, GrayImage};

/// Decoder used to check that a rendered code still scans
#[derive(Debug, Clone, Copy, Default)]
pub struct QrDecoder;

impl QrDecoder {
    /// Create a decoder
    pub fn new() -> Self {
        Self
    }

    /// Decode the first readable code in `img`.
    ///
    /// Color images (codes carrying a logo) are reduced to luma first.
    pub fn decode(&self, img: &DynamicImage) -> Result<QrPayload> {
        self.decode_gray(img.to_luma8())
    }

    /// Decode the first readable code in a grayscale image.
    ///
    /// Every detected grid is tried in turn; the last decode error is
    /// reported when none of them yields text.
    pub fn decode_gray(&self, img: GrayImage) -> Result<QrPayload> {
        let (width, height) = img.dimensions();
        let mut prepared = rqrr::PreparedImage::prepare(img);
        let grids = prepared.detect_grids();
        if grids.is_empty() {
            return Err(Error::NoQrCodeFound);
        }

        let mut last_error = None;
        for (index, grid) in grids.iter().enumerate() {
            match grid.decode() {
                Ok((meta, content)) => {
                    tracing::debug!(
                        grid = index,
                        version = ?meta.version,
                        ecc_level = meta.ecc_level,
                        width,
                        height,
                        "Read back QR code"
                    );
                    return Ok(QrPayload::from_string(content));
                }
                Err(e) => {
                    tracing::debug!(grid = index, error = ?e, "Grid did not decode");
                    last_error = Some(e);
                }
            }
        }

        Err(Error::QrDecode(match last_error {
            Some(e) => format!("{e:?} ({} grid(s) detected)", grids.len()),
            None => "no grid decoded".to_string(),
        }))
    }
}
