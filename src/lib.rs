//! wifiqr - printable WiFi QR code sheets
//!
//! This library turns WiFi credentials into a themed, single-page A4 PDF
//! carrying a scannable WiFi QR code and the connection details in text.
//!
//! # Pipeline
//!
//! - **Credentials**: loaded once from a dotenv file and the environment
//! - **QR**: payload text in the WiFi grammar, rendered with an optional logo
//! - **Theme**: resolved by key from an immutable [`ThemeTable`]
//! - **Render**: layout computed from the theme and options, then written as PDF
//!
//! # Example
//!
//! ```no_run
//! use std::path::Path;
//! use wifiqr::{Credentials, RenderOptions, SecurityMode, ThemeTable};
//!
//! fn main() -> wifiqr::Result<()> {
//!     let credentials = Credentials::new("Office-Guest", "Secret123!", SecurityMode::Wpa2)?;
//!     let themes = ThemeTable::load(Path::new("themes.yaml"))?;
//!     let theme = themes.resolve("fritzbox");
//!     let options = RenderOptions::default();
//!
//!     let qr = wifiqr::qr::build_wifi_qr(&credentials, None)?;
//!     let path = wifiqr::generate_document(&credentials, &theme, &options, &qr, Path::new("output"), None)?;
//!     println!("Wrote {}", path.display());
//!     Ok(())
//! }
//! ```

#![warn(missing_docs, rust_2024_compatibility)]

pub mod config;
pub mod credentials;
pub mod error;
pub mod logging;
pub mod output;
pub mod qr;
pub mod render;
pub mod theme;

// Re-exports for convenience
pub use error::{Error, Result};

pub use config::{AppConfig, LogRotation, LoggingOptions, OutputOptions, RenderSettings};
pub use credentials::{Credentials, SecurityMode};
pub use qr::{QrDecoder, QrEncoder, QrPayload, WifiQr};
pub use render::RenderOptions;
pub use theme::{Color, Theme, ThemeTable};

use std::path::{Path, PathBuf};

/// Render one document and write it under `output_dir`.
///
/// `salt` is mixed into the timestamp hash, which keeps names distinct when
/// several documents are written in the same run.
pub fn generate_document(
    credentials: &Credentials,
    theme: &Theme,
    options: &RenderOptions,
    qr: &WifiQr,
    output_dir: &Path,
    salt: Option<&str>,
) -> Result<PathBuf> {
    let bytes = render::render_document(credentials, theme, options, qr)?;
    let path = output::write_artifact(output_dir, salt, &bytes)?;
    tracing::info!(theme = %theme.key, path = %path.display(), "PDF created");
    Ok(path)
}
