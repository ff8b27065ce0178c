//! Single-page document rendering
//!
//! Rendering is split into a pure geometry pass ([`layout::compute_layout`])
//! and a serialisation pass ([`pdf::write_pdf`]) so that placement can be
//! checked without parsing PDF output.

pub mod fonts;
pub mod layout;
pub mod options;
pub mod pdf;

pub use layout::{PageLayout, compute_layout};
pub use options::{DEFAULT_QR_SIZE, RenderOptions, normalize_qr_size};

use crate::credentials::Credentials;
use crate::error::Result;
use crate::qr::WifiQr;
use crate::theme::Theme;

/// Render the complete document to PDF bytes.
pub fn render_document(
    credentials: &Credentials,
    theme: &Theme,
    options: &RenderOptions,
    qr: &WifiQr,
) -> Result<Vec<u8>> {
    let page = compute_layout(credentials, theme, options);
    tracing::debug!(
        theme = %theme.key,
        qr_edge_pt = page.qr.width,
        footer = page.footer.is_some(),
        "Computed page layout"
    );
    pdf::write_pdf(&page, &qr.image, &options.title)
}
