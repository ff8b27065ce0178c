//! Per-run render options resolved from configuration and command-line overrides

use crate::config::RenderSettings;
use crate::credentials::SecurityMode;
use std::path::PathBuf;

/// Default QR edge as a fraction of the page width
pub const DEFAULT_QR_SIZE: f32 = 0.35;
/// Smallest accepted QR size fraction
pub const MIN_QR_SIZE: f32 = 0.2;
/// Largest accepted QR size fraction
pub const MAX_QR_SIZE: f32 = 0.5;

/// Title used when none is configured
pub const DEFAULT_TITLE: &str = "WiFi Network Access";
/// Footer line printed at the bottom of the page
pub const FOOTER_TEXT: &str = "Keep this document for easy WiFi network access";

/// Return `value` if it lies in `[MIN_QR_SIZE, MAX_QR_SIZE]`, otherwise the default.
///
/// Out-of-range values are replaced, not clamped to the nearest bound.
pub fn normalize_qr_size(value: f32) -> f32 {
    if (MIN_QR_SIZE..=MAX_QR_SIZE).contains(&value) {
        value
    } else {
        tracing::warn!(
            requested = value,
            "QR size should be between {MIN_QR_SIZE} and {MAX_QR_SIZE}, using default {DEFAULT_QR_SIZE}"
        );
        DEFAULT_QR_SIZE
    }
}

/// Subtitle derived from the security mode when none is configured
pub fn default_subtitle(security: SecurityMode) -> &'static str {
    match security {
        SecurityMode::NoPass => "Scan the QR code to join this open network",
        _ => "Scan the QR code or use the connection details below",
    }
}

/// Immutable options for one rendered document
#[derive(Debug, Clone, PartialEq)]
pub struct RenderOptions {
    /// QR edge as a fraction of the page width, within bounds
    pub qr_size: f32,
    /// Title line
    pub title: String,
    /// Subtitle line; empty hides it
    pub subtitle: String,
    /// Whether the footer line is printed
    pub show_footer: bool,
    /// Logo to embed in the QR code
    pub logo: Option<PathBuf>,
}

impl RenderOptions {
    /// Resolve settings into concrete options, filling documented defaults.
    pub fn from_settings(settings: &RenderSettings, security: SecurityMode) -> Self {
        Self {
            qr_size: normalize_qr_size(settings.qr_size),
            title: settings
                .title
                .clone()
                .unwrap_or_else(|| DEFAULT_TITLE.to_string()),
            subtitle: settings
                .subtitle
                .clone()
                .unwrap_or_else(|| default_subtitle(security).to_string()),
            show_footer: settings.show_footer,
            logo: settings.logo.clone(),
        }
    }
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self::from_settings(&RenderSettings::default(), SecurityMode::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_out_of_range_qr_size_is_replaced() {
        assert_eq!(normalize_qr_size(0.05), DEFAULT_QR_SIZE);
        assert_eq!(normalize_qr_size(0.9), DEFAULT_QR_SIZE);
        assert_eq!(normalize_qr_size(f32::NAN), DEFAULT_QR_SIZE);
    }

    #[test]
    fn test_in_range_qr_size_is_kept() {
        assert_eq!(normalize_qr_size(0.4), 0.4);
        assert_eq!(normalize_qr_size(0.2), 0.2);
        assert_eq!(normalize_qr_size(0.5), 0.5);
    }

    #[test]
    fn test_defaults_follow_security() {
        let settings = RenderSettings::default();
        let open = RenderOptions::from_settings(&settings, SecurityMode::NoPass);
        assert_eq!(open.title, DEFAULT_TITLE);
        assert_eq!(open.subtitle, default_subtitle(SecurityMode::NoPass));

        let secured = RenderOptions::from_settings(&settings, SecurityMode::Wpa2);
        assert_ne!(secured.subtitle, open.subtitle);
        assert!(secured.show_footer);
        assert_eq!(secured.qr_size, DEFAULT_QR_SIZE);
    }

    #[test]
    fn test_overrides_win() {
        let settings = RenderSettings {
            qr_size: 0.9,
            title: Some("Guest WiFi".to_string()),
            subtitle: Some(String::new()),
            show_footer: false,
            ..RenderSettings::default()
        };
        let options = RenderOptions::from_settings(&settings, SecurityMode::Wep);
        assert_eq!(options.qr_size, DEFAULT_QR_SIZE);
        assert_eq!(options.title, "Guest WiFi");
        assert!(options.subtitle.is_empty());
        assert!(!options.show_footer);
    }
}
