//! WiFi credentials and their dotenv / environment loading

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::env;
use std::fmt;
use std::path::Path;

/// Environment key holding the network name
pub const SSID_KEY: &str = "WIFI_SSID";
/// Environment key holding the network password
pub const PASSWORD_KEY: &str = "WIFI_PASSWORD";
/// Environment key holding the security mode
pub const SECURITY_KEY: &str = "WIFI_SECURITY";

/// Authentication scheme advertised by the network
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SecurityMode {
    /// WPA personal
    Wpa,
    /// WPA2 personal
    #[default]
    Wpa2,
    /// Legacy WEP
    Wep,
    /// Open network, no password
    NoPass,
}

impl SecurityMode {
    /// Parse a security identifier (case-insensitive). Returns `None` for unknown values.
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_ascii_lowercase().as_str() {
            "wpa" | "wpa-psk" => Some(Self::Wpa),
            "wpa2" | "wpa2-psk" | "wpa/wpa2" => Some(Self::Wpa2),
            "wep" => Some(Self::Wep),
            "nopass" | "none" | "open" => Some(Self::NoPass),
            _ => None,
        }
    }

    /// Resolve an optional setting, substituting WPA2 when unset or unrecognised.
    pub fn from_setting(value: Option<&str>) -> Self {
        match value.map(str::trim).filter(|v| !v.is_empty()) {
            None => Self::default(),
            Some(raw) => Self::parse(raw).unwrap_or_else(|| {
                tracing::warn!(value = raw, "Unknown WiFi security mode, using WPA2");
                Self::default()
            }),
        }
    }

    /// Token used in the `T:` field of the WiFi QR grammar.
    pub fn qr_token(self) -> &'static str {
        match self {
            Self::Wpa | Self::Wpa2 => "WPA",
            Self::Wep => "WEP",
            Self::NoPass => "nopass",
        }
    }

    /// Human-readable label printed on the document.
    pub fn label(self) -> &'static str {
        match self {
            Self::Wpa => "WPA",
            Self::Wpa2 => "WPA2",
            Self::Wep => "WEP",
            Self::NoPass => "None (open network)",
        }
    }

    /// Whether a password must accompany this mode.
    pub fn requires_password(self) -> bool {
        !matches!(self, Self::NoPass)
    }
}

impl fmt::Display for SecurityMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Connection parameters for one wireless network
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    ssid: String,
    password: String,
    security: SecurityMode,
}

impl Credentials {
    /// Validate and build credentials.
    ///
    /// The SSID is always required. A password is required unless the network
    /// is open, in which case any supplied password is discarded.
    pub fn new(
        ssid: impl Into<String>,
        password: impl Into<String>,
        security: SecurityMode,
    ) -> Result<Self> {
        let ssid = ssid.into();
        let mut password = password.into();

        if ssid.is_empty() {
            return Err(Error::MissingCredential(format!("{SSID_KEY} is required")));
        }

        if security.requires_password() {
            if password.is_empty() {
                return Err(Error::MissingCredential(format!(
                    "{PASSWORD_KEY} is required for {} networks",
                    security.label()
                )));
            }
        } else if !password.is_empty() {
            tracing::debug!("Ignoring password for open network");
            password.clear();
        }

        Ok(Self {
            ssid,
            password,
            security,
        })
    }

    /// Build credentials from a key/value map using the `WIFI_*` keys.
    pub fn from_vars(vars: &HashMap<String, String>) -> Result<Self> {
        let ssid = vars.get(SSID_KEY).cloned().unwrap_or_default();
        let password = vars.get(PASSWORD_KEY).cloned().unwrap_or_default();
        let security = SecurityMode::from_setting(vars.get(SECURITY_KEY).map(String::as_str));
        Self::new(ssid, password, security)
    }

    /// Load credentials from a dotenv file, with the process environment taking precedence.
    ///
    /// A missing file is not an error as long as the environment provides the keys.
    pub fn load(env_file: &Path) -> Result<Self> {
        let mut vars = read_env_file(env_file)?;

        for key in [SSID_KEY, PASSWORD_KEY, SECURITY_KEY] {
            if let Ok(value) = env::var(key) {
                vars.insert(key.to_string(), value);
            }
        }

        Self::from_vars(&vars)
    }

    /// Network name
    pub fn ssid(&self) -> &str {
        &self.ssid
    }

    /// Network password (empty for open networks)
    pub fn password(&self) -> &str {
        &self.password
    }

    /// Security mode
    pub fn security(&self) -> SecurityMode {
        self.security
    }
}

fn read_env_file(path: &Path) -> Result<HashMap<String, String>> {
    let mut vars = HashMap::new();

    if !path.exists() {
        tracing::debug!("No env file at {}, using process environment", path.display());
        return Ok(vars);
    }

    let iter = dotenvy::from_path_iter(path)
        .map_err(|e| Error::Config(format!("Failed to read {}: {e}", path.display())))?;

    for item in iter {
        let (key, value) = item
            .map_err(|e| Error::Config(format!("Failed to parse {}: {e}", path.display())))?;
        vars.insert(key, value);
    }

    tracing::info!("Loaded env file: {}", path.display());
    Ok(vars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    fn vars(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_security_parse() {
        assert_eq!(SecurityMode::parse("WPA2"), Some(SecurityMode::Wpa2));
        assert_eq!(SecurityMode::parse("wpa"), Some(SecurityMode::Wpa));
        assert_eq!(SecurityMode::parse(" WEP "), Some(SecurityMode::Wep));
        assert_eq!(SecurityMode::parse("nopass"), Some(SecurityMode::NoPass));
        assert_eq!(SecurityMode::parse("WPA3-SAE"), None);
    }

    #[test]
    fn test_security_defaults_to_wpa2() {
        assert_eq!(SecurityMode::from_setting(None), SecurityMode::Wpa2);
        assert_eq!(SecurityMode::from_setting(Some("")), SecurityMode::Wpa2);
        assert_eq!(SecurityMode::from_setting(Some("bogus")), SecurityMode::Wpa2);
    }

    #[test]
    fn test_security_tokens() {
        assert_eq!(SecurityMode::Wpa2.qr_token(), "WPA");
        assert_eq!(SecurityMode::Wpa.qr_token(), "WPA");
        assert_eq!(SecurityMode::Wep.qr_token(), "WEP");
        assert_eq!(SecurityMode::NoPass.qr_token(), "nopass");
    }

    #[test]
    fn test_missing_ssid() {
        let err = Credentials::from_vars(&vars(&[(PASSWORD_KEY, "secret")])).unwrap_err();
        assert!(matches!(err, Error::MissingCredential(_)));
    }

    #[test]
    fn test_missing_password() {
        let err = Credentials::from_vars(&vars(&[(SSID_KEY, "Home")])).unwrap_err();
        assert!(matches!(err, Error::MissingCredential(_)));
    }

    #[test]
    fn test_open_network_drops_password() {
        let creds = Credentials::from_vars(&vars(&[
            (SSID_KEY, "Cafe"),
            (PASSWORD_KEY, "ignored"),
            (SECURITY_KEY, "nopass"),
        ]))
        .unwrap();
        assert_eq!(creds.security(), SecurityMode::NoPass);
        assert_eq!(creds.password(), "");

        let creds = Credentials::from_vars(&vars(&[(SSID_KEY, "Cafe"), (SECURITY_KEY, "open")]))
            .unwrap();
        assert_eq!(creds.ssid(), "Cafe");
    }

    #[test]
    fn test_load_env_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "# office network").unwrap();
        writeln!(file, "WIFI_SSID_UNUSED=x").unwrap();
        writeln!(file, "WIFI_SECURITY=WEP").unwrap();
        file.flush().unwrap();

        let vars = read_env_file(file.path()).unwrap();
        assert_eq!(vars.get(SECURITY_KEY).map(String::as_str), Some("WEP"));
        assert!(!vars.contains_key(SSID_KEY));
    }

    #[test]
    fn test_missing_env_file_is_empty() {
        let vars = read_env_file(Path::new("/nonexistent/wifiqr/.env")).unwrap();
        assert!(vars.is_empty());
    }
}
