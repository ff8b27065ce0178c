//! Visual themes: color palettes and layout switches loaded from a themes file

use crate::config::read_structured;
use crate::error::{Error, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;
use std::path::Path;

/// Key of the built-in fallback theme
pub const DEFAULT_THEME_KEY: &str = "fritzbox";

/// 24-bit sRGB color, written as `#RRGGBB` in theme files
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Color {
    /// Red channel
    pub r: u8,
    /// Green channel
    pub g: u8,
    /// Blue channel
    pub b: u8,
}

impl Color {
    /// Build a color from channel values
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Parse `#RRGGBB` or `#RGB` (the leading `#` is optional).
    pub fn from_hex(value: &str) -> Option<Self> {
        let digits = value.trim().trim_start_matches('#');
        let expanded: String = match digits.len() {
            3 => digits.chars().flat_map(|c| [c, c]).collect(),
            6 => digits.to_string(),
            _ => return None,
        };
        let bytes = hex::decode(expanded).ok()?;
        Some(Self::rgb(bytes[0], bytes[1], bytes[2]))
    }

    /// Channels scaled to `0.0..=1.0`
    pub fn unit(self) -> [f32; 3] {
        [
            f32::from(self.r) / 255.0,
            f32::from(self.g) / 255.0,
            f32::from(self.b) / 255.0,
        ]
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", hex::encode_upper([self.r, self.g, self.b]))
    }
}

impl TryFrom<String> for Color {
    type Error = String;

    fn try_from(value: String) -> std::result::Result<Self, Self::Error> {
        Self::from_hex(&value).ok_or_else(|| format!("invalid color '{value}', expected #RRGGBB"))
    }
}

impl From<Color> for String {
    fn from(color: Color) -> Self {
        color.to_string()
    }
}

/// Named color roles used by the renderer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Palette {
    /// Top bar, border and emphasised values
    pub primary: Color,
    /// Corner accents
    pub secondary: Color,
    /// Accent color
    pub accent: Color,
    /// Page background
    pub background: Color,
    /// Info box and QR frame fill
    pub info_box: Color,
    /// Body text
    pub text: Color,
    /// Subtitle, footer and secondary values
    pub text_secondary: Color,
    /// Box outlines
    pub border: Color,
    /// Title when there is no top bar
    pub title: Color,
}

impl Default for Palette {
    fn default() -> Self {
        let black = Color::rgb(0x00, 0x00, 0x00);
        Self {
            primary: black,
            secondary: black,
            accent: black,
            background: Color::rgb(0xFF, 0xFF, 0xFF),
            info_box: Color::rgb(0xFF, 0xFF, 0xFF),
            text: black,
            text_secondary: Color::rgb(0x66, 0x66, 0x66),
            border: Color::rgb(0xCC, 0xCC, 0xCC),
            title: black,
        }
    }
}

/// Decorative layout switches
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LayoutFlags {
    /// Draw a primary-colored bar across the top of the page
    pub has_top_bar: bool,
    /// Draw a primary-colored frame around the page
    pub has_border: bool,
    /// Frame width in millimetres
    pub border_width: f32,
    /// Corner accent edge in millimetres (only drawn with a border)
    pub corner_size: f32,
}

impl Default for LayoutFlags {
    fn default() -> Self {
        Self {
            has_top_bar: true,
            has_border: false,
            border_width: 0.0,
            corner_size: 0.0,
        }
    }
}

/// A resolved visual theme
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Theme {
    /// Lookup key
    pub key: String,
    /// Display name
    pub name: String,
    /// Free-form description
    pub description: String,
    /// Colors
    pub palette: Palette,
    /// Layout switches
    pub layout: LayoutFlags,
}

impl Theme {
    /// The fixed fallback theme used when a requested key is not in the table
    pub fn builtin_default() -> Self {
        Self {
            key: DEFAULT_THEME_KEY.to_string(),
            name: "FritzBox".to_string(),
            description: "Clean blue router-label look".to_string(),
            palette: Palette {
                primary: Color::rgb(0x00, 0x66, 0xCC),
                secondary: Color::rgb(0x00, 0x44, 0x99),
                accent: Color::rgb(0x00, 0x66, 0xCC),
                background: Color::rgb(0xFF, 0xFF, 0xFF),
                info_box: Color::rgb(0xE6, 0xF2, 0xFF),
                text: Color::rgb(0x33, 0x33, 0x33),
                text_secondary: Color::rgb(0x66, 0x66, 0x66),
                border: Color::rgb(0xCC, 0xCC, 0xCC),
                title: Color::rgb(0xFF, 0xFF, 0xFF),
            },
            layout: LayoutFlags::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ThemeFile {
    themes: IndexMap<String, ThemeRecord>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ThemeRecord {
    name: Option<String>,
    description: String,
    colors: Palette,
    layout: LayoutFlags,
}

/// Immutable table of themes in file order
#[derive(Debug, Clone, Default)]
pub struct ThemeTable {
    themes: IndexMap<String, Theme>,
}

impl ThemeTable {
    /// Load a theme table from a YAML or TOML file.
    ///
    /// A missing, unreadable, malformed or empty file is a configuration error.
    pub fn load(path: &Path) -> Result<Self> {
        let file: ThemeFile = read_structured(path, "themes")?;

        let table = Self::from_records(file.themes);
        if table.is_empty() {
            return Err(Error::Config(format!(
                "Themes file {} defines no themes",
                path.display()
            )));
        }

        tracing::debug!(count = table.len(), path = %path.display(), "Loaded themes");
        Ok(table)
    }

    /// Parse a YAML theme table from a string.
    pub fn from_yaml_str(contents: &str) -> Result<Self> {
        let file: ThemeFile = serde_yaml::from_str(contents)
            .map_err(|e| Error::Config(format!("Failed to parse themes YAML: {e}")))?;
        Ok(Self::from_records(file.themes))
    }

    fn from_records(records: IndexMap<String, ThemeRecord>) -> Self {
        let themes = records
            .into_iter()
            .map(|(key, record)| {
                let theme = Theme {
                    name: record.name.unwrap_or_else(|| title_case(&key)),
                    key: key.clone(),
                    description: record.description,
                    palette: record.colors,
                    layout: record.layout,
                };
                (key, theme)
            })
            .collect();
        Self { themes }
    }

    /// Look up a theme by key.
    pub fn get(&self, key: &str) -> Option<&Theme> {
        self.themes.get(key)
    }

    /// Return the theme for `key`, or the built-in default when it is absent.
    pub fn resolve(&self, key: &str) -> Cow<'_, Theme> {
        match self.themes.get(key) {
            Some(theme) => Cow::Borrowed(theme),
            None => {
                tracing::warn!(
                    requested = key,
                    available = %self.keys().collect::<Vec<_>>().join(", "),
                    "Theme not found, using built-in '{DEFAULT_THEME_KEY}'"
                );
                Cow::Owned(Theme::builtin_default())
            }
        }
    }

    /// Theme keys in file order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.themes.keys().map(String::as_str)
    }

    /// Themes in file order
    pub fn iter(&self) -> impl Iterator<Item = &Theme> {
        self.themes.values()
    }

    /// Number of themes
    pub fn len(&self) -> usize {
        self.themes.len()
    }

    /// Whether the table is empty
    pub fn is_empty(&self) -> bool {
        self.themes.is_empty()
    }
}

fn title_case(key: &str) -> String {
    let mut chars = key.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    const SAMPLE: &str = r##"
themes:
  red:
    name: "Red Alert"
    description: "Bold red"
    colors:
      primary: "#CC0000"
      background: "#FFF5F5"
    layout:
      has_top_bar: false
      has_border: true
      border_width: 4
      corner_size: 12
  minimal:
    colors:
      primary: "#222"
"##;

    #[test]
    fn test_color_parse() {
        assert_eq!(Color::from_hex("#0066CC"), Some(Color::rgb(0, 0x66, 0xCC)));
        assert_eq!(Color::from_hex("fff"), Some(Color::rgb(255, 255, 255)));
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#GGGGGG"), None);
        assert_eq!(Color::rgb(0, 0x66, 0xCC).to_string(), "#0066CC");
    }

    #[test]
    fn test_parse_table_with_defaults() {
        let table = ThemeTable::from_yaml_str(SAMPLE).unwrap();
        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["red", "minimal"]);

        let red = table.get("red").unwrap();
        assert_eq!(red.name, "Red Alert");
        assert_eq!(red.palette.primary, Color::rgb(0xCC, 0, 0));
        assert_eq!(red.palette.border, Color::rgb(0xCC, 0xCC, 0xCC));
        assert!(!red.layout.has_top_bar);
        assert_eq!(red.layout.corner_size, 12.0);

        let minimal = table.get("minimal").unwrap();
        assert_eq!(minimal.name, "Minimal");
        assert!(minimal.layout.has_top_bar);
        assert_eq!(minimal.palette.primary, Color::rgb(0x22, 0x22, 0x22));
    }

    #[test]
    fn test_unknown_key_falls_back() {
        let table = ThemeTable::from_yaml_str(SAMPLE).unwrap();
        let theme = table.resolve("neon");
        assert_eq!(*theme, Theme::builtin_default());
        assert!(matches!(table.resolve("red"), Cow::Borrowed(_)));
    }

    #[test]
    fn test_invalid_color_is_config_error() {
        let err = ThemeTable::from_yaml_str("themes:\n  x:\n    colors:\n      primary: red\n")
            .unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_missing_file_is_config_error() {
        let err = ThemeTable::load(Path::new("/nonexistent/themes.yaml")).unwrap_err();
        assert!(matches!(err, Error::Config(_)));
    }

    #[test]
    fn test_malformed_and_empty_files() {
        let dir = tempfile::tempdir().unwrap();

        let bad = dir.path().join("themes.yaml");
        fs::write(&bad, "colors: [unterminated").unwrap();
        assert!(matches!(ThemeTable::load(&bad), Err(Error::Config(_))));

        let no_key = dir.path().join("other.yaml");
        fs::write(&no_key, "styles: {}\n").unwrap();
        assert!(matches!(ThemeTable::load(&no_key), Err(Error::Config(_))));

        let empty = dir.path().join("empty.yaml");
        fs::write(&empty, "themes: {}\n").unwrap();
        assert!(matches!(ThemeTable::load(&empty), Err(Error::Config(_))));
    }

    #[test]
    fn test_load_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("themes.toml");
        fs::write(
            &path,
            "[themes.dark]\nname = \"Dark\"\n[themes.dark.colors]\nbackground = \"#1A1A1A\"\n",
        )
        .unwrap();
        let table = ThemeTable::load(&path).unwrap();
        assert_eq!(
            table.get("dark").unwrap().palette.background,
            Color::rgb(0x1A, 0x1A, 0x1A)
        );
    }

    #[test]
    fn test_unsupported_themes_extension() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("themes.json");
        fs::write(&path, "{\"themes\": {}}").unwrap();

        let err = ThemeTable::load(&path).unwrap_err();
        assert!(matches!(&err, Error::Config(msg) if msg.contains("themes format 'json'")));
    }
}
