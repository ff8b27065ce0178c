//! wifiqr command-line entrypoint

use clap::{ArgAction, Parser};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::{info, warn};
use wifiqr::qr::build_wifi_qr;
use wifiqr::{
    AppConfig, Credentials, Error, RenderOptions, Result, ThemeTable, WifiQr, generate_document,
    logging,
};

const EXAMPLES: &str = "\
Examples:
  wifiqr --theme fritzbox
  wifiqr --theme red --qr-size 0.4
  wifiqr --theme minimal --title \"My WiFi Network\"
  wifiqr --theme dark --no-footer
  wifiqr --logo logo.png
  wifiqr --all";

#[derive(Parser, Debug)]
#[command(
    name = "wifiqr",
    version,
    about = "Generate a printable WiFi QR code PDF with customizable design themes",
    after_help = EXAMPLES
)]
struct Cli {
    /// Optional configuration file (toml/yaml). Defaults to wifiqr.{toml,yaml} in cwd/XDG config.
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Design theme to use (default: fritzbox)
    #[arg(short = 't', long, value_name = "KEY")]
    theme: Option<String>,

    /// QR code size as fraction of page width (default: 0.35, range: 0.2-0.5)
    #[arg(short = 's', long, value_name = "FRACTION")]
    qr_size: Option<f32>,

    /// Custom title text (default: "WiFi Network Access")
    #[arg(long)]
    title: Option<String>,

    /// Custom subtitle text (default depends on the security mode)
    #[arg(long)]
    subtitle: Option<String>,

    /// Hide footer text
    #[arg(long)]
    no_footer: bool,

    /// Logo image to embed in the QR code center (PNG, JPEG, ...)
    #[arg(long, value_name = "PATH")]
    logo: Option<PathBuf>,

    /// Path to themes file (default: themes.yaml)
    #[arg(long, value_name = "PATH")]
    themes_file: Option<PathBuf>,

    /// Path to the .env file holding WIFI_SSID / WIFI_PASSWORD / WIFI_SECURITY
    #[arg(long, value_name = "PATH")]
    env_file: Option<PathBuf>,

    /// Directory receiving generated PDFs (default: output)
    #[arg(short = 'o', long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// List all available themes and exit
    #[arg(long)]
    list_themes: bool,

    /// Generate PDFs for all available themes
    #[arg(long, conflicts_with = "theme")]
    all: bool,

    /// Output results as JSON instead of human-readable text
    #[arg(long)]
    json: bool,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    match run(cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("Error: {err}");
            if matches!(err, Error::MissingCredential(_)) {
                eprintln!();
                eprintln!("Please create a .env file with the following variables:");
                eprintln!("WIFI_SSID=YourNetworkName");
                eprintln!("WIFI_PASSWORD=YourPassword");
                eprintln!("WIFI_SECURITY=WPA2");
            }
            ExitCode::FAILURE
        }
    }
}

fn run(cli: Cli) -> Result<()> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    apply_cli_overrides(&mut config, &cli);

    logging::init(&config.logging)?;

    let settings = &config.render;

    if cli.list_themes {
        let themes = ThemeTable::load(&settings.themes_file)?;
        return list_themes(&themes, &settings.themes_file, cli.json);
    }

    let credentials = Credentials::load(&settings.env_file)?;
    info!(ssid = credentials.ssid(), security = %credentials.security(), "Loaded WiFi data");

    let options = RenderOptions::from_settings(settings, credentials.security());
    let themes = ThemeTable::load(&settings.themes_file)?;
    let qr = build_wifi_qr(&credentials, options.logo.as_deref())?;
    let output_dir = &config.output.dir;

    if cli.all {
        return generate_all(&credentials, &themes, &options, &qr, output_dir, cli.json);
    }

    let theme = themes.resolve(&settings.theme);
    info!(theme = %theme.name, "Using theme from {}", settings.themes_file.display());

    let path = generate_document(&credentials, &theme, &options, &qr, output_dir, None)?;

    if cli.json {
        let summary = json!({
            "files": [path.display().to_string()],
            "theme": theme.key,
            "payload_security": credentials.security().qr_token(),
            "logo": qr.has_logo,
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("✓ PDF created successfully: {}", path.display());
    }

    Ok(())
}

fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) {
    let render = &mut config.render;
    if let Some(theme) = &cli.theme {
        render.theme = theme.clone();
    }
    if let Some(qr_size) = cli.qr_size {
        render.qr_size = qr_size;
    }
    if let Some(title) = &cli.title {
        render.title = Some(title.clone());
    }
    if let Some(subtitle) = &cli.subtitle {
        render.subtitle = Some(subtitle.clone());
    }
    if cli.no_footer {
        render.show_footer = false;
    }
    if let Some(logo) = &cli.logo {
        render.logo = Some(logo.clone());
    }
    if let Some(path) = &cli.themes_file {
        render.themes_file = path.clone();
    }
    if let Some(path) = &cli.env_file {
        render.env_file = path.clone();
    }
    if let Some(dir) = &cli.output_dir {
        config.output.dir = dir.clone();
    }

    if let Some(level) = verbosity_level(cli.verbose) {
        config.logging.level = level.to_string();
    }
}

fn verbosity_level(count: u8) -> Option<&'static str> {
    match count {
        0 => None,
        1 => Some("info"),
        2 => Some("debug"),
        _ => Some("trace"),
    }
}

fn list_themes(themes: &ThemeTable, source: &Path, json: bool) -> Result<()> {
    if json {
        let listing: Vec<_> = themes.iter().collect();
        println!("{}", serde_json::to_string_pretty(&listing)?);
        return Ok(());
    }

    println!("Available design themes:");
    println!("{}", "-".repeat(60));
    for theme in themes.iter() {
        println!("  {:12} - {}", theme.key, theme.name);
    }
    println!("{}", "-".repeat(60));
    println!("\nThemes loaded from: {}", source.display());
    Ok(())
}

fn generate_all(
    credentials: &Credentials,
    themes: &ThemeTable,
    options: &RenderOptions,
    qr: &WifiQr,
    output_dir: &Path,
    json: bool,
) -> Result<()> {
    let total = themes.len();
    if !json {
        println!("✓ Generating PDFs for all {total} themes...");
        println!("{}", "-".repeat(60));
    }

    let mut files = Vec::new();
    for theme in themes.iter() {
        let salt = format!("{}{}", theme.key, options.qr_size);
        match generate_document(credentials, theme, options, qr, output_dir, Some(&salt)) {
            Ok(path) => {
                files.push(json!({ "theme": theme.key, "path": path.display().to_string() }));
                if !json {
                    println!("  [{}/{total}] ✓ {}", files.len(), theme.name);
                }
            }
            Err(err) => {
                warn!(theme = %theme.key, "Failed to generate PDF: {err}");
                if !json {
                    println!("  ✗ Failed to generate PDF for {}: {err}", theme.name);
                }
            }
        }
    }

    let generated = files.len();
    if json {
        let summary = json!({
            "files": files,
            "generated": generated,
            "total": total,
            "payload_security": credentials.security().qr_token(),
        });
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        println!("{}", "-".repeat(60));
        println!("✓ Successfully generated {generated}/{total} PDFs");
    }

    if generated == 0 {
        return Err(Error::Other(format!(
            "No PDFs could be generated for {total} themes"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn merged(args: &[&str]) -> AppConfig {
        let cli = Cli::try_parse_from(std::iter::once("wifiqr").chain(args.iter().copied()))
            .unwrap();
        let mut config = AppConfig::default();
        config.render.theme = "dark".to_string();
        config.output.dir = PathBuf::from("from-config");
        apply_cli_overrides(&mut config, &cli);
        config
    }

    #[test]
    fn test_flags_override_loaded_config() {
        let config = merged(&[
            "-t",
            "red",
            "-s",
            "0.4",
            "--no-footer",
            "--title",
            "Guests",
            "-o",
            "prints",
        ]);
        assert_eq!(config.render.theme, "red");
        assert_eq!(config.render.qr_size, 0.4);
        assert!(!config.render.show_footer);
        assert_eq!(config.render.title.as_deref(), Some("Guests"));
        assert_eq!(config.output.dir, PathBuf::from("prints"));
    }

    #[test]
    fn test_absent_flags_keep_loaded_config() {
        let config = merged(&[]);
        assert_eq!(config.render.theme, "dark");
        assert!(config.render.show_footer);
        assert_eq!(config.output.dir, PathBuf::from("from-config"));
        assert_eq!(config.logging.level, "warn");
    }

    #[test]
    fn test_verbosity_levels() {
        assert_eq!(merged(&["-v"]).logging.level, "info");
        assert_eq!(merged(&["-vv"]).logging.level, "debug");
        assert_eq!(merged(&["-vvv"]).logging.level, "trace");
        assert_eq!(merged(&["-vvvv"]).logging.level, "trace");
    }

    #[test]
    fn test_all_conflicts_with_theme() {
        assert!(Cli::try_parse_from(["wifiqr", "--all", "--theme", "red"]).is_err());
    }
}
