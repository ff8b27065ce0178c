use std::fs;
use std::path::{Path, PathBuf};
use std::process::{Command, Output};

use serde_json::Value;

const FOOTER: &[u8] = b"Keep this document for easy WiFi network access";

fn themes_file() -> PathBuf {
    Path::new(env!("CARGO_MANIFEST_DIR")).join("themes.yaml")
}

/// Run the binary in `dir` with a clean environment.
fn wifiqr(dir: &Path, args: &[&str], envs: &[(&str, &str)]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_wifiqr"))
        .current_dir(dir)
        .env_clear()
        .env("WIFIQR_LOG_COLOR", "0")
        .envs(envs.iter().copied())
        .args(args)
        .output()
        .expect("spawn wifiqr")
}

fn workspace_with_env() -> tempfile::TempDir {
    let dir = tempfile::tempdir().expect("tempdir");
    fs::write(
        dir.path().join(".env"),
        "WIFI_SSID=Office-Guest\nWIFI_PASSWORD=Secret123!\nWIFI_SECURITY=WPA2\n",
    )
    .expect("write .env");
    dir
}

fn json_stdout(output: &Output) -> Value {
    assert!(
        output.status.success(),
        "wifiqr failed: {}",
        String::from_utf8_lossy(&output.stderr)
    );
    serde_json::from_slice(&output.stdout).expect("json summary")
}

fn single_file(summary: &Value) -> PathBuf {
    let files = summary["files"].as_array().expect("files array");
    assert_eq!(files.len(), 1);
    PathBuf::from(files[0].as_str().expect("path string"))
}

fn contains(haystack: &[u8], needle: &[u8]) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle)
}

#[test]
fn list_themes_prints_key_and_name() {
    let dir = tempfile::tempdir().expect("tempdir");
    let themes = themes_file();
    let output = wifiqr(
        dir.path(),
        &["--list-themes", "--themes-file", themes.to_str().unwrap()],
        &[],
    );

    assert!(output.status.success());
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("  fritzbox     - FritzBox"), "{stdout}");
    assert!(stdout.contains("  dark         - Dark"), "{stdout}");
    assert!(stdout.contains("Themes loaded from:"));
    assert!(!dir.path().join("output").exists());
}

#[test]
fn list_themes_json_keeps_file_order() {
    let dir = tempfile::tempdir().expect("tempdir");
    let themes = themes_file();
    let output = wifiqr(
        dir.path(),
        &["--list-themes", "--json", "--themes-file", themes.to_str().unwrap()],
        &[],
    );

    let listing = json_stdout(&output);
    let keys: Vec<&str> = listing
        .as_array()
        .expect("theme array")
        .iter()
        .map(|theme| theme["key"].as_str().expect("key"))
        .collect();
    assert_eq!(
        keys,
        vec!["fritzbox", "red", "minimal", "corporate", "green", "purple", "dark"]
    );
}

#[test]
fn missing_credentials_exit_with_env_hint() {
    let dir = tempfile::tempdir().expect("tempdir");
    let themes = themes_file();
    let output = wifiqr(
        dir.path(),
        &["--themes-file", themes.to_str().unwrap()],
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("Missing credential"), "{stderr}");
    assert!(stderr.contains("WIFI_SSID=YourNetworkName"), "{stderr}");
    assert!(!dir.path().join("output").exists());
}

#[test]
fn output_dir_precedence_is_config_then_env_then_flag() {
    let dir = workspace_with_env();
    let themes = themes_file();
    let themes = themes.to_str().unwrap();
    fs::write(
        dir.path().join("wifiqr.toml"),
        "[output]\ndir = \"from-config\"\n",
    )
    .expect("write config");

    let from_config = single_file(&json_stdout(&wifiqr(
        dir.path(),
        &["--json", "--themes-file", themes],
        &[],
    )));
    assert!(from_config.starts_with("from-config"), "{}", from_config.display());

    let env = [("WIFIQR_OUTPUT_DIR", "from-env")];
    let from_env = single_file(&json_stdout(&wifiqr(
        dir.path(),
        &["--json", "--themes-file", themes],
        &env,
    )));
    assert!(from_env.starts_with("from-env"), "{}", from_env.display());

    let from_flag = single_file(&json_stdout(&wifiqr(
        dir.path(),
        &["--json", "--themes-file", themes, "-o", "from-flag"],
        &env,
    )));
    assert!(from_flag.starts_with("from-flag"), "{}", from_flag.display());
    assert!(dir.path().join(&from_flag).is_file());
}

#[test]
fn no_footer_drops_footer_text() {
    let dir = workspace_with_env();
    let themes = themes_file();
    let themes = themes.to_str().unwrap();

    let with_footer = single_file(&json_stdout(&wifiqr(
        dir.path(),
        &["--json", "--themes-file", themes],
        &[],
    )));
    let without_footer = single_file(&json_stdout(&wifiqr(
        dir.path(),
        &["--json", "--no-footer", "--themes-file", themes],
        &[],
    )));

    let with_bytes = fs::read(dir.path().join(with_footer)).expect("read pdf");
    let without_bytes = fs::read(dir.path().join(without_footer)).expect("read pdf");
    assert!(contains(&with_bytes, FOOTER));
    assert!(!contains(&without_bytes, FOOTER));
}

#[test]
fn verbose_flag_raises_log_level() {
    let dir = workspace_with_env();
    let themes = themes_file();
    let themes = themes.to_str().unwrap();

    let quiet = wifiqr(dir.path(), &["--themes-file", themes], &[]);
    assert!(quiet.status.success());
    assert!(!String::from_utf8_lossy(&quiet.stderr).contains("Loaded WiFi data"));

    let info = wifiqr(dir.path(), &["-v", "--themes-file", themes], &[]);
    let info_log = String::from_utf8_lossy(&info.stderr);
    assert!(info_log.contains("Loaded WiFi data"), "{info_log}");
    assert!(!info_log.contains("Encoded QR code"), "{info_log}");

    let debug = wifiqr(dir.path(), &["-vv", "--themes-file", themes], &[]);
    assert!(String::from_utf8_lossy(&debug.stderr).contains("Encoded QR code"));
}

#[test]
fn all_themes_reports_generated_over_total() {
    let dir = workspace_with_env();
    let themes = themes_file();
    let summary = json_stdout(&wifiqr(
        dir.path(),
        &["--all", "--json", "--themes-file", themes.to_str().unwrap()],
        &[],
    ));

    assert_eq!(summary["generated"], 7);
    assert_eq!(summary["total"], 7);
    assert_eq!(summary["files"].as_array().map(Vec::len), Some(7));
    assert_eq!(
        fs::read_dir(dir.path().join("output")).expect("output dir").count(),
        7
    );
}

#[test]
fn all_themes_fails_only_when_nothing_is_written() {
    let dir = workspace_with_env();
    let themes = themes_file();
    fs::write(dir.path().join("blocked"), b"not a directory").expect("write blocker");

    let output = wifiqr(
        dir.path(),
        &["--all", "-o", "blocked", "--themes-file", themes.to_str().unwrap()],
        &[],
    );

    assert_eq!(output.status.code(), Some(1));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("Successfully generated 0/7 PDFs"), "{stdout}");
}
