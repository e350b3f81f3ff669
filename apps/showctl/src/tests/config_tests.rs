use super::{apply_env, apply_file, load_settings, Settings};

use std::{
    collections::HashMap,
    env, fs,
    time::{SystemTime, UNIX_EPOCH},
};

fn temp_dir(label: &str) -> std::path::PathBuf {
    let suffix = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .expect("clock")
        .as_nanos();
    let dir = env::temp_dir().join(format!("showctl_{label}_{suffix}"));
    fs::create_dir_all(&dir).expect("temp dir");
    dir
}

#[test]
fn defaults_point_at_showfile_resources() {
    let settings = Settings::default();
    let endpoints = settings.endpoints();
    assert_eq!(endpoints.status, "showfile/status");
    assert_eq!(endpoints.directory, "showfile/directory");
    assert_eq!(endpoints.command, "showfile");
    assert_eq!(settings.timeout().as_secs(), 5);
}

#[test]
fn file_values_accept_strings_and_integers() {
    let mut settings = Settings::default();
    apply_file(
        &mut settings,
        r#"
base_url = "http://10.0.0.20/json"
timeout_secs = 2
poll_interval_ms = "250"
command_path = "action"
"#,
    )
    .expect("apply file");

    assert_eq!(settings.base_url, "http://10.0.0.20/json");
    assert_eq!(settings.timeout_secs, 2);
    assert_eq!(settings.poll_interval_ms, 250);
    assert_eq!(settings.command_path, "action");
    assert_eq!(settings.status_path, "showfile/status");
}

#[test]
fn non_numeric_timeout_in_file_is_rejected() {
    let mut settings = Settings::default();
    let err = apply_file(&mut settings, r#"timeout_secs = "soon""#).expect_err("invalid");
    assert!(err.to_string().contains("timeout_secs"), "{err}");
}

#[test]
fn env_overrides_file_and_ignores_bad_numbers() {
    let vars: HashMap<&str, &str> = HashMap::from([
        ("SHOWCTL_BASE_URL", "http://legacy/json"),
        ("APP__BASE_URL", "http://player.local/json"),
        ("APP__TIMEOUT_SECS", "nope"),
        ("APP__POLL_INTERVAL_MS", "500"),
    ]);
    let mut settings = Settings::default();
    apply_env(&mut settings, |key| vars.get(key).map(|v| v.to_string()));

    assert_eq!(settings.base_url, "http://player.local/json");
    assert_eq!(settings.timeout_secs, 5);
    assert_eq!(settings.poll_interval_ms, 500);
}

#[test]
fn poll_interval_has_a_floor() {
    let settings = Settings {
        poll_interval_ms: 0,
        ..Settings::default()
    };
    assert_eq!(settings.poll_interval().as_millis(), 50);
}

#[test]
fn explicit_config_file_must_exist() {
    let dir = temp_dir("missing");
    let err = load_settings(Some(&dir.join("absent.toml"))).expect_err("missing file");
    assert!(err.to_string().contains("absent.toml"), "{err}");
    fs::remove_dir_all(dir).expect("cleanup");
}

#[test]
fn explicit_config_file_is_loaded() {
    let dir = temp_dir("present");
    let path = dir.join("player.toml");
    fs::write(&path, "status_path = \"json/showfile/status\"\n").expect("write config");

    let settings = load_settings(Some(&path)).expect("load");
    assert_eq!(settings.status_path, "json/showfile/status");

    fs::remove_dir_all(dir).expect("cleanup");
}
