use std::io::Write;
use std::path::PathBuf;

use star_catcher::config::*;

#[test]
fn defaults_match_the_stock_game() {
    let config = load_config(None).expect("defaults");
    assert_eq!(config.game.width, 720);
    assert_eq!(config.game.height, 1280);
    assert_eq!(config.game.gravity_y, 300.0);
    assert_eq!(config.button.text, "Start Game");
    assert_eq!(config.log.level, "info");
    assert!(config.log.file.is_none());
}

#[test]
fn partial_file_overrides_only_what_it_names() {
    let config = Config::from_toml_str(
        r#"
        [button]
        text = "Play"

        [log]
        file = "/tmp/catcher.log"
        "#,
    )
    .expect("parse");
    assert_eq!(config.button.text, "Play");
    assert_eq!(config.button.bg, ButtonConfig::default().bg);
    assert_eq!(config.game, GameConfig::default());
    assert_eq!(config.log.file, Some(PathBuf::from("/tmp/catcher.log")));
}

#[test]
fn loads_from_disk() {
    let mut file = tempfile::NamedTempFile::new().expect("tempfile");
    writeln!(file, "[game]\nfps = 60\ngravity_y = 500.0").expect("write");
    let config = load_config(Some(file.path())).expect("load");
    assert_eq!(config.game.fps, 60);
    assert_eq!(config.game.gravity_y, 500.0);
    assert!((config.game.frame_dt() - 1.0 / 60.0).abs() < 1e-6);
}

#[test]
fn missing_explicit_file_is_an_error() {
    let dir = tempfile::tempdir().expect("tempdir");
    let absent = dir.path().join("absent.toml");
    assert!(load_config(Some(absent.as_path())).is_err());
}

#[test]
fn malformed_values_are_errors() {
    assert!(Config::from_toml_str("[game]\nfps = \"fast\"").is_err());
    assert!(Config::from_toml_str("[game]\nfps = 0").is_err());
    assert!(Config::from_toml_str("[display]\ncell_width = 0").is_err());
    assert!(Config::from_toml_str("[button]\npadding = 40000").is_err());
    let long_label = format!("[button]\ntext = \"{}\"", "x".repeat(MAX_BUTTON_TEXT + 1));
    assert!(Config::from_toml_str(&long_label).is_err());
}

#[test]
fn button_limits_are_inclusive() {
    let raw = format!(
        "[button]\npadding = {MAX_BUTTON_PADDING}\ntext = \"{}\"",
        "x".repeat(MAX_BUTTON_TEXT)
    );
    let config = Config::from_toml_str(&raw).expect("parse");
    assert_eq!(config.button.padding, MAX_BUTTON_PADDING);
}
