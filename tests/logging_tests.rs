#![cfg(feature = "logging")]

use og_preview::{setup_logging, LogConfig, PreviewError};

fn scratch_dir(name: &str) -> std::path::PathBuf {
    std::env::temp_dir().join(format!("og-preview-logging-{name}-{}", std::process::id()))
}

#[test]
fn test_unwritable_log_dir_is_a_config_error() {
    let base = scratch_dir("blocked");
    std::fs::create_dir_all(&base).unwrap();
    let blocker = base.join("not-a-dir");
    std::fs::write(&blocker, "file").unwrap();

    let result = setup_logging(LogConfig {
        log_dir: blocker.join("logs"),
        console_output: false,
        ..LogConfig::default()
    });

    assert!(matches!(result, Err(PreviewError::ConfigError(msg)) if msg.contains("log directory")));
    let _ = std::fs::remove_dir_all(&base);
}

#[test]
fn test_subscriber_installs_once() {
    let log_dir = scratch_dir("once");

    setup_logging(LogConfig {
        log_dir: log_dir.clone(),
        console_output: false,
        log_level: "debug".into(),
        ..LogConfig::default()
    })
    .unwrap();
    assert!(log_dir.is_dir());

    PreviewError::FetchError("relay unavailable".to_string()).log();

    let second = setup_logging(LogConfig {
        log_dir: log_dir.clone(),
        console_output: false,
        ..LogConfig::default()
    });
    assert!(matches!(second, Err(PreviewError::ConfigError(_))));
}
