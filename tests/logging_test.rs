//! File logging setup

use serial_test::serial;

use campus_event_hub::config::LoggingConfig;
use campus_event_hub::utils::logging::{init_logging, log_admin_action};

#[test]
#[serial]
fn file_logging_writes_into_the_configured_directory() {
    let dir = tempfile::tempdir().expect("temp dir");
    let config = LoggingConfig {
        level: "info".to_string(),
        file_path: Some(dir.path().to_string_lossy().into_owned()),
    };

    let guard = init_logging(&config).expect("logging initializes");
    assert!(guard.is_some());
    log_admin_action(1000, "registration_decision", Some("test"), Some("approved"));
    drop(guard);

    let files: Vec<_> = std::fs::read_dir(dir.path())
        .expect("log dir readable")
        .filter_map(|entry| entry.ok())
        .filter(|entry| entry.file_name().to_string_lossy().starts_with("campus-event-hub.log"))
        .collect();
    assert_eq!(files.len(), 1);

    let contents = std::fs::read_to_string(files[0].path()).expect("log file readable");
    assert!(contents.contains("registration_decision"));
}
