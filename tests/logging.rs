use std::{fs, thread::sleep, time::Duration};

use serial_test::serial;
use tempfile::tempdir;
use tracing::level_filters::LevelFilter;

#[test]
#[serial]
fn writes_log_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("drawy.log");

    drawy::logging::init(true, Some(path.clone()));
    tracing::info!("stroke committed in test");
    // Second initialisation is ignored and keeps the file subscriber.
    drawy::logging::init(false, None);
    tracing::info!("after repeated init");

    sleep(Duration::from_millis(100));

    assert!(path.exists(), "log file was not created");
    let contents = fs::read_to_string(path).unwrap();
    assert!(contents.contains("stroke committed in test"));
    assert!(contents.contains("after repeated init"));
}

#[test]
#[serial]
fn rust_log_only_applies_with_debug() {
    std::env::set_var("RUST_LOG", "warn");
    assert_eq!(
        drawy::logging::filter_for(true).max_level_hint(),
        Some(LevelFilter::WARN)
    );
    assert_eq!(
        drawy::logging::filter_for(false).max_level_hint(),
        Some(LevelFilter::INFO)
    );

    std::env::remove_var("RUST_LOG");
    assert_eq!(
        drawy::logging::filter_for(true).max_level_hint(),
        Some(LevelFilter::DEBUG)
    );
}
