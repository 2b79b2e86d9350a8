
use log_drivers::{Field, Logger, Options};
use std::{sync::Arc, time::Duration};

#[test]
fn test_default_driver_is_ready() {
    let directory = test_utils::dir();
    let logger = Logger::new(
        Options::default()
            .log_path(test_utils::log_path(&directory))
            .file_name("")
            .max_size(10)
            .max_age(10)
            .max_backups(10),
    );

    // usable without any store() call
    let default = logger.default();
    assert!(Arc::ptr_eq(&default, &logger.store("")));
    assert_eq!(default.path(), directory.join("app.log"));
    assert!(!default.path().exists());

    default.info("Hello", &[]);
    logger.sync();

    let records = test_utils::read_records(directory.join("app.log"));
    assert_eq!(records.len(), 1);
    let record = &records[0];
    assert_eq!(record["level"], "INFO");
    assert_eq!(record["msg"], "Hello");
    assert!(record["time"].is_string());
    assert!(record["caller"]
        .as_str()
        .unwrap()
        .starts_with("tests/test_default_driver.rs:"));
}

#[test]
fn test_file_name_chooses_the_default_file() {
    let directory = test_utils::dir();
    let logger = Logger::new(
        Options::default()
            .log_path(format!("{}/", test_utils::log_path(&directory)))
            .file_name("server"),
    );
    logger.default().warn("from default", &[]);
    logger.sync();

    assert_eq!(test_utils::file_names(&directory), vec!["server.log"]);
}

#[test]
fn test_record_layout() {
    let directory = test_utils::dir();
    let logger = Logger::new(Options::default().log_path(test_utils::log_path(&directory)));
    logger.default().error(
        "request \"failed\"",
        &[
            Field::string("path", "/api/v1"),
            Field::int("status", -1),
            Field::duration("took", Duration::from_millis(1500)),
            Field::bool("retry", true),
        ],
    );
    logger.sync();

    let content = std::fs::read_to_string(directory.join("app.log")).unwrap();
    let line = content.lines().next().unwrap();
    let positions: Vec<usize> = [
        "\"level\"", "\"time\"", "\"caller\"", "\"msg\"", "\"path\"", "\"status\"", "\"took\"",
        "\"retry\"",
    ]
    .iter()
    .map(|key| line.find(key).unwrap_or_else(|| panic!("{key} missing in {line}")))
    .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]), "{line}");

    let record: serde_json::Value = serde_json::from_str(line).unwrap();
    assert_eq!(record["level"], "ERROR");
    assert_eq!(record["msg"], "request \"failed\"");
    assert_eq!(record["status"], -1);
    assert_eq!(record["took"], 1.5);
    assert_eq!(record["retry"], true);
    // e.g. 2024-03-17T15:04:05.123+0100
    let time = record["time"].as_str().unwrap();
    assert!(chrono::DateTime::parse_from_str(time, "%Y-%m-%dT%H:%M:%S%.3f%z").is_ok());
}
