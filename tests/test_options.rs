
use log_drivers::{DriverError, Logger, Mode, Options};

#[test]
fn test_logger_from_json() {
    let directory = test_utils::dir();
    let json = format!(
        r#"{{
            "mode": "prod",
            "log_path": "{}",
            "file_name": "service",
            "max_size": 10,
            "max_age": 10,
            "max_backups": 10
        }}"#,
        test_utils::log_path(&directory)
    );
    let options = Options::try_from_json(&json).unwrap();
    assert_eq!(options.get_mode(), Mode::Prod);
    assert_eq!(options.max_size_in_bytes(), Some(10 * 1024 * 1024));

    let logger = Logger::new(options);
    logger.default().info("configured", &[]);
    logger.sync();
    assert_eq!(test_utils::file_names(&directory), vec!["service.log"]);
}

#[test]
fn test_permissive_limits() {
    // zero and negative limits mean "use the defaults", they are not rejected
    let options =
        Options::try_from_json(r#"{"max_size": -5, "max_age": 0, "max_backups": -1}"#).unwrap();
    assert_eq!(options.max_size_in_bytes(), None);
    assert_eq!(options.max_age_in_days(), None);
    assert_eq!(options.max_backups_count(), None);

    let directory = test_utils::dir();
    let logger = Logger::new(options.log_path(test_utils::log_path(&directory)));
    logger.store("lenient").debug("works", &[]);
    logger.sync();
    assert_eq!(
        test_utils::read_records(directory.join("lenient.log")).len(),
        1
    );
}

#[test]
fn test_invalid_json() {
    assert!(matches!(
        Options::try_from_json("{not json"),
        Err(DriverError::Json(_))
    ));
}

#[cfg(feature = "toml")]
#[test]
fn test_logger_from_toml() {
    let options = Options::try_from_toml(
        r#"
        mode = "dev"
        log_path = "/var/log/service"
        max_backups = 3
        "#,
    )
    .unwrap();
    assert!(options.is_dev());
    assert_eq!(options.max_backups_count(), Some(3));
    assert_eq!(
        options.directory(),
        std::path::PathBuf::from("/var/log/service")
    );
}
