
use log_drivers::{Field, Logger, Options};
use std::{
    collections::HashSet,
    sync::{Arc, Barrier},
    thread::JoinHandle,
};

const NO_OF_THREADS: usize = 8;
const NO_OF_LOGLINES_PER_THREAD: usize = 500;

#[test]
fn test_distinct_names_write_distinct_files() {
    let directory = test_utils::dir();
    let logger = Logger::new(Options::default().log_path(test_utils::log_path(&directory)));

    logger.store("a").info("for a", &[]);
    logger.store("b").info("for b", &[]);
    logger.store("a").info("again for a", &[]);
    logger.sync();

    assert_eq!(test_utils::file_names(&directory), vec!["a.log", "b.log"]);
    let a: Vec<_> = test_utils::read_records(directory.join("a.log"))
        .into_iter()
        .map(|r| r["msg"].as_str().unwrap().to_string())
        .collect();
    assert_eq!(a, vec!["for a", "again for a"]);
    let b = test_utils::read_records(directory.join("b.log"));
    assert_eq!(b.len(), 1);
    assert_eq!(b[0]["msg"], "for b");
}

#[test]
fn test_default_file_stem_shares_the_default_file() {
    let directory = test_utils::dir();
    let logger = Logger::new(Options::default().log_path(test_utils::log_path(&directory)));
    let default = logger.default();
    let app = logger.store("app");
    assert!(Arc::ptr_eq(&default, &app));

    default.info("a", &[]);
    app.info("b", &[]);
    app.rotate().unwrap();
    default.info("c", &[]);
    logger.sync();

    let names = test_utils::file_names(&directory);
    assert_eq!(names.len(), 2, "{names:?}");
    assert_eq!(names[1], "app.log");
    let msgs = |name: &str| -> Vec<String> {
        test_utils::read_records(directory.join(name))
            .into_iter()
            .map(|r| r["msg"].as_str().unwrap().to_string())
            .collect()
    };
    assert_eq!(msgs(&names[0]), vec!["a", "b"]);
    assert_eq!(msgs("app.log"), vec!["c"]);
}

#[test]
fn test_worker_is_reused() {
    let directory = test_utils::dir();
    let logger = Logger::new(
        Options::default()
            .log_path(test_utils::log_path(&directory))
            .max_size(10)
            .max_age(10)
            .max_backups(10),
    );

    let first = logger.store("worker");
    first.info("first use", &[]);
    let second = logger.store("worker");
    assert!(Arc::ptr_eq(&first, &second));
    second.info("second use", &[]);
    logger.sync();

    assert_eq!(test_utils::file_names(&directory), vec!["worker.log"]);
    assert_eq!(
        test_utils::read_records(directory.join("worker.log")).len(),
        2
    );
    assert_eq!(logger.registry().len(), 2);
}

#[test]
fn test_concurrent_first_use() {
    let directory = test_utils::dir();
    let logger = Logger::new(Options::default().log_path(test_utils::log_path(&directory)));
    let barrier = Arc::new(Barrier::new(NO_OF_THREADS));

    let worker_handles: Vec<JoinHandle<usize>> = (0..NO_OF_THREADS)
        .map(|thread_number| {
            let logger = logger.clone();
            let barrier = Arc::clone(&barrier);
            std::thread::Builder::new()
                .name(thread_number.to_string())
                .spawn(move || {
                    barrier.wait();
                    let sink = logger.store("shared");
                    for idx in 0..NO_OF_LOGLINES_PER_THREAD {
                        logger.store("shared").debug(
                            "line",
                            &[
                                Field::uint("thread", thread_number as u64),
                                Field::uint("idx", idx as u64),
                            ],
                        );
                    }
                    Arc::as_ptr(&sink) as usize
                })
                .unwrap()
        })
        .collect();

    let instances: HashSet<usize> = worker_handles
        .into_iter()
        .map(|h| h.join().unwrap())
        .collect();
    assert_eq!(instances.len(), 1);
    assert_eq!(
        instances.into_iter().next().unwrap(),
        Arc::as_ptr(&logger.store("shared")) as usize
    );

    logger.sync();
    assert_eq!(test_utils::file_names(&directory), vec!["shared.log"]);

    // every line is complete, none is lost
    let records = test_utils::read_records(directory.join("shared.log"));
    assert_eq!(records.len(), NO_OF_THREADS * NO_OF_LOGLINES_PER_THREAD);
    let distinct: HashSet<(u64, u64)> = records
        .iter()
        .map(|r| (r["thread"].as_u64().unwrap(), r["idx"].as_u64().unwrap()))
        .collect();
    assert_eq!(distinct.len(), records.len());
}
