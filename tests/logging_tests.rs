use battleship_adt::{format_record, init_logging, level_from};
use log::{Level, LevelFilter, Record};

#[test]
fn test_level_from() {
    assert_eq!(level_from(Some("debug")), LevelFilter::Debug);
    assert_eq!(level_from(Some("WARN")), LevelFilter::Warn);
    assert_eq!(level_from(Some(" trace ")), LevelFilter::Trace);
    assert_eq!(level_from(Some("off")), LevelFilter::Off);
    assert_eq!(level_from(Some("nonsense")), LevelFilter::Info);
    assert_eq!(level_from(None), LevelFilter::Info);
}

#[test]
fn test_format_record() {
    let line = format_record(
        &Record::builder()
            .args(format_args!("started match {} for {}", "AB2CD", "alice"))
            .level(Level::Info)
            .target("battleship_adt::history")
            .build(),
    );
    assert_eq!(line, "INFO  battleship_adt::history: started match AB2CD for alice");

    let line = format_record(
        &Record::builder()
            .args(format_args!("rehash"))
            .level(Level::Debug)
            .target("dict")
            .build(),
    );
    assert_eq!(line, "DEBUG dict: rehash");
}

#[test]
fn test_init_logging_is_idempotent() {
    let level = init_logging();
    assert_eq!(init_logging(), level);
    assert_eq!(log::max_level(), level);
    log::info!("logger installed");
}
