use std::fmt;

use log::Level;

pub const LOG_TARGET: &str = "dgm_exception";

/// Framework verbosity: lower is more important.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct Verbosity(pub u8);

impl Verbosity {
    pub const THROW: Verbosity = Verbosity(1);
    pub const DETAIL: Verbosity = Verbosity(15);

    pub fn level(&self) -> Level {
        if self.0 <= 1 {
            Level::Debug
        } else {
            Level::Trace
        }
    }
}

pub fn debug_log(verbosity: Verbosity, args: fmt::Arguments) {
    log::log!(target: LOG_TARGET, verbosity.level(), "{}", args);
}

#[test]
fn test_verbosity_levels() {
    assert_eq!(Verbosity(0).level(), Level::Debug);
    assert_eq!(Verbosity::THROW.level(), Level::Debug);
    assert_eq!(Verbosity(2).level(), Level::Trace);
    assert_eq!(Verbosity::DETAIL.level(), Level::Trace);
    assert!(Verbosity::THROW < Verbosity::DETAIL);
}

/// Test logger that records entries per thread, so parallel tests only see
/// what they emitted themselves.
#[cfg(test)]
pub(crate) mod capture {
    use std::cell::RefCell;
    use std::sync::Once;

    use log::{Level, LevelFilter, Log, Metadata, Record};

    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Entry {
        pub level: Level,
        pub target: String,
        pub text: String,
    }

    thread_local! {
        static ENTRIES: RefCell<Vec<Entry>> = RefCell::new(Vec::new());
    }

    struct CaptureLogger;

    impl Log for CaptureLogger {
        fn enabled(&self, _metadata: &Metadata) -> bool {
            true
        }

        fn log(&self, record: &Record) {
            let entry = Entry {
                level: record.level(),
                target: record.target().to_string(),
                text: record.args().to_string(),
            };
            ENTRIES.with(|entries| entries.borrow_mut().push(entry));
        }

        fn flush(&self) {}
    }

    static LOGGER: CaptureLogger = CaptureLogger;
    static INIT: Once = Once::new();

    /// Installs the logger and clears this thread's entries.
    pub fn start() {
        INIT.call_once(|| {
            let _ = log::set_logger(&LOGGER);
            log::set_max_level(LevelFilter::Trace);
        });
        ENTRIES.with(|entries| entries.borrow_mut().clear());
    }

    pub fn take() -> Vec<Entry> {
        ENTRIES.with(|entries| entries.borrow_mut().drain(..).collect())
    }
}

#[test]
fn test_debug_log_target_and_level() {
    capture::start();
    debug_log(Verbosity::THROW, format_args!("throw {}", 1));
    debug_log(Verbosity::DETAIL, format_args!("detail"));

    let entries = capture::take();
    assert_eq!(entries.len(), 2);
    assert_eq!(entries[0].level, Level::Debug);
    assert_eq!(entries[0].target, LOG_TARGET);
    assert_eq!(entries[0].text, "throw 1");
    assert_eq!(entries[1].level, Level::Trace);
    assert_eq!(entries[1].text, "detail");
}
