//! Process-wide logger behind the `log` facade.
//!
//! On Android records go to the system log (liblog) under [`LOG_TAG`]; on other
//! targets they are written to stderr. Every module logs through the ordinary
//! `log` macros.

use std::sync::OnceLock;

use log::{Level, LevelFilter, Log, Metadata, Record};

/// Tag used for every record written to the platform log.
pub const LOG_TAG: &str = "EmptyApp";

/// Log levels, numbered the way the host side passes them in.
#[repr(i32)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogLevel {
    Nothing = 0,
    User = 1,
    Error = 2,
    Warning = 3,
    #[default]
    Info = 4,
    Debug = 5,
    All = 6,
}

impl LogLevel {
    /// Create a LogLevel from an integer
    pub fn from_i32(level: i32) -> Self {
        match level {
            0 => LogLevel::Nothing,
            1 => LogLevel::User,
            2 => LogLevel::Error,
            3 => LogLevel::Warning,
            4 => LogLevel::Info,
            5 => LogLevel::Debug,
            6 => LogLevel::All,
            _ => LogLevel::Info,
        }
    }

    pub fn as_i32(&self) -> i32 {
        *self as i32
    }

    /// Filter applied to the `log` facade for this level.
    pub fn level_filter(self) -> LevelFilter {
        match self {
            LogLevel::Nothing => LevelFilter::Off,
            LogLevel::User | LogLevel::Error => LevelFilter::Error,
            LogLevel::Warning => LevelFilter::Warn,
            LogLevel::Info => LevelFilter::Info,
            LogLevel::Debug => LevelFilter::Debug,
            LogLevel::All => LevelFilter::Trace,
        }
    }
}

/// `log` backend writing to the platform log.
#[derive(Debug)]
pub struct ShimLogger {
    tag: &'static str,
}

impl ShimLogger {
    const fn new(tag: &'static str) -> Self {
        Self { tag }
    }
}

impl Log for ShimLogger {
    fn enabled(&self, metadata: &Metadata<'_>) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record<'_>) {
        if !self.enabled(record.metadata()) {
            return;
        }
        let line = format!("{}: {}", record.target(), record.args());
        write_platform(self.tag, record.level(), &line);
    }

    fn flush(&self) {
        #[cfg(not(target_os = "android"))]
        let _ = std::io::Write::flush(&mut std::io::stderr());
    }
}

static LOGGER: ShimLogger = ShimLogger::new(LOG_TAG);
static INSTALLED: OnceLock<bool> = OnceLock::new();

/// Install the shim logger and set the global filter.
///
/// Safe to call more than once: the logger is installed on the first call and
/// later calls only adjust the filter. Returns `false` when another logger
/// already owns the `log` facade.
pub fn init_logging(level: LogLevel) -> bool {
    let installed = *INSTALLED.get_or_init(|| log::set_logger(&LOGGER).is_ok());
    log::set_max_level(level.level_filter());
    installed
}

#[cfg(target_os = "android")]
fn write_platform(tag: &str, level: Level, line: &str) {
    use std::ffi::CString;

    // android/log.h priorities
    const ANDROID_LOG_VERBOSE: libc::c_int = 2;
    const ANDROID_LOG_DEBUG: libc::c_int = 3;
    const ANDROID_LOG_INFO: libc::c_int = 4;
    const ANDROID_LOG_WARN: libc::c_int = 5;
    const ANDROID_LOG_ERROR: libc::c_int = 6;

    #[link(name = "log")]
    extern "C" {
        fn __android_log_write(
            prio: libc::c_int,
            tag: *const libc::c_char,
            text: *const libc::c_char,
        ) -> libc::c_int;
    }

    let prio = match level {
        Level::Error => ANDROID_LOG_ERROR,
        Level::Warn => ANDROID_LOG_WARN,
        Level::Info => ANDROID_LOG_INFO,
        Level::Debug => ANDROID_LOG_DEBUG,
        Level::Trace => ANDROID_LOG_VERBOSE,
    };

    // Interior NULs would truncate the record; drop them instead.
    let (Ok(tag), Ok(text)) = (
        CString::new(tag.replace('\0', "")),
        CString::new(line.replace('\0', "")),
    ) else {
        return;
    };

    // SAFETY: both pointers come from live CStrings that outlive the call.
    unsafe {
        __android_log_write(prio, tag.as_ptr(), text.as_ptr());
    }
}

#[cfg(not(target_os = "android"))]
fn write_platform(tag: &str, level: Level, line: &str) {
    use std::io::Write;

    let mut stderr = std::io::stderr().lock();
    let _ = writeln!(stderr, "[{}] {} {}", level, tag, line);
}
