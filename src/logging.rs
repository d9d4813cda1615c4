// Logging setup plus conditional logging macros - the macros are only active in debug builds

use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;

const DEFAULT_FILTER: &str = "warn";

/// Install the global logger.
///
/// Lines are stamped with local time. When `log_file` is given, output is
/// appended there; otherwise it goes to stderr. `RUST_LOG` overrides the
/// default `warn` filter.
///
/// # Errors
/// Returns an error if the log file cannot be opened.
pub fn init_logging(log_file: Option<&Path>) -> io::Result<()> {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(DEFAULT_FILTER));
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{:<5}] {}: {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.target(),
            record.args()
        )
    });

    if let Some(path) = log_file {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        builder.target(env_logger::Target::Pipe(Box::new(file)));
    }

    // A logger may already be installed, e.g. when tests call this twice
    let _ = builder.try_init();
    Ok(())
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {
        log::debug!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! debug_log {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(debug_assertions)]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {
        log::info!($($arg)*);
    };
}

#[cfg(not(debug_assertions))]
#[macro_export]
macro_rules! info_log {
    ($($arg:tt)*) => {{
        let _ = format_args!($($arg)*);
    }};
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logging_to_file() {
        let path = std::env::temp_dir().join("wordwiz_test_log.txt");
        assert!(init_logging(Some(&path)).is_ok());
        assert!(path.exists());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    #[deny(unused_variables)]
    fn test_log_macros_use_their_arguments() {
        let reason = std::io::Error::other("closed");
        debug_log!("Draw error: {}", reason);
        let attempt = 3;
        info_log!("Attempt {attempt}");
    }

    #[test]
    fn test_init_logging_bad_path() {
        let path = Path::new("/nonexistent/dir/wordwiz.log");
        assert!(init_logging(Some(path)).is_err());
    }
}
