//! Log writer module
//!
//! Process-wide sink for log lines. Info and access lines share one target,
//! errors go to another; each is stdout/stderr or an append-mode file.

use std::fs::{File, OpenOptions};
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Mutex, OnceLock};

/// Global log writer instance
static LOG_WRITER: OnceLock<LogWriter> = OnceLock::new();

/// Log output target
enum LogTarget {
    Stdout,
    Stderr,
    File(Mutex<File>),
}

impl LogTarget {
    fn open(path: Option<&str>, fallback: Self) -> io::Result<Self> {
        match path {
            Some(p) => Ok(Self::File(Mutex::new(open_log_file(p)?))),
            None => Ok(fallback),
        }
    }

    fn write_line(&self, message: &str) {
        // Write failures are dropped.
        match self {
            Self::Stdout => {
                let _ = writeln!(io::stdout().lock(), "{message}");
            }
            Self::Stderr => {
                let _ = writeln!(io::stderr().lock(), "{message}");
            }
            Self::File(file) => {
                if let Ok(mut f) = file.lock() {
                    let _ = writeln!(f, "{message}");
                }
            }
        }
    }
}

/// Thread-safe log writer
pub struct LogWriter {
    info: LogTarget,
    error: LogTarget,
}

impl LogWriter {
    fn new(info_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<Self> {
        Ok(Self {
            info: LogTarget::open(info_log_file, LogTarget::Stdout)?,
            error: LogTarget::open(error_log_file, LogTarget::Stderr)?,
        })
    }

    /// Write info or access line
    pub fn write_info(&self, message: &str) {
        self.info.write_line(message);
    }

    pub fn write_error(&self, message: &str) {
        self.error.write_line(message);
    }
}

/// Open or create a log file for appending
fn open_log_file(path: &str) -> io::Result<File> {
    if let Some(parent) = Path::new(path).parent() {
        if !parent.as_os_str().is_empty() {
            std::fs::create_dir_all(parent)?;
        }
    }

    OpenOptions::new().create(true).append(true).open(path)
}

/// Initialize the global log writer
///
/// Call once at startup. Fails if a log file cannot be opened or the writer
/// is already set.
pub fn init(info_log_file: Option<&str>, error_log_file: Option<&str>) -> io::Result<()> {
    let writer = LogWriter::new(info_log_file, error_log_file)?;
    LOG_WRITER.set(writer).map_err(|_| {
        io::Error::new(
            io::ErrorKind::AlreadyExists,
            "Log writer already initialized",
        )
    })
}

/// Get the global log writer, if `init()` has run
pub fn get() -> Option<&'static LogWriter> {
    LOG_WRITER.get()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_log_dir(name: &str) -> std::path::PathBuf {
        std::env::temp_dir().join(format!("slow_responder_{name}_{}", std::process::id()))
    }

    #[test]
    fn test_file_targets_append_lines() {
        let dir = temp_log_dir("writer");
        let info = dir.join("nested/info.log");
        let error = dir.join("error.log");

        let writer = LogWriter::new(info.to_str(), error.to_str()).unwrap();
        writer.write_info("request cancelled");
        writer.write_info("second line");
        writer.write_error("[ERROR] boom");

        assert_eq!(
            std::fs::read_to_string(&info).unwrap(),
            "request cancelled\nsecond line\n"
        );
        assert_eq!(std::fs::read_to_string(&error).unwrap(), "[ERROR] boom\n");

        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn test_missing_paths_fall_back_to_std_streams() {
        let writer = LogWriter::new(None, None).unwrap();
        assert!(matches!(writer.info, LogTarget::Stdout));
        assert!(matches!(writer.error, LogTarget::Stderr));
    }
}
