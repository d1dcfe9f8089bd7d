//! File logging for the staff directory.
//!
//! # Responsibility
//! - Start one rolling file logger per process from an [`AppConfig`].
//! - Record the effective directory settings once at startup.
//!
//! # Invariants
//! - Log lines carry ids and counts only, never names or emails.
//! - A second start with the same level and directory is a no-op; any other
//!   second start is rejected.

use crate::config::AppConfig;
use flexi_logger::{
    Cleanup, Criterion, DeferredNow, FileSpec, Logger, LoggerHandle, Naming, WriteMode,
};
use log::{info, LevelFilter, Record};
use once_cell::sync::OnceCell;
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io::Write;
use std::path::{Path, PathBuf};

const LOG_FILE_BASENAME: &str = "staffdir";
const ROTATE_AT_BYTES: u64 = 2 * 1024 * 1024;
const KEEP_LOG_FILES: usize = 3;

static ACTIVE: OnceCell<ActiveLogger> = OnceCell::new();

struct ActiveLogger {
    status: LoggingStatus,
    _handle: LoggerHandle,
}

/// Level and directory of the running logger.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingStatus {
    pub level: LevelFilter,
    pub log_dir: PathBuf,
}

#[derive(Debug)]
pub enum LoggingError {
    UnknownLevel(String),
    EmptyDir,
    CreateDir { dir: PathBuf, source: std::io::Error },
    Backend(flexi_logger::FlexiLoggerError),
    AlreadyStarted { active: LoggingStatus },
}

impl Display for LoggingError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownLevel(value) => write!(
                f,
                "unknown log level `{value}`; expected off|error|warn|info|debug|trace"
            ),
            Self::EmptyDir => write!(f, "log directory is empty"),
            Self::CreateDir { dir, source } => {
                write!(f, "cannot create log directory `{}`: {source}", dir.display())
            }
            Self::Backend(err) => write!(f, "logger backend failed: {err}"),
            Self::AlreadyStarted { active } => write!(
                f,
                "logging already runs at level {} in `{}`",
                active.level,
                active.log_dir.display()
            ),
        }
    }
}

impl Error for LoggingError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CreateDir { source, .. } => Some(source),
            Self::Backend(err) => Some(err),
            _ => None,
        }
    }
}

/// Starts the file logger described by `config`.
///
/// A relative `log_dir` resolves against the working directory.
///
/// # Errors
/// - `UnknownLevel` / `EmptyDir` for unusable settings.
/// - `CreateDir` / `Backend` when the logger cannot start.
/// - `AlreadyStarted` when a logger with other settings is running.
pub fn init_logging(config: &AppConfig) -> Result<LoggingStatus, LoggingError> {
    let wanted = LoggingStatus {
        level: parse_level(&config.log_level)?,
        log_dir: resolve_log_dir(&config.log_dir)?,
    };

    let active = ACTIVE.get_or_try_init(|| start(&wanted, config))?;
    if active.status != wanted {
        return Err(LoggingError::AlreadyStarted {
            active: active.status.clone(),
        });
    }
    Ok(active.status.clone())
}

/// Settings of the running logger, `None` before [`init_logging`].
pub fn logging_status() -> Option<LoggingStatus> {
    ACTIVE.get().map(|active| active.status.clone())
}

/// `debug` for debug builds, `info` otherwise.
pub fn default_log_level() -> &'static str {
    if cfg!(debug_assertions) {
        "debug"
    } else {
        "info"
    }
}

fn start(status: &LoggingStatus, config: &AppConfig) -> Result<ActiveLogger, LoggingError> {
    std::fs::create_dir_all(&status.log_dir).map_err(|source| LoggingError::CreateDir {
        dir: status.log_dir.clone(),
        source,
    })?;

    let filter = status.level.to_string().to_ascii_lowercase();
    let handle = Logger::try_with_str(filter)
        .map_err(LoggingError::Backend)?
        .log_to_file(
            FileSpec::default()
                .directory(&status.log_dir)
                .basename(LOG_FILE_BASENAME),
        )
        .rotate(
            Criterion::Size(ROTATE_AT_BYTES),
            Naming::Timestamps,
            Cleanup::KeepLogFiles(KEEP_LOG_FILES),
        )
        .write_mode(WriteMode::Direct)
        .append()
        .format_for_files(line_format)
        .start()
        .map_err(LoggingError::Backend)?;

    info!(
        "event=logging_init module=logging status=ok version={} level={} seed_sample={} search_debounce_ms={} db_file={}",
        env!("CARGO_PKG_VERSION"),
        status.level,
        config.seed_sample_data,
        config.search_debounce.as_millis(),
        config
            .db_path
            .file_name()
            .map_or_else(|| "-".into(), |name| name.to_string_lossy())
    );

    Ok(ActiveLogger {
        status: status.clone(),
        _handle: handle,
    })
}

/// `2026-01-02T03:04:05.678 INFO  staffdir_core::store: event=...`
fn line_format(
    w: &mut dyn Write,
    now: &mut DeferredNow,
    record: &Record,
) -> std::io::Result<()> {
    write!(
        w,
        "{} {:<5} {}: {}",
        now.format("%Y-%m-%dT%H:%M:%S%.3f"),
        record.level(),
        record.module_path().unwrap_or("-"),
        record.args()
    )
}

fn parse_level(raw: &str) -> Result<LevelFilter, LoggingError> {
    let trimmed = raw.trim();
    if trimmed.eq_ignore_ascii_case("warning") {
        return Ok(LevelFilter::Warn);
    }
    trimmed
        .parse::<LevelFilter>()
        .map_err(|_| LoggingError::UnknownLevel(trimmed.to_string()))
}

fn resolve_log_dir(dir: &Path) -> Result<PathBuf, LoggingError> {
    if dir.as_os_str().is_empty() {
        return Err(LoggingError::EmptyDir);
    }
    if dir.is_absolute() {
        return Ok(dir.to_path_buf());
    }
    let cwd = std::env::current_dir().map_err(|source| LoggingError::CreateDir {
        dir: dir.to_path_buf(),
        source,
    })?;
    Ok(cwd.join(dir))
}

#[cfg(test)]
mod tests {
    use super::{init_logging, logging_status, parse_level, resolve_log_dir, LoggingError};
    use crate::config::AppConfig;
    use log::LevelFilter;
    use std::path::Path;

    #[test]
    fn levels_parse_case_insensitively_with_warning_alias() {
        assert_eq!(parse_level(" INFO ").unwrap(), LevelFilter::Info);
        assert_eq!(parse_level("warning").unwrap(), LevelFilter::Warn);
        assert_eq!(parse_level("off").unwrap(), LevelFilter::Off);
        assert!(matches!(
            parse_level("loud"),
            Err(LoggingError::UnknownLevel(value)) if value == "loud"
        ));
    }

    #[test]
    fn relative_dirs_resolve_against_working_dir() {
        let resolved = resolve_log_dir(Path::new("logs")).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("logs"));
        assert!(matches!(
            resolve_log_dir(Path::new("")),
            Err(LoggingError::EmptyDir)
        ));
    }

    #[test]
    fn second_start_must_match_the_running_logger() {
        let root = tempfile::tempdir().unwrap();
        let config = AppConfig {
            log_dir: root.path().join("logs"),
            log_level: "info".to_string(),
            ..AppConfig::default()
        };

        let status = init_logging(&config).unwrap();
        assert_eq!(status.level, LevelFilter::Info);
        assert_eq!(init_logging(&config).unwrap(), status);
        assert_eq!(logging_status(), Some(status.clone()));

        let louder = AppConfig {
            log_level: "debug".to_string(),
            ..config.clone()
        };
        assert!(matches!(
            init_logging(&louder),
            Err(LoggingError::AlreadyStarted { active }) if active == status
        ));

        let elsewhere = AppConfig {
            log_dir: root.path().join("other"),
            ..config
        };
        assert!(init_logging(&elsewhere).is_err());
        assert!(root.path().join("logs").is_dir());
    }
}
