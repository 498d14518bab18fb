use chrono::Local;
use colored::*;
use log::{Level, LevelFilter};
use std::path::{Path, PathBuf};

const LOGS_PREFIX: &str = "pasint_log";
const SEPARATOR: &str = "_";
const TIMESTAMP_FORMAT: &str = "%Y-%m-%d_%H-%M-%S";
const LOG_EXTENSION: &str = "log";
const CONSOLE_TIMESTAMP_FORMAT: &str = "%H:%M:%S%.3f";
const FILE_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn generate_filename_only() -> String {
    let now = Local::now();
    let timestamp = now.format(TIMESTAMP_FORMAT).to_string();
    format!("{}{}{}.{}", LOGS_PREFIX, SEPARATOR, timestamp, LOG_EXTENSION)
}

fn ensure_log_directory_exists(log_dir: &Path) -> std::io::Result<()> {
    if !log_dir.exists() {
        std::fs::create_dir_all(log_dir)?;
    }
    Ok(())
}

fn level_label(level: Level) -> ColoredString {
    match level {
        Level::Error => "ERROR".red().bold(),
        Level::Warn => "WARN ".yellow().bold(),
        Level::Info => "INFO ".green().bold(),
        Level::Debug => "DEBUG".blue().bold(),
        Level::Trace => "TRACE".magenta().bold(),
    }
}

/// Installs the global logger. Console output goes to stderr so program
/// results on stdout stay machine-readable; a timestamped file is added
/// when `log_dir` is given.
pub fn init(
    log_dir: Option<impl AsRef<Path>>,
    console_level: LevelFilter,
    file_level: LevelFilter,
) -> Result<Option<PathBuf>, fern::InitError> {
    let mut log_file_path: Option<PathBuf> = None;

    if let Some(dir) = log_dir {
        let dir_path = dir.as_ref();
        if let Err(e) = ensure_log_directory_exists(dir_path) {
            return Err(fern::InitError::Io(std::io::Error::other(format!(
                "failed to create log directory '{}': {}",
                dir_path.display(),
                e
            ))));
        }
        log_file_path = Some(dir_path.join(generate_filename_only()));
    }

    let console_dispatch = fern::Dispatch::new()
        .format(|out, message, record| {
            let timestamp = Local::now().format(CONSOLE_TIMESTAMP_FORMAT).to_string();
            out.finish(format_args!(
                "[{}] [{}] [{}] {}",
                timestamp,
                level_label(record.level()),
                record.target(),
                message
            ))
        })
        .level(console_level)
        .chain(std::io::stderr());

    let mut base_dispatch = fern::Dispatch::new()
        .level(LevelFilter::Trace)
        .chain(console_dispatch);

    if let Some(path) = &log_file_path {
        let file_dispatch = fern::Dispatch::new()
            .format(|out, message, record| {
                let timestamp = Local::now().format(FILE_TIMESTAMP_FORMAT).to_string();
                out.finish(format_args!(
                    "[{}] [{:<5}] [{}] [{}:{}] {}",
                    timestamp,
                    record.level(),
                    record.target(),
                    record.file().unwrap_or("?"),
                    record.line().unwrap_or(0),
                    message
                ))
            })
            .level(file_level)
            .chain(fern::log_file(path)?);

        base_dispatch = base_dispatch.chain(file_dispatch);
    }

    base_dispatch.apply()?;

    log::debug!("logger initialised, console: {}, file: {}", console_level, file_level);
    match &log_file_path {
        Some(path) => log::debug!("writing logs to {}", path.display()),
        None => log::debug!("file logging disabled"),
    }

    Ok(log_file_path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn log_file_names_carry_prefix_and_extension() {
        let name = generate_filename_only();
        assert!(name.starts_with("pasint_log_"));
        assert!(name.ends_with(".log"));
    }

    #[test]
    fn missing_directories_are_created() {
        let dir = std::env::temp_dir().join(format!("pasint_logger_test_{}", std::process::id())).join("nested");
        ensure_log_directory_exists(&dir).unwrap();
        assert!(dir.is_dir());
        std::fs::remove_dir_all(dir.parent().unwrap()).unwrap();
    }
}
