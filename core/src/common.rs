//! Shared helpers for the `navfusion` binary.
//!
//! - Logger initialization
//! - Path validation
//! - Operator prompts

use std::error::Error;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};

/// Initialize the logger with the specified configuration.
///
/// # Arguments
/// * `log_level` - Log level string (off, error, warn, info, debug, trace)
/// * `log_file` - Optional path to log file (logs to stderr if None)
///
/// # Errors
/// Returns an error if the log file cannot be opened or logger initialization fails.
pub fn init_logger(log_level: &str, log_file: Option<&PathBuf>) -> Result<(), Box<dyn Error>> {
    use std::io::Write;

    let level = log_level.parse::<log::LevelFilter>().unwrap_or_else(|_| {
        eprintln!("Invalid log level '{}', defaulting to 'info'", log_level);
        log::LevelFilter::Info
    });

    let mut builder = env_logger::Builder::new();
    builder.filter_level(level);
    builder.format(|buf, record| {
        writeln!(
            buf,
            "{} [{}] - {}",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
            record.level(),
            record.args()
        )
    });

    if let Some(log_path) = log_file {
        if let Some(parent) = log_path.parent()
            && !parent.as_os_str().is_empty()
        {
            std::fs::create_dir_all(parent)?;
        }
        let target = Box::new(
            std::fs::OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)?,
        );
        builder.target(env_logger::Target::Pipe(target));
    }

    builder.try_init()?;
    Ok(())
}

/// Check that `input` is an existing CSV file.
pub fn validate_input_csv(input: &Path) -> Result<(), Box<dyn Error>> {
    if !input.is_file() {
        return Err(format!("Input file '{}' does not exist.", input.display()).into());
    }
    if input.extension().and_then(|s| s.to_str()) != Some("csv") {
        return Err(format!("Input file '{}' is not a CSV file.", input.display()).into());
    }
    Ok(())
}

/// Create the output directory if it does not exist yet.
pub fn validate_output_path(output: &Path) -> Result<(), Box<dyn Error>> {
    if !output.exists() {
        std::fs::create_dir_all(output)?;
    }
    if !output.is_dir() {
        return Err(format!("Output path '{}' is not a directory.", output.display()).into());
    }
    Ok(())
}

/// Block until the operator presses Enter on `input`.
pub fn wait_for_operator<R: BufRead>(mut input: R) -> io::Result<()> {
    println!("Press Enter to close.");
    let mut line = String::new();
    input.read_line(&mut line)?;
    Ok(())
}

/// Parse a single-character CLI option such as a delimiter.
pub fn parse_char(value: &str) -> Result<char, String> {
    let mut chars = value.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => Ok(c),
        _ => Err(format!("expected a single character, got '{value}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn test_validate_input_csv() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.csv");
        File::create(&file_path).unwrap();
        assert!(validate_input_csv(&file_path).is_ok());
    }

    #[test]
    fn test_validate_input_csv_rejects_other_files() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("test.txt");
        File::create(&file_path).unwrap();
        assert!(validate_input_csv(&file_path).is_err());
        assert!(validate_input_csv(dir.path()).is_err());
        assert!(validate_input_csv(Path::new("/nonexistent/path.csv")).is_err());
    }

    #[test]
    fn test_validate_output_path_creates_directory() {
        let dir = tempdir().unwrap();
        let out = dir.path().join("plots").join("yaw");
        assert!(validate_output_path(&out).is_ok());
        assert!(out.is_dir());
    }

    #[test]
    fn test_validate_output_path_rejects_file() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("output.csv");
        File::create(&file_path).unwrap();
        assert!(validate_output_path(&file_path).is_err());
    }

    #[test]
    fn test_wait_for_operator_reads_one_line() {
        let mut input = io::Cursor::new("\nrest\n");
        wait_for_operator(&mut input).unwrap();
        assert_eq!(input.position(), 1);
    }

    #[test]
    fn test_parse_char() {
        assert_eq!(parse_char(";"), Ok(';'));
        assert!(parse_char("").is_err());
        assert!(parse_char(";;").is_err());
    }
}
