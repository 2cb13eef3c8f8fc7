//! Launching the fusion engine and locating what it writes.
//!
//! The engine is an opaque executable. It is started through the platform shell with the synthesized
//! command line and the caller blocks until it exits; there is no timeout. Its exit status is logged
//! but not interpreted, only a failure to start the process is reported as an error.

use crate::command::InvocationString;
use crate::config::{ConfigError, ConfigurationModel, ParameterKey};
use log::{info, warn};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::process::{Command, ExitStatus};
use thiserror::Error;

pub const OUTPUT_CSV: &str = "output.csv";
pub const KML_GPS: &str = "kml_gps.kml";
pub const KML_INS: &str = "kml_irs.kml";
pub const KML_FUSION: &str = "kml_fusion.kml";
const INDEX_SUFFIX: &str = "_INDEX.txt";
const INDEX_TAG: &str = "INDEX:";

#[derive(Debug, Error)]
pub enum RunnerError {
    #[error("failed to launch engine command '{command}': {source}")]
    Launch {
        command: String,
        #[source]
        source: io::Error,
    },
}

/// Something that can execute an engine invocation to completion.
pub trait EngineRunner {
    /// Run `invocation` and block until the engine exits.
    fn run(&mut self, invocation: InvocationString) -> Result<ExitStatus, RunnerError>;
}

/// Runs the invocation through `sh -c` (or `cmd /C` on Windows) with inherited stdio.
#[derive(Clone, Copy, Debug, Default)]
pub struct ShellRunner;

impl EngineRunner for ShellRunner {
    fn run(&mut self, invocation: InvocationString) -> Result<ExitStatus, RunnerError> {
        let command = invocation.into_string();
        info!("Launching engine: {}", command);
        let status = shell_command(&command)
            .status()
            .map_err(|source| RunnerError::Launch {
                command: command.clone(),
                source,
            })?;
        if status.success() {
            info!("Engine finished with {}", status);
        } else {
            warn!("Engine finished with {}", status);
        }
        Ok(status)
    }
}

/// The line goes to `cmd` verbatim. Quoting it as a single argument would turn every `"` into `\"`,
/// which `cmd` passes on to the engine.
#[cfg(windows)]
fn shell_command(command: &str) -> Command {
    use std::os::windows::process::CommandExt;

    let mut shell = Command::new("cmd");
    shell.arg("/C").raw_arg(command);
    shell
}

#[cfg(not(windows))]
fn shell_command(command: &str) -> Command {
    let mut shell = Command::new("sh");
    shell.arg("-c").arg(command);
    shell
}

/// Files the engine produces for a given configuration.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EngineArtifacts {
    pub output_dir: PathBuf,
    pub output_csv: PathBuf,
    pub kml_gps: PathBuf,
    pub kml_ins: PathBuf,
    pub kml_fusion: PathBuf,
    /// Only written when the write-index flag is set.
    pub index_listing: Option<PathBuf>,
}

impl EngineArtifacts {
    pub fn from_model(model: &ConfigurationModel) -> Result<Self, ConfigError> {
        let output_dir = PathBuf::from(
            model
                .text(ParameterKey::OutputDirectory)
                .ok_or(ConfigError::MissingParameter(ParameterKey::OutputDirectory))?,
        );
        let input = model
            .text(ParameterKey::InputFile)
            .ok_or(ConfigError::MissingParameter(ParameterKey::InputFile))?;
        let index_listing = model
            .is_enabled(ParameterKey::WriteIndexFile)
            .then(|| index_listing_path(Path::new(input)));
        Ok(EngineArtifacts {
            output_csv: output_dir.join(OUTPUT_CSV),
            kml_gps: output_dir.join(KML_GPS),
            kml_ins: output_dir.join(KML_INS),
            kml_fusion: output_dir.join(KML_FUSION),
            output_dir,
            index_listing,
        })
    }
}

/// `data/run.csv` lists its columns in `data/run_INDEX.txt`.
///
/// The engine cuts the last four characters of the input path whatever they are, so `run.CSV` also
/// maps to `run_INDEX.txt`.
pub fn index_listing_path(input: &Path) -> PathBuf {
    let input = input.to_string_lossy();
    let cut = input.char_indices().rev().nth(3).map_or(0, |(i, _)| i);
    PathBuf::from(format!("{}{INDEX_SUFFIX}", &input[..cut]))
}

/// Parse an index listing (`INDEX:\t<n>\t-\t<name>` per line) into `(index, column name)` pairs.
///
/// Lines that do not follow the pattern are skipped.
pub fn read_index_listing(path: &Path) -> io::Result<Vec<(usize, String)>> {
    let text = fs::read_to_string(path)?;
    Ok(text.lines().filter_map(parse_index_line).collect())
}

fn parse_index_line(line: &str) -> Option<(usize, String)> {
    let rest = line.trim().strip_prefix(INDEX_TAG)?;
    let (index, name) = rest.split_once('-')?;
    let index = index.trim().parse().ok()?;
    Some((index, name.trim().to_string()))
}
