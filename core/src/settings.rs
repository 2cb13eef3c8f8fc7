//! Run files: everything needed to drive one engine run and its analysis, stored as TOML, JSON or YAML.
//!
//! A run file names the engine executable, lists the engine parameters in the order they should be
//! emitted, carries the noise group and configures the analysis and logging of the CLI. The format is
//! chosen by file extension (`.toml`, `.json`, `.yaml`/`.yml`).
//!
//! ```toml
//! engine = "./out/navfusion"
//!
//! [parameters]
//! input_file = "data/tram/input/tram.csv"
//! output_directory = "data/tram/yaw"
//! frequency = [300, 1]
//! acc_indices = [1, 2, 3]
//! gyro_indices = [4, 5, 6]
//! gps_coord_indices = [13, 14]
//! height_value = 100
//! yaw_index = 10
//!
//! [noise]
//! accelerometer_bias = [0.05601, 0.01959, 0.1864]
//! gyrometer_bias = [0.01752, 0.03873, 0.0347]
//! accelerometer_drift = [0.01, 0.01, 0.01]
//! gyrometer_drift = [0.01, 0.01, 0.01]
//! gps_dop = [3, 3, 3]
//! ```

use crate::analysis::DEFAULT_COMPARE_LABELS;
use crate::command::{InvocationString, synthesize};
use crate::config::{ConfigBuilder, ConfigError, ConfigurationModel, NoiseGroup, ParameterKey};
use crate::table::CsvFormat;
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Off,
    Error,
    Warn,
    #[default]
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    pub fn as_str(self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<LogLevel> for log::LevelFilter {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Off => log::LevelFilter::Off,
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    pub level: LogLevel,
    /// Log to this file instead of stderr.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

/// What to do with the engine's input and output once it has run.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Quantities to compare as `INS_<L>` vs `FUS_<L>`.
    pub compare_labels: Vec<String>,
    /// Where charts are written; defaults to `<output-directory>/plots`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub plot_dir: Option<PathBuf>,
    /// Also chart every column of the input file.
    pub inspect_input: bool,
    pub input_format: CsvFormat,
    pub output_format: CsvFormat,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        AnalysisConfig {
            compare_labels: DEFAULT_COMPARE_LABELS.iter().map(|s| s.to_string()).collect(),
            plot_dir: None,
            inspect_input: false,
            input_format: CsvFormat::default(),
            output_format: CsvFormat::default(),
        }
    }
}

/// A complete run description.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RunConfig {
    /// Path to the engine executable.
    pub engine: PathBuf,
    /// Engine parameters in emission order.
    pub parameters: ConfigBuilder,
    pub noise: NoiseGroup,
    #[serde(default)]
    pub analysis: AnalysisConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl RunConfig {
    /// The tram example: IMU at 300 Hz, GPS at 1 Hz, yaw from the CSV, fixed height.
    pub fn template() -> Self {
        let parameters = ConfigBuilder::new()
            .set(ParameterKey::WriteIndexFile, false)
            .set(ParameterKey::InputFile, "data/tram/input/tram.csv")
            .set(ParameterKey::OutputDirectory, "data/tram/yaw")
            .set(ParameterKey::Frequency, [300, 1])
            .set(ParameterKey::AccIndices, [1, 2, 3])
            .set(ParameterKey::GyroIndices, [4, 5, 6])
            .set(ParameterKey::GpsCoordIndices, [13, 14])
            .set(ParameterKey::HeightValue, 100)
            .set(ParameterKey::RollIndex, 12)
            .set(ParameterKey::PitchIndex, 11)
            .set(ParameterKey::YawIndex, 10)
            .set(ParameterKey::AccInRest, [0.05601, 0.01959, 0.18640])
            .set(ParameterKey::GyroInRest, [0.01752, 0.03873, 0.00347])
            .set(ParameterKey::PlatformToBody, [0, 1, 0, -1, 0, 0, 0, 0, -1])
            .set(ParameterKey::AttitudeSelector, [0, 0, 1])
            .set(ParameterKey::BodySelector, [1, 0, 0])
            .set(ParameterKey::InputsInRadians, false)
            .set(ParameterKey::PlatformAlignment, false)
            .set(ParameterKey::FeedbackBias, false)
            .set(ParameterKey::MechanizationLocal, false)
            .set(ParameterKey::ProgressAngles, false)
            .set(ParameterKey::KalmanTau, 100)
            .set(ParameterKey::GpsOffInterval, [-1, -1])
            .set(ParameterKey::QuantizationFactor, 1000);
        let noise = NoiseGroup::new(
            [0.05601, 0.01959, 0.18640],
            [0.01752, 0.03873, 0.0347],
            [0.01, 0.01, 0.01],
            [0.01, 0.01, 0.01],
            [3.0, 3.0, 3.0],
        )
        .unwrap_or_default();
        RunConfig {
            engine: PathBuf::from("./out/navfusion"),
            parameters,
            noise,
            analysis: AnalysisConfig::default(),
            logging: LoggingConfig::default(),
        }
    }

    /// Validate the parameters into a model.
    pub fn model(&self) -> Result<ConfigurationModel, ConfigError> {
        self.parameters.clone().build()
    }

    /// Validate and render the engine command line.
    pub fn invocation(&self) -> Result<InvocationString, ConfigError> {
        Ok(synthesize(&self.engine, &self.model()?, &self.noise))
    }

    /// Write the run file as pretty-printed JSON.
    pub fn to_json<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let file = File::create(path)?;
        serde_json::to_writer_pretty(file, self).map_err(io::Error::other)
    }

    pub fn from_json<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        serde_json::from_reader(file).map_err(io::Error::other)
    }

    pub fn to_yaml<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut file = File::create(path)?;
        let s = serde_yaml::to_string(self).map_err(io::Error::other)?;
        file.write_all(s.as_bytes())
    }

    pub fn from_yaml<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let file = File::open(path)?;
        serde_yaml::from_reader(file).map_err(io::Error::other)
    }

    pub fn to_toml<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut file = File::create(path)?;
        let s = toml::to_string(self).map_err(io::Error::other)?;
        file.write_all(s.as_bytes())
    }

    pub fn from_toml<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let mut s = String::new();
        let mut file = File::open(path)?;
        file.read_to_string(&mut s)?;
        toml::from_str(&s).map_err(io::Error::other)
    }

    /// Write in the format given by the extension (.json/.yaml/.yml/.toml).
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let p = path.as_ref();
        match extension(p).as_deref() {
            Some("json") => self.to_json(p),
            Some("yaml") | Some("yml") => self.to_yaml(p),
            Some("toml") => self.to_toml(p),
            _ => Err(unsupported(p)),
        }
    }

    /// Read in the format given by the extension (.json/.yaml/.yml/.toml).
    pub fn from_file<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let p = path.as_ref();
        match extension(p).as_deref() {
            Some("json") => Self::from_json(p),
            Some("yaml") | Some("yml") => Self::from_yaml(p),
            Some("toml") => Self::from_toml(p),
            _ => Err(unsupported(p)),
        }
    }
}

fn extension(path: &Path) -> Option<String> {
    path.extension()
        .and_then(|s| s.to_str())
        .map(|s| s.to_lowercase())
}

fn unsupported(path: &Path) -> io::Error {
    io::Error::new(
        io::ErrorKind::InvalidInput,
        format!("unsupported run file extension: {}", path.display()),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ParameterValue;
    use tempfile::tempdir;

    #[test]
    fn template_builds_and_renders() {
        let config = RunConfig::template();
        let invocation = config.invocation().unwrap();
        assert!(invocation.as_str().starts_with("./out/navfusion -I \"data/tram/input/tram.csv\""));
        assert_eq!(invocation.flag_value("-p").as_deref(), Some("0,1,0,-1,0,0,0,0,-1"));
        assert_eq!(invocation.flag_value("-T").as_deref(), Some("-1,-1"));
        assert!(!invocation.contains_flag("--idx"));
    }

    #[test]
    fn log_level_maps_to_filter() {
        assert_eq!(LogLevel::default(), LogLevel::Info);
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(LogLevel::Warn.as_str(), "warn");
    }

    #[test]
    fn analysis_defaults_compare_attitude_and_speed() {
        let analysis = AnalysisConfig::default();
        assert_eq!(analysis.compare_labels, vec!["ROLL", "PITCH", "YAW", "V"]);
        assert_eq!(analysis.input_format, CsvFormat::default());
    }

    #[test]
    fn minimal_toml_fills_defaults() {
        let text = r#"
engine = "navfusion"

[parameters]
input_file = "in.csv"
output_directory = "out"
frequency = [100, 1]
acc_indices = [1, 2, 3]
gyro_indices = [4, 5, 6]
gps_coord_indices = [7, 8]
height_index = 9
mag_indices = [10, 11, 12]

[noise]
accelerometer_bias = [0.1, 0.1, 0.1]
gyrometer_bias = [0.1, 0.1, 0.1]
accelerometer_drift = [0.05, 0.05, 0.05]
gyrometer_drift = [0.05, 0.05, 0.05]
gps_dop = [3, 3, 3]
"#;
        let config: RunConfig = toml::from_str(text).unwrap();
        assert_eq!(config.noise, NoiseGroup::default());
        assert_eq!(config.logging, LoggingConfig::default());
        assert_eq!(
            config.parameters.get(ParameterKey::HeightIndex),
            Some(&ParameterValue::Integer(9))
        );
        let model = config.model().unwrap();
        let order: Vec<ParameterKey> = model.iter().map(|(k, _)| k).collect();
        assert_eq!(order[0], ParameterKey::InputFile);
        assert_eq!(order[7], ParameterKey::MagIndices);
    }

    #[test]
    fn noise_with_wrong_shape_is_rejected() {
        let text = r#"
engine = "navfusion"
[parameters]
[noise]
accelerometer_bias = [0.1, 0.1]
gyrometer_bias = [0.1, 0.1, 0.1]
accelerometer_drift = [0.05, 0.05, 0.05]
gyrometer_drift = [0.05, 0.05, 0.05]
gps_dop = [3, 3, 3]
"#;
        assert!(toml::from_str::<RunConfig>(text).is_err());
    }

    #[test]
    fn unknown_extension_is_invalid_input() {
        let dir = tempdir().unwrap();
        let err = RunConfig::template()
            .to_file(dir.path().join("run.ini"))
            .unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
        let err = RunConfig::from_file(dir.path().join("run.txt")).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidInput);
    }
}
