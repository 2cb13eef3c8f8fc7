//! Typed tuning parameters for the external fusion engine.
//!
//! The engine is configured entirely from its command line. This module models that command line as
//! an ordered set of `(ParameterKey, ParameterValue)` entries plus the mandatory [NoiseGroup]. Every key
//! declares a [ValueKind]; values are checked against it once, when [ConfigBuilder::build] produces an
//! immutable [ConfigurationModel]. Rendering the model into an invocation lives in [crate::command].
//!
//! Mandatory keys (mirroring the engine's own startup check):
//! - input file (`-I`), output directory (`-O`), sampling frequencies (`-F`)
//! - accelerometer (`-A`), gyrometer (`-W`) and GPS coordinate (`-C`) CSV indices
//! - height: either a CSV index (`-H`) or a fixed value (`-h`)
//! - yaw source: either a CSV index (`-Y`) or the magnetometer indices (`-M`). Roll and pitch can always
//!   be derived from the accelerometer.

use serde::de::{self, MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use thiserror::Error;

/// Identifier of one engine command-line option.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ParameterKey {
    InputFile,
    OutputDirectory,
    Frequency,
    InputsInRadians,
    AccIndices,
    GyroIndices,
    MagIndices,
    GpsCoordIndices,
    HeightIndex,
    RollIndex,
    PitchIndex,
    YawIndex,
    AccInRest,
    GyroInRest,
    HeightValue,
    AttitudeSelector,
    BodySelector,
    PlatformToBody,
    PlatformAlignment,
    FeedbackBias,
    MechanizationLocal,
    ProgressAngles,
    GravityCorrection,
    KalmanTau,
    GpsOffInterval,
    QuantizationFactor,
    WriteIndexFile,
}

impl ParameterKey {
    /// Every key, in the order the engine documents them.
    pub const ALL: [ParameterKey; 27] = [
        ParameterKey::InputFile,
        ParameterKey::OutputDirectory,
        ParameterKey::Frequency,
        ParameterKey::InputsInRadians,
        ParameterKey::AccIndices,
        ParameterKey::GyroIndices,
        ParameterKey::MagIndices,
        ParameterKey::GpsCoordIndices,
        ParameterKey::HeightIndex,
        ParameterKey::RollIndex,
        ParameterKey::PitchIndex,
        ParameterKey::YawIndex,
        ParameterKey::AccInRest,
        ParameterKey::GyroInRest,
        ParameterKey::HeightValue,
        ParameterKey::AttitudeSelector,
        ParameterKey::BodySelector,
        ParameterKey::PlatformToBody,
        ParameterKey::PlatformAlignment,
        ParameterKey::FeedbackBias,
        ParameterKey::MechanizationLocal,
        ParameterKey::ProgressAngles,
        ParameterKey::GravityCorrection,
        ParameterKey::KalmanTau,
        ParameterKey::GpsOffInterval,
        ParameterKey::QuantizationFactor,
        ParameterKey::WriteIndexFile,
    ];

    /// The engine flag token for this key.
    pub fn flag(self) -> &'static str {
        match self {
            ParameterKey::InputFile => "-I",
            ParameterKey::OutputDirectory => "-O",
            ParameterKey::Frequency => "-F",
            ParameterKey::InputsInRadians => "-r",
            ParameterKey::AccIndices => "-A",
            ParameterKey::GyroIndices => "-W",
            ParameterKey::MagIndices => "-M",
            ParameterKey::GpsCoordIndices => "-C",
            ParameterKey::HeightIndex => "-H",
            ParameterKey::RollIndex => "-R",
            ParameterKey::PitchIndex => "-P",
            ParameterKey::YawIndex => "-Y",
            ParameterKey::AccInRest => "-a",
            ParameterKey::GyroInRest => "-w",
            ParameterKey::HeightValue => "-h",
            ParameterKey::AttitudeSelector => "-z",
            ParameterKey::BodySelector => "-x",
            ParameterKey::PlatformToBody => "-p",
            ParameterKey::PlatformAlignment => "-l",
            ParameterKey::FeedbackBias => "-f",
            ParameterKey::MechanizationLocal => "-m",
            ParameterKey::ProgressAngles => "-y",
            ParameterKey::GravityCorrection => "-g",
            ParameterKey::KalmanTau => "-t",
            ParameterKey::GpsOffInterval => "-T",
            ParameterKey::QuantizationFactor => "-q",
            ParameterKey::WriteIndexFile => "--idx",
        }
    }

    /// The kind of value this key accepts.
    pub fn kind(self) -> ValueKind {
        match self {
            ParameterKey::InputFile | ParameterKey::OutputDirectory => ValueKind::Path,
            ParameterKey::Frequency | ParameterKey::GpsOffInterval => ValueKind::Numbers(2),
            ParameterKey::AccInRest | ParameterKey::GyroInRest => ValueKind::Numbers(3),
            ParameterKey::PlatformToBody => ValueKind::Numbers(9),
            ParameterKey::AccIndices | ParameterKey::GyroIndices | ParameterKey::MagIndices => {
                ValueKind::Indices(3)
            }
            ParameterKey::GpsCoordIndices => ValueKind::Indices(2),
            ParameterKey::HeightIndex
            | ParameterKey::RollIndex
            | ParameterKey::PitchIndex
            | ParameterKey::YawIndex => ValueKind::Index,
            ParameterKey::HeightValue | ParameterKey::KalmanTau | ParameterKey::QuantizationFactor => {
                ValueKind::Scalar
            }
            ParameterKey::AttitudeSelector | ParameterKey::BodySelector => ValueKind::Bits(3),
            ParameterKey::InputsInRadians
            | ParameterKey::PlatformAlignment
            | ParameterKey::FeedbackBias
            | ParameterKey::MechanizationLocal
            | ParameterKey::ProgressAngles
            | ParameterKey::GravityCorrection => ValueKind::Switch,
            ParameterKey::WriteIndexFile => ValueKind::FlagOnly,
        }
    }

    /// Name used for this key in run files.
    pub fn name(self) -> &'static str {
        match self {
            ParameterKey::InputFile => "input_file",
            ParameterKey::OutputDirectory => "output_directory",
            ParameterKey::Frequency => "frequency",
            ParameterKey::InputsInRadians => "inputs_in_radians",
            ParameterKey::AccIndices => "acc_indices",
            ParameterKey::GyroIndices => "gyro_indices",
            ParameterKey::MagIndices => "mag_indices",
            ParameterKey::GpsCoordIndices => "gps_coord_indices",
            ParameterKey::HeightIndex => "height_index",
            ParameterKey::RollIndex => "roll_index",
            ParameterKey::PitchIndex => "pitch_index",
            ParameterKey::YawIndex => "yaw_index",
            ParameterKey::AccInRest => "acc_in_rest",
            ParameterKey::GyroInRest => "gyro_in_rest",
            ParameterKey::HeightValue => "height_value",
            ParameterKey::AttitudeSelector => "attitude_selector",
            ParameterKey::BodySelector => "body_selector",
            ParameterKey::PlatformToBody => "platform_to_body",
            ParameterKey::PlatformAlignment => "platform_alignment",
            ParameterKey::FeedbackBias => "feedback_bias",
            ParameterKey::MechanizationLocal => "mechanization_local",
            ParameterKey::ProgressAngles => "progress_angles",
            ParameterKey::GravityCorrection => "gravity_correction",
            ParameterKey::KalmanTau => "kalman_tau",
            ParameterKey::GpsOffInterval => "gps_off_interval",
            ParameterKey::QuantizationFactor => "quantization_factor",
            ParameterKey::WriteIndexFile => "write_index_file",
        }
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.flag())
    }
}

impl FromStr for ParameterKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ParameterKey::ALL
            .iter()
            .copied()
            .find(|key| key.name() == s || key.flag() == s)
            .ok_or_else(|| ConfigError::UnknownParameter(s.to_string()))
    }
}

/// Shape of the value a [ParameterKey] accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ValueKind {
    /// A file-system path, rendered quoted.
    Path,
    /// A list of exactly `n` real numbers.
    Numbers(usize),
    /// A list of exactly `n` CSV column indices.
    Indices(usize),
    /// A single CSV column index.
    Index,
    /// A single real number.
    Scalar,
    /// A list of exactly `n` selector bits (0 or 1).
    Bits(usize),
    /// A boolean rendered as `1`/`0`.
    Switch,
    /// A boolean rendered as a bare flag when true and omitted when false.
    FlagOnly,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValueKind::Path => write!(f, "a path"),
            ValueKind::Numbers(n) => write!(f, "a list of {n} numbers"),
            ValueKind::Indices(n) => write!(f, "a list of {n} CSV indices"),
            ValueKind::Index => write!(f, "a CSV index"),
            ValueKind::Scalar => write!(f, "a number"),
            ValueKind::Bits(n) => write!(f, "a list of {n} bits"),
            ValueKind::Switch | ValueKind::FlagOnly => write!(f, "a boolean"),
        }
    }
}

/// A tagged parameter value.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParameterValue {
    /// Unset. Never rendered.
    Absent,
    Bool(bool),
    Integer(i64),
    Scalar(f64),
    List(Vec<f64>),
    Text(String),
}

impl ParameterValue {
    pub fn is_absent(&self) -> bool {
        matches!(self, ParameterValue::Absent)
    }

    /// Short name of the variant, used in error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            ParameterValue::Absent => "nothing",
            ParameterValue::Bool(_) => "a boolean",
            ParameterValue::Integer(_) => "an integer",
            ParameterValue::Scalar(_) => "a number",
            ParameterValue::List(_) => "a list",
            ParameterValue::Text(_) => "a string",
        }
    }
}

impl From<bool> for ParameterValue {
    fn from(value: bool) -> Self {
        ParameterValue::Bool(value)
    }
}

impl From<i32> for ParameterValue {
    fn from(value: i32) -> Self {
        ParameterValue::Integer(value as i64)
    }
}

impl From<i64> for ParameterValue {
    fn from(value: i64) -> Self {
        ParameterValue::Integer(value)
    }
}

impl From<f64> for ParameterValue {
    fn from(value: f64) -> Self {
        ParameterValue::Scalar(value)
    }
}

impl From<Vec<f64>> for ParameterValue {
    fn from(values: Vec<f64>) -> Self {
        ParameterValue::List(values)
    }
}

impl<const N: usize> From<[f64; N]> for ParameterValue {
    fn from(values: [f64; N]) -> Self {
        ParameterValue::List(values.to_vec())
    }
}

impl<const N: usize> From<[i32; N]> for ParameterValue {
    fn from(values: [i32; N]) -> Self {
        ParameterValue::List(values.iter().map(|&v| v as f64).collect())
    }
}

impl From<&str> for ParameterValue {
    fn from(value: &str) -> Self {
        ParameterValue::Text(value.to_string())
    }
}

impl From<String> for ParameterValue {
    fn from(value: String) -> Self {
        ParameterValue::Text(value)
    }
}

impl From<&Path> for ParameterValue {
    fn from(value: &Path) -> Self {
        ParameterValue::Text(value.to_string_lossy().into_owned())
    }
}

impl From<PathBuf> for ParameterValue {
    fn from(value: PathBuf) -> Self {
        ParameterValue::from(value.as_path())
    }
}

impl<T: Into<ParameterValue>> From<Option<T>> for ParameterValue {
    fn from(value: Option<T>) -> Self {
        value.map_or(ParameterValue::Absent, Into::into)
    }
}

/// Errors raised while assembling a configuration. None of them can occur after a
/// [ConfigurationModel] has been built.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum ConfigError {
    #[error("missing mandatory parameter {0}")]
    MissingParameter(ParameterKey),
    #[error("either {0} or {1} must be set")]
    MissingAlternative(ParameterKey, ParameterKey),
    #[error("parameter {key} expects {expected}, got {found}")]
    KindMismatch {
        key: ParameterKey,
        expected: ValueKind,
        found: &'static str,
    },
    #[error("invalid value for {key}: {reason}")]
    InvalidValue { key: ParameterKey, reason: String },
    #[error("unknown parameter '{0}'")]
    UnknownParameter(String),
    #[error("malformed noise group: {0}")]
    MalformedNoise(String),
}

/// Check a single value against the kind its key declares.
fn check_value(key: ParameterKey, value: &ParameterValue) -> Result<(), ConfigError> {
    let kind = key.kind();
    let invalid = |reason: String| ConfigError::InvalidValue { key, reason };
    match (kind, value) {
        (_, ParameterValue::Absent) => Ok(()),
        (ValueKind::Path, ParameterValue::Text(text)) => {
            if text.trim().is_empty() {
                Err(invalid("path is empty".to_string()))
            } else if text.contains('"') {
                Err(invalid("path must not contain a double quote".to_string()))
            } else {
                Ok(())
            }
        }
        (ValueKind::Switch | ValueKind::FlagOnly, ParameterValue::Bool(_)) => Ok(()),
        (ValueKind::Index, ParameterValue::Integer(index)) => {
            if *index < 0 {
                Err(invalid(format!("CSV index {index} is negative")))
            } else {
                Ok(())
            }
        }
        (ValueKind::Scalar, ParameterValue::Integer(_)) => Ok(()),
        (ValueKind::Scalar, ParameterValue::Scalar(x)) => {
            if x.is_finite() {
                Ok(())
            } else {
                Err(invalid(format!("{x} is not a finite number")))
            }
        }
        (ValueKind::Numbers(n), ParameterValue::List(values)) => {
            check_len(values, n).map_err(invalid)?;
            if let Some(x) = values.iter().find(|x| !x.is_finite()) {
                return Err(invalid(format!("{x} is not a finite number")));
            }
            // Platform-to-body is a rotation matrix of axis permutations/sign flips.
            if key == ParameterKey::PlatformToBody
                && let Some(x) = values.iter().find(|x| x.abs() > 1.0)
            {
                return Err(invalid(format!("element {x} is outside [-1, 1]")));
            }
            Ok(())
        }
        (ValueKind::Indices(n), ParameterValue::List(values)) => {
            check_len(values, n).map_err(invalid)?;
            match values
                .iter()
                .find(|x| !x.is_finite() || x.fract() != 0.0 || **x < 0.0)
            {
                Some(x) => Err(invalid(format!("{x} is not a valid CSV index"))),
                None => Ok(()),
            }
        }
        (ValueKind::Bits(n), ParameterValue::List(values)) => {
            check_len(values, n).map_err(invalid)?;
            match values.iter().find(|x| **x != 0.0 && **x != 1.0) {
                Some(x) => Err(invalid(format!("selector element {x} is not 0 or 1"))),
                None => Ok(()),
            }
        }
        _ => Err(ConfigError::KindMismatch {
            key,
            expected: kind,
            found: value.type_name(),
        }),
    }
}

fn check_len(values: &[f64], expected: usize) -> Result<(), String> {
    if values.len() == expected {
        Ok(())
    } else {
        Err(format!(
            "expected {expected} elements, got {}",
            values.len()
        ))
    }
}

/// Collects parameters in insertion order. Nothing is validated until [ConfigBuilder::build].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConfigBuilder {
    entries: Vec<(ParameterKey, ParameterValue)>,
}

impl ConfigBuilder {
    pub fn new() -> Self {
        ConfigBuilder::default()
    }

    /// Set `key` to `value`. Setting a key a second time replaces the value but keeps the key's
    /// original position.
    pub fn set(mut self, key: ParameterKey, value: impl Into<ParameterValue>) -> Self {
        self.insert(key, value.into());
        self
    }

    /// Mark `key` as absent so it is not rendered.
    pub fn unset(self, key: ParameterKey) -> Self {
        self.set(key, ParameterValue::Absent)
    }

    pub fn insert(&mut self, key: ParameterKey, value: ParameterValue) {
        match self.entries.iter_mut().find(|(k, _)| *k == key) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((key, value)),
        }
    }

    pub fn get(&self, key: ParameterKey) -> Option<&ParameterValue> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| v)
    }

    /// Validate every entry and the mandatory set, producing an immutable model.
    ///
    /// Values are checked against their key's [ValueKind] first. Then the mandatory keys and the
    /// either/or pairs are checked.
    ///
    /// # Returns
    /// * `Ok(ConfigurationModel)` keeping the insertion order of the entries.
    /// * `Err(ConfigError)` for the first entry of the wrong kind, the first invalid value or the
    ///   first missing parameter.
    pub fn build(self) -> Result<ConfigurationModel, ConfigError> {
        for (key, value) in &self.entries {
            check_value(*key, value)?;
        }
        let model = ConfigurationModel {
            entries: self.entries,
        };
        for key in [
            ParameterKey::InputFile,
            ParameterKey::OutputDirectory,
            ParameterKey::Frequency,
            ParameterKey::AccIndices,
            ParameterKey::GyroIndices,
            ParameterKey::GpsCoordIndices,
        ] {
            if !model.is_set(key) {
                return Err(ConfigError::MissingParameter(key));
            }
        }
        for (first, second) in [
            (ParameterKey::HeightIndex, ParameterKey::HeightValue),
            (ParameterKey::YawIndex, ParameterKey::MagIndices),
        ] {
            if !model.is_set(first) && !model.is_set(second) {
                return Err(ConfigError::MissingAlternative(first, second));
            }
        }
        Ok(model)
    }
}

impl FromIterator<(ParameterKey, ParameterValue)> for ConfigBuilder {
    fn from_iter<I: IntoIterator<Item = (ParameterKey, ParameterValue)>>(iter: I) -> Self {
        let mut builder = ConfigBuilder::new();
        for (key, value) in iter {
            builder.insert(key, value);
        }
        builder
    }
}

impl Serialize for ConfigBuilder {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let present: Vec<_> = self
            .entries
            .iter()
            .filter(|(_, value)| !value.is_absent())
            .collect();
        let mut map = serializer.serialize_map(Some(present.len()))?;
        for (key, value) in present {
            map.serialize_entry(key.name(), value)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for ConfigBuilder {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct EntriesVisitor;

        impl<'de> Visitor<'de> for EntriesVisitor {
            type Value = ConfigBuilder;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of engine parameters")
            }

            // Entries arrive in document order, which becomes the insertion order.
            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut builder = ConfigBuilder::new();
                while let Some(name) = access.next_key::<String>()? {
                    let key = name.parse::<ParameterKey>().map_err(de::Error::custom)?;
                    let value = access.next_value::<ParameterValue>()?;
                    builder.insert(key, value);
                }
                Ok(builder)
            }
        }

        deserializer.deserialize_map(EntriesVisitor)
    }
}

/// A validated, immutable set of engine parameters in insertion order.
#[derive(Clone, Debug, PartialEq)]
pub struct ConfigurationModel {
    entries: Vec<(ParameterKey, ParameterValue)>,
}

impl ConfigurationModel {
    /// Present entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (ParameterKey, &ParameterValue)> {
        self.entries
            .iter()
            .filter(|(_, value)| !value.is_absent())
            .map(|(key, value)| (*key, value))
    }

    pub fn get(&self, key: ParameterKey) -> Option<&ParameterValue> {
        self.iter().find(|(k, _)| *k == key).map(|(_, v)| v)
    }

    pub fn is_set(&self, key: ParameterKey) -> bool {
        self.get(key).is_some()
    }

    pub fn text(&self, key: ParameterKey) -> Option<&str> {
        match self.get(key) {
            Some(ParameterValue::Text(text)) => Some(text.trim()),
            _ => None,
        }
    }

    /// True only if `key` is set to `true`.
    pub fn is_enabled(&self, key: ParameterKey) -> bool {
        matches!(self.get(key), Some(ParameterValue::Bool(true)))
    }

    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process and measurement noise standard deviations handed to the engine's Kalman filter.
///
/// Always five 3-vectors in fixed order; flattening yields exactly 15 numbers.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "NoiseGroupFields", into = "NoiseGroupFields")]
pub struct NoiseGroup {
    vectors: [[f64; 3]; 5],
}

impl NoiseGroup {
    pub const NAMES: [&'static str; 5] = [
        "accelerometer_bias",
        "gyrometer_bias",
        "accelerometer_drift",
        "gyrometer_drift",
        "gps_dop",
    ];

    pub fn new(
        accelerometer_bias: [f64; 3],
        gyrometer_bias: [f64; 3],
        accelerometer_drift: [f64; 3],
        gyrometer_drift: [f64; 3],
        gps_dop: [f64; 3],
    ) -> Result<Self, ConfigError> {
        let vectors = [
            accelerometer_bias,
            gyrometer_bias,
            accelerometer_drift,
            gyrometer_drift,
            gps_dop,
        ];
        for (name, vector) in Self::NAMES.iter().zip(vectors.iter()) {
            if let Some(x) = vector.iter().find(|x| !x.is_finite()) {
                return Err(ConfigError::MalformedNoise(format!(
                    "{name} contains non-finite value {x}"
                )));
            }
        }
        Ok(NoiseGroup { vectors })
    }

    /// Build from loosely shaped vectors, rejecting anything but five vectors of three numbers.
    pub fn from_vectors(vectors: &[Vec<f64>]) -> Result<Self, ConfigError> {
        if vectors.len() != Self::NAMES.len() {
            return Err(ConfigError::MalformedNoise(format!(
                "expected {} vectors, got {}",
                Self::NAMES.len(),
                vectors.len()
            )));
        }
        let mut fixed = [[0.0; 3]; 5];
        for ((slot, vector), name) in fixed.iter_mut().zip(vectors).zip(Self::NAMES) {
            *slot = <[f64; 3]>::try_from(vector.as_slice()).map_err(|_| {
                ConfigError::MalformedNoise(format!(
                    "{name} must have 3 elements, got {}",
                    vector.len()
                ))
            })?;
        }
        let [acc_bias, gyr_bias, acc_drift, gyr_drift, dop] = fixed;
        NoiseGroup::new(acc_bias, gyr_bias, acc_drift, gyr_drift, dop)
    }

    pub fn vectors(&self) -> &[[f64; 3]; 5] {
        &self.vectors
    }

    /// The 15 numbers in engine order.
    pub fn flattened(&self) -> [f64; 15] {
        let mut flat = [0.0; 15];
        for (slot, value) in flat.iter_mut().zip(self.vectors.iter().flatten()) {
            *slot = *value;
        }
        flat
    }
}

impl Default for NoiseGroup {
    fn default() -> Self {
        NoiseGroup {
            vectors: [
                [0.1, 0.1, 0.1],
                [0.1, 0.1, 0.1],
                [0.05, 0.05, 0.05],
                [0.05, 0.05, 0.05],
                [3.0, 3.0, 3.0],
            ],
        }
    }
}

/// Serialized form of [NoiseGroup]; every vector is required.
#[derive(Clone, Debug, Serialize, Deserialize)]
struct NoiseGroupFields {
    accelerometer_bias: Vec<f64>,
    gyrometer_bias: Vec<f64>,
    accelerometer_drift: Vec<f64>,
    gyrometer_drift: Vec<f64>,
    gps_dop: Vec<f64>,
}

impl TryFrom<NoiseGroupFields> for NoiseGroup {
    type Error = ConfigError;

    fn try_from(fields: NoiseGroupFields) -> Result<Self, Self::Error> {
        NoiseGroup::from_vectors(&[
            fields.accelerometer_bias,
            fields.gyrometer_bias,
            fields.accelerometer_drift,
            fields.gyrometer_drift,
            fields.gps_dop,
        ])
    }
}

impl From<NoiseGroup> for NoiseGroupFields {
    fn from(noise: NoiseGroup) -> Self {
        let [acc_bias, gyr_bias, acc_drift, gyr_drift, dop] = noise.vectors;
        NoiseGroupFields {
            accelerometer_bias: acc_bias.to_vec(),
            gyrometer_bias: gyr_bias.to_vec(),
            accelerometer_drift: acc_drift.to_vec(),
            gyrometer_drift: gyr_drift.to_vec(),
            gps_dop: dop.to_vec(),
        }
    }
}
