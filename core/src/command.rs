//! Rendering a [ConfigurationModel] into the engine's command line.
//!
//! The synthesizer is a pure function: the same model, noise group and engine path always produce
//! byte-identical output. Options are emitted in the model's insertion order as `" <flag> <value>"`,
//! followed by the noise block `-K "<15 numbers>"`.
//!
//! Value rendering, one case per [ParameterValue] variant:
//! - booleans render as `1` / `0`, except the flag-only write-index option which is emitted bare
//!   (`--idx`) when true and omitted entirely when false
//! - lists render comma-joined inside one pair of double quotes: `"300,1"`
//! - paths render quoted, numbers in their shortest round-trip decimal form

use crate::config::{ConfigurationModel, NoiseGroup, ParameterKey, ParameterValue, ValueKind};
use log::debug;
use std::fmt;
use std::path::Path;

/// Flag carrying the flattened [NoiseGroup].
pub const NOISE_FLAG: &str = "-K";

/// The fully rendered engine command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvocationString(String);

impl InvocationString {
    /// The command line exactly as it is handed to the shell.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_string(self) -> String {
        self.0
    }

    /// Split into shell-like tokens, honoring double quotes. Quotes are stripped.
    pub fn tokens(&self) -> Vec<String> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut quoted = false;
        let mut pending = false;
        for c in self.0.chars() {
            match c {
                '"' => {
                    quoted = !quoted;
                    pending = true;
                }
                c if c.is_whitespace() && !quoted => {
                    if pending {
                        tokens.push(std::mem::take(&mut current));
                        pending = false;
                    }
                }
                c => {
                    current.push(c);
                    pending = true;
                }
            }
        }
        if pending {
            tokens.push(current);
        }
        tokens
    }

    /// True if `flag` appears as a standalone token.
    pub fn contains_flag(&self, flag: &str) -> bool {
        self.tokens().iter().skip(1).any(|t| t == flag)
    }

    /// The token following `flag`, with quotes stripped.
    pub fn flag_value(&self, flag: &str) -> Option<String> {
        let tokens = self.tokens();
        let position = tokens.iter().skip(1).position(|t| t == flag)? + 1;
        tokens.get(position + 1).cloned()
    }

    /// The unquoted `-K` payload.
    pub fn noise_payload(&self) -> Option<String> {
        self.flag_value(NOISE_FLAG)
    }
}

impl fmt::Display for InvocationString {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for InvocationString {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// Render `model` and `noise` into a command line for the engine at `engine`.
///
/// Options appear in the model's insertion order, followed by the `-K` noise block. Absent values
/// and disabled flag-only options are left out.
///
/// # Arguments
/// * `engine` - Path of the engine executable. Quoted when it contains whitespace.
/// * `model` - A validated configuration from [ConfigBuilder::build](crate::config::ConfigBuilder::build).
/// * `noise` - The five noise vectors rendered as the 15-value `-K` payload.
///
/// # Returns
/// * `InvocationString` - The complete command line. Infallible: a built [ConfigurationModel] and a
///   [NoiseGroup] can only exist in a valid state.
///
/// # Example
///
/// ```
/// use navfusion::command::synthesize;
/// use navfusion::config::{ConfigBuilder, NoiseGroup, ParameterKey};
/// use std::path::Path;
///
/// let model = ConfigBuilder::new()
///     .set(ParameterKey::InputFile, "tram.csv")
///     .set(ParameterKey::OutputDirectory, "out")
///     .set(ParameterKey::Frequency, [300, 1])
///     .set(ParameterKey::AccIndices, [1, 2, 3])
///     .set(ParameterKey::GyroIndices, [4, 5, 6])
///     .set(ParameterKey::GpsCoordIndices, [13, 14])
///     .set(ParameterKey::HeightValue, 100)
///     .set(ParameterKey::YawIndex, 10)
///     .build()
///     .unwrap();
/// let invocation = synthesize(Path::new("navfusion"), &model, &NoiseGroup::default());
/// assert!(invocation.as_str().starts_with("navfusion -I \"tram.csv\" -O \"out\" -F \"300,1\""));
/// ```
pub fn synthesize(
    engine: &Path,
    model: &ConfigurationModel,
    noise: &NoiseGroup,
) -> InvocationString {
    let mut command = render_engine(engine);
    for (key, value) in model.iter() {
        if let Some(option) = render_option(key, value) {
            command.push(' ');
            command.push_str(&option);
        }
    }
    command.push(' ');
    command.push_str(NOISE_FLAG);
    command.push_str(" \"");
    command.push_str(&join_numbers(&noise.flattened()));
    command.push('"');
    debug!("Synthesized engine invocation: {}", command);
    InvocationString(command)
}

/// Render one `flag value` option, or nothing if the option must not appear.
pub fn render_option(key: ParameterKey, value: &ParameterValue) -> Option<String> {
    match (key.kind(), value) {
        (_, ParameterValue::Absent) => None,
        (ValueKind::FlagOnly, ParameterValue::Bool(true)) => Some(key.flag().to_string()),
        (ValueKind::FlagOnly, ParameterValue::Bool(false)) => None,
        _ => Some(format!("{} {}", key.flag(), render_value(value))),
    }
}

/// Render a single value as the engine expects it.
pub fn render_value(value: &ParameterValue) -> String {
    match value {
        ParameterValue::Absent => String::new(),
        ParameterValue::Bool(true) => "1".to_string(),
        ParameterValue::Bool(false) => "0".to_string(),
        ParameterValue::Integer(i) => i.to_string(),
        ParameterValue::Scalar(x) => format_number(*x),
        ParameterValue::List(values) => format!("\"{}\"", join_numbers(values)),
        ParameterValue::Text(text) => format!("\"{}\"", text.trim()),
    }
}

/// Shortest round-trip decimal form; integral values carry no fractional part.
pub fn format_number(x: f64) -> String {
    format!("{x}")
}

fn join_numbers(values: &[f64]) -> String {
    values
        .iter()
        .map(|&x| format_number(x))
        .collect::<Vec<_>>()
        .join(",")
}

fn render_engine(engine: &Path) -> String {
    let engine = engine.to_string_lossy();
    if engine.contains(char::is_whitespace) {
        format!("\"{engine}\"")
    } else {
        engine.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ConfigBuilder;

    fn model() -> ConfigurationModel {
        ConfigBuilder::new()
            .set(ParameterKey::WriteIndexFile, false)
            .set(ParameterKey::InputFile, " data/tram/input/tram.csv ")
            .set(ParameterKey::OutputDirectory, "data/tram/yaw")
            .set(ParameterKey::Frequency, [300, 1])
            .set(ParameterKey::AccIndices, [1, 2, 3])
            .set(ParameterKey::GyroIndices, [4, 5, 6])
            .set(ParameterKey::GpsCoordIndices, [13, 14])
            .set(ParameterKey::HeightValue, 100)
            .set(ParameterKey::RollIndex, 12)
            .set(ParameterKey::PitchIndex, 11)
            .set(ParameterKey::YawIndex, 10)
            .build()
            .unwrap()
    }

    #[test]
    fn renders_booleans_as_digits() {
        assert_eq!(render_value(&ParameterValue::Bool(true)), "1");
        assert_eq!(render_value(&ParameterValue::Bool(false)), "0");
        assert_eq!(
            render_option(ParameterKey::FeedbackBias, &ParameterValue::Bool(false)),
            Some("-f 0".to_string())
        );
    }

    #[test]
    fn renders_lists_quoted_and_comma_joined() {
        assert_eq!(
            render_value(&ParameterValue::List(vec![0.05601, 0.01959, 0.1864])),
            "\"0.05601,0.01959,0.1864\""
        );
        assert_eq!(
            render_value(&ParameterValue::List(vec![-1.0, -1.0])),
            "\"-1,-1\""
        );
    }

    #[test]
    fn renders_numbers_without_trailing_zeros() {
        assert_eq!(format_number(100.0), "100");
        assert_eq!(format_number(0.18640), "0.1864");
        assert_eq!(render_value(&ParameterValue::Integer(12)), "12");
    }

    #[test]
    fn write_index_flag_is_bare_or_absent() {
        assert_eq!(
            render_option(ParameterKey::WriteIndexFile, &ParameterValue::Bool(true)),
            Some("--idx".to_string())
        );
        assert_eq!(
            render_option(ParameterKey::WriteIndexFile, &ParameterValue::Bool(false)),
            None
        );
    }

    #[test]
    fn options_follow_insertion_order() {
        let invocation = synthesize(Path::new("navfusion"), &model(), &NoiseGroup::default());
        assert_eq!(
            invocation.as_str(),
            "navfusion -I \"data/tram/input/tram.csv\" -O \"data/tram/yaw\" -F \"300,1\" \
             -A \"1,2,3\" -W \"4,5,6\" -C \"13,14\" -h 100 -R 12 -P 11 -Y 10 \
             -K \"0.1,0.1,0.1,0.1,0.1,0.1,0.05,0.05,0.05,0.05,0.05,0.05,3,3,3\""
        );
    }

    #[test]
    fn engine_path_with_spaces_is_quoted() {
        let invocation = synthesize(
            Path::new("C:/Program Files/navfusion.exe"),
            &model(),
            &NoiseGroup::default(),
        );
        assert!(invocation.as_str().starts_with("\"C:/Program Files/navfusion.exe\" -I"));
        assert_eq!(invocation.tokens()[0], "C:/Program Files/navfusion.exe");
    }

    #[test]
    fn tokens_strip_quotes() {
        let invocation = synthesize(Path::new("navfusion"), &model(), &NoiseGroup::default());
        assert_eq!(invocation.flag_value("-F").as_deref(), Some("300,1"));
        assert_eq!(invocation.flag_value("-h").as_deref(), Some("100"));
        assert!(invocation.contains_flag("-Y"));
        assert!(!invocation.contains_flag("--idx"));
        assert_eq!(invocation.flag_value("-M"), None);
    }
}
