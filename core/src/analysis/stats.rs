//! Rest-state statistics of an input table.
//!
//! For each column the mean, the sample standard deviation (n - 1 normalization) and their sum are
//! computed over the finite values only. A column with fewer than two finite values has a `NaN`
//! standard deviation. The result is persisted next to the input as `<stem>_stats.csv` with `;`
//! between fields and `,` as decimal separator, one row per statistic.

use crate::table::{CsvFormat, FormatError, TimeSeriesTable};
use log::info;
use nalgebra::DMatrix;
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const MEAN_LABEL: &str = "mean";
pub const STD_LABEL: &str = "std";
pub const MEAN_PLUS_STD_LABEL: &str = "mean+std";

#[derive(Debug, Error)]
pub enum StatsError {
    #[error("could not write {}: {source}", path.display())]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// Per-column mean, standard deviation and their sum.
#[derive(Clone, Debug, PartialEq)]
pub struct SummaryTable {
    /// Rows: mean, std, mean+std.
    table: TimeSeriesTable,
}

impl SummaryTable {
    pub const ROW_LABELS: [&'static str; 3] = [MEAN_LABEL, STD_LABEL, MEAN_PLUS_STD_LABEL];

    pub fn columns(&self) -> &[String] {
        self.table.columns()
    }

    pub fn mean(&self) -> Vec<f64> {
        self.row(0)
    }

    pub fn std(&self) -> Vec<f64> {
        self.row(1)
    }

    pub fn mean_plus_std(&self) -> Vec<f64> {
        self.row(2)
    }

    /// All three statistics for one column.
    pub fn column(&self, name: &str) -> Option<[f64; 3]> {
        let values = self.table.column(name)?;
        Some([values[0], values[1], values[2]])
    }

    fn row(&self, index: usize) -> Vec<f64> {
        self.table.row(index).unwrap_or_default()
    }

    /// Write the summary with a leading unnamed label column.
    pub fn write_csv<P: AsRef<Path>>(&self, path: P, format: &CsvFormat) -> Result<(), StatsError> {
        let path = path.as_ref();
        let csv_error = |source| StatsError::Csv {
            path: path.to_path_buf(),
            source,
        };
        let mut writer = csv::WriterBuilder::new()
            .delimiter(format.delimiter_byte()?)
            .from_path(path)
            .map_err(csv_error)?;

        let header = std::iter::once("").chain(self.columns().iter().map(String::as_str));
        writer.write_record(header).map_err(csv_error)?;
        for (i, label) in Self::ROW_LABELS.iter().enumerate() {
            let cells = self.row(i).into_iter().map(|v| format.format_number(v));
            let record: Vec<String> = std::iter::once(label.to_string()).chain(cells).collect();
            writer.write_record(&record).map_err(csv_error)?;
        }
        writer.flush()?;
        Ok(())
    }
}

/// Mean and sample standard deviation per column, ignoring non-finite values.
pub fn rest_state_statistics(table: &TimeSeriesTable) -> SummaryTable {
    let n_cols = table.n_cols();
    let mut summary = DMatrix::from_element(3, n_cols, f64::NAN);
    for (j, column) in table.data().column_iter().enumerate() {
        let values: Vec<f64> = column.iter().copied().filter(|v| v.is_finite()).collect();
        let (mean, std) = mean_and_std(&values);
        summary[(0, j)] = mean;
        summary[(1, j)] = std;
        summary[(2, j)] = mean + std;
    }
    SummaryTable {
        table: TimeSeriesTable::from_matrix(table.columns().to_vec(), summary),
    }
}

fn mean_and_std(values: &[f64]) -> (f64, f64) {
    let n = values.len();
    if n == 0 {
        return (f64::NAN, f64::NAN);
    }
    let mean = values.iter().sum::<f64>() / n as f64;
    if n < 2 {
        return (mean, f64::NAN);
    }
    let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
    (mean, variance.sqrt())
}

/// `<dir>/<stem>_stats.csv` for an input at `<dir>/<stem>.<ext>`.
pub fn stats_path(input: &Path) -> PathBuf {
    let stem = input
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    input.with_file_name(format!("{stem}_stats.csv"))
}

/// Compute the statistics of `table` and write them next to `input_path`.
///
/// # Arguments
/// * `input_path` - The recording `table` was read from. Names the output via [stats_path].
/// * `table` - The rest-state recording.
/// * `format` - Delimiter and decimal separator of the written file.
///
/// # Returns
/// * `Ok((SummaryTable, PathBuf))` - The statistics and the path they were written to.
/// * `Err(StatsError)` if `format` is unusable or the file cannot be written.
pub fn persist_statistics(
    input_path: &Path,
    table: &TimeSeriesTable,
    format: &CsvFormat,
) -> Result<(SummaryTable, PathBuf), StatsError> {
    let summary = rest_state_statistics(table);
    let path = stats_path(input_path);
    summary.write_csv(&path, format)?;
    info!(
        "Wrote rest-state statistics for {} columns to {}",
        summary.columns().len(),
        path.display()
    );
    Ok((summary, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::assert_approx_eq;
    use std::fs;
    use tempfile::tempdir;

    fn table() -> TimeSeriesTable {
        TimeSeriesTable::from_rows(
            vec!["accX".to_string(), "accY".to_string()],
            &[vec![1.0, 4.0], vec![2.0, f64::NAN], vec![3.0, 4.0]],
        )
        .unwrap()
    }

    #[test]
    fn uses_sample_standard_deviation() {
        let (mean, std) = mean_and_std(&[2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0]);
        assert_approx_eq!(mean, 5.0);
        assert_approx_eq!(std, (32.0f64 / 7.0).sqrt());
    }

    #[test]
    fn short_columns_have_undefined_spread() {
        let (mean, std) = mean_and_std(&[1.5]);
        assert_eq!(mean, 1.5);
        assert!(std.is_nan());
        let (mean, std) = mean_and_std(&[]);
        assert!(mean.is_nan() && std.is_nan());
    }

    #[test]
    fn skips_missing_values() {
        let summary = rest_state_statistics(&table());
        assert_eq!(summary.mean(), vec![2.0, 4.0]);
        assert_approx_eq!(summary.std()[0], 1.0);
        assert_approx_eq!(summary.std()[1], 0.0);
        assert_eq!(summary.column("accX").map(|c| c[2]), Some(3.0));
    }

    #[test]
    fn stats_file_sits_next_to_input() {
        assert_eq!(
            stats_path(Path::new("data/rest/imu.csv")),
            PathBuf::from("data/rest/imu_stats.csv")
        );
    }

    #[test]
    fn writes_semicolon_decimal_comma_file() {
        let dir = tempdir().unwrap();
        let input = dir.path().join("rest.csv");
        let table = TimeSeriesTable::from_rows(
            vec!["a".to_string(), "b".to_string()],
            &[vec![1.0, 0.5], vec![2.0, 0.5]],
        )
        .unwrap();

        let (_, path) = persist_statistics(&input, &table, &CsvFormat::STATISTICS).unwrap();
        assert_eq!(path, dir.path().join("rest_stats.csv"));
        let text = fs::read_to_string(&path).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], ";a;b");
        assert_eq!(lines[1], "mean;1,5;0,5");
        assert!(lines[2].starts_with("std;0,70710678"));
        assert!(lines[2].ends_with(";0"));
        assert!(lines[3].starts_with("mean+std;2,20710678"));
    }
}
