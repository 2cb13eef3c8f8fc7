//! Column-named time series loaded from CSV files.
//!
//! A [TimeSeriesTable] holds one numeric column per CSV field with the row index as the implicit time
//! step. Ingestion accepts a configurable field delimiter and decimal separator ([CsvFormat]); cells that
//! are empty or not numeric (timestamps, labels) are stored as `NaN` so the column layout of the file is
//! preserved.

use log::{debug, info};
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Field delimiter and decimal separator of a CSV file.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CsvFormat {
    pub delimiter: char,
    pub decimal: char,
}

impl Default for CsvFormat {
    fn default() -> Self {
        CsvFormat {
            delimiter: ',',
            decimal: '.',
        }
    }
}

/// An unusable [CsvFormat].
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("unsupported CSV format: {0}")]
pub struct FormatError(String);

impl CsvFormat {
    /// Format used for derived statistics files: `;` between fields, `,` as decimal separator.
    pub const STATISTICS: CsvFormat = CsvFormat {
        delimiter: ';',
        decimal: ',',
    };

    pub fn new(delimiter: char, decimal: char) -> Self {
        CsvFormat { delimiter, decimal }
    }

    /// The delimiter as the single byte the `csv` crate needs.
    pub fn delimiter_byte(&self) -> Result<u8, FormatError> {
        if self.delimiter == self.decimal {
            return Err(FormatError(format!(
                "delimiter and decimal separator are both '{}'",
                self.delimiter
            )));
        }
        if !self.delimiter.is_ascii() {
            return Err(FormatError(format!(
                "delimiter '{}' is not an ASCII character",
                self.delimiter
            )));
        }
        Ok(self.delimiter as u8)
    }

    /// Parse a cell, mapping empty or non-numeric content to `NaN`.
    pub fn parse_cell(&self, cell: &str) -> f64 {
        let cell = cell.trim();
        if cell.is_empty() {
            return f64::NAN;
        }
        let parsed = if self.decimal == '.' {
            cell.parse::<f64>()
        } else {
            cell.replace(self.decimal, ".").parse::<f64>()
        };
        parsed.unwrap_or(f64::NAN)
    }

    /// Format a number with this format's decimal separator. `NaN` becomes an empty field.
    pub fn format_number(&self, value: f64) -> String {
        if value.is_nan() {
            return String::new();
        }
        let text = value.to_string();
        if self.decimal == '.' {
            text
        } else {
            text.replace('.', &self.decimal.to_string())
        }
    }
}

/// Reasons a CSV file could not be turned into a [TimeSeriesTable].
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("could not open {}: {source}", path.display())]
    Open {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error("malformed CSV in {}: {source}", path.display())]
    Malformed {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
    #[error(transparent)]
    Format(#[from] FormatError),
    #[error("row {row} has {found} values, expected {expected}")]
    Shape {
        row: usize,
        found: usize,
        expected: usize,
    },
}

/// Named numeric columns over an implicit time-step index.
#[derive(Clone, Debug, PartialEq)]
pub struct TimeSeriesTable {
    columns: Vec<String>,
    /// Rows are time steps, columns follow `columns`.
    data: DMatrix<f64>,
}

impl Default for TimeSeriesTable {
    fn default() -> Self {
        TimeSeriesTable::empty()
    }
}

impl TimeSeriesTable {
    /// A table with no columns and no rows.
    pub fn empty() -> Self {
        TimeSeriesTable {
            columns: Vec::new(),
            data: DMatrix::zeros(0, 0),
        }
    }

    /// Build a table from row-major values.
    pub fn from_rows(columns: Vec<String>, rows: &[Vec<f64>]) -> Result<Self, IngestError> {
        let mut values = Vec::with_capacity(rows.len() * columns.len());
        for (row, record) in rows.iter().enumerate() {
            if record.len() != columns.len() {
                return Err(IngestError::Shape {
                    row,
                    found: record.len(),
                    expected: columns.len(),
                });
            }
            values.extend_from_slice(record);
        }
        let data = DMatrix::from_row_slice(rows.len(), columns.len(), &values);
        Ok(TimeSeriesTable { columns, data })
    }

    /// Wrap a matrix that has one column per name. Callers inside the crate derive `data` from
    /// another table, so the shapes agree.
    pub(crate) fn from_matrix(columns: Vec<String>, data: DMatrix<f64>) -> Self {
        debug_assert_eq!(columns.len(), data.ncols());
        TimeSeriesTable { columns, data }
    }

    /// Read a CSV file with a header row.
    ///
    /// Fields are trimmed. Cells that are empty or not numeric under `format` become `NaN`, so every
    /// header keeps its column.
    ///
    /// # Arguments
    /// * `path` - Path to the CSV file to read.
    /// * `format` - Field delimiter and decimal separator of the file.
    ///
    /// # Returns
    /// * `Ok(TimeSeriesTable)` with one column per header field.
    /// * `Err(IngestError)` if the file cannot be opened, a record is malformed or `format` is
    ///   unusable.
    ///
    /// # Example
    ///
    /// ```no_run
    /// use navfusion::table::{CsvFormat, TimeSeriesTable};
    ///
    /// let table = TimeSeriesTable::from_csv("data/tram/yaw/output.csv", &CsvFormat::default())
    ///     .expect("failed to read engine output");
    /// println!("{} rows, columns: {:?}", table.n_rows(), table.columns());
    /// ```
    pub fn from_csv<P: AsRef<Path>>(path: P, format: &CsvFormat) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(format.delimiter_byte()?)
            .trim(csv::Trim::All)
            .from_path(path)
            .map_err(|source| IngestError::Open {
                path: path.to_path_buf(),
                source,
            })?;
        let malformed = |source| IngestError::Malformed {
            path: path.to_path_buf(),
            source,
        };
        let columns: Vec<String> = reader
            .headers()
            .map_err(malformed)?
            .iter()
            .map(str::to_string)
            .collect();

        let mut values = Vec::new();
        let mut n_rows = 0;
        for record in reader.records() {
            let record = record.map_err(malformed)?;
            values.extend(record.iter().map(|cell| format.parse_cell(cell)));
            n_rows += 1;
        }
        debug!("Parsed {} cells from {}", values.len(), path.display());
        let data = DMatrix::from_row_slice(n_rows, columns.len(), &values);
        info!(
            "Read {} rows x {} columns from {}",
            n_rows,
            columns.len(),
            path.display()
        );
        Ok(TimeSeriesTable { columns, data })
    }

    /// Column names in file order.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn data(&self) -> &DMatrix<f64> {
        &self.data
    }

    pub fn n_rows(&self) -> usize {
        self.data.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    /// True if the table has no columns.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Position of the first column called `name`.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Values of the column called `name`, in time order.
    pub fn column(&self, name: &str) -> Option<Vec<f64>> {
        self.column_index(name)
            .map(|j| self.data.column(j).iter().copied().collect())
    }

    pub fn row(&self, index: usize) -> Option<Vec<f64>> {
        (index < self.n_rows()).then(|| self.data.row(index).iter().copied().collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn parses_cells_with_decimal_comma() {
        let format = CsvFormat::STATISTICS;
        assert_eq!(format.parse_cell("1,5"), 1.5);
        assert_eq!(format.parse_cell(" -0,25 "), -0.25);
        assert!(format.parse_cell("").is_nan());
        assert!(format.parse_cell("2024-01-01 10:00:00").is_nan());
    }

    #[test]
    fn formats_numbers_with_decimal_comma() {
        let format = CsvFormat::STATISTICS;
        assert_eq!(format.format_number(1.5), "1,5");
        assert_eq!(format.format_number(2.0), "2");
        assert_eq!(format.format_number(f64::NAN), "");
        assert_eq!(CsvFormat::default().format_number(0.25), "0.25");
    }

    #[test]
    fn ambiguous_format_is_rejected() {
        assert!(CsvFormat::new(',', ',').delimiter_byte().is_err());
        assert!(CsvFormat::new('§', '.').delimiter_byte().is_err());
        assert_eq!(CsvFormat::default().delimiter_byte(), Ok(b','));
    }

    #[test]
    fn matrix_and_row_constructors_agree() {
        let names = vec!["ax".to_string(), "ay".to_string()];
        let rows = [vec![1.0, 2.0], vec![3.0, 4.0], vec![5.0, 6.0]];
        let from_rows = TimeSeriesTable::from_rows(names.clone(), &rows).unwrap();
        let matrix = DMatrix::from_row_slice(3, 2, &[1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
        assert_eq!(TimeSeriesTable::from_matrix(names, matrix), from_rows);
    }

    #[test]
    fn reads_csv_with_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.csv");
        fs::write(&path, "time,accX,accY\n0,0.5,1.0\n1,0.25,\n2,x,3.5\n").unwrap();

        let table = TimeSeriesTable::from_csv(&path, &CsvFormat::default()).unwrap();
        assert_eq!(table.columns(), &["time", "accX", "accY"]);
        assert_eq!(table.n_rows(), 3);
        assert_eq!(table.column("time").unwrap(), vec![0.0, 1.0, 2.0]);
        let acc_y = table.column("accY").unwrap();
        assert_eq!(acc_y[0], 1.0);
        assert!(acc_y[1].is_nan());
        assert!(table.column("accX").unwrap()[2].is_nan());
        assert_eq!(table.row(0).unwrap(), vec![0.0, 0.5, 1.0]);
        assert!(table.row(3).is_none());
    }

    #[test]
    fn reads_semicolon_separated_csv() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("input.csv");
        fs::write(&path, "a;b\n1,5;2\n3;4,25\n").unwrap();

        let table = TimeSeriesTable::from_csv(&path, &CsvFormat::STATISTICS).unwrap();
        assert_eq!(table.column("a").unwrap(), vec![1.5, 3.0]);
        assert_eq!(table.column("b").unwrap(), vec![2.0, 4.25]);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let result = TimeSeriesTable::from_csv("/nonexistent/input.csv", &CsvFormat::default());
        assert!(matches!(result, Err(IngestError::Open { .. })));
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ragged.csv");
        fs::write(&path, "a,b\n1,2\n3\n").unwrap();

        let result = TimeSeriesTable::from_csv(&path, &CsvFormat::default());
        assert!(matches!(result, Err(IngestError::Malformed { .. })));
    }

    #[test]
    fn empty_file_gives_empty_table() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.csv");
        fs::write(&path, "").unwrap();

        let table = TimeSeriesTable::from_csv(&path, &CsvFormat::default()).unwrap();
        assert!(table.is_empty());
        assert_eq!(table.n_rows(), 0);
    }

    #[test]
    fn from_rows_checks_shape() {
        let columns = vec!["a".to_string(), "b".to_string()];
        assert!(TimeSeriesTable::from_rows(columns.clone(), &[vec![1.0, 2.0]]).is_ok());
        assert!(matches!(
            TimeSeriesTable::from_rows(columns, &[vec![1.0]]),
            Err(IngestError::Shape { row: 0, .. })
        ));
    }
}
