//! Inspection and comparison charts over engine input and output tables.
//!
//! Charts are plain data ([Chart], [Series]) so they can be built and checked without touching the
//! file system; [plotting] turns them into SVG files. Two chart producers are provided:
//!
//! - [inspect_columns]: one chart per column, x = row index, y = value
//! - [compare]: the reference (`INS_<L>`) and fused (`FUS_<L>`) estimates of one quantity on a shared
//!   chart. Both columns must exist.
//!
//! Rest-state statistics live in [stats].

pub mod plotting;
pub mod stats;

use crate::table::TimeSeriesTable;
use log::debug;
use thiserror::Error;

/// Column prefix of the engine's inertial-only (reference) estimates.
pub const REFERENCE_PREFIX: &str = "INS_";
/// Column prefix of the engine's fused estimates.
pub const FUSED_PREFIX: &str = "FUS_";
pub const REFERENCE_LABEL: &str = "reference";
pub const FUSED_LABEL: &str = "fused";
/// Quantities the engine writes both estimates for.
pub const DEFAULT_COMPARE_LABELS: [&str; 4] = ["ROLL", "PITCH", "YAW", "V"];

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum AnalysisError {
    #[error("column '{column}' not found in table")]
    MissingColumn { column: String },
}

/// One line on a chart.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub label: String,
    pub points: Vec<(f64, f64)>,
}

impl Series {
    /// A series indexed by time step.
    pub fn from_values(label: &str, values: &[f64]) -> Self {
        Series {
            label: label.to_string(),
            points: values
                .iter()
                .enumerate()
                .map(|(i, &v)| (i as f64, v))
                .collect(),
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Chart {
    pub title: String,
    pub series: Vec<Series>,
    pub grid: bool,
    pub legend: bool,
}

/// An ordered set of charts.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlotCollection {
    charts: Vec<Chart>,
}

impl PlotCollection {
    pub fn new() -> Self {
        PlotCollection::default()
    }

    /// Append a chart; render order follows push order.
    pub fn push(&mut self, chart: Chart) {
        self.charts.push(chart);
    }

    pub fn len(&self) -> usize {
        self.charts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.charts.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Chart> {
        self.charts.iter()
    }

    pub fn get(&self, title: &str) -> Option<&Chart> {
        self.charts.iter().find(|c| c.title == title)
    }
}

impl Extend<Chart> for PlotCollection {
    fn extend<I: IntoIterator<Item = Chart>>(&mut self, iter: I) {
        self.charts.extend(iter);
    }
}

/// One chart per column. A table without columns yields an empty collection.
pub fn inspect_columns(table: &TimeSeriesTable) -> PlotCollection {
    let mut collection = PlotCollection::new();
    for (j, name) in table.columns().iter().enumerate() {
        let values: Vec<f64> = table.data().column(j).iter().copied().collect();
        collection.push(Chart {
            title: name.clone(),
            series: vec![Series::from_values(name, &values)],
            grid: true,
            legend: false,
        });
    }
    debug!("Built {} inspection charts", collection.len());
    collection
}

/// Reference-vs-fused chart for quantity `label`.
///
/// # Arguments
/// * `table` - Engine output holding `INS_<label>` and `FUS_<label>` columns.
/// * `label` - Quantity name without prefix, e.g. `YAW`.
///
/// # Returns
/// * `Ok(Chart)` titled `label`, with the reference and fused series, a grid and a legend.
/// * `Err(AnalysisError::MissingColumn)` naming the first of the two columns that is missing.
pub fn compare(table: &TimeSeriesTable, label: &str) -> Result<Chart, AnalysisError> {
    let lookup = |column: String| {
        table
            .column(&column)
            .ok_or(AnalysisError::MissingColumn { column })
    };
    let reference = lookup(format!("{REFERENCE_PREFIX}{label}"))?;
    let fused = lookup(format!("{FUSED_PREFIX}{label}"))?;
    Ok(Chart {
        title: label.to_string(),
        series: vec![
            Series::from_values(REFERENCE_LABEL, &reference),
            Series::from_values(FUSED_LABEL, &fused),
        ],
        grid: true,
        legend: true,
    })
}

/// Comparison charts for every label, failing on the first missing pair.
pub fn compare_all<S: AsRef<str>>(
    table: &TimeSeriesTable,
    labels: &[S],
) -> Result<PlotCollection, AnalysisError> {
    let mut collection = PlotCollection::new();
    for label in labels {
        collection.push(compare(table, label.as_ref())?);
    }
    Ok(collection)
}
