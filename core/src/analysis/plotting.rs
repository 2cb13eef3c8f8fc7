//! SVG rendering of [Chart]s with `plotters`.

use super::{Chart, PlotCollection};
use log::info;
use plotters::prelude::*;
use std::collections::HashSet;
use std::error::Error;
use std::fs;
use std::ops::Range;
use std::path::{Path, PathBuf};

/// Series colors, cycled.
const PALETTE: [RGBColor; 4] = [RED, BLUE, GREEN, MAGENTA];

/// Draw `chart` into an SVG file at `output_path`.
///
/// Non-finite points (missing samples) are left out of the lines.
pub fn render_chart(chart: &Chart, output_path: &Path) -> Result<(), Box<dyn Error>> {
    let root = SVGBackend::new(output_path, (1200, 400)).into_drawing_area();
    root.fill(&WHITE)?;

    let finite: Vec<Vec<(f64, f64)>> = chart
        .series
        .iter()
        .map(|s| {
            s.points
                .iter()
                .copied()
                .filter(|(x, y)| x.is_finite() && y.is_finite())
                .collect()
        })
        .collect();
    let x_range = axis_range(finite.iter().flatten().map(|p| p.0));
    let y_range = axis_range(finite.iter().flatten().map(|p| p.1));

    let mut plot = ChartBuilder::on(&root)
        .caption(&chart.title, ("sans-serif", 16).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(x_range, y_range)?;

    let mut mesh = plot.configure_mesh();
    mesh.x_desc("Time step");
    if !chart.grid {
        mesh.disable_mesh();
    }
    mesh.draw()?;

    for (i, (series, points)) in chart.series.iter().zip(finite).enumerate() {
        let color = PALETTE[i % PALETTE.len()];
        plot.draw_series(LineSeries::new(points, &color))?
            .label(series.label.as_str())
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color));
    }

    if chart.legend {
        plot.configure_series_labels()
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .draw()?;
    }

    root.present()?;
    Ok(())
}

/// Render every chart of `collection` into `dir` as `<title>.svg`.
///
/// Titles that map to the same file name (`GPS lat` and `GPS_lat`, or a repeated CSV header) get a
/// numeric suffix, so every chart lands in its own file.
///
/// # Arguments
/// * `collection` - The charts to render, in order.
/// * `dir` - Target directory. Created if it does not exist.
///
/// # Returns
/// * `Ok(Vec<PathBuf>)` - The written paths, one per chart, in collection order.
/// * `Err` if the directory cannot be created or a chart cannot be drawn.
pub fn render_collection(
    collection: &PlotCollection,
    dir: &Path,
) -> Result<Vec<PathBuf>, Box<dyn Error>> {
    fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(collection.len());
    let mut taken = HashSet::with_capacity(collection.len());
    for chart in collection.iter() {
        let path = dir.join(format!("{}.svg", unique_stem(&chart.title, &mut taken)));
        render_chart(chart, &path)?;
        written.push(path);
    }
    info!("Wrote {} charts to {}", written.len(), dir.display());
    Ok(written)
}

/// Column names can carry characters that are not valid in file names.
fn file_stem(title: &str) -> String {
    let stem: String = title
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || c == '-' || c == '_' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if stem.is_empty() {
        "chart".to_string()
    } else {
        stem
    }
}

/// Compared case-insensitively, as on Windows and macOS file systems.
fn unique_stem(title: &str, taken: &mut HashSet<String>) -> String {
    let base = file_stem(title);
    let mut stem = base.clone();
    let mut n = 1;
    while !taken.insert(stem.to_ascii_lowercase()) {
        n += 1;
        stem = format!("{base}_{n}");
    }
    stem
}

fn axis_range(values: impl Iterator<Item = f64>) -> Range<f64> {
    let (min, max) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !min.is_finite() || !max.is_finite() {
        0.0..1.0
    } else if min == max {
        (min - 1.0)..(max + 1.0)
    } else {
        let pad = (max - min) * 0.05;
        (min - pad)..(max + pad)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::Series;
    use tempfile::tempdir;

    fn chart(title: &str, legend: bool) -> Chart {
        Chart {
            title: title.to_string(),
            series: vec![
                Series::from_values("reference", &[0.0, 1.0, f64::NAN, 3.0]),
                Series::from_values("fused", &[0.5, 1.5, 2.5, 3.5]),
            ],
            grid: true,
            legend,
        }
    }

    #[test]
    fn axis_range_handles_degenerate_input() {
        assert_eq!(axis_range(std::iter::empty()), 0.0..1.0);
        assert_eq!(axis_range([2.0, 2.0].into_iter()), 1.0..3.0);
        let range = axis_range([0.0, 10.0].into_iter());
        assert!(range.start < 0.0 && range.end > 10.0);
    }

    #[test]
    fn file_stem_replaces_unsafe_characters() {
        assert_eq!(file_stem("INS_YAW"), "INS_YAW");
        assert_eq!(file_stem("acc X/s"), "acc_X_s");
        assert_eq!(file_stem(""), "chart");
    }

    #[test]
    fn renders_svg_file() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("yaw.svg");
        render_chart(&chart("YAW", true), &path).unwrap();
        let svg = fs::read_to_string(&path).unwrap();
        assert!(svg.contains("<svg"));
        assert!(svg.contains("YAW"));
    }

    #[test]
    fn renders_collection_into_directory() {
        let dir = tempdir().unwrap();
        let mut collection = PlotCollection::new();
        collection.push(chart("ROLL", true));
        collection.push(chart("accX", false));

        let target = dir.path().join("plots");
        let written = render_collection(&collection, &target).unwrap();
        assert_eq!(written, vec![target.join("ROLL.svg"), target.join("accX.svg")]);
        assert!(written.iter().all(|p| p.exists()));
    }

    #[test]
    fn colliding_titles_get_separate_files() {
        let dir = tempdir().unwrap();
        let mut collection = PlotCollection::new();
        collection.push(chart("GPS lat", false));
        collection.push(chart("GPS_lat", false));
        collection.push(chart("gps_LAT", false));

        let written = render_collection(&collection, dir.path()).unwrap();
        assert_eq!(
            written,
            vec![
                dir.path().join("GPS_lat.svg"),
                dir.path().join("GPS_lat_2.svg"),
                dir.path().join("gps_LAT_3.svg"),
            ]
        );
        assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 3);
    }

    #[test]
    fn unique_stem_skips_taken_suffixes() {
        let mut taken = HashSet::new();
        taken.insert("yaw_2".to_string());
        assert_eq!(unique_stem("YAW", &mut taken), "YAW");
        assert_eq!(unique_stem("yaw", &mut taken), "yaw_3");
    }
}
