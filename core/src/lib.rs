//! Configuration and analysis harness for an external GPS/INS sensor-fusion engine
//!
//! The fusion engine itself is an opaque executable configured entirely from its command line. This crate
//! builds that command line from typed parameters, launches the engine, and examines the CSV files it reads
//! and writes. It does not perform any navigation computation of its own.
//!
//! A run goes through three stages:
//!
//! 1. Configuration: a [config::ConfigBuilder] collects `(ParameterKey, ParameterValue)` entries in
//!    insertion order and validates them into an immutable [config::ConfigurationModel]. The Kalman filter
//!    noise standard deviations travel separately as a [config::NoiseGroup].
//! 2. Synthesis and execution: [command::synthesize] renders the model into an
//!    [command::InvocationString], which a [runner::EngineRunner] executes to completion.
//!    [runner::EngineArtifacts] locates the files the engine writes.
//! 3. Analysis: [table::TimeSeriesTable] loads CSV files, [analysis] builds per-column inspection charts
//!    and reference-vs-fused comparison charts, and [analysis::stats] summarizes rest-state recordings
//!    (sensor bias estimation for the `acc_in_rest` / `gyro_in_rest` parameters).
//!
//! Run files tying all of this together are described by [settings::RunConfig].
//!
//! ## Crate overview
//!
//! - [config]: parameter keys, value kinds, the builder and the validated model.
//! - [command]: rendering a model into the engine's command line.
//! - [runner]: launching the engine, locating its output, reading its index listing.
//! - [table]: CSV ingestion with configurable delimiter and decimal separator.
//! - [analysis]: inspection and comparison charts, SVG rendering, rest-state statistics.
//! - [settings]: TOML/JSON/YAML run files.
//!
//! ## Engine output
//!
//! The engine writes `output.csv` into its output directory. For each estimated quantity `L` (`LAT`, `LON`,
//! `V`, `ROLL`, `PITCH`, `YAW`) it writes the inertial-only estimate as `INS_L` and the GPS-fused estimate as
//! `FUS_L`; [analysis::compare] pairs these columns. It also writes KML tracks of the GPS, inertial and fused
//! trajectories next to the CSV.
pub mod analysis;
pub mod command;
pub mod config;
pub mod runner;
pub mod settings;
pub mod table;
