//! # Metabolism CLI
//!
//! Command-line host for the simulation engine: option parsing, scenario
//! loading, output file management, and the drive loop with progress
//! reporting. The engine itself knows nothing about any of this; it is
//! driven one `iterate()` at a time.

pub mod options;
pub mod report;
pub mod scenario;

pub use options::Options;
