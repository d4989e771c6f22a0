//! Runs GUDHI's `rips_distance_matrix_persistence` as a batch job.
//!
//! [`parameters`] validates the tool options and renders the command line,
//! [`staging`] decides how the distance matrix reaches the working directory,
//! [`calculation`] assembles the submission and [`parser`] reads the
//! retrieved barcode back with the [`barcode`] crate.

pub mod calculation;
pub mod error;
pub mod parameters;
pub mod parser;
pub mod report;
pub mod runner;
pub mod serde_default;
pub mod staging;
pub mod utils;

pub use barcode;
