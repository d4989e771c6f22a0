//! Reader for the barcode files written by GUDHI's persistence tools.
//!
//! A barcode file holds one topological feature per row:
//!
//! ```text
//! 2  0 0 2.4379
//! 2  1 0 inf
//! ```
//!
//! The first column (the coefficient field or a feature id, depending on the
//! tool) is ignored, followed by the homology dimension, the birth and the
//! death of the feature. Features that never die carry `inf` as death.

mod error;
mod float;
mod table;

pub use error::BarcodeError;
pub use table::{BarcodeTable, DimensionSummary, Feature, LifeLine};
