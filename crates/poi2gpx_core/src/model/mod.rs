//! Input and output record shapes for the conversion.
//!
//! # Responsibility
//! - Describe the subset of the saved-places GeoJSON export that is read.
//! - Define the reconciled point-of-interest record handed to GPX output.
//!
//! # Invariants
//! - Source shapes are immutable once parsed.
//! - Absent optional source values surface as `None`, never as panics.

pub mod feature;
pub mod poi;
