//! Core conversion logic for poi2gpx.
//! This crate is the single source of truth for the GeoJSON-to-GPX mapping.

pub mod convert;
pub mod gpx;
pub mod logging;
pub mod model;
pub mod reconcile;

pub use convert::{convert_document, convert_file, ConvertError, ConvertResult};
pub use gpx::{write_gpx, GpxError, GpxResult};
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::feature::{parse_source, SourceDocument, SourceError, SourceFeature};
pub use model::poi::{Coordinate, NormalizedPoi};
pub use reconcile::{
    reconcile, reconcile_all, reconcile_all_with_summary, Adjustment, ReconcileError,
    ReconcileResult, ReconcileSummary, Reconciled,
};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
