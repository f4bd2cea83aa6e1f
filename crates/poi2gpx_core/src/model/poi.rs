//! Reconciled point-of-interest record.
//!
//! # Responsibility
//! - Hold the fully defaulted values written into one GPX waypoint.
//! - Preserve where each coordinate came from.
//!
//! # Invariants
//! - After reconciliation `title` and `comment` are non-empty.
//! - Every text field is present; absent source values are empty strings.

use serde_json::Number;
use std::fmt::{Display, Formatter};

/// One coordinate axis value.
///
/// Source coordinates stay JSON numbers, while positions recovered from a
/// maps link stay the exact captured text. Both render as GPX attribute text.
#[derive(Debug, Clone, PartialEq)]
pub enum Coordinate {
    /// Taken from the GeoJSON `coordinates` array.
    Number(Number),
    /// Raw text captured from a maps link query.
    Captured(String),
}

impl Coordinate {
    /// Returns the integer zero coordinate used for missing axes.
    pub fn zero() -> Self {
        Self::Number(Number::from(0))
    }

    /// Returns whether this is a source number equal to zero (`-0.0` included).
    ///
    /// Captured text only exists after a position was recovered, so it never
    /// counts as zero.
    pub fn is_zero(&self) -> bool {
        match self {
            Self::Number(value) => value.as_f64() == Some(0.0),
            Self::Captured(_) => false,
        }
    }
}

impl Display for Coordinate {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Number(value) => write!(f, "{value}"),
            Self::Captured(text) => f.write_str(text),
        }
    }
}

impl From<Number> for Coordinate {
    fn from(value: Number) -> Self {
        Self::Number(value)
    }
}

/// Record produced for each source feature and rendered as one `wpt`.
#[derive(Debug, Clone, PartialEq)]
pub struct NormalizedPoi {
    /// Rendered as `name`.
    pub title: String,
    /// Rendered as `cmt`.
    pub comment: String,
    /// Rendered as `time`, verbatim from the source.
    pub date: String,
    pub longitude: Coordinate,
    pub latitude: Coordinate,
    /// The source maps URL, rendered as `link`.
    pub link: String,
    /// Rendered as `desc`.
    pub address: String,
}

impl NormalizedPoi {
    /// Returns whether both axes are exactly zero, i.e. no real position.
    pub fn lacks_position(&self) -> bool {
        self.longitude.is_zero() && self.latitude.is_zero()
    }
}
