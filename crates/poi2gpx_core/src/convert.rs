//! File-level conversion pipeline.
//!
//! # Responsibility
//! - Read the source document, reconcile all features and render GPX.
//! - Map every failure into one fatal [`ConvertError`].
//!
//! # Invariants
//! - The output is written once, only after the whole document converted.
//! - On failure the output path is left untouched.

use crate::gpx::{write_gpx, GpxError};
use crate::model::feature::{parse_source, SourceError};
use crate::reconcile::{reconcile_all_with_summary, ReconcileError, ReconcileSummary};
use log::{error, info};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::io;
use std::path::{Path, PathBuf};

pub type ConvertResult<T> = Result<T, ConvertError>;

/// Fatal conversion error.
#[derive(Debug)]
pub enum ConvertError {
    InputNotFound {
        path: PathBuf,
    },
    InputUnreadable {
        path: PathBuf,
        source: io::Error,
    },
    MalformedSource(SourceError),
    /// `index` is the zero-based position in `features`.
    MissingRequiredField {
        index: usize,
        field: &'static str,
    },
    Serialize(GpxError),
    OutputUnwritable {
        path: PathBuf,
        source: io::Error,
    },
}

impl Display for ConvertError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InputNotFound { path } => {
                write!(f, "input file not found: {}", path.display())
            }
            Self::InputUnreadable { path, source } => {
                write!(f, "failed to read input `{}`: {source}", path.display())
            }
            Self::MalformedSource(err) => write!(f, "{err}"),
            Self::MissingRequiredField { index, field } => {
                write!(f, "feature #{index} is missing required field `{field}`")
            }
            Self::Serialize(err) => write!(f, "{err}"),
            Self::OutputUnwritable { path, source } => {
                write!(f, "failed to write output `{}`: {source}", path.display())
            }
        }
    }
}

impl Error for ConvertError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::InputNotFound { .. } => None,
            Self::InputUnreadable { source, .. } => Some(source),
            Self::MalformedSource(err) => Some(err),
            Self::MissingRequiredField { .. } => None,
            Self::Serialize(err) => Some(err),
            Self::OutputUnwritable { source, .. } => Some(source),
        }
    }
}

impl From<SourceError> for ConvertError {
    fn from(value: SourceError) -> Self {
        Self::MalformedSource(value)
    }
}

impl From<GpxError> for ConvertError {
    fn from(value: GpxError) -> Self {
        Self::Serialize(value)
    }
}

impl From<ReconcileError> for ConvertError {
    fn from(value: ReconcileError) -> Self {
        match value {
            ReconcileError::MissingRequiredField { index, field } => Self::MissingRequiredField {
                index: index.unwrap_or_default(),
                field,
            },
        }
    }
}

impl ConvertError {
    /// Stable snake_case label used in log events.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::InputNotFound { .. } => "input_not_found",
            Self::InputUnreadable { .. } => "input_unreadable",
            Self::MalformedSource(_) => "malformed_source",
            Self::MissingRequiredField { .. } => "missing_required_field",
            Self::Serialize(_) => "serialize",
            Self::OutputUnwritable { .. } => "output_unwritable",
        }
    }
}

/// Converts an in-memory source document into GPX bytes.
///
/// # Errors
/// - [`ConvertError::MalformedSource`] for undecodable input.
/// - [`ConvertError::MissingRequiredField`] for a feature without `date`.
pub fn convert_document(source: &[u8]) -> ConvertResult<(Vec<u8>, ReconcileSummary)> {
    let document = parse_source(source)?;
    let (pois, summary) = reconcile_all_with_summary(&document)?;
    let gpx = write_gpx(&pois)?;
    Ok((gpx, summary))
}

/// Converts `input` (GeoJSON) into `output` (GPX).
///
/// The output file is created or replaced only when conversion succeeded.
pub fn convert_file(input: &Path, output: &Path) -> ConvertResult<ReconcileSummary> {
    info!(
        "event=convert_start module=convert status=ok input={} output={}",
        input.display(),
        output.display()
    );

    let result = read_input(input)
        .and_then(|source| convert_document(&source))
        .and_then(|(gpx, summary)| {
            std::fs::write(output, gpx).map_err(|source| ConvertError::OutputUnwritable {
                path: output.to_path_buf(),
                source,
            })?;
            Ok(summary)
        });

    match &result {
        Ok(summary) => info!(
            "event=convert_done module=convert status=ok features={} comments_defaulted={} starred_places={} coordinates_recovered={} link_only_comments={}",
            summary.features,
            summary.comments_defaulted,
            summary.starred_places_titled,
            summary.coordinates_recovered,
            summary.link_only_comments
        ),
        Err(err) => error!(
            "event=convert_done module=convert status=error kind={}",
            err.kind()
        ),
    }
    result
}

fn read_input(path: &Path) -> ConvertResult<Vec<u8>> {
    std::fs::read(path).map_err(|source| {
        if source.kind() == io::ErrorKind::NotFound {
            ConvertError::InputNotFound {
                path: path.to_path_buf(),
            }
        } else {
            ConvertError::InputUnreadable {
                path: path.to_path_buf(),
                source,
            }
        }
    })
}

#[cfg(test)]
mod tests {
    use super::{convert_document, ConvertError};

    #[test]
    fn missing_date_reports_feature_index() {
        let source = br#"{"features": [
            {"properties": {"date": "a"}},
            {"properties": {"Comment": "no date"}}
        ]}"#;
        let err = convert_document(source).unwrap_err();
        assert!(matches!(
            err,
            ConvertError::MissingRequiredField {
                index: 1,
                field: "date"
            }
        ));
        assert_eq!(err.kind(), "missing_required_field");
    }

    #[test]
    fn malformed_json_is_source_error() {
        let err = convert_document(b"[1, 2").unwrap_err();
        assert!(matches!(err, ConvertError::MalformedSource(_)));
    }
}
