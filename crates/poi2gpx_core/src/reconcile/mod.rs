//! Record reconciliation: source feature to normalized point of interest.
//!
//! # Responsibility
//! - Extract text fields with empty-string defaults.
//! - Apply the ordered fallback rules in [`rules`].
//! - Reject features missing the required `date`.
//!
//! # Invariants
//! - Output order equals input order; one record per feature.
//! - Every reconciled record has non-empty `title` and `comment`.
//! - Reconciliation is pure apart from debug logging.

mod rules;

pub use rules::{link_anchor, Adjustment, STARRED_PLACE_TITLE};

use crate::model::feature::{SourceDocument, SourceFeature};
use crate::model::poi::{Coordinate, NormalizedPoi};
use log::debug;
use rules::FALLBACK_RULES;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Name of the only required feature property.
pub const DATE_FIELD: &str = "date";

pub type ReconcileResult<T> = Result<T, ReconcileError>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReconcileError {
    /// Feature lacks a required property. `index` is set by batch callers.
    MissingRequiredField {
        index: Option<usize>,
        field: &'static str,
    },
}

impl ReconcileError {
    fn at_feature(self, position: usize) -> Self {
        match self {
            Self::MissingRequiredField { field, .. } => Self::MissingRequiredField {
                index: Some(position),
                field,
            },
        }
    }
}

impl Display for ReconcileError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MissingRequiredField {
                index: Some(index),
                field,
            } => write!(f, "feature #{index} is missing required field `{field}`"),
            Self::MissingRequiredField { index: None, field } => {
                write!(f, "feature is missing required field `{field}`")
            }
        }
    }
}

impl Error for ReconcileError {}

/// A reconciled record plus the fallback rules that changed it.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciled {
    pub poi: NormalizedPoi,
    /// In rule order.
    pub adjustments: Vec<Adjustment>,
}

impl Reconciled {
    pub fn into_poi(self) -> NormalizedPoi {
        self.poi
    }
}

/// Per-run counts of reconciled records and applied fallbacks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ReconcileSummary {
    pub features: usize,
    pub comments_defaulted: usize,
    pub starred_places_titled: usize,
    pub coordinates_recovered: usize,
    pub link_only_comments: usize,
}

impl ReconcileSummary {
    fn record(&mut self, reconciled: &Reconciled) {
        self.features += 1;
        for adjustment in &reconciled.adjustments {
            match adjustment {
                Adjustment::CommentDefaulted => self.comments_defaulted += 1,
                Adjustment::StarredPlaceTitled => self.starred_places_titled += 1,
                Adjustment::CoordinatesRecovered => self.coordinates_recovered += 1,
                Adjustment::LinkOnlyComment => self.link_only_comments += 1,
            }
        }
    }
}

/// Reconciles one source feature.
///
/// # Errors
/// - Returns [`ReconcileError::MissingRequiredField`] when `date` is absent.
pub fn reconcile(feature: &SourceFeature) -> ReconcileResult<Reconciled> {
    let title = feature.location_name().unwrap_or_default().to_string();
    let comment = feature.comment().unwrap_or_default().to_string();
    let link = feature.google_maps_url().unwrap_or_default().to_string();
    let (longitude, latitude) = feature.coordinates();

    let mut poi = NormalizedPoi {
        title,
        comment,
        date: String::new(),
        longitude: Coordinate::from(longitude),
        latitude: Coordinate::from(latitude),
        link,
        address: String::new(),
    };

    let adjustments = FALLBACK_RULES
        .iter()
        .filter_map(|rule| rule(&mut poi))
        .collect::<Vec<_>>();

    poi.address = feature.address().unwrap_or_default().to_string();
    poi.date = feature
        .date()
        .ok_or(ReconcileError::MissingRequiredField {
            index: None,
            field: DATE_FIELD,
        })?
        .to_string();

    Ok(Reconciled { poi, adjustments })
}

/// Reconciles every feature in document order.
///
/// # Errors
/// - Fails on the first feature missing `date`; no records are returned.
pub fn reconcile_all(document: &SourceDocument) -> ReconcileResult<Vec<NormalizedPoi>> {
    reconcile_all_with_summary(document).map(|(pois, _)| pois)
}

/// Same as [`reconcile_all`], also counting the fallbacks applied.
pub fn reconcile_all_with_summary(
    document: &SourceDocument,
) -> ReconcileResult<(Vec<NormalizedPoi>, ReconcileSummary)> {
    let mut summary = ReconcileSummary::default();
    let mut pois = Vec::with_capacity(document.features.len());

    for (index, feature) in document.features.iter().enumerate() {
        let reconciled = reconcile(feature).map_err(|err| err.at_feature(index))?;
        if !reconciled.adjustments.is_empty() {
            debug!(
                "event=reconcile_fallback module=reconcile index={} adjustments={:?}",
                index, reconciled.adjustments
            );
        }
        summary.record(&reconciled);
        pois.push(reconciled.into_poi());
    }

    Ok((pois, summary))
}

#[cfg(test)]
mod tests {
    use super::{reconcile, Adjustment, ReconcileError};
    use crate::model::feature::SourceFeature;

    fn feature(value: serde_json::Value) -> SourceFeature {
        serde_json::from_value(value).expect("feature fixture should decode")
    }

    #[test]
    fn located_feature_passes_through_unchanged() {
        let reconciled = reconcile(&feature(serde_json::json!({
            "geometry": {"coordinates": [2.35, 48.85]},
            "properties": {
                "date": "2020-01-01",
                "Comment": "note",
                "google_maps_url": "http://maps.google.com/?cid=1",
                "location": {"name": "Paris", "address": "France"}
            }
        })))
        .unwrap();

        assert!(reconciled.adjustments.is_empty());
        assert_eq!(reconciled.poi.title, "Paris");
        assert_eq!(reconciled.poi.comment, "note");
        assert_eq!(reconciled.poi.address, "France");
        assert_eq!(reconciled.poi.longitude.to_string(), "2.35");
        assert_eq!(reconciled.poi.latitude.to_string(), "48.85");
    }

    #[test]
    fn rules_report_in_order() {
        let reconciled = reconcile(&feature(serde_json::json!({
            "geometry": {"coordinates": [0, 0]},
            "properties": {"date": "d", "google_maps_url": "http://maps.google.com/?q=1.5,2.5"}
        })))
        .unwrap();

        assert_eq!(
            reconciled.adjustments,
            vec![
                Adjustment::CommentDefaulted,
                Adjustment::StarredPlaceTitled,
                Adjustment::CoordinatesRecovered,
            ]
        );
    }

    #[test]
    fn missing_date_has_no_index_for_single_feature() {
        let err = reconcile(&feature(serde_json::json!({"properties": {}}))).unwrap_err();
        assert_eq!(
            err,
            ReconcileError::MissingRequiredField {
                index: None,
                field: "date"
            }
        );
    }
}
