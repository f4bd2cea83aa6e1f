//! Saved-places GeoJSON source model.
//!
//! # Responsibility
//! - Decode a feature collection document into typed source features.
//! - Expose nested optional properties through flat accessors.
//!
//! # Invariants
//! - A document without a top-level `features` array is rejected.
//! - Coordinates render from the parsed number; integer vs float is preserved.
//! - Missing geometry or coordinate entries read as `0`.

use serde::Deserialize;
use serde_json::Number;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Error raised when the source document cannot be decoded.
#[derive(Debug)]
pub enum SourceError {
    /// Not valid JSON, wrong shape, or missing the `features` key.
    Json(serde_json::Error),
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Json(err) => write!(f, "malformed source document: {err}"),
        }
    }
}

impl Error for SourceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Json(err) => Some(err),
        }
    }
}

impl From<serde_json::Error> for SourceError {
    fn from(value: serde_json::Error) -> Self {
        Self::Json(value)
    }
}

/// Top-level feature collection.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SourceDocument {
    /// Features in document order.
    pub features: Vec<SourceFeature>,
}

/// One point of interest as exported.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct SourceFeature {
    #[serde(default)]
    pub geometry: Option<Geometry>,
    #[serde(default)]
    pub properties: Option<Properties>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Geometry {
    /// `[longitude, latitude]`.
    #[serde(default)]
    pub coordinates: Option<Vec<Number>>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Properties {
    #[serde(default)]
    pub location: Option<Location>,
    #[serde(default)]
    pub google_maps_url: Option<String>,
    /// Exported with a capitalized key.
    #[serde(default, rename = "Comment")]
    pub comment: Option<String>,
    /// Required for conversion; checked during reconciliation.
    #[serde(default)]
    pub date: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct Location {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub address: Option<String>,
}

impl SourceFeature {
    /// Returns `(longitude, latitude)`, defaulting each missing axis to `0`.
    pub fn coordinates(&self) -> (Number, Number) {
        let coordinates = self
            .geometry
            .as_ref()
            .and_then(|geometry| geometry.coordinates.as_deref())
            .unwrap_or(&[]);
        let axis = |index: usize| {
            coordinates
                .get(index)
                .cloned()
                .unwrap_or_else(|| Number::from(0))
        };
        (axis(0), axis(1))
    }

    pub fn location_name(&self) -> Option<&str> {
        self.location().and_then(|location| location.name.as_deref())
    }

    pub fn address(&self) -> Option<&str> {
        self.location()
            .and_then(|location| location.address.as_deref())
    }

    pub fn google_maps_url(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|properties| properties.google_maps_url.as_deref())
    }

    pub fn comment(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|properties| properties.comment.as_deref())
    }

    pub fn date(&self) -> Option<&str> {
        self.properties
            .as_ref()
            .and_then(|properties| properties.date.as_deref())
    }

    fn location(&self) -> Option<&Location> {
        self.properties
            .as_ref()
            .and_then(|properties| properties.location.as_ref())
    }
}

/// Decodes a saved-places document from raw JSON bytes.
///
/// # Errors
/// - Returns [`SourceError::Json`] for invalid JSON, a missing `features`
///   key, or values of the wrong JSON type.
pub fn parse_source(bytes: &[u8]) -> Result<SourceDocument, SourceError> {
    Ok(serde_json::from_slice(bytes)?)
}

#[cfg(test)]
mod tests {
    use super::{parse_source, SourceError};
    use serde_json::json;

    #[test]
    fn parses_nested_properties() {
        let raw = json!({
            "type": "FeatureCollection",
            "features": [{
                "type": "Feature",
                "geometry": {"type": "Point", "coordinates": [13.4, 52.5]},
                "properties": {
                    "date": "2021-05-01T10:00:00Z",
                    "google_maps_url": "http://maps.google.com/?cid=1",
                    "Comment": "great coffee",
                    "location": {"name": "Cafe", "address": "Main St 1"}
                }
            }]
        });
        let document = parse_source(raw.to_string().as_bytes()).unwrap();
        let feature = &document.features[0];

        let (lon, lat) = feature.coordinates();
        assert_eq!(lon.to_string(), "13.4");
        assert_eq!(lat.to_string(), "52.5");
        assert_eq!(feature.location_name(), Some("Cafe"));
        assert_eq!(feature.address(), Some("Main St 1"));
        assert_eq!(feature.comment(), Some("great coffee"));
        assert_eq!(feature.date(), Some("2021-05-01T10:00:00Z"));
    }

    #[test]
    fn missing_geometry_reads_as_integer_zero() {
        let raw = json!({"features": [{"properties": {"date": "d"}}]});
        let document = parse_source(raw.to_string().as_bytes()).unwrap();

        let (lon, lat) = document.features[0].coordinates();
        assert_eq!(lon.to_string(), "0");
        assert_eq!(lat.to_string(), "0");
    }

    #[test]
    fn coordinates_render_from_parsed_number() {
        let document = parse_source(
            br#"{"features": [{"geometry": {"coordinates": [-122.30, 7]}}]}"#,
        )
        .unwrap();

        let (lon, lat) = document.features[0].coordinates();
        assert_eq!(lon.to_string(), "-122.3");
        assert_eq!(lat.to_string(), "7");
    }

    #[test]
    fn null_location_is_treated_as_absent() {
        let raw = json!({"features": [{"properties": {"date": "d", "location": null}}]});
        let document = parse_source(raw.to_string().as_bytes()).unwrap();

        assert_eq!(document.features[0].location_name(), None);
        assert_eq!(document.features[0].address(), None);
    }

    #[test]
    fn rejects_document_without_features() {
        let err = parse_source(br#"{"type": "FeatureCollection"}"#).unwrap_err();
        let SourceError::Json(inner) = &err;
        assert!(inner.to_string().contains("features"), "unexpected error: {err}");
    }

    #[test]
    fn rejects_invalid_json() {
        assert!(parse_source(b"{not json").is_err());
    }
}
