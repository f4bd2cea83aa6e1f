//! Ordered fallback rules applied to every extracted record.
//!
//! # Invariants
//! - Rules run top-to-bottom exactly once per record.
//! - A rule reads the record as left by the rules before it.

use crate::model::poi::{Coordinate, NormalizedPoi};
use once_cell::sync::Lazy;
use regex::Regex;

/// Title given to positionless saved places that carry no name.
pub const STARRED_PLACE_TITLE: &str = "Starred Place";

static MAPS_QUERY_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"http://maps.google.com/\?q=([-0-9.]+),([-0-9.]+)").expect("valid maps query regex")
});

/// Change a rule made to a record.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Adjustment {
    /// Empty comment replaced by an anchor to the maps link.
    CommentDefaulted,
    /// Untitled positionless record named [`STARRED_PLACE_TITLE`].
    StarredPlaceTitled,
    /// Position recovered from the maps link query.
    CoordinatesRecovered,
    /// No position recoverable; comment forced to the link anchor.
    LinkOnlyComment,
}

pub(crate) type Rule = fn(&mut NormalizedPoi) -> Option<Adjustment>;

pub(crate) const FALLBACK_RULES: &[Rule] = &[
    default_empty_comment,
    title_starred_place,
    recover_position_from_link,
];

/// Renders the `<a href="LINK">LINK</a>` comment fallback.
///
/// An empty link still yields `<a href=""></a>`.
pub fn link_anchor(link: &str) -> String {
    format!("<a href=\"{link}\">{link}</a>")
}

fn default_empty_comment(poi: &mut NormalizedPoi) -> Option<Adjustment> {
    if !poi.comment.is_empty() {
        return None;
    }
    poi.comment = link_anchor(&poi.link);
    Some(Adjustment::CommentDefaulted)
}

fn title_starred_place(poi: &mut NormalizedPoi) -> Option<Adjustment> {
    if !poi.lacks_position() || !poi.title.is_empty() {
        return None;
    }
    poi.title = STARRED_PLACE_TITLE.to_string();
    Some(Adjustment::StarredPlaceTitled)
}

fn recover_position_from_link(poi: &mut NormalizedPoi) -> Option<Adjustment> {
    if !poi.lacks_position() {
        return None;
    }
    match single_maps_query(&poi.link) {
        Some((first, second)) => {
            // Maps queries are `q=LAT,LON`; GeoJSON arrays are `[LON, LAT]`.
            // The first capture is latitude.
            poi.latitude = Coordinate::Captured(first);
            poi.longitude = Coordinate::Captured(second);
            Some(Adjustment::CoordinatesRecovered)
        }
        None => {
            poi.comment = link_anchor(&poi.link);
            Some(Adjustment::LinkOnlyComment)
        }
    }
}

/// Returns both captures when the query pattern occurs exactly once.
fn single_maps_query(url: &str) -> Option<(String, String)> {
    let mut matches = MAPS_QUERY_RE.captures_iter(url);
    let captures = matches.next()?;
    if matches.next().is_some() {
        return None;
    }
    let first = captures.get(1)?.as_str().to_string();
    let second = captures.get(2)?.as_str().to_string();
    Some((first, second))
}

#[cfg(test)]
mod tests {
    use super::{link_anchor, single_maps_query};

    #[test]
    fn anchor_uses_link_for_href_and_text() {
        assert_eq!(
            link_anchor("http://maps.google.com/?cid=7"),
            "<a href=\"http://maps.google.com/?cid=7\">http://maps.google.com/?cid=7</a>"
        );
        assert_eq!(link_anchor(""), "<a href=\"\"></a>");
    }

    #[test]
    fn maps_query_captures_in_url_order() {
        let captures = single_maps_query("http://maps.google.com/?q=37.5,-122.3").unwrap();
        assert_eq!(captures, ("37.5".to_string(), "-122.3".to_string()));
    }

    #[test]
    fn maps_query_requires_exactly_one_match() {
        assert_eq!(single_maps_query("http://maps.google.com/?cid=123"), None);
        assert_eq!(single_maps_query("https://maps.google.com/?q=1,2"), None);
        assert_eq!(
            single_maps_query("http://maps.google.com/?q=1,2 http://maps.google.com/?q=3,4"),
            None
        );
    }
}
