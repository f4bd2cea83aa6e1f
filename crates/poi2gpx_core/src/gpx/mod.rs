//! GPX 1.1 waypoint document serialization.
//!
//! # Responsibility
//! - Render reconciled records as `wpt` elements under one `gpx` root.
//!
//! # Invariants
//! - Child order inside `wpt` is fixed: name, desc, cmt, link, time,
//!   extensions.
//! - Output is byte-for-byte deterministic for the same records.
//! - Empty text renders as an empty element, never as an omitted one.

use crate::model::poi::NormalizedPoi;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub const GPX_NAMESPACE: &str = "http://www.topografix.com/GPX/1/1";
pub const GPX_VERSION: &str = "1.1";
pub const GPX_CREATOR: &str = "";
/// Display color attached to every waypoint.
pub const WAYPOINT_COLOR: &str = "0000ff";

const INDENT_WIDTH: usize = 2;

pub type GpxResult<T> = Result<T, GpxError>;

#[derive(Debug)]
pub enum GpxError {
    Xml(quick_xml::Error),
}

impl Display for GpxError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Xml(err) => write!(f, "failed to write GPX document: {err}"),
        }
    }
}

impl Error for GpxError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Xml(err) => Some(err),
        }
    }
}

impl From<quick_xml::Error> for GpxError {
    fn from(value: quick_xml::Error) -> Self {
        Self::Xml(value)
    }
}

/// Renders a complete, indented UTF-8 GPX document.
pub fn write_gpx(pois: &[NormalizedPoi]) -> GpxResult<Vec<u8>> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', INDENT_WIDTH);
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("utf-8"), None)))?;

    let mut root = BytesStart::new("gpx");
    root.push_attribute(("version", GPX_VERSION));
    root.push_attribute(("creator", GPX_CREATOR));
    root.push_attribute(("xmlns", GPX_NAMESPACE));
    writer.write_event(Event::Start(root))?;

    for poi in pois {
        write_waypoint(&mut writer, poi)?;
    }

    writer.write_event(Event::End(BytesEnd::new("gpx")))?;

    let mut bytes = writer.into_inner();
    bytes.push(b'\n');
    Ok(bytes)
}

fn write_waypoint(writer: &mut Writer<Vec<u8>>, poi: &NormalizedPoi) -> GpxResult<()> {
    let latitude = poi.latitude.to_string();
    let longitude = poi.longitude.to_string();

    let mut wpt = BytesStart::new("wpt");
    wpt.push_attribute(("lat", latitude.as_str()));
    wpt.push_attribute(("lon", longitude.as_str()));
    writer.write_event(Event::Start(wpt))?;

    write_text_element(writer, "name", &poi.title)?;
    write_text_element(writer, "desc", &poi.address)?;
    write_text_element(writer, "cmt", &poi.comment)?;
    write_text_element(writer, "link", &poi.link)?;
    write_text_element(writer, "time", &poi.date)?;

    writer.write_event(Event::Start(BytesStart::new("extensions")))?;
    write_text_element(writer, "color", WAYPOINT_COLOR)?;
    writer.write_event(Event::End(BytesEnd::new("extensions")))?;

    writer.write_event(Event::End(BytesEnd::new("wpt")))?;
    Ok(())
}

fn write_text_element(writer: &mut Writer<Vec<u8>>, name: &str, text: &str) -> GpxResult<()> {
    if text.is_empty() {
        writer.write_event(Event::Empty(BytesStart::new(name)))?;
        return Ok(());
    }
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(text)))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::write_gpx;
    use crate::model::poi::{Coordinate, NormalizedPoi};

    fn poi() -> NormalizedPoi {
        NormalizedPoi {
            title: "Cafe".to_string(),
            comment: "<a href=\"x\">x</a>".to_string(),
            date: "2020-01-01".to_string(),
            longitude: Coordinate::Captured("-122.3".to_string()),
            latitude: Coordinate::Captured("37.5".to_string()),
            link: "x".to_string(),
            address: String::new(),
        }
    }

    #[test]
    fn renders_expected_document() {
        let bytes = write_gpx(&[poi()]).unwrap();
        let expected = concat!(
            "<?xml version=\"1.0\" encoding=\"utf-8\"?>\n",
            "<gpx version=\"1.1\" creator=\"\" xmlns=\"http://www.topografix.com/GPX/1/1\">\n",
            "  <wpt lat=\"37.5\" lon=\"-122.3\">\n",
            "    <name>Cafe</name>\n",
            "    <desc/>\n",
            "    <cmt>&lt;a href=&quot;x&quot;&gt;x&lt;/a&gt;</cmt>\n",
            "    <link>x</link>\n",
            "    <time>2020-01-01</time>\n",
            "    <extensions>\n",
            "      <color>0000ff</color>\n",
            "    </extensions>\n",
            "  </wpt>\n",
            "</gpx>\n",
        );
        assert_eq!(String::from_utf8(bytes).unwrap(), expected);
    }

    #[test]
    fn apostrophes_are_escaped_in_text() {
        let mut joe = poi();
        joe.title = "Joe's".to_string();
        let text = String::from_utf8(write_gpx(&[joe]).unwrap()).unwrap();
        assert!(text.contains("<name>Joe&apos;s</name>"));
    }

    #[test]
    fn empty_collection_renders_root_only() {
        let text = String::from_utf8(write_gpx(&[]).unwrap()).unwrap();
        assert!(text.ends_with(
            "<gpx version=\"1.1\" creator=\"\" xmlns=\"http://www.topografix.com/GPX/1/1\">\n</gpx>\n"
        ));
    }
}
