use std::io::Write;

use anyhow::{Context, Result};
use strum::IntoEnumIterator;

use crate::config::constants::kml::{DOCUMENT_NAME, LINE_COLOR, LINE_WIDTH, POLY_COLOR};
use crate::domain::{MarkerType, Position, Trajectory};
use crate::engine::PipelineResult;
use crate::utils::format_timestamp;

/// Writes the cleaned paths and the reconciled markers as one KML document.
///
/// Each trajectory becomes a styled `LineString`; markers go into one folder per marker type.
pub fn write_kml<W: Write>(mut writer: W, result: &PipelineResult) -> Result<()> {
    write_document(&mut writer, result).context("writing KML")?;
    writer.flush().context("flushing KML")?;
    Ok(())
}

fn write_document<W: Write>(w: &mut W, result: &PipelineResult) -> std::io::Result<()> {
    writeln!(w, r#"<?xml version="1.0" encoding="UTF-8"?>"#)?;
    writeln!(w, r#"<kml xmlns="http://www.opengis.net/kml/2.2">"#)?;
    writeln!(w, "<Document>")?;
    writeln!(w, "  <name>{}</name>", DOCUMENT_NAME)?;
    writeln!(w, r#"  <Style id="path">"#)?;
    writeln!(w, "    <LineStyle><color>{}</color><width>{}</width></LineStyle>", LINE_COLOR, LINE_WIDTH)?;
    writeln!(w, "    <PolyStyle><color>{}</color></PolyStyle>", POLY_COLOR)?;
    writeln!(w, "  </Style>")?;

    for trajectory in &result.trajectories {
        write_path(w, trajectory)?;
    }

    for marker_type in MarkerType::iter() {
        writeln!(w, "  <Folder>")?;
        writeln!(w, "    <name>{}</name>", marker_type)?;
        for position in result.markers.list(marker_type) {
            write_point(w, marker_type, position)?;
        }
        writeln!(w, "  </Folder>")?;
    }

    writeln!(w, "</Document>")?;
    writeln!(w, "</kml>")?;
    Ok(())
}

fn write_path<W: Write>(w: &mut W, trajectory: &Trajectory) -> std::io::Result<()> {
    let label = escape(&trajectory.label);
    writeln!(w, "  <Placemark>")?;
    writeln!(w, "    <name>{}</name>", label)?;
    writeln!(w, "    <description>Path for {}</description>", label)?;
    writeln!(w, "    <styleUrl>#path</styleUrl>")?;
    write!(w, "    <LineString><coordinates>")?;
    for (i, position) in trajectory.positions.iter().enumerate() {
        let (lon, lat) = position.lon_lat();
        if i > 0 {
            write!(w, " ")?;
        }
        write!(w, "{},{}", lon, lat)?;
    }
    writeln!(w, "</coordinates></LineString>")?;
    writeln!(w, "  </Placemark>")?;
    Ok(())
}

fn write_point<W: Write>(w: &mut W, marker_type: MarkerType, position: &Position) -> std::io::Result<()> {
    let (lon, lat) = position.lon_lat();
    writeln!(w, "    <Placemark>")?;
    writeln!(w, "      <name>{}</name>", marker_type)?;
    writeln!(w, "      <description>{}</description>", format_timestamp(position.timestamp))?;
    writeln!(w, "      <Point><coordinates>{},{}</coordinates></Point>", lon, lat)?;
    writeln!(w, "    </Placemark>")?;
    Ok(())
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::MarkerSet;
    use chrono::{TimeZone, Utc};

    fn at(lat: f64, lon: f64) -> Position {
        Position::new(lat, lon, None, Utc.with_ymd_and_hms(2019, 3, 19, 14, 0, 0).unwrap())
    }

    fn render(result: &PipelineResult) -> String {
        let mut buf = Vec::new();
        write_kml(&mut buf, result).unwrap();
        String::from_utf8(buf).unwrap()
    }

    #[test]
    fn paths_use_lon_lat_order_and_the_path_style() {
        let result = PipelineResult {
            trajectories: vec![Trajectory::new("a&b.nmea", vec![at(42.5, -83.25), at(42.75, -83.5)])],
            ..Default::default()
        };
        let kml = render(&result);

        assert!(kml.contains("<color>af00ffff</color><width>6</width>"));
        assert!(kml.contains("<PolyStyle><color>7f00ff00</color></PolyStyle>"));
        assert!(kml.contains("<coordinates>-83.25,42.5 -83.5,42.75</coordinates>"));
        assert!(kml.contains("<name>a&amp;b.nmea</name>"));
        assert!(kml.trim_end().ends_with("</kml>"));
    }

    #[test]
    fn one_folder_per_marker_type() {
        let result = PipelineResult {
            markers: MarkerSet {
                stops: vec![at(42.0, -83.0)],
                u_turns: vec![at(42.1, -83.1), at(42.2, -83.2)],
                ..Default::default()
            },
            ..Default::default()
        };
        let kml = render(&result);

        assert_eq!(kml.matches("<Folder>").count(), 4);
        assert_eq!(kml.matches("<Point>").count(), 3);
        assert_eq!(kml.matches("<name>U-Turn</name>").count(), 3);
        assert!(kml.contains("<description>2019-03-19 14:00:00</description>"));
    }
}
