//! A minimal hand-rolled SVG document builder: `Circle`/`Polyline`/`Text`
//! elements pushed onto a `Document` and rendered to one XML string.

use serde::Deserialize;
use std::fmt::Write as _;

#[derive(Debug, Clone, Copy, PartialEq, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

/// A color as it may arrive in `render_settings`: a bare CSS/SVG color name,
/// an opaque RGB triple, or a translucent RGBA quadruple.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum Color {
    Named(String),
    Rgb([u8; 3]),
    Rgba([f64; 4]),
}

impl Color {
    fn to_attr(&self) -> String {
        match self {
            Color::Named(name) => name.clone(),
            Color::Rgb([r, g, b]) => format!("rgb({r},{g},{b})"),
            Color::Rgba([r, g, b, a]) => format!("rgba({},{},{},{a})", *r as u8, *g as u8, *b as u8),
        }
    }
}

pub struct Circle {
    pub center: Point,
    pub radius: f64,
    pub fill: Color,
}

pub struct Polyline {
    pub points: Vec<Point>,
    pub stroke: Color,
    pub stroke_width: f64,
}

pub struct Text {
    pub point: Point,
    pub offset: Point,
    pub font_size: u32,
    pub bold: bool,
    pub fill: Color,
    /// Set for the underlayer ("substrate") pass: same glyph, drawn first,
    /// stroked wide in the underlayer color so the fill pass reads cleanly
    /// against the map background.
    pub substrate: Option<(Color, f64)>,
    pub data: String,
}

enum Element {
    Circle(Circle),
    Polyline(Polyline),
    Text(Text),
}

#[derive(Default)]
pub struct Document {
    elements: Vec<Element>,
}

impl Document {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_circle(&mut self, circle: Circle) {
        self.elements.push(Element::Circle(circle));
    }

    pub fn add_polyline(&mut self, polyline: Polyline) {
        self.elements.push(Element::Polyline(polyline));
    }

    pub fn add_text(&mut self, text: Text) {
        self.elements.push(Element::Text(text));
    }

    pub fn render(&self) -> String {
        let mut out = String::from(r#"<?xml version="1.0" encoding="UTF-8"?>"#);
        out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" version="1.1">"#);
        for element in &self.elements {
            match element {
                Element::Circle(c) => render_circle(&mut out, c),
                Element::Polyline(p) => render_polyline(&mut out, p),
                Element::Text(t) => render_text(&mut out, t),
            }
        }
        out.push_str("</svg>");
        out
    }
}

fn render_circle(out: &mut String, circle: &Circle) {
    let _ = write!(
        out,
        r#"<circle cx="{}" cy="{}" r="{}" fill="{}"/>"#,
        circle.center.x,
        circle.center.y,
        circle.radius,
        circle.fill.to_attr()
    );
}

fn render_polyline(out: &mut String, polyline: &Polyline) {
    let mut points = String::new();
    for p in &polyline.points {
        let _ = write!(points, "{},{} ", p.x, p.y);
    }
    let _ = write!(
        out,
        r#"<polyline points="{}" fill="none" stroke="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"/>"#,
        points.trim_end(),
        polyline.stroke.to_attr(),
        polyline.stroke_width
    );
}

fn render_text(out: &mut String, text: &Text) {
    let _ = write!(
        out,
        r#"<text x="{}" y="{}" dx="{}" dy="{}" font-size="{}" font-family="Verdana""#,
        text.point.x, text.point.y, text.offset.x, text.offset.y, text.font_size
    );
    if text.bold {
        out.push_str(r#" font-weight="bold""#);
    }
    if let Some((color, width)) = &text.substrate {
        let _ = write!(
            out,
            r#" fill="{}" stroke="{}" stroke-width="{}" stroke-linecap="round" stroke-linejoin="round""#,
            color.to_attr(),
            color.to_attr(),
            width
        );
    } else {
        let _ = write!(out, r#" fill="{}""#, text.fill.to_attr());
    }
    let _ = write!(out, ">{}</text>", text.data);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_wraps_elements_in_xml_and_svg_headers() {
        let mut doc = Document::new();
        doc.add_circle(Circle {
            center: Point { x: 1.0, y: 2.0 },
            radius: 3.0,
            fill: Color::Named("white".into()),
        });
        let rendered = doc.render();
        assert!(rendered.starts_with(r#"<?xml version="1.0" encoding="UTF-8"?><svg "#));
        assert!(rendered.ends_with("</svg>"));
        assert!(rendered.contains(r#"<circle cx="1" cy="2" r="3" fill="white"/>"#));
    }

    #[test]
    fn rgb_color_parses_from_a_three_element_array() {
        let color: Color = serde_json::from_str("[255, 0, 0]").unwrap();
        assert_eq!(color, Color::Rgb([255, 0, 0]));
        assert_eq!(color.to_attr(), "rgb(255,0,0)");
    }

    #[test]
    fn rgba_color_parses_from_a_four_element_array() {
        let color: Color = serde_json::from_str("[255, 0, 0, 0.5]").unwrap();
        assert_eq!(color, Color::Rgba([255.0, 0.0, 0.0, 0.5]));
        assert_eq!(color.to_attr(), "rgba(255,0,0,0.5)");
    }
}
