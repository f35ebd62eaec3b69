//! Map projector (Component G): rank compression plus the four layered SVG
//! producers (bus lines, bus labels, stop points, stop labels).

pub mod project;
pub mod svg;

pub use svg::{Color, Point};

use crate::catalog::Catalog;
use serde::Deserialize;
use thiserror::Error;

#[derive(Debug, Clone, Deserialize)]
pub struct RenderSettings {
    pub width: f64,
    pub height: f64,
    pub padding: f64,
    pub stop_radius: f64,
    pub line_width: f64,
    pub bus_label_font_size: u32,
    pub bus_label_offset: [f64; 2],
    pub stop_label_font_size: u32,
    pub stop_label_offset: [f64; 2],
    pub underlayer_color: Color,
    pub underlayer_width: f64,
    pub color_palette: Vec<Color>,
    pub layers: Vec<String>,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 600.0,
            height: 400.0,
            padding: 50.0,
            stop_radius: 5.0,
            line_width: 14.0,
            bus_label_font_size: 20,
            bus_label_offset: [7.0, 15.0],
            stop_label_font_size: 20,
            stop_label_offset: [7.0, -3.0],
            underlayer_color: Color::Named("white".to_string()),
            underlayer_width: 3.0,
            color_palette: vec![Color::Named("green".to_string()), Color::Rgb([255, 160, 0]), Color::Named("red".to_string())],
            layers: vec![
                "bus_lines".to_string(),
                "bus_labels".to_string(),
                "stop_points".to_string(),
                "stop_labels".to_string(),
            ],
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum RenderError {
    #[error("unknown render layer {0:?}")]
    UnknownLayer(String),
}

/// Renders the full map: runs the projection once, then walks the
/// configured layer sequence, producing one SVG string.
pub fn render(catalog: &Catalog, settings: &RenderSettings) -> Result<String, RenderError> {
    let projection = project::project(catalog, settings);
    let mut doc = svg::Document::new();
    for layer in &settings.layers {
        match layer.as_str() {
            "bus_lines" => draw_bus_lines(catalog, settings, &projection, &mut doc),
            "bus_labels" => draw_bus_labels(catalog, settings, &projection, &mut doc),
            "stop_points" => draw_stop_points(catalog, settings, &projection, &mut doc),
            "stop_labels" => draw_stop_labels(catalog, settings, &projection, &mut doc),
            other => return Err(RenderError::UnknownLayer(other.to_string())),
        }
    }
    Ok(doc.render())
}

fn palette_cycle(settings: &RenderSettings) -> Box<dyn Iterator<Item = Color> + '_> {
    if settings.color_palette.is_empty() {
        Box::new(std::iter::repeat(Color::Named("black".to_string())))
    } else {
        Box::new(settings.color_palette.iter().cloned().cycle())
    }
}

fn draw_stop_points(catalog: &Catalog, settings: &RenderSettings, projection: &project::Projection, doc: &mut svg::Document) {
    for stop in catalog.stops() {
        doc.add_circle(svg::Circle {
            center: projection.pixel(stop),
            radius: settings.stop_radius,
            fill: Color::Named("white".to_string()),
        });
    }
}

fn draw_stop_labels(catalog: &Catalog, settings: &RenderSettings, projection: &project::Projection, doc: &mut svg::Document) {
    for stop in catalog.stops() {
        emplace_label(
            doc,
            projection.pixel(stop),
            settings.stop_label_offset,
            settings.stop_label_font_size,
            false,
            &settings.underlayer_color,
            settings.underlayer_width,
            &Color::Named("black".to_string()),
            stop.name.to_string(),
        );
    }
}

fn draw_bus_labels(catalog: &Catalog, settings: &RenderSettings, projection: &project::Projection, doc: &mut svg::Document) {
    let mut palette = palette_cycle(settings);
    for bus in catalog.buses() {
        let color = palette.next().unwrap_or(Color::Named("black".to_string()));
        let Some(first_name) = bus.waybill.first() else {
            continue;
        };
        let first_stop = catalog.stop(first_name).expect("waybill references are validated at synchronize");
        emplace_label(
            doc,
            projection.pixel(first_stop),
            settings.bus_label_offset,
            settings.bus_label_font_size,
            true,
            &settings.underlayer_color,
            settings.underlayer_width,
            &color,
            bus.name.to_string(),
        );

        let last_name = bus.waybill.last().unwrap();
        if !bus.is_roundtrip && last_name != first_name {
            let last_stop = catalog.stop(last_name).expect("waybill references are validated at synchronize");
            emplace_label(
                doc,
                projection.pixel(last_stop),
                settings.bus_label_offset,
                settings.bus_label_font_size,
                true,
                &settings.underlayer_color,
                settings.underlayer_width,
                &color,
                bus.name.to_string(),
            );
        }
    }
}

/// Draws a label's underlayer substrate pass, then its fill pass in
/// `fill_color` — the bus's route color for bus labels, plain black for
/// stop labels, matching `emplace_bus_label_on_map` / `emplace_stop_label_on_map`.
#[allow(clippy::too_many_arguments)]
fn emplace_label(
    doc: &mut svg::Document,
    point: Point,
    offset: [f64; 2],
    font_size: u32,
    bold: bool,
    underlayer_color: &Color,
    underlayer_width: f64,
    fill_color: &Color,
    data: String,
) {
    let offset = Point { x: offset[0], y: offset[1] };
    doc.add_text(svg::Text {
        point,
        offset,
        font_size,
        bold,
        fill: underlayer_color.clone(),
        substrate: Some((underlayer_color.clone(), underlayer_width)),
        data: data.clone(),
    });
    doc.add_text(svg::Text {
        point,
        offset,
        font_size,
        bold,
        fill: fill_color.clone(),
        substrate: None,
        data,
    });
}

fn draw_bus_lines(catalog: &Catalog, settings: &RenderSettings, projection: &project::Projection, doc: &mut svg::Document) {
    let mut palette = palette_cycle(settings);
    for bus in catalog.buses() {
        let color = palette.next().unwrap_or(Color::Named("black".to_string()));
        let mut points: Vec<Point> = bus
            .waybill
            .iter()
            .map(|name| projection.pixel(catalog.stop(name).expect("waybill references are validated at synchronize")))
            .collect();

        if bus.waybill.is_empty() {
            continue;
        }

        if bus.is_roundtrip {
            if let Some(&first) = points.first() {
                points.push(first);
            }
        } else {
            let mut back = points.clone();
            back.pop();
            back.reverse();
            points.extend(back);
        }

        doc.add_polyline(svg::Polyline {
            points,
            stroke: color,
            stroke_width: settings.line_width,
        });
    }
}
