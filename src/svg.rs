use std::f64::consts::TAU;

use crate::canvas::{Canvas, Color, Font, Stroke};
use crate::geometry::{Point, Segment};
use crate::overlay::OverlayImage;

/// Canvas backend that writes an SVG 1.1 document.
pub struct SvgCanvas {
    width: u32,
    height: u32,
    body: String,
    transform: Vec<String>,
    saved: Vec<Vec<String>>,
}

impl SvgCanvas {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            body: String::new(),
            transform: Vec::new(),
            saved: Vec::new(),
        }
    }

    pub fn finish(self) -> String {
        let (width, height) = (self.width, self.height);
        let mut svg = String::with_capacity(self.body.len() + 160);
        svg.push_str(&format!(
            "<svg xmlns=\"http://www.w3.org/2000/svg\" xmlns:xlink=\"http://www.w3.org/1999/xlink\" width=\"{width}\" height=\"{height}\" viewBox=\"0 0 {width} {height}\">",
        ));
        svg.push_str(&self.body);
        svg.push_str("</svg>");
        svg
    }

    fn transform_attr(&self) -> String {
        if self.transform.is_empty() {
            String::new()
        } else {
            format!(" transform=\"{}\"", self.transform.join(" "))
        }
    }
}

impl Canvas for SvgCanvas {
    fn save(&mut self) {
        self.saved.push(self.transform.clone());
    }

    fn restore(&mut self) {
        if let Some(previous) = self.saved.pop() {
            self.transform = previous;
        }
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.transform.push(format!("translate({dx:.3} {dy:.3})"));
    }

    fn rotate(&mut self, radians: f64) {
        self.transform
            .push(format!("rotate({:.4})", radians.to_degrees()));
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.body.push_str(&format!(
            "<rect x=\"{x:.2}\" y=\"{y:.2}\" width=\"{width:.2}\" height=\"{height:.2}\"{}{}/>",
            fill_attrs(color),
            self.transform_attr()
        ));
    }

    fn fill_arc(&mut self, center: Point, radius: f64, start: f64, end: f64, color: Color) {
        let sweep = end - start;
        if sweep <= 0.0 {
            return;
        }
        if sweep >= TAU {
            self.body.push_str(&format!(
                "<circle cx=\"{:.2}\" cy=\"{:.2}\" r=\"{radius:.2}\"{}{}/>",
                center.x,
                center.y,
                fill_attrs(color),
                self.transform_attr()
            ));
            return;
        }
        let from = center.polar(start, radius);
        let to = center.polar(end, radius);
        let large_arc = if sweep > std::f64::consts::PI { 1 } else { 0 };
        self.body.push_str(&format!(
            "<path d=\"M {:.2} {:.2} A {radius:.2} {radius:.2} 0 {large_arc} 1 {:.2} {:.2} Z\"{}{}/>",
            from.x,
            from.y,
            to.x,
            to.y,
            fill_attrs(color),
            self.transform_attr()
        ));
    }

    fn stroke_segments(&mut self, segments: &[Segment], stroke: &Stroke) {
        if segments.is_empty() {
            return;
        }
        self.body.push_str(&format!(
            "<path d=\"{}\" fill=\"none\"{}{}/>",
            segments_to_path(segments),
            stroke_attrs(stroke),
            self.transform_attr()
        ));
    }

    fn fill_text(&mut self, origin: Point, text: &str, font: &Font, color: Color) {
        self.body.push_str(&format!(
            "<text x=\"{:.2}\" y=\"{:.2}\" font-family=\"{}\" font-size=\"{}\"{}{}>{}</text>",
            origin.x,
            origin.y,
            escape_xml(&font.family),
            font.size,
            fill_attrs(color),
            self.transform_attr(),
            escape_xml(text)
        ));
    }

    fn draw_image(&mut self, image: &OverlayImage, origin: Point) {
        self.body.push_str(&format!(
            "<image x=\"{:.2}\" y=\"{:.2}\" width=\"{}\" height=\"{}\" preserveAspectRatio=\"none\" xlink:href=\"{}\"{}/>",
            origin.x,
            origin.y,
            image.width,
            image.height,
            image.data_uri(),
            self.transform_attr()
        ));
    }
}

fn fill_attrs(color: Color) -> String {
    if color.is_opaque() {
        format!(" fill=\"{}\"", color.hex_rgb())
    } else {
        format!(
            " fill=\"{}\" fill-opacity=\"{:.3}\"",
            color.hex_rgb(),
            color.opacity()
        )
    }
}

fn stroke_attrs(stroke: &Stroke) -> String {
    let mut attrs = format!(
        " stroke=\"{}\" stroke-width=\"{}\"",
        stroke.color.hex_rgb(),
        stroke.width
    );
    if !stroke.color.is_opaque() {
        attrs.push_str(&format!(" stroke-opacity=\"{:.3}\"", stroke.color.opacity()));
    }
    if let Some(dash) = stroke.dash.as_deref().filter(|dash| !dash.is_empty()) {
        let pattern: Vec<String> = dash.iter().map(|v| v.to_string()).collect();
        attrs.push_str(&format!(" stroke-dasharray=\"{}\"", pattern.join(" ")));
    }
    attrs
}

fn segments_to_path(segments: &[Segment]) -> String {
    let mut d = String::new();
    for (idx, segment) in segments.iter().enumerate() {
        if idx > 0 {
            d.push(' ');
        }
        d.push_str(&format!(
            "M {:.2} {:.2} L {:.2} {:.2}",
            segment.from.x, segment.from.y, segment.to.x, segment.to.y
        ));
    }
    d
}

fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
