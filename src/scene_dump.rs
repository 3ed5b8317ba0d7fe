use crate::canvas::{Canvas, Color, Font, Stroke};
use crate::geometry::{Point, Segment};
use crate::overlay::OverlayImage;
use serde::Serialize;
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

/// One recorded canvas call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum DrawOp {
    Save,
    Restore,
    Translate {
        dx: f64,
        dy: f64,
    },
    Rotate {
        radians: f64,
    },
    FillRect {
        x: f64,
        y: f64,
        width: f64,
        height: f64,
        color: Color,
    },
    FillArc {
        center: Point,
        radius: f64,
        start: f64,
        end: f64,
        color: Color,
    },
    StrokeSegments {
        segments: Vec<Segment>,
        stroke: Stroke,
    },
    FillText {
        origin: Point,
        text: String,
        font: Font,
        color: Color,
    },
    DrawImage {
        origin: Point,
        width: u32,
        height: u32,
    },
}

/// Canvas that keeps every call instead of drawing it.
#[derive(Debug, Default, Clone)]
pub struct RecordingCanvas {
    ops: Vec<DrawOp>,
}

impl RecordingCanvas {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }

    pub fn into_ops(self) -> Vec<DrawOp> {
        self.ops
    }
}

impl Canvas for RecordingCanvas {
    fn save(&mut self) {
        self.ops.push(DrawOp::Save);
    }

    fn restore(&mut self) {
        self.ops.push(DrawOp::Restore);
    }

    fn translate(&mut self, dx: f64, dy: f64) {
        self.ops.push(DrawOp::Translate { dx, dy });
    }

    fn rotate(&mut self, radians: f64) {
        self.ops.push(DrawOp::Rotate { radians });
    }

    fn fill_rect(&mut self, x: f64, y: f64, width: f64, height: f64, color: Color) {
        self.ops.push(DrawOp::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }

    fn fill_arc(&mut self, center: Point, radius: f64, start: f64, end: f64, color: Color) {
        self.ops.push(DrawOp::FillArc {
            center,
            radius,
            start,
            end,
            color,
        });
    }

    fn stroke_segments(&mut self, segments: &[Segment], stroke: &Stroke) {
        self.ops.push(DrawOp::StrokeSegments {
            segments: segments.to_vec(),
            stroke: stroke.clone(),
        });
    }

    fn fill_text(&mut self, origin: Point, text: &str, font: &Font, color: Color) {
        self.ops.push(DrawOp::FillText {
            origin,
            text: text.to_string(),
            font: font.clone(),
            color,
        });
    }

    fn draw_image(&mut self, image: &OverlayImage, origin: Point) {
        self.ops.push(DrawOp::DrawImage {
            origin,
            width: image.width,
            height: image.height,
        });
    }
}

#[derive(Debug, Serialize)]
pub struct SceneDump {
    pub width: u32,
    pub height: u32,
    pub seed: u64,
    pub ops: Vec<DrawOp>,
}

impl SceneDump {
    pub fn new(width: u32, height: u32, seed: u64, canvas: RecordingCanvas) -> Self {
        Self {
            width,
            height,
            seed,
            ops: canvas.into_ops(),
        }
    }
}

pub fn write_scene_dump(path: &Path, dump: &SceneDump) -> anyhow::Result<()> {
    let file = File::create(path)?;
    let writer = BufWriter::new(file);
    serde_json::to_writer_pretty(writer, dump)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dump_serializes_tagged_ops() {
        let mut canvas = RecordingCanvas::new();
        canvas.save();
        canvas.fill_text(
            Point::new(1.0, 2.0),
            "7",
            &Font {
                family: "sans-serif".to_string(),
                size: 32.0,
            },
            Color::rgb(255, 255, 255),
        );
        canvas.restore();
        let dump = SceneDump::new(800, 800, 42, canvas);
        assert_eq!(dump.ops.len(), 3);

        let json = serde_json::to_value(&dump).unwrap();
        assert_eq!(json["seed"], 42);
        assert_eq!(json["ops"][0]["op"], "save");
        assert_eq!(json["ops"][1]["op"], "fill_text");
        assert_eq!(json["ops"][1]["color"], "#FFFFFF");
        assert_eq!(json["ops"][1]["origin"]["y"], 2.0);
    }

    #[test]
    fn writes_pretty_json() {
        let path = std::env::temp_dir().join(format!("sector-wheel-dump-{}.json", std::process::id()));
        let dump = SceneDump::new(10, 10, 1, RecordingCanvas::new());
        write_scene_dump(&path, &dump).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert!(text.contains("\"ops\": []"));
    }
}
