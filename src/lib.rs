pub mod canvas;
#[cfg(feature = "cli")]
pub mod cli;
pub mod compose;
pub mod config;
#[cfg(feature = "png")]
pub mod fonts;
pub mod geometry;
pub mod overlay;
pub mod render;
pub mod scene_dump;
pub mod svg;
pub mod theme;

pub use canvas::{Canvas, CanvasScope, Color, Font, Stroke};
#[cfg(feature = "cli")]
pub use cli::run;
pub use compose::{Diagram, compose};
pub use config::{ConfigError, DiagramConfig, DiagramSettings, load_config};
pub use overlay::{Overlay, OverlayError, OverlayImage};
#[cfg(feature = "png")]
pub use render::write_output_png;
pub use render::{OutputTargets, RenderSummary, render_artifacts, render_svg};
pub use scene_dump::{DrawOp, RecordingCanvas, SceneDump};
pub use svg::SvgCanvas;
pub use theme::Theme;
