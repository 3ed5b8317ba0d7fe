//! The diagram composer: one fixed sequence of drawing steps against a
//! [`Canvas`].

use rand::Rng;
use rand::seq::SliceRandom;

use crate::canvas::{Canvas, CanvasScope, Font, Stroke};
use crate::config::DiagramConfig;
use crate::geometry::{Point, SectorLayout};
use crate::overlay::Overlay;
use crate::theme::Theme;

/// Everything a composition pass reads.
#[derive(Debug)]
pub struct Diagram {
    pub config: DiagramConfig,
    pub theme: Theme,
    pub overlay: Overlay,
}

impl Diagram {
    /// Resolves the configured overlay once so every pass shares it.
    pub fn new(config: DiagramConfig, theme: Theme) -> Self {
        let overlay = Overlay::load(config.overlay());
        Self {
            config,
            theme,
            overlay,
        }
    }

    pub fn with_overlay(config: DiagramConfig, theme: Theme, overlay: Overlay) -> Self {
        Self {
            config,
            theme,
            overlay,
        }
    }

    pub fn layout(&self) -> SectorLayout {
        SectorLayout::from_config(&self.config)
    }
}

/// Draws `diagram` onto `canvas`. The generator is advanced exactly once,
/// by the shuffle in the decorative-line step.
pub fn compose<C, R>(diagram: &Diagram, canvas: &mut C, rng: &mut R)
where
    C: Canvas + ?Sized,
    R: Rng + ?Sized,
{
    let layout = diagram.layout();
    draw_background(diagram, canvas);
    draw_circle(diagram, &layout, canvas);
    draw_separators(diagram, &layout, canvas);
    draw_labels(diagram, &layout, canvas);
    draw_overlay(diagram, canvas);
    draw_decorations(diagram, &layout, canvas, rng);
}

fn draw_background<C: Canvas + ?Sized>(diagram: &Diagram, canvas: &mut C) {
    let mut scope = CanvasScope::new(canvas);
    scope.fill_rect(
        0.0,
        0.0,
        diagram.config.width() as f64,
        diagram.config.height() as f64,
        diagram.theme.background,
    );
}

fn draw_circle<C: Canvas + ?Sized>(diagram: &Diagram, layout: &SectorLayout, canvas: &mut C) {
    let mut scope = CanvasScope::new(canvas);
    scope.fill_arc(
        layout.center,
        layout.radius,
        layout.start,
        layout.end,
        diagram.theme.circle_fill,
    );
}

fn draw_separators<C: Canvas + ?Sized>(diagram: &Diagram, layout: &SectorLayout, canvas: &mut C) {
    let spokes: Vec<_> = layout
        .boundary_angles()
        .into_iter()
        .map(|angle| layout.spoke(angle))
        .collect();
    tracing::debug!(count = spokes.len(), "separator lines");

    let stroke = Stroke::solid(diagram.theme.separator_color, diagram.config.separator_width());
    let mut scope = CanvasScope::new(canvas);
    scope.stroke_segments(&spokes, &stroke);
}

fn draw_labels<C: Canvas + ?Sized>(diagram: &Diagram, layout: &SectorLayout, canvas: &mut C) {
    let font = Font {
        family: diagram.config.font_family().to_string(),
        size: diagram.config.font_size(),
    };
    let rotation = diagram.config.text_rotation();

    let mut scope = CanvasScope::new(canvas);
    for sector in layout.sectors() {
        let anchor = layout.label_anchor(&sector);
        let mut label = CanvasScope::new(&mut *scope);
        label.translate(anchor.x, anchor.y);
        label.rotate(sector.mid_angle + rotation);
        label.fill_text(
            Point::new(0.0, 0.0),
            &sector.number.to_string(),
            &font,
            diagram.theme.label_color,
        );
    }
}

fn draw_overlay<C: Canvas + ?Sized>(diagram: &Diagram, canvas: &mut C) {
    let image = match &diagram.overlay {
        Overlay::Loaded(image) => image,
        Overlay::NotConfigured => return,
        Overlay::Unavailable(err) => {
            tracing::debug!(error = %err, "skipping overlay");
            return;
        }
    };
    let center = diagram.config.center();
    let origin = Point::new(
        center.x - image.width as f64 / 2.0,
        center.y - image.height as f64 / 2.0,
    );
    let mut scope = CanvasScope::new(canvas);
    scope.draw_image(image, origin);
}

fn draw_decorations<C, R>(diagram: &Diagram, layout: &SectorLayout, canvas: &mut C, rng: &mut R)
where
    C: Canvas + ?Sized,
    R: Rng + ?Sized,
{
    let mut angles = layout.mid_angles();
    angles.shuffle(rng);

    let styles = &diagram.theme.decorations;
    if angles.len() < styles.len() {
        tracing::debug!(
            sectors = angles.len(),
            "fewer sectors than decorative styles, drawing one line per sector"
        );
    }

    for (angle, stroke) in angles.iter().zip(styles.iter()) {
        tracing::debug!(angle, width = stroke.width, "decorative line");
        let mut scope = CanvasScope::new(canvas);
        scope.stroke_segments(&[layout.spoke(*angle)], stroke);
    }
}
