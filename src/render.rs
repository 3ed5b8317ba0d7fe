use crate::compose::{Diagram, compose};
use crate::scene_dump::{RecordingCanvas, SceneDump, write_scene_dump};
use crate::svg::SvgCanvas;
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use std::path::{Path, PathBuf};

#[cfg(feature = "png")]
use crate::config::DiagramConfig;

pub fn render_svg<R: Rng + ?Sized>(diagram: &Diagram, rng: &mut R) -> String {
    let mut canvas = SvgCanvas::new(diagram.config.width(), diagram.config.height());
    compose(diagram, &mut canvas, rng);
    canvas.finish()
}

pub fn record_scene<R: Rng + ?Sized>(diagram: &Diagram, rng: &mut R, seed: u64) -> SceneDump {
    let mut canvas = RecordingCanvas::new();
    compose(diagram, &mut canvas, rng);
    SceneDump::new(diagram.config.width(), diagram.config.height(), seed, canvas)
}

pub fn write_output_svg(svg: &str, output: &Path) -> Result<()> {
    std::fs::write(output, svg).with_context(|| format!("write svg to '{}'", output.display()))
}

/// Rasterizes `svg` into a `width x height` PNG. Fonts are looked up in the
/// system database plus `fonts_dir` when given.
#[cfg(feature = "png")]
pub fn write_output_png(
    svg: &str,
    output: &Path,
    config: &DiagramConfig,
    fonts_dir: Option<&Path>,
) -> Result<()> {
    let mut opt = usvg::Options::default();
    opt.font_family = config.font_family().to_string();
    opt.fontdb = crate::fonts::font_database(fonts_dir);
    opt.default_size = usvg::Size::from_wh(config.width() as f32, config.height() as f32)
        .ok_or_else(|| anyhow::anyhow!("Invalid canvas size"))?;

    let tree = usvg::Tree::from_str(svg, &opt).context("parse rendered svg")?;
    let mut pixmap = resvg::tiny_skia::Pixmap::new(config.width(), config.height())
        .ok_or_else(|| anyhow::anyhow!("Failed to allocate pixmap"))?;

    let mut pixmap_mut = pixmap.as_mut();
    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap_mut);
    pixmap
        .save_png(output)
        .with_context(|| format!("write png to '{}'", output.display()))?;
    Ok(())
}

/// Where each artifact goes. `None` skips that artifact.
#[derive(Debug, Clone, Default)]
pub struct OutputTargets {
    pub svg: Option<PathBuf>,
    pub png: Option<PathBuf>,
    pub scene_dump: Option<PathBuf>,
    pub fonts_dir: Option<PathBuf>,
}

impl OutputTargets {
    /// `output.svg` and `output.png` inside `resources_dir`.
    pub fn in_resources(resources_dir: &Path) -> Self {
        Self {
            svg: Some(resources_dir.join("output.svg")),
            png: Some(resources_dir.join("output.png")),
            scene_dump: None,
            fonts_dir: Some(resources_dir.join("fonts")),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderSummary {
    pub seed: u64,
    pub written: Vec<PathBuf>,
}

/// Writes every requested artifact. The generator is seeded once and each
/// pass composes with its own clone of it, so every artifact shows the same
/// decorative-line placement.
#[tracing::instrument(skip_all, fields(seed = seed, sectors = diagram.config.sectors()))]
pub fn render_artifacts(diagram: &Diagram, seed: u64, targets: &OutputTargets) -> Result<RenderSummary> {
    let seeded = StdRng::seed_from_u64(seed);
    let mut written = Vec::new();

    if let Some(path) = &targets.svg {
        let svg = render_svg(diagram, &mut seeded.clone());
        write_output_svg(&svg, path)?;
        tracing::info!(path = %path.display(), "wrote vector output");
        written.push(path.clone());
    }

    if let Some(path) = &targets.png {
        write_png_pass(diagram, &mut seeded.clone(), path, targets.fonts_dir.as_deref())?;
        tracing::info!(path = %path.display(), "wrote raster output");
        written.push(path.clone());
    }

    if let Some(path) = &targets.scene_dump {
        let dump = record_scene(diagram, &mut seeded.clone(), seed);
        write_scene_dump(path, &dump)
            .with_context(|| format!("write scene dump to '{}'", path.display()))?;
        tracing::info!(path = %path.display(), ops = dump.ops.len(), "wrote scene dump");
        written.push(path.clone());
    }

    Ok(RenderSummary { seed, written })
}

#[cfg(feature = "png")]
fn write_png_pass(diagram: &Diagram, rng: &mut StdRng, path: &Path, fonts_dir: Option<&Path>) -> Result<()> {
    let svg = render_svg(diagram, rng);
    write_output_png(&svg, path, &diagram.config, fonts_dir)
}

#[cfg(not(feature = "png"))]
fn write_png_pass(_diagram: &Diagram, _rng: &mut StdRng, path: &Path, _fonts_dir: Option<&Path>) -> Result<()> {
    Err(anyhow::anyhow!(
        "PNG output for '{}' requires the `png` feature",
        path.display()
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DiagramConfig, DiagramSettings};
    use crate::overlay::Overlay;
    use crate::theme::Theme;

    fn diagram() -> Diagram {
        Diagram::with_overlay(DiagramConfig::default(), Theme::classic(), Overlay::NotConfigured)
    }

    #[test]
    fn render_svg_basic() {
        let svg = render_svg(&diagram(), &mut StdRng::seed_from_u64(1));
        assert!(svg.contains("<svg"));
        assert!(svg.contains("width=\"800\" height=\"800\""));
        assert!(svg.contains(">12</text>"));
        assert_eq!(svg.matches("<text").count(), 12);
    }

    #[test]
    fn cloned_generators_render_identically() {
        let seeded = StdRng::seed_from_u64(2024);
        let first = render_svg(&diagram(), &mut seeded.clone());
        let second = render_svg(&diagram(), &mut seeded.clone());
        assert_eq!(first, second);
    }

    #[test]
    fn different_seeds_usually_differ() {
        let seeds: Vec<String> = (0..8)
            .map(|seed| render_svg(&diagram(), &mut StdRng::seed_from_u64(seed)))
            .collect();
        assert!(seeds.iter().any(|svg| svg != &seeds[0]));
    }

    #[test]
    fn artifacts_written_to_targets() {
        let dir = std::env::temp_dir().join(format!("sector-wheel-render-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let targets = OutputTargets {
            svg: Some(dir.join("out.svg")),
            png: None,
            scene_dump: Some(dir.join("scene.json")),
            fonts_dir: None,
        };
        let config = DiagramConfig::try_from(DiagramSettings {
            sectors: 6,
            ..DiagramSettings::default()
        })
        .unwrap();
        let diagram = Diagram::with_overlay(config, Theme::light(), Overlay::NotConfigured);
        let summary = render_artifacts(&diagram, 99, &targets).unwrap();
        assert_eq!(summary.seed, 99);
        assert_eq!(summary.written, vec![dir.join("out.svg"), dir.join("scene.json")]);

        let svg = std::fs::read_to_string(dir.join("out.svg")).unwrap();
        assert_eq!(svg, render_svg(&diagram, &mut StdRng::seed_from_u64(99)));
        let dump: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(dir.join("scene.json")).unwrap()).unwrap();
        assert_eq!(dump["seed"], 99);
        std::fs::remove_dir_all(&dir).ok();
    }

    #[test]
    fn svg_write_failure_names_the_path() {
        let path = std::env::temp_dir()
            .join(format!("sector-wheel-missing-{}", std::process::id()))
            .join("out.svg");
        let err = write_output_svg("<svg/>", &path).unwrap_err();
        assert!(format!("{err:#}").contains(&path.display().to_string()));
    }

    #[cfg(feature = "png")]
    #[test]
    fn png_has_configured_dimensions() {
        let path = std::env::temp_dir().join(format!("sector-wheel-png-{}.png", std::process::id()));
        let config = DiagramConfig::try_from(DiagramSettings {
            width: 320,
            height: 240,
            radius: 100.0,
            ..DiagramSettings::default()
        })
        .unwrap();
        let diagram = Diagram::with_overlay(config, Theme::classic(), Overlay::NotConfigured);
        let svg = render_svg(&diagram, &mut StdRng::seed_from_u64(5));
        write_output_png(&svg, &path, &diagram.config, None).unwrap();

        let decoded = image::open(&path).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!((decoded.width(), decoded.height()), (320, 240));
        let rgba = decoded.to_rgba8();
        // (249, 132) sits at 8 degrees, radius 90: clear of spokes, labels and midpoints.
        assert_eq!(rgba.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(rgba.get_pixel(249, 132).0, [127, 127, 127, 255]);
    }
}
