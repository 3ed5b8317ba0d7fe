use crate::compose::Diagram;
use crate::config::{Config, DiagramConfig, load_config};
use crate::render::{OutputTargets, render_artifacts};
use anyhow::{Context, Result};
use clap::{ArgAction, Parser, ValueEnum};
use rand::Rng;
use std::path::{Path, PathBuf};

/// Compiled-in resource directory: overlay sprites are read from here and
/// outputs are written here.
pub const DEFAULT_RESOURCES_DIR: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/resources");

const DEFAULT_OVERLAY: &str = "Sprites/sun.png";

#[derive(Parser, Debug)]
#[command(name = "sector-wheel", version, about = "Render a numbered sector wheel to SVG and PNG")]
pub struct Args {
    /// Config JSON/JSON5 file
    #[arg(short = 'c', long = "config")]
    pub config: Option<PathBuf>,

    /// Resource directory (overlay sprites, fonts/ and outputs)
    #[arg(short = 'r', long = "resources-dir")]
    pub resources_dir: Option<PathBuf>,

    /// Seed for the decorative-line shuffle. Random when omitted.
    #[arg(short = 's', long = "seed")]
    pub seed: Option<u64>,

    /// Which artifacts to write
    #[arg(short = 'e', long = "format", value_enum, default_value = "both")]
    pub format: OutputFormat,

    /// Also write the recorded draw calls as JSON
    #[arg(long = "dump-ops")]
    pub dump_ops: Option<PathBuf>,

    /// Canvas width
    #[arg(short = 'w', long = "width")]
    pub width: Option<u32>,

    /// Canvas height
    #[arg(short = 'H', long = "height")]
    pub height: Option<u32>,

    /// Circle radius
    #[arg(long = "radius")]
    pub radius: Option<f64>,

    /// Number of sectors
    #[arg(short = 'n', long = "sectors")]
    pub sectors: Option<u32>,

    /// Overlay image, relative paths resolve against the resource directory
    #[arg(long = "overlay", conflicts_with = "no_overlay")]
    pub overlay: Option<PathBuf>,

    /// Skip the centre overlay
    #[arg(long = "no-overlay")]
    pub no_overlay: bool,

    /// More log output (-v info, -vv debug)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    pub verbose: u8,
}

#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Both,
    Svg,
    Png,
}

pub fn run() -> Result<()> {
    let args = Args::parse();
    init_tracing(args.verbose);

    let resources_dir = args
        .resources_dir
        .clone()
        .unwrap_or_else(|| PathBuf::from(DEFAULT_RESOURCES_DIR));
    let config = load_config(args.config.as_deref())?;
    let seed = args
        .seed
        .or(config.seed)
        .unwrap_or_else(|| rand::rng().random());
    tracing::info!(seed, "decorative line seed");

    let diagram_config = build_diagram_config(&args, config.clone(), &resources_dir)?;
    let diagram = Diagram::new(diagram_config, config.theme);

    std::fs::create_dir_all(&resources_dir)
        .with_context(|| format!("create resource dir '{}'", resources_dir.display()))?;
    let targets = resolve_targets(&args, &resources_dir);
    let summary = render_artifacts(&diagram, seed, &targets)?;
    for path in &summary.written {
        eprintln!("wrote {}", path.display());
    }
    Ok(())
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => tracing::Level::WARN,
        1 => tracing::Level::INFO,
        _ => tracing::Level::DEBUG,
    };
    let _ = tracing_subscriber::fmt()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn build_diagram_config(args: &Args, config: Config, resources_dir: &Path) -> Result<DiagramConfig> {
    let mut settings = config.diagram;
    if let Some(v) = args.width {
        settings.width = v;
    }
    if let Some(v) = args.height {
        settings.height = v;
    }
    if let Some(v) = args.radius {
        settings.radius = v;
    }
    if let Some(v) = args.sectors {
        settings.sectors = v;
    }

    // An empty overlay path in a config file turns the overlay off.
    settings.overlay = if args.no_overlay {
        None
    } else {
        Some(
            args.overlay
                .clone()
                .or(settings.overlay)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_OVERLAY)),
        )
        .filter(|path| !path.as_os_str().is_empty())
        .map(|path| resolve_resource(resources_dir, &path))
    };

    DiagramConfig::try_from(settings).context("invalid diagram configuration")
}

fn resolve_resource(resources_dir: &Path, path: &Path) -> PathBuf {
    if path.is_absolute() {
        path.to_path_buf()
    } else {
        resources_dir.join(path)
    }
}

fn resolve_targets(args: &Args, resources_dir: &Path) -> OutputTargets {
    let mut targets = OutputTargets::in_resources(resources_dir);
    match args.format {
        OutputFormat::Both => {}
        OutputFormat::Svg => targets.png = None,
        OutputFormat::Png => targets.svg = None,
    }
    targets.scene_dump = args.dump_ops.clone();
    targets
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(extra: &[&str]) -> Args {
        let mut argv = vec!["sector-wheel"];
        argv.extend_from_slice(extra);
        Args::try_parse_from(argv).unwrap()
    }

    #[test]
    fn defaults_write_both_outputs_into_resources() {
        let args = parse(&[]);
        let dir = Path::new("/tmp/wheel");
        let targets = resolve_targets(&args, dir);
        assert_eq!(targets.svg, Some(dir.join("output.svg")));
        assert_eq!(targets.png, Some(dir.join("output.png")));
        assert!(targets.scene_dump.is_none());
    }

    #[test]
    fn format_selects_single_output() {
        let dir = Path::new("/tmp/wheel");
        let svg_only = resolve_targets(&parse(&["--format", "svg"]), dir);
        assert!(svg_only.png.is_none());
        let png_only = resolve_targets(&parse(&["-e", "png", "--dump-ops", "ops.json"]), dir);
        assert!(png_only.svg.is_none());
        assert_eq!(png_only.scene_dump, Some(PathBuf::from("ops.json")));
    }

    #[test]
    fn overrides_layer_over_config() {
        let args = parse(&["-n", "8", "--radius", "200", "-w", "640", "-H", "480"]);
        let config = build_diagram_config(&args, Config::default(), Path::new("/res")).unwrap();
        assert_eq!(config.sectors(), 8);
        assert_eq!(config.radius(), 200.0);
        assert_eq!((config.width(), config.height()), (640, 480));
        assert_eq!(config.overlay(), Some(Path::new("/res/Sprites/sun.png")));
    }

    #[test]
    fn overlay_flags() {
        let dir = Path::new("/res");
        let none = build_diagram_config(&parse(&["--no-overlay"]), Config::default(), dir).unwrap();
        assert!(none.overlay().is_none());
        let abs = build_diagram_config(&parse(&["--overlay", "/abs/moon.png"]), Config::default(), dir)
            .unwrap();
        assert_eq!(abs.overlay(), Some(Path::new("/abs/moon.png")));
        assert!(Args::try_parse_from(["sector-wheel", "--overlay", "x.png", "--no-overlay"]).is_err());
    }

    #[test]
    fn empty_overlay_path_disables_overlay() {
        let dir = Path::new("/res");
        let path = std::env::temp_dir().join(format!(
            "sector-wheel-cli-overlay-{}.json",
            std::process::id()
        ));
        std::fs::write(&path, r#"{"overlay": ""}"#).unwrap();
        let config = load_config(Some(&path)).unwrap();
        std::fs::remove_file(&path).ok();
        assert_eq!(config.diagram.overlay, Some(PathBuf::new()));

        let diagram = build_diagram_config(&parse(&[]), config, dir).unwrap();
        assert!(diagram.overlay().is_none());
    }

    #[test]
    fn invalid_override_is_reported() {
        let err = build_diagram_config(&parse(&["-n", "0"]), Config::default(), Path::new("/res"))
            .unwrap_err();
        assert!(format!("{err:#}").contains("sector count must be at least 1"));
    }
}
