use crate::canvas::Color;
use crate::geometry::Point;
use crate::theme::Theme;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::f64::consts::{FRAC_PI_2, TAU};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_FONT_FAMILY: &str = "sans-serif";

/// Raw, unvalidated diagram parameters. Turn into a [`DiagramConfig`] with
/// `DiagramConfig::try_from`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DiagramSettings {
    pub width: u32,
    pub height: u32,
    pub radius: f64,
    pub sectors: u32,
    pub start_angle: f64,
    pub end_angle: f64,
    pub separator_width: f64,
    pub text_rotation: f64,
    pub font_family: String,
    pub font_size: f64,
    pub overlay: Option<PathBuf>,
}

impl Default for DiagramSettings {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            radius: 300.0,
            sectors: 12,
            start_angle: 0.0,
            end_angle: TAU,
            separator_width: 1.0,
            text_rotation: FRAC_PI_2,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: 32.0,
            overlay: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    #[error("canvas must be at least 1x1 (got {width}x{height})")]
    EmptyCanvas { width: u32, height: u32 },
    #[error("circle radius must be positive and finite (got {0})")]
    InvalidRadius(f64),
    #[error("sector count must be at least 1")]
    NoSectors,
    #[error("sweep angles must be finite (start {start}, end {end})")]
    NonFiniteSweep { start: f64, end: f64 },
    #[error("sweep end angle {end} must be greater than start angle {start}")]
    EmptySweep { start: f64, end: f64 },
    #[error("separator width must be non-negative and finite (got {0})")]
    InvalidSeparatorWidth(f64),
    #[error("text rotation must be finite (got {0})")]
    InvalidTextRotation(f64),
    #[error("font size must be positive and finite (got {0})")]
    InvalidFontSize(f64),
}

/// Validated, immutable diagram description.
#[derive(Debug, Clone, PartialEq)]
pub struct DiagramConfig {
    width: u32,
    height: u32,
    radius: f64,
    sectors: u32,
    start_angle: f64,
    end_angle: f64,
    separator_width: f64,
    text_rotation: f64,
    font_family: String,
    font_size: f64,
    overlay: Option<PathBuf>,
}

impl TryFrom<DiagramSettings> for DiagramConfig {
    type Error = ConfigError;

    fn try_from(settings: DiagramSettings) -> Result<Self, Self::Error> {
        if settings.width == 0 || settings.height == 0 {
            return Err(ConfigError::EmptyCanvas {
                width: settings.width,
                height: settings.height,
            });
        }
        if !settings.radius.is_finite() || settings.radius <= 0.0 {
            return Err(ConfigError::InvalidRadius(settings.radius));
        }
        if settings.sectors == 0 {
            return Err(ConfigError::NoSectors);
        }
        let (start, end) = (settings.start_angle, settings.end_angle);
        if !start.is_finite() || !end.is_finite() {
            return Err(ConfigError::NonFiniteSweep { start, end });
        }
        if end <= start {
            return Err(ConfigError::EmptySweep { start, end });
        }
        if !settings.separator_width.is_finite() || settings.separator_width < 0.0 {
            return Err(ConfigError::InvalidSeparatorWidth(settings.separator_width));
        }
        if !settings.text_rotation.is_finite() {
            return Err(ConfigError::InvalidTextRotation(settings.text_rotation));
        }
        if !settings.font_size.is_finite() || settings.font_size <= 0.0 {
            return Err(ConfigError::InvalidFontSize(settings.font_size));
        }

        let font_family = if settings.font_family.trim().is_empty() {
            DEFAULT_FONT_FAMILY.to_string()
        } else {
            settings.font_family
        };
        let overlay = settings
            .overlay
            .filter(|path| !path.as_os_str().is_empty());

        Ok(Self {
            width: settings.width,
            height: settings.height,
            radius: settings.radius,
            sectors: settings.sectors,
            start_angle: start,
            end_angle: end,
            separator_width: settings.separator_width,
            text_rotation: settings.text_rotation,
            font_family,
            font_size: settings.font_size,
            overlay,
        })
    }
}

impl Default for DiagramConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 800,
            radius: 300.0,
            sectors: 12,
            start_angle: 0.0,
            end_angle: TAU,
            separator_width: 1.0,
            text_rotation: FRAC_PI_2,
            font_family: DEFAULT_FONT_FAMILY.to_string(),
            font_size: 32.0,
            overlay: None,
        }
    }
}

impl DiagramConfig {
    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn radius(&self) -> f64 {
        self.radius
    }

    pub fn sectors(&self) -> u32 {
        self.sectors
    }

    pub fn start_angle(&self) -> f64 {
        self.start_angle
    }

    pub fn end_angle(&self) -> f64 {
        self.end_angle
    }

    pub fn separator_width(&self) -> f64 {
        self.separator_width
    }

    pub fn text_rotation(&self) -> f64 {
        self.text_rotation
    }

    pub fn font_family(&self) -> &str {
        &self.font_family
    }

    pub fn font_size(&self) -> f64 {
        self.font_size
    }

    pub fn overlay(&self) -> Option<&Path> {
        self.overlay.as_deref()
    }

    /// Integer halves of the canvas size, so odd sizes round down.
    pub fn center(&self) -> Point {
        Point::new((self.width / 2) as f64, (self.height / 2) as f64)
    }
}

/// Everything a config file can set. Diagram settings stay unvalidated so
/// command-line overrides can still be layered on top.
#[derive(Debug, Clone, Default)]
pub struct Config {
    pub diagram: DiagramSettings,
    pub theme: Theme,
    pub seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ConfigFile {
    theme: Option<String>,
    theme_variables: Option<ThemeVariables>,
    width: Option<u32>,
    height: Option<u32>,
    radius: Option<NumberOrString>,
    sectors: Option<u32>,
    start_angle: Option<NumberOrString>,
    end_angle: Option<NumberOrString>,
    separator_width: Option<NumberOrString>,
    text_rotation: Option<NumberOrString>,
    font_family: Option<String>,
    font_size: Option<NumberOrString>,
    overlay: Option<PathBuf>,
    seed: Option<u64>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ThemeVariables {
    background: Option<Color>,
    circle_fill: Option<Color>,
    separator_color: Option<Color>,
    label_color: Option<Color>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum NumberOrString {
    Number(f64),
    String(String),
}

impl NumberOrString {
    fn as_f64(&self) -> anyhow::Result<f64> {
        match self {
            NumberOrString::Number(val) => Ok(*val),
            NumberOrString::String(val) => val
                .trim()
                .trim_end_matches("px")
                .trim()
                .parse::<f64>()
                .with_context(|| format!("'{val}' is not a number")),
        }
    }
}

/// `Some(value)` for a present field, an error naming `field` when it does
/// not hold a number.
fn number_field(field: &str, value: Option<&NumberOrString>) -> anyhow::Result<Option<f64>> {
    value
        .map(|value| value.as_f64().with_context(|| format!("config field '{field}'")))
        .transpose()
}

fn parse_config_file(contents: &str) -> anyhow::Result<ConfigFile> {
    match serde_json::from_str::<ConfigFile>(contents) {
        Ok(parsed) => Ok(parsed),
        Err(json_err) => match json5::from_str::<ConfigFile>(contents) {
            Ok(parsed) => Ok(parsed),
            Err(_) => Err(json_err.into()),
        },
    }
}

pub fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = Config::default();
    let Some(path) = path else {
        return Ok(config);
    };

    let contents = std::fs::read_to_string(path)
        .with_context(|| format!("read config file '{}'", path.display()))?;
    let parsed = parse_config_file(&contents)
        .with_context(|| format!("parse config file '{}'", path.display()))?;

    if let Some(theme_name) = parsed.theme.as_deref() {
        match Theme::by_name(theme_name) {
            Some(theme) => config.theme = theme,
            None => tracing::warn!(theme = theme_name, "unknown theme, keeping classic"),
        }
    }

    if let Some(vars) = parsed.theme_variables {
        if let Some(v) = vars.background {
            config.theme.background = v;
        }
        if let Some(v) = vars.circle_fill {
            config.theme.circle_fill = v;
        }
        if let Some(v) = vars.separator_color {
            config.theme.separator_color = v;
        }
        if let Some(v) = vars.label_color {
            config.theme.label_color = v;
        }
    }

    let diagram = &mut config.diagram;
    if let Some(v) = parsed.width {
        diagram.width = v;
    }
    if let Some(v) = parsed.height {
        diagram.height = v;
    }
    if let Some(v) = number_field("radius", parsed.radius.as_ref())? {
        diagram.radius = v;
    }
    if let Some(v) = parsed.sectors {
        diagram.sectors = v;
    }
    if let Some(v) = number_field("startAngle", parsed.start_angle.as_ref())? {
        diagram.start_angle = v;
    }
    if let Some(v) = number_field("endAngle", parsed.end_angle.as_ref())? {
        diagram.end_angle = v;
    }
    if let Some(v) = number_field("separatorWidth", parsed.separator_width.as_ref())? {
        diagram.separator_width = v;
    }
    if let Some(v) = number_field("textRotation", parsed.text_rotation.as_ref())? {
        diagram.text_rotation = v;
    }
    if let Some(v) = parsed.font_family {
        diagram.font_family = v;
    }
    if let Some(v) = number_field("fontSize", parsed.font_size.as_ref())? {
        diagram.font_size = v;
    }
    if parsed.overlay.is_some() {
        diagram.overlay = parsed.overlay;
    }
    config.seed = parsed.seed;

    Ok(config)
}
