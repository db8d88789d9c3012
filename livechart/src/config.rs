//! Chart and viewer configuration.
//!
//! Charts are declared once, up front, and never change while mounted.
//! Everything here loads from JSON5:
//!
//! ```json5
//! {
//!     zenoh: { mode: "peer" },
//!     charts: {
//!         status: {
//!             title: "Server Events",
//!             series: [
//!                 { label: "CPU", color: "red", scale: "%", format: { decimals: 1, suffix: "%" } },
//!             ],
//!             axes: [{ scale: "%", format: { decimals: 1, suffix: "%" } }],
//!         },
//!     },
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::path::{Path, PathBuf};

use livechart_common::config::validate_key_prefix;
use livechart_common::{
    Error, KEY_PREFIX, LoggingConfig, Result, ZenohConfig, load_config, load_config_or_default,
    validate_chart_id,
};

use crate::view::formatting::{PLACEHOLDER, format_fixed, trim_fixed};

/// Default config file name under the user config directory.
pub const CONFIG_FILE_NAME: &str = "charts.json5";

/// Viewer application configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ViewerConfig {
    /// Zenoh connection settings.
    #[serde(default)]
    pub zenoh: ZenohConfig,

    /// Key expression prefix for chart events.
    #[serde(default = "default_key_prefix")]
    pub key_prefix: String,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Color theme.
    #[serde(default)]
    pub theme: AppTheme,

    /// Charts to mount, keyed by chart id.
    #[serde(default = "default_charts")]
    pub charts: BTreeMap<String, ChartConfig>,
}

fn default_key_prefix() -> String {
    KEY_PREFIX.to_string()
}

fn default_charts() -> BTreeMap<String, ChartConfig> {
    BTreeMap::from([("status".to_string(), ChartConfig::server_events())])
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            zenoh: ZenohConfig::default(),
            key_prefix: default_key_prefix(),
            logging: LoggingConfig::default(),
            theme: AppTheme::default(),
            charts: default_charts(),
        }
    }
}

impl ViewerConfig {
    /// Load and validate a configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let config: ViewerConfig = load_config(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from the user config directory, falling back to defaults.
    pub fn load_default() -> Result<Self> {
        let config: ViewerConfig = match default_config_path() {
            Some(path) => load_config_or_default(path)?,
            None => ViewerConfig::default(),
        };
        config.validate()?;
        Ok(config)
    }

    /// Validate connection settings and every chart.
    pub fn validate(&self) -> Result<()> {
        self.zenoh.validate()?;
        validate_key_prefix(&self.key_prefix)?;

        for (id, chart) in &self.charts {
            validate_chart_id(id)?;
            chart
                .validate()
                .map_err(|e| Error::Config(format!("chart '{}': {}", id, e)))?;
        }

        Ok(())
    }
}

/// `<config dir>/livechart/charts.json5`, if the platform has a config dir.
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("livechart").join(CONFIG_FILE_NAME))
}

/// Light or dark application theme.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppTheme {
    #[default]
    Dark,
    Light,
}

impl AppTheme {
    pub fn to_iced_theme(self) -> iced::Theme {
        match self {
            AppTheme::Dark => iced::Theme::Dark,
            AppTheme::Light => iced::Theme::Light,
        }
    }
}

/// Static visual configuration of one chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartConfig {
    /// Title shown above the plot.
    #[serde(default)]
    pub title: String,

    /// Maximum plot width in logical pixels. Narrower windows shrink it.
    #[serde(default = "default_width")]
    pub width: f32,

    /// Surface height in logical pixels.
    #[serde(default = "default_height")]
    pub height: f32,

    /// Series definitions, in legend order.
    pub series: Vec<SeriesConfig>,

    /// Y axes. Scales without an axis are still scaled, just not labelled.
    #[serde(default)]
    pub axes: Vec<AxisConfig>,

    /// Unit of numeric labels.
    #[serde(default)]
    pub time_unit: TimeUnit,
}

fn default_width() -> f32 {
    1920.0
}

fn default_height() -> f32 {
    600.0
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self::server_events()
    }
}

impl ChartConfig {
    /// CPU, RAM and TCP-out traffic on a percent axis and a megabyte axis.
    pub fn server_events() -> Self {
        let percent = ValueFormat::new(1, "%");
        let megabytes = ValueFormat::new(2, " MB");

        Self {
            title: "Server Events".to_string(),
            width: default_width(),
            height: default_height(),
            series: vec![
                SeriesConfig::new("CPU", "red", "%", percent.clone()),
                SeriesConfig::new("RAM", "blue", "%", percent.clone()),
                SeriesConfig::new("TCP Out", "green", "mb", megabytes.clone()),
            ],
            axes: vec![
                AxisConfig::new("%", percent),
                AxisConfig {
                    side: AxisSide::Right,
                    size: Some(60.0),
                    grid: false,
                    ..AxisConfig::new("mb", megabytes)
                },
            ],
            time_unit: TimeUnit::default(),
        }
    }

    /// Position of a series by label.
    pub fn series_index(&self, label: &str) -> Option<usize> {
        self.series.iter().position(|s| s.label == label)
    }

    /// Distinct scale names, in order of first use by a series.
    pub fn scales(&self) -> Vec<&str> {
        let mut scales: Vec<&str> = Vec::new();
        for series in &self.series {
            if !scales.contains(&series.scale.as_str()) {
                scales.push(&series.scale);
            }
        }
        scales
    }

    /// The axis drawn for a scale, if any.
    pub fn axis_for(&self, scale: &str) -> Option<&AxisConfig> {
        self.axes.iter().find(|a| a.scale == scale)
    }

    /// Check the declaration is drawable.
    pub fn validate(&self) -> std::result::Result<(), String> {
        if self.series.is_empty() {
            return Err("at least one series is required".to_string());
        }

        if !(self.width > 0.0 && self.height > 0.0) {
            return Err(format!(
                "surface size must be positive, got {}x{}",
                self.width, self.height
            ));
        }

        let mut seen = HashSet::new();
        for series in &self.series {
            if series.label.is_empty() {
                return Err("series label must not be empty".to_string());
            }
            if !seen.insert(series.label.as_str()) {
                return Err(format!("duplicate series label '{}'", series.label));
            }
            if series.color.rgb().is_none() {
                return Err(format!(
                    "series '{}' has invalid color '{}'",
                    series.label, series.color.0
                ));
            }
            if series.width <= 0.0 {
                return Err(format!("series '{}' has non-positive width", series.label));
            }
        }

        let mut axis_scales = HashSet::new();
        for axis in &self.axes {
            if !axis_scales.insert(axis.scale.as_str()) {
                return Err(format!("duplicate axis for scale '{}'", axis.scale));
            }
            if let Some([min, max]) = axis.range {
                if !(min < max) {
                    return Err(format!(
                        "axis '{}' range must have min < max, got [{}, {}]",
                        axis.scale, min, max
                    ));
                }
            }
            if !self.series.iter().any(|s| s.scale == axis.scale) {
                tracing::warn!(scale = %axis.scale, "Axis scale is not used by any series");
            }
        }

        Ok(())
    }
}

/// One line in the chart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesConfig {
    /// Name, also the key in update messages.
    pub label: String,

    /// Stroke color.
    pub color: ColorSpec,

    /// Scale the series is plotted against.
    #[serde(default = "default_scale")]
    pub scale: String,

    /// Legend value formatting.
    #[serde(default)]
    pub format: ValueFormat,

    /// Stroke width in logical pixels.
    #[serde(default = "default_stroke_width")]
    pub width: f32,
}

fn default_scale() -> String {
    "y".to_string()
}

fn default_stroke_width() -> f32 {
    1.0
}

impl SeriesConfig {
    pub fn new(
        label: impl Into<String>,
        color: impl Into<String>,
        scale: impl Into<String>,
        format: ValueFormat,
    ) -> Self {
        Self {
            label: label.into(),
            color: ColorSpec(color.into()),
            scale: scale.into(),
            format,
            width: default_stroke_width(),
        }
    }
}

/// How numeric labels map to wall-clock time.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimeUnit {
    /// Epoch milliseconds.
    #[default]
    #[serde(rename = "ms")]
    Milliseconds,
    /// Epoch seconds, possibly fractional.
    #[serde(rename = "s")]
    Seconds,
}

impl TimeUnit {
    /// Convert a label value to epoch milliseconds.
    pub fn to_millis(self, value: f64) -> f64 {
        match self {
            TimeUnit::Milliseconds => value,
            TimeUnit::Seconds => value * 1000.0,
        }
    }
}

/// Which side of the plot an axis sits on.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AxisSide {
    #[default]
    Left,
    Right,
}

/// A labelled Y axis bound to a scale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AxisConfig {
    /// Scale name shared with series.
    pub scale: String,

    #[serde(default)]
    pub side: AxisSide,

    /// Fixed gutter width in logical pixels.
    #[serde(default)]
    pub size: Option<f32>,

    /// Tick label formatting.
    #[serde(default)]
    pub format: ValueFormat,

    /// Draw horizontal grid lines at this axis' ticks.
    #[serde(default = "default_true")]
    pub grid: bool,

    /// Fixed `[min, max]`; auto-ranged from the data when absent.
    #[serde(default)]
    pub range: Option<[f64; 2]>,
}

fn default_true() -> bool {
    true
}

impl AxisConfig {
    pub fn new(scale: impl Into<String>, format: ValueFormat) -> Self {
        Self {
            scale: scale.into(),
            side: AxisSide::Left,
            size: None,
            format,
            grid: true,
            range: None,
        }
    }
}

/// Fixed-decimal number formatting with a unit suffix.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ValueFormat {
    #[serde(default = "default_decimals")]
    pub decimals: usize,

    #[serde(default)]
    pub suffix: String,
}

fn default_decimals() -> usize {
    2
}

impl Default for ValueFormat {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            suffix: String::new(),
        }
    }
}

impl ValueFormat {
    pub fn new(decimals: usize, suffix: impl Into<String>) -> Self {
        Self {
            decimals,
            suffix: suffix.into(),
        }
    }

    /// Legend form: `"10.5%"`, or the placeholder for a missing sample.
    pub fn format(&self, value: Option<f64>) -> String {
        match value {
            Some(v) if v.is_finite() => format!("{}{}", format_fixed(v, self.decimals), self.suffix),
            _ => PLACEHOLDER.to_string(),
        }
    }

    /// Axis tick form, without trailing zeros: `"10%"`, `"1.5 MB"`.
    pub fn format_tick(&self, value: f64) -> String {
        format!(
            "{}{}",
            trim_fixed(&format_fixed(value, self.decimals)),
            self.suffix
        )
    }
}

/// A color as written in config: `#rrggbb` or a basic CSS name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ColorSpec(pub String);

impl ColorSpec {
    /// Resolve to 8-bit RGB.
    pub fn rgb(&self) -> Option<[u8; 3]> {
        let spec = self.0.trim();

        if let Some(hex) = spec.strip_prefix('#') {
            if hex.len() != 6 || !hex.is_ascii() {
                return None;
            }
            let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).ok();
            return Some([channel(0)?, channel(2)?, channel(4)?]);
        }

        let rgb = match spec.to_ascii_lowercase().as_str() {
            "black" => [0, 0, 0],
            "white" => [255, 255, 255],
            "red" => [255, 0, 0],
            "green" => [0, 128, 0],
            "blue" => [0, 0, 255],
            "yellow" => [255, 255, 0],
            "orange" => [255, 165, 0],
            "purple" => [128, 0, 128],
            "cyan" => [0, 255, 255],
            "magenta" => [255, 0, 255],
            "gray" | "grey" => [128, 128, 128],
            _ => return None,
        };
        Some(rgb)
    }
}

impl From<&str> for ColorSpec {
    fn from(s: &str) -> Self {
        ColorSpec(s.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use livechart_common::parse_config;

    #[test]
    fn test_server_events_defaults() {
        let config = ChartConfig::server_events();

        assert_eq!(config.title, "Server Events");
        assert_eq!(config.series.len(), 3);
        assert_eq!(config.series_index("RAM"), Some(1));
        assert_eq!(config.scales(), vec!["%", "mb"]);

        let mb = config.axis_for("mb").unwrap();
        assert_eq!(mb.side, AxisSide::Right);
        assert_eq!(mb.size, Some(60.0));
        assert!(!mb.grid);

        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_parse_viewer_config() {
        let json5 = r##"
        {
            zenoh: { mode: "client", connect: ["tcp/localhost:7447"] },
            theme: "light",
            charts: {
                temps: {
                    title: "Temperatures",
                    height: 300,
                    series: [
                        { label: "Inlet", color: "#ff8800", scale: "c", format: { decimals: 1, suffix: " °C" } },
                        { label: "Outlet", color: "purple", scale: "c" },
                    ],
                    axes: [{ scale: "c", range: [0, 100] }],
                },
            },
        }
        "##;

        let config: ViewerConfig = parse_config(json5).unwrap();
        config.validate().unwrap();

        assert_eq!(config.theme, AppTheme::Light);
        assert_eq!(config.key_prefix, "livechart");

        let temps = &config.charts["temps"];
        assert_eq!(temps.width, 1920.0);
        assert_eq!(temps.height, 300.0);
        assert_eq!(temps.series[1].format, ValueFormat::default());
        assert_eq!(temps.axes[0].range, Some([0.0, 100.0]));
        assert!(temps.axes[0].grid);
        assert_eq!(temps.time_unit, TimeUnit::Milliseconds);
    }

    #[test]
    fn test_parse_time_unit() {
        let chart: ChartConfig =
            parse_config(r#"{ series: [{ label: "CPU", color: "red" }], time_unit: "s" }"#).unwrap();
        assert_eq!(chart.time_unit, TimeUnit::Seconds);
        assert_eq!(chart.time_unit.to_millis(1.5), 1500.0);
        assert_eq!(TimeUnit::Milliseconds.to_millis(1.5), 1.5);

        assert!(parse_config::<ChartConfig>(r#"{ series: [], time_unit: "minutes" }"#).is_err());
    }

    #[test]
    fn test_default_viewer_config_has_status_chart() {
        let config: ViewerConfig = parse_config("{}").unwrap();
        assert_eq!(config.charts.len(), 1);
        assert_eq!(config.charts["status"], ChartConfig::server_events());
    }

    #[test]
    fn test_validate_rejects_bad_charts() {
        let mut config = ChartConfig::server_events();
        config.series[1].label = "CPU".to_string();
        assert!(config.validate().unwrap_err().contains("duplicate"));

        let mut config = ChartConfig::server_events();
        config.series[0].color = ColorSpec::from("chartreuse-ish");
        assert!(config.validate().is_err());

        let mut config = ChartConfig::server_events();
        config.axes[0].range = Some([10.0, 10.0]);
        assert!(config.validate().is_err());

        let mut config = ChartConfig::server_events();
        config.series.clear();
        assert!(config.validate().is_err());

        let mut config = ChartConfig::server_events();
        config.height = 0.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_viewer_rejects_bad_chart_id() {
        let mut config = ViewerConfig::default();
        config
            .charts
            .insert("a/b".to_string(), ChartConfig::server_events());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_value_format() {
        let percent = ValueFormat::new(1, "%");
        assert_eq!(percent.format(Some(10.0)), "10.0%");
        assert_eq!(percent.format(Some(10.46)), "10.5%");
        assert_eq!(percent.format(None), "-");
        assert_eq!(percent.format(Some(f64::NAN)), "-");

        let mb = ValueFormat::new(2, " MB");
        assert_eq!(mb.format(Some(1.255)), "1.25 MB");
        assert_eq!(mb.format_tick(1.5), "1.5 MB");
        assert_eq!(mb.format_tick(2.0), "2 MB");
        assert_eq!(percent.format_tick(10.0), "10%");
        assert_eq!(percent.format_tick(-0.01), "0%");
    }

    #[test]
    fn test_color_spec() {
        assert_eq!(ColorSpec::from("red").rgb(), Some([255, 0, 0]));
        assert_eq!(ColorSpec::from("Blue").rgb(), Some([0, 0, 255]));
        assert_eq!(ColorSpec::from("#10a0FF").rgb(), Some([16, 160, 255]));
        assert_eq!(ColorSpec::from("#10a0F").rgb(), None);
        assert_eq!(ColorSpec::from("#zzzzzz").rgb(), None);
        assert_eq!(ColorSpec::from("teal-ish").rgb(), None);
    }
}
