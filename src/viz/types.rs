//! Public types and constants for the visualization module.

use serde::Deserialize;

/// Legend placement options.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LegendMode {
    /// Overlay legend inside the plotting area (may overlap data).
    Inside,
    /// Separate legend panel on the right side.
    Right,
    /// Separate legend band at the top.
    Top,
    /// Separate legend band at the bottom.
    Bottom,
}

/// Horizontal band below the chart keeps labels close to the x-axis start.
pub const DEFAULT_LEGEND_MODE: LegendMode = LegendMode::Bottom;

/// Which chart to draw from a set of rows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChartKind {
    /// One line per country, value against year.
    #[default]
    Lines,
    /// One bar per country for the latest year present in the rows.
    LatestBar,
}

/// Rendering options shared by every chart kind.
#[derive(Debug, Clone, PartialEq)]
pub struct ChartOptions {
    pub width: u32,
    pub height: u32,
    /// Indicator label; used for the default title and the Y-axis unit.
    pub indicator_label: String,
    /// Replaces the default title when set.
    pub title: Option<String>,
    /// Log-scaled Y axis (line charts only).
    pub log_scale: bool,
    /// Draw a point marker at every observation (line charts only).
    pub markers: bool,
    pub legend: LegendMode,
    /// Locale tag for tick labels, e.g. `en` or `de`.
    pub locale: String,
}

impl Default for ChartOptions {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 600,
            indicator_label: String::new(),
            title: None,
            log_scale: false,
            markers: true,
            legend: DEFAULT_LEGEND_MODE,
            locale: "en".to_string(),
        }
    }
}
