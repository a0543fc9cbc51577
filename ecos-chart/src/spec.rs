//! Chart specification model and user chart choices.
//!
//! All specification structs derive `Serialize` so they can be handed to a
//! rendering surface as JSON.

use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;

/// Column holding the statistic's class (e.g. "Market interest rates").
pub const CLASS_COLUMN: &str = "CLASS_NAME";
/// Column holding the statistic's name (e.g. "Base rate").
pub const KEYSTAT_COLUMN: &str = "KEYSTAT_NAME";
/// Column holding the observed value as text.
pub const VALUE_COLUMN: &str = "DATA_VALUE";

/// Error returned when a chart option cannot be parsed from text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptionError(pub String);

impl fmt::Display for ParseOptionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Invalid chart option: {}", self.0)
    }
}

impl std::error::Error for ParseOptionError {}

/// Column the selected values are drawn from. The other name column becomes
/// the x-axis category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GroupBasis {
    #[default]
    ClassName,
    KeystatName,
}

impl GroupBasis {
    pub fn column(&self) -> &'static str {
        match self {
            GroupBasis::ClassName => CLASS_COLUMN,
            GroupBasis::KeystatName => KEYSTAT_COLUMN,
        }
    }

    pub fn x_column(&self) -> &'static str {
        match self {
            GroupBasis::ClassName => KEYSTAT_COLUMN,
            GroupBasis::KeystatName => CLASS_COLUMN,
        }
    }
}

impl FromStr for GroupBasis {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "class-name" | "class" => Ok(GroupBasis::ClassName),
            "keystat-name" | "keystat" => Ok(GroupBasis::KeystatName),
            other => Err(ParseOptionError(format!(
                "grouping basis '{}' (expected class-name or keystat-name)",
                other
            ))),
        }
    }
}

/// How one series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    #[default]
    Bar,
    Line,
}

impl FromStr for ChartKind {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "bar" => Ok(ChartKind::Bar),
            "line" => Ok(ChartKind::Line),
            other => Err(ParseOptionError(format!(
                "chart kind '{}' (expected bar or line)",
                other
            ))),
        }
    }
}

/// Y-axis scale, applied to every y-axis of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Scale {
    #[default]
    Linear,
    Log,
}

impl Scale {
    /// Plotly axis `type` for this scale.
    pub fn axis_type(&self) -> &'static str {
        match self {
            Scale::Linear => "linear",
            Scale::Log => "log",
        }
    }
}

impl FromStr for Scale {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "linear" => Ok(Scale::Linear),
            "log" => Ok(Scale::Log),
            other => Err(ParseOptionError(format!(
                "scale '{}' (expected linear or log)",
                other
            ))),
        }
    }
}

/// Whether the selected values share one set of axes or get one panel each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LayoutMode {
    #[default]
    Combined,
    Faceted,
}

impl FromStr for LayoutMode {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "combined" => Ok(LayoutMode::Combined),
            "faceted" => Ok(LayoutMode::Faceted),
            other => Err(ParseOptionError(format!(
                "layout '{}' (expected combined or faceted)",
                other
            ))),
        }
    }
}

/// The chart shape chosen for a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartPlan {
    /// Exactly two values on left and right y-axes.
    DualAxis,
    /// Any number of values on one set of axes, bars side by side.
    Grouped,
    /// One vertically stacked panel per value, x-axis shared.
    Faceted,
}

impl ChartPlan {
    /// Priority-ordered decision: the first matching arm wins.
    pub fn decide(layout: LayoutMode, selected: usize) -> ChartPlan {
        match (layout, selected) {
            (LayoutMode::Combined, 2) => ChartPlan::DualAxis,
            (LayoutMode::Combined, _) => ChartPlan::Grouped,
            (LayoutMode::Faceted, _) => ChartPlan::Faceted,
        }
    }
}

/// User chart choices for one render cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ChartRequest {
    pub basis: GroupBasis,
    /// Selected values of the basis column, in selection order.
    pub values: Vec<String>,
    /// Chart kind per selected value; values not listed are drawn as bars.
    pub kinds: HashMap<String, ChartKind>,
    pub scale: Scale,
    pub layout: LayoutMode,
}

impl ChartRequest {
    pub fn kind_of(&self, value: &str) -> ChartKind {
        self.kinds.get(value).copied().unwrap_or_default()
    }
}

/// Where a series is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Placement {
    /// The single shared y-axis.
    Shared,
    LeftAxis,
    RightAxis,
    /// Zero-based facet row, top to bottom.
    Facet(usize),
}

/// One plotted series. `x`, `y` and `labels` are parallel; a `None` in `y`
/// is drawn as a gap.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Series {
    pub name: String,
    pub kind: ChartKind,
    pub x: Vec<Option<String>>,
    pub y: Vec<Option<f64>>,
    /// Point labels: the raw `DATA_VALUE` text.
    pub labels: Vec<Option<String>>,
    pub placement: Placement,
    pub color: Option<String>,
}

/// Axis arrangement of a chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum ChartLayout {
    DualAxis {
        left_title: String,
        right_title: String,
    },
    Grouped,
    Faceted {
        /// Panel titles, top to bottom.
        titles: Vec<String>,
    },
}

/// A complete, declarative chart description.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub title: String,
    /// Title of the (shared) x-axis: the category column.
    pub x_title: String,
    pub scale: Scale,
    pub layout: ChartLayout,
    pub series: Vec<Series>,
}

impl ChartSpec {
    /// True when nothing is plotted.
    pub fn is_empty(&self) -> bool {
        self.series.is_empty()
    }
}
