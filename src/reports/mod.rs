//! Building blocks shared by every view: headline metrics and chart specs.
//!
//! Charts are not rendered server side. A [`ChartSpec`] names the chart kind,
//! its title and axes, and carries the plotted values; the dashboard page turns
//! it into SVG.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// A headline number shown above a view, already formatted for display.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Metric {
    #[schema(example = "total_sales")]
    pub key: String,
    #[schema(example = "Total Sales")]
    pub label: String,
    #[schema(example = "Rp 1,234,500,000")]
    pub value: String,
    /// Secondary figure rendered next to the value, e.g. a margin percentage
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delta: Option<String>,
}

impl Metric {
    pub fn new(key: &str, label: &str, value: impl Into<String>) -> Self {
        Self {
            key: key.to_string(),
            label: label.to_string(),
            value: value.into(),
            delta: None,
        }
    }

    pub fn with_delta(mut self, delta: impl Into<String>) -> Self {
        self.delta = Some(delta.into());
        self
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    Line,
    Bar,
    Pie,
    Box,
}

/// One x/y pair. `y` is `None` where the value is undefined (e.g. no forecast yet).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Point {
    pub x: String,
    pub y: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Series {
    pub name: String,
    pub points: Vec<Point>,
}

impl Series {
    pub fn new(name: &str, points: impl IntoIterator<Item = (String, Option<f64>)>) -> Self {
        Self {
            name: name.to_string(),
            points: points.into_iter().map(|(x, y)| Point { x, y }).collect(),
        }
    }

    /// Series where every point is defined.
    pub fn dense(name: &str, points: impl IntoIterator<Item = (String, f64)>) -> Self {
        Self::new(name, points.into_iter().map(|(x, y)| (x, Some(y))))
    }
}

/// Five-number summary for one box of a box plot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct BoxStats {
    pub label: String,
    pub count: usize,
    pub min: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub max: f64,
}

impl BoxStats {
    /// Summary of `values` using linear interpolation between closest ranks.
    /// Returns `None` for an empty slice.
    pub fn from_values(label: &str, values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let mut sorted = values.to_vec();
        sorted.sort_by(f64::total_cmp);

        Some(Self {
            label: label.to_string(),
            count: sorted.len(),
            min: sorted[0],
            q1: quantile(&sorted, 0.25),
            median: quantile(&sorted, 0.5),
            q3: quantile(&sorted, 0.75),
            max: sorted[sorted.len() - 1],
        })
    }
}

fn quantile(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    sorted[lo] + (sorted[hi] - sorted[lo]) * (pos - lo as f64)
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x_label: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y_label: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub series: Vec<Series>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub boxes: Vec<BoxStats>,
}

impl ChartSpec {
    fn new(kind: ChartKind, title: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.into(),
            x_label: None,
            y_label: None,
            series: Vec::new(),
            boxes: Vec::new(),
        }
    }

    pub fn line(title: impl Into<String>) -> Self {
        Self::new(ChartKind::Line, title)
    }

    pub fn bar(title: impl Into<String>) -> Self {
        Self::new(ChartKind::Bar, title)
    }

    /// Pie chart; slice labels are the `x` values of the single series.
    pub fn pie(title: impl Into<String>) -> Self {
        Self::new(ChartKind::Pie, title)
    }

    pub fn box_plot(title: impl Into<String>, boxes: Vec<BoxStats>) -> Self {
        Self {
            boxes,
            ..Self::new(ChartKind::Box, title)
        }
    }

    pub fn axes(mut self, x_label: &str, y_label: &str) -> Self {
        self.x_label = Some(x_label.to_string());
        self.y_label = Some(y_label.to_string());
        self
    }

    pub fn with_series(mut self, series: Series) -> Self {
        self.series.push(series);
        self
    }
}
