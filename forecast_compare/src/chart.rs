//! Renderable chart description.
//!
//! A [`Figure`] serializes to plotly's JSON figure format, so any
//! plotly-compatible viewer can draw it. [`Figure::to_html`] wraps the JSON
//! in a standalone page.

use crate::error::Result;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Colour of actual observations
pub const ACTUAL_COLOR: &str = "black";
/// Colour of the seasonal model
pub const SEASONAL_COLOR: &str = "#0072B2";
/// Fill colour of the seasonal uncertainty band
pub const BAND_COLOR: &str = "rgba(0, 114, 178, 0.2)";
/// Colour of the boosted tree model in the comparison chart
pub const TREES_COLOR: &str = "orange";
/// Colour of the train/forecast boundary marker
pub const BOUNDARY_COLOR: &str = "green";

const PLOTLY_JS: &str = "https://cdn.plot.ly/plotly-2.27.0.min.js";

/// How a trace is drawn
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TraceMode {
    Markers,
    Lines,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: String,
    pub size: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Line {
    pub color: String,
    pub width: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

/// One named series of points
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Trace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub name: String,
    pub x: Vec<NaiveDate>,
    pub y: Vec<f64>,
    pub mode: TraceMode,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub marker: Option<Marker>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showlegend: Option<bool>,
}

impl Trace {
    /// Scatter of point markers
    pub fn markers(name: &str, x: Vec<NaiveDate>, y: Vec<f64>, color: &str) -> Self {
        Self {
            kind: "scatter",
            name: name.to_string(),
            x,
            y,
            mode: TraceMode::Markers,
            marker: Some(Marker {
                color: color.to_string(),
                size: 4,
            }),
            line: None,
            fill: None,
            fillcolor: None,
            showlegend: None,
        }
    }

    /// Solid line
    pub fn line(name: &str, x: Vec<NaiveDate>, y: Vec<f64>, color: &str) -> Self {
        Self {
            kind: "scatter",
            name: name.to_string(),
            x,
            y,
            mode: TraceMode::Lines,
            marker: None,
            line: Some(Line {
                color: color.to_string(),
                width: 2.0,
                dash: None,
            }),
            fill: None,
            fillcolor: None,
            showlegend: None,
        }
    }

    /// Invisible boundary line filled down to the previous trace
    pub fn band_edge(name: &str, x: Vec<NaiveDate>, y: Vec<f64>, fill_to_previous: bool) -> Self {
        Self {
            kind: "scatter",
            name: name.to_string(),
            x,
            y,
            mode: TraceMode::Lines,
            marker: None,
            line: Some(Line {
                color: BAND_COLOR.to_string(),
                width: 0.0,
                dash: None,
            }),
            fill: fill_to_previous.then_some("tonexty"),
            fillcolor: fill_to_previous.then(|| BAND_COLOR.to_string()),
            showlegend: Some(false),
        }
    }

    pub fn len(&self) -> usize {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool {
        self.x.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AxisTitle {
    pub text: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeButton {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub label: Option<&'static str>,
    pub step: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stepmode: Option<&'static str>,
}

impl RangeButton {
    fn backward(count: u32, label: &'static str, step: &'static str) -> Self {
        Self {
            count: Some(count),
            label: Some(label),
            step,
            stepmode: Some("backward"),
        }
    }

    fn all() -> Self {
        Self {
            count: None,
            label: None,
            step: "all",
            stepmode: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSelector {
    pub buttons: Vec<RangeButton>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RangeSlider {
    pub visible: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct XAxis {
    pub title: AxisTitle,
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub rangeselector: RangeSelector,
    pub rangeslider: RangeSlider,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct YAxis {
    pub title: AxisTitle,
}

/// Vertical reference line spanning the full plot height
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Shape {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub x0: NaiveDateTime,
    pub x1: NaiveDateTime,
    pub xref: &'static str,
    pub y0: f64,
    pub y1: f64,
    pub yref: &'static str,
    pub line: Line,
}

impl Shape {
    pub fn vertical_line(x: NaiveDateTime, color: &str) -> Self {
        Self {
            kind: "line",
            x0: x,
            x1: x,
            xref: "x",
            y0: 0.0,
            y1: 1.0,
            yref: "paper",
            line: Line {
                color: color.to_string(),
                width: 2.0,
                dash: Some("dash".to_string()),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub showlegend: bool,
    pub width: u32,
    pub height: u32,
    pub xaxis: XAxis,
    pub yaxis: YAxis,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub shapes: Vec<Shape>,
}

impl Layout {
    /// Date axis with range selector (1w, 1m, 6m, 1y, all) and range slider
    pub fn time_series(show_legend: bool) -> Self {
        Self {
            showlegend: show_legend,
            width: 900,
            height: 600,
            xaxis: XAxis {
                title: AxisTitle {
                    text: "Datetime".to_string(),
                },
                kind: "date",
                rangeselector: RangeSelector {
                    buttons: vec![
                        RangeButton::backward(7, "1w", "day"),
                        RangeButton::backward(1, "1m", "month"),
                        RangeButton::backward(6, "6m", "month"),
                        RangeButton::backward(1, "1y", "year"),
                        RangeButton::all(),
                    ],
                },
                rangeslider: RangeSlider { visible: true },
            },
            yaxis: YAxis {
                title: AxisTitle {
                    text: "Traffic".to_string(),
                },
            },
            shapes: Vec::new(),
        }
    }
}

/// A chart: traces plus layout
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

impl Figure {
    pub fn new(data: Vec<Trace>, layout: Layout) -> Self {
        Self { data, layout }
    }

    /// Add a dashed vertical line at `x`
    pub fn add_vline(&mut self, x: NaiveDateTime, color: &str) {
        self.layout.shapes.push(Shape::vertical_line(x, color));
    }

    /// Find a trace by name
    pub fn trace(&self, name: &str) -> Option<&Trace> {
        self.data.iter().find(|t| t.name == name)
    }

    /// Vertical reference lines, in insertion order
    pub fn vlines(&self) -> Vec<NaiveDateTime> {
        self.layout.shapes.iter().map(|s| s.x0).collect()
    }

    /// Plotly JSON figure
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// Standalone HTML page drawing the figure with plotly.js
    pub fn to_html(&self, title: &str) -> Result<String> {
        let json = self.to_json()?;
        Ok(format!(
            "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{title}</title>\n\
             <script src=\"{PLOTLY_JS}\"></script>\n</head>\n<body>\n<h2>{title}</h2>\n\
             <div id=\"chart\"></div>\n<script>\nconst figure = {json};\n\
             Plotly.newPlot(\"chart\", figure.data, figure.layout);\n</script>\n</body>\n</html>\n"
        ))
    }
}
