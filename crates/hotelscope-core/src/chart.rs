//! Scatter-plot figure for a [`ResultTable`]: price on x, distance on y,
//! rating as point color.
//!
//! The structs serialize to the figure shape plotly.js accepts in
//! `Plotly.newPlot(el, fig.data, fig.layout)`. Missing distances and
//! ratings serialize as `null`, which plotly renders as gaps.

use serde::Serialize;

use crate::hotels::ResultTable;

pub const HOVER_TEMPLATE: &str =
    "Name: %{customdata[0]}<br>Distance: %{y}<br>Price: %{x}<br>Comment: %{customdata[1]}<extra></extra>";

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChartSpec {
    pub data: Vec<ScatterTrace>,
    pub layout: Layout,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterTrace {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub mode: &'static str,
    pub x: Vec<f64>,
    pub y: Vec<Option<f64>>,
    /// `[name, comment]` per point.
    pub customdata: Vec<[String; 2]>,
    pub hovertemplate: &'static str,
    pub marker: Marker,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    pub color: Vec<Option<f64>>,
    pub colorscale: &'static str,
    pub showscale: bool,
    pub colorbar: ColorBar,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorBar {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Layout {
    pub title: Title,
    pub xaxis: Axis,
    pub yaxis: Axis,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Axis {
    pub title: Title,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Title {
    pub text: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font: Option<Font>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Font {
    pub size: u32,
}

impl Title {
    fn plain(text: &str) -> Self {
        Self {
            text: text.to_owned(),
            x: None,
            font: None,
        }
    }
}

/// Builds the dashboard figure. An empty table is valid and yields an
/// empty trace titled `Total Hotels: 0`.
#[must_use]
pub fn build_chart(table: &ResultTable) -> ChartSpec {
    let mut x = Vec::with_capacity(table.len());
    let mut y = Vec::with_capacity(table.len());
    let mut color = Vec::with_capacity(table.len());
    let mut customdata = Vec::with_capacity(table.len());

    for row in table {
        x.push(row.price_twd.as_f64());
        y.push(row.distance_km);
        color.push(row.rating);
        customdata.push([row.name.clone(), row.comment.clone()]);
    }

    ChartSpec {
        data: vec![ScatterTrace {
            kind: "scatter",
            mode: "markers",
            x,
            y,
            customdata,
            hovertemplate: HOVER_TEMPLATE,
            marker: Marker {
                color,
                colorscale: "Plasma",
                showscale: true,
                colorbar: ColorBar {
                    title: Title::plain("rating"),
                },
            },
        }],
        layout: Layout {
            title: Title {
                text: format!("Total Hotels: {}", table.len()),
                x: Some(0.5),
                font: Some(Font { size: 20 }),
            },
            xaxis: Axis {
                title: Title::plain("price"),
            },
            yaxis: Axis {
                title: Title::plain("distance"),
            },
        },
    }
}

impl ChartSpec {
    #[must_use]
    pub fn title(&self) -> &str {
        &self.layout.title.text
    }
}
