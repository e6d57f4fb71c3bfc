//! serde model of the plotly.js figures rendered in the browser.
//! only the attributes the event plots use are modelled

use serde::{Deserialize, Serialize};

use crate::modules::event_plot::{EventPlot, PilotRow};
use crate::modules::models::race_format::WinCondition;

const BACKGROUND: &str = "rgb(17,17,17)";
const FONT_COLOR: &str = "#f2f5fa";
const GRID_COLOR: &str = "rgba(211,211,211,0.2)";
const HOLESHOT_COLOR: &str = "yellow";
const RAW_POINT_COLOR: &str = "white";
const CONSECUTIVE_COLOR: &str = "magenta";

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct Figure {
    pub data: Vec<Trace>,
    pub layout: Layout,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Trace {
    Box(BoxTrace),
    Scatter(ScatterTrace),
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
#[serde(untagged)]
pub enum Values {
    Numbers(Vec<Option<f64>>),
    Labels(Vec<Option<String>>),
}

impl Values {
    pub fn numbers<I: IntoIterator<Item = f64>>(values: I) -> Values {
        Values::Numbers(values.into_iter().map(Some).collect())
    }

    pub fn labels(label: &str, count: usize) -> Values {
        Values::Labels(vec![Some(label.to_string()); count])
    }

    /// a single null, used for legend only traces
    pub fn empty() -> Values {
        Values::Numbers(vec![None])
    }

    pub fn len(&self) -> usize {
        match self {
            Values::Numbers(e) => e.len(),
            Values::Labels(e) => e.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct BoxTrace {
    pub name: String,
    pub x: Values,
    pub y: Values,
    pub orientation: String,
    pub boxpoints: String,
    pub jitter: f64,
    pub pointpos: f64,
    pub quartilemethod: String,
    pub marker: Marker,
    pub line: Line,
    pub legendgroup: String,
    pub hoverinfo: String,
    pub showlegend: bool,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct ScatterTrace {
    pub name: String,
    pub x: Values,
    pub y: Values,
    pub mode: String,
    pub marker: Marker,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub legendgroup: Option<String>,
    pub showlegend: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hoverinfo: Option<String>,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug, Default)]
pub struct Marker {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub size: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<Line>,
}

impl Marker {
    pub fn new(symbol: &str, color: &str, size: u32) -> Marker {
        Marker {
            symbol: Some(symbol.to_string()),
            color: Some(color.to_string()),
            size: Some(size),
            line: None,
        }
    }

    pub fn with_line(mut self, line: Line) -> Marker {
        self.line = Some(line);
        self
    }
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug, Default)]
pub struct Line {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash: Option<String>,
}

impl Line {
    pub fn new(color: &str, width: f64) -> Line {
        Line {
            color: Some(color.to_string()),
            width: Some(width),
            dash: None,
        }
    }
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct Title {
    pub text: String,
}

impl Title {
    pub fn new(text: &str) -> Option<Title> {
        Some(Title { text: text.to_string() })
    }
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct Font {
    pub color: String,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug, Default)]
pub struct Axis {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<Title>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickmode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dtick: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rangemode: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub showgrid: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gridcolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gridwidth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub zerolinecolor: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryorder: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub categoryarray: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tickvals: Option<Vec<String>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ticktext: Option<Vec<String>>,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct Legend {
    pub itemclick: String,
    pub itemdoubleclick: String,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct Layout {
    pub title: Option<Title>,
    pub height: u32,
    pub paper_bgcolor: String,
    pub plot_bgcolor: String,
    pub font: Font,
    pub xaxis: Axis,
    pub yaxis: Axis,
    pub legend: Legend,
}

impl Layout {
    fn dark(title: &str, height: u32, xaxis: Axis, yaxis: Axis) -> Layout {
        Layout {
            title: Title::new(title),
            height,
            paper_bgcolor: BACKGROUND.to_string(),
            plot_bgcolor: BACKGROUND.to_string(),
            font: Font {
                color: FONT_COLOR.to_string(),
            },
            xaxis,
            yaxis,
            legend: Legend {
                itemclick: "toggle".to_string(),
                itemdoubleclick: "toggleothers".to_string(),
            },
        }
    }
}

impl Figure {
    /// # box plot of the lap times
    /// one horizontal box per pilot with the fastest pilot at the top.
    /// plotly draws the first category at the bottom, so rows are added in
    /// reverse
    pub fn lap_times(plot: &EventPlot) -> Figure {
        let mut data = Vec::new();

        for row in plot.rows.iter().rev() {
            let regular: Vec<f64> = row.regular_laps().map(|e| e.time).collect();
            if !regular.is_empty() {
                data.push(Trace::Box(BoxTrace {
                    name: row.name.clone(),
                    y: Values::labels(&row.name, regular.len()),
                    x: Values::numbers(regular),
                    orientation: "h".to_string(),
                    boxpoints: "all".to_string(),
                    jitter: 0.5,
                    pointpos: 0.0,
                    quartilemethod: "linear".to_string(),
                    marker: Marker::new("circle-open", RAW_POINT_COLOR, 8),
                    line: Line::new(&row.color, 2.0),
                    legendgroup: row.pilot_id.to_string(),
                    hoverinfo: "x".to_string(),
                    showlegend: true,
                }));
            }

            let holeshots: Vec<f64> = row.holeshots().map(|e| e.time).collect();
            if !holeshots.is_empty() {
                data.push(Trace::Scatter(Figure::row_markers(
                    row,
                    &row.name,
                    holeshots,
                    "markers",
                    Marker::new("circle-open", HOLESHOT_COLOR, 6),
                    None,
                )));
            }

            data.extend(Figure::highlights(plot, row).into_iter().map(Trace::Scatter));
        }

        data.push(Trace::Scatter(Figure::legend_entry(
            "Raw Data Points",
            Marker::new("circle-open", RAW_POINT_COLOR, 8),
        )));
        data.push(Trace::Scatter(Figure::legend_entry(
            "Hole Shot",
            Marker::new("circle-open", HOLESHOT_COLOR, 6),
        )));
        match plot.win_condition {
            WinCondition::FastestLap => data.push(Trace::Scatter(Figure::legend_entry("Fastest Lap", Figure::star()))),
            WinCondition::FastestConsecutive => data.push(Trace::Scatter(Figure::legend_entry(
                &format!("Best Consecutive {} Lap", plot.consecutive_base),
                Marker::new("circle", CONSECUTIVE_COLOR, 10),
            ))),
            _ => {}
        }

        let categories: Vec<String> = plot.rows.iter().rev().map(|e| e.name.clone()).collect();
        let xaxis = Axis {
            title: Title::new("Lap Time (s)"),
            tickmode: Some("linear".to_string()),
            dtick: Some(2.0),
            rangemode: Some("tozero".to_string()),
            showgrid: Some(true),
            gridcolor: Some(GRID_COLOR.to_string()),
            gridwidth: Some(0.5),
            zerolinecolor: Some(GRID_COLOR.to_string()),
            ..Axis::default()
        };
        let yaxis = Axis {
            tickmode: Some("array".to_string()),
            categoryorder: Some("array".to_string()),
            categoryarray: Some(categories.clone()),
            tickvals: Some(categories),
            ticktext: Some(plot.rows.iter().rev().map(|e| e.label.clone()).collect()),
            gridcolor: Some(GRID_COLOR.to_string()),
            ..Axis::default()
        };

        Figure {
            data,
            layout: Layout::dark(&plot.title, plot.height(), xaxis, yaxis),
        }
    }

    /// # cumulative race time
    /// one line per pilot per race, the legend toggles all races of a pilot
    pub fn race_times(plot: &EventPlot) -> Figure {
        let mut data = Vec::new();

        for row in &plot.rows {
            for (index, run) in row.runs.iter().enumerate() {
                data.push(Trace::Scatter(ScatterTrace {
                    name: row.name.clone(),
                    x: Values::numbers((0..run.cumulative.len()).map(|e| e as f64)),
                    y: Values::numbers(run.cumulative.iter().copied()),
                    mode: "lines+markers".to_string(),
                    marker: Marker::new("circle", &row.color, 6),
                    line: Some(Line::new(&row.color, 2.0)),
                    legendgroup: Some(row.pilot_id.to_string()),
                    showlegend: index == 0,
                    hoverinfo: Some("x+y+name".to_string()),
                }));
            }
        }

        let title = format!("{}Race Times", plot.title.trim_end_matches("Lap Times"));
        let grid = Axis {
            showgrid: Some(true),
            gridcolor: Some(GRID_COLOR.to_string()),
            zerolinecolor: Some(GRID_COLOR.to_string()),
            ..Axis::default()
        };
        let xaxis = Axis {
            title: Title::new("Lap"),
            tickmode: Some("linear".to_string()),
            dtick: Some(1.0),
            ..grid.clone()
        };
        let yaxis = Axis {
            title: Title::new("Race Time (s)"),
            rangemode: Some("tozero".to_string()),
            ..grid
        };

        Figure {
            data,
            layout: Layout::dark(&title, 600, xaxis, yaxis),
        }
    }

    /// extras drawn on top of the box of a pilot depending on the win condition
    fn highlights(plot: &EventPlot, row: &PilotRow) -> Vec<ScatterTrace> {
        match plot.win_condition {
            WinCondition::MostProgress | WinCondition::FirstToLapX => plot
                .heats
                .iter()
                .filter_map(|heat_id| {
                    let mut laps: Vec<_> = row.regular_laps().filter(|e| e.heat_id == *heat_id).collect();
                    if laps.len() < 2 {
                        return None;
                    }
                    laps.sort_by_key(|e| (e.lap, e.race_id));

                    let color = plot.heat_color(*heat_id);
                    Some(Figure::row_markers(
                        row,
                        &format!("{} - Heat {}", row.name, heat_id),
                        laps.iter().map(|e| e.time).collect(),
                        "lines+markers",
                        Marker::new("circle", color, 8),
                        Some(Line::new(color, 2.0)),
                    ))
                })
                .collect(),
            WinCondition::FastestLap => {
                let fastest: Vec<f64> = row.regular_laps().filter(|e| e.fastest).map(|e| e.time).collect();
                if fastest.is_empty() {
                    return Vec::new();
                }

                vec![Figure::row_markers(
                    row,
                    &format!("{} - Fastest Lap", row.name),
                    fastest,
                    "markers",
                    Figure::star(),
                    None,
                )]
            }
            WinCondition::FastestConsecutive => {
                let window: Vec<f64> = row.laps.iter().filter(|e| e.best_consecutive).map(|e| e.time).collect();
                if window.is_empty() {
                    return Vec::new();
                }

                let mut line = Line::new(CONSECUTIVE_COLOR, 2.0);
                line.dash = Some("dot".to_string());
                vec![Figure::row_markers(
                    row,
                    &row.name,
                    window,
                    "lines+markers",
                    Marker::new("circle", CONSECUTIVE_COLOR, 10).with_line(Line {
                        width: Some(2.0),
                        ..Line::default()
                    }),
                    Some(line),
                )]
            }
            WinCondition::None | WinCondition::MostLaps => Vec::new(),
        }
    }

    fn row_markers(
        row: &PilotRow,
        name: &str,
        times: Vec<f64>,
        mode: &str,
        marker: Marker,
        line: Option<Line>,
    ) -> ScatterTrace {
        ScatterTrace {
            name: name.to_string(),
            y: Values::labels(&row.name, times.len()),
            x: Values::numbers(times),
            mode: mode.to_string(),
            marker,
            line,
            legendgroup: Some(row.pilot_id.to_string()),
            showlegend: false,
            hoverinfo: Some("x".to_string()),
        }
    }

    fn legend_entry(name: &str, marker: Marker) -> ScatterTrace {
        ScatterTrace {
            name: name.to_string(),
            x: Values::empty(),
            y: Values::empty(),
            mode: "markers".to_string(),
            marker,
            line: None,
            legendgroup: None,
            showlegend: true,
            hoverinfo: None,
        }
    }

    fn star() -> Marker {
        Marker::new("star", "gold", 12).with_line(Line::new("darkgoldenrod", 2.0))
    }
}
