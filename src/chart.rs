//! Declarative Vega-Lite documents for the two dashboard charts.
//!
//! The data series are inlined under `data.values` so a document can be
//! handed to any Vega-Lite renderer as-is.

use serde_json::{json, Value};

use crate::data::model::{PieSlice, TrendRecord};

const SCHEMA: &str = "https://vega.github.io/schema/vega-lite/v5.json";

/// Line chart of topic weight over time, one series per topic.
///
/// Hovering a line highlights it and greys out the others; `highlight` is the
/// topic highlighted before any interaction.  Each line ends in a dot labelled
/// with its topic.
pub fn trend_chart_spec(records: &[TrendRecord], highlight: Option<&str>) -> Value {
    let hover_init = match highlight {
        Some(topic) => json!([{ "topic": topic }]),
        None => json!([]),
    };

    json!({
        "$schema": SCHEMA,
        "data": { "values": records },
        "encoding": {
            "x": { "field": "date", "type": "temporal", "title": "Semana" },
            "y": { "field": "distribution", "type": "quantitative", "title": "Distribución" },
            "color": {
                "condition": {
                    "param": "hover",
                    "field": "topic",
                    "type": "nominal",
                    "legend": null
                },
                "value": "grey"
            },
            "opacity": {
                "condition": { "param": "hover", "value": 1 },
                "value": 0.2
            }
        },
        "layer": [
            {
                "description": "transparent layer to make it easier to trigger selection",
                "params": [{
                    "name": "hover",
                    "value": hover_init,
                    "select": { "type": "point", "fields": ["topic"], "on": "mouseover" }
                }],
                "mark": { "type": "line", "strokeWidth": 8, "stroke": "transparent" }
            },
            { "mark": "line" },
            {
                "encoding": {
                    "x": { "aggregate": "max", "field": "date" },
                    "y": { "aggregate": { "argmax": "date" }, "field": "distribution" }
                },
                "layer": [
                    { "mark": { "type": "circle" } },
                    {
                        "mark": { "type": "text", "align": "left", "dx": 4 },
                        "encoding": { "text": { "field": "topic", "type": "nominal" } }
                    }
                ]
            }
        ],
        "config": { "view": { "stroke": null } }
    })
}

/// Pie chart of one week's breakdown.  Slices are normalized by the renderer,
/// so omitted light topics simply enlarge the rest.
pub fn snapshot_chart_spec(slices: &[PieSlice]) -> Value {
    json!({
        "$schema": SCHEMA,
        "description": "Pie Chart with percentage_tooltip",
        "data": { "values": slices },
        "mark": { "type": "arc", "tooltip": true },
        "encoding": {
            "theta": { "field": "value", "type": "quantitative", "stack": "normalize" },
            "color": { "field": "category", "type": "nominal" }
        }
    })
}
