//! Plotly figure writer.
//!
//! Maps a [`ChartSpec`] onto Plotly's `{ "data": [...], "layout": {...} }`
//! figure JSON, which Plotly.js (or any Plotly binding) renders directly.

use crate::spec::{ChartKind, ChartLayout, ChartSpec, Placement, Series};
use serde_json::{json, Map, Value};

/// Plotly's default vertical gap between stacked subplots, as a fraction of
/// the figure height, divided by the number of rows.
const FACET_SPACING: f64 = 0.3;

/// Render a chart specification as a Plotly figure.
pub fn to_figure(spec: &ChartSpec) -> Value {
    let data: Vec<Value> = spec.series.iter().map(trace).collect();
    let layout = match &spec.layout {
        ChartLayout::DualAxis {
            left_title,
            right_title,
        } => json!({
            "title": { "text": spec.title },
            "xaxis": { "title": { "text": spec.x_title } },
            "yaxis": {
                "title": { "text": left_title },
                "type": spec.scale.axis_type(),
            },
            "yaxis2": {
                "title": { "text": right_title },
                "overlaying": "y",
                "side": "right",
                "type": spec.scale.axis_type(),
            },
            "legend": { "x": 0.01, "y": 0.99 },
        }),
        ChartLayout::Grouped => json!({
            "title": { "text": spec.title },
            "barmode": "group",
            "xaxis": { "title": { "text": spec.x_title } },
            "yaxis": { "type": spec.scale.axis_type() },
        }),
        ChartLayout::Faceted { titles } => faceted_layout(spec, titles),
    };
    json!({ "data": data, "layout": layout })
}

/// Axis reference for a zero-based facet row: "x", "x2", "x3", ...
fn axis_ref(prefix: &str, row: usize) -> String {
    if row == 0 {
        prefix.to_string()
    } else {
        format!("{}{}", prefix, row + 1)
    }
}

fn trace(series: &Series) -> Value {
    let mut trace = match series.kind {
        ChartKind::Bar => json!({ "type": "bar" }),
        ChartKind::Line => json!({ "type": "scatter", "mode": "lines+markers" }),
    };
    trace["name"] = json!(series.name);
    trace["x"] = json!(series.x);
    trace["y"] = json!(series.y);
    trace["text"] = json!(series.labels);

    if let Some(color) = &series.color {
        match series.kind {
            ChartKind::Bar => trace["marker"] = json!({ "color": color }),
            ChartKind::Line => trace["line"] = json!({ "color": color }),
        }
    }

    match series.placement {
        Placement::Shared => {}
        Placement::LeftAxis => trace["yaxis"] = json!("y"),
        Placement::RightAxis => trace["yaxis"] = json!("y2"),
        Placement::Facet(row) => {
            trace["xaxis"] = json!(axis_ref("x", row));
            trace["yaxis"] = json!(axis_ref("y", row));
        }
    }
    trace
}

/// One row per title, stacked top to bottom. All x-axes follow the bottom
/// one, which alone shows tick labels and the axis title.
fn faceted_layout(spec: &ChartSpec, titles: &[String]) -> Value {
    let rows = titles.len();
    let mut layout = Map::new();
    layout.insert("title".to_string(), json!({ "text": spec.title }));

    if rows == 0 {
        layout.insert("yaxis".to_string(), json!({ "type": spec.scale.axis_type() }));
        return Value::Object(layout);
    }

    let spacing = FACET_SPACING / rows as f64;
    let height = (1.0 - spacing * (rows - 1) as f64) / rows as f64;
    let bottom_x = axis_ref("x", rows - 1);
    let mut annotations = Vec::with_capacity(rows);

    for (row, title) in titles.iter().enumerate() {
        let top = 1.0 - row as f64 * (height + spacing);
        let bottom = (top - height).max(0.0);
        let is_bottom = row == rows - 1;

        let mut xaxis = json!({
            "anchor": axis_ref("y", row),
            "domain": [0.0, 1.0],
            "showticklabels": is_bottom,
        });
        if is_bottom {
            xaxis["title"] = json!({ "text": spec.x_title });
        } else {
            xaxis["matches"] = json!(bottom_x);
        }
        layout.insert(axis_ref("xaxis", row), xaxis);
        layout.insert(
            axis_ref("yaxis", row),
            json!({
                "anchor": axis_ref("x", row),
                "domain": [bottom, top],
                "type": spec.scale.axis_type(),
            }),
        );
        annotations.push(json!({
            "text": title,
            "x": 0.5,
            "y": top,
            "xref": "paper",
            "yref": "paper",
            "xanchor": "center",
            "yanchor": "bottom",
            "showarrow": false,
        }));
    }
    layout.insert("annotations".to_string(), Value::Array(annotations));
    Value::Object(layout)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::Scale;

    fn series(name: &str, kind: ChartKind, placement: Placement) -> Series {
        Series {
            name: name.to_string(),
            kind,
            x: vec![Some("X".to_string()), None],
            y: vec![Some(1.5), None],
            labels: vec![Some("1.5".to_string()), Some("n/a".to_string())],
            placement,
            color: None,
        }
    }

    #[test]
    fn test_dual_axis_figure() {
        let mut right = series("B", ChartKind::Line, Placement::RightAxis);
        right.color = Some("#EF553B".to_string());
        let spec = ChartSpec {
            title: "t".to_string(),
            x_title: "KEYSTAT_NAME".to_string(),
            scale: Scale::Log,
            layout: ChartLayout::DualAxis {
                left_title: "A".to_string(),
                right_title: "B".to_string(),
            },
            series: vec![series("A", ChartKind::Bar, Placement::LeftAxis), right],
        };
        let fig = to_figure(&spec);
        let data = fig["data"].as_array().unwrap();
        assert_eq!(data[0]["type"], "bar");
        assert_eq!(data[0]["yaxis"], "y");
        assert_eq!(data[0]["y"], json!([1.5, null]));
        assert_eq!(data[1]["type"], "scatter");
        assert_eq!(data[1]["mode"], "lines+markers");
        assert_eq!(data[1]["yaxis"], "y2");
        assert_eq!(data[1]["line"]["color"], "#EF553B");
        assert_eq!(data[1]["text"], json!(["1.5", "n/a"]));

        let layout = &fig["layout"];
        assert_eq!(layout["yaxis"]["type"], "log");
        assert_eq!(layout["yaxis2"]["type"], "log");
        assert_eq!(layout["yaxis2"]["overlaying"], "y");
        assert_eq!(layout["yaxis2"]["side"], "right");
        assert_eq!(layout["yaxis2"]["title"]["text"], "B");
        assert_eq!(layout["xaxis"]["title"]["text"], "KEYSTAT_NAME");
    }

    #[test]
    fn test_grouped_figure() {
        let spec = ChartSpec {
            title: "t".to_string(),
            x_title: "KEYSTAT_NAME".to_string(),
            scale: Scale::Linear,
            layout: ChartLayout::Grouped,
            series: vec![
                series("A", ChartKind::Bar, Placement::Shared),
                series("B", ChartKind::Bar, Placement::Shared),
            ],
        };
        let fig = to_figure(&spec);
        assert_eq!(fig["layout"]["barmode"], "group");
        assert_eq!(fig["layout"]["yaxis"]["type"], "linear");
        assert!(fig["data"][0].get("yaxis").is_none());
    }

    #[test]
    fn test_faceted_figure_shares_x() {
        let titles = vec!["A".to_string(), "B".to_string(), "C".to_string()];
        let spec = ChartSpec {
            title: "t".to_string(),
            x_title: "KEYSTAT_NAME".to_string(),
            scale: Scale::Log,
            layout: ChartLayout::Faceted {
                titles: titles.clone(),
            },
            series: titles
                .iter()
                .enumerate()
                .map(|(i, t)| series(t, ChartKind::Bar, Placement::Facet(i)))
                .collect(),
        };
        let fig = to_figure(&spec);
        let data = fig["data"].as_array().unwrap();
        assert_eq!(data[0]["xaxis"], "x");
        assert_eq!(data[2]["xaxis"], "x3");
        assert_eq!(data[2]["yaxis"], "y3");

        let layout = &fig["layout"];
        assert_eq!(layout["xaxis"]["matches"], "x3");
        assert_eq!(layout["xaxis2"]["matches"], "x3");
        assert!(layout["xaxis3"].get("matches").is_none());
        assert_eq!(layout["xaxis3"]["showticklabels"], true);
        for key in ["yaxis", "yaxis2", "yaxis3"] {
            assert_eq!(layout[key]["type"], "log");
        }
        let annotations = layout["annotations"].as_array().unwrap();
        assert_eq!(annotations.len(), 3);
        assert_eq!(annotations[1]["text"], "B");

        let top = layout["yaxis"]["domain"][1].as_f64().unwrap();
        let bottom = layout["yaxis3"]["domain"][0].as_f64().unwrap();
        assert!((top - 1.0).abs() < 1e-9);
        assert!(bottom.abs() < 1e-9);
    }

    #[test]
    fn test_axis_ref() {
        assert_eq!(axis_ref("x", 0), "x");
        assert_eq!(axis_ref("yaxis", 1), "yaxis2");
    }
}
