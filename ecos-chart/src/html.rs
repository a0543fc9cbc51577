//! Standalone HTML page for a chart outcome.
//!
//! The Plotly figure is embedded as JSON and drawn by Plotly.js loaded from
//! its CDN, so the page opens in any browser without a server.

use crate::builder::ChartOutcome;
use crate::plotly::to_figure;

const PLOTLY_JS_URL: &str = "https://cdn.plot.ly/plotly-2.35.2.min.js";

/// DOM id of the chart container div.
pub const CHART_CONTAINER_ID: &str = "ecos-keystat-chart";

/// Render a chart outcome as a complete HTML document. A warning outcome
/// renders the warning text in place of the chart.
pub fn render_page(outcome: &ChartOutcome) -> String {
    match outcome {
        ChartOutcome::Warning(message) => page(
            "ECOS key statistics",
            &format!("<p class=\"warning\">{}</p>", escape_html(message)),
        ),
        ChartOutcome::Chart(spec) => {
            let figure = to_figure(spec);
            let body = format!(
                r#"<div id="{id}" style="width: 100%; min-height: 600px;"></div>
<script src="{js}"></script>
<script>
  var figure = {figure};
  Plotly.newPlot('{id}', figure.data, figure.layout, {{responsive: true}});
</script>"#,
                id = CHART_CONTAINER_ID,
                js = PLOTLY_JS_URL,
                figure = script_safe_json(&figure.to_string()),
            );
            page(&spec.title, &body)
        }
    }
}

fn page(title: &str, body: &str) -> String {
    format!(
        "<!DOCTYPE html>\n<html>\n<head>\n<meta charset=\"utf-8\">\n<title>{}</title>\n</head>\n<body>\n{}\n</body>\n</html>\n",
        escape_html(title),
        body
    )
}

/// JSON is valid JavaScript, but a `</script>` inside a string value would
/// end the script element early.
fn script_safe_json(json: &str) -> String {
    json.replace("</", "<\\/")
}

fn escape_html(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
}
