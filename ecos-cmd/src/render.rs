//! Subcommand bodies: fetch the response, run the cycle, write the outputs.

use crate::pipeline::{run_cycle, CycleOutput, InputSnapshot, API_KEY_PROMPT};
use crate::{ApiArgs, OutputArgs, SourceArgs};
use anyhow::Context;
use ecos_api::client::KeyStatClient;
use ecos_chart::html::render_page;
use ecos_chart::plotly::to_figure;
use ecos_chart::ChartOutcome;
use ecos_utils::dates::format_date;
use log::info;
use std::fs;
use std::io::{self, Write};
use std::path::Path;

/// The key to use, if one was given. Blank keys count as absent.
fn api_key(api: &ApiArgs) -> Option<&str> {
    api.api_key
        .as_deref()
        .map(str::trim)
        .filter(|k| !k.is_empty())
}

async fn fetch_body(api: &ApiArgs, key: &str) -> anyhow::Result<String> {
    let client = KeyStatClient::with_base_url(&api.base_url);
    let body = client
        .fetch_xml(key)
        .await
        .with_context(|| format!("Failed to fetch key statistics from {}", api.base_url))?;
    info!("Received {} bytes from {}", body.len(), api.base_url);
    Ok(body)
}

/// Read the saved body if one was given, otherwise fetch it. `None` means
/// there is nothing to read and no key to fetch with.
async fn load_body(source: &SourceArgs) -> anyhow::Result<Option<String>> {
    if let Some(path) = &source.xml_file {
        let body = fs::read_to_string(path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        info!("Read {} bytes from {}", body.len(), path.display());
        return Ok(Some(body));
    }
    match api_key(&source.api) {
        Some(key) => Ok(Some(fetch_body(&source.api, key).await?)),
        None => Ok(None),
    }
}

async fn load_cycle(source: &SourceArgs, input: &InputSnapshot) -> anyhow::Result<Option<CycleOutput>> {
    let Some(body) = load_body(source).await? else {
        eprintln!("{}", API_KEY_PROMPT);
        return Ok(None);
    };
    let output = run_cycle(&body, input).context("Failed to parse the ECOS response")?;
    if let Some(notice) = &output.notice {
        eprintln!("ECOS: {} ({})", notice.message, notice.code);
    }
    Ok(Some(output))
}

/// Save the raw response body for later `--xml-file` runs.
pub async fn run_fetch(api: &ApiArgs, output: &Path) -> anyhow::Result<()> {
    let Some(key) = api_key(api) else {
        eprintln!("{}", API_KEY_PROMPT);
        return Ok(());
    };
    let body = fetch_body(api, key).await?;
    fs::write(output, &body).with_context(|| format!("Failed to write {}", output.display()))?;
    info!("Saved response to {}", output.display());
    Ok(())
}

/// Print the observed date bounds and the selectable values.
pub async fn run_options(source: &SourceArgs, input: &InputSnapshot) -> anyhow::Result<()> {
    let Some(output) = load_cycle(source, input).await? else {
        return Ok(());
    };
    let stdout = io::stdout();
    write_options(&mut stdout.lock(), &output, input)?;
    Ok(())
}

fn write_options<W: Write>(out: &mut W, output: &CycleOutput, input: &InputSnapshot) -> io::Result<()> {
    match &output.date_bounds {
        Some(bounds) => writeln!(
            out,
            "Dates: {} to {}",
            format_date(&bounds.start()),
            format_date(&bounds.end())
        )?,
        None => writeln!(out, "Dates: none")?,
    }
    writeln!(out, "{} values:", input.basis.column())?;
    for value in &output.options {
        writeln!(out, "  {}", value)?;
    }
    Ok(())
}

/// One full cycle: the filtered table first, then the chart or the warning.
pub async fn run_render(
    source: &SourceArgs,
    input: &InputSnapshot,
    outputs: &OutputArgs,
) -> anyhow::Result<()> {
    let Some(output) = load_cycle(source, input).await? else {
        return Ok(());
    };
    write_outputs(&output, outputs)
}

fn write_outputs(output: &CycleOutput, outputs: &OutputArgs) -> anyhow::Result<()> {
    match &outputs.table_csv {
        Some(path) => {
            let file = fs::File::create(path)
                .with_context(|| format!("Failed to create {}", path.display()))?;
            output.table.write_csv(file)?;
            info!("Wrote {} rows to {}", output.table.len(), path.display());
        }
        None => output.table.write_csv(io::stdout().lock())?,
    }

    match &output.chart {
        ChartOutcome::Warning(message) => eprintln!("{}", message),
        ChartOutcome::Chart(spec) => {
            if let Some(path) = &outputs.chart_json {
                write_file(path, &serde_json::to_string_pretty(spec)?)?;
            }
            if let Some(path) = &outputs.plotly_json {
                write_file(path, &serde_json::to_string_pretty(&to_figure(spec))?)?;
            }
        }
    }

    // The page carries the warning when there is no chart.
    if let Some(path) = &outputs.html {
        write_file(path, &render_page(&output.chart))?;
    }
    Ok(())
}

fn write_file(path: &Path, contents: &str) -> anyhow::Result<()> {
    fs::write(path, contents).with_context(|| format!("Failed to write {}", path.display()))?;
    info!("Wrote {}", path.display());
    Ok(())
}
