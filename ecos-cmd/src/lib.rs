//! Command implementations for the ECOS CLI.
//!
//! Each invocation is one render cycle: the flags are the input snapshot, the
//! printed table and the written chart files are the output.

use chrono::NaiveDate;
use clap::{Args, Subcommand};
use ecos_api::client::DEFAULT_BASE_URL;
use ecos_chart::spec::ParseOptionError;
use ecos_chart::{ChartKind, GroupBasis, LayoutMode, Scale};
use std::path::PathBuf;
use std::str::FromStr;

pub mod pipeline;
pub mod render;

use pipeline::InputSnapshot;

/// How to reach the ECOS API.
#[derive(Args, Debug, Clone)]
pub struct ApiArgs {
    /// ECOS Open API key
    #[arg(long, env = "ECOS_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,

    /// API base URL including the scheme (override for mirrors or test servers)
    #[arg(long, default_value = DEFAULT_BASE_URL)]
    pub base_url: String,
}

/// Where the response body comes from.
#[derive(Args, Debug, Clone)]
pub struct SourceArgs {
    #[command(flatten)]
    pub api: ApiArgs,

    /// Read a previously saved response body instead of fetching
    #[arg(long)]
    pub xml_file: Option<PathBuf>,
}

/// The user's selections for one cycle.
#[derive(Args, Debug, Clone)]
pub struct SnapshotArgs {
    /// Start of the date range (YYYY-MM-DD); defaults to the earliest month
    #[arg(long, value_parser = ecos_utils::dates::parse_date)]
    pub start: Option<NaiveDate>,

    /// End of the date range (YYYY-MM-DD); defaults to the latest month
    #[arg(long, value_parser = ecos_utils::dates::parse_date)]
    pub end: Option<NaiveDate>,

    /// Grouping basis: class-name or keystat-name
    #[arg(long, default_value = "class-name")]
    pub basis: GroupBasis,

    /// Value of the basis column to chart (repeatable); defaults to the first
    #[arg(short = 's', long = "select")]
    pub select: Vec<String>,

    /// Chart kind for a selected value, as VALUE=bar or VALUE=line (repeatable)
    #[arg(short = 'k', long = "kind")]
    pub kind: Vec<KindAssignment>,

    /// Y-axis scale: linear or log
    #[arg(long, default_value = "linear")]
    pub scale: Scale,

    /// Layout: combined or faceted
    #[arg(long, default_value = "combined")]
    pub layout: LayoutMode,
}

impl SnapshotArgs {
    pub fn to_snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            start: self.start,
            end: self.end,
            basis: self.basis,
            selected: if self.select.is_empty() {
                None
            } else {
                Some(self.select.clone())
            },
            kinds: self
                .kind
                .iter()
                .map(|k| (k.value.clone(), k.kind))
                .collect(),
            scale: self.scale,
            layout: self.layout,
        }
    }
}

/// `VALUE=KIND` pair from the command line.
#[derive(Debug, Clone, PartialEq)]
pub struct KindAssignment {
    pub value: String,
    pub kind: ChartKind,
}

impl FromStr for KindAssignment {
    type Err = ParseOptionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (value, kind) = s
            .rsplit_once('=')
            .ok_or_else(|| ParseOptionError(format!("'{}' (expected VALUE=bar|line)", s)))?;
        Ok(KindAssignment {
            value: value.to_string(),
            kind: kind.parse()?,
        })
    }
}

/// Where the chart is written.
#[derive(Args, Debug, Clone)]
pub struct OutputArgs {
    /// Write the filtered table as CSV here instead of stdout
    #[arg(long)]
    pub table_csv: Option<PathBuf>,

    /// Write the chart specification as JSON
    #[arg(long)]
    pub chart_json: Option<PathBuf>,

    /// Write the chart as a Plotly figure (data + layout) JSON
    #[arg(long)]
    pub plotly_json: Option<PathBuf>,

    /// Write a standalone HTML page showing the chart
    #[arg(long)]
    pub html: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Fetch the raw key statistics XML and save it
    Fetch {
        #[command(flatten)]
        api: ApiArgs,

        /// Where to save the response body
        #[arg(short = 'o', long)]
        output: PathBuf,
    },

    /// Show the date bounds and the values available for the grouping basis
    Options {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        snapshot: SnapshotArgs,
    },

    /// Run one render cycle: table, then chart (or a warning)
    Render {
        #[command(flatten)]
        source: SourceArgs,

        #[command(flatten)]
        snapshot: SnapshotArgs,

        #[command(flatten)]
        outputs: OutputArgs,
    },
}

pub async fn run(command: Command) -> anyhow::Result<()> {
    match command {
        Command::Fetch { api, output } => render::run_fetch(&api, &output).await,
        Command::Options { source, snapshot } => {
            render::run_options(&source, &snapshot.to_snapshot()).await
        }
        Command::Render {
            source,
            snapshot,
            outputs,
        } => render::run_render(&source, &snapshot.to_snapshot(), &outputs).await,
    }
}
