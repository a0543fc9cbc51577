//! Chart specifications for ECOS key statistics.
//!
//! This crate provides:
//! - `spec`: the declarative chart specification and the user's chart choices
//! - `builder`: turns a filtered table plus choices into one specification
//! - `plotly`: serializes a specification as a Plotly figure (`data` + `layout`)
//! - `html`: wraps a figure in a standalone page that loads Plotly.js

pub mod builder;
pub mod html;
pub mod plotly;
pub mod spec;

pub use builder::{build_chart, ChartOutcome};
pub use spec::{ChartKind, ChartPlan, ChartRequest, ChartSpec, GroupBasis, LayoutMode, Scale};
