//! One render cycle: flatten → date filter → chart, from an immutable snapshot
//! of the user's inputs.
//!
//! Every change of input re-runs the whole cycle; nothing is carried over
//! between cycles.

use chrono::NaiveDate;
use ecos_api::error::Result;
use ecos_api::record::{ApiNotice, KeyStatResponse};
use ecos_chart::{build_chart, ChartKind, ChartOutcome, ChartRequest, GroupBasis, LayoutMode, Scale};
use ecos_table::date_range::{filter_by_date, DateRange, DateRangeFilter, DATE_COLUMN};
use ecos_table::Table;
use log::{debug, info, warn};
use std::collections::HashMap;

/// Shown instead of anything else when no API key was given.
pub const API_KEY_PROMPT: &str = "Enter your Bank of Korea Open API key first.";

/// The user's inputs for one cycle.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InputSnapshot {
    /// Requested start of the date range; defaults to the earliest month.
    pub start: Option<NaiveDate>,
    /// Requested end of the date range; defaults to the latest month.
    pub end: Option<NaiveDate>,
    pub basis: GroupBasis,
    /// Selected values of the basis column. `None` selects the first one.
    pub selected: Option<Vec<String>>,
    pub kinds: HashMap<String, ChartKind>,
    pub scale: Scale,
    pub layout: LayoutMode,
}

/// Everything one cycle hands to the presentation side.
#[derive(Debug, Clone, PartialEq)]
pub struct CycleOutput {
    /// Status payload ECOS sent in place of data, if any.
    pub notice: Option<ApiNotice>,
    /// Observed min/max month; `None` without a usable `YYYYMM` column.
    pub date_bounds: Option<DateRange>,
    /// The range the table was filtered with.
    pub date_range: Option<DateRange>,
    /// The full, date-filtered table.
    pub table: Table,
    /// Distinct values of the basis column, the choices for selection.
    pub options: Vec<String>,
    /// The selection actually charted.
    pub selection: Vec<String>,
    pub chart: ChartOutcome,
}

/// Run one cycle over a response body.
///
/// Fails only when the body is not well-formed XML; missing columns and bad
/// values are reported inside the output.
pub fn run_cycle(xml: &str, input: &InputSnapshot) -> Result<CycleOutput> {
    let response = KeyStatResponse::parse(xml)?;
    if let Some(notice) = &response.notice {
        warn!("ECOS returned {}: {}", notice.code, notice.message);
    }
    info!(
        "Flattened {} rows (list_total_count: {:?})",
        response.records.len(),
        response.total_count
    );

    let mut table = Table::from_records(&response.records);
    let (table, date_bounds, date_range) = match DateRangeFilter::prepare(&mut table) {
        Some(filter) => {
            let range = filter.select(input.start, input.end);
            let filtered = filter_by_date(&table, range.as_ref());
            info!(
                "Date range {:?} keeps {} of {} rows",
                range,
                filtered.len(),
                table.len()
            );
            (filtered, filter.bounds(), range)
        }
        None => {
            debug!("No {} column; date filtering skipped", DATE_COLUMN);
            (table, None, None)
        }
    };

    let options = table.distinct(input.basis.column());
    let selection = resolve_selection(&options, input.selected.as_deref());
    let request = ChartRequest {
        basis: input.basis,
        kinds: selection
            .iter()
            .map(|v| (v.clone(), input.kinds.get(v).copied().unwrap_or_default()))
            .collect(),
        values: selection.clone(),
        scale: input.scale,
        layout: input.layout,
    };
    let chart = build_chart(&table, &request);

    Ok(CycleOutput {
        notice: response.notice,
        date_bounds,
        date_range,
        table,
        options,
        selection,
        chart,
    })
}

/// Resolve the requested selection against the available values.
///
/// No request selects the first available value. Requested values that are
/// not available are dropped; duplicates keep their first position.
pub fn resolve_selection(options: &[String], requested: Option<&[String]>) -> Vec<String> {
    let Some(requested) = requested else {
        return options.first().cloned().into_iter().collect();
    };
    let mut selection: Vec<String> = Vec::with_capacity(requested.len());
    for value in requested {
        if !options.contains(value) {
            warn!("Selected value '{}' is not in the data; ignoring it", value);
        } else if !selection.contains(value) {
            selection.push(value.clone());
        }
    }
    selection
}
