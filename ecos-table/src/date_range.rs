//! Date range filtering over the `YYYYMM` column.

use crate::{Coercion, Table};
use chrono::NaiveDate;
use log::debug;

/// Column holding the `YYYYMM` month stamp.
pub const DATE_COLUMN: &str = "YYYYMM";

/// An inclusive range of calendar dates.
#[derive(Clone, Eq, PartialEq, Copy, Debug)]
pub struct DateRange(pub NaiveDate, pub NaiveDate);

impl DateRange {
    pub fn start(&self) -> NaiveDate {
        self.0
    }

    pub fn end(&self) -> NaiveDate {
        self.1
    }

    pub fn contains(&self, date: &NaiveDate) -> bool {
        self.0 <= *date && *date <= self.1
    }

    /// True when start is after end; such a range matches nothing.
    pub fn is_empty(&self) -> bool {
        self.0 > self.1
    }

    /// Narrow this range so it lies within `bounds`.
    pub fn clamp_to(&self, bounds: &DateRange) -> DateRange {
        DateRange(self.0.max(bounds.0), self.1.min(bounds.1))
    }
}

/// Restricts a table to rows whose `YYYYMM` month falls in a range.
///
/// Built once per table by [`DateRangeFilter::prepare`], which coerces the
/// column and records the observed bounds. [`DateRangeFilter::select`] turns
/// the user's endpoints into the range handed to [`filter_by_date`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DateRangeFilter {
    bounds: Option<DateRange>,
}

impl DateRangeFilter {
    /// Coerce the `YYYYMM` column to dates in place and derive the observed
    /// bounds. Returns `None` when the table has no such column, in which
    /// case date filtering does not apply.
    pub fn prepare(table: &mut Table) -> Option<DateRangeFilter> {
        if !table.coerce_column(DATE_COLUMN, Coercion::YearMonth) {
            return None;
        }
        let bounds = observed_bounds(table);
        debug!("Observed {} bounds: {:?}", DATE_COLUMN, bounds);
        Some(DateRangeFilter { bounds })
    }

    /// Min and max of the non-missing dates, or `None` if every date was
    /// missing or malformed.
    pub fn bounds(&self) -> Option<DateRange> {
        self.bounds
    }

    /// The range to filter with: the requested endpoints, each defaulting to
    /// the observed bound and never reaching past it.
    pub fn select(&self, start: Option<NaiveDate>, end: Option<NaiveDate>) -> Option<DateRange> {
        self.bounds.map(|bounds| {
            DateRange(start.unwrap_or(bounds.0), end.unwrap_or(bounds.1)).clamp_to(&bounds)
        })
    }
}

/// Observed min/max over the `YYYYMM` column, skipping missing values.
pub fn observed_bounds(table: &Table) -> Option<DateRange> {
    let dates = table
        .column(DATE_COLUMN)?
        .iter()
        .filter_map(|v| v.coerce(Coercion::YearMonth).as_date());
    dates.fold(None, |acc, d| match acc {
        None => Some(DateRange(d, d)),
        Some(DateRange(lo, hi)) => Some(DateRange(lo.min(d), hi.max(d))),
    })
}

/// Keep rows whose `YYYYMM` month lies in `range`. Values are coerced on the
/// fly, so raw and prepared tables filter the same way. A table without the
/// column is returned unchanged.
pub fn filter_by_date(table: &Table, range: Option<&DateRange>) -> Table {
    if !table.has_column(DATE_COLUMN) {
        return table.clone();
    }
    table.filter(|row| {
        let date = row
            .get(DATE_COLUMN)
            .and_then(|v| v.coerce(Coercion::YearMonth).as_date());
        match (date, range) {
            (Some(d), Some(r)) => r.contains(&d),
            _ => false,
        }
    })
}
