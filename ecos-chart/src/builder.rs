use crate::spec::{
    ChartLayout, ChartPlan, ChartRequest, ChartSpec, Placement, Series, CLASS_COLUMN,
    KEYSTAT_COLUMN, VALUE_COLUMN,
};
use ecos_table::{Coercion, Table, Value};
use log::{info, warn};

/// Columns that must all be present before any chart is built.
pub const REQUIRED_COLUMNS: [&str; 3] = [CLASS_COLUMN, KEYSTAT_COLUMN, VALUE_COLUMN];

/// Shown instead of a chart when a required column is absent.
pub const MISSING_COLUMNS_WARNING: &str =
    "CLASS_NAME, KEYSTAT_NAME, DATA_VALUE columns are missing from the data.";

/// Colour of the right-axis series in a dual-axis chart.
pub const RIGHT_AXIS_COLOR: &str = "#EF553B";

/// Chart-related output of one render cycle.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartOutcome {
    /// Required columns are missing; no chart was built.
    Warning(String),
    Chart(ChartSpec),
}

/// Build the chart for `table` (already date-filtered) and the user's choices.
///
/// Values that match no rows produce empty series; an empty selection
/// produces a chart with no series.
pub fn build_chart(table: &Table, request: &ChartRequest) -> ChartOutcome {
    if !table.has_columns(&REQUIRED_COLUMNS) {
        warn!("{}", MISSING_COLUMNS_WARNING);
        return ChartOutcome::Warning(MISSING_COLUMNS_WARNING.to_string());
    }

    let group_col = request.basis.column();
    let x_col = request.basis.x_column();
    let plan = ChartPlan::decide(request.layout, request.values.len());
    info!(
        "Building {:?} chart for {} selected {} value(s)",
        plan,
        request.values.len(),
        group_col
    );

    let series_for = |value: &str, placement: Placement| {
        group_series(table, request, value, placement)
    };

    let spec = match plan {
        ChartPlan::DualAxis => {
            let (left, right) = (&request.values[0], &request.values[1]);
            let mut right_series = series_for(right, Placement::RightAxis);
            right_series.color = Some(RIGHT_AXIS_COLOR.to_string());
            ChartSpec {
                title: format!("{}: two series (left/right y-axis)", group_col),
                x_title: x_col.to_string(),
                scale: request.scale,
                layout: ChartLayout::DualAxis {
                    left_title: left.clone(),
                    right_title: right.clone(),
                },
                series: vec![series_for(left, Placement::LeftAxis), right_series],
            }
        }
        ChartPlan::Grouped => ChartSpec {
            title: format!("Key statistics by selected {} (combined)", group_col),
            x_title: x_col.to_string(),
            scale: request.scale,
            layout: ChartLayout::Grouped,
            series: request
                .values
                .iter()
                .map(|v| series_for(v, Placement::Shared))
                .collect(),
        },
        ChartPlan::Faceted => ChartSpec {
            title: format!("Key statistics by {} (faceted)", group_col),
            x_title: x_col.to_string(),
            scale: request.scale,
            layout: ChartLayout::Faceted {
                titles: request.values.clone(),
            },
            series: request
                .values
                .iter()
                .enumerate()
                .map(|(row, v)| series_for(v, Placement::Facet(row)))
                .collect(),
        },
    };
    ChartOutcome::Chart(spec)
}

/// One series: the rows whose basis column equals `value`, in table order.
fn group_series(table: &Table, request: &ChartRequest, value: &str, placement: Placement) -> Series {
    let group_col = request.basis.column();
    let rows = table.filter(|row| {
        row.get(group_col)
            .is_some_and(|v| !v.is_missing() && v.to_string() == value)
    });

    let x = column_text(&rows, request.basis.x_column());
    let labels = column_text(&rows, VALUE_COLUMN);
    let y = rows
        .column(VALUE_COLUMN)
        .unwrap_or(&[])
        .iter()
        .map(|v| v.coerce(Coercion::Numeric).as_number())
        .collect();

    Series {
        name: value.to_string(),
        kind: request.kind_of(value),
        x,
        y,
        labels,
        placement,
        color: None,
    }
}

fn column_text(table: &Table, name: &str) -> Vec<Option<String>> {
    table
        .column(name)
        .unwrap_or(&[])
        .iter()
        .map(|v| match v {
            Value::Missing => None,
            other => Some(other.to_string()),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::spec::{ChartKind, GroupBasis, LayoutMode, Scale};
    use ecos_api::record::flatten_rows;
    use ecos_table::date_range::{filter_by_date, DateRangeFilter};

    const TWO_ROWS_XML: &str = "<KeyStatisticList>\
<row><YYYYMM>202401</YYYYMM><CLASS_NAME>A</CLASS_NAME><KEYSTAT_NAME>X</KEYSTAT_NAME><DATA_VALUE>10</DATA_VALUE></row>\
<row><YYYYMM>202402</YYYYMM><CLASS_NAME>B</CLASS_NAME><KEYSTAT_NAME>X</KEYSTAT_NAME><DATA_VALUE>n/a</DATA_VALUE></row>\
</KeyStatisticList>";

    const THREE_CLASSES_XML: &str = "<KeyStatisticList>\
<row><CLASS_NAME>Rates</CLASS_NAME><KEYSTAT_NAME>Base rate</KEYSTAT_NAME><DATA_VALUE>3.5</DATA_VALUE></row>\
<row><CLASS_NAME>Rates</CLASS_NAME><KEYSTAT_NAME>Call rate</KEYSTAT_NAME><DATA_VALUE>3.52</DATA_VALUE></row>\
<row><CLASS_NAME>Prices</CLASS_NAME><KEYSTAT_NAME>CPI</KEYSTAT_NAME><DATA_VALUE>113.2</DATA_VALUE></row>\
<row><CLASS_NAME>Money</CLASS_NAME><KEYSTAT_NAME>M2</KEYSTAT_NAME><DATA_VALUE>3900000</DATA_VALUE></row>\
</KeyStatisticList>";

    fn table_from(xml: &str) -> Table {
        Table::from_records(&flatten_rows(xml).unwrap())
    }

    fn request(values: &[&str], layout: LayoutMode) -> ChartRequest {
        ChartRequest {
            basis: GroupBasis::ClassName,
            values: values.iter().map(|v| v.to_string()).collect(),
            layout,
            ..ChartRequest::default()
        }
    }

    fn chart(outcome: ChartOutcome) -> ChartSpec {
        match outcome {
            ChartOutcome::Chart(spec) => spec,
            ChartOutcome::Warning(w) => panic!("expected a chart, got warning: {}", w),
        }
    }

    #[test]
    fn test_two_values_combined_is_dual_axis() {
        let mut table = table_from(TWO_ROWS_XML);
        let filter = DateRangeFilter::prepare(&mut table).unwrap();
        let table = filter_by_date(&table, filter.select(None, None).as_ref());
        assert_eq!(table.len(), 2);

        let spec = chart(build_chart(&table, &request(&["A", "B"], LayoutMode::Combined)));
        assert_eq!(
            spec.layout,
            ChartLayout::DualAxis {
                left_title: "A".to_string(),
                right_title: "B".to_string()
            }
        );
        assert_eq!(spec.x_title, "KEYSTAT_NAME");
        let (left, right) = (&spec.series[0], &spec.series[1]);
        assert_eq!(left.placement, Placement::LeftAxis);
        assert_eq!(left.y, vec![Some(10.0)]);
        assert_eq!(left.x, vec![Some("X".to_string())]);
        assert_eq!(left.color, None);
        assert_eq!(right.placement, Placement::RightAxis);
        assert_eq!(right.y, vec![None]);
        assert_eq!(right.labels, vec![Some("n/a".to_string())]);
        assert_eq!(right.color.as_deref(), Some(RIGHT_AXIS_COLOR));
    }

    #[test]
    fn test_dual_axis_follows_selection_order() {
        let table = table_from(TWO_ROWS_XML);
        let spec = chart(build_chart(&table, &request(&["B", "A"], LayoutMode::Combined)));
        assert_eq!(spec.series[0].name, "B");
        assert_eq!(spec.series[0].placement, Placement::LeftAxis);
        assert_eq!(spec.series[1].name, "A");
        assert_eq!(spec.series[1].placement, Placement::RightAxis);
    }

    #[test]
    fn test_per_value_kind_and_scale() {
        let table = table_from(TWO_ROWS_XML);
        let mut req = request(&["A", "B"], LayoutMode::Combined);
        req.kinds.insert("B".to_string(), ChartKind::Line);
        req.scale = Scale::Log;
        let spec = chart(build_chart(&table, &req));
        assert_eq!(spec.series[0].kind, ChartKind::Bar);
        assert_eq!(spec.series[1].kind, ChartKind::Line);
        assert_eq!(spec.scale, Scale::Log);
    }

    #[test]
    fn test_missing_value_column_warns() {
        let xml = TWO_ROWS_XML.replace("DATA_VALUE", "VALUE");
        let table = table_from(&xml);
        let outcome = build_chart(&table, &request(&["A", "B"], LayoutMode::Combined));
        assert_eq!(
            outcome,
            ChartOutcome::Warning(MISSING_COLUMNS_WARNING.to_string())
        );
    }

    #[test]
    fn test_one_or_three_values_combined_is_grouped() {
        let table = table_from(THREE_CLASSES_XML);
        let one = chart(build_chart(&table, &request(&["Rates"], LayoutMode::Combined)));
        assert_eq!(one.layout, ChartLayout::Grouped);
        assert_eq!(one.series.len(), 1);
        assert_eq!(
            one.series[0].x,
            vec![Some("Base rate".to_string()), Some("Call rate".to_string())]
        );

        let three = chart(build_chart(
            &table,
            &request(&["Rates", "Prices", "Money"], LayoutMode::Combined),
        ));
        assert_eq!(three.layout, ChartLayout::Grouped);
        assert!(three.series.iter().all(|s| s.placement == Placement::Shared));
        assert_eq!(three.series.len(), 3);
    }

    #[test]
    fn test_three_values_faceted() {
        let table = table_from(THREE_CLASSES_XML);
        let spec = chart(build_chart(
            &table,
            &request(&["Money", "Rates", "Prices"], LayoutMode::Faceted),
        ));
        assert_eq!(
            spec.layout,
            ChartLayout::Faceted {
                titles: vec!["Money".to_string(), "Rates".to_string(), "Prices".to_string()]
            }
        );
        assert_eq!(spec.series.len(), 3);
        for (row, series) in spec.series.iter().enumerate() {
            assert_eq!(series.placement, Placement::Facet(row));
        }
        assert_eq!(spec.series[0].y, vec![Some(3_900_000.0)]);
    }

    #[test]
    fn test_keystat_basis_uses_class_as_x() {
        let table = table_from(THREE_CLASSES_XML);
        let req = ChartRequest {
            basis: GroupBasis::KeystatName,
            values: vec!["CPI".to_string()],
            ..ChartRequest::default()
        };
        let spec = chart(build_chart(&table, &req));
        assert_eq!(spec.x_title, "CLASS_NAME");
        assert_eq!(spec.series[0].x, vec![Some("Prices".to_string())]);
    }

    #[test]
    fn test_unmatched_value_is_empty_series() {
        let table = table_from(THREE_CLASSES_XML);
        let spec = chart(build_chart(&table, &request(&["Nothing"], LayoutMode::Faceted)));
        assert_eq!(spec.series.len(), 1);
        assert!(spec.series[0].x.is_empty());
        assert!(spec.series[0].y.is_empty());
    }

    #[test]
    fn test_empty_selection_is_empty_chart() {
        let table = table_from(THREE_CLASSES_XML);
        let combined = chart(build_chart(&table, &request(&[], LayoutMode::Combined)));
        assert!(combined.is_empty());
        let faceted = chart(build_chart(&table, &request(&[], LayoutMode::Faceted)));
        assert!(faceted.is_empty());
    }
}
