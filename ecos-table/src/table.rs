use crate::value::{Coercion, Value};
use ecos_api::record::RawRecord;
use std::collections::HashSet;
use std::io;

#[derive(Debug, Clone, PartialEq)]
struct Column {
    name: String,
    values: Vec<Value>,
}

/// Flattened rows held as named columns.
///
/// The column set is the union of field names over all rows, in
/// first-seen order. A row without a field has `Value::Missing` there.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
    len: usize,
}

/// Borrowed view of one row, for predicates.
#[derive(Debug, Clone, Copy)]
pub struct RowView<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> RowView<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    /// Cell in the named column; `None` if the table has no such column.
    pub fn get(&self, name: &str) -> Option<&'a Value> {
        self.table.column(name).map(|values| &values[self.index])
    }
}

impl Table {
    /// Build a table from flattened records, preserving row order.
    pub fn from_records(records: &[RawRecord]) -> Table {
        let mut columns: Vec<Column> = Vec::new();
        for record in records {
            for name in record.field_names() {
                if !columns.iter().any(|c| c.name == name) {
                    columns.push(Column {
                        name: name.to_string(),
                        values: Vec::with_capacity(records.len()),
                    });
                }
            }
        }
        for record in records {
            for column in columns.iter_mut() {
                column.values.push(Value::from(record.get(&column.name)));
            }
        }
        Table {
            columns,
            len: records.len(),
        }
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }

    /// True only if every named column is present.
    pub fn has_columns(&self, names: &[&str]) -> bool {
        names.iter().all(|name| self.has_column(name))
    }

    pub fn column(&self, name: &str) -> Option<&[Value]> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .map(|c| c.values.as_slice())
    }

    /// Coerce every value of a column in place. Returns false if the column
    /// is absent; individual values that fail coercion become missing.
    pub fn coerce_column(&mut self, name: &str, to: Coercion) -> bool {
        match self.columns.iter_mut().find(|c| c.name == name) {
            Some(column) => {
                for value in column.values.iter_mut() {
                    *value = value.coerce(to);
                }
                true
            }
            None => false,
        }
    }

    pub fn rows(&self) -> impl Iterator<Item = RowView<'_>> {
        (0..self.len).map(move |index| RowView { table: self, index })
    }

    /// Keep the rows whose mask entry is true. Row order is preserved; rows
    /// beyond the end of the mask are dropped.
    pub fn mask(&self, mask: &[bool]) -> Table {
        let keep = |i: usize| mask.get(i).copied().unwrap_or(false);
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                values: c
                    .values
                    .iter()
                    .enumerate()
                    .filter(|(i, _)| keep(*i))
                    .map(|(_, v)| v.clone())
                    .collect(),
            })
            .collect();
        Table {
            columns,
            len: (0..self.len).filter(|i| keep(*i)).count(),
        }
    }

    /// Keep the rows for which the predicate holds.
    pub fn filter<F>(&self, predicate: F) -> Table
    where
        F: Fn(&RowView) -> bool,
    {
        let mask: Vec<bool> = self.rows().map(|row| predicate(&row)).collect();
        self.mask(&mask)
    }

    /// Distinct non-missing values of a column, rendered as text, in
    /// first-occurrence order. Empty if the column is absent.
    pub fn distinct(&self, name: &str) -> Vec<String> {
        let mut seen = HashSet::new();
        self.column(name)
            .unwrap_or(&[])
            .iter()
            .filter(|v| !v.is_missing())
            .map(|v| v.to_string())
            .filter(|s| seen.insert(s.clone()))
            .collect()
    }

    /// Write the table as CSV with a header row. Missing cells are empty.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> csv::Result<()> {
        let mut wtr = csv::Writer::from_writer(writer);
        wtr.write_record(self.column_names())?;
        for row in 0..self.len {
            wtr.write_record(self.columns.iter().map(|c| c.values[row].to_string()))?;
        }
        wtr.flush()?;
        Ok(())
    }
}
