//! Tabular store and date range filtering for flattened ECOS rows.
//!
//! Rows come in as open field maps ([`ecos_api::record::RawRecord`]); the
//! [`Table`] holds them column-wise with a [`Value`] per cell so columns can be
//! coerced to dates or numbers without ever failing.

pub mod date_range;
mod table;
mod value;

pub use table::{RowView, Table};
pub use value::{Coercion, Value};
