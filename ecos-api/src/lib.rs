//! Client and response handling for the Bank of Korea ECOS
//! `KeyStatisticList` endpoint.
//!
//! - `client`: URL template and (with the `api` feature) the HTTP fetcher
//! - `record`: flattening of `row` elements into open field maps
//! - `error`: error type shared by both

pub mod client;
pub mod error;
pub mod record;
