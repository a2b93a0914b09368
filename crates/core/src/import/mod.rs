//! Price import module.
//!
//! Turns the raw text of a column-mapped row into a validated price and
//! commits it to a [`PriceStore`](crate::prices::PriceStore):
//!
//! - [`parsers`] - Pure value parsers (amount, commodity, namespace, date)
//! - [`ImportPrice`] - Staged property setter and validator for one row
//! - `commit` - [`ImportPrice::create_price`] with the overwrite policy
//! - [`PriceImportService`] - Runs the above over a batch of rows
//!
//! ```text
//! raw strings → parsers → ImportPrice (typed fields + errors) → create_price → PriceStore
//! ```

mod commit;
mod import_model;
mod import_price;
mod import_service;
pub mod parsers;


pub use commit::neutral_time;
pub use import_model::{CurrencyFormat, DateFormat, PricePropType};
pub use import_price::ImportPrice;
pub use import_service::{ImportSummary, PriceImportService, RowError};
