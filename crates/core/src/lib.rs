//! Pricebook Core - Price import domain entities, services, and traits.
//!
//! This crate turns column-mapped text rows (a CSV file already split into
//! cells) into validated commodity prices and commits them to a price
//! database. It is storage-agnostic: the commodity directory and the price
//! database are reached through the [`CommodityTable`] and [`PriceStore`]
//! traits, with in-memory implementations provided.

pub mod commodities;
pub mod constants;
pub mod errors;
pub mod import;
pub mod prices;
pub mod settings;

// Re-export the types most callers need
pub use commodities::{Commodity, CommodityTable, InMemoryCommodityTable};
pub use import::{ImportPrice, ImportSummary, PriceImportService, PricePropType};
pub use prices::{InMemoryPriceDb, Price, PriceOutcome, PriceStore};
pub use settings::PriceImportSettings;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
