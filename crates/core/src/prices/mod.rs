//! Prices module - price records, the commit outcome and storage traits.

mod price_db;
mod prices_model;
mod prices_traits;

// Re-export the public interface
pub use price_db::InMemoryPriceDb;
pub use prices_model::*;
pub use prices_traits::PriceStore;
