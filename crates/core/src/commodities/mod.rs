//! Commodities module - domain models and the directory trait.

mod commodities_model;
mod commodities_traits;
mod commodity_table;

// Re-export the public interface
pub use commodities_model::Commodity;
pub use commodities_traits::CommodityTable;
pub use commodity_table::InMemoryCommodityTable;
