//! Price storage traits.
//!
//! The importer only needs three operations from a price database:
//! a day-granularity lookup, removal of an existing entry, and insertion.
//! Implementations decide how entries are persisted.

use chrono::{DateTime, Utc};

use super::prices_model::Price;
use crate::commodities::Commodity;
use crate::errors::Result;

/// Storage interface for prices.
///
/// Callers serialize commits against a given store; implementations are not
/// required to make lookup-then-insert atomic.
pub trait PriceStore: Send + Sync {
    /// Finds the price for `commodity` in `currency` on the calendar day
    /// (UTC) containing `time`.
    fn lookup_day(
        &self,
        commodity: &Commodity,
        currency: &Commodity,
        time: DateTime<Utc>,
    ) -> Result<Option<Price>>;

    /// Removes the price with the given id.
    ///
    /// Returns false if no such price was stored.
    fn remove_price(&self, price_id: &str) -> Result<bool>;

    /// Inserts a price.
    ///
    /// Returns `Ok(false)` if the store refused the price.
    fn add_price(&self, price: Price) -> Result<bool>;
}
