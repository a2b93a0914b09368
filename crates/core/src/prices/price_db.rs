use chrono::{DateTime, Utc};
use log::debug;
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

use super::prices_model::Price;
use super::prices_traits::PriceStore;
use crate::commodities::Commodity;
use crate::errors::Result;

/// Price database held in memory.
///
/// Holds at most one price per (commodity, currency, day); an insertion that
/// would add a second one is refused.
#[derive(Default)]
pub struct InMemoryPriceDb {
    prices: RwLock<Vec<Price>>,
}

impl InMemoryPriceDb {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_prices(prices: Vec<Price>) -> Self {
        Self {
            prices: RwLock::new(prices),
        }
    }

    /// Snapshot of every stored price, in insertion order.
    pub fn prices(&self) -> Vec<Price> {
        self.read().clone()
    }

    pub fn len(&self) -> usize {
        self.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.read().is_empty()
    }

    fn read(&self) -> RwLockReadGuard<'_, Vec<Price>> {
        self.prices
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn write(&self) -> RwLockWriteGuard<'_, Vec<Price>> {
        self.prices
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl PriceStore for InMemoryPriceDb {
    fn lookup_day(
        &self,
        commodity: &Commodity,
        currency: &Commodity,
        time: DateTime<Utc>,
    ) -> Result<Option<Price>> {
        let day = time.date_naive();
        Ok(self
            .read()
            .iter()
            .find(|p| p.matches(commodity, currency, day))
            .cloned())
    }

    fn remove_price(&self, price_id: &str) -> Result<bool> {
        let mut prices = self.write();
        let before = prices.len();
        prices.retain(|p| p.id != price_id);
        Ok(prices.len() != before)
    }

    fn add_price(&self, price: Price) -> Result<bool> {
        let mut prices = self.write();
        let day = price.day();
        if prices
            .iter()
            .any(|p| p.id == price.id || p.matches(&price.commodity, &price.currency, day))
        {
            debug!(
                "Refusing second price for {} in {} on {}",
                price.commodity, price.currency, day
            );
            return Ok(false);
        }
        prices.push(price);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prices::{PriceSource, PriceType};
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    fn usd() -> Commodity {
        Commodity::currency("USD", "US Dollar", 100)
    }

    fn aapl() -> Commodity {
        Commodity::new("NASDAQ", "AAPL", "Apple Inc.", 1)
    }

    fn price_at(hour: u32) -> Price {
        let time = Utc.with_ymd_and_hms(2024, 1, 15, hour, 0, 0).unwrap();
        Price::new(aapl(), usd(), time, dec!(150), PriceSource::UserPrice, PriceType::Last)
    }

    #[test]
    fn test_lookup_day_ignores_time_of_day() {
        let db = InMemoryPriceDb::new();
        assert!(db.add_price(price_at(10)).unwrap());

        let evening = Utc.with_ymd_and_hms(2024, 1, 15, 23, 0, 0).unwrap();
        assert!(db.lookup_day(&aapl(), &usd(), evening).unwrap().is_some());

        let next_day = Utc.with_ymd_and_hms(2024, 1, 16, 0, 0, 0).unwrap();
        assert!(db.lookup_day(&aapl(), &usd(), next_day).unwrap().is_none());
    }

    #[test]
    fn test_add_refuses_second_price_same_day() {
        let db = InMemoryPriceDb::new();
        assert!(db.add_price(price_at(10)).unwrap());
        assert!(!db.add_price(price_at(15)).unwrap());
        assert_eq!(db.len(), 1);
    }

    #[test]
    fn test_remove_price() {
        let price = price_at(10);
        let db = InMemoryPriceDb::with_prices(vec![price.clone()]);
        assert!(db.remove_price(&price.id).unwrap());
        assert!(!db.remove_price(&price.id).unwrap());
        assert!(db.is_empty());
    }
}
