//! Price domain models.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::commodities::Commodity;

// =============================================================================
// Constants
// =============================================================================

/// Provenance tag stored with imported prices
pub const PRICE_SOURCE_USER_PRICE: &str = "user:price";

/// Type tag stored with imported prices
pub const PRICE_TYPE_LAST: &str = "last";

// =============================================================================
// Price Source
// =============================================================================

/// Where a price came from.
///
/// Serialized as its provenance tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PriceSource {
    /// Imported or otherwise supplied by the user
    #[default]
    #[serde(rename = "user:price")]
    UserPrice,
}

impl PriceSource {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceSource::UserPrice => PRICE_SOURCE_USER_PRICE,
        }
    }
}

// =============================================================================
// Price Type
// =============================================================================

/// Kind of quote a price records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PriceType {
    /// Last traded or closing value
    #[default]
    #[serde(rename = "last")]
    Last,
}

impl PriceType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PriceType::Last => PRICE_TYPE_LAST,
        }
    }
}

// =============================================================================
// Price
// =============================================================================

/// Value of one unit of `commodity` expressed in `currency` at `time`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Price {
    pub id: String,
    pub commodity: Commodity,
    pub currency: Commodity,
    pub time: DateTime<Utc>,
    pub value: Decimal,
    pub source: PriceSource,
    pub price_type: PriceType,
}

impl Price {
    /// Creates a price with a freshly generated id.
    pub fn new(
        commodity: Commodity,
        currency: Commodity,
        time: DateTime<Utc>,
        value: Decimal,
        source: PriceSource,
        price_type: PriceType,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            commodity,
            currency,
            time,
            value,
            source,
            price_type,
        }
    }

    /// Calendar day (UTC) the price applies to.
    pub fn day(&self) -> NaiveDate {
        self.time.date_naive()
    }

    /// Returns true if this price is for the given pair on the given day.
    pub fn matches(&self, commodity: &Commodity, currency: &Commodity, day: NaiveDate) -> bool {
        &self.commodity == commodity && &self.currency == currency && self.day() == day
    }
}

// =============================================================================
// Commit Outcome
// =============================================================================

/// Result of committing one imported price to a store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PriceOutcome {
    /// A new price was inserted.
    Added,
    /// An existing same-day price for the pair was overwritten.
    Replaced,
    /// A same-day price already existed and was left alone.
    Duplicated,
    /// Essentials were missing, nothing was written.
    Failed,
}

impl PriceOutcome {
    /// Returns true if the store now holds the imported value.
    pub fn is_written(&self) -> bool {
        matches!(self, PriceOutcome::Added | PriceOutcome::Replaced)
    }
}
