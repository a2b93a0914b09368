//! Staged price properties for one imported row.
//!
//! [`ImportPrice`] accumulates typed fields one column at a time. Each call
//! to [`ImportPrice::set`] either stores a validated value or records a
//! per-column error (and returns it), so columns can arrive in any order and
//! be corrected before the price is committed.
//!
//! # Key Invariants
//!
//! - `from_commodity` and `to_currency` never refer to the same commodity
//! - `to_currency` is always flagged as a currency
//! - `from_commodity` is derived from `from_symbol` + `from_namespace` and is
//!   recomputed in one place whenever either changes
//! - A column with a recorded error contributes no resolved value

use chrono::NaiveDate;
use log::{debug, warn};
use rust_decimal::Decimal;
use std::collections::BTreeMap;
use std::sync::Arc;

use super::import_model::{CurrencyFormat, DateFormat, PricePropType};
use super::parsers::{parse_amount, parse_commodity, parse_date, parse_namespace};
use crate::commodities::{Commodity, CommodityTable};
use crate::constants::CURRENCY_NAMESPACE;
use crate::errors::{EssentialsError, ParseError, PropertyError};

pub struct ImportPrice {
    table: Arc<dyn CommodityTable>,
    date_format: DateFormat,
    currency_format: CurrencyFormat,

    date: Option<NaiveDate>,
    amount: Option<Decimal>,
    from_symbol: Option<String>,
    from_namespace: Option<String>,
    from_commodity: Option<Commodity>,
    to_currency: Option<Commodity>,

    errors: BTreeMap<PricePropType, PropertyError>,
}

impl ImportPrice {
    pub fn new(
        table: Arc<dyn CommodityTable>,
        date_format: DateFormat,
        currency_format: CurrencyFormat,
    ) -> Self {
        Self {
            table,
            date_format,
            currency_format,
            date: None,
            amount: None,
            from_symbol: None,
            from_namespace: None,
            from_commodity: None,
            to_currency: None,
            errors: BTreeMap::new(),
        }
    }

    /// Drops every field and error so the instance can be reused for
    /// another row. Parser options are kept.
    pub fn clear(&mut self) {
        self.date = None;
        self.amount = None;
        self.from_symbol = None;
        self.from_namespace = None;
        self.from_commodity = None;
        self.to_currency = None;
        self.errors.clear();
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    pub fn date_format(&self) -> DateFormat {
        self.date_format
    }

    pub fn currency_format(&self) -> CurrencyFormat {
        self.currency_format
    }

    pub fn date(&self) -> Option<NaiveDate> {
        self.date
    }

    pub fn amount(&self) -> Option<Decimal> {
        self.amount
    }

    pub fn from_symbol(&self) -> Option<&str> {
        self.from_symbol.as_deref()
    }

    pub fn from_namespace(&self) -> Option<&str> {
        self.from_namespace.as_deref()
    }

    pub fn from_commodity(&self) -> Option<&Commodity> {
        self.from_commodity.as_ref()
    }

    pub fn to_currency(&self) -> Option<&Commodity> {
        self.to_currency.as_ref()
    }

    /// The error currently recorded for `kind`, if any.
    pub fn error_for(&self, kind: PricePropType) -> Option<&PropertyError> {
        self.errors.get(&kind)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }

    // =========================================================================
    // Mutations
    // =========================================================================

    /// Parses `value` into the property `kind`.
    ///
    /// Any error previously recorded for `kind` is dropped first. On failure
    /// the composed error is both recorded for `kind` and returned. An empty
    /// value clears the property unless `require_nonempty` is set.
    ///
    /// `PricePropType::None` is not a price property; it is logged and
    /// otherwise ignored.
    pub fn set(
        &mut self,
        kind: PricePropType,
        value: &str,
        require_nonempty: bool,
    ) -> Result<(), PropertyError> {
        if kind == PricePropType::None {
            warn!("{:?} is an invalid property for a price", kind);
            return Ok(());
        }
        self.errors.remove(&kind);

        self.apply(kind, value, require_nonempty).map_err(|cause| {
            let error = PropertyError::new(kind, cause);
            self.errors.insert(kind, error.clone());
            error
        })
    }

    /// Clears the property `kind` along with anything derived from it.
    ///
    /// Never fails and never leaves an error behind for `kind`.
    pub fn reset(&mut self, kind: PricePropType) {
        if let Err(e) = self.set(kind, "", false) {
            debug!("Ignoring error while resetting {}: {}", kind, e.cause);
        }
        self.errors.remove(&kind);
    }

    fn apply(
        &mut self,
        kind: PricePropType,
        value: &str,
        require_nonempty: bool,
    ) -> Result<(), ParseError> {
        self.clear_field(kind);
        if value.is_empty() && require_nonempty {
            return Err(ParseError::EmptyValue);
        }

        match kind {
            PricePropType::Date => {
                if !value.is_empty() {
                    self.date = Some(parse_date(value, self.date_format)?);
                }
            }

            PricePropType::Amount => {
                if !value.is_empty() {
                    self.amount = Some(parse_amount(value, self.currency_format)?);
                }
            }

            PricePropType::FromSymbol => {
                self.from_symbol = non_empty(value);
                self.recompute_from_commodity()?;
            }

            PricePropType::FromNamespace => {
                self.from_namespace = non_empty(value);
                parse_namespace(self.table.as_ref(), value)?;
                self.recompute_from_commodity()?;
            }

            PricePropType::ToCurrency => {
                if let Some(currency) =
                    parse_commodity(self.table.as_ref(), value, CURRENCY_NAMESPACE)?
                {
                    if self.from_commodity.as_ref() == Some(&currency) {
                        return Err(ParseError::SelfReferentialPair);
                    }
                    if !self.table.is_currency(&currency) {
                        return Err(ParseError::InvalidCurrency);
                    }
                    self.to_currency = Some(currency);
                }
            }

            PricePropType::None => {}
        }

        Ok(())
    }

    /// Drops the typed value of `kind` and anything derived from it.
    fn clear_field(&mut self, kind: PricePropType) {
        match kind {
            PricePropType::Date => self.date = None,
            PricePropType::Amount => self.amount = None,
            PricePropType::FromSymbol => {
                self.from_symbol = None;
                self.from_commodity = None;
            }
            PricePropType::FromNamespace => {
                self.from_namespace = None;
                self.from_commodity = None;
            }
            PricePropType::ToCurrency => self.to_currency = None,
            PricePropType::None => {}
        }
    }

    /// Re-derives `from_commodity` from the symbol and namespace columns.
    ///
    /// A source column counts as set only if it holds text and its recorded
    /// error (if any) concerns the pair rather than its own value. A
    /// successful resolution clears pair-level errors on both columns.
    fn recompute_from_commodity(&mut self) -> Result<(), ParseError> {
        self.from_commodity = None;

        let (Some(symbol), Some(namespace)) = (
            self.usable_source(PricePropType::FromSymbol),
            self.usable_source(PricePropType::FromNamespace),
        ) else {
            return Ok(());
        };

        if let Some(commodity) = parse_commodity(self.table.as_ref(), &symbol, &namespace)? {
            if self.to_currency.as_ref() == Some(&commodity) {
                return Err(ParseError::SelfReferentialPair);
            }
            self.from_commodity = Some(commodity);
            self.errors
                .retain(|kind, error| !(kind.is_from_commodity_source() && error.cause.is_pair_level()));
        }
        Ok(())
    }

    fn usable_source(&self, kind: PricePropType) -> Option<String> {
        let raw = match kind {
            PricePropType::FromSymbol => self.from_symbol.as_ref(),
            PricePropType::FromNamespace => self.from_namespace.as_ref(),
            _ => None,
        }?;
        match self.errors.get(&kind) {
            Some(error) if !error.cause.is_pair_level() => None,
            _ => Some(raw.clone()),
        }
    }

    // =========================================================================
    // Verification
    // =========================================================================

    /// Checks that the price has everything needed to be committed.
    ///
    /// The order of the checks is part of the contract: date, amount,
    /// to-currency, from-commodity, then the self-referential pair.
    pub fn verify_essentials(&self) -> Result<(), EssentialsError> {
        if self.date.is_none() {
            return Err(EssentialsError::MissingDate);
        }
        if self.amount.is_none() {
            return Err(EssentialsError::MissingAmount);
        }
        let Some(to_currency) = &self.to_currency else {
            return Err(EssentialsError::MissingToCurrency);
        };
        let Some(from_commodity) = &self.from_commodity else {
            return Err(EssentialsError::MissingFromCommodity);
        };
        if from_commodity == to_currency {
            return Err(EssentialsError::SelfReferentialPair);
        }
        Ok(())
    }

    /// All recorded column errors, one per line, in column-kind order.
    pub fn errors(&self) -> String {
        self.errors
            .values()
            .map(|error| error.message.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}
