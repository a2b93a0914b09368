//! Commit of a verified [`ImportPrice`] into a price store.

use chrono::{DateTime, NaiveDate, Utc};
use log::{debug, error, warn};
use rust_decimal::{Decimal, RoundingStrategy};

use super::import_price::ImportPrice;
use crate::commodities::CommodityTable;
use crate::constants::{NEUTRAL_HOUR, NEUTRAL_MINUTE, PRICE_DENOM_MULT};
use crate::errors::{Error, ParseError, Result};
use crate::prices::{Price, PriceOutcome, PriceSource, PriceStore, PriceType};

impl ImportPrice {
    /// Writes this price to `pdb`, honouring the overwrite policy.
    ///
    /// Returns `Ok(PriceOutcome::Failed)` without touching the store if the
    /// essentials are not in place. A price already stored for the same pair
    /// and day is left alone (`Duplicated`) unless `overwrite` is set, in
    /// which case it is replaced (`Replaced`).
    ///
    /// # Errors
    ///
    /// `ParseError::StoreRejected` if the store refuses the new price, or the
    /// store's own error. Either way a price removed for overwriting is put
    /// back.
    pub fn create_price(
        &self,
        book: &dyn CommodityTable,
        pdb: &dyn PriceStore,
        overwrite: bool,
    ) -> Result<PriceOutcome> {
        if let Err(reason) = self.verify_essentials() {
            warn!(
                "Refusing to create price because essentials not set properly: {}",
                reason
            );
            return Ok(PriceOutcome::Failed);
        }
        let (Some(date), Some(amount), Some(from_commodity), Some(to_currency)) = (
            self.date(),
            self.amount(),
            self.from_commodity(),
            self.to_currency(),
        ) else {
            return Ok(PriceOutcome::Failed);
        };

        let time = neutral_time(date)?;
        let denom = book
            .fraction(to_currency)
            .checked_mul(PRICE_DENOM_MULT)
            .ok_or_else(|| Error::Unexpected(format!("Fraction of {} is out of range", to_currency)))?;
        let value = round_half_up(amount, denom)?;

        let mut outcome = PriceOutcome::Added;
        let mut replaced = None;
        if let Some(old_price) = pdb.lookup_day(from_commodity, to_currency, time)? {
            if !overwrite {
                debug!(
                    "Price for {} in {} on {} already exists",
                    from_commodity, to_currency, date
                );
                return Ok(PriceOutcome::Duplicated);
            }
            debug!("Over write price {}", old_price.id);
            pdb.remove_price(&old_price.id)?;
            replaced = Some(old_price);
            outcome = PriceOutcome::Replaced;
        }

        debug!(
            "Date is {}, Commodity from is '{}', Currency is '{}', Amount is {}",
            date, from_commodity.fullname, to_currency.fullname, value
        );
        let price = Price::new(
            from_commodity.clone(),
            to_currency.clone(),
            time,
            value,
            PriceSource::UserPrice,
            PriceType::Last,
        );

        let inserted = pdb.add_price(price);
        if !matches!(inserted, Ok(true)) {
            if let Some(old_price) = replaced {
                restore_price(pdb, old_price);
            }
        }
        match inserted {
            Ok(true) => Ok(outcome),
            Ok(false) => Err(ParseError::StoreRejected.into()),
            Err(e) => Err(e),
        }
    }
}

/// Puts back a price removed for overwriting after the new one failed to
/// go in.
fn restore_price(pdb: &dyn PriceStore, old_price: Price) {
    let id = old_price.id.clone();
    match pdb.add_price(old_price) {
        Ok(true) => debug!("Restored price {} after failed insert", id),
        Ok(false) => error!("Store refused to restore price {}", id),
        Err(e) => error!("Failed to restore price {}: {}", id, e),
    }
}

/// The instant used for a price date: 10:59 UTC, which falls on the same
/// calendar day in every time zone from UTC-10 to UTC+13.
pub fn neutral_time(date: NaiveDate) -> Result<DateTime<Utc>> {
    date.and_hms_opt(NEUTRAL_HOUR, NEUTRAL_MINUTE, 0)
        .map(|naive| naive.and_utc())
        .ok_or_else(|| Error::Unexpected(format!("No neutral time for {}", date)))
}

/// Rounds `amount` to the nearest multiple of `1 / denom`, halves away
/// from zero.
fn round_half_up(amount: Decimal, denom: i64) -> Result<Decimal> {
    if denom <= 0 {
        return Err(Error::Unexpected(format!("Invalid price denominator {}", denom)));
    }
    let denom = Decimal::from(denom);
    amount
        .checked_mul(denom)
        .map(|scaled| scaled.round_dp_with_strategy(0, RoundingStrategy::MidpointAwayFromZero))
        .and_then(|rounded| rounded.checked_div(denom))
        .map(|value| value.normalize())
        .ok_or_else(|| Error::Unexpected(format!("Price value {} is out of range", amount)))
}
