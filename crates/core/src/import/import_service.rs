//! Batch import of tokenized price rows.

use csv::ReaderBuilder;
use log::{debug, info};
use serde::{Deserialize, Serialize};
use std::io::Read;
use std::sync::Arc;

use super::import_model::PricePropType;
use super::import_price::ImportPrice;
use crate::commodities::{Commodity, CommodityTable};
use crate::errors::{Error, Result};
use crate::prices::{PriceOutcome, PriceStore};
use crate::settings::PriceImportSettings;

// =============================================================================
// Import Summary
// =============================================================================

/// A row that could not be turned into a price.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RowError {
    /// Index of the row in the input, counting skipped rows.
    pub row_index: usize,
    pub message: String,
}

/// Tally of a price import run.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportSummary {
    pub added: usize,
    pub replaced: usize,
    pub duplicated: usize,
    pub failed: usize,
    pub errors: Vec<RowError>,
}

impl ImportSummary {
    pub fn new() -> Self {
        Self::default()
    }

    fn record(&mut self, outcome: PriceOutcome) {
        match outcome {
            PriceOutcome::Added => self.added += 1,
            PriceOutcome::Replaced => self.replaced += 1,
            PriceOutcome::Duplicated => self.duplicated += 1,
            PriceOutcome::Failed => self.failed += 1,
        }
    }

    fn fail(&mut self, row_index: usize, message: impl Into<String>) {
        self.failed += 1;
        self.errors.push(RowError {
            row_index,
            message: message.into(),
        });
    }

    /// Number of rows that reached the store.
    pub fn written(&self) -> usize {
        self.added + self.replaced
    }
}

// =============================================================================
// Price Import Service
// =============================================================================

/// Imports rows of raw column values as prices.
///
/// Each row goes through an [`ImportPrice`]: mapped columns are set one by
/// one, the row is verified, and complete rows are committed with the
/// configured overwrite policy. A bad row never stops the run.
pub struct PriceImportService {
    book: Arc<dyn CommodityTable>,
    store: Arc<dyn PriceStore>,
    settings: PriceImportSettings,
}

impl PriceImportService {
    pub fn new(
        book: Arc<dyn CommodityTable>,
        store: Arc<dyn PriceStore>,
        settings: PriceImportSettings,
    ) -> Self {
        Self {
            book,
            store,
            settings,
        }
    }

    pub fn settings(&self) -> &PriceImportSettings {
        &self.settings
    }

    /// Imports `rows`, returning how many prices were added, replaced,
    /// duplicated or failed.
    ///
    /// # Errors
    ///
    /// Fails before touching the store if the settings cannot produce
    /// complete prices, and on store errors other than a refused insert.
    pub fn import_rows(&self, rows: &[Vec<String>]) -> Result<ImportSummary> {
        self.settings.verify_column_selections()?;
        let from_default = self.resolve_default(self.settings.from_commodity.as_deref())?;
        if let Some(currency) = self.resolve_default(self.settings.to_currency.as_deref())? {
            if !self.book.is_currency(&currency) {
                return Err(Error::InvalidConfigValue(format!(
                    "Default 'Currency To' {} is not a currency",
                    currency
                )));
            }
        }

        let mut summary = ImportSummary::new();
        let mut price = ImportPrice::new(
            self.book.clone(),
            self.settings.date_format,
            self.settings.currency_format,
        );

        for row_index in self.selected_rows(rows.len()) {
            price.clear();
            self.apply_defaults(&mut price, from_default.as_ref());

            let row = &rows[row_index];
            for (column, kind) in self.settings.column_types.iter().enumerate() {
                if *kind == PricePropType::None {
                    continue;
                }
                let value = row.get(column).map(|cell| cell.trim()).unwrap_or_default();
                // Errors are recorded on the price and reported below.
                let _ = price.set(*kind, value, true);
            }

            if price.has_errors() {
                summary.fail(row_index, price.errors());
                continue;
            }
            if let Err(reason) = price.verify_essentials() {
                summary.fail(row_index, reason.to_string());
                continue;
            }

            match price.create_price(self.book.as_ref(), self.store.as_ref(), self.settings.over_write) {
                Ok(outcome) => summary.record(outcome),
                Err(Error::Parse(cause)) => summary.fail(row_index, cause.to_string()),
                Err(e) => return Err(e),
            }
        }

        info!(
            "Price import finished: {} added, {} replaced, {} duplicated, {} failed",
            summary.added, summary.replaced, summary.duplicated, summary.failed
        );
        Ok(summary)
    }

    /// Reads delimited text with the configured separator and imports it.
    ///
    /// Quoted fields are unquoted and rows may have any number of fields.
    /// Skip settings apply to the records as read. The rest of the settings
    /// are checked by [`Self::import_rows`].
    pub fn import_csv<R: Read>(&self, reader: R) -> Result<ImportSummary> {
        if !self.settings.separator.is_ascii() {
            return Err(Error::InvalidConfigValue(format!(
                "Separator '{}' is not a single-byte character.",
                self.settings.separator
            )));
        }
        let separator = self.settings.separator as u8;

        let mut reader = ReaderBuilder::new()
            .delimiter(separator)
            .has_headers(false)
            .flexible(true)
            .from_reader(reader);

        let mut rows: Vec<Vec<String>> = Vec::new();
        for record in reader.records() {
            let record = record?;
            rows.push(record.iter().map(str::to_string).collect());
        }
        debug!("Read {} rows of price data", rows.len());

        self.import_rows(&rows)
    }

    /// Indices of the rows left after applying the skip settings.
    fn selected_rows(&self, total: usize) -> Vec<usize> {
        let start = self.settings.skip_start_lines.min(total);
        let end = total.saturating_sub(self.settings.skip_end_lines).max(start);
        (start..end)
            .filter(|index| !self.settings.skip_alt_lines || (index - start) % 2 == 0)
            .collect()
    }

    fn resolve_default(&self, unique_name: Option<&str>) -> Result<Option<Commodity>> {
        match unique_name {
            None => Ok(None),
            Some(name) => self.book.lookup_unique(name).map(Some).ok_or_else(|| {
                Error::InvalidConfigValue(format!("Unknown commodity '{}'", name))
            }),
        }
    }

    /// Fills the properties that have no column from the configured
    /// defaults. Columns set afterwards take precedence.
    fn apply_defaults(&self, price: &mut ImportPrice, from_default: Option<&Commodity>) {
        if let Some(commodity) = from_default {
            if !self.settings.column_types.contains(&PricePropType::FromNamespace) {
                let _ = price.set(PricePropType::FromNamespace, &commodity.namespace, false);
            }
            if !self.settings.column_types.contains(&PricePropType::FromSymbol) {
                let _ = price.set(PricePropType::FromSymbol, &commodity.mnemonic, false);
            }
        }
        if let Some(currency) = self.settings.to_currency.as_deref() {
            if !self.settings.column_types.contains(&PricePropType::ToCurrency) {
                if let Err(e) = price.set(PricePropType::ToCurrency, currency, false) {
                    debug!("Default currency '{}' rejected: {}", currency, e.cause);
                }
            }
        }
    }
}
