//! Saved configuration for a price import.

use log::debug;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::Path;

use crate::errors::{Error, Result};
use crate::import::{CurrencyFormat, DateFormat, PricePropType};

/// How a price file is read and where its columns go.
///
/// `column_types[i]` is the property column `i` is mapped to.
/// `from_commodity` and `to_currency` are commodity unique names
/// ("NASDAQ::AAPL", "CURRENCY::USD") used when the file has no column for
/// them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct PriceImportSettings {
    pub name: String,
    /// Field separator for delimited files
    pub separator: char,
    pub currency_format: CurrencyFormat,
    pub date_format: DateFormat,
    /// Replace same-day prices already in the store
    pub over_write: bool,
    pub skip_start_lines: usize,
    pub skip_end_lines: usize,
    /// Skip every other line after the leading ones
    pub skip_alt_lines: bool,
    pub column_types: Vec<PricePropType>,
    pub from_commodity: Option<String>,
    pub to_currency: Option<String>,
}

impl Default for PriceImportSettings {
    fn default() -> Self {
        Self {
            name: String::new(),
            separator: ',',
            currency_format: CurrencyFormat::default(),
            date_format: DateFormat::default(),
            over_write: false,
            skip_start_lines: 0,
            skip_end_lines: 0,
            skip_alt_lines: false,
            column_types: Vec::new(),
            from_commodity: None,
            to_currency: None,
        }
    }
}

impl PriceImportSettings {
    /// Reads settings from a JSON file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        debug!("Loading price import settings from {}", path.display());
        let content = fs::read_to_string(path)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))?;
        let settings = serde_json::from_str(&content)?;
        Ok(settings)
    }

    /// Writes settings to a JSON file, replacing any existing one.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path, content)
            .map_err(|e| Error::ConfigIO(format!("{}: {}", path.display(), e)))?;
        Ok(())
    }

    fn has_column(&self, kind: PricePropType) -> bool {
        self.column_types.contains(&kind)
    }

    /// Checks that the column mapping and defaults can produce complete
    /// prices.
    pub fn verify_column_selections(&self) -> Result<()> {
        if !self.separator.is_ascii() {
            return Err(Error::InvalidConfigValue(format!(
                "Separator '{}' is not a single-byte character.",
                self.separator
            )));
        }

        let mut seen = HashSet::new();
        for kind in self
            .column_types
            .iter()
            .filter(|kind| **kind != PricePropType::None)
        {
            if !seen.insert(*kind) {
                return Err(Error::InvalidConfigValue(format!(
                    "Column type '{}' is selected more than once.",
                    kind
                )));
            }
        }

        if !self.has_column(PricePropType::Date) {
            return Err(Error::InvalidConfigValue(
                "Please select a date column.".to_string(),
            ));
        }
        if !self.has_column(PricePropType::Amount) {
            return Err(Error::InvalidConfigValue(
                "Please select an amount column.".to_string(),
            ));
        }
        if !self.has_column(PricePropType::ToCurrency) && self.to_currency.is_none() {
            return Err(Error::InvalidConfigValue(
                "Please select a 'Currency to' column or set a default 'Currency To'.".to_string(),
            ));
        }
        if self.from_commodity.is_none() {
            if !self.has_column(PricePropType::FromSymbol) {
                return Err(Error::InvalidConfigValue(
                    "Please select a 'From Symbol' column or set a default 'Commodity From'."
                        .to_string(),
                ));
            }
            if !self.has_column(PricePropType::FromNamespace) {
                return Err(Error::InvalidConfigValue(
                    "Please select a 'From Namespace' column or set a default 'Commodity From'."
                        .to_string(),
                ));
            }
        }
        if let (Some(from), Some(to)) = (&self.from_commodity, &self.to_currency) {
            if from == to {
                return Err(Error::InvalidConfigValue(
                    "'Commodity From' can not be the same as 'Currency To'.".to_string(),
                ));
            }
        }
        Ok(())
    }
}
