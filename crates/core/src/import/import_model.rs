//! Column kinds and parser options for price import.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::errors::Error;

// =============================================================================
// Property Kind
// =============================================================================

/// The price property a column is mapped to.
///
/// The declaration order is the order in which recorded errors are reported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum PricePropType {
    #[default]
    None,
    Date,
    Amount,
    FromSymbol,
    FromNamespace,
    ToCurrency,
}

impl PricePropType {
    pub const ALL: [PricePropType; 6] = [
        PricePropType::None,
        PricePropType::Date,
        PricePropType::Amount,
        PricePropType::FromSymbol,
        PricePropType::FromNamespace,
        PricePropType::ToCurrency,
    ];

    /// Display label used in composed error messages.
    pub fn label(&self) -> &'static str {
        match self {
            PricePropType::None => "None",
            PricePropType::Date => "Date",
            PricePropType::Amount => "Amount",
            PricePropType::FromSymbol => "From Symbol",
            PricePropType::FromNamespace => "From Namespace",
            PricePropType::ToCurrency => "Currency To",
        }
    }

    /// Stable key used in saved settings.
    pub fn as_str(&self) -> &'static str {
        match self {
            PricePropType::None => "none",
            PricePropType::Date => "date",
            PricePropType::Amount => "amount",
            PricePropType::FromSymbol => "from_symbol",
            PricePropType::FromNamespace => "from_namespace",
            PricePropType::ToCurrency => "to_currency",
        }
    }

    /// Returns true for the two columns that together resolve the
    /// from-commodity.
    pub fn is_from_commodity_source(&self) -> bool {
        matches!(self, PricePropType::FromSymbol | PricePropType::FromNamespace)
    }
}

impl fmt::Display for PricePropType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

impl FromStr for PricePropType {
    type Err = Error;

    /// Accepts either the settings key or the display label, ignoring case,
    /// spaces and underscores.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let wanted = sanitize(s);
        PricePropType::ALL
            .into_iter()
            .find(|kind| sanitize(kind.as_str()) == wanted || sanitize(kind.label()) == wanted)
            .ok_or_else(|| Error::InvalidConfigValue(format!("Unknown column type '{}'", s)))
    }
}

fn sanitize(s: &str) -> String {
    s.chars()
        .filter(|c| !c.is_whitespace() && *c != '_' && *c != '-')
        .flat_map(char::to_lowercase)
        .collect()
}

// =============================================================================
// Currency Format
// =============================================================================

/// Number format used when parsing the amount column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum CurrencyFormat {
    /// Separators of the process locale.
    #[default]
    Locale,
    /// `.` as decimal point, `,` as group separator.
    DecimalPeriod,
    /// `,` as decimal point, `.` as group separator.
    DecimalComma,
}

// =============================================================================
// Date Format
// =============================================================================

/// Order of the date components in the date column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "y-m-d")]
    YearMonthDay,
    #[serde(rename = "d-m-y")]
    DayMonthYear,
    #[serde(rename = "m-d-y")]
    MonthDayYear,
    #[serde(rename = "d-m")]
    DayMonth,
    #[serde(rename = "m-d")]
    MonthDay,
}

impl DateFormat {
    pub const ALL: [DateFormat; 5] = [
        DateFormat::YearMonthDay,
        DateFormat::DayMonthYear,
        DateFormat::MonthDayYear,
        DateFormat::DayMonth,
        DateFormat::MonthDay,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::YearMonthDay => "y-m-d",
            DateFormat::DayMonthYear => "d-m-y",
            DateFormat::MonthDayYear => "m-d-y",
            DateFormat::DayMonth => "d-m",
            DateFormat::MonthDay => "m-d",
        }
    }

    /// Returns true if the format carries a year component.
    pub fn has_year(&self) -> bool {
        !matches!(self, DateFormat::DayMonth | DateFormat::MonthDay)
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
