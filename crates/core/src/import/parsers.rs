//! Value parsers for imported price columns.
//!
//! Every function here is pure: it either returns a typed value or a
//! [`ParseError`], never a silently wrong value. Locale handling for numbers
//! and dates is confined to this module so the property setter stays
//! locale-agnostic.

use chrono::{Datelike, Local, NaiveDate};
use lazy_static::lazy_static;
use regex::{Captures, Regex};
use rust_decimal::Decimal;
use std::str::FromStr;

use super::import_model::{CurrencyFormat, DateFormat};
use crate::commodities::{Commodity, CommodityTable};
use crate::errors::ParseError;

lazy_static! {
    static ref DIGIT_REGEX: Regex = Regex::new(r"[0-9]").expect("Invalid regex pattern");

    /// Unicode currency symbols ($, €, £, ¥, ...)
    static ref CURRENCY_SYMBOL_REGEX: Regex =
        Regex::new(r"\p{Sc}").expect("Invalid regex pattern");

    /// Accepted date layouts per format. Components are separated by one of
    /// `- / . '` or a space; formats with a year also accept a compact form.
    static ref DATE_PATTERNS: Vec<(DateFormat, Regex)> = vec![
        (
            DateFormat::YearMonthDay,
            Regex::new(r"^(?P<year>[0-9]{4}|[0-9]{2})[-/.' ](?P<month>[0-9]{1,2})[-/.' ](?P<day>[0-9]{1,2})$")
                .expect("Invalid regex pattern"),
        ),
        (
            DateFormat::YearMonthDay,
            Regex::new(r"^(?P<year>[0-9]{4})(?P<month>[0-9]{2})(?P<day>[0-9]{2})$")
                .expect("Invalid regex pattern"),
        ),
        (
            DateFormat::DayMonthYear,
            Regex::new(r"^(?P<day>[0-9]{1,2})[-/.' ](?P<month>[0-9]{1,2})[-/.' ](?P<year>[0-9]{4}|[0-9]{2})$")
                .expect("Invalid regex pattern"),
        ),
        (
            DateFormat::DayMonthYear,
            Regex::new(r"^(?P<day>[0-9]{2})(?P<month>[0-9]{2})(?P<year>[0-9]{4})$")
                .expect("Invalid regex pattern"),
        ),
        (
            DateFormat::MonthDayYear,
            Regex::new(r"^(?P<month>[0-9]{1,2})[-/.' ](?P<day>[0-9]{1,2})[-/.' ](?P<year>[0-9]{4}|[0-9]{2})$")
                .expect("Invalid regex pattern"),
        ),
        (
            DateFormat::MonthDayYear,
            Regex::new(r"^(?P<month>[0-9]{2})(?P<day>[0-9]{2})(?P<year>[0-9]{4})$")
                .expect("Invalid regex pattern"),
        ),
        (
            DateFormat::DayMonth,
            Regex::new(r"^(?P<day>[0-9]{1,2})[-/.' ](?P<month>[0-9]{1,2})$")
                .expect("Invalid regex pattern"),
        ),
        (
            DateFormat::MonthDay,
            Regex::new(r"^(?P<month>[0-9]{1,2})[-/.' ](?P<day>[0-9]{1,2})$")
                .expect("Invalid regex pattern"),
        ),
    ];
}

/// Languages whose locales write a decimal comma and group with a period.
const COMMA_PERIOD_LANGUAGES: &[&str] = &[
    "de", "es", "it", "nl", "pt", "da", "id", "tr", "el", "ro", "hr", "sl", "sr", "is", "vi",
];

/// Languages whose locales write a decimal comma and group with a space.
const COMMA_SPACE_LANGUAGES: &[&str] = &[
    "fr", "ru", "pl", "sv", "nb", "nn", "no", "fi", "cs", "sk", "uk", "hu", "bg", "lt", "lv",
    "et",
];

// =============================================================================
// Numeric separators
// =============================================================================

/// Decimal point and digit group separator used to read an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NumericSeparators {
    pub decimal: char,
    pub group: char,
}

impl NumericSeparators {
    pub const PERIOD: NumericSeparators = NumericSeparators {
        decimal: '.',
        group: ',',
    };

    pub const COMMA: NumericSeparators = NumericSeparators {
        decimal: ',',
        group: '.',
    };

    pub fn for_format(format: CurrencyFormat) -> Self {
        match format {
            CurrencyFormat::Locale => Self::from_locale(),
            CurrencyFormat::DecimalPeriod => Self::PERIOD,
            CurrencyFormat::DecimalComma => Self::COMMA,
        }
    }

    /// Separators of the process locale, taken from the first non-empty of
    /// `LC_ALL`, `LC_NUMERIC` and `LANG`.
    pub fn from_locale() -> Self {
        let name = ["LC_ALL", "LC_NUMERIC", "LANG"]
            .iter()
            .filter_map(|var| std::env::var(var).ok())
            .find(|value| !value.is_empty())
            .unwrap_or_default();
        Self::from_locale_name(&name)
    }

    /// Separators for a POSIX locale name such as `de_DE.UTF-8` or `fr_CA`.
    pub fn from_locale_name(name: &str) -> Self {
        let base = name.split(['.', '@']).next().unwrap_or_default();
        let mut parts = base.split(['_', '-']);
        let language = parts.next().unwrap_or_default().to_lowercase();
        let region = parts.next().unwrap_or_default().to_uppercase();

        if region == "CH" || region == "LI" {
            return NumericSeparators {
                decimal: '.',
                group: '\'',
            };
        }
        if COMMA_PERIOD_LANGUAGES.contains(&language.as_str()) {
            Self::COMMA
        } else if COMMA_SPACE_LANGUAGES.contains(&language.as_str()) {
            NumericSeparators {
                decimal: ',',
                group: '\u{a0}',
            }
        } else {
            Self::PERIOD
        }
    }

    fn is_group(&self, c: char) -> bool {
        c == self.group || (self.group.is_whitespace() && c.is_whitespace())
    }
}

// =============================================================================
// Amount
// =============================================================================

/// Parses an amount using the selected currency format.
///
/// Currency symbols are stripped before parsing. The result is exact.
pub fn parse_amount(value: &str, format: CurrencyFormat) -> Result<Decimal, ParseError> {
    if !DIGIT_REGEX.is_match(value) {
        return Err(ParseError::EmptyOrNonNumeric);
    }

    let without_symbols = CURRENCY_SYMBOL_REGEX.replace_all(value, "");
    parse_with_separators(&without_symbols, NumericSeparators::for_format(format))
}

/// Reads a plain number with the given separators.
///
/// Accepts a leading `-` or surrounding parentheses for negatives, ignores
/// `+`, and allows group separators only between digits of the integer part.
fn parse_with_separators(value: &str, separators: NumericSeparators) -> Result<Decimal, ParseError> {
    let trimmed = value.trim();
    let (mut negative, body) = match trimmed
        .strip_prefix('(')
        .and_then(|inner| inner.strip_suffix(')'))
    {
        Some(inner) => (true, inner.trim()),
        None => (false, trimmed),
    };
    let parenthesized = negative;

    let mut canonical = String::with_capacity(body.len() + 1);
    let mut seen_digit = false;
    let mut seen_sign = false;
    let mut seen_decimal = false;
    let mut prev_digit = false;
    let mut pending_group = false;

    for c in body.chars() {
        if c == '+' {
            continue;
        }
        if c.is_whitespace() && !seen_digit {
            continue;
        }
        if c == '-' && !seen_digit && !seen_sign && !parenthesized {
            negative = true;
            seen_sign = true;
        } else if c.is_ascii_digit() {
            canonical.push(c);
            seen_digit = true;
            prev_digit = true;
            pending_group = false;
        } else if c == separators.decimal {
            if seen_decimal || pending_group {
                return Err(ParseError::FormatMismatch);
            }
            if canonical.is_empty() {
                canonical.push('0');
            }
            canonical.push('.');
            seen_decimal = true;
            prev_digit = false;
        } else if separators.is_group(c) {
            if seen_decimal || !prev_digit {
                return Err(ParseError::FormatMismatch);
            }
            pending_group = true;
            prev_digit = false;
        } else {
            return Err(ParseError::FormatMismatch);
        }
    }

    if !seen_digit || pending_group {
        return Err(ParseError::FormatMismatch);
    }
    if canonical.ends_with('.') {
        canonical.pop();
    }

    let amount = Decimal::from_str(&canonical).map_err(|_| ParseError::FormatMismatch)?;
    Ok(if negative { -amount } else { amount })
}

/// Renders an amount so that [`parse_amount`] with the same format reads it
/// back unchanged. No digit grouping is applied.
pub fn format_amount(value: Decimal, format: CurrencyFormat) -> String {
    let separators = NumericSeparators::for_format(format);
    let text = value.to_string();
    if separators.decimal == '.' {
        text
    } else {
        text.replace('.', &separators.decimal.to_string())
    }
}

// =============================================================================
// Commodity and namespace
// =============================================================================

/// Resolves a commodity from its symbol and namespace.
///
/// An empty symbol means "unset" and yields `Ok(None)`. The symbol is first
/// tried as a unique name, which is how saved settings refer to commodities,
/// and then looked up inside `namespace`.
pub fn parse_commodity(
    table: &dyn CommodityTable,
    symbol: &str,
    namespace: &str,
) -> Result<Option<Commodity>, ParseError> {
    if symbol.is_empty() {
        return Ok(None);
    }

    table
        .lookup_unique(symbol)
        .or_else(|| table.lookup(namespace, symbol))
        .map(Some)
        .ok_or(ParseError::UnknownCommodity)
}

/// Checks that a namespace is registered.
///
/// An empty namespace means "unset" and yields `Ok(false)`.
pub fn parse_namespace(table: &dyn CommodityTable, namespace: &str) -> Result<bool, ParseError> {
    if namespace.is_empty() {
        return Ok(false);
    }
    if table.has_namespace(namespace) {
        Ok(true)
    } else {
        Err(ParseError::UnknownNamespace)
    }
}

// =============================================================================
// Date
// =============================================================================

/// Parses a date laid out according to `format`.
///
/// Two-digit years pivot like chrono's `%y` (00-68 → 20xx, 69-99 → 19xx).
/// Formats without a year use the current local year.
pub fn parse_date(value: &str, format: DateFormat) -> Result<NaiveDate, ParseError> {
    let value = value.trim();
    let captures = DATE_PATTERNS
        .iter()
        .filter(|(fmt, _)| *fmt == format)
        .find_map(|(_, regex)| regex.captures(value))
        .ok_or(ParseError::BadDate)?;

    let year = match captures.name("year") {
        Some(year) => expand_year(year.as_str())?,
        None => Local::now().year(),
    };
    let month = capture_number(&captures, "month")?;
    let day = capture_number(&captures, "day")?;

    NaiveDate::from_ymd_opt(year, month, day).ok_or(ParseError::BadDate)
}

fn capture_number(captures: &Captures<'_>, name: &str) -> Result<u32, ParseError> {
    captures
        .name(name)
        .and_then(|m| m.as_str().parse().ok())
        .ok_or(ParseError::BadDate)
}

fn expand_year(year: &str) -> Result<i32, ParseError> {
    let number: i32 = year.parse().map_err(|_| ParseError::BadDate)?;
    if year.len() > 2 {
        Ok(number)
    } else if number < 69 {
        Ok(2000 + number)
    } else {
        Ok(1900 + number)
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commodities::InMemoryCommodityTable;
    use rust_decimal_macros::dec;

    fn table() -> InMemoryCommodityTable {
        InMemoryCommodityTable::with_commodities([
            Commodity::currency("USD", "US Dollar", 100),
            Commodity::new("NASDAQ", "AAPL", "Apple Inc.", 1),
        ])
    }

    #[test]
    fn test_amount_decimal_period_with_groups() {
        assert_eq!(
            parse_amount("1,234.56", CurrencyFormat::DecimalPeriod).unwrap(),
            dec!(1234.56)
        );
    }

    #[test]
    fn test_amount_decimal_comma_rejects_period_layout() {
        assert_eq!(
            parse_amount("1,234.56", CurrencyFormat::DecimalComma),
            Err(ParseError::FormatMismatch)
        );
        assert_eq!(
            parse_amount("1.234,56", CurrencyFormat::DecimalComma).unwrap(),
            dec!(1234.56)
        );
    }

    #[test]
    fn test_amount_without_digits() {
        assert_eq!(
            parse_amount("", CurrencyFormat::DecimalPeriod),
            Err(ParseError::EmptyOrNonNumeric)
        );
        assert_eq!(
            parse_amount("   ", CurrencyFormat::DecimalPeriod),
            Err(ParseError::EmptyOrNonNumeric)
        );
        assert_eq!(
            parse_amount("n/a", CurrencyFormat::DecimalPeriod),
            Err(ParseError::EmptyOrNonNumeric)
        );
    }

    #[test]
    fn test_amount_strips_currency_symbols() {
        assert_eq!(
            parse_amount("$150.25", CurrencyFormat::DecimalPeriod).unwrap(),
            dec!(150.25)
        );
        assert_eq!(
            parse_amount("12,50 €", CurrencyFormat::DecimalComma).unwrap(),
            dec!(12.50)
        );
        assert_eq!(
            parse_amount("£1,000", CurrencyFormat::DecimalPeriod).unwrap(),
            dec!(1000)
        );
    }

    #[test]
    fn test_amount_negative_forms() {
        assert_eq!(
            parse_amount("-42.5", CurrencyFormat::DecimalPeriod).unwrap(),
            dec!(-42.5)
        );
        assert_eq!(
            parse_amount("(42.5)", CurrencyFormat::DecimalPeriod).unwrap(),
            dec!(-42.5)
        );
        assert_eq!(
            parse_amount("- $3", CurrencyFormat::DecimalPeriod).unwrap(),
            dec!(-3)
        );
        assert_eq!(
            parse_amount("+7", CurrencyFormat::DecimalPeriod).unwrap(),
            dec!(7)
        );
    }

    #[test]
    fn test_amount_malformed() {
        for input in ["1.2.3", "12abc", "1,,000", "1,000,", ",5", "1 000", "--1", "(-1)"] {
            assert_eq!(
                parse_amount(input, CurrencyFormat::DecimalPeriod),
                Err(ParseError::FormatMismatch),
                "input {:?}",
                input
            );
        }
    }

    #[test]
    fn test_amount_leading_and_trailing_decimal_point() {
        assert_eq!(
            parse_amount(".5", CurrencyFormat::DecimalPeriod).unwrap(),
            dec!(0.5)
        );
        assert_eq!(
            parse_amount("5.", CurrencyFormat::DecimalPeriod).unwrap(),
            dec!(5)
        );
    }

    #[test]
    fn test_amount_is_exact() {
        assert_eq!(
            parse_amount("0.1", CurrencyFormat::DecimalPeriod).unwrap()
                + parse_amount("0.2", CurrencyFormat::DecimalPeriod).unwrap(),
            dec!(0.3)
        );
    }

    #[test]
    fn test_locale_separators() {
        assert_eq!(
            NumericSeparators::from_locale_name("en_US.UTF-8"),
            NumericSeparators::PERIOD
        );
        assert_eq!(
            NumericSeparators::from_locale_name("de_DE.UTF-8"),
            NumericSeparators::COMMA
        );
        assert_eq!(NumericSeparators::from_locale_name("fr_FR").decimal, ',');
        assert_eq!(NumericSeparators::from_locale_name("de_CH").group, '\'');
        assert_eq!(
            NumericSeparators::from_locale_name("C"),
            NumericSeparators::PERIOD
        );
        assert_eq!(
            NumericSeparators::from_locale_name(""),
            NumericSeparators::PERIOD
        );
    }

    #[test]
    fn test_space_grouped_amount() {
        let separators = NumericSeparators::from_locale_name("fr_FR.UTF-8");
        assert_eq!(
            parse_with_separators("1 234,5", separators).unwrap(),
            dec!(1234.5)
        );
        assert_eq!(
            parse_with_separators("1\u{a0}234,5", separators).unwrap(),
            dec!(1234.5)
        );
    }

    #[test]
    fn test_format_amount() {
        assert_eq!(
            format_amount(dec!(-1234.56), CurrencyFormat::DecimalComma),
            "-1234,56"
        );
        assert_eq!(
            format_amount(dec!(1234.56), CurrencyFormat::DecimalPeriod),
            "1234.56"
        );
    }

    #[test]
    fn test_commodity_empty_symbol_is_unset() {
        assert_eq!(parse_commodity(&table(), "", "NASDAQ"), Ok(None));
    }

    #[test]
    fn test_commodity_lookup_by_namespace() {
        let aapl = parse_commodity(&table(), "AAPL", "NASDAQ").unwrap().unwrap();
        assert_eq!(aapl.unique_name(), "NASDAQ::AAPL");
    }

    #[test]
    fn test_commodity_unique_name_ignores_namespace() {
        let usd = parse_commodity(&table(), "CURRENCY::USD", "NYSE")
            .unwrap()
            .unwrap();
        assert!(usd.is_currency());
    }

    #[test]
    fn test_commodity_unknown() {
        assert_eq!(
            parse_commodity(&table(), "AAPL", "NYSE"),
            Err(ParseError::UnknownCommodity)
        );
        assert_eq!(
            parse_commodity(&table(), "MSFT", ""),
            Err(ParseError::UnknownCommodity)
        );
    }

    #[test]
    fn test_namespace() {
        assert_eq!(parse_namespace(&table(), ""), Ok(false));
        assert_eq!(parse_namespace(&table(), "NASDAQ"), Ok(true));
        assert_eq!(
            parse_namespace(&table(), "NYSE"),
            Err(ParseError::UnknownNamespace)
        );
    }

    #[test]
    fn test_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        assert_eq!(parse_date("2024-01-15", DateFormat::YearMonthDay), Ok(expected));
        assert_eq!(parse_date("2024/1/15", DateFormat::YearMonthDay), Ok(expected));
        assert_eq!(parse_date("20240115", DateFormat::YearMonthDay), Ok(expected));
        assert_eq!(parse_date("15.01.2024", DateFormat::DayMonthYear), Ok(expected));
        assert_eq!(parse_date("01/15/2024", DateFormat::MonthDayYear), Ok(expected));
        assert_eq!(parse_date(" 15-01-24 ", DateFormat::DayMonthYear), Ok(expected));
    }

    #[test]
    fn test_date_two_digit_year_pivot() {
        assert_eq!(
            parse_date("68-06-01", DateFormat::YearMonthDay).unwrap().year(),
            2068
        );
        assert_eq!(
            parse_date("69-06-01", DateFormat::YearMonthDay).unwrap().year(),
            1969
        );
    }

    #[test]
    fn test_date_without_year_uses_current_year() {
        let date = parse_date("15/01", DateFormat::DayMonth).unwrap();
        assert_eq!((date.month(), date.day()), (1, 15));
        assert_eq!(date.year(), Local::now().year());

        let date = parse_date("01/15", DateFormat::MonthDay).unwrap();
        assert_eq!((date.month(), date.day()), (1, 15));
    }

    #[test]
    fn test_date_mismatch() {
        assert_eq!(
            parse_date("2024-01-15", DateFormat::DayMonthYear),
            Err(ParseError::BadDate)
        );
        assert_eq!(
            parse_date("2024-02-30", DateFormat::YearMonthDay),
            Err(ParseError::BadDate)
        );
        assert_eq!(
            parse_date("yesterday", DateFormat::YearMonthDay),
            Err(ParseError::BadDate)
        );
        assert_eq!(parse_date("", DateFormat::YearMonthDay), Err(ParseError::BadDate));
    }
}
