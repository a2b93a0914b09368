/// Namespace holding ISO 4217 currencies in the commodity table
pub const CURRENCY_NAMESPACE: &str = "CURRENCY";

/// Separator between namespace and mnemonic in a commodity unique name
pub const UNIQUE_NAME_SEPARATOR: &str = "::";

/// Extra precision kept on price values beyond the currency fraction
pub const PRICE_DENOM_MULT: i64 = 10_000;

/// Hour (UTC) of the time-zone-neutral instant used for a price date
pub const NEUTRAL_HOUR: u32 = 10;

/// Minute (UTC) of the time-zone-neutral instant used for a price date
pub const NEUTRAL_MINUTE: u32 = 59;
