//! Settings module - saved configuration for price imports.

mod settings_model;

pub use settings_model::PriceImportSettings;
