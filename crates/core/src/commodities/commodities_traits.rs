use super::commodities_model::Commodity;

/// Read-only directory of commodities and currencies consulted while
/// resolving imported columns.
///
/// Table maintenance (creating commodities, loading ISO currencies) belongs
/// to the caller; the importer only queries.
pub trait CommodityTable: Send + Sync {
    /// Looks up a commodity by its unique name ("NAMESPACE::MNEMONIC").
    fn lookup_unique(&self, unique_name: &str) -> Option<Commodity>;

    /// Looks up a commodity by namespace and mnemonic.
    fn lookup(&self, namespace: &str, mnemonic: &str) -> Option<Commodity>;

    /// Returns true if the namespace is registered in the table.
    fn has_namespace(&self, namespace: &str) -> bool;

    fn is_currency(&self, commodity: &Commodity) -> bool {
        commodity.is_currency()
    }

    /// Denominator of the smallest fractional unit of `commodity`.
    fn fraction(&self, commodity: &Commodity) -> i64 {
        commodity.fraction
    }
}
