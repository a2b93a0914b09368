use log::debug;
use std::collections::HashMap;
use std::sync::RwLock;

use super::commodities_model::Commodity;
use super::commodities_traits::CommodityTable;
use crate::constants::{CURRENCY_NAMESPACE, UNIQUE_NAME_SEPARATOR};

type Namespaces = HashMap<String, HashMap<String, Commodity>>;

/// Commodity directory held in memory.
///
/// The currency namespace is always registered, even when empty.
pub struct InMemoryCommodityTable {
    namespaces: RwLock<Namespaces>,
}

impl InMemoryCommodityTable {
    pub fn new() -> Self {
        let mut namespaces = HashMap::new();
        namespaces.insert(CURRENCY_NAMESPACE.to_string(), HashMap::new());
        Self {
            namespaces: RwLock::new(namespaces),
        }
    }

    /// Creates a table pre-populated with the given commodities.
    pub fn with_commodities(commodities: impl IntoIterator<Item = Commodity>) -> Self {
        let table = Self::new();
        for commodity in commodities {
            table.insert(commodity);
        }
        table
    }

    /// Registers an empty namespace.
    pub fn add_namespace(&self, namespace: &str) {
        let mut namespaces = self
            .namespaces
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        namespaces.entry(namespace.to_string()).or_default();
    }

    /// Inserts a commodity, registering its namespace if needed.
    ///
    /// Returns the commodity previously stored under the same
    /// namespace and mnemonic, if any.
    pub fn insert(&self, commodity: Commodity) -> Option<Commodity> {
        debug!("Registering commodity {}", commodity.unique_name());
        let mut namespaces = self
            .namespaces
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        namespaces
            .entry(commodity.namespace.clone())
            .or_default()
            .insert(commodity.mnemonic.clone(), commodity)
    }

    pub fn len(&self) -> usize {
        self.read().values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Namespaces> {
        self.namespaces
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl Default for InMemoryCommodityTable {
    fn default() -> Self {
        Self::new()
    }
}

impl CommodityTable for InMemoryCommodityTable {
    fn lookup_unique(&self, unique_name: &str) -> Option<Commodity> {
        let (namespace, mnemonic) = unique_name.split_once(UNIQUE_NAME_SEPARATOR)?;
        self.lookup(namespace, mnemonic)
    }

    fn lookup(&self, namespace: &str, mnemonic: &str) -> Option<Commodity> {
        self.read()
            .get(namespace)
            .and_then(|commodities| commodities.get(mnemonic))
            .cloned()
    }

    fn has_namespace(&self, namespace: &str) -> bool {
        self.read().contains_key(namespace)
    }
}
