use std::collections::BTreeMap;

use crate::Rxcui;

/// Product to ingredient identifier mapping.
///
/// Each product appears once. A `None` ingredient records a product whose
/// resolution was attempted and failed; it is persisted so the next run does
/// not retry it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IngredientMap {
    entries: BTreeMap<Rxcui, Option<Rxcui>>,
}

impl IngredientMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Maps every distinct product to itself.
    pub fn identity(products: impl IntoIterator<Item = Rxcui>) -> Self {
        products.into_iter().map(|rxcui| (rxcui, Some(rxcui))).collect()
    }

    /// Records a mapping; a later insert for the same product replaces the earlier one.
    pub fn insert(&mut self, product: Rxcui, ingredient: Option<Rxcui>) {
        self.entries.insert(product, ingredient);
    }

    /// The ingredient of `product`, or `None` when unknown or unresolved.
    pub fn ingredient(&self, product: Rxcui) -> Option<Rxcui> {
        self.entries.get(&product).copied().flatten()
    }

    pub fn contains(&self, product: Rxcui) -> bool {
        self.entries.contains_key(&product)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Number of products with a resolved ingredient.
    pub fn resolved(&self) -> usize {
        self.entries.values().filter(|v| v.is_some()).count()
    }

    /// Entries in ascending product order.
    pub fn iter(&self) -> impl Iterator<Item = (Rxcui, Option<Rxcui>)> + '_ {
        self.entries.iter().map(|(k, v)| (*k, *v))
    }
}

impl FromIterator<(Rxcui, Option<Rxcui>)> for IngredientMap {
    fn from_iter<T: IntoIterator<Item = (Rxcui, Option<Rxcui>)>>(iter: T) -> Self {
        Self {
            entries: iter.into_iter().collect(),
        }
    }
}
