//! Per-product ingredient lookup strategies.

use pvl_model::Rxcui;

use crate::error::LookupError;

/// Resolves one product identifier to its ingredient identifier.
///
/// `Ok(None)` means the backend answered but knows no ingredient for the
/// product.
pub trait IngredientLookup {
    /// Short label used in logs.
    fn name(&self) -> &'static str;

    fn lookup(&self, rxcui: Rxcui) -> Result<Option<Rxcui>, LookupError>;
}

impl<T: IngredientLookup + ?Sized> IngredientLookup for Box<T> {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn lookup(&self, rxcui: Rxcui) -> Result<Option<Rxcui>, LookupError> {
        (**self).lookup(rxcui)
    }
}

/// Offline fallback: every product is its own ingredient.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityLookup;

impl IngredientLookup for IdentityLookup {
    fn name(&self) -> &'static str {
        "identity"
    }

    fn lookup(&self, rxcui: Rxcui) -> Result<Option<Rxcui>, LookupError> {
        Ok(Some(rxcui))
    }
}
