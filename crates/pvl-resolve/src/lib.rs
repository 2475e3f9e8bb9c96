//! Product to ingredient resolution.
//!
//! [`IngredientResolver`] combines a [`MappingCache`] with an
//! [`IngredientLookup`] strategy. Offline runs use [`IdentityLookup`];
//! online runs use [`RxNavClient`].

pub mod cache;
pub mod error;
pub mod lookup;
pub mod resolver;
pub mod rxnav;

pub use cache::{CsvMappingCache, MappingCache, MemoryMappingCache};
pub use error::{LookupError, ResolveError, Result};
pub use lookup::{IdentityLookup, IngredientLookup};
pub use resolver::{INGREDIENT_CACHE_KEY, IngredientResolver};
pub use rxnav::RxNavClient;
