use std::fmt;

/// Symmetric identifier for an unordered pair of normalized drug names.
///
/// The two names are stored sorted, so `PairKey::new(a, b) == PairKey::new(b, a)`.
/// Callers pass names that already went through the name normalizer; the key
/// itself does no normalization.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PairKey {
    first: String,
    second: String,
}

impl PairKey {
    /// Delimiter used by the textual encoding; normalized names never contain it.
    pub const DELIMITER: char = '|';

    pub fn new(a: impl Into<String>, b: impl Into<String>) -> Self {
        let a = a.into();
        let b = b.into();
        if a <= b {
            Self {
                first: a,
                second: b,
            }
        } else {
            Self {
                first: b,
                second: a,
            }
        }
    }

    pub fn first(&self) -> &str {
        &self.first
    }

    pub fn second(&self) -> &str {
        &self.second
    }
}

impl fmt::Display for PairKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.first, Self::DELIMITER, self.second)
    }
}
