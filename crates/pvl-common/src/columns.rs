//! Case-insensitive column name resolution.

use std::collections::HashMap;

/// Resolves logical column names against the headers actually present in a file.
///
/// Keys are compared ASCII case-insensitively; when a file carries two headers
/// differing only by case the first one wins.
#[derive(Debug, Clone, Default)]
pub struct ColumnLookup {
    map: HashMap<String, String>,
}

impl ColumnLookup {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut map = HashMap::new();
        for name in names {
            let name = name.as_ref();
            let key = name.trim().trim_matches('\u{feff}').to_ascii_uppercase();
            map.entry(key).or_insert_with(|| name.to_string());
        }
        Self { map }
    }

    /// Returns the header matching `name`, if any.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.map
            .get(&name.trim().to_ascii_uppercase())
            .map(String::as_str)
    }

    /// Returns the header matching the first alias that is present.
    pub fn resolve(&self, aliases: &[&str]) -> Option<&str> {
        aliases.iter().find_map(|alias| self.get(alias))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_case_insensitive() {
        let lookup = ColumnLookup::new(["PATIENT", "Description"]);
        assert_eq!(lookup.get("patient"), Some("PATIENT"));
        assert_eq!(lookup.get("DESCRIPTION"), Some("Description"));
        assert_eq!(lookup.get("code"), None);
    }

    #[test]
    fn resolve_prefers_first_present_alias() {
        let lookup = ColumnLookup::new(["patient_id", "PATIENT"]);
        assert_eq!(lookup.resolve(&["PATIENT", "patient_id"]), Some("PATIENT"));
        assert_eq!(lookup.resolve(&["subject", "patient_id"]), Some("patient_id"));
        assert_eq!(lookup.resolve(&["subject"]), None);
    }

    #[test]
    fn bom_prefixed_header_resolves() {
        let lookup = ColumnLookup::new(["\u{feff}Id", "BIRTHDATE"]);
        assert_eq!(lookup.get("id"), Some("\u{feff}Id"));
        assert_eq!(lookup.get("birthdate"), Some("BIRTHDATE"));
    }
}
