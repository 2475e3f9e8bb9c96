//! Fixed file names and column orders of the output tables.
//!
//! These are consumed verbatim by the bulk loader; renaming or reordering a
//! column breaks it.

/// File name and ordered header of one output table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TableSpec {
    pub file_name: &'static str,
    pub columns: &'static [&'static str],
}

impl TableSpec {
    /// The file stem, used as the table label.
    pub fn name(&self) -> &'static str {
        self.file_name
            .strip_suffix(".csv")
            .unwrap_or(self.file_name)
    }
}

pub const AEOLUS_LOOKUP: TableSpec = TableSpec {
    file_name: "aeolus_drug_outcome_lookup.csv",
    columns: &[
        "rxcui",
        "drug_name",
        "outcome_concept_id",
        "outcome_text",
        "meddra_code",
        "case_count",
        "prr",
        "ror",
    ],
};

pub const INGREDIENT_MAP: TableSpec = TableSpec {
    file_name: "rxcui_to_ingredient_map.csv",
    columns: &["rxcui", "ingredient_rxcui"],
};

pub const RISK_ANNOTATIONS: TableSpec = TableSpec {
    file_name: "patient_ae_risk_annotations_rxnav.csv",
    columns: &[
        "patient_uuid",
        "rxcui_x",
        "ingredient_rxcui",
        "synthea_drug_desc",
        "aeolus_drug_name",
        "START",
        "STOP",
        "estimated_onset",
        "outcome_concept_id",
        "outcome_text",
        "meddra_code",
        "case_count",
        "prr",
        "ror",
    ],
};

const ENRICHED_COLUMNS: &[&str] = &[
    "patient_uuid",
    "Age",
    "Sex",
    "Comorbidities",
    "START",
    "STOP",
    "synthea_drug_desc",
    "rxcui_x",
    "ingredient_rxcui",
    "aeolus_drug_name",
    "outcome_text",
    "meddra_code",
    "case_count",
    "prr",
    "ror",
    "synthea_drug",
];

pub const ENRICHED: TableSpec = TableSpec {
    file_name: "ae_risk_enriched.csv",
    columns: ENRICHED_COLUMNS,
};

pub const TOP_K: TableSpec = TableSpec {
    file_name: "ae_risk_topk_per_patient_drug.csv",
    columns: ENRICHED_COLUMNS,
};

pub const DDI_REFERENCE: TableSpec = TableSpec {
    file_name: "ddi_ref_unified.csv",
    columns: &[
        "pair_key",
        "drug1_norm",
        "drug2_norm",
        "unified_severity",
        "unified_mechanism_text",
        "sources_present",
        "ddi_confidence",
    ],
};

pub const CO_EXPOSURE: TableSpec = TableSpec {
    file_name: "patient_ddi_collapsed_from_topk.csv",
    columns: &[
        "patient_uuid",
        "drug1",
        "drug2",
        "drug1_norm",
        "drug2_norm",
        "overlap_start",
        "overlap_stop",
        "Age",
        "Sex",
        "Comorbidities",
        "pair_key",
        "unified_severity",
        "unified_mechanism_text",
        "ddi_confidence",
        "ddi_known",
    ],
};

/// Every output table in pipeline order.
pub const ALL_TABLES: [TableSpec; 7] = [
    AEOLUS_LOOKUP,
    INGREDIENT_MAP,
    RISK_ANNOTATIONS,
    ENRICHED,
    TOP_K,
    DDI_REFERENCE,
    CO_EXPOSURE,
];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn file_names_are_unique() {
        let names: HashSet<_> = ALL_TABLES.iter().map(|t| t.file_name).collect();
        assert_eq!(names.len(), ALL_TABLES.len());
    }

    #[test]
    fn no_duplicate_columns() {
        for table in ALL_TABLES {
            let columns: HashSet<_> = table.columns.iter().collect();
            assert_eq!(columns.len(), table.columns.len(), "{}", table.name());
        }
    }
}
