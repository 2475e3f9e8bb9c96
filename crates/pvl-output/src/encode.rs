//! Cell encodings shared by every output table.
//!
//! A missing value is always an empty cell. Sets are JSON arrays of strings,
//! with the empty set written as an empty cell rather than `[]`.

use pvl_model::{
    AeolusLookupEntry, CoExposure, DdiPair, Demographics, EnrichedRisk, RiskAnnotation, Rxcui,
    Timestamp, format_timestamp,
};

/// A record that can be written as one row of an output table.
///
/// Cells must come out in the column order of the table the record is
/// written to.
pub trait ToCells {
    fn cells(&self) -> Vec<String>;
}

impl<T: ToCells + ?Sized> ToCells for &T {
    fn cells(&self) -> Vec<String> {
        (**self).cells()
    }
}

pub fn text(value: Option<&str>) -> String {
    value.unwrap_or_default().to_string()
}

pub fn integer(value: Option<i64>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

/// Floats keep a fractional part so the loader types the column as real.
pub fn float(value: Option<f64>) -> String {
    match value {
        None => String::new(),
        Some(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e16 => format!("{v:.1}"),
        Some(v) => v.to_string(),
    }
}

pub fn timestamp(value: Option<&Timestamp>) -> String {
    value.map(format_timestamp).unwrap_or_default()
}

pub fn boolean(value: bool) -> String {
    if value { "true" } else { "false" }.to_string()
}

/// JSON array of strings; an empty input is an empty cell.
pub fn string_set<'a>(values: impl IntoIterator<Item = &'a str>) -> String {
    let values: Vec<&str> = values.into_iter().collect();
    if values.is_empty() {
        return String::new();
    }
    serde_json::to_string(&values).unwrap_or_default()
}

fn demographic_cells(demographics: &Demographics) -> [String; 3] {
    [
        integer(demographics.age),
        text(demographics.sex.as_deref()),
        string_set(demographics.comorbidities.iter().map(String::as_str)),
    ]
}

impl ToCells for AeolusLookupEntry {
    fn cells(&self) -> Vec<String> {
        vec![
            self.rxcui.to_string(),
            text(self.drug_name.as_deref()),
            integer(self.outcome_concept_id),
            text(self.outcome_text.as_deref()),
            text(self.meddra_code.as_deref()),
            self.case_count.to_string(),
            float(self.prr),
            float(Some(self.ror)),
        ]
    }
}

impl ToCells for (Rxcui, Option<Rxcui>) {
    fn cells(&self) -> Vec<String> {
        vec![self.0.to_string(), integer(self.1)]
    }
}

impl ToCells for RiskAnnotation {
    fn cells(&self) -> Vec<String> {
        vec![
            self.patient_id.clone(),
            self.rxcui.to_string(),
            self.ingredient_rxcui.to_string(),
            text(self.drug_description.as_deref()),
            text(self.aeolus_drug_name.as_deref()),
            timestamp(self.start.as_ref()),
            timestamp(self.stop.as_ref()),
            timestamp(self.estimated_onset.as_ref()),
            integer(self.outcome_concept_id),
            text(self.outcome_text.as_deref()),
            text(self.meddra_code.as_deref()),
            self.case_count.to_string(),
            float(self.prr),
            float(Some(self.ror)),
        ]
    }
}

impl ToCells for EnrichedRisk {
    fn cells(&self) -> Vec<String> {
        let a = &self.annotation;
        let [age, sex, comorbidities] = demographic_cells(&self.demographics);
        vec![
            a.patient_id.clone(),
            age,
            sex,
            comorbidities,
            timestamp(a.start.as_ref()),
            timestamp(a.stop.as_ref()),
            text(a.drug_description.as_deref()),
            a.rxcui.to_string(),
            a.ingredient_rxcui.to_string(),
            text(a.aeolus_drug_name.as_deref()),
            text(a.outcome_text.as_deref()),
            text(a.meddra_code.as_deref()),
            a.case_count.to_string(),
            float(a.prr),
            float(Some(a.ror)),
            self.canonical_drug.clone(),
        ]
    }
}

impl ToCells for DdiPair {
    fn cells(&self) -> Vec<String> {
        vec![
            self.key.to_string(),
            self.drug1_norm.clone(),
            self.drug2_norm.clone(),
            text(self.unified_severity.as_deref()),
            text(self.unified_mechanism_text.as_deref()),
            string_set(self.sources_present.iter().map(|s| s.as_str())),
            float(Some(self.confidence())),
        ]
    }
}

impl ToCells for CoExposure {
    fn cells(&self) -> Vec<String> {
        let [age, sex, comorbidities] = demographic_cells(&self.demographics);
        vec![
            self.patient_id.clone(),
            self.drug1.clone(),
            self.drug2.clone(),
            self.drug1_norm.clone(),
            self.drug2_norm.clone(),
            timestamp(Some(&self.overlap_start)),
            timestamp(Some(&self.overlap_stop)),
            age,
            sex,
            comorbidities,
            self.pair_key.to_string(),
            text(self.unified_severity.as_deref()),
            text(self.unified_mechanism_text.as_deref()),
            float(self.ddi_confidence),
            boolean(self.known),
        ]
    }
}
