use crate::pair::PairKey;
use crate::patient::Demographics;
use crate::time::Timestamp;

/// Two overlapping exposures of one patient, joined to the interaction reference.
#[derive(Debug, Clone, PartialEq)]
pub struct CoExposure {
    pub patient_id: String,
    pub drug1: String,
    pub drug2: String,
    pub drug1_norm: String,
    pub drug2_norm: String,
    pub overlap_start: Timestamp,
    /// Open ends are clamped to the sentinel.
    pub overlap_stop: Timestamp,
    /// Snapshot of the first exposure's row.
    pub demographics: Demographics,
    pub pair_key: PairKey,
    pub unified_severity: Option<String>,
    pub unified_mechanism_text: Option<String>,
    /// Missing when the pair is absent from the reference.
    pub ddi_confidence: Option<f64>,
    /// True iff the reference supplied a severity.
    pub known: bool,
}
