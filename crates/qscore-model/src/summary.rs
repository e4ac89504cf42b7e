use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Derived per-name aggregate. Never persisted; recomputed on demand from
/// the full set of submissions sharing a name.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Summary {
    pub name: String,
    pub questionnaire_count: usize,
    pub section_averages: BTreeMap<String, f64>,
    pub total_average: f64,
    pub last_submission: DateTime<Utc>,
}
