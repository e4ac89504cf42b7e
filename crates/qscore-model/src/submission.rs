use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One scored question inside a section.
///
/// `score` is `Some` with a value in `[1, 5]` for every record produced by
/// the validated write path. It stays optional because the persisted payload
/// is schemaless: records written by other tools may carry a null score, and
/// the aggregation engine skips those rather than treating them as zero.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub question_id: String,
    pub question_text: String,
    pub score: Option<i64>,
}

/// A named group of scored questions within a submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Section {
    pub section_name: String,
    pub questions: Vec<Question>,
}

/// A validated submission awaiting persistence. Output of
/// [`crate::validate_submission`], input to the store's insert.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSubmission {
    pub name: String,
    pub questionnaire_ref: Option<String>,
    pub sections: Vec<Section>,
}

/// A persisted submission. The store assigns `id` and `created_at`; the
/// record is created exactly once and never updated or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StoredSubmission {
    pub id: String,
    pub name: String,
    pub questionnaire_ref: Option<String>,
    pub sections: Vec<Section>,
    pub created_at: DateTime<Utc>,
}

impl StoredSubmission {
    #[must_use]
    pub fn from_new(submission: NewSubmission, id: String, created_at: DateTime<Utc>) -> Self {
        Self {
            id,
            name: submission.name,
            questionnaire_ref: submission.questionnaire_ref,
            sections: submission.sections,
            created_at,
        }
    }
}
