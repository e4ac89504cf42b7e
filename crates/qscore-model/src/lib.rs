#![forbid(unsafe_code)]
//! Questionnaire model SSOT.
//!
//! Wire shapes (camelCase field names), the submission validator, and the
//! derived summary type. Pure; no I/O.

mod submission;
mod summary;
mod validate;

pub use submission::{NewSubmission, Question, Section, StoredSubmission};
pub use summary::Summary;
pub use validate::{validate_submission, ValidationError};

pub const CRATE_NAME: &str = "qscore-model";
