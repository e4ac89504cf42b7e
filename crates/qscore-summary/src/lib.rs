#![forbid(unsafe_code)]
//! Aggregation engine: pure functions computing per-name statistical
//! summaries from in-memory collections of stored submissions. The full set
//! for the relevant scope is loaded first; nothing here streams or caches.

use qscore_model::{StoredSubmission, Summary};
use std::collections::BTreeMap;

pub const CRATE_NAME: &str = "qscore-summary";

#[derive(Debug, Default, Clone, Copy)]
struct RunningTotal {
    sum: i64,
    count: u64,
}

impl RunningTotal {
    fn observe(&mut self, score: i64) {
        self.sum += score;
        self.count += 1;
    }

    fn average(self) -> Option<f64> {
        if self.count == 0 {
            return None;
        }
        Some(self.sum as f64 / self.count as f64)
    }
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Walks every section and question of a group, feeding per-section and
/// group-wide totals. An empty `sectionName` contributes to the group total
/// but never to a section key; null scores are skipped everywhere.
fn accumulate(
    submissions: &[&StoredSubmission],
) -> (BTreeMap<String, RunningTotal>, RunningTotal) {
    let mut per_section: BTreeMap<String, RunningTotal> = BTreeMap::new();
    let mut overall = RunningTotal::default();
    for submission in submissions {
        for section in &submission.sections {
            let mut section_total = if section.section_name.is_empty() {
                None
            } else {
                Some(
                    per_section
                        .entry(section.section_name.clone())
                        .or_default(),
                )
            };
            for question in &section.questions {
                let Some(score) = question.score else {
                    continue;
                };
                if let Some(total) = section_total.as_mut() {
                    total.observe(score);
                }
                overall.observe(score);
            }
        }
    }
    (per_section, overall)
}

fn section_average_map(per_section: BTreeMap<String, RunningTotal>) -> BTreeMap<String, f64> {
    per_section
        .into_iter()
        .filter_map(|(name, total)| total.average().map(|avg| (name, avg)))
        .collect()
}

/// One [`Summary`] per distinct name, in ascending name order.
///
/// `last_submission` is the maximum `created_at` of the group, computed
/// explicitly rather than assuming the store's newest-first ordering.
/// Idempotent: identical input yields identical output.
#[must_use]
pub fn questionnaire_summaries(submissions: &[StoredSubmission]) -> Vec<Summary> {
    let mut groups: BTreeMap<&str, Vec<&StoredSubmission>> = BTreeMap::new();
    for submission in submissions {
        groups.entry(&submission.name).or_default().push(submission);
    }

    groups
        .into_iter()
        .filter_map(|(name, group)| {
            let last_submission = group.iter().map(|s| s.created_at).max()?;
            let (per_section, overall) = accumulate(&group);
            Some(Summary {
                name: name.to_string(),
                questionnaire_count: group.len(),
                section_averages: section_average_map(per_section),
                total_average: round2(overall.average().unwrap_or(0.0)),
                last_submission,
            })
        })
        .collect()
}

/// Per-section averages over an already name-filtered slice. Returns `None`
/// (never an empty map) when the slice is empty.
#[must_use]
pub fn average_scores_by_name(submissions: &[StoredSubmission]) -> Option<BTreeMap<String, f64>> {
    if submissions.is_empty() {
        return None;
    }
    let refs: Vec<&StoredSubmission> = submissions.iter().collect();
    let (per_section, _) = accumulate(&refs);
    Some(section_average_map(per_section))
}
