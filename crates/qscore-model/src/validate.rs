use crate::{NewSubmission, Question, Section};
use serde_json::Value;
use std::fmt::{Display, Formatter};

/// First violated rule of a raw submission payload. Messages are surfaced
/// verbatim in 400 bodies; they are produced locally and carry nothing
/// sensitive.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationError {
    MissingName,
    MissingSections,
    MissingSectionName,
    MissingQuestions,
    MissingQuestionFields,
    MissingScore,
    InvalidScoreRange,
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let message = match self {
            Self::MissingName => "Name is required",
            Self::MissingSections => "Sections array is required and must not be empty",
            Self::MissingSectionName => "Each section must have a sectionName",
            Self::MissingQuestions => "Each section must have a questions array",
            Self::MissingQuestionFields => "Each question must have questionId and questionText",
            Self::MissingScore => "Each question must have a score",
            Self::InvalidScoreRange => "Score must be a number between 1 and 5",
        };
        write!(f, "{message}")
    }
}

impl std::error::Error for ValidationError {}

fn non_empty_str<'a>(value: &'a Value, field: &str) -> Option<&'a str> {
    value.get(field).and_then(Value::as_str).filter(|s| !s.is_empty())
}

/// Accepts JSON integers and integral floats (`4`, `4.0`); anything else is
/// out of range for a score.
fn integer_score(value: &Value) -> Option<i64> {
    let n = value.as_f64()?;
    if n.fract() != 0.0 {
        return None;
    }
    Some(n as i64)
}

/// Total validation of a raw submission payload.
///
/// Rules are checked in a fixed order and the first failure wins; the
/// function never partially succeeds. `questionnaireRef` absent or null
/// normalizes to `None`, never an error. Pure and deterministic.
pub fn validate_submission(payload: &Value) -> Result<NewSubmission, ValidationError> {
    let name = non_empty_str(payload, "name").ok_or(ValidationError::MissingName)?;

    let sections = payload
        .get("sections")
        .and_then(Value::as_array)
        .filter(|s| !s.is_empty())
        .ok_or(ValidationError::MissingSections)?;

    let mut validated_sections = Vec::with_capacity(sections.len());
    for section in sections {
        let section_name =
            non_empty_str(section, "sectionName").ok_or(ValidationError::MissingSectionName)?;
        let questions = section
            .get("questions")
            .and_then(Value::as_array)
            .ok_or(ValidationError::MissingQuestions)?;

        let mut validated_questions = Vec::with_capacity(questions.len());
        for question in questions {
            let question_id = non_empty_str(question, "questionId")
                .ok_or(ValidationError::MissingQuestionFields)?;
            let question_text = non_empty_str(question, "questionText")
                .ok_or(ValidationError::MissingQuestionFields)?;
            let raw_score = question
                .get("score")
                .filter(|v| !v.is_null())
                .ok_or(ValidationError::MissingScore)?;
            let score = integer_score(raw_score)
                .filter(|s| (1..=5).contains(s))
                .ok_or(ValidationError::InvalidScoreRange)?;
            validated_questions.push(Question {
                question_id: question_id.to_string(),
                question_text: question_text.to_string(),
                score: Some(score),
            });
        }
        validated_sections.push(Section {
            section_name: section_name.to_string(),
            questions: validated_questions,
        });
    }

    let questionnaire_ref = payload
        .get("questionnaireRef")
        .and_then(Value::as_str)
        .filter(|s| !s.is_empty())
        .map(str::to_string);

    Ok(NewSubmission {
        name: name.to_string(),
        questionnaire_ref,
        sections: validated_sections,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn valid_payload() -> Value {
        json!({
            "name": "John Doe",
            "questionnaireRef": "ref-1",
            "sections": [
                {
                    "sectionName": "Communication Skills",
                    "questions": [
                        {"questionId": "q1", "questionText": "Rate communication", "score": 4},
                        {"questionId": "q2", "questionText": "Rate listening", "score": 5}
                    ]
                }
            ]
        })
    }

    #[test]
    fn accepts_valid_submission() {
        let submission = validate_submission(&valid_payload()).expect("valid");
        assert_eq!(submission.name, "John Doe");
        assert_eq!(submission.questionnaire_ref.as_deref(), Some("ref-1"));
        assert_eq!(submission.sections.len(), 1);
        assert_eq!(submission.sections[0].questions[0].score, Some(4));
    }

    #[test]
    fn missing_or_empty_name_fails_first() {
        // Even with broken sections, the name rule wins.
        let payload = json!({"sections": "not-an-array"});
        assert_eq!(
            validate_submission(&payload).unwrap_err(),
            ValidationError::MissingName
        );
        let payload = json!({"name": "", "sections": []});
        assert_eq!(
            validate_submission(&payload).unwrap_err(),
            ValidationError::MissingName
        );
    }

    #[test]
    fn sections_must_be_a_non_empty_array() {
        for sections in [json!(null), json!("x"), json!([])] {
            let payload = json!({"name": "A", "sections": sections});
            assert_eq!(
                validate_submission(&payload).unwrap_err(),
                ValidationError::MissingSections
            );
        }
        let payload = json!({"name": "A"});
        assert_eq!(
            validate_submission(&payload).unwrap_err(),
            ValidationError::MissingSections
        );
    }

    #[test]
    fn section_shape_rules_apply_in_order() {
        let payload = json!({"name": "A", "sections": [{"questions": []}]});
        assert_eq!(
            validate_submission(&payload).unwrap_err(),
            ValidationError::MissingSectionName
        );
        let payload = json!({"name": "A", "sections": [{"sectionName": "S"}]});
        assert_eq!(
            validate_submission(&payload).unwrap_err(),
            ValidationError::MissingQuestions
        );
        let payload = json!({"name": "A", "sections": [{"sectionName": "S", "questions": "x"}]});
        assert_eq!(
            validate_submission(&payload).unwrap_err(),
            ValidationError::MissingQuestions
        );
    }

    #[test]
    fn question_fields_checked_before_score() {
        let payload = json!({
            "name": "A",
            "sections": [{"sectionName": "S", "questions": [{"questionText": "t", "score": 9}]}]
        });
        assert_eq!(
            validate_submission(&payload).unwrap_err(),
            ValidationError::MissingQuestionFields
        );
    }

    #[test]
    fn score_presence_and_range_rules() {
        let question = |score: Value| {
            json!({
                "name": "A",
                "sections": [{
                    "sectionName": "S",
                    "questions": [{"questionId": "q", "questionText": "t", "score": score}]
                }]
            })
        };
        assert_eq!(
            validate_submission(&question(json!(null))).unwrap_err(),
            ValidationError::MissingScore
        );
        let missing = json!({
            "name": "A",
            "sections": [{"sectionName": "S", "questions": [{"questionId": "q", "questionText": "t"}]}]
        });
        assert_eq!(
            validate_submission(&missing).unwrap_err(),
            ValidationError::MissingScore
        );
        for bad in [json!(0), json!(6), json!("5"), json!(4.5)] {
            assert_eq!(
                validate_submission(&question(bad)).unwrap_err(),
                ValidationError::InvalidScoreRange
            );
        }
        // Integral floats pass as their integer value.
        let submission = validate_submission(&question(json!(4.0))).expect("integral float");
        assert_eq!(submission.sections[0].questions[0].score, Some(4));
    }

    #[test]
    fn questionnaire_ref_normalizes_to_none() {
        let mut payload = valid_payload();
        payload["questionnaireRef"] = json!(null);
        assert_eq!(
            validate_submission(&payload).expect("valid").questionnaire_ref,
            None
        );
        payload["questionnaireRef"] = json!("");
        assert_eq!(
            validate_submission(&payload).expect("valid").questionnaire_ref,
            None
        );
        payload.as_object_mut().expect("object").remove("questionnaireRef");
        assert_eq!(
            validate_submission(&payload).expect("valid").questionnaire_ref,
            None
        );
    }
}
