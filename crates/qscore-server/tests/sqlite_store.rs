use qscore_model::{NewSubmission, Question, Section};
use qscore_server::{SqliteStore, SubmissionStore};
use std::time::Duration;
use tempfile::tempdir;

fn submission(name: &str, section_name: &str, scores: &[i64]) -> NewSubmission {
    NewSubmission {
        name: name.to_string(),
        questionnaire_ref: None,
        sections: vec![Section {
            section_name: section_name.to_string(),
            questions: scores
                .iter()
                .enumerate()
                .map(|(i, s)| Question {
                    question_id: format!("q{i}"),
                    question_text: format!("question {i}"),
                    score: Some(*s),
                })
                .collect(),
        }],
    }
}

#[tokio::test]
async fn insert_assigns_id_and_timestamp_and_survives_reopen() {
    let dir = tempdir().expect("tempdir");
    let db = dir.path().join("responses.sqlite");

    let store = SqliteStore::open(&db).await.expect("open store");
    let stored = store
        .insert(submission("Alice", "Communication", &[4, 5]))
        .await
        .expect("insert");
    assert!(!stored.id.is_empty());
    assert_eq!(stored.name, "Alice");
    assert_eq!(stored.sections.len(), 1);
    drop(store);

    let reopened = SqliteStore::open(&db).await.expect("reopen store");
    let all = reopened.find_all().await.expect("find all");
    assert_eq!(all.len(), 1);
    assert_eq!(all[0], stored);

    let by_id = reopened.find_by_id(&stored.id).await.expect("find by id");
    assert_eq!(by_id.as_ref(), Some(&stored));
    let missing = reopened.find_by_id("no-such-id").await.expect("find by id");
    assert_eq!(missing, None);
}

#[tokio::test]
async fn queries_order_newest_first_and_filter_exactly() {
    let dir = tempdir().expect("tempdir");
    let store = SqliteStore::open(dir.path().join("responses.sqlite"))
        .await
        .expect("open store");

    let first = store
        .insert(submission("Alice", "A", &[4]))
        .await
        .expect("insert");
    tokio::time::sleep(Duration::from_millis(2)).await;
    let second = store
        .insert(submission("Bob", "A", &[2]))
        .await
        .expect("insert");
    tokio::time::sleep(Duration::from_millis(2)).await;
    let third = store
        .insert(submission("Alice", "B", &[3]))
        .await
        .expect("insert");

    let all = store.find_all().await.expect("find all");
    let ids: Vec<&str> = all.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![third.id.as_str(), second.id.as_str(), first.id.as_str()]);

    let alice = store.find_by_name("Alice").await.expect("find by name");
    let ids: Vec<&str> = alice.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec![third.id.as_str(), first.id.as_str()]);

    // Exact match only, no prefix or case folding.
    assert!(store.find_by_name("alice").await.expect("find").is_empty());
    assert!(store.find_by_name("Ali").await.expect("find").is_empty());
}
