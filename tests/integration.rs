//! End-to-end tests for the extraction → reconcile → store → query pipeline.
//!
//! The reasoning service is replaced by a deterministic fake scripted per
//! document content, so the tests exercise the real merge, store, label, and
//! query logic without any network dependency.

use std::cell::Cell;
use std::fs;
use std::time::Duration;

use dossier::ingest::{IngestOptions, ingest_dir, ingest_file};
use dossier::labels::{load_labels, match_labels, save_labels};
use dossier::query;
use dossier::reason::{ReasonError, ReasonResult, TextReasoner};
use dossier::record::{FieldMapping, FieldValue};
use dossier::store::AggregateStore;
use tempfile::TempDir;

/// Fake reasoner scripted by prompt content: the first rule whose needle
/// appears in the prompt supplies the response.
struct ScriptedReasoner {
    rules: Vec<(&'static str, &'static str)>,
    calls: Cell<usize>,
}

impl ScriptedReasoner {
    fn new(rules: Vec<(&'static str, &'static str)>) -> Self {
        Self {
            rules,
            calls: Cell::new(0),
        }
    }
}

impl TextReasoner for ScriptedReasoner {
    fn complete(&self, _system: Option<&str>, prompt: &str) -> ReasonResult<String> {
        self.calls.set(self.calls.get() + 1);
        self.rules
            .iter()
            .find(|(needle, _)| prompt.contains(needle))
            .map(|(_, response)| response.to_string())
            .ok_or_else(|| ReasonError::RequestFailed {
                message: "no scripted response for prompt".into(),
            })
    }

    fn describe_image(&self, _image: &[u8], _instruction: &str) -> ReasonResult<String> {
        Err(ReasonError::RequestFailed {
            message: "no image support in this fake".into(),
        })
    }
}

fn zero_delay() -> IngestOptions {
    IngestOptions {
        delay: Duration::ZERO,
    }
}

#[test]
fn sequential_documents_fill_gaps_but_never_overwrite() {
    let data = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let store = AggregateStore::open(data.path()).unwrap();

    fs::write(docs.path().join("a.txt"), "document alpha").unwrap();
    fs::write(docs.path().join("b.txt"), "document beta").unwrap();

    let reasoner = ScriptedReasoner::new(vec![
        (
            "document alpha",
            r#"{"name": "Jane Doe", "city": "N/A", "dob": "1990-01-01"}"#,
        ),
        (
            "document beta",
            r#"{"name": "Janet Q. Doe", "city": "Springfield", "email": "jane@example.com"}"#,
        ),
    ]);

    // Explicit order: alpha first, then beta.
    ingest_file(&store, &reasoner, &docs.path().join("a.txt")).unwrap();
    ingest_file(&store, &reasoner, &docs.path().join("b.txt")).unwrap();

    let record = store.read().unwrap().unwrap();
    // First concrete observation wins.
    assert_eq!(record.get("name"), Some(&FieldValue::Present("Jane Doe".into())));
    // Unknown upgraded by later concrete value.
    assert_eq!(
        record.get("city"),
        Some(&FieldValue::Present("Springfield".into()))
    );
    // New key adopted.
    assert_eq!(
        record.get("email"),
        Some(&FieldValue::Present("jane@example.com".into()))
    );
    assert_eq!(
        record.get("dob"),
        Some(&FieldValue::Present("1990-01-01".into()))
    );
}

#[test]
fn concrete_value_resists_later_documents() {
    let data = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let store = AggregateStore::open(data.path()).unwrap();

    fs::write(docs.path().join("a.txt"), "document alpha").unwrap();
    fs::write(docs.path().join("b.txt"), "document beta").unwrap();

    let reasoner = ScriptedReasoner::new(vec![
        ("document alpha", r#"{"city": "Springfield"}"#),
        ("document beta", r#"{"city": "Elsewhere"}"#),
    ]);

    ingest_file(&store, &reasoner, &docs.path().join("a.txt")).unwrap();
    ingest_file(&store, &reasoner, &docs.path().join("b.txt")).unwrap();

    let record = store.read().unwrap().unwrap();
    assert_eq!(
        record.get("city"),
        Some(&FieldValue::Present("Springfield".into()))
    );
}

#[test]
fn malformed_extraction_leaves_record_unchanged_and_batch_continues() {
    let data = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let store = AggregateStore::open(data.path()).unwrap();

    fs::write(docs.path().join("good.txt"), "document alpha").unwrap();
    fs::write(docs.path().join("bad.txt"), "document broken").unwrap();

    let reasoner = ScriptedReasoner::new(vec![
        ("document alpha", r#"{"name": "Jane Doe"}"#),
        ("document broken", "I'm sorry, I cannot extract anything here."),
    ]);

    let report = ingest_dir(&store, &reasoner, docs.path(), &zero_delay()).unwrap();

    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 1);

    // The bad document contributed nothing; the good one is intact.
    let record = store.read().unwrap().unwrap();
    assert_eq!(record.len(), 1);
    assert_eq!(record.get("name"), Some(&FieldValue::Present("Jane Doe".into())));
}

#[test]
fn reasoner_outage_mid_batch_is_recoverable() {
    let data = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let store = AggregateStore::open(data.path()).unwrap();

    fs::write(docs.path().join("a.txt"), "document alpha").unwrap();
    fs::write(docs.path().join("b.txt"), "unknown content").unwrap();

    // No rule matches b.txt, so the fake fails that call.
    let reasoner = ScriptedReasoner::new(vec![("document alpha", r#"{"name": "Jane"}"#)]);

    let report = ingest_dir(&store, &reasoner, docs.path(), &zero_delay()).unwrap();
    assert_eq!(report.processed, 1);
    assert_eq!(report.failed, 1);
    assert!(store.read().unwrap().is_some());
}

#[test]
fn empty_store_query_short_circuits_without_reasoner_call() {
    let data = TempDir::new().unwrap();
    let store = AggregateStore::open(data.path()).unwrap();

    let reasoner = ScriptedReasoner::new(vec![]);
    let record = store.read().unwrap();
    assert!(record.is_none());

    let answer = query::resolve(&reasoner, record.as_ref(), "name").unwrap();
    assert_eq!(answer, query::NO_INFORMATION);
    assert_eq!(reasoner.calls.get(), 0);
}

#[test]
fn label_match_covers_all_labels_in_input_order() {
    let labels = vec![
        "Name".to_string(),
        "Date of Birth".to_string(),
        "Email".to_string(),
    ];
    let record: FieldMapping =
        serde_json::from_str(r#"{"name": "Jane Doe", "dob": "2000-01-01"}"#).unwrap();

    // The fake answers out of order and omits Email entirely.
    let reasoner = ScriptedReasoner::new(vec![(
        "Labels JSON",
        "Date of Birth: 2000-01-01\nName: Jane Doe\n",
    )]);

    let text = match_labels(&reasoner, &labels, &record).unwrap();
    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], "Name: Jane Doe");
    assert_eq!(lines[1], "Date of Birth: 2000-01-01");
    assert_eq!(lines[2], "Email: N/A");
}

#[test]
fn label_workflow_save_load_match() {
    let data = TempDir::new().unwrap();
    let labels_path = data.path().join("labels.json");

    let labels = vec!["Full Name".to_string(), "Phone".to_string()];
    save_labels(&labels_path, &labels).unwrap();
    let loaded = load_labels(&labels_path).unwrap();
    assert_eq!(loaded, labels);

    let record: FieldMapping = serde_json::from_str(r#"{"name": "Jane Doe"}"#).unwrap();
    let reasoner = ScriptedReasoner::new(vec![("Labels JSON", "Full Name: Jane Doe")]);
    let text = match_labels(&reasoner, &loaded, &record).unwrap();
    assert_eq!(text, "Full Name: Jane Doe\nPhone: N/A");
}

#[test]
fn ingest_then_query_round_trip() {
    let data = TempDir::new().unwrap();
    let docs = TempDir::new().unwrap();
    let store = AggregateStore::open(data.path()).unwrap();

    fs::write(docs.path().join("cv.txt"), "document alpha").unwrap();

    let reasoner = ScriptedReasoner::new(vec![
        (
            "document alpha",
            r#"{"firstName": "Jane", "lastName": "Doe"}"#,
        ),
        ("Extract the name", "Jane Doe"),
    ]);

    let report = ingest_dir(&store, &reasoner, docs.path(), &zero_delay()).unwrap();
    assert_eq!(report.processed, 1);

    let record = store.read().unwrap();
    let answer = query::resolve(&reasoner, record.as_ref(), "name").unwrap();
    assert_eq!(answer, "Jane Doe");
}
