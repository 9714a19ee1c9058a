//! Ad-hoc natural-language queries against the aggregate record.

use crate::prompts;
use crate::reason::{ReasonResult, TextReasoner, strip_fences};
use crate::record::FieldMapping;

/// Fixed response for queries against an empty store.
pub const NO_INFORMATION: &str = "No information available.";

/// Answer a natural-language question about the record.
///
/// With no record on file the fixed [`NO_INFORMATION`] sentinel is returned
/// without invoking the reasoner — the empty state is a defined answer, not
/// an error, and skipping the call keeps it deterministic and free.
pub fn resolve(
    reasoner: &dyn TextReasoner,
    record: Option<&FieldMapping>,
    question: &str,
) -> ReasonResult<String> {
    let Some(record) = record else {
        return Ok(NO_INFORMATION.to_string());
    };

    let record_json = record
        .to_json_pretty()
        .unwrap_or_else(|_| "{}".to_string());
    let system = prompts::query_system(&record_json);
    let user = prompts::query_user(question);
    let answer = reasoner.complete(Some(&system), &user)?;
    Ok(strip_fences(&answer).to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    struct CountingReasoner {
        calls: Cell<usize>,
    }

    impl TextReasoner for CountingReasoner {
        fn complete(&self, _system: Option<&str>, _prompt: &str) -> ReasonResult<String> {
            self.calls.set(self.calls.get() + 1);
            Ok("  Jane Doe\n".into())
        }

        fn describe_image(&self, _: &[u8], _: &str) -> ReasonResult<String> {
            unreachable!("queries never send images")
        }
    }

    #[test]
    fn empty_state_short_circuits_without_a_call() {
        let reasoner = CountingReasoner {
            calls: Cell::new(0),
        };
        let answer = resolve(&reasoner, None, "name").unwrap();
        assert_eq!(answer, NO_INFORMATION);
        assert_eq!(reasoner.calls.get(), 0);
    }

    #[test]
    fn answers_are_trimmed() {
        let reasoner = CountingReasoner {
            calls: Cell::new(0),
        };
        let record: FieldMapping = serde_json::from_str(r#"{"name": "Jane Doe"}"#).unwrap();
        let answer = resolve(&reasoner, Some(&record), "name").unwrap();
        assert_eq!(answer, "Jane Doe");
        assert_eq!(reasoner.calls.get(), 1);
    }
}
