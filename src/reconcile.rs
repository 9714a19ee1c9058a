//! The field reconciler: merges freshly extracted fields into the aggregate.
//!
//! The merge is a left-biased union with gap-filling semantics. The first
//! concrete observation of a field is authoritative; later documents only
//! add new fields or upgrade `Unknown` placeholders. A concrete value
//! already on record is never overwritten.

use crate::record::{FieldMapping, FieldValue};

/// Merge `incoming` into `existing`, returning the reconciled mapping.
///
/// Per key in `incoming`, in precedence order:
///
/// 1. key absent from `existing` — adopt incoming's value, including
///    an incoming `Unknown` (the field is now at least recognized);
/// 2. existing is `Unknown`, incoming is concrete — upgrade;
/// 3. incoming is `Unknown` — keep existing;
/// 4. both concrete — keep existing.
///
/// Keys present only in `existing` are left untouched; the result never
/// drops a key.
pub fn merge(existing: &FieldMapping, incoming: &FieldMapping) -> FieldMapping {
    let mut result = existing.clone();

    for (key, value) in incoming.iter() {
        match existing.get(key) {
            None => result.insert(key.clone(), value.clone()),
            Some(FieldValue::Unknown) if value.is_present() => {
                result.insert(key.clone(), value.clone());
            }
            Some(_) => {}
        }
    }

    result
}
