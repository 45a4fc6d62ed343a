//! Record normalization: heterogeneous raw key/value records to canonical
//! [`Person`] entries.
//!
//! Uploaded files arrive with mixed vocabularies (Spanish and English column
//! names, parent lists as `;`-joined strings or as arrays). Normalization
//! resolves each canonical field from an ordered alias list, first non-empty
//! value wins, and degrades to defaults instead of failing: a record with no
//! usable id gets its positional index, a record with no name gets an empty
//! string. No cross-record validation happens here.

use serde_json::Value;

use crate::person::Person;

/// A raw decoded record: arbitrary string keys, mixed scalar values.
pub type RawRecord = serde_json::Map<String, Value>;

const ID_KEYS: &[&str] = &["id", "ID", "identificador"];
const NAME_KEYS: &[&str] = &["nombre", "name"];
const BIRTH_DATE_KEYS: &[&str] = &["fecha_nacimiento", "dob", "fecha"];
const GENDER_KEYS: &[&str] = &["genero", "sex", "gender"];
const PARENT_KEYS: &[&str] = &["padres", "parents"];

/// Normalize a batch of raw records, in order.
pub fn normalize(records: &[RawRecord]) -> Vec<Person> {
    records
        .iter()
        .enumerate()
        .map(|(index, record)| normalize_record(record, index))
        .collect()
}

/// Normalize one raw record. `index` is the record's position in the batch,
/// used as the id fallback when no id field is present.
pub fn normalize_record(record: &RawRecord, index: usize) -> Person {
    let id = first_filled(record, ID_KEYS)
        .and_then(scalar_to_string)
        .unwrap_or_else(|| index.to_string());
    let name = first_filled(record, NAME_KEYS)
        .and_then(scalar_to_string)
        .unwrap_or_default();
    let birth_date = first_filled(record, BIRTH_DATE_KEYS).and_then(scalar_to_string);
    let gender = first_filled(record, GENDER_KEYS).and_then(scalar_to_string);
    let parents = first_filled(record, PARENT_KEYS)
        .map(parent_list)
        .unwrap_or_default();

    Person {
        id,
        name,
        birth_date,
        gender,
        parents,
        avatar: None,
    }
}

/// First value among `keys` that is present and non-empty.
fn first_filled<'a>(record: &'a RawRecord, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !is_empty(value))
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        Value::Array(items) => items.is_empty(),
        _ => false,
    }
}

fn scalar_to_string(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Parent-list coercion. A string value is split on `;` with whitespace
/// trimmed and empty segments dropped; an array is passed through with its
/// elements stringified. Anything else degrades to no parents.
fn parent_list(value: &Value) -> Vec<String> {
    match value {
        Value::String(joined) => joined
            .split(';')
            .map(str::trim)
            .filter(|segment| !segment.is_empty())
            .map(str::to_string)
            .collect(),
        Value::Array(items) => items.iter().filter_map(scalar_to_string).collect(),
        _ => Vec::new(),
    }
}
