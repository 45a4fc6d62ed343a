use serde::{Deserialize, Serialize};

/// A canonical person record.
///
/// This is the unit of record everywhere downstream of the normalizer: the
/// graph builder keys nodes by `id`, the validator reports against `id` and
/// `parents`, and the hierarchy projector attaches children through `parents`.
/// All other fields are carried opaquely for display.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Person {
    /// Unique within a batch by convention, not enforced: duplicate ids are
    /// not deduplicated here, later records simply win downstream.
    pub id: String,
    /// Display name, may be empty.
    #[serde(default)]
    pub name: String,
    /// Free-form date string, passed through unvalidated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    /// Free-form, passed through.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub gender: Option<String>,
    /// Parent ids in record order. Entries need not resolve to existing ids.
    #[serde(default)]
    pub parents: Vec<String>,
    /// Opaque stored-file reference (e.g. `/uploads/p1.png`), never resolved
    /// or rewritten by this crate.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
}

impl Person {
    /// Convenience constructor for the common id + parents shape.
    pub fn with_parents(id: impl Into<String>, parents: &[&str]) -> Self {
        Self {
            id: id.into(),
            parents: parents.iter().map(|p| p.to_string()).collect(),
            ..Self::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_roundtrip() {
        let person = Person {
            id: "p1".to_string(),
            name: "Ana".to_string(),
            birth_date: Some("1950-02-01".to_string()),
            gender: None,
            parents: vec!["p0".to_string()],
            avatar: None,
        };
        let json = serde_json::to_string(&person).unwrap();
        let back: Person = serde_json::from_str(&json).unwrap();
        assert_eq!(person, back);
    }

    #[test]
    fn test_person_optional_fields_omitted() {
        let person = Person::with_parents("p1", &[]);
        let json = serde_json::to_value(&person).unwrap();
        let object = json.as_object().unwrap();
        assert!(!object.contains_key("birth_date"));
        assert!(!object.contains_key("gender"));
        assert!(!object.contains_key("avatar"));
        assert_eq!(json["parents"], serde_json::json!([]));
    }

    #[test]
    fn test_person_deserializes_with_missing_fields() {
        let person: Person = serde_json::from_str(r#"{"id":"p1"}"#).unwrap();
        assert_eq!(person.id, "p1");
        assert_eq!(person.name, "");
        assert!(person.parents.is_empty());
    }
}
