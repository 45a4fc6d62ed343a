use serde_json::Value;

use super::Decoder;
use crate::error::{LineageError, Result};
use crate::normalize::RawRecord;

/// JSON decoder for record files.
///
/// Accepts either a top-level array of record objects or an object wrapping
/// the array under a `personas` key (the export shape of the saved batches).
pub struct JsonDecoder;

impl Decoder for JsonDecoder {
    fn can_decode(&self, extension: &str) -> bool {
        extension == "json"
    }

    fn decode(&self, content: &[u8], name: &str) -> Result<Vec<RawRecord>> {
        let value: Value = serde_json::from_slice(content)
            .map_err(|e| LineageError::Parse(format!("JSON error in {}: {}", name, e)))?;

        let items = match value {
            Value::Array(items) => items,
            Value::Object(mut map) => match map.remove("personas") {
                Some(Value::Array(items)) => items,
                _ => {
                    return Err(LineageError::Parse(format!(
                        "{}: expected a record list or an object with a 'personas' list",
                        name
                    )))
                }
            },
            _ => {
                return Err(LineageError::Parse(format!(
                    "{}: expected a record list or an object with a 'personas' list",
                    name
                )))
            }
        };

        items
            .into_iter()
            .enumerate()
            .map(|(index, item)| match item {
                Value::Object(record) => Ok(record),
                _ => Err(LineageError::Parse(format!(
                    "{}: record {} is not an object",
                    name, index
                ))),
            })
            .collect()
    }
}
