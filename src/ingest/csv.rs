use serde_json::Value;

use super::Decoder;
use crate::error::{LineageError, Result};
use crate::normalize::RawRecord;

/// CSV decoder for record files.
///
/// The first row is the header; every cell becomes a string raw value under
/// its column name. Empty cells stay as empty strings, which the normalizer
/// treats as absent.
pub struct CsvDecoder;

impl Decoder for CsvDecoder {
    fn can_decode(&self, extension: &str) -> bool {
        extension == "csv"
    }

    fn decode(&self, content: &[u8], name: &str) -> Result<Vec<RawRecord>> {
        let mut reader = ::csv::ReaderBuilder::new()
            .flexible(true)
            .from_reader(content);
        let headers = reader
            .headers()
            .map_err(|e| LineageError::Parse(format!("CSV error in {}: {}", name, e)))?
            .clone();

        let mut records = Vec::new();
        for row in reader.records() {
            let row = row.map_err(|e| LineageError::Parse(format!("CSV error in {}: {}", name, e)))?;
            let mut record = RawRecord::new();
            for (header, cell) in headers.iter().zip(row.iter()) {
                record.insert(header.to_string(), Value::String(cell.to_string()));
            }
            records.push(record);
        }
        Ok(records)
    }
}
