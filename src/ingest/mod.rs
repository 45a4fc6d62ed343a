//! Decoding of uploaded record files into raw key/value records.
//!
//! This is the one layer that may fail: a file that cannot be decoded is a
//! fatal input error, reported to the caller as a [`LineageError`]. Everything
//! downstream (normalization, graph, validation) is total.

pub mod csv;
pub mod json;

use std::path::Path;

use crate::error::{LineageError, Result};
use crate::normalize::RawRecord;

/// Trait for record file decoders.
pub trait Decoder: Send + Sync {
    /// Check if this decoder handles the given (lower-cased) file extension.
    fn can_decode(&self, extension: &str) -> bool;

    /// Decode file content into raw records. `name` is the uploaded file
    /// name, used in error messages only.
    fn decode(&self, content: &[u8], name: &str) -> Result<Vec<RawRecord>>;
}

/// Decoder registry that selects the appropriate decoder by file extension.
pub struct DecoderRegistry {
    decoders: Vec<Box<dyn Decoder>>,
}

impl DecoderRegistry {
    /// Create a new registry with all built-in decoders.
    pub fn new() -> Self {
        let mut registry = Self {
            decoders: Vec::new(),
        };

        registry.register(Box::new(json::JsonDecoder));
        registry.register(Box::new(csv::CsvDecoder));

        registry
    }

    /// Register a decoder.
    pub fn register(&mut self, decoder: Box<dyn Decoder>) {
        self.decoders.push(decoder);
    }

    /// Find a decoder for the given extension.
    pub fn find_decoder(&self, extension: &str) -> Option<&dyn Decoder> {
        self.decoders
            .iter()
            .find(|d| d.can_decode(extension))
            .map(|d| d.as_ref())
    }

    /// Decode file content, dispatching on the file name's extension.
    pub fn decode(&self, content: &[u8], name: &str) -> Result<Vec<RawRecord>> {
        let extension = extension_of(name);
        let decoder = self.find_decoder(&extension).ok_or_else(|| {
            LineageError::UnsupportedFormat(format!(
                "{}: no decoder for '.{}' files (expected .json or .csv)",
                name, extension
            ))
        })?;
        decoder.decode(content, name)
    }
}

impl Default for DecoderRegistry {
    fn default() -> Self {
        Self::new()
    }
}

fn extension_of(name: &str) -> String {
    Path::new(name)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .unwrap_or_default()
}
