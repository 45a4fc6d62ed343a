//! The `{ persons, errors }` wire shape and the analysis pipeline behind it.

use serde::{Deserialize, Serialize};

use crate::graph::{build_graph, validate};
use crate::person::Person;

/// Result of analyzing one batch of records: the canonical persons plus any
/// structural diagnostics. Serializes directly to the wire shape served by
/// the HTTP layer and printed by the checker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseOutcome {
    pub persons: Vec<Person>,
    pub errors: Vec<String>,
}

/// Build the relationship graph for a batch of persons and validate it.
///
/// Total: any batch, however malformed, produces an outcome; anomalies show
/// up as entries in `errors`, never as an `Err`.
pub fn analyze(persons: Vec<Person>) -> ParseOutcome {
    let graph = build_graph(&persons);
    let errors = validate(&persons, &graph);
    ParseOutcome { persons, errors }
}
