//! Structural validation: dangling parent references and cycles, reported as
//! human-readable diagnostics rather than errors.

use super::{cycles, FamilyGraph};
use crate::person::Person;

/// Validate a batch of persons against its relationship graph.
///
/// Returns diagnostics in a fixed order: one entry per (person, missing
/// parent) pair, iterated in input order, followed by at most one entry
/// listing every detected cycle. Repeated references to the same missing
/// parent are deliberately not deduplicated. Never fails: if cycle
/// enumeration gives up, the failure is logged and the batch is reported
/// without a cycle diagnostic.
pub fn validate(persons: &[Person], graph: &FamilyGraph) -> Vec<String> {
    let mut errors = Vec::new();

    for person in persons {
        for parent in &person.parents {
            if !graph.has_node(parent) {
                errors.push(format!(
                    "Parent referenced does not exist: {} (in {})",
                    parent, person.id
                ));
            }
        }
    }

    if let Some(diagnostic) = cycle_diagnostic(graph, cycles::DEFAULT_STEP_BUDGET) {
        errors.push(diagnostic);
    }

    errors
}

fn cycle_diagnostic(graph: &FamilyGraph, budget: usize) -> Option<String> {
    match cycles::simple_cycles_bounded(graph, budget) {
        Ok(found) if !found.is_empty() => {
            Some(format!("Cycles detected in relationships: {:?}", found))
        }
        Ok(_) => None,
        Err(err) => {
            log::warn!("cycle enumeration gave up, reporting no cycles: {}", err);
            None
        }
    }
}
