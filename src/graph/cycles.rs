//! Simple-cycle enumeration over the relationship graph.

use std::collections::HashSet;

use thiserror::Error;

use super::FamilyGraph;

/// Default step budget for one enumeration. Family data is small; a graph
/// that burns through this many search steps is pathological input, not a
/// pedigree.
pub const DEFAULT_STEP_BUDGET: usize = 1_000_000;

/// Enumeration gave up instead of running unbounded.
#[derive(Debug, Error)]
pub enum CycleError {
    #[error("cycle enumeration exceeded the step budget of {budget}")]
    BudgetExceeded { budget: usize },
}

/// Enumerate every simple directed cycle in the graph, with the default
/// step budget.
///
/// A cycle is a sequence of distinct nodes where following parent -> child
/// edges returns to the start; a self-loop is a length-1 cycle. Each cycle is
/// reported exactly once, anchored at its lowest-index node, as the ordered
/// list of person ids along the walk.
pub fn simple_cycles(graph: &FamilyGraph) -> Result<Vec<Vec<String>>, CycleError> {
    simple_cycles_bounded(graph, DEFAULT_STEP_BUDGET)
}

/// Enumerate simple cycles with an explicit step budget.
///
/// The search is an iterative DFS from each node over nodes of equal or
/// higher index, so every cycle is found once from its smallest member. The
/// budget bounds total search steps across all start nodes; exceeding it
/// returns [`CycleError::BudgetExceeded`] so callers can decide how to degrade
/// instead of the process hanging on adversarial input.
pub fn simple_cycles_bounded(
    family: &FamilyGraph,
    budget: usize,
) -> Result<Vec<Vec<String>>, CycleError> {
    let graph = family.inner();
    let mut cycles = Vec::new();
    let mut steps: usize = 0;

    for start in graph.node_indices() {
        let mut path = vec![start];
        let mut on_path = HashSet::new();
        on_path.insert(start);
        let mut walk = vec![graph.neighbors(start)];

        loop {
            let Some(neighbors) = walk.last_mut() else {
                break;
            };
            steps += 1;
            if steps > budget {
                return Err(CycleError::BudgetExceeded { budget });
            }

            let next = neighbors.next();
            match next {
                Some(node) if node.index() < start.index() => {
                    // Cycles through lower-index nodes were already reported
                    // from their own anchor.
                }
                Some(node) if node == start => {
                    cycles.push(
                        path.iter()
                            .map(|&index| family.id_at(index).to_string())
                            .collect(),
                    );
                }
                Some(node) => {
                    if on_path.insert(node) {
                        path.push(node);
                        walk.push(graph.neighbors(node));
                    }
                }
                None => {
                    walk.pop();
                    if let Some(done) = path.pop() {
                        on_path.remove(&done);
                    }
                }
            }
        }
    }

    Ok(cycles)
}
