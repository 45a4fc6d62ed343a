//! Hierarchy projection: the flat person list as a display tree.
//!
//! The projection is not a strict tree. A person with several known parents
//! is attached as a shared child under every one of them, so the result is a
//! DAG rendered tree-like; children are `Rc` references, not owned copies,
//! and a node keeps a single identity however many parents point at it.
//! Consumers must not assume single-parent uniqueness.

use std::cell::RefCell;
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde::Serialize;
use serde_json::Value;

use crate::person::Person;

/// Sentinel id of the synthetic forest root.
pub const FOREST_ROOT_ID: &str = "root";
/// Sentinel name of the synthetic forest root.
pub const FOREST_ROOT_NAME: &str = "Family";

/// Shared handle to a projected node.
pub type HierarchyRef = Rc<RefCell<HierarchyNode>>;

/// One projected display node: a person plus its (shared) children.
///
/// Lives only for the duration of one projection call; nothing here is
/// persisted.
#[derive(Debug, Serialize)]
pub struct HierarchyNode {
    #[serde(flatten)]
    pub person: Person,
    pub children: Vec<HierarchyRef>,
}

fn node(person: Person) -> HierarchyRef {
    Rc::new(RefCell::new(HierarchyNode {
        person,
        children: Vec::new(),
    }))
}

/// Project a batch of persons into one display tree.
///
/// Every unique id gets a node (first occurrence fixes its position, the
/// last occurrence fixes its payload). A person with no parents is a root
/// candidate. Each parent id that resolves gains the person as a child; each
/// parent id that does not resolve promotes the person to root candidate for
/// that missing linkage, so a person can be a root candidate and attached
/// elsewhere at the same time. A single root candidate is returned directly;
/// otherwise (zero or many) all candidates are wrapped, in discovery order,
/// under a synthetic root with the fixed sentinel id and name.
pub fn project_hierarchy(persons: &[Person]) -> HierarchyRef {
    let mut order: Vec<HierarchyRef> = Vec::new();
    let mut lookup: HashMap<String, HierarchyRef> = HashMap::new();

    for person in persons {
        match lookup.get(&person.id) {
            Some(existing) => existing.borrow_mut().person = person.clone(),
            None => {
                let entry = node(person.clone());
                lookup.insert(person.id.clone(), Rc::clone(&entry));
                order.push(entry);
            }
        }
    }

    let mut roots: Vec<HierarchyRef> = Vec::new();
    for entry in &order {
        let parents = entry.borrow().person.parents.clone();
        if parents.is_empty() {
            roots.push(Rc::clone(entry));
            continue;
        }
        for parent in &parents {
            match lookup.get(parent) {
                Some(parent_node) => parent_node.borrow_mut().children.push(Rc::clone(entry)),
                None => roots.push(Rc::clone(entry)),
            }
        }
    }

    if roots.len() == 1 {
        return Rc::clone(&roots[0]);
    }
    Rc::new(RefCell::new(HierarchyNode {
        person: Person {
            id: FOREST_ROOT_ID.to_string(),
            name: FOREST_ROOT_NAME.to_string(),
            ..Person::default()
        },
        children: roots,
    }))
}

/// Render a projected tree as a JSON value.
///
/// Unlike serializing [`HierarchyNode`] directly, this guards against cyclic
/// parent chains (a person reachable from itself): a node already on the
/// current render path is emitted once more with empty children and the
/// descent stops there.
pub fn display_value(root: &HierarchyRef) -> Value {
    let mut on_path = HashSet::new();
    render(root, &mut on_path)
}

fn render(entry: &HierarchyRef, on_path: &mut HashSet<*const RefCell<HierarchyNode>>) -> Value {
    let key = Rc::as_ptr(entry);
    let inner = entry.borrow();
    let mut fields = match serde_json::to_value(&inner.person) {
        Ok(Value::Object(map)) => map,
        _ => serde_json::Map::new(),
    };

    if !on_path.insert(key) {
        fields.insert("children".to_string(), Value::Array(Vec::new()));
        return Value::Object(fields);
    }
    let children: Vec<Value> = inner
        .children
        .iter()
        .map(|child| render(child, on_path))
        .collect();
    on_path.remove(&key);

    fields.insert("children".to_string(), Value::Array(children));
    Value::Object(fields)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn child_ids(entry: &HierarchyRef) -> Vec<String> {
        entry
            .borrow()
            .children
            .iter()
            .map(|c| c.borrow().person.id.clone())
            .collect()
    }

    #[test]
    fn test_single_person_is_root() {
        let persons = vec![Person::with_parents("A", &[])];
        let root = project_hierarchy(&persons);
        assert_eq!(root.borrow().person.id, "A");
        assert!(root.borrow().children.is_empty());
    }

    #[test]
    fn test_two_unrelated_persons_get_synthetic_root() {
        let persons = vec![
            Person::with_parents("A", &[]),
            Person::with_parents("B", &[]),
        ];
        let root = project_hierarchy(&persons);
        assert_eq!(root.borrow().person.id, FOREST_ROOT_ID);
        assert_eq!(root.borrow().person.name, FOREST_ROOT_NAME);
        assert_eq!(child_ids(&root), vec!["A", "B"]);
    }

    #[test]
    fn test_empty_input_yields_synthetic_root() {
        let root = project_hierarchy(&[]);
        assert_eq!(root.borrow().person.id, FOREST_ROOT_ID);
        assert!(root.borrow().children.is_empty());
    }

    #[test]
    fn test_child_attached_under_parent() {
        let persons = vec![
            Person::with_parents("A", &[]),
            Person::with_parents("B", &["A"]),
        ];
        let root = project_hierarchy(&persons);
        assert_eq!(root.borrow().person.id, "A");
        assert_eq!(child_ids(&root), vec!["B"]);
    }

    #[test]
    fn test_missing_parent_promotes_to_forest_root() {
        let persons = vec![
            Person::with_parents("A", &[]),
            Person::with_parents("B", &["A"]),
            Person::with_parents("C", &["X"]),
        ];
        let root = project_hierarchy(&persons);
        assert_eq!(root.borrow().person.id, FOREST_ROOT_ID);
        assert_eq!(child_ids(&root), vec!["A", "C"]);
        let a = Rc::clone(&root.borrow().children[0]);
        assert_eq!(child_ids(&a), vec!["B"]);
    }

    #[test]
    fn test_multi_parent_child_shared_under_both() {
        let persons = vec![
            Person::with_parents("A", &[]),
            Person::with_parents("B", &[]),
            Person::with_parents("C", &["A", "B"]),
        ];
        let root = project_hierarchy(&persons);
        let a = Rc::clone(&root.borrow().children[0]);
        let b = Rc::clone(&root.borrow().children[1]);
        assert_eq!(child_ids(&a), vec!["C"]);
        assert_eq!(child_ids(&b), vec!["C"]);
        // Shared reference, not a copy.
        assert!(Rc::ptr_eq(
            &a.borrow().children[0],
            &b.borrow().children[0]
        ));
    }

    #[test]
    fn test_partially_missing_parent_attaches_and_promotes() {
        // C hangs under A and is also promoted for its missing parent X.
        let persons = vec![
            Person::with_parents("A", &[]),
            Person::with_parents("C", &["A", "X"]),
        ];
        let root = project_hierarchy(&persons);
        assert_eq!(root.borrow().person.id, FOREST_ROOT_ID);
        assert_eq!(child_ids(&root), vec!["A", "C"]);
        let a = Rc::clone(&root.borrow().children[0]);
        assert!(Rc::ptr_eq(&a.borrow().children[0], &root.borrow().children[1]));
    }

    #[test]
    fn test_duplicate_id_keeps_position_takes_last_payload() {
        let mut early = Person::with_parents("A", &[]);
        early.name = "early".to_string();
        let mut late = Person::with_parents("A", &[]);
        late.name = "late".to_string();
        let persons = vec![early, Person::with_parents("B", &[]), late];

        let root = project_hierarchy(&persons);
        assert_eq!(child_ids(&root), vec!["A", "B"]);
        assert_eq!(root.borrow().children[0].borrow().person.name, "late");
    }

    #[test]
    fn test_display_value_shape() {
        let persons = vec![
            Person::with_parents("A", &[]),
            Person::with_parents("B", &["A"]),
        ];
        let value = display_value(&project_hierarchy(&persons));
        assert_eq!(value["id"], "A");
        assert_eq!(value["children"][0]["id"], "B");
        assert_eq!(value["children"][0]["children"], serde_json::json!([]));
    }

    #[test]
    fn test_cycle_unreachable_from_root_leaves_empty_forest() {
        // A and B only parent each other; neither is a root candidate, so
        // the synthetic root has no children and the cycle stays invisible
        // to display (the validator is what reports it).
        let persons = vec![
            Person::with_parents("A", &["B"]),
            Person::with_parents("B", &["A"]),
        ];
        let root = project_hierarchy(&persons);
        assert_eq!(root.borrow().person.id, FOREST_ROOT_ID);
        assert!(root.borrow().children.is_empty());
    }

    #[test]
    fn test_display_value_truncates_cyclic_chain() {
        // A is its own parent (and promoted to root by the missing X), so
        // the projection contains a reachable cycle; rendering must stop.
        let persons = vec![Person::with_parents("A", &["A", "X"])];
        let value = display_value(&project_hierarchy(&persons));
        assert_eq!(value["id"], "A");
        assert_eq!(value["children"][0]["id"], "A");
        assert_eq!(value["children"][0]["children"], serde_json::json!([]));
    }

    #[test]
    fn test_serialize_acyclic_tree_directly() {
        let persons = vec![
            Person::with_parents("A", &[]),
            Person::with_parents("B", &["A"]),
        ];
        let root = project_hierarchy(&persons);
        let value = serde_json::to_value(&*root.borrow()).unwrap();
        assert_eq!(value["id"], "A");
        assert_eq!(value["children"][0]["id"], "B");
    }
}
