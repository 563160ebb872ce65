//! Condition dependency graph and topological ordering

use std::collections::VecDeque;

use indexmap::{IndexMap, IndexSet};

use crate::core::{Map, ResolverError, Result, Value};

/// Names of other conditions referenced by a condition expression.
///
/// Any string equal to a declared condition name counts, which covers
/// direct references, `{"Condition": name}` and the first argument of
/// `Fn::If`, at any nesting depth. Order of first occurrence is kept.
pub fn find_condition_references(expression: &Value, conditions: &Map) -> IndexSet<String> {
    let mut references = IndexSet::new();
    collect_references(expression, conditions, &mut references);
    references
}

fn collect_references(value: &Value, conditions: &Map, references: &mut IndexSet<String>) {
    match value {
        Value::String(name) if conditions.contains_key(name) => {
            references.insert(name.clone());
        }
        Value::List(items) => {
            for item in items {
                collect_references(item, conditions, references);
            }
        }
        Value::Map(map) => {
            for child in map.values() {
                collect_references(child, conditions, references);
            }
        }
        _ => {}
    }
}

/// Directed graph over condition names.
///
/// An edge runs from a condition to each condition that references it, so
/// a node's in-degree is the number of conditions it waits for.
#[derive(Debug, Clone, Default)]
pub struct ConditionGraph {
    dependents: IndexMap<String, Vec<String>>,
    in_degree: IndexMap<String, usize>,
}

impl ConditionGraph {
    /// Build the graph for a `Conditions` section
    pub fn build(conditions: &Map) -> Self {
        let mut graph = Self::default();
        for name in conditions.keys() {
            graph.dependents.insert(name.clone(), Vec::new());
            graph.in_degree.insert(name.clone(), 0);
        }

        for (name, expression) in conditions {
            for dependency in find_condition_references(expression, conditions) {
                if let Some(dependents) = graph.dependents.get_mut(&dependency) {
                    dependents.push(name.clone());
                }
                if let Some(degree) = graph.in_degree.get_mut(name) {
                    *degree += 1;
                }
            }
        }
        graph
    }

    pub fn len(&self) -> usize {
        self.in_degree.len()
    }

    pub fn is_empty(&self) -> bool {
        self.in_degree.is_empty()
    }

    /// Conditions that reference `name`
    pub fn dependents(&self, name: &str) -> &[String] {
        self.dependents
            .get(name)
            .map(Vec::as_slice)
            .unwrap_or_default()
    }

    /// Evaluation order by Kahn's algorithm.
    ///
    /// Conditions that become ready together are taken in declaration
    /// order. Fails with the set of conditions that could not be ordered
    /// when the graph has a cycle.
    pub fn topological_order(&self) -> Result<Vec<String>> {
        let mut in_degree: IndexMap<&str, usize> = self
            .in_degree
            .iter()
            .map(|(name, degree)| (name.as_str(), *degree))
            .collect();
        let mut queue: VecDeque<&str> = in_degree
            .iter()
            .filter(|(_, degree)| **degree == 0)
            .map(|(name, _)| *name)
            .collect();

        let mut order = Vec::with_capacity(in_degree.len());
        while let Some(current) = queue.pop_front() {
            order.push(current.to_string());
            for dependent in self.dependents(current) {
                if let Some(degree) = in_degree.get_mut(dependent.as_str()) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(dependent.as_str());
                    }
                }
            }
        }

        if order.len() != in_degree.len() {
            let conditions = in_degree
                .iter()
                .filter(|(_, degree)| **degree > 0)
                .map(|(name, _)| name.to_string())
                .collect();
            return Err(ResolverError::CircularDependency { conditions });
        }
        Ok(order)
    }
}
