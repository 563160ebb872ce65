//! Named boolean conditions
//!
//! Conditions are evaluated in dependency order. Before a condition is
//! resolved, references to conditions already evaluated are replaced by
//! their boolean, so the expression only needs the function resolver.

use indexmap::IndexMap;

use crate::core::{Map, ResolverError, Result, Value};
use crate::registry::ResolutionContext;

pub mod apply;
pub mod graph;

pub use apply::{CONDITION_FIELD, CONDITIONAL_SECTIONS, apply_conditions};
pub use graph::{ConditionGraph, find_condition_references};

/// Template section holding condition expressions
pub const CONDITIONS_SECTION: &str = "Conditions";

/// Evaluated conditions in evaluation order
pub type ConditionResults = IndexMap<String, bool>;

/// Evaluate every condition of a `Conditions` section.
///
/// Fails on a dependency cycle, on a condition that still contains a
/// function call after resolution, and on any hard error while resolving
/// one (wrapped with the condition's name).
pub fn evaluate_conditions(
    conditions: &Map,
    resolver: &dyn ResolutionContext,
) -> Result<ConditionResults> {
    let order = ConditionGraph::build(conditions).topological_order()?;
    log::debug!("evaluating {} conditions in order {order:?}", order.len());

    let mut results = ConditionResults::with_capacity(order.len());
    for name in order {
        let Some(expression) = conditions.get(&name) else {
            continue;
        };
        let expression = substitute_resolved(expression, &results);
        let wrap = |source: ResolverError| ResolverError::Condition {
            name: name.clone(),
            source: Box::new(source),
        };

        let resolved = resolver.resolve(&expression).map_err(wrap)?;
        if resolver.is_function(&resolved) {
            return Err(ResolverError::UnresolvableCondition { name: name.clone() });
        }
        let value = resolved.to_bool().map_err(wrap)?;
        log::debug!("condition {name} = {value}");
        results.insert(name, value);
    }
    Ok(results)
}

/// Replace names of evaluated conditions by their boolean.
///
/// Both a bare name and a `{"Condition": name}` map are replaced.
fn substitute_resolved(value: &Value, results: &ConditionResults) -> Value {
    match value {
        Value::String(name) => match results.get(name) {
            Some(result) => Value::Bool(*result),
            None => value.clone(),
        },
        Value::Map(map) => {
            if map.len() == 1
                && let Some(Value::String(name)) = map.get(CONDITION_FIELD)
                && let Some(result) = results.get(name)
            {
                return Value::Bool(*result);
            }
            Value::Map(
                map.iter()
                    .map(|(key, child)| (key.clone(), substitute_resolved(child, results)))
                    .collect(),
            )
        }
        Value::List(items) => Value::List(
            items
                .iter()
                .map(|item| substitute_resolved(item, results))
                .collect(),
        ),
        scalar => scalar.clone(),
    }
}
