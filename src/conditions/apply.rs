//! Pruning of conditional resources and outputs

use crate::core::{Map, Value};

use super::ConditionResults;

/// Sections whose entries may carry a `Condition` field
pub const CONDITIONAL_SECTIONS: [&str; 2] = ["Resources", "Outputs"];

/// Field naming the condition that guards an entry
pub const CONDITION_FIELD: &str = "Condition";

/// Remove every resource and output whose condition is false or unknown.
///
/// Entries without a `Condition` field, or with a non-string one, are kept.
/// Returns the number of removed entries.
pub fn apply_conditions(template: &mut Map, results: &ConditionResults) -> usize {
    let mut removed = 0;
    for section in CONDITIONAL_SECTIONS {
        let Some(Value::Map(entries)) = template.get_mut(section) else {
            continue;
        };
        entries.retain(|name, definition| {
            let keep = match definition.get(CONDITION_FIELD) {
                Some(Value::String(condition)) => results.get(condition) == Some(&true),
                _ => true,
            };
            if !keep {
                log::debug!("removing {section}.{name}: condition is false or undeclared");
                removed += 1;
            }
            keep
        });
    }
    removed
}
