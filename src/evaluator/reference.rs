//! `Ref` resolution

use crate::core::Value;
use crate::registry::ResolutionContext;

/// Template section listing declared resources
const RESOURCES_SECTION: &str = "Resources";

/// Resolve `{"Ref": target}`.
///
/// Parameters win. A reference to a declared resource, or to anything else
/// that is not a parameter, is kept as-is for a later pass. Never fails.
pub fn resolve_reference(context: &dyn ResolutionContext, node: &Value, target: &Value) -> Value {
    let Some(name) = target.as_str() else {
        log::trace!("keeping Ref with non-string target {}", target.type_name());
        return node.clone();
    };

    if let Some(value) = context.parameters().get(name) {
        return value.clone();
    }

    if is_resource(context.template(), name) {
        log::trace!("deferring Ref to resource {name}");
    } else {
        log::trace!("deferring unknown Ref {name}");
    }
    node.clone()
}

/// Whether `name` is declared in the template's `Resources` section
pub fn is_resource(template: &Value, name: &str) -> bool {
    template
        .get(RESOURCES_SECTION)
        .and_then(Value::as_map)
        .is_some_and(|resources| resources.contains_key(name))
}
