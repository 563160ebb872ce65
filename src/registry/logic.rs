//! Boolean logic, comparison and conditional functions
//!
//! `Fn::And` and `Fn::Or` resolve their operands one at a time and stop at
//! the first decisive value. `Fn::If` resolves only the selected branch.

use super::{FunctionCategory, FunctionContext, FunctionRegistry};
use crate::core::{Result, Value};
use crate::register_function;

impl FunctionRegistry {
    pub fn register_logic_functions(&self) -> Result<()> {
        self.register_and_function()?;
        self.register_or_function()?;
        self.register_not_function()?;
        self.register_any_function()?;
        self.register_contains_function()?;
        self.register_each_member_in_function()?;
        self.register_equals_function()?;
        self.register_if_function()?;
        Ok(())
    }

    fn register_and_function(&self) -> Result<()> {
        register_function!(
            self,
            "And",
            category: FunctionCategory::Logic,
            description: "True when every operand is true. Operands are evaluated left to right and evaluation stops at the first false one.",
            parameters: ["conditions": Some("list<boolean>") => "At least one operand"],
            return_type: "boolean",
            examples: ["{\"Fn::And\": [true, {\"Fn::Equals\": [{\"Ref\": \"Env\"}, \"prod\"]}]}"],
            implementation: and
        )
    }

    fn register_or_function(&self) -> Result<()> {
        register_function!(
            self,
            "Or",
            category: FunctionCategory::Logic,
            description: "True when any operand is true. Operands are evaluated left to right and evaluation stops at the first true one.",
            parameters: ["conditions": Some("list<boolean>") => "At least one operand"],
            return_type: "boolean",
            examples: ["{\"Fn::Or\": [false, \"IsProd\"]}"],
            implementation: or
        )
    }

    fn register_not_function(&self) -> Result<()> {
        register_function!(
            self,
            "Not",
            category: FunctionCategory::Logic,
            description: "Negates a single boolean operand",
            parameters: ["condition": Some("boolean") => "Operand, wrapped in a one-element list"],
            return_type: "boolean",
            examples: ["{\"Fn::Not\": [{\"Fn::Equals\": [{\"Ref\": \"Env\"}, \"dev\"]}]}"],
            implementation: not
        )
    }

    fn register_any_function(&self) -> Result<()> {
        register_function!(
            self,
            "Any",
            category: FunctionCategory::Logic,
            description: "True when at least one element of the nested list is truthy",
            parameters: ["values": Some("list") => "A list, wrapped in a one-element list"],
            return_type: "boolean",
            examples: ["{\"Fn::Any\": [[false, \"true\"]]}"],
            implementation: any
        )
    }

    fn register_contains_function(&self) -> Result<()> {
        register_function!(
            self,
            "Contains",
            category: FunctionCategory::Logic,
            description: "True when the list holds an element structurally equal to the value",
            parameters: [
                "list": Some("list") => "List to search",
                "value": None => "Value to look for"
            ],
            return_type: "boolean",
            examples: ["{\"Fn::Contains\": [[\"a\", \"b\"], \"b\"]}"],
            implementation: contains
        )
    }

    fn register_each_member_in_function(&self) -> Result<()> {
        register_function!(
            self,
            "EachMemberIn",
            category: FunctionCategory::Logic,
            description: "True when every element of the first list occurs in the second list. Vacuously true for an empty first list.",
            parameters: [
                "members": Some("list") => "Elements to check",
                "universe": Some("list") => "Allowed elements"
            ],
            return_type: "boolean",
            examples: ["{\"Fn::EachMemberIn\": [[\"a\"], [\"a\", \"b\"]]}"],
            implementation: each_member_in
        )
    }

    fn register_equals_function(&self) -> Result<()> {
        register_function!(
            self,
            "Equals",
            category: FunctionCategory::Logic,
            description: "Structural equality of two values. Values of different kinds are never equal.",
            parameters: [
                "left": None => "First value",
                "right": None => "Second value"
            ],
            return_type: "boolean",
            examples: ["{\"Fn::Equals\": [{\"Ref\": \"Env\"}, \"production\"]}"],
            implementation: equals
        )
    }

    fn register_if_function(&self) -> Result<()> {
        register_function!(
            self,
            "If",
            category: FunctionCategory::Logic,
            description: "Selects the second argument when the condition holds, otherwise the third. A string condition is looked up by name among parameters and resolved conditions. Only the selected branch is resolved.",
            parameters: [
                "condition": Some("boolean | string") => "Boolean or condition name",
                "then": None => "Value when true",
                "else": None => "Value when false"
            ],
            return_type: "any",
            examples: ["{\"Fn::If\": [\"IsProd\", \"ecs.g6.large\", \"ecs.t5.small\"]}"],
            implementation: if_
        )
    }
}

fn and(context: &FunctionContext) -> Result<Value> {
    short_circuit(context, false)
}

fn or(context: &FunctionContext) -> Result<Value> {
    short_circuit(context, true)
}

/// Evaluate operands left to right until one equals `decisive`
fn short_circuit(context: &FunctionContext, decisive: bool) -> Result<Value> {
    for operand in context.at_least_arguments(1)? {
        let resolved = context.resolve(operand)?;
        if context.is_function(&resolved) {
            return Ok(context.unresolved());
        }
        if resolved.to_bool()? == decisive {
            return Ok(Value::Bool(decisive));
        }
    }
    Ok(Value::Bool(!decisive))
}

fn not(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(1)?;
    let resolved = context.resolve(&args[0])?;
    if context.is_function(&resolved) {
        return Ok(context.unresolved());
    }
    Ok(Value::Bool(!resolved.to_bool()?))
}

fn any(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(1)?;
    let resolved = context.resolve(&args[0])?;
    if context.is_function(&resolved) {
        return Ok(context.unresolved());
    }
    let Some(items) = resolved.as_list() else {
        return Err(context.invalid_type("values", "a list", &resolved));
    };
    if items.iter().any(|item| context.is_function(item)) {
        return Ok(context.unresolved());
    }
    for item in items {
        if item.to_bool()? {
            return Ok(Value::Bool(true));
        }
    }
    Ok(Value::Bool(false))
}

fn contains(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(2)?;
    let Some(resolved) = context.resolve_each(args)? else {
        return Ok(context.unresolved());
    };
    let Some(items) = resolved[0].as_list() else {
        return Err(context.invalid_type("list", "a list", &resolved[0]));
    };
    Ok(Value::Bool(items.contains(&resolved[1])))
}

fn each_member_in(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(2)?;
    let Some(resolved) = context.resolve_each(args)? else {
        return Ok(context.unresolved());
    };
    let Some(members) = resolved[0].as_list() else {
        return Err(context.invalid_type("members", "a list", &resolved[0]));
    };
    let Some(universe) = resolved[1].as_list() else {
        return Err(context.invalid_type("universe", "a list", &resolved[1]));
    };
    Ok(Value::Bool(
        members.iter().all(|member| universe.contains(member)),
    ))
}

fn equals(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(2)?;
    match context.resolve_each(args)? {
        Some(resolved) => Ok(Value::Bool(resolved[0] == resolved[1])),
        None => Ok(context.unresolved()),
    }
}

fn if_(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(3)?;
    let condition = context.resolve(&args[0])?;
    if context.is_function(&condition) {
        return Ok(context.unresolved());
    }

    let selected = match &condition {
        Value::Bool(b) => *b,
        Value::String(name) => match context.parameters().get(name) {
            Some(value) => value.to_bool()?,
            None => {
                log::trace!("{}: condition {name:?} is not known yet", context.key);
                return Ok(context.unresolved());
            }
        },
        other => other.to_bool()?,
    };

    context.resolve(if selected { &args[1] } else { &args[2] })
}
