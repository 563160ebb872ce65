//! List functions: `Fn::Select`, `Fn::Index`, `Fn::Length`,
//! `Fn::ListMerge` and `Fn::SelectMapList`

use super::{FunctionCategory, FunctionContext, FunctionRegistry};
use crate::core::{ResolverError, Result, Value};
use crate::register_function;

/// Collection helpers
pub struct CollectionUtils;

impl CollectionUtils {
    /// Interpret a resolved value as a list index.
    ///
    /// Floats are truncated. Strings are read as an optionally signed
    /// integer prefix after leading whitespace, so `" 2nd"` is `2`.
    pub fn to_index(context: &FunctionContext, value: &Value) -> Result<i64> {
        match value {
            Value::Int(n) => Ok(*n),
            Value::Float(n) => Ok(n.trunc() as i64),
            Value::String(s) => Self::parse_leading_integer(s).ok_or_else(|| {
                context.invalid_arguments(format!("invalid index format: {s:?}"))
            }),
            other => Err(context.invalid_type("index", "a number", other)),
        }
    }

    fn parse_leading_integer(input: &str) -> Option<i64> {
        let trimmed = input.trim_start();
        let sign_len = usize::from(trimmed.starts_with(['+', '-']));
        let digits_len = trimmed[sign_len..]
            .find(|c: char| !c.is_ascii_digit())
            .unwrap_or(trimmed.len() - sign_len);
        if digits_len == 0 {
            return None;
        }
        trimmed[..sign_len + digits_len].parse().ok()
    }
}

impl FunctionRegistry {
    pub fn register_collection_functions(&self) -> Result<()> {
        self.register_select_function()?;
        self.register_index_function()?;
        self.register_length_function()?;
        self.register_list_merge_function()?;
        self.register_select_map_list_function()?;
        Ok(())
    }

    fn register_select_function(&self) -> Result<()> {
        register_function!(
            self,
            "Select",
            category: FunctionCategory::Collection,
            description: "Returns the list element at a zero-based index. The index may be an integer, a float or a numeric string; a negative or out-of-range index is an error.",
            parameters: [
                "index": Some("integer") => "Zero-based position",
                "list": Some("list") => "List to select from"
            ],
            return_type: "any",
            examples: ["{\"Fn::Select\": [\"1\", [\"cn-hangzhou-a\", \"cn-hangzhou-b\"]]}"],
            implementation: select
        )
    }

    fn register_index_function(&self) -> Result<()> {
        register_function!(
            self,
            "Index",
            category: FunctionCategory::Collection,
            description: "Position of the first element equal to the value, or -1",
            parameters: [
                "list": Some("list") => "List to search",
                "value": None => "Value to look for"
            ],
            return_type: "integer",
            examples: ["{\"Fn::Index\": [[\"a\", \"b\"], \"b\"]}"],
            implementation: index
        )
    }

    fn register_length_function(&self) -> Result<()> {
        register_function!(
            self,
            "Length",
            category: FunctionCategory::Collection,
            description: "Number of characters in a string or elements in a list",
            parameters: ["value": Some("string | list") => "Value to measure, wrapped in a one-element list"],
            return_type: "integer",
            examples: ["{\"Fn::Length\": [\"hello\"]}", "{\"Fn::Length\": [[1, 2, 3]]}"],
            implementation: length
        )
    }

    fn register_list_merge_function(&self) -> Result<()> {
        register_function!(
            self,
            "ListMerge",
            category: FunctionCategory::Collection,
            description: "Concatenates a list of lists, preserving order",
            parameters: ["lists": Some("list<list>") => "Lists to concatenate"],
            return_type: "list",
            examples: ["{\"Fn::ListMerge\": [[1, 2], [3]]}"],
            implementation: list_merge
        )
    }

    fn register_select_map_list_function(&self) -> Result<()> {
        register_function!(
            self,
            "SelectMapList",
            category: FunctionCategory::Collection,
            description: "Projects one key out of every map in a list; maps without the key yield null",
            parameters: [
                "key": Some("string") => "Key to extract",
                "maps": Some("list<map>") => "Maps to project"
            ],
            return_type: "list",
            examples: ["{\"Fn::SelectMapList\": [\"Id\", [{\"Id\": \"a\"}, {\"Id\": \"b\"}]]}"],
            implementation: select_map_list
        )
    }
}

fn select(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(2)?;
    let index = context.resolve(&args[0])?;
    if context.is_function(&index) {
        return Ok(context.unresolved());
    }
    let index = CollectionUtils::to_index(context, &index)?;

    let list = context.resolve(&args[1])?;
    if context.is_function(&list) {
        return Ok(context.unresolved());
    }
    let mut items = match list {
        Value::List(items) => items,
        other => return Err(context.invalid_type("list", "a list", &other)),
    };

    let len = items.len();
    match usize::try_from(index) {
        Ok(position) if position < len => Ok(items.swap_remove(position)),
        _ => Err(ResolverError::IndexOutOfBounds {
            function: context.key.to_string(),
            index,
            len,
        }),
    }
}

fn index(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(2)?;
    let Some(resolved) = context.resolve_each(args)? else {
        return Ok(context.unresolved());
    };
    let Some(items) = resolved[0].as_list() else {
        return Err(context.invalid_type("list", "a list", &resolved[0]));
    };
    let position = items
        .iter()
        .position(|item| *item == resolved[1])
        .map_or(-1, |position| position as i64);
    Ok(Value::Int(position))
}

fn length(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(1)?;
    let resolved = context.resolve(&args[0])?;
    if context.is_function(&resolved) {
        return Ok(context.unresolved());
    }
    match &resolved {
        Value::String(s) => Ok(Value::Int(s.chars().count() as i64)),
        Value::List(items) => Ok(Value::Int(items.len() as i64)),
        other => Err(context.invalid_type("value", "a string or list", other)),
    }
}

fn list_merge(context: &FunctionContext) -> Result<Value> {
    let args = context.argument_list()?;
    let mut merged = Vec::new();
    for arg in args {
        match context.resolve(arg)? {
            resolved if context.is_function(&resolved) => return Ok(context.unresolved()),
            Value::List(items) => merged.extend(items),
            other => return Err(context.invalid_type("element", "a list", &other)),
        }
    }
    Ok(Value::List(merged))
}

fn select_map_list(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(2)?;
    let Some(resolved) = context.resolve_each(args)? else {
        return Ok(context.unresolved());
    };
    let Some(key) = resolved[0].as_str() else {
        return Err(context.invalid_type("key", "a string", &resolved[0]));
    };
    let Some(items) = resolved[1].as_list() else {
        return Err(context.invalid_type("maps", "a list", &resolved[1]));
    };

    items
        .iter()
        .map(|item| match item {
            Value::Map(map) => Ok(map.get(key).cloned().unwrap_or(Value::Null)),
            other => Err(context.invalid_type("maps", "a list of maps", other)),
        })
        .collect::<Result<Vec<_>>>()
        .map(Value::List)
}
