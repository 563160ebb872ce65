//! Map functions: `Fn::FindInMap`, `Fn::GetJsonValue` and
//! `Fn::MergeMapToList`

use super::{FunctionCategory, FunctionContext, FunctionRegistry};
use crate::core::{Map, ResolverError, Result, Value};
use crate::register_function;

/// Template section holding `Fn::FindInMap` tables
const MAPPINGS_SECTION: &str = "Mappings";

impl FunctionRegistry {
    pub fn register_mapping_functions(&self) -> Result<()> {
        self.register_find_in_map_function()?;
        self.register_get_json_value_function()?;
        self.register_merge_map_to_list_function()?;
        Ok(())
    }

    fn register_find_in_map_function(&self) -> Result<()> {
        register_function!(
            self,
            "FindInMap",
            category: FunctionCategory::Mapping,
            description: "Two-level lookup into a table of the template's Mappings section. A missing table or key leaves the call unresolved.",
            parameters: [
                "map": Some("string") => "Mapping name",
                "top_level_key": Some("string") => "Outer key",
                "second_level_key": Some("string") => "Inner key"
            ],
            return_type: "any",
            examples: ["{\"Fn::FindInMap\": [\"RegionMap\", {\"Ref\": \"Region\"}, \"ImageId\"]}"],
            implementation: find_in_map
        )
    }

    fn register_get_json_value_function(&self) -> Result<()> {
        register_function!(
            self,
            "GetJsonValue",
            category: FunctionCategory::Mapping,
            description: "Parses a JSON object and returns the value of one key. A missing key leaves the call unresolved.",
            parameters: [
                "key": Some("string") => "Key to extract",
                "json": Some("string") => "JSON object text"
            ],
            return_type: "any",
            examples: ["{\"Fn::GetJsonValue\": [\"host\", \"{\\\"host\\\": \\\"db.local\\\"}\"]}"],
            implementation: get_json_value
        )
    }

    fn register_merge_map_to_list_function(&self) -> Result<()> {
        register_function!(
            self,
            "MergeMapToList",
            category: FunctionCategory::Mapping,
            description: "Merges equally long lists of maps position by position. Later lists override keys of earlier ones.",
            parameters: ["lists": Some("list<list<map>>") => "Lists of maps to merge"],
            return_type: "list<map>",
            examples: ["{\"Fn::MergeMapToList\": [[{\"a\": 1}], [{\"b\": 2}]]}"],
            implementation: merge_map_to_list
        )
    }
}

fn find_in_map(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(3)?;
    let Some(resolved) = context.resolve_each(args)? else {
        return Ok(context.unresolved());
    };
    let Some(map_name) = resolved[0].as_str() else {
        return Err(context.invalid_type("map", "a string", &resolved[0]));
    };
    let top_key = resolved[1].to_string();
    let second_key = resolved[2].to_string();

    let found = context
        .template()
        .get(MAPPINGS_SECTION)
        .and_then(|mappings| mappings.get(map_name))
        .and_then(|table| table.get(&top_key))
        .and_then(|row| row.get(&second_key));
    match found {
        Some(value) => context.resolve(value),
        None => {
            log::trace!(
                "{}: no entry {map_name}/{top_key}/{second_key}",
                context.key
            );
            Ok(context.unresolved())
        }
    }
}

fn get_json_value(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(2)?;
    let Some(resolved) = context.resolve_each(args)? else {
        return Ok(context.unresolved());
    };
    let Some(key) = resolved[0].as_str() else {
        return Err(context.invalid_type("key", "a string", &resolved[0]));
    };
    let Some(json) = resolved[1].as_str() else {
        return Err(context.invalid_type("json", "a string", &resolved[1]));
    };

    let document: serde_json::Value =
        serde_json::from_str(json).map_err(|source| ResolverError::InvalidJson {
            function: context.key.to_string(),
            source,
        })?;
    let serde_json::Value::Object(object) = document else {
        return Err(ResolverError::invalid_type(
            context.key,
            "json",
            "a JSON object",
            "another JSON value",
        ));
    };
    match object.get(key) {
        Some(value) => Ok(Value::from(value.clone())),
        None => Ok(context.unresolved()),
    }
}

fn merge_map_to_list(context: &FunctionContext) -> Result<Value> {
    let args = context.argument_list()?;
    let Some(lists) = context.resolve_each(args)? else {
        return Ok(context.unresolved());
    };

    let mut merged: Vec<Map> = Vec::new();
    for (position, list) in lists.iter().enumerate() {
        let Some(items) = list.as_list() else {
            return Err(context.invalid_type("lists", "a list of lists", list));
        };
        if position == 0 {
            merged.resize_with(items.len(), Map::new);
        } else if items.len() != merged.len() {
            return Err(context.invalid_arguments(format!(
                "all lists must have the same length, expected {} got {}",
                merged.len(),
                items.len()
            )));
        }

        for (target, item) in merged.iter_mut().zip(items) {
            if context.is_function(item) {
                return Ok(context.unresolved());
            }
            let Some(map) = item.as_map() else {
                return Err(context.invalid_type("lists", "lists of maps", item));
            };
            for (key, value) in map {
                target.insert(key.clone(), value.clone());
            }
        }
    }
    Ok(Value::List(merged.into_iter().map(Value::Map).collect()))
}
