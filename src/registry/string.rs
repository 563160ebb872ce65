//! String functions and the shared regex cache
//!
//! Values are turned into text with the canonical `Display` rendering of
//! [`Value`], so numbers, booleans and nested structures can be joined,
//! substituted or encoded alongside plain strings.

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use parking_lot::RwLock;
use regex::Regex;
use rustc_hash::FxHashMap;

use super::{FunctionCategory, FunctionContext, FunctionRegistry};
use crate::core::{Map, ResolverError, Result, Value};
use crate::register_function;

/// `${Name}` substitution token; `${!Name}` is an escaped literal
const SUB_TOKEN_PATTERN: &str = r"\$\{(!?)([^}]+)\}";

/// Thread-safe cache of compiled regular expressions.
///
/// Lookups take a read lock; a miss upgrades to the write lock and checks
/// again before compiling, so concurrent callers compile a pattern at most
/// once and the first compilation wins.
#[derive(Debug, Default)]
pub struct RegexCache {
    cache: RwLock<FxHashMap<String, Regex>>,
}

impl RegexCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_regex(&self, pattern: &str) -> std::result::Result<Regex, regex::Error> {
        if let Some(regex) = self.cache.read().get(pattern) {
            return Ok(regex.clone());
        }

        let mut cache = self.cache.write();
        if let Some(regex) = cache.get(pattern) {
            return Ok(regex.clone());
        }

        let regex = Regex::new(pattern)?;
        cache.insert(pattern.to_string(), regex.clone());
        Ok(regex)
    }

    pub fn len(&self) -> usize {
        self.cache.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.cache.read().is_empty()
    }
}

impl FunctionRegistry {
    pub fn register_string_functions(&self) -> Result<()> {
        self.register_join_function()?;
        self.register_split_function()?;
        self.register_sub_function()?;
        self.register_base64_encode_function()?;
        self.register_base64_decode_function()?;
        self.register_str_function()?;
        self.register_indent_function()?;
        self.register_replace_function()?;
        self.register_match_pattern_function()?;
        Ok(())
    }

    fn register_join_function(&self) -> Result<()> {
        register_function!(
            self,
            "Join",
            category: FunctionCategory::String,
            description: "Concatenates the elements of a list, separated by the delimiter",
            parameters: [
                "delimiter": Some("string") => "Separator placed between elements",
                "values": Some("list") => "Elements to join"
            ],
            return_type: "string",
            examples: ["{\"Fn::Join\": [\",\", [\"a\", \"b\", \"c\"]]}"],
            implementation: join
        )
    }

    fn register_split_function(&self) -> Result<()> {
        register_function!(
            self,
            "Split",
            category: FunctionCategory::String,
            description: "Splits a string on every occurrence of the delimiter. An empty delimiter splits into characters.",
            parameters: [
                "delimiter": Some("string") => "Separator",
                "source": Some("string") => "String to split"
            ],
            return_type: "list<string>",
            examples: ["{\"Fn::Split\": [\";\", \"a;b;c\"]}"],
            implementation: split
        )
    }

    fn register_sub_function(&self) -> Result<()> {
        register_function!(
            self,
            "Sub",
            category: FunctionCategory::String,
            description: "Substitutes ${Name} tokens from inline variables and parameters; ${!Name} yields ${Name} literally. If any token refers to a pseudo parameter, a resource attribute or an unknown name, the whole call is left unresolved.",
            parameters: [
                "template": Some("string") => "Text with ${Name} tokens",
                "variables": Some("map") => "Optional inline variables, taking precedence over parameters"
            ],
            return_type: "string",
            examples: [
                "{\"Fn::Sub\": \"${Prefix}-vpc\"}",
                "{\"Fn::Sub\": [\"${Name}-${Suffix}\", {\"Suffix\": \"prod\"}]}"
            ],
            implementation: sub
        )
    }

    fn register_base64_encode_function(&self) -> Result<()> {
        register_function!(
            self,
            "Base64Encode",
            category: FunctionCategory::String,
            description: "Standard Base64 encoding of the value's text",
            parameters: ["value": None => "Value to encode"],
            return_type: "string",
            examples: ["{\"Fn::Base64Encode\": \"hello\"}"],
            implementation: base64_encode
        )
    }

    fn register_base64_decode_function(&self) -> Result<()> {
        register_function!(
            self,
            "Base64Decode",
            category: FunctionCategory::String,
            description: "Decodes a standard Base64 string into UTF-8 text",
            parameters: ["value": Some("string") => "Base64 payload"],
            return_type: "string",
            examples: ["{\"Fn::Base64Decode\": \"aGVsbG8=\"}"],
            implementation: base64_decode
        )
    }

    fn register_str_function(&self) -> Result<()> {
        register_function!(
            self,
            "Str",
            category: FunctionCategory::String,
            description: "Converts a value to its string form",
            parameters: ["value": None => "Value to convert"],
            return_type: "string",
            examples: ["{\"Fn::Str\": 8080}"],
            implementation: str_
        )
    }

    fn register_indent_function(&self) -> Result<()> {
        register_function!(
            self,
            "Indent",
            category: FunctionCategory::String,
            description: "Prefixes every line of the text with the given number of spaces",
            parameters: [
                "count": Some("integer") => "Number of spaces",
                "text": Some("string") => "Text to indent"
            ],
            return_type: "string",
            examples: ["{\"Fn::Indent\": [4, \"line1\\nline2\"]}"],
            implementation: indent
        )
    }

    fn register_replace_function(&self) -> Result<()> {
        register_function!(
            self,
            "Replace",
            category: FunctionCategory::String,
            description: "Replaces every literal occurrence of each key with its value, applying the replacements in order",
            parameters: [
                "replacements": Some("map") => "Old text to new text",
                "source": Some("string") => "Text to rewrite"
            ],
            return_type: "string",
            examples: ["{\"Fn::Replace\": [{\"$ENV\": \"prod\"}, \"app-$ENV\"]}"],
            implementation: replace
        )
    }

    fn register_match_pattern_function(&self) -> Result<()> {
        register_function!(
            self,
            "MatchPattern",
            category: FunctionCategory::String,
            description: "True when the regular expression matches anywhere in the text",
            parameters: [
                "pattern": Some("string") => "Regular expression",
                "text": Some("string") => "Text to test"
            ],
            return_type: "boolean",
            examples: ["{\"Fn::MatchPattern\": [\"^cn-\", {\"Ref\": \"Region\"}]}"],
            implementation: match_pattern
        )
    }
}

fn join(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(2)?;
    let Some(resolved) = context.resolve_each(args)? else {
        return Ok(context.unresolved());
    };
    let Some(parts) = resolved[1].as_list() else {
        return Err(context.invalid_type("values", "a list", &resolved[1]));
    };
    if parts.iter().any(|part| context.contains_function(part)) {
        return Ok(context.unresolved());
    }

    let delimiter = resolved[0].to_string();
    let joined = parts
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(&delimiter);
    Ok(Value::String(joined))
}

fn split(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(2)?;
    let Some(resolved) = context.resolve_each(args)? else {
        return Ok(context.unresolved());
    };
    let Some(delimiter) = resolved[0].as_str() else {
        return Err(context.invalid_type("delimiter", "a string", &resolved[0]));
    };

    let source = resolved[1].to_string();
    let parts: Vec<Value> = if delimiter.is_empty() {
        source.chars().map(|c| Value::String(c.to_string())).collect()
    } else {
        source.split(delimiter).map(Value::from).collect()
    };
    Ok(Value::List(parts))
}

fn sub(context: &FunctionContext) -> Result<Value> {
    let (text, variables) = match context.arguments {
        Value::List(args) if (1..=2).contains(&args.len()) => (&args[0], args.get(1)),
        Value::List(args) => {
            return Err(context.invalid_arguments(format!(
                "expected a string and optional variable map, got {} arguments",
                args.len()
            )));
        }
        other => (other, None),
    };

    let template = context.resolve(text)?;
    if context.is_function(&template) {
        return Ok(context.unresolved());
    }
    let Some(text) = template.as_str() else {
        return Err(context.invalid_type("template", "a string", &template));
    };

    let inline = match variables {
        Some(variables) => {
            let resolved = context.resolve(variables)?;
            if context.is_function(&resolved) {
                return Ok(context.unresolved());
            }
            match resolved {
                Value::Map(map) => map,
                other => return Err(context.invalid_type("variables", "a map", &other)),
            }
        }
        None => Map::new(),
    };

    let token = context
        .regex_cache()
        .get_regex(SUB_TOKEN_PATTERN)
        .map_err(|source| ResolverError::InvalidPattern {
            function: context.key.to_string(),
            source,
        })?;

    let pseudo_prefix = context.config().pseudo_parameter_prefix.as_str();
    let mut output = String::with_capacity(text.len());
    let mut last = 0;
    for captures in token.captures_iter(text) {
        let Some(whole) = captures.get(0) else {
            continue;
        };
        output.push_str(&text[last..whole.start()]);
        last = whole.end();

        let name = &captures[2];
        if &captures[1] == "!" {
            output.push_str("${");
            output.push_str(name);
            output.push('}');
            continue;
        }
        if name.starts_with(pseudo_prefix) || name.contains('.') {
            log::trace!("{}: ${{{name}}} is only known at runtime", context.key);
            return Ok(context.unresolved());
        }
        match inline.get(name).or_else(|| context.parameters().get(name)) {
            Some(value) if !context.is_function(value) => output.push_str(&value.to_string()),
            _ => {
                log::trace!("{}: ${{{name}}} is not resolvable", context.key);
                return Ok(context.unresolved());
            }
        }
    }
    output.push_str(&text[last..]);
    Ok(Value::String(output))
}

fn base64_encode(context: &FunctionContext) -> Result<Value> {
    let resolved = context.resolve(context.arguments)?;
    if context.contains_function(&resolved) {
        return Ok(context.unresolved());
    }
    Ok(Value::String(STANDARD.encode(resolved.to_string())))
}

fn base64_decode(context: &FunctionContext) -> Result<Value> {
    let resolved = context.resolve(context.arguments)?;
    if context.is_function(&resolved) {
        return Ok(context.unresolved());
    }
    let Some(encoded) = resolved.as_str() else {
        return Err(context.invalid_type("value", "a string", &resolved));
    };

    let invalid = |message: String| ResolverError::InvalidBase64 {
        function: context.key.to_string(),
        message,
    };
    let bytes = STANDARD
        .decode(encoded)
        .map_err(|err| invalid(err.to_string()))?;
    let decoded = String::from_utf8(bytes).map_err(|err| invalid(err.to_string()))?;
    Ok(Value::String(decoded))
}

fn str_(context: &FunctionContext) -> Result<Value> {
    let resolved = context.resolve(context.arguments)?;
    if context.contains_function(&resolved) {
        return Ok(context.unresolved());
    }
    Ok(Value::String(resolved.to_string()))
}

fn indent(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(2)?;
    let Some(resolved) = context.resolve_each(args)? else {
        return Ok(context.unresolved());
    };
    let count = match &resolved[0] {
        Value::Int(n) => *n,
        Value::Float(n) => n.trunc() as i64,
        other => return Err(context.invalid_type("count", "a number", other)),
    };
    let Ok(count) = usize::try_from(count) else {
        return Err(context.invalid_arguments(format!(
            "indent count must not be negative, got {count}"
        )));
    };

    let text = resolved[1].to_string();
    let limit = context.config().max_string_length;
    let length = count
        .checked_mul(text.split('\n').count())
        .and_then(|padding| padding.checked_add(text.len()));
    if length.is_none_or(|length| length > limit) {
        return Err(context.invalid_arguments(format!(
            "indent count {count} would exceed the maximum string length of {limit}"
        )));
    }

    let prefix = " ".repeat(count);
    let indented = text
        .split('\n')
        .map(|line| format!("{prefix}{line}"))
        .collect::<Vec<_>>()
        .join("\n");
    Ok(Value::String(indented))
}

fn replace(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(2)?;
    let Some(resolved) = context.resolve_each(args)? else {
        return Ok(context.unresolved());
    };
    let Some(replacements) = resolved[0].as_map() else {
        return Err(context.invalid_type("replacements", "a map", &resolved[0]));
    };
    if replacements.values().any(|value| context.contains_function(value)) {
        return Ok(context.unresolved());
    }

    let mut result = resolved[1].to_string();
    for (old, new) in replacements {
        result = result.replace(old.as_str(), &new.to_string());
    }
    Ok(Value::String(result))
}

fn match_pattern(context: &FunctionContext) -> Result<Value> {
    let args = context.exact_arguments(2)?;
    let Some(resolved) = context.resolve_each(args)? else {
        return Ok(context.unresolved());
    };
    let Some(pattern) = resolved[0].as_str() else {
        return Err(context.invalid_type("pattern", "a string", &resolved[0]));
    };

    let regex = context
        .regex_cache()
        .get_regex(pattern)
        .map_err(|source| ResolverError::InvalidPattern {
            function: context.key.to_string(),
            source,
        })?;
    Ok(Value::Bool(regex.is_match(&resolved[1].to_string())))
}
