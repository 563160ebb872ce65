//! Intrinsic function registry
//!
//! Every `Fn::` function is registered here together with its metadata.
//! Functions receive a [`FunctionContext`] holding their raw, unresolved
//! argument value and a [`ResolutionContext`] used to resolve sub-values on
//! demand, so each function decides what to resolve and in which order.

use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use crate::config::ResolverConfig;
use crate::core::{Parameters, ResolverError, Result, Value};

pub mod builder;
pub mod collection;
pub mod logic;
pub mod mapping;
pub mod math;
pub mod string;

pub use string::RegexCache;

#[cfg(test)]
mod tests;



#[cfg(test)]
mod mapping_tests;


#[cfg(test)]
mod string_tests;

#[derive(Debug, Clone)]
pub struct FunctionMetadata {
    pub name: String,
    pub category: FunctionCategory,
    pub description: String,
    pub parameters: Vec<ParameterMetadata>,
    pub return_type: Option<String>,
    pub examples: Vec<String>,
}

#[derive(Debug, Clone)]
pub struct ParameterMetadata {
    pub name: String,
    pub type_constraint: Option<String>,
    pub description: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FunctionCategory {
    Math,
    Logic,
    String,
    Collection,
    Mapping,
}

/// Services a function needs while it runs.
///
/// Implemented by the value resolver; tests substitute their own doubles.
pub trait ResolutionContext {
    /// Resolve a sub-value of the template
    fn resolve(&self, value: &Value) -> Result<Value>;

    /// Whether `value` is still a function-call node
    fn is_function(&self, value: &Value) -> bool;

    fn parameters(&self) -> &Parameters;

    /// The whole template, for `Mappings` and `Resources` lookups
    fn template(&self) -> &Value;

    fn config(&self) -> &ResolverConfig;

    fn regex_cache(&self) -> &RegexCache;
}

/// Function execution context
pub struct FunctionContext<'a> {
    /// Function name without the prefix (`Join`)
    pub name: &'a str,
    /// Key of the call node as written (`Fn::Join`)
    pub key: &'a str,
    /// Raw argument value, not yet resolved
    pub arguments: &'a Value,
    pub resolver: &'a dyn ResolutionContext,
}

impl<'a> FunctionContext<'a> {
    pub fn new(
        key: &'a str,
        name: &'a str,
        arguments: &'a Value,
        resolver: &'a dyn ResolutionContext,
    ) -> Self {
        Self {
            name,
            key,
            arguments,
            resolver,
        }
    }

    /// The call node this context was built from, unchanged.
    ///
    /// Returned whenever an argument cannot be evaluated statically.
    pub fn unresolved(&self) -> Value {
        Value::call(self.key, self.arguments.clone())
    }

    pub fn resolve(&self, value: &Value) -> Result<Value> {
        self.resolver.resolve(value)
    }

    pub fn is_function(&self, value: &Value) -> bool {
        self.resolver.is_function(value)
    }

    /// Whether `value` is, or anywhere contains, a function-call node.
    ///
    /// Functions that render a value as text check this so an unresolved
    /// call is never frozen into a string.
    pub fn contains_function(&self, value: &Value) -> bool {
        if self.is_function(value) {
            return true;
        }
        match value {
            Value::List(items) => items.iter().any(|item| self.contains_function(item)),
            Value::Map(map) => map.values().any(|child| self.contains_function(child)),
            _ => false,
        }
    }

    /// Resolve `values` in order, stopping at the first one that is still a
    /// function-call node. `None` means the call must be returned unresolved.
    pub fn resolve_each(&self, values: &[Value]) -> Result<Option<Vec<Value>>> {
        let mut resolved = Vec::with_capacity(values.len());
        for value in values {
            let value = self.resolve(value)?;
            if self.is_function(&value) {
                return Ok(None);
            }
            resolved.push(value);
        }
        Ok(Some(resolved))
    }

    /// The argument value as a list
    pub fn argument_list(&self) -> Result<&'a [Value]> {
        self.arguments
            .as_list()
            .ok_or_else(|| self.invalid_type("arguments", "a list", self.arguments))
    }

    /// The argument list, which must have exactly `count` elements
    pub fn exact_arguments(&self, count: usize) -> Result<&'a [Value]> {
        let args = self.argument_list()?;
        if args.len() != count {
            return Err(self.invalid_arguments(format!(
                "expected {count} arguments, got {}",
                args.len()
            )));
        }
        Ok(args)
    }

    /// The argument list, which must have at least `count` elements
    pub fn at_least_arguments(&self, count: usize) -> Result<&'a [Value]> {
        let args = self.argument_list()?;
        if args.len() < count {
            return Err(self.invalid_arguments(format!(
                "expected at least {count} arguments, got {}",
                args.len()
            )));
        }
        Ok(args)
    }

    pub fn invalid_arguments(&self, message: impl Into<String>) -> ResolverError {
        ResolverError::invalid_arguments(self.key, message)
    }

    pub fn invalid_type(&self, argument: &str, expected: &str, actual: &Value) -> ResolverError {
        ResolverError::invalid_type(self.key, argument, expected, actual.type_name())
    }

    pub fn parameters(&self) -> &Parameters {
        self.resolver.parameters()
    }

    pub fn template(&self) -> &Value {
        self.resolver.template()
    }

    pub fn config(&self) -> &ResolverConfig {
        self.resolver.config()
    }

    pub fn regex_cache(&self) -> &RegexCache {
        self.resolver.regex_cache()
    }
}

/// Sync function signature
pub type SyncFunction = Arc<dyn Fn(&FunctionContext) -> Result<Value> + Send + Sync>;

/// Thread-safe function registry with metadata support
pub struct FunctionRegistry {
    functions: RwLock<FxHashMap<String, (SyncFunction, FunctionMetadata)>>,
}

impl FunctionRegistry {
    /// An empty registry
    pub fn new() -> Self {
        Self {
            functions: RwLock::new(FxHashMap::default()),
        }
    }

    /// Register a function under its unprefixed name
    pub fn register_function(
        &self,
        name: impl Into<String>,
        function: SyncFunction,
        metadata: FunctionMetadata,
    ) -> Result<()> {
        let name = name.into();
        let mut functions = self.functions.write();
        if functions.contains_key(&name) {
            return Err(ResolverError::DuplicateFunction { name });
        }
        functions.insert(name, (function, metadata));
        Ok(())
    }

    pub fn get_function(&self, name: &str) -> Option<SyncFunction> {
        self.functions
            .read()
            .get(name)
            .map(|(function, _)| Arc::clone(function))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.functions.read().contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.functions.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.read().is_empty()
    }

    pub fn get_function_metadata(&self, name: &str) -> Option<FunctionMetadata> {
        self.functions
            .read()
            .get(name)
            .map(|(_, metadata)| metadata.clone())
    }

    /// Metadata of every registered function, sorted by name
    pub fn list_functions(&self) -> Vec<FunctionMetadata> {
        let mut functions: Vec<FunctionMetadata> = self
            .functions
            .read()
            .values()
            .map(|(_, metadata)| metadata.clone())
            .collect();
        functions.sort_by(|a, b| a.name.cmp(&b.name));
        functions
    }

    pub fn list_functions_by_category(&self, category: FunctionCategory) -> Vec<FunctionMetadata> {
        self.list_functions()
            .into_iter()
            .filter(|metadata| metadata.category == category)
            .collect()
    }

    /// Render a help text for a function: signature, description, examples
    pub fn function_help(&self, name: &str) -> Option<String> {
        let metadata = self.get_function_metadata(name)?;
        let parameters = metadata
            .parameters
            .iter()
            .map(|param| match &param.type_constraint {
                Some(constraint) => format!("{}: {}", param.name, constraint),
                None => param.name.clone(),
            })
            .collect::<Vec<_>>()
            .join(", ");
        let mut help = format!("Fn::{}({})", metadata.name, parameters);
        if let Some(return_type) = &metadata.return_type {
            help.push_str(" -> ");
            help.push_str(return_type);
        }
        help.push_str("\n\n");
        help.push_str(&metadata.description);
        for param in &metadata.parameters {
            help.push_str(&format!("\n  {}: {}", param.name, param.description));
        }
        if !metadata.examples.is_empty() {
            help.push_str("\n\nExamples:");
            for example in &metadata.examples {
                help.push_str("\n  ");
                help.push_str(example);
            }
        }
        Some(help)
    }

    /// Invoke a registered function; `None` when the name is unknown.
    ///
    /// The registry lock is released before the function runs, so functions
    /// may re-enter the resolver freely.
    pub fn call(&self, context: &FunctionContext) -> Option<Result<Value>> {
        let function = self.get_function(context.name)?;
        Some(function(context))
    }

    fn register_default_functions(&self) -> Result<()> {
        self.register_math_functions()?;
        self.register_logic_functions()?;
        self.register_string_functions()?;
        self.register_collection_functions()?;
        self.register_mapping_functions()?;
        Ok(())
    }
}

impl Default for FunctionRegistry {
    /// A registry holding every built-in function
    fn default() -> Self {
        let registry = Self::new();
        if let Err(err) = registry.register_default_functions() {
            log::error!("failed to register built-in functions: {err}");
        }
        registry
    }
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FunctionRegistry")
            .field("functions", &self.len())
            .finish()
    }
}
