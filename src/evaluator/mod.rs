//! Value resolver
//!
//! Walks a template depth-first and folds every function-call node it can.
//! The input is never modified: each level builds a new value from its
//! resolved children, so a failed resolution leaves no partial state behind.

use std::cell::Cell;

use crate::config::ResolverConfig;
use crate::core::{Call, Parameters, ResolverError, Result, Value};
use crate::registry::{FunctionContext, FunctionRegistry, RegexCache, ResolutionContext};

pub mod reference;

pub use reference::resolve_reference;

/// Resolves values against one parameter namespace and template
pub struct Resolver<'a> {
    registry: &'a FunctionRegistry,
    regex_cache: &'a RegexCache,
    config: &'a ResolverConfig,
    parameters: &'a Parameters,
    template: &'a Value,
    depth: Cell<usize>,
}

impl<'a> Resolver<'a> {
    pub fn new(
        registry: &'a FunctionRegistry,
        regex_cache: &'a RegexCache,
        config: &'a ResolverConfig,
        parameters: &'a Parameters,
        template: &'a Value,
    ) -> Self {
        Self {
            registry,
            regex_cache,
            config,
            parameters,
            template,
            depth: Cell::new(0),
        }
    }

    fn resolve_node(&self, value: &Value) -> Result<Value> {
        match value.as_call(self.config) {
            Some(Call::Reference(target)) => Ok(resolve_reference(self, value, target)),
            Some(Call::Function {
                key,
                name,
                arguments,
            }) => {
                let context = FunctionContext::new(key, name, arguments, self);
                match self.registry.call(&context) {
                    Some(result) => result,
                    None => {
                        log::trace!("passing through unsupported function {key}");
                        Ok(value.clone())
                    }
                }
            }
            None => match value {
                Value::Map(map) => map
                    .iter()
                    .map(|(key, child)| Ok((key.clone(), self.resolve(child)?)))
                    .collect::<Result<_>>()
                    .map(Value::Map),
                Value::List(items) => items
                    .iter()
                    .map(|item| self.resolve(item))
                    .collect::<Result<_>>()
                    .map(Value::List),
                scalar => Ok(scalar.clone()),
            },
        }
    }
}

impl ResolutionContext for Resolver<'_> {
    fn resolve(&self, value: &Value) -> Result<Value> {
        let depth = self.depth.get() + 1;
        if depth > self.config.max_depth {
            return Err(ResolverError::DepthExceeded {
                max_depth: self.config.max_depth,
            });
        }
        self.depth.set(depth);
        let result = self.resolve_node(value);
        self.depth.set(depth - 1);
        result
    }

    fn is_function(&self, value: &Value) -> bool {
        value.as_call(self.config).is_some()
    }

    fn parameters(&self) -> &Parameters {
        self.parameters
    }

    fn template(&self) -> &Value {
        self.template
    }

    fn config(&self) -> &ResolverConfig {
        self.config
    }

    fn regex_cache(&self) -> &RegexCache {
        self.regex_cache
    }
}
