// Copyright 2024 OctoFHIR Team
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.

//! Template resolver - the main entry point for template resolution
//!
//! Two entry points are provided. [`TemplateResolver::resolve_functions`]
//! folds every statically resolvable function in a template.
//! [`TemplateResolver::resolve_conditions_and_functions`] first evaluates
//! the `Conditions` section, prunes conditional resources and outputs, and
//! makes the condition results visible to `Fn::If` by name.
//!
//! Neither entry point fails. A hard error is logged and the template is
//! returned as it stood after the last step that succeeded, with
//! [`Resolution::fully_resolved`] set to `false`.

use std::sync::Arc;

use crate::conditions::{self, CONDITIONS_SECTION, ConditionResults};
use crate::config::ResolverConfig;
use crate::core::{Map, Parameters, Result, Value};
use crate::evaluator::Resolver;
use crate::registry::{FunctionRegistry, RegexCache, ResolutionContext};

/// Template section declaring parameters
const PARAMETERS_SECTION: &str = "Parameters";

/// Outcome of a top-level resolution call
#[derive(Debug, Clone, PartialEq)]
pub struct Resolution {
    /// The resolved template, or the fallback when a step failed
    pub template: Value,
    /// `false` when a hard error forced a fallback. Function calls that
    /// merely need runtime information do not clear this flag.
    pub fully_resolved: bool,
    /// Evaluated conditions, when condition evaluation ran and succeeded
    pub conditions: Option<ConditionResults>,
}

impl Resolution {
    fn complete(template: Value, conditions: Option<ConditionResults>) -> Self {
        Self {
            template,
            fully_resolved: true,
            conditions,
        }
    }

    fn fallback(template: Value, conditions: Option<ConditionResults>) -> Self {
        Self {
            template,
            fully_resolved: false,
            conditions,
        }
    }
}

/// Main template resolver
///
/// Cheap to clone; clones share the function registry and regex cache.
#[derive(Debug, Clone)]
pub struct TemplateResolver {
    registry: Arc<FunctionRegistry>,
    regex_cache: Arc<RegexCache>,
    config: ResolverConfig,
}

impl Default for TemplateResolver {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateResolver {
    /// Create a resolver with the built-in functions and default config
    pub fn new() -> Self {
        Self::with_config(ResolverConfig::default())
    }

    pub fn with_config(config: ResolverConfig) -> Self {
        Self {
            registry: Arc::new(FunctionRegistry::default()),
            regex_cache: Arc::new(RegexCache::new()),
            config,
        }
    }

    /// Use a custom function registry
    pub fn with_registry(mut self, registry: Arc<FunctionRegistry>) -> Self {
        self.registry = registry;
        self
    }

    /// Share a regex cache with other resolvers
    pub fn with_regex_cache(mut self, regex_cache: Arc<RegexCache>) -> Self {
        self.regex_cache = regex_cache;
        self
    }

    pub fn registry(&self) -> &Arc<FunctionRegistry> {
        &self.registry
    }

    pub fn regex_cache(&self) -> &Arc<RegexCache> {
        &self.regex_cache
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    /// Explicit parameters, completed by the pre-resolved values declared
    /// in the template's `Parameters` section
    pub fn merged_parameters(&self, template: &Value, parameters: &Parameters) -> Parameters {
        let mut merged = parameters.clone();
        let Some(declared) = template.get(PARAMETERS_SECTION).and_then(Value::as_map) else {
            return merged;
        };
        for (name, definition) in declared {
            if merged.contains_key(name) {
                continue;
            }
            if let Some(value) = definition.get(&self.config.resolved_value_field) {
                merged.insert(name.clone(), value.clone());
            }
        }
        merged
    }

    /// Fold every statically resolvable function in `template`
    pub fn resolve_functions(&self, template: &Value, parameters: &Parameters) -> Resolution {
        let merged = self.merged_parameters(template, parameters);
        match self.resolver(&merged, template).resolve(template) {
            Ok(resolved) => Resolution::complete(resolved, None),
            Err(err) => {
                log::warn!(
                    "[{}] function resolution failed, returning template unresolved: {err}",
                    err.error_code()
                );
                Resolution::fallback(template.clone(), None)
            }
        }
    }

    /// Evaluate the template's `Conditions` section.
    ///
    /// A template without conditions yields an empty result set.
    pub fn resolve_conditions(
        &self,
        template: &Value,
        parameters: &Parameters,
    ) -> Result<ConditionResults> {
        let merged = self.merged_parameters(template, parameters);
        self.evaluate_conditions(template, &merged)
    }

    /// Evaluate conditions, prune by them, then fold functions.
    ///
    /// Condition results are added to the parameter namespace and shadow a
    /// parameter of the same name. When condition evaluation fails, the
    /// `Conditions` section is kept verbatim, nothing is pruned, and the
    /// other sections are still function-resolved.
    pub fn resolve_conditions_and_functions(
        &self,
        template: &Value,
        parameters: &Parameters,
    ) -> Resolution {
        let Value::Map(document) = template else {
            return self.resolve_functions(template, parameters);
        };
        let mut merged = self.merged_parameters(template, parameters);

        let results = match self.evaluate_conditions(template, &merged) {
            Ok(results) => results,
            Err(err) => {
                log::warn!(
                    "[{}] condition resolution failed, keeping Conditions unevaluated: {err}",
                    err.error_code()
                );
                return self.resolve_except_conditions(document, &merged);
            }
        };

        let mut pruned = document.clone();
        pruned.shift_remove(CONDITIONS_SECTION);
        let removed = conditions::apply_conditions(&mut pruned, &results);
        log::debug!("pruned {removed} conditional entries");
        for (name, value) in &results {
            merged.insert(name.clone(), Value::Bool(*value));
        }

        let pruned = Value::Map(pruned);
        let resolved = self.resolver(&merged, &pruned).resolve(&pruned);
        match resolved {
            Ok(resolved) => Resolution::complete(resolved, Some(results)),
            Err(err) => {
                log::warn!(
                    "[{}] function resolution failed, returning pruned template: {err}",
                    err.error_code()
                );
                Resolution::fallback(pruned, Some(results))
            }
        }
    }

    fn resolver<'a>(&'a self, parameters: &'a Parameters, template: &'a Value) -> Resolver<'a> {
        Resolver::new(
            &self.registry,
            &self.regex_cache,
            &self.config,
            parameters,
            template,
        )
    }

    fn evaluate_conditions(
        &self,
        template: &Value,
        parameters: &Parameters,
    ) -> Result<ConditionResults> {
        match template.get(CONDITIONS_SECTION).and_then(Value::as_map) {
            Some(section) => {
                conditions::evaluate_conditions(section, &self.resolver(parameters, template))
            }
            None => Ok(ConditionResults::new()),
        }
    }

    /// Resolve every top-level section except `Conditions`, which is copied
    fn resolve_except_conditions(&self, document: &Map, parameters: &Parameters) -> Resolution {
        let template = Value::Map(document.clone());
        let resolver = self.resolver(parameters, &template);
        let resolved: Result<Map> = document
            .iter()
            .map(|(key, section)| {
                if key == CONDITIONS_SECTION {
                    Ok((key.clone(), section.clone()))
                } else {
                    Ok((key.clone(), resolver.resolve(section)?))
                }
            })
            .collect();

        match resolved {
            Ok(resolved) => Resolution::fallback(Value::Map(resolved), None),
            Err(err) => {
                log::warn!(
                    "[{}] function resolution failed, returning template unresolved: {err}",
                    err.error_code()
                );
                Resolution::fallback(template.clone(), None)
            }
        }
    }
}
