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

//! Shared helpers for integration tests

#![allow(dead_code)]

use ros_template_resolver::{Parameters, Resolution, TemplateResolver, Value};

/// Build a parameter namespace from JSON values
pub fn parameters(entries: &[(&str, serde_json::Value)]) -> Parameters {
    entries
        .iter()
        .map(|(name, value)| (name.to_string(), Value::from(value.clone())))
        .collect()
}

pub fn value(json: serde_json::Value) -> Value {
    Value::from(json)
}

/// Function-resolve a JSON template with the default resolver
pub fn resolve_functions(
    template: serde_json::Value,
    entries: &[(&str, serde_json::Value)],
) -> Resolution {
    TemplateResolver::new().resolve_functions(&Value::from(template), &parameters(entries))
}

/// Condition-and-function resolve a JSON template with the default resolver
pub fn resolve_all(
    template: serde_json::Value,
    entries: &[(&str, serde_json::Value)],
) -> Resolution {
    TemplateResolver::new()
        .resolve_conditions_and_functions(&Value::from(template), &parameters(entries))
}
