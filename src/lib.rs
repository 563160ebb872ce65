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

//! Static resolver for declarative cloud resource templates
//!
//! Folds intrinsic functions (`Fn::Join`, `Fn::If`, `Fn::Sub`, ...) and
//! parameter references that can be evaluated without deploying anything,
//! evaluates the `Conditions` section, and prunes conditional resources and
//! outputs. Anything that needs runtime information is left as written.
//!
//! ```
//! use ros_template_resolver::{Parameters, TemplateResolver, Value};
//! use serde_json::json;
//!
//! let template = Value::from(json!({
//!     "Outputs": {"Name": {"Value": {"Fn::Join": ["-", [{"Ref": "Env"}, "vpc"]]}}}
//! }));
//! let mut parameters = Parameters::default();
//! parameters.insert("Env".to_string(), Value::from("prod"));
//!
//! let resolution = TemplateResolver::new().resolve_functions(&template, &parameters);
//! assert!(resolution.fully_resolved);
//! assert_eq!(
//!     resolution.template,
//!     Value::from(json!({"Outputs": {"Name": {"Value": "prod-vpc"}}}))
//! );
//! ```

pub mod conditions;
pub mod config;
pub mod core;
pub mod engine;
pub mod evaluator;
pub mod parser;
pub mod registry;

// Re-export main types
pub use conditions::{ConditionGraph, ConditionResults};
pub use config::ResolverConfig;
pub use crate::core::{ErrorCode, Map, Parameters, ResolverError, Result, Value};
pub use engine::{Resolution, TemplateResolver};
pub use evaluator::Resolver;
pub use registry::{FunctionContext, FunctionRegistry, RegexCache, ResolutionContext};
