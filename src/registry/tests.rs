//! Tests for the function registry

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::config::ResolverConfig;
    use crate::core::{ErrorCode, Parameters, RS0052, ResolverError, Result, Value};
    use crate::evaluator::Resolver;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn upper(context: &FunctionContext) -> Result<Value> {
        let resolved = context.resolve(context.arguments)?;
        if context.is_function(&resolved) {
            return Ok(context.unresolved());
        }
        Ok(Value::String(resolved.to_string().to_uppercase()))
    }

    fn register_upper(registry: &FunctionRegistry) -> Result<()> {
        crate::register_function!(
            registry,
            "Upper",
            category: FunctionCategory::String,
            description: "Upper-cases the value's text",
            parameters: ["value": None => "Value to convert"],
            return_type: "string",
            examples: ["{\"Fn::Upper\": \"abc\"}"],
            implementation: upper
        )
    }

    #[test]
    fn test_default_registry_has_all_builtins() {
        let registry = FunctionRegistry::default();
        let names: Vec<String> = registry
            .list_functions()
            .into_iter()
            .map(|metadata| metadata.name)
            .collect();

        assert_eq!(
            names,
            vec![
                "Add",
                "And",
                "Any",
                "Avg",
                "Base64Decode",
                "Base64Encode",
                "Calculate",
                "Contains",
                "EachMemberIn",
                "Equals",
                "FindInMap",
                "GetJsonValue",
                "If",
                "Indent",
                "Index",
                "Join",
                "Length",
                "ListMerge",
                "MatchPattern",
                "Max",
                "MergeMapToList",
                "Min",
                "Not",
                "Or",
                "Replace",
                "Select",
                "SelectMapList",
                "Split",
                "Str",
                "Sub",
            ]
        );
        assert_eq!(registry.len(), 30);
        assert!(!registry.is_empty());
    }

    #[test]
    fn test_functions_by_category() {
        let registry = FunctionRegistry::default();
        let count = |category| registry.list_functions_by_category(category).len();

        assert_eq!(count(FunctionCategory::Math), 5);
        assert_eq!(count(FunctionCategory::Logic), 8);
        assert_eq!(count(FunctionCategory::String), 9);
        assert_eq!(count(FunctionCategory::Collection), 5);
        assert_eq!(count(FunctionCategory::Mapping), 3);
    }

    #[test]
    fn test_empty_registry() {
        let registry = FunctionRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.get_function("Join").is_none());
        assert!(registry.get_function_metadata("Join").is_none());
        assert!(registry.function_help("Join").is_none());
    }

    #[test]
    fn test_duplicate_function_registration() {
        let registry = FunctionRegistry::new();
        assert!(register_upper(&registry).is_ok());

        let err = register_upper(&registry).unwrap_err();
        assert!(matches!(&err, ResolverError::DuplicateFunction { name } if name == "Upper"));
        assert_eq!(err.error_code(), RS0052);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_builtin_cannot_be_registered_twice() {
        let registry = FunctionRegistry::default();
        let err = registry.register_logic_functions().unwrap_err();
        assert_eq!(err.error_code(), ErrorCode::new(52));
        assert_eq!(registry.len(), 30);
    }

    #[test]
    fn test_custom_function_is_dispatched() {
        let registry = FunctionRegistry::default();
        register_upper(&registry).unwrap();
        assert!(registry.contains("Upper"));

        let regex_cache = RegexCache::new();
        let config = ResolverConfig::default();
        let mut parameters = Parameters::default();
        parameters.insert("Env".to_string(), Value::from("prod"));
        let template = Value::Null;
        let resolver = Resolver::new(&registry, &regex_cache, &config, &parameters, &template);

        let input = Value::from(json!({"Fn::Upper": {"Ref": "Env"}}));
        assert_eq!(resolver.resolve(&input).unwrap(), Value::from("PROD"));
    }

    #[test]
    fn test_metadata_lookup() {
        let registry = FunctionRegistry::default();
        let metadata = registry.get_function_metadata("If").unwrap();

        assert_eq!(metadata.category, FunctionCategory::Logic);
        let names: Vec<&str> = metadata
            .parameters
            .iter()
            .map(|param| param.name.as_str())
            .collect();
        assert_eq!(names, vec!["condition", "then", "else"]);
        assert_eq!(metadata.parameters[1].type_constraint, None);
    }

    #[test]
    fn test_function_help() {
        let registry = FunctionRegistry::default();
        let help = registry.function_help("Join").unwrap();

        assert!(help.starts_with("Fn::Join(delimiter: string, values: list) -> string"));
        assert!(help.contains("Concatenates the elements of a list"));
        assert!(help.contains("Examples:"));
        assert!(registry.function_help("GetAtt").is_none());
    }

    #[test]
    fn test_call_unknown_function() {
        let registry = FunctionRegistry::default();
        let regex_cache = RegexCache::new();
        let config = ResolverConfig::default();
        let parameters = Parameters::default();
        let template = Value::Null;
        let resolver = Resolver::new(&registry, &regex_cache, &config, &parameters, &template);

        let arguments = Value::from(json!(["Vpc", "VpcId"]));
        let context = FunctionContext::new("Fn::GetAtt", "GetAtt", &arguments, &resolver);
        assert!(registry.call(&context).is_none());
    }
}
