//! Tests for string functions and the regex cache

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::config::ResolverConfig;
    use crate::core::{Parameters, ResolverError, Result, Value};
    use crate::evaluator::Resolver;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn evaluate_with(
        parameters: &[(&str, serde_json::Value)],
        expression: serde_json::Value,
    ) -> Result<Value> {
        let registry = FunctionRegistry::default();
        let regex_cache = RegexCache::new();
        let config = ResolverConfig::default();
        let parameters: Parameters = parameters
            .iter()
            .map(|(name, value)| (name.to_string(), Value::from(value.clone())))
            .collect();
        let template = Value::Null;
        let resolver = Resolver::new(&registry, &regex_cache, &config, &parameters, &template);
        resolver.resolve(&Value::from(expression))
    }

    fn evaluate(expression: serde_json::Value) -> Result<Value> {
        evaluate_with(&[], expression)
    }

    fn assert_unresolved(parameters: &[(&str, serde_json::Value)], expression: serde_json::Value) {
        assert_eq!(
            evaluate_with(parameters, expression.clone()).unwrap(),
            Value::from(expression)
        );
    }

    #[rstest]
    #[case(json!({"Fn::Join": ["-", ["a", "b", "c"]]}), json!("a-b-c"))]
    #[case(json!({"Fn::Join": [",", [1, true, null, 2.5]]}), json!("1,true,,2.5"))]
    #[case(json!({"Fn::Join": ["", [[1, 2], {"k": "v"}]]}), json!("[1,2]{\"k\":\"v\"}"))]
    #[case(json!({"Fn::Join": ["-", []]}), json!(""))]
    #[case(json!({"Fn::Split": [";", "a;b;c"]}), json!(["a", "b", "c"]))]
    #[case(json!({"Fn::Split": ["", "abc"]}), json!(["a", "b", "c"]))]
    #[case(json!({"Fn::Split": [",", ""]}), json!([""]))]
    #[case(json!({"Fn::Base64Encode": "hello"}), json!("aGVsbG8="))]
    #[case(json!({"Fn::Base64Encode": 42}), json!("NDI="))]
    #[case(json!({"Fn::Base64Decode": "aGVsbG8="}), json!("hello"))]
    #[case(json!({"Fn::Str": 8080}), json!("8080"))]
    #[case(json!({"Fn::Str": 1.5}), json!("1.5"))]
    #[case(json!({"Fn::Str": true}), json!("true"))]
    #[case(json!({"Fn::Str": null}), json!(""))]
    #[case(json!({"Fn::Str": [1, 2]}), json!("[1,2]"))]
    #[case(json!({"Fn::Indent": [2, "a\nb"]}), json!("  a\n  b"))]
    #[case(json!({"Fn::Indent": [0, "a"]}), json!("a"))]
    #[case(json!({"Fn::Replace": [{"$ENV": "prod"}, "app-$ENV-$ENV"]}), json!("app-prod-prod"))]
    #[case(json!({"Fn::Replace": [{"a": "b", "b": "c"}, "ab"]}), json!("cc"))]
    #[case(json!({"Fn::MatchPattern": ["^cn-", "cn-hangzhou"]}), json!(true))]
    #[case(json!({"Fn::MatchPattern": ["^cn-", "us-west-1"]}), json!(false))]
    fn test_string_functions(#[case] expression: serde_json::Value, #[case] expected: serde_json::Value) {
        assert_eq!(evaluate(expression).unwrap(), Value::from(expected));
    }

    #[test]
    fn test_join_with_unresolved_element() {
        assert_unresolved(&[], json!({"Fn::Join": ["-", ["a", {"Ref": "Unknown"}]]}));
    }

    #[test]
    fn test_sub_from_parameters() {
        let result = evaluate_with(
            &[("Prefix", json!("app")), ("Port", json!(8080))],
            json!({"Fn::Sub": "${Prefix}-vpc:${Port}"}),
        );
        assert_eq!(result.unwrap(), Value::from("app-vpc:8080"));
    }

    #[test]
    fn test_sub_inline_variables_take_precedence() {
        let result = evaluate_with(
            &[("Name", json!("web")), ("Suffix", json!("dev"))],
            json!({"Fn::Sub": ["${Name}-${Suffix}", {"Suffix": "prod"}]}),
        );
        assert_eq!(result.unwrap(), Value::from("web-prod"));
    }

    #[test]
    fn test_sub_inline_variables_are_resolved() {
        let result = evaluate_with(
            &[("Env", json!("qa"))],
            json!({"Fn::Sub": ["db-${Stage}", {"Stage": {"Ref": "Env"}}]}),
        );
        assert_eq!(result.unwrap(), Value::from("db-qa"));
    }

    #[test]
    fn test_sub_escaped_token_is_literal() {
        let result = evaluate(json!({"Fn::Sub": "echo ${!Literal} done"}));
        assert_eq!(result.unwrap(), Value::from("echo ${Literal} done"));
    }

    #[test]
    fn test_sub_without_tokens() {
        assert_eq!(
            evaluate(json!({"Fn::Sub": "plain text"})).unwrap(),
            Value::from("plain text")
        );
    }

    #[rstest]
    #[case(json!({"Fn::Sub": "${ALIYUN::Region}-bucket"}))]
    #[case(json!({"Fn::Sub": "${Vpc.VpcId}"}))]
    #[case(json!({"Fn::Sub": "${Name}-${Missing}"}))]
    #[case(json!({"Fn::Sub": ["${Name}-${Zone}", {"Zone": {"Ref": "ALIYUN::Zone"}}]}))]
    fn test_sub_runtime_tokens_keep_call(#[case] expression: serde_json::Value) {
        assert_unresolved(&[("Name", json!("web"))], expression);
    }

    #[test]
    fn test_sub_argument_errors() {
        let err = evaluate(json!({"Fn::Sub": ["a", {}, "extra"]})).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidArguments { .. }));

        let err = evaluate(json!({"Fn::Sub": 5})).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidArgumentType { .. }));

        let err = evaluate(json!({"Fn::Sub": ["${A}", "not a map"]})).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidArgumentType { .. }));
    }

    #[test]
    fn test_base64_decode_errors() {
        let err = evaluate(json!({"Fn::Base64Decode": "not base64!"})).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidBase64 { .. }));

        // "/w==" decodes to the single byte 0xFF
        let err = evaluate(json!({"Fn::Base64Decode": "/w=="})).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidBase64 { .. }));
    }

    #[test]
    fn test_indent_rejects_negative_count() {
        let err = evaluate(json!({"Fn::Indent": [-1, "a"]})).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidArguments { .. }));
    }

    #[rstest]
    #[case(json!(1e18))]
    #[case(json!(4194304))]
    #[case(json!(9223372036854775807i64))]
    fn test_indent_rejects_oversized_output(#[case] count: serde_json::Value) {
        let err = evaluate(json!({"Fn::Indent": [count, "x"]})).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidArguments { ref message, .. } if message.contains("maximum string length")));
    }

    #[rstest]
    #[case(json!({"Fn::Str": [{"Ref": "Vpc"}]}))]
    #[case(json!({"Fn::Str": {"Id": {"Fn::GetAtt": ["Vpc", "VpcId"]}}}))]
    #[case(json!({"Fn::Base64Encode": [1, {"Ref": "Vpc"}]}))]
    #[case(json!({"Fn::Join": ["-", [["a", {"Ref": "Vpc"}]]]}))]
    #[case(json!({"Fn::Replace": [{"old": [{"Ref": "Vpc"}]}, "old"]}))]
    fn test_nested_unresolved_call_is_not_stringified(#[case] expression: serde_json::Value) {
        assert_unresolved(&[], expression);
    }

    #[test]
    fn test_invalid_pattern() {
        let err = evaluate(json!({"Fn::MatchPattern": ["(", "x"]})).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidPattern { .. }));
    }

    #[test]
    fn test_regex_cache_reuses_compiled_patterns() {
        let cache = RegexCache::new();
        assert!(cache.is_empty());

        let first = cache.get_regex("^a+$").unwrap();
        let second = cache.get_regex("^a+$").unwrap();
        assert_eq!(first.as_str(), second.as_str());
        assert_eq!(cache.len(), 1);

        assert!(cache.get_regex("[").is_err());
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_regex_cache_shared_across_threads() {
        let cache = RegexCache::new();
        std::thread::scope(|scope| {
            for _ in 0..4 {
                scope.spawn(|| {
                    for pattern in ["^x", "y$", "z+"] {
                        assert!(cache.get_regex(pattern).is_ok());
                    }
                });
            }
        });
        assert_eq!(cache.len(), 3);
    }
}
