//! Tests for mapping functions

#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::config::ResolverConfig;
    use crate::core::{Parameters, ResolverError, Result, Value};
    use crate::evaluator::Resolver;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn evaluate_in(
        template: serde_json::Value,
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
        let template = Value::from(template);
        let resolver = Resolver::new(&registry, &regex_cache, &config, &parameters, &template);
        resolver.resolve(&Value::from(expression))
    }

    fn evaluate(expression: serde_json::Value) -> Result<Value> {
        evaluate_in(json!({}), &[], expression)
    }

    fn mappings() -> serde_json::Value {
        json!({
            "Mappings": {
                "RegionMap": {
                    "cn-hangzhou": {"Image": "img-hz", "Zone": {"Ref": "DefaultZone"}},
                    "cn-beijing": {"Image": "img-bj"}
                },
                "Numbered": {"1": {"a": "one"}}
            }
        })
    }

    #[test]
    fn test_find_in_map() {
        let result = evaluate_in(
            mappings(),
            &[("Region", json!("cn-hangzhou"))],
            json!({"Fn::FindInMap": ["RegionMap", {"Ref": "Region"}, "Image"]}),
        );
        assert_eq!(result.unwrap(), Value::from("img-hz"));
    }

    #[test]
    fn test_find_in_map_resolves_found_value() {
        let result = evaluate_in(
            mappings(),
            &[("DefaultZone", json!("cn-hangzhou-h"))],
            json!({"Fn::FindInMap": ["RegionMap", "cn-hangzhou", "Zone"]}),
        );
        assert_eq!(result.unwrap(), Value::from("cn-hangzhou-h"));
    }

    #[test]
    fn test_find_in_map_stringifies_keys() {
        let result = evaluate_in(
            mappings(),
            &[],
            json!({"Fn::FindInMap": ["Numbered", 1, "a"]}),
        );
        assert_eq!(result.unwrap(), Value::from("one"));
    }

    #[test]
    fn test_find_in_map_missing_entry_is_unresolved() {
        for expression in [
            json!({"Fn::FindInMap": ["RegionMap", "us-west-1", "Image"]}),
            json!({"Fn::FindInMap": ["Missing", "cn-hangzhou", "Image"]}),
            json!({"Fn::FindInMap": ["RegionMap", {"Ref": "ALIYUN::Region"}, "Image"]}),
        ] {
            let result = evaluate_in(mappings(), &[], expression.clone());
            assert_eq!(result.unwrap(), Value::from(expression));
        }
    }

    #[test]
    fn test_find_in_map_arity() {
        let err = evaluate_in(mappings(), &[], json!({"Fn::FindInMap": ["RegionMap", "cn-beijing"]}))
            .unwrap_err();
        assert!(matches!(err, ResolverError::InvalidArguments { .. }));
    }

    #[test]
    fn test_get_json_value() {
        let result = evaluate(json!({"Fn::GetJsonValue": ["a", "{\"a\": {\"b\": [1, 2]}}"]}));
        assert_eq!(result.unwrap(), Value::from(json!({"b": [1, 2]})));
    }

    #[test]
    fn test_get_json_value_missing_key_is_unresolved() {
        let expression = json!({"Fn::GetJsonValue": ["z", "{\"a\": 1}"]});
        assert_eq!(evaluate(expression.clone()).unwrap(), Value::from(expression));
    }

    #[test]
    fn test_get_json_value_errors() {
        let err = evaluate(json!({"Fn::GetJsonValue": ["a", "{not json"]})).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidJson { .. }));

        let err = evaluate(json!({"Fn::GetJsonValue": ["a", "[1, 2]"]})).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidArgumentType { .. }));
    }

    #[test]
    fn test_merge_map_to_list() {
        let result = evaluate(json!({
            "Fn::MergeMapToList": [
                [{"a": 1}, {"a": 2}],
                [{"b": 3}, {"b": 4}]
            ]
        }));
        assert_eq!(
            result.unwrap(),
            Value::from(json!([{"a": 1, "b": 3}, {"a": 2, "b": 4}]))
        );
    }

    #[test]
    fn test_merge_map_to_list_later_keys_win() {
        let result = evaluate(json!({"Fn::MergeMapToList": [[{"a": 1}], [{"a": 9}]]}));
        assert_eq!(result.unwrap(), Value::from(json!([{"a": 9}])));

        let result = evaluate(json!({"Fn::MergeMapToList": []}));
        assert_eq!(result.unwrap(), Value::from(json!([])));
    }

    #[test]
    fn test_merge_map_to_list_errors() {
        let err = evaluate(json!({"Fn::MergeMapToList": [[{"a": 1}], []]})).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidArguments { .. }));

        let err = evaluate(json!({"Fn::MergeMapToList": [[1]]})).unwrap_err();
        assert!(matches!(err, ResolverError::InvalidArgumentType { .. }));
    }

    #[test]
    fn test_merge_map_to_list_unresolved_item() {
        let expression = json!({"Fn::MergeMapToList": [[{"a": 1}], [{"Ref": "Extra"}]]});
        assert_eq!(evaluate(expression.clone()).unwrap(), Value::from(expression));
    }
}
