use indexmap::IndexMap;
use serde_json::Value;
use url::form_urlencoded::Serializer;

use crate::ApiServiceError;

/// Builds a form-urlencoded query string, `None` when there is nothing to send.
///
/// `null` entries are skipped, arrays repeat their key and objects are
/// flattened with brackets: `{"order": {"date": "desc"}}` gives
/// `order[date]=desc`.
pub(crate) fn build_query(query: &IndexMap<String, Value>) -> Option<String> {
    let mut serializer = Serializer::new(String::new());
    let mut count = 0_usize;

    for (name, value) in query {
        append(&mut serializer, &mut count, name, value);
    }

    (count > 0).then(|| serializer.finish())
}

fn append(serializer: &mut Serializer<'_, String>, count: &mut usize, name: &str, value: &Value) {
    match value {
        Value::Null => {}
        Value::Array(values) => {
            for value in values {
                append(serializer, count, name, value);
            }
        }
        Value::Object(fields) => {
            for (key, value) in fields {
                append(serializer, count, &format!("{name}[{key}]"), value);
            }
        }
        Value::String(text) => {
            serializer.append_pair(name, text);
            *count += 1;
        }
        Value::Bool(_) | Value::Number(_) => {
            serializer.append_pair(name, &value.to_string());
            *count += 1;
        }
    }
}

/// Formats a header value, `None` for `null`.
///
/// Arrays are comma separated.
pub(crate) fn header_value(name: &str, value: &Value) -> Result<Option<String>, ApiServiceError> {
    let Value::Array(values) = value else {
        return scalar(value).ok_or_else(|| unsupported("header", name, value));
    };

    let mut parts = vec![];
    for value in values {
        if let Some(part) = scalar(value).ok_or_else(|| unsupported("header", name, value))? {
            parts.push(part);
        }
    }
    Ok(Some(parts.join(", ")))
}

/// `Some(None)` for `null`, `None` for values without a text form.
fn scalar(value: &Value) -> Option<Option<String>> {
    match value {
        Value::Null => Some(None),
        Value::String(text) => Some(Some(text.clone())),
        Value::Bool(_) | Value::Number(_) => Some(Some(value.to_string())),
        Value::Array(_) | Value::Object(_) => None,
    }
}

fn unsupported(location: &'static str, name: &str, value: &Value) -> ApiServiceError {
    ApiServiceError::UnsupportedParameterValue {
        location,
        name: name.to_string(),
        value: value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn query(values: Value) -> IndexMap<String, Value> {
        serde_json::from_value(values).expect("an object")
    }

    #[test]
    fn test_build_query() {
        let query = query(json!({
            "page": 2,
            "q": "hello world&more",
            "enabled": true,
            "tags": ["a", "b"],
            "missing": null
        }));

        let result = build_query(&query);

        insta::assert_snapshot!(result.unwrap_or_default(), @"page=2&q=hello+world%26more&enabled=true&tags=a&tags=b");
    }

    #[test]
    fn test_empty_query() {
        let result = build_query(&query(json!({"missing": null})));

        assert_eq!(result, None);
    }

    #[test]
    fn test_objects_are_flattened_with_brackets() {
        let query = query(json!({
            "order": {"date": "desc", "name": "asc"},
            "filter": {"owner": {"id": 7}, "tags": ["a", "b"], "deleted": null}
        }));

        let result = build_query(&query);

        insta::assert_snapshot!(result.unwrap_or_default(), @"order%5Bdate%5D=desc&order%5Bname%5D=asc&filter%5Bowner%5D%5Bid%5D=7&filter%5Btags%5D=a&filter%5Btags%5D=b");
    }

    #[test]
    fn test_empty_object_in_query() {
        let result = build_query(&query(json!({"order": {}})));

        assert_eq!(result, None);
    }

    #[test]
    fn test_header_values() {
        assert_eq!(header_value("x-count", &json!(3)).ok().flatten(), Some("3".to_string()));
        assert_eq!(
            header_value("accept", &json!(["application/json", "text/plain"])).ok().flatten(),
            Some("application/json, text/plain".to_string())
        );
        assert_eq!(header_value("x-none", &Value::Null).ok().flatten(), None);
        assert!(header_value("x-object", &json!({})).is_err());
    }
}
