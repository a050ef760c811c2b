use serde_json::{Map, Value};

use super::DataTransformer;

const LINKS: &str = "_links";
const EMBEDDED: &str = "_embedded";

/// Flattens HAL documents (`application/hal+json`).
///
/// Collection items are read from `_embedded.item`. Each item loses its
/// `_links`, and its embedded relations are inlined under their relation name.
/// Nested resources are flattened the same way at every depth. A document
/// without `_embedded.item` is flattened as a single resource.
#[derive(Debug, Clone, Copy, Default)]
pub struct HalDataTransformer;

impl DataTransformer for HalDataTransformer {
    fn supports(&self, content_type: &str) -> bool {
        content_type.contains("hal")
    }

    fn transform(&self, data: Value) -> Value {
        let Value::Object(mut document) = data else {
            return data;
        };

        let items = document
            .get_mut(EMBEDDED)
            .and_then(|embedded| embedded.get_mut("item"))
            .map(Value::take);
        match items {
            Some(Value::Array(items)) => items.into_iter().map(flatten_resource).collect(),
            Some(item @ Value::Object(_)) => Value::Array(vec![flatten_resource(item)]),
            Some(_) => Value::Array(vec![]),
            None => flatten_resource(Value::Object(document)),
        }
    }
}

/// Relations first, then the resource own fields.
fn flatten_resource(resource: Value) -> Value {
    let Value::Object(mut fields) = resource else {
        return resource;
    };

    let mut result = match fields.shift_remove(EMBEDDED) {
        Some(Value::Object(relations)) => remove_embedded(relations),
        _ => Map::new(),
    };
    fields.shift_remove(LINKS);
    result.extend(fields);

    Value::Object(result)
}

fn remove_embedded(mut relations: Map<String, Value>) -> Map<String, Value> {
    relations.shift_remove(LINKS);
    for relation in relations.values_mut() {
        *relation = flatten_relation(relation.take());
    }
    relations
}

/// An embedded resource absorbs its own `_embedded` relations (they win on conflicts).
fn flatten_relation(relation: Value) -> Value {
    match relation {
        Value::Object(mut fields) => {
            if let Some(Value::Object(embedded)) = fields.shift_remove(EMBEDDED) {
                fields.extend(embedded);
            }
            Value::Object(remove_embedded(fields))
        }
        Value::Array(values) => values.into_iter().map(flatten_relation).collect(),
        other => other,
    }
}
