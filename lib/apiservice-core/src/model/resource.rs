use http::HeaderMap;
use serde_json::Value;

use super::Pagination;

/// Metadata of a decoded resource.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Meta {
    headers: HeaderMap,
}

impl Meta {
    /// Wraps the response headers.
    pub fn new(headers: HeaderMap) -> Self {
        Self { headers }
    }

    /// All the response headers.
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A response header as a string, `None` when absent or not visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }
}

/// A successfully decoded response body.
#[derive(Debug, Clone, PartialEq, derive_more::From)]
pub enum Resource {
    /// A single object.
    Item(Item),
    /// A sequence of objects, optionally paginated.
    Collection(Collection),
}

impl Resource {
    /// Response metadata.
    pub fn meta(&self) -> &Meta {
        match self {
            Self::Item(item) => &item.meta,
            Self::Collection(collection) => &collection.meta,
        }
    }

    /// The decoded data, as an array for collections.
    pub fn data(&self) -> Value {
        match self {
            Self::Item(item) => item.data.clone(),
            Self::Collection(collection) => Value::Array(collection.data.clone()),
        }
    }

    /// The item, if this is one.
    pub fn as_item(&self) -> Option<&Item> {
        match self {
            Self::Item(item) => Some(item),
            Self::Collection(_) => None,
        }
    }

    /// The collection, if this is one.
    pub fn as_collection(&self) -> Option<&Collection> {
        match self {
            Self::Collection(collection) => Some(collection),
            Self::Item(_) => None,
        }
    }
}

/// A single object.
#[derive(Debug, Clone, PartialEq)]
pub struct Item {
    data: Value,
    meta: Meta,
}

impl Item {
    /// Creates an item.
    pub fn new(data: Value, meta: Meta) -> Self {
        Self { data, meta }
    }

    /// The decoded payload.
    pub fn data(&self) -> &Value {
        &self.data
    }

    /// Response metadata.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// Consumes the item, returning its payload.
    pub fn into_data(self) -> Value {
        self.data
    }
}

/// An ordered sequence of objects.
///
/// A collection built from an object keeps its values, `null` gives an empty
/// collection and any other value a single-element one.
#[derive(Debug, Clone, PartialEq)]
pub struct Collection {
    data: Vec<Value>,
    meta: Meta,
    pagination: Option<Pagination>,
}

impl Collection {
    /// Creates a collection from a payload.
    pub fn new(data: Value, meta: Meta) -> Self {
        let data = match data {
            Value::Array(items) => items,
            Value::Object(map) => map.into_iter().map(|(_, value)| value).collect(),
            Value::Null => vec![],
            other => vec![other],
        };
        Self {
            data,
            meta,
            pagination: None,
        }
    }

    /// Sets the pagination.
    pub fn with_pagination(mut self, pagination: Pagination) -> Self {
        self.pagination = Some(pagination);
        self
    }

    /// The items.
    pub fn data(&self) -> &[Value] {
        &self.data
    }

    /// Response metadata.
    pub fn meta(&self) -> &Meta {
        &self.meta
    }

    /// The pagination, if the response had one.
    pub fn pagination(&self) -> Option<&Pagination> {
        self.pagination.as_ref()
    }

    /// Whether the response had a pagination.
    pub fn has_pagination(&self) -> bool {
        self.pagination.is_some()
    }

    /// Iterates over the items.
    pub fn iter(&self) -> std::slice::Iter<'_, Value> {
        self.data.iter()
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    /// Whether there is no item.
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

impl IntoIterator for Collection {
    type Item = Value;
    type IntoIter = std::vec::IntoIter<Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.into_iter()
    }
}

impl<'a> IntoIterator for &'a Collection {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.data.iter()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_collection_from_values() {
        let meta = Meta::default();

        assert_eq!(Collection::new(json!([1, 2]), meta.clone()).len(), 2);
        assert_eq!(Collection::new(json!({"a": 1, "b": 2}), meta.clone()).data(), [json!(1), json!(2)]);
        assert!(Collection::new(Value::Null, meta.clone()).is_empty());
        assert_eq!(Collection::new(json!("one"), meta).data(), [json!("one")]);
    }

    #[test]
    fn test_collection_without_pagination() {
        let collection = Collection::new(json!([{"id": 1}]), Meta::default());

        assert!(!collection.has_pagination());
        assert_eq!(collection.iter().count(), 1);
    }

    #[test]
    fn test_resource_meta_exposes_headers() {
        let mut headers = HeaderMap::new();
        headers.insert("x-request-id", "abc".parse().expect("valid header"));
        let resource = Resource::from(Item::new(json!({"id": 1}), Meta::new(headers)));

        assert_eq!(resource.meta().header("x-request-id"), Some("abc"));
        assert!(resource.as_collection().is_none());
        assert_eq!(resource.data(), json!({"id": 1}));
    }
}
