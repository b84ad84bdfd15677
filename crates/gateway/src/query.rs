use std::cmp::Ordering;

use serde_json::Value;

/// A single field predicate.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Field equals the value.
    Eq(String, Value),
    /// Field is greater than or equal to the value (same type only).
    Gte(String, Value),
    /// Field is less than or equal to the value (same type only).
    Lte(String, Value),
    /// Field is an array containing at least one of the values.
    ArrayContainsAny(String, Vec<Value>),
}

/// Sort key of a query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrderField {
    DocumentId,
    Field(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Direction {
    #[default]
    Ascending,
    Descending,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderBy {
    pub field: OrderField,
    pub direction: Direction,
}

/// Builder for collection queries.
///
/// Mirrors the subset of hosted document-store queries the storefront
/// relies on: conjunctive filters, a single sort key, a document cursor and
/// a result limit.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DocumentQuery {
    /// All filters must match.
    pub filters: Vec<Filter>,

    /// Sort key. Documents lacking a sort field are excluded.
    pub order_by: Option<OrderBy>,

    /// Resume after the document with this id.
    pub start_after: Option<String>,

    /// Maximum number of documents to return.
    pub limit: Option<usize>,
}

impl DocumentQuery {
    /// Creates a query matching every document.
    pub fn new() -> Self {
        Self::default()
    }

    pub fn where_eq(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Eq(field.into(), value.into()));
        self
    }

    pub fn where_gte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Gte(field.into(), value.into()));
        self
    }

    pub fn where_lte(mut self, field: impl Into<String>, value: impl Into<Value>) -> Self {
        self.filters.push(Filter::Lte(field.into(), value.into()));
        self
    }

    pub fn where_array_contains_any(mut self, field: impl Into<String>, values: Vec<Value>) -> Self {
        self.filters
            .push(Filter::ArrayContainsAny(field.into(), values));
        self
    }

    pub fn order_by_id(mut self) -> Self {
        self.order_by = Some(OrderBy {
            field: OrderField::DocumentId,
            direction: Direction::Ascending,
        });
        self
    }

    pub fn order_by(mut self, field: impl Into<String>, direction: Direction) -> Self {
        self.order_by = Some(OrderBy {
            field: OrderField::Field(field.into()),
            direction,
        });
        self
    }

    pub fn start_after(mut self, id: impl Into<String>) -> Self {
        self.start_after = Some(id.into());
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Returns true if the document data satisfies every filter.
    pub fn matches(&self, data: &Value) -> bool {
        self.filters.iter().all(|filter| match filter {
            Filter::Eq(field, expected) => lookup(data, field) == Some(expected),
            Filter::Gte(field, bound) => lookup(data, field)
                .and_then(|v| compare_same_type(v, bound))
                .is_some_and(Ordering::is_ge),
            Filter::Lte(field, bound) => lookup(data, field)
                .and_then(|v| compare_same_type(v, bound))
                .is_some_and(Ordering::is_le),
            Filter::ArrayContainsAny(field, candidates) => lookup(data, field)
                .and_then(Value::as_array)
                .is_some_and(|items| items.iter().any(|item| candidates.contains(item))),
        })
    }
}

/// Resolves a dotted field path inside a document.
pub fn lookup<'a>(data: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(data, |value, key| value.get(key))
}

/// Compares two values of the same JSON type. Mixed types do not compare.
pub fn compare_same_type(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => x.as_f64()?.partial_cmp(&y.as_f64()?),
        (Value::String(x), Value::String(y)) => Some(x.cmp(y)),
        (Value::Bool(x), Value::Bool(y)) => Some(x.cmp(y)),
        (Value::Null, Value::Null) => Some(Ordering::Equal),
        _ => None,
    }
}

/// Total order used for sorting: null < bool < number < string < other.
pub fn sort_order(a: &Value, b: &Value) -> Ordering {
    fn rank(v: &Value) -> u8 {
        match v {
            Value::Null => 0,
            Value::Bool(_) => 1,
            Value::Number(_) => 2,
            Value::String(_) => 3,
            Value::Array(_) | Value::Object(_) => 4,
        }
    }
    rank(a)
        .cmp(&rank(b))
        .then_with(|| compare_same_type(a, b).unwrap_or(Ordering::Equal))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_prefix_range_filters() {
        let query = DocumentQuery::new()
            .where_gte("name_lower", "red")
            .where_lte("name_lower", "red\u{f8ff}");

        assert!(query.matches(&json!({ "name_lower": "red shirt" })));
        assert!(query.matches(&json!({ "name_lower": "red" })));
        assert!(!query.matches(&json!({ "name_lower": "blue shirt" })));
        assert!(!query.matches(&json!({ "name_lower": 3 })));
        assert!(!query.matches(&json!({})));
    }

    #[test]
    fn test_array_contains_any() {
        let query = DocumentQuery::new()
            .where_array_contains_any("keywords", vec![json!("red"), json!("shirt")]);

        assert!(query.matches(&json!({ "keywords": ["shirt", "cotton"] })));
        assert!(!query.matches(&json!({ "keywords": ["hat"] })));
        assert!(!query.matches(&json!({ "keywords": "shirt" })));
    }

    #[test]
    fn test_eq_on_nested_field() {
        let query = DocumentQuery::new().where_eq("shipping.isInternational", true);
        assert!(query.matches(&json!({ "shipping": { "isInternational": true } })));
        assert!(!query.matches(&json!({ "shipping": {} })));
    }

    #[test]
    fn test_sort_order_ranks_types() {
        assert_eq!(sort_order(&json!(null), &json!(1)), Ordering::Less);
        assert_eq!(sort_order(&json!(2), &json!(10)), Ordering::Less);
        assert_eq!(sort_order(&json!("b"), &json!("a")), Ordering::Greater);
        assert_eq!(sort_order(&json!("a"), &json!(5)), Ordering::Greater);
    }
}
