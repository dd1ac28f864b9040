//! Filter expressions for backend queries.
//!
//! A `FilterExpression` is rendered to the backend's JSON filter syntax
//! (`{"name": {"_contains": "lamp"}}`, `{"_and": [...]}`) and can also be
//! evaluated against a raw JSON record.

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// A comparison applied to the value at a field path.
#[derive(Debug, Clone, PartialEq)]
pub enum Condition {
    /// Field equals the value.
    Eq(Value),
    /// Field equals any of the values.
    In(Vec<Value>),
    /// Field contains the substring. Case handling is left to the backend.
    Contains(String),
}

impl Condition {
    /// Backend operator name.
    pub fn operator(&self) -> &'static str {
        match self {
            Condition::Eq(_) => "_eq",
            Condition::In(_) => "_in",
            Condition::Contains(_) => "_contains",
        }
    }

    fn operand(&self) -> Value {
        match self {
            Condition::Eq(value) => value.clone(),
            Condition::In(values) => Value::Array(values.clone()),
            Condition::Contains(needle) => Value::String(needle.clone()),
        }
    }

    fn test(&self, value: &Value) -> bool {
        match self {
            Condition::Eq(expected) => loosely_equal(value, expected),
            Condition::In(values) => values.iter().any(|expected| loosely_equal(value, expected)),
            Condition::Contains(needle) => value
                .as_str()
                .is_some_and(|text| text.contains(needle.as_str())),
        }
    }
}

/// A filter predicate over backend records.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum FilterExpression {
    /// No constraint; matches every record.
    #[default]
    All,
    /// Every part must match.
    And(Vec<FilterExpression>),
    /// At least one part must match.
    Or(Vec<FilterExpression>),
    /// A condition on the value at a (possibly nested) field path.
    Field {
        path: Vec<String>,
        condition: Condition,
    },
}

impl FilterExpression {
    /// The empty filter.
    pub fn all() -> Self {
        FilterExpression::All
    }

    /// Create a field condition. Nested association paths are dot-separated,
    /// e.g. `categories.categories_id`.
    pub fn field(path: &str, condition: Condition) -> Self {
        FilterExpression::Field {
            path: path
                .split('.')
                .filter(|segment| !segment.is_empty())
                .map(str::to_string)
                .collect(),
            condition,
        }
    }

    /// Create an equality condition.
    pub fn eq(path: &str, value: impl Into<Value>) -> Self {
        Self::field(path, Condition::Eq(value.into()))
    }

    /// Create a set-membership condition.
    pub fn is_in<V: Into<Value>>(path: &str, values: impl IntoIterator<Item = V>) -> Self {
        Self::field(path, Condition::In(values.into_iter().map(Into::into).collect()))
    }

    /// Create a substring condition.
    pub fn contains(path: &str, needle: impl Into<String>) -> Self {
        Self::field(path, Condition::Contains(needle.into()))
    }

    /// Conjunction of the parts. Empty parts are dropped; a single remaining
    /// part is returned as-is.
    pub fn and(parts: impl IntoIterator<Item = FilterExpression>) -> Self {
        let mut parts: Vec<_> = parts.into_iter().filter(|p| !p.is_all()).collect();
        match parts.len() {
            0 => FilterExpression::All,
            1 => parts.remove(0),
            _ => FilterExpression::And(parts),
        }
    }

    /// Disjunction of the parts. If any part is empty, or there are no
    /// parts at all, the result imposes no constraint.
    pub fn or(parts: impl IntoIterator<Item = FilterExpression>) -> Self {
        let mut parts: Vec<_> = parts.into_iter().collect();
        if parts.is_empty() || parts.iter().any(FilterExpression::is_all) {
            return FilterExpression::All;
        }
        if parts.len() == 1 {
            return parts.remove(0);
        }
        FilterExpression::Or(parts)
    }

    /// Check if this filter imposes no constraint.
    pub fn is_all(&self) -> bool {
        matches!(self, FilterExpression::All)
    }

    /// Render to the backend's JSON filter syntax.
    pub fn to_value(&self) -> Value {
        match self {
            FilterExpression::All => Value::Object(Map::new()),
            FilterExpression::And(parts) => single_key(
                "_and",
                Value::Array(parts.iter().map(Self::to_value).collect()),
            ),
            FilterExpression::Or(parts) => single_key(
                "_or",
                Value::Array(parts.iter().map(Self::to_value).collect()),
            ),
            FilterExpression::Field { path, condition } => path.iter().rev().fold(
                single_key(condition.operator(), condition.operand()),
                |inner, key| single_key(key, inner),
            ),
        }
    }

    /// Evaluate against a raw record.
    ///
    /// Arrays along a path match if any element matches, so one-to-many and
    /// many-to-many associations behave like the backend's implicit `_some`.
    /// A path that ends on an expanded relation compares its `id`.
    pub fn matches(&self, record: &Value) -> bool {
        match self {
            FilterExpression::All => true,
            FilterExpression::And(parts) => parts.iter().all(|p| p.matches(record)),
            FilterExpression::Or(parts) => parts.iter().any(|p| p.matches(record)),
            FilterExpression::Field { path, condition } => field_matches(record, path, condition),
        }
    }
}

impl Serialize for FilterExpression {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.to_value().serialize(serializer)
    }
}

fn single_key(key: &str, value: Value) -> Value {
    let mut map = Map::new();
    map.insert(key.to_string(), value);
    Value::Object(map)
}

fn field_matches(value: &Value, path: &[String], condition: &Condition) -> bool {
    if let Value::Array(items) = value {
        return items.iter().any(|item| field_matches(item, path, condition));
    }
    match path.split_first() {
        Some((head, rest)) => value
            .get(head)
            .is_some_and(|child| field_matches(child, rest, condition)),
        None => match value {
            Value::Object(relation) => relation
                .get("id")
                .is_some_and(|id| condition.test(id)),
            _ => condition.test(value),
        },
    }
}

/// Ids travel as numbers or strings depending on the collection.
fn loosely_equal(a: &Value, b: &Value) -> bool {
    if a == b {
        return true;
    }
    match (scalar_text(a), scalar_text(b)) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}
