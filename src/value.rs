//! Model values the renderer resolves property paths against.
//!
//! A model is a graph of [`Value`]s. Maps are addressed by key; anything
//! else that wants to expose fields implements [`Object`]. Compound values
//! are reference counted, so binding a value into a scope shares it with
//! the model instead of copying it.

use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

/// Named-field access for host types that are not plain maps.
///
/// `get_field` returns `None` for unknown or unavailable fields; the
/// renderer treats that as an absent value, never as an error.
pub trait Object: fmt::Debug + Send + Sync {
    fn get_field(&self, name: &str) -> Option<Value>;

    /// Text this object renders as. Defaults to `"true"` so a present object
    /// counts as truthy in an `if` condition.
    fn display(&self) -> String {
        "true".to_string()
    }
}

#[derive(Debug, Clone, Default)]
pub enum Value {
    #[default]
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    String(String),
    List(Arc<[Value]>),
    Map(Arc<BTreeMap<String, Value>>),
    Object(Arc<dyn Object>),
}

impl Value {
    pub fn object(obj: impl Object + 'static) -> Self {
        Value::Object(Arc::new(obj))
    }

    pub fn map<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<Value>,
    {
        Value::Map(Arc::new(
            entries
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        ))
    }

    /// Adapt any serializable struct into a map-shaped value.
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Value::from)
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Access one named field. `None` if this value has no such field or
    /// does not support field access at all.
    pub fn get_field(&self, name: &str) -> Option<Value> {
        match self {
            Value::Map(map) => map.get(name).cloned(),
            Value::Object(obj) => obj.get_field(name),
            _ => None,
        }
    }

    /// Elements to iterate in a `foreach`, if this value is a sequence.
    pub fn as_list(&self) -> Option<&[Value]> {
        match self {
            Value::List(items) => Some(&items[..]),
            _ => None,
        }
    }

    /// The text written to the output for this value.
    ///
    /// - Null: ""
    /// - Bool: "true" or "false"
    /// - Float: always with a fractional part (`1.0`, not `1`)
    /// - List: `[a, b]`, so even an empty list is truthy
    /// - Map: `{k=v, ...}` in key order
    /// - Object: [`Object::display`]
    pub fn render(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(n) => n.to_string(),
            Value::Float(n) => format!("{n:?}"),
            Value::String(s) => s.clone(),
            Value::List(items) => {
                let items: Vec<String> = items.iter().map(Value::render_nested).collect();
                format!("[{}]", items.join(", "))
            }
            Value::Map(map) => {
                let entries: Vec<String> = map
                    .iter()
                    .map(|(k, v)| format!("{k}={}", v.render_nested()))
                    .collect();
                format!("{{{}}}", entries.join(", "))
            }
            Value::Object(obj) => obj.display(),
        }
    }

    // Inside a list or map a null element is still visible.
    fn render_nested(&self) -> String {
        match self {
            Value::Null => "null".to_string(),
            other => other.render(),
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render())
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Null, Value::Null) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::List(a), Value::List(b)) => a == b,
            (Value::Map(a), Value::Map(b)) => a == b,
            (Value::Object(a), Value::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n.into())
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(n.into())
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::List(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(opt: Option<T>) -> Self {
        opt.map(Into::into).unwrap_or(Value::Null)
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map(Value::Float).unwrap_or(Value::Null),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(Arc::new(
                map.into_iter().map(|(k, v)| (k, Value::from(v))).collect(),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[derive(Debug)]
    struct Employee;

    impl Object for Employee {
        fn get_field(&self, name: &str) -> Option<Value> {
            match name {
                "name" => Some("Ada".into()),
                _ => None,
            }
        }
    }

    #[test]
    fn render_forms() {
        assert_eq!(Value::Null.render(), "");
        assert_eq!(Value::Bool(false).render(), "false");
        assert_eq!(Value::Int(42).render(), "42");
        assert_eq!(Value::Float(1.5).render(), "1.5");
        assert_eq!(Value::from(vec!["a", "b"]).render(), "[a, b]");
        assert_eq!(Value::from(Vec::<Value>::new()).render(), "[]");
        assert_eq!(Value::map([("k", "v")]).render(), "{k=v}");
        assert_eq!(Value::object(Employee).render(), "true");
    }

    #[test]
    fn whole_floats_keep_their_fraction() {
        assert_eq!(Value::Float(1.0).render(), "1.0");
        assert_eq!(Value::Float(-3.0).render(), "-3.0");
        assert_eq!(Value::Float(0.25).render(), "0.25");
    }

    #[test]
    fn nested_collections() {
        let value = Value::map([
            ("b", Value::from(vec![Value::Int(1), Value::Null])),
            ("a", Value::map([("x", true)])),
        ]);
        assert_eq!(value.render(), "{a={x=true}, b=[1, null]}");
    }

    #[test]
    fn field_access() {
        let map = Value::map([("name", "Grace")]);
        assert_eq!(map.get_field("name"), Some("Grace".into()));
        assert_eq!(map.get_field("age"), None);

        let obj = Value::object(Employee);
        assert_eq!(obj.get_field("name"), Some("Ada".into()));
        assert_eq!(obj.get_field("salary"), None);

        assert_eq!(Value::from("text").get_field("len"), None);
        assert_eq!(Value::Null.get_field("x"), None);
    }

    #[test]
    fn from_json() {
        let value = Value::from(json!({
            "title": "List",
            "count": 3,
            "ratio": 0.5,
            "items": ["a", null],
        }));
        assert_eq!(value.get_field("title"), Some("List".into()));
        assert_eq!(value.get_field("count"), Some(Value::Int(3)));
        assert_eq!(value.get_field("ratio"), Some(Value::Float(0.5)));
        assert_eq!(
            value.get_field("items"),
            Some(Value::from(vec![Value::from("a"), Value::Null]))
        );
    }

    #[test]
    fn from_serialize_struct() {
        #[derive(Serialize)]
        struct Profile {
            name: String,
            tags: Vec<String>,
        }

        let value = Value::from_serialize(&Profile {
            name: "Linus".into(),
            tags: vec!["kernel".into()],
        })
        .unwrap();
        assert_eq!(value.get_field("name"), Some("Linus".into()));
        assert_eq!(value.get_field("tags").unwrap().render(), "[kernel]");
    }

    #[test]
    fn objects_compare_by_identity() {
        let a = Value::object(Employee);
        assert_eq!(a, a.clone());
        assert_ne!(a, Value::object(Employee));
    }
}
