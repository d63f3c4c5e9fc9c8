use serde::ser::Error as _;
use serde::Serialize;
use std::collections::BTreeMap;

/// One level of a resolved document. Keys iterate in sorted order.
pub type Mapping = BTreeMap<String, Value>;

/// A resolved value. Integers and floats stay distinct all the way to the serializer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Value {
    Integer(i64),
    Float(f64),
    String(String),
    Map(Mapping),
}

impl Value {
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_map(&self) -> Option<&Mapping> {
        match self {
            Value::Map(map) => Some(map),
            _ => None,
        }
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Integer(n)
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
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

impl From<Mapping> for Value {
    fn from(map: Mapping) -> Self {
        Value::Map(map)
    }
}

/// The output of a whole program: the merged fields of every top-level structure.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct Document {
    root: Mapping,
}

impl Document {
    pub fn new(root: Mapping) -> Self {
        Self { root }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.root.get(key)
    }

    pub fn len(&self) -> usize {
        self.root.len()
    }

    pub fn is_empty(&self) -> bool {
        self.root.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.root.iter()
    }

    pub fn as_map(&self) -> &Mapping {
        &self.root
    }

    pub fn into_map(self) -> Mapping {
        self.root
    }

    /// Dotted path of the first float that is infinite or NaN, if any.
    pub fn find_non_finite(&self) -> Option<String> {
        find_non_finite(&self.root)
    }

    /// Serializes the document into a pretty-printed JSON string.
    ///
    /// # Errors
    /// Returns a `serde_json::Error` if serialization fails, or if a float is
    /// infinite or NaN, which JSON cannot represent.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        if let Some(path) = self.find_non_finite() {
            return Err(serde_json::Error::custom(format!(
                "`{path}` is not a finite number and cannot be written as JSON"
            )));
        }
        serde_json::to_string_pretty(self)
    }

    /// Serializes the document into a YAML string.
    ///
    /// # Errors
    /// Returns a `serde_yaml::Error` if serialization fails.
    pub fn to_yaml(&self) -> Result<String, serde_yaml::Error> {
        serde_yaml::to_string(self)
    }
}

impl From<Mapping> for Document {
    fn from(root: Mapping) -> Self {
        Self::new(root)
    }
}

fn find_non_finite(map: &Mapping) -> Option<String> {
    map.iter().find_map(|(key, value)| match value {
        Value::Float(n) if !n.is_finite() => Some(key.clone()),
        Value::Map(inner) => find_non_finite(inner).map(|path| format!("{key}.{path}")),
        _ => None,
    })
}
