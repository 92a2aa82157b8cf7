//! Canonical value tree
//!
//! [`Node`] is the shape every decoded segment is normalized into before
//! serialization: scalars, lists, and ordered maps. Maps are kept as
//! ordered `(key, value)` pairs so output is stable across runs, which is
//! what keeps the mirrored tree diff-friendly.

use serde::ser::{SerializeMap, SerializeSeq};
use serde::{Serialize, Serializer};

use seersync_amf::Value;

/// Reserved key carrying the decoded object's class name
pub const CLASS_KEY: &str = "__class__";

/// A normalized tree value
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    List(Vec<Node>),
    Map(Map),
}

/// Ordered string-keyed map.
///
/// Backed by a pair vector: iteration order is insertion order, inserting
/// an existing key replaces its value in place (last write wins).
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Map {
    entries: Vec<(String, Node)>,
}

impl Map {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.iter().any(|(k, _)| k == key)
    }

    pub fn get(&self, key: &str) -> Option<&Node> {
        self.entries.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    pub fn get_mut(&mut self, key: &str) -> Option<&mut Node> {
        self.entries
            .iter_mut()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Insert a value, replacing in place if the key already exists
    pub fn insert(&mut self, key: impl Into<String>, value: Node) {
        let key = key.into();
        match self.get_mut(&key) {
            Some(slot) => *slot = value,
            None => self.entries.push((key, value)),
        }
    }

    /// Remove a key, returning its value
    pub fn remove(&mut self, key: &str) -> Option<Node> {
        let index = self.entries.iter().position(|(k, _)| k == key)?;
        Some(self.entries.remove(index).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Node)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }
}

impl IntoIterator for Map {
    type Item = (String, Node);
    type IntoIter = std::vec::IntoIter<(String, Node)>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

impl FromIterator<(String, Node)> for Map {
    fn from_iter<I: IntoIterator<Item = (String, Node)>>(iter: I) -> Self {
        let mut map = Map::new();
        for (key, value) in iter {
            map.insert(key, value);
        }
        map
    }
}

impl Node {
    /// Convert a decoded object-stream value into the canonical tree shape.
    ///
    /// Typed objects become maps carrying their class name under
    /// [`CLASS_KEY`]; dense arrays become lists; arrays with associative
    /// entries become maps with the dense part under numeric keys; dates
    /// collapse to their epoch-millisecond float.
    pub fn from_amf(value: &Value) -> Node {
        match value {
            Value::Null => Node::Null,
            Value::Bool(b) => Node::Bool(*b),
            Value::Integer(i) => Node::Int(i64::from(*i)),
            Value::Double(d) => Node::Float(*d),
            Value::String(s) => Node::Text(s.clone()),
            Value::Date(millis) => Node::Float(*millis),
            Value::Array { assoc, dense } => {
                if assoc.is_empty() {
                    Node::List(dense.iter().map(Node::from_amf).collect())
                } else {
                    let mut map = Map::new();
                    for (key, value) in assoc {
                        map.insert(key.clone(), Node::from_amf(value));
                    }
                    for (index, value) in dense.iter().enumerate() {
                        map.insert(index.to_string(), Node::from_amf(value));
                    }
                    Node::Map(map)
                }
            }
            Value::Object { class_name, fields } => {
                let mut map = Map::new();
                if !class_name.is_empty() {
                    map.insert(CLASS_KEY, Node::Text(class_name.clone()));
                }
                for (name, value) in fields {
                    map.insert(name.clone(), Node::from_amf(value));
                }
                Node::Map(map)
            }
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Node::Null => serializer.serialize_unit(),
            Node::Bool(b) => serializer.serialize_bool(*b),
            Node::Int(i) => serializer.serialize_i64(*i),
            Node::Float(f) => serializer.serialize_f64(*f),
            Node::Text(s) => serializer.serialize_str(s),
            Node::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Node::Map(map) => map.serialize(serializer),
        }
    }
}

impl Serialize for Map {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut out = serializer.serialize_map(Some(self.len()))?;
        for (key, value) in self.iter() {
            out.serialize_entry(key, value)?;
        }
        out.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_map_preserves_insertion_order() {
        let mut map = Map::new();
        map.insert("z", Node::Int(1));
        map.insert("a", Node::Int(2));
        map.insert("m", Node::Int(3));

        let keys: Vec<_> = map.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, ["z", "a", "m"]);
    }

    #[test]
    fn test_map_insert_replaces_in_place() {
        let mut map = Map::new();
        map.insert("a", Node::Int(1));
        map.insert("b", Node::Int(2));
        map.insert("a", Node::Int(9));

        assert_eq!(map.len(), 2);
        assert_eq!(map.get("a"), Some(&Node::Int(9)));
        let keys: Vec<_> = map.iter().map(|(k, _)| k.to_string()).collect();
        assert_eq!(keys, ["a", "b"]);
    }

    #[test]
    fn test_from_amf_object_carries_class_key() {
        let value = Value::Object {
            class_name: "Cat".to_string(),
            fields: vec![("ID".to_string(), Value::Integer(1))],
        };

        let Node::Map(map) = Node::from_amf(&value) else {
            panic!("expected map");
        };
        assert_eq!(map.get(CLASS_KEY), Some(&Node::Text("Cat".to_string())));
        assert_eq!(map.get("ID"), Some(&Node::Int(1)));
    }

    #[test]
    fn test_from_amf_anonymous_object_has_no_class_key() {
        let value = Value::Object {
            class_name: String::new(),
            fields: vec![("x".to_string(), Value::Integer(1))],
        };

        let Node::Map(map) = Node::from_amf(&value) else {
            panic!("expected map");
        };
        assert!(!map.contains_key(CLASS_KEY));
    }

    #[test]
    fn test_from_amf_dense_array_becomes_list() {
        let value = Value::Array {
            assoc: vec![],
            dense: vec![Value::Integer(1), Value::String("s".to_string())],
        };

        assert_eq!(
            Node::from_amf(&value),
            Node::List(vec![Node::Int(1), Node::Text("s".to_string())])
        );
    }

    #[test]
    fn test_from_amf_mixed_array_becomes_map() {
        let value = Value::Array {
            assoc: vec![("k".to_string(), Value::Bool(true))],
            dense: vec![Value::Integer(5)],
        };

        let Node::Map(map) = Node::from_amf(&value) else {
            panic!("expected map");
        };
        assert_eq!(map.get("k"), Some(&Node::Bool(true)));
        assert_eq!(map.get("0"), Some(&Node::Int(5)));
    }

    #[test]
    fn test_serialize_to_json_keeps_order() {
        let mut map = Map::new();
        map.insert("b", Node::Int(1));
        map.insert("a", Node::List(vec![Node::Null, Node::Bool(true)]));

        let json = serde_json::to_string(&Node::Map(map)).unwrap();
        assert_eq!(json, r#"{"b":1,"a":[null,true]}"#);
    }
}
