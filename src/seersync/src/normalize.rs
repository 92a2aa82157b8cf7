//! Per-record-kind normalization
//!
//! Decoded segments are reshaped by a handler looked up by the record's
//! class name. Handlers are pure tree transforms; the registry is open for
//! extension so new record kinds never touch the decoder.

use std::collections::HashMap;

use crate::node::{Map, Node, CLASS_KEY};

/// Class name of item catalog records (category/item pair lists)
pub const ITEM_CLASS: &str = "com.robot.core.config.xml.ItemXMLInfo_xmlClass";

/// Class name of gold product records
pub const GOLD_PRODUCT_CLASS: &str = "com.robot.core.config.xml.GoldProductXMLInfo_xmlClass";

/// Class name of skill records
pub const SKILL_CLASS: &str = "com.robot.core.config.xml.SkillXMLInfo_xmlClass";

/// Errors from record normalization (fatal for the segment only)
#[derive(thiserror::Error, Debug)]
pub enum Error {
    #[error("expected a record list, got a non-list value")]
    ExpectedList,

    #[error("record entry is not an object")]
    NotAnObject,

    #[error("record is missing required field {0:?}")]
    MissingField(&'static str),
}

type Handler = Box<dyn Fn(Node) -> Result<Node, Error> + Send + Sync>;

/// Class-name → transform lookup table
pub struct Registry {
    handlers: HashMap<String, Handler>,
}

impl Registry {
    /// A registry with no handlers; everything falls back to pass-through
    pub fn empty() -> Self {
        Self {
            handlers: HashMap::new(),
        }
    }

    pub fn register<F>(&mut self, class_name: impl Into<String>, handler: F)
    where
        F: Fn(Node) -> Result<Node, Error> + Send + Sync + 'static,
    {
        self.handlers.insert(class_name.into(), Box::new(handler));
    }

    /// Apply the handler registered for `class_name`, or the pass-through
    /// wrap when none is registered.
    pub fn normalize(&self, class_name: &str, node: Node) -> Result<Node, Error> {
        match self.handlers.get(class_name) {
            Some(handler) => handler(node),
            None => wrap_records(node),
        }
    }
}

impl Default for Registry {
    fn default() -> Self {
        let mut registry = Self::empty();
        registry.register(ITEM_CLASS, group_by_category);
        registry.register(GOLD_PRODUCT_CLASS, strip_class_markers);
        registry.register(SKILL_CLASS, wrap_records);
        registry
    }
}

/// Group `{catObj, itemObj}` pair records under their category.
///
/// Category identity is `catObj.ID`; each distinct category appears exactly
/// once in first-seen order, items keep encounter order and gain a `CatID`
/// back-reference.
pub fn group_by_category(input: Node) -> Result<Node, Error> {
    let Node::List(pairs) = input else {
        return Err(Error::ExpectedList);
    };

    let mut categories: Vec<(Node, Map)> = Vec::new();

    for pair in pairs {
        let Node::Map(mut pair) = pair else {
            return Err(Error::NotAnObject);
        };
        let Some(Node::Map(cat)) = pair.remove("catObj") else {
            return Err(Error::MissingField("catObj"));
        };
        let Some(Node::Map(mut item)) = pair.remove("itemObj") else {
            return Err(Error::MissingField("itemObj"));
        };
        let id = cat.get("ID").cloned().ok_or(Error::MissingField("ID"))?;

        item.insert("CatID", id.clone());

        match categories.iter_mut().find(|(seen, _)| *seen == id) {
            Some((_, group)) => {
                if let Some(Node::List(items)) = group.get_mut("item") {
                    items.push(Node::Map(item));
                }
            }
            None => {
                let mut group = cat;
                group.insert("item", Node::List(vec![Node::Map(item)]));
                categories.push((id, group));
            }
        }
    }

    let groups = categories
        .into_iter()
        .map(|(_, group)| Node::Map(group))
        .collect();

    let mut out = Map::new();
    out.insert("items", Node::List(groups));
    Ok(Node::Map(out))
}

/// Drop the internal class marker from every record, wrap under `item`
pub fn strip_class_markers(input: Node) -> Result<Node, Error> {
    let Node::List(records) = input else {
        return Err(Error::ExpectedList);
    };

    let records = records
        .into_iter()
        .map(|record| match record {
            Node::Map(mut map) => {
                map.remove(CLASS_KEY);
                Node::Map(map)
            }
            other => other,
        })
        .collect();

    let mut out = Map::new();
    out.insert("item", Node::List(records));
    Ok(Node::Map(out))
}

/// Pass-through: wrap a record list under `item`, leave anything already
/// map-shaped untouched (which makes re-application a no-op).
pub fn wrap_records(input: Node) -> Result<Node, Error> {
    match input {
        Node::List(_) => {
            let mut out = Map::new();
            out.insert("item", input);
            Ok(Node::Map(out))
        }
        other => Ok(other),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obj(entries: Vec<(&str, Node)>) -> Node {
        Node::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    fn pair(cat_id: i64, item_name: &str) -> Node {
        obj(vec![
            ("catObj", obj(vec![("ID", Node::Int(cat_id))])),
            ("itemObj", obj(vec![("name", Node::Text(item_name.to_string()))])),
        ])
    }

    #[test]
    fn test_grouping_preserves_first_seen_order() {
        let input = Node::List(vec![pair(1, "sword"), pair(1, "shield"), pair(2, "potion")]);
        let output = group_by_category(input).unwrap();

        let Node::Map(root) = output else {
            panic!("expected map");
        };
        let Some(Node::List(groups)) = root.get("items") else {
            panic!("expected items list");
        };
        assert_eq!(groups.len(), 2);

        let Node::Map(first) = &groups[0] else {
            panic!("expected map");
        };
        assert_eq!(first.get("ID"), Some(&Node::Int(1)));
        let Some(Node::List(items)) = first.get("item") else {
            panic!("expected item list");
        };
        assert_eq!(items.len(), 2);

        // Encounter order: sword before shield, both tagged with CatID 1
        let Node::Map(sword) = &items[0] else {
            panic!("expected map");
        };
        assert_eq!(sword.get("name"), Some(&Node::Text("sword".to_string())));
        assert_eq!(sword.get("CatID"), Some(&Node::Int(1)));
        let Node::Map(shield) = &items[1] else {
            panic!("expected map");
        };
        assert_eq!(shield.get("name"), Some(&Node::Text("shield".to_string())));

        let Node::Map(second) = &groups[1] else {
            panic!("expected map");
        };
        assert_eq!(second.get("ID"), Some(&Node::Int(2)));
        let Some(Node::List(items)) = second.get("item") else {
            panic!("expected item list");
        };
        assert_eq!(items.len(), 1);
    }

    #[test]
    fn test_grouping_requires_pair_objects() {
        assert!(matches!(
            group_by_category(Node::Int(3)),
            Err(Error::ExpectedList)
        ));
        assert!(matches!(
            group_by_category(Node::List(vec![obj(vec![("other", Node::Null)])])),
            Err(Error::MissingField("catObj"))
        ));
    }

    #[test]
    fn test_strip_class_markers() {
        let input = Node::List(vec![
            obj(vec![
                (CLASS_KEY, Node::Text("Gold".to_string())),
                ("price", Node::Int(10)),
            ]),
            obj(vec![("price", Node::Int(20))]),
        ]);

        let output = strip_class_markers(input).unwrap();
        let Node::Map(root) = output else {
            panic!("expected map");
        };
        let Some(Node::List(records)) = root.get("item") else {
            panic!("expected item list");
        };
        for record in records {
            let Node::Map(map) = record else {
                panic!("expected map");
            };
            assert!(!map.contains_key(CLASS_KEY));
            assert!(map.contains_key("price"));
        }
    }

    #[test]
    fn test_wrap_records_is_idempotent() {
        let input = Node::List(vec![obj(vec![("ID", Node::Int(1))])]);
        let once = wrap_records(input).unwrap();
        let twice = wrap_records(once.clone()).unwrap();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_unregistered_class_falls_back_to_wrap() {
        let registry = Registry::default();
        let input = Node::List(vec![obj(vec![("ID", Node::Int(1))])]);

        let output = registry
            .normalize("com.example.UnknownRecord", input)
            .unwrap();
        let Node::Map(root) = output else {
            panic!("expected map");
        };
        assert!(root.contains_key("item"));
    }

    #[test]
    fn test_registry_is_open_for_extension() {
        let mut registry = Registry::empty();
        registry.register("custom", |node| {
            let mut out = Map::new();
            out.insert("wrapped", node);
            Ok(Node::Map(out))
        });

        let output = registry.normalize("custom", Node::Int(1)).unwrap();
        let Node::Map(root) = output else {
            panic!("expected map");
        };
        assert_eq!(root.get("wrapped"), Some(&Node::Int(1)));
    }

    #[test]
    fn test_default_registry_dispatches_by_class_name() {
        let registry = Registry::default();
        let input = Node::List(vec![pair(1, "sword")]);

        let output = registry.normalize(ITEM_CLASS, input).unwrap();
        let Node::Map(root) = output else {
            panic!("expected map");
        };
        assert!(root.contains_key("items"));
    }
}
