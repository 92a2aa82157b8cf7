//! Attribute-marker key rewrite
//!
//! The structured writer treats `@`-prefixed keys as attributes. This pass
//! prefixes every map key except list-valued ones: a list-valued key stays
//! bare (it names a repeated element container), while each map inside the
//! list is rewritten independently.

use crate::node::{Map, Node};

/// Reserved prefix marking a key as a serialization attribute
pub const ATTR_MARKER: char = '@';

/// Rewrite a tree so all non-list map keys carry the attribute marker.
///
/// Not idempotent: a second application double-prefixes. Apply exactly
/// once, immediately before serialization.
pub fn annotate(node: Node) -> Node {
    match node {
        Node::Map(map) => {
            let mut out = Map::new();
            for (key, value) in map {
                match value {
                    Node::List(items) => {
                        let items = items.into_iter().map(annotate).collect();
                        out.insert(key, Node::List(items));
                    }
                    other => out.insert(format!("{ATTR_MARKER}{key}"), annotate(other)),
                }
            }
            Node::Map(out)
        }
        Node::List(items) => Node::List(items.into_iter().map(annotate).collect()),
        scalar => scalar,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn map(entries: Vec<(&str, Node)>) -> Node {
        Node::Map(
            entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v))
                .collect(),
        )
    }

    #[test]
    fn test_scalar_keys_gain_marker() {
        let input = map(vec![
            ("ID", Node::Int(1)),
            ("name", Node::Text("sword".to_string())),
        ]);

        let expected = map(vec![
            ("@ID", Node::Int(1)),
            ("@name", Node::Text("sword".to_string())),
        ]);
        assert_eq!(annotate(input), expected);
    }

    #[test]
    fn test_list_keys_stay_bare_and_elements_recurse() {
        let input = map(vec![(
            "items",
            Node::List(vec![map(vec![("ID", Node::Int(1))])]),
        )]);

        let expected = map(vec![(
            "items",
            Node::List(vec![map(vec![("@ID", Node::Int(1))])]),
        )]);
        assert_eq!(annotate(input), expected);
    }

    #[test]
    fn test_nested_map_keys_gain_marker() {
        let input = map(vec![("outer", map(vec![("inner", Node::Int(2))]))]);

        let expected = map(vec![("@outer", map(vec![("@inner", Node::Int(2))]))]);
        assert_eq!(annotate(input), expected);
    }

    #[test]
    fn test_list_of_scalars_untouched() {
        let input = map(vec![(
            "values",
            Node::List(vec![Node::Int(1), Node::Int(2)]),
        )]);

        assert_eq!(annotate(input.clone()), input);
    }

    #[test]
    fn test_every_non_list_key_gains_exactly_one_marker() {
        let input = map(vec![
            ("a", Node::Int(1)),
            ("b", map(vec![("c", Node::Null)])),
            ("d", Node::List(vec![Node::Bool(true)])),
        ]);

        let Node::Map(out) = annotate(input) else {
            panic!("expected map");
        };
        for (key, value) in out.iter() {
            if matches!(value, Node::List(_)) {
                assert!(!key.starts_with(ATTR_MARKER));
            } else {
                assert!(key.starts_with(ATTR_MARKER));
                assert!(!key[1..].starts_with(ATTR_MARKER));
            }
        }
    }

    #[test]
    fn test_double_application_double_prefixes() {
        // Documents why callers must apply the rewrite exactly once.
        let input = map(vec![("k", Node::Int(1))]);
        let twice = annotate(annotate(input));
        assert_eq!(twice, map(vec![("@@k", Node::Int(1))]));
    }
}
