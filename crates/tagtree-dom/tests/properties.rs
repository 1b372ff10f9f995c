//! Property tests for tagtree-dom

use proptest::prelude::*;
use tagtree_dom::{Attribute, Forest, Node, Selector, Token, TokenCursor};

fn arb_attr() -> impl Strategy<Value = Attribute> {
    let name = prop_oneof![
        Just("class".to_string()),
        Just("id".to_string()),
        "[a-z]{1,4}",
    ];
    (name, "[a-c ]{0,6}").prop_map(|(name, value)| Attribute::new(name, value))
}

fn arb_tree() -> impl Strategy<Value = Node> {
    let leaf = "[a-z ]{0,8}".prop_map(Node::text);
    leaf.prop_recursive(8, 64, 4, |inner| {
        (
            "[a-c]{1,2}",
            prop::collection::vec(arb_attr(), 0..3),
            prop::collection::vec(inner, 0..4),
        )
            .prop_map(|(name, attrs, children)| Node::element(name, attrs, children))
    })
}

fn arb_selector() -> impl Strategy<Value = String> {
    ("[a-c]{1,2}", 0..3u8).prop_map(|(word, kind)| match kind {
        0 => word,
        1 => format!(".{word}"),
        _ => format!("#{word}"),
    })
}

fn is_descendant(ancestor: &Node, target: &Node) -> bool {
    ancestor
        .children()
        .iter()
        .any(|child| std::ptr::eq(child, target) || is_descendant(child, target))
}

proptest! {
    #[test]
    fn prop_tokens_rebuild_same_tree(tree in arb_tree()) {
        let forest = Forest::build(TokenCursor::new(tree.tokens()));
        prop_assert!(forest.is_clean());
        prop_assert_eq!(forest.roots, vec![tree]);
    }

    #[test]
    fn prop_serialize_round_trip(tree in arb_tree()) {
        let json = serde_json::to_value(&tree).unwrap();
        let back: Node = serde_json::from_value(json.clone()).unwrap();
        let rebuilt = Forest::build(TokenCursor::new(back.tokens()));
        prop_assert_eq!(rebuilt.roots.len(), 1);
        prop_assert_eq!(serde_json::to_value(&rebuilt.roots[0]).unwrap(), json);
    }

    #[test]
    fn prop_find_never_returns_nested_matches(tree in arb_tree(), expr in arb_selector()) {
        let found = tree.select(&expr);
        for a in &found {
            for b in &found {
                prop_assert!(!is_descendant(a, b));
            }
        }
    }

    #[test]
    fn prop_find_results_all_match(tree in arb_tree(), expr in arb_selector()) {
        let selector = Selector::new(&expr);
        for node in tree.select(&expr) {
            prop_assert!(selector.matches_node(node));
        }
    }

    #[test]
    fn prop_cursor_yields_in_order(texts in prop::collection::vec("[a-z]{0,4}", 0..20)) {
        let tokens: Vec<Token> = texts.iter().map(Token::text).collect();
        let mut cursor = TokenCursor::new(tokens.clone());
        for expected in &tokens {
            let got = cursor.get();
            prop_assert_eq!(got.as_ref(), Some(expected));
        }
        prop_assert!(cursor.is_empty());
        prop_assert_eq!(cursor.get(), None);
        prop_assert!(cursor.is_empty());
    }
}
