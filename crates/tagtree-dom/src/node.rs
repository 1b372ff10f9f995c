//! Tree nodes
//!
//! A node owns one start tag or text token plus its children. End tags are
//! consumed by the builder and never end up inside a node.

use std::fmt;

use serde::de::{self, Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Error as _, Serialize, SerializeStruct, Serializer};

use crate::{Attribute, Selector, Token};

/// Element or text node
///
/// Every tree walk, including `Clone`, `PartialEq` and `Drop`, keeps its
/// own stack, so depth is bounded by memory rather than by the call stack.
#[derive(Debug)]
pub struct Node {
    token: Token,
    children: Vec<Node>,
}

impl Node {
    pub(crate) fn new(token: Token, children: Vec<Node>) -> Self {
        debug_assert!(!token.is_end_tag(), "end tags never become nodes");
        Self { token, children }
    }

    /// Create a text leaf
    pub fn text(text: impl Into<String>) -> Self {
        Self::new(Token::text(text), Vec::new())
    }

    /// Create an element, e.g. a synthetic root around a forest
    pub fn element(name: impl Into<String>, attrs: Vec<Attribute>, children: Vec<Node>) -> Self {
        Self::new(
            Token::StartTag {
                name: name.into(),
                attrs,
                self_closing: false,
            },
            children,
        )
    }

    /// The wrapped token
    #[inline]
    pub fn token(&self) -> &Token {
        &self.token
    }

    /// Tag name, or `"TEXT"` for text nodes
    #[inline]
    pub fn tag_name(&self) -> &str {
        self.token.tag_name()
    }

    #[inline]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.token.attr(name)
    }

    #[inline]
    pub fn children(&self) -> &[Node] {
        &self.children
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        self.token.is_start_tag()
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        self.token.is_text()
    }

    /// Children that are elements
    pub fn element_children(&self) -> impl Iterator<Item = &Node> {
        self.children.iter().filter(|child| child.is_element())
    }

    /// Text of the direct text children
    pub fn text_children(&self) -> impl Iterator<Item = &str> {
        self.children.iter().filter_map(|child| child.token.as_text())
    }

    /// All text in the subtree, in document order, with no separators
    pub fn inner_text(&self) -> String {
        self.descendants()
            .filter_map(|node| node.token.as_text())
            .collect()
    }

    /// This node and everything below it, in document order
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }

    /// Topmost nodes matching `predicate`.
    ///
    /// A matching node is returned without looking at its descendants, so
    /// the result never holds both a node and one of its ancestors.
    pub fn find<P>(&self, predicate: P) -> Vec<&Node>
    where
        P: Fn(&Node) -> bool,
    {
        let mut found = Vec::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            if predicate(node) {
                found.push(node);
            } else {
                stack.extend(node.children.iter().rev());
            }
        }
        found
    }

    /// [`find`](Self::find) with a selector expression such as `div.item#main`
    pub fn select(&self, expression: &str) -> Vec<&Node> {
        let selector = Selector::new(expression);
        self.find(|node| selector.matches_node(node))
    }

    /// Token sequence that rebuilds this subtree
    pub fn tokens(&self) -> Vec<Token> {
        enum Step<'a> {
            Open(&'a Node),
            Close(&'a str),
        }

        let mut out = Vec::new();
        let mut steps = vec![Step::Open(self)];
        while let Some(step) = steps.pop() {
            let node = match step {
                Step::Open(node) => node,
                Step::Close(name) => {
                    out.push(Token::end_tag(name));
                    continue;
                }
            };
            out.push(node.token.clone());
            if let Token::StartTag {
                name,
                self_closing: false,
                ..
            } = &node.token
            {
                steps.push(Step::Close(name.as_str()));
                steps.extend(node.children.iter().rev().map(Step::Open));
            }
        }
        out
    }

    /// Number of nodes in the subtree, this one included
    pub fn node_count(&self) -> usize {
        self.descendants().count()
    }

    /// Depth of the subtree; a leaf has depth 1
    pub fn depth(&self) -> usize {
        let mut deepest = 0;
        let mut stack = vec![(self, 1)];
        while let Some((node, depth)) = stack.pop() {
            deepest = deepest.max(depth);
            stack.extend(node.children.iter().map(|child| (child, depth + 1)));
        }
        deepest
    }
}

/// Pre-order iterator over a subtree
pub struct Descendants<'a> {
    stack: Vec<&'a Node>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a Node;

    fn next(&mut self) -> Option<&'a Node> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

impl Clone for Node {
    fn clone(&self) -> Self {
        // (source, unvisited children, finished copies of visited children)
        let mut current = (self, self.children.iter(), Vec::with_capacity(self.children.len()));
        let mut parents = Vec::new();
        loop {
            if let Some(child) = current.1.next() {
                let frame = (child, child.children.iter(), Vec::with_capacity(child.children.len()));
                parents.push(std::mem::replace(&mut current, frame));
                continue;
            }
            let copy = Node {
                token: current.0.token.clone(),
                children: std::mem::take(&mut current.2),
            };
            match parents.pop() {
                Some(parent) => {
                    current = parent;
                    current.2.push(copy);
                }
                None => return copy,
            }
        }
    }
}

impl PartialEq for Node {
    fn eq(&self, other: &Self) -> bool {
        let mut pairs = vec![(self, other)];
        while let Some((a, b)) = pairs.pop() {
            if a.token != b.token || a.children.len() != b.children.len() {
                return false;
            }
            pairs.extend(a.children.iter().zip(&b.children));
        }
        true
    }
}

impl Eq for Node {}

impl Drop for Node {
    fn drop(&mut self) {
        let mut pending = std::mem::take(&mut self.children);
        while let Some(mut node) = pending.pop() {
            pending.append(&mut node.children);
        }
    }
}

impl Serialize for Node {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match &self.token {
            Token::Text { text } => serializer.serialize_str(text),
            Token::StartTag { name, attrs, .. } => {
                let mut state = serializer.serialize_struct("Node", 3)?;
                state.serialize_field("tag", name)?;
                state.serialize_field("attrs", attrs)?;
                state.serialize_field("children", &self.children)?;
                state.end()
            }
            Token::EndTag { name } => Err(S::Error::custom(format!(
                "end tag </{name}> cannot be serialized as a node"
            ))),
        }
    }
}

/// Accepts either shape written by `Serialize`: a string for text, or a
/// map with `tag` and optional `attrs` and `children`.
///
/// Serialization and deserialization follow the tree through serde and so
/// recurse per level. `serde_json` additionally stops at 128 nested
/// containers by default, and every element level uses two (the map and its
/// `children` array), so `serde_json::from_str` handles about 60 levels.
/// Deeper documents need a `serde_json::Deserializer` with
/// `disable_recursion_limit` (the `unbounded_depth` feature).
impl<'de> Deserialize<'de> for Node {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NodeVisitor)
    }
}

struct NodeVisitor;

impl<'de> Visitor<'de> for NodeVisitor {
    type Value = Node;

    fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("a text string or an element map with a `tag` field")
    }

    fn visit_str<E: de::Error>(self, text: &str) -> Result<Node, E> {
        Ok(Node::text(text))
    }

    fn visit_string<E: de::Error>(self, text: String) -> Result<Node, E> {
        Ok(Node::text(text))
    }

    fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Node, A::Error> {
        let mut tag: Option<String> = None;
        let mut attrs: Option<Vec<Attribute>> = None;
        let mut children: Option<Vec<Node>> = None;
        while let Some(key) = map.next_key::<String>()? {
            match key.as_str() {
                "tag" if tag.is_some() => return Err(de::Error::duplicate_field("tag")),
                "tag" => tag = Some(map.next_value()?),
                "attrs" if attrs.is_some() => return Err(de::Error::duplicate_field("attrs")),
                "attrs" => attrs = Some(map.next_value()?),
                "children" if children.is_some() => {
                    return Err(de::Error::duplicate_field("children"));
                }
                "children" => children = Some(map.next_value()?),
                _ => {
                    map.next_value::<de::IgnoredAny>()?;
                }
            }
        }
        let tag = tag.ok_or_else(|| de::Error::missing_field("tag"))?;
        Ok(Node::element(
            tag,
            attrs.unwrap_or_default(),
            children.unwrap_or_default(),
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn list() -> Node {
        Node::element(
            "ul",
            vec![Attribute::new("class", "menu")],
            vec![
                Node::text("\n"),
                Node::element(
                    "li",
                    vec![Attribute::new("class", "item")],
                    vec![Node::text("one")],
                ),
                Node::element(
                    "li",
                    vec![Attribute::new("class", "item last")],
                    vec![Node::text("two"), Node::element("b", vec![], vec![Node::text("!")])],
                ),
            ],
        )
    }

    #[test]
    fn test_accessors() {
        let ul = list();
        assert_eq!(ul.tag_name(), "ul");
        assert_eq!(ul.attr("class"), Some("menu"));
        assert_eq!(ul.children().len(), 3);
        assert_eq!(ul.element_children().count(), 2);
        assert_eq!(ul.text_children().collect::<Vec<_>>(), vec!["\n"]);
        assert_eq!(ul.node_count(), 8);
        assert_eq!(ul.depth(), 4);
    }

    #[test]
    fn test_inner_text() {
        assert_eq!(list().inner_text(), "\nonetwo!");
        assert_eq!(Node::text("plain").inner_text(), "plain");
    }

    #[test]
    fn test_find_stops_at_first_match() {
        let ul = list();
        let items = ul.find(|n| n.tag_name() == "li");
        assert_eq!(items.len(), 2);

        let everything = ul.find(|n| n.is_element());
        assert_eq!(everything.len(), 1, "root matches, so nothing below is searched");
        assert_eq!(everything[0].tag_name(), "ul");

        assert!(ul.find(|n| n.tag_name() == "table").is_empty());
    }

    #[test]
    fn test_select() {
        let ul = list();
        let last = ul.select(".last");
        assert_eq!(last.len(), 1);
        assert_eq!(last[0].inner_text(), "two!");
        assert_eq!(ul.select("li.item").len(), 2);
        assert_eq!(ul.select("b").len(), 1);
    }

    #[test]
    fn test_descendants_in_document_order() {
        let tree = list();
        let names: Vec<&str> = tree.descendants().map(Node::tag_name).collect();
        assert_eq!(names, vec!["ul", "TEXT", "li", "TEXT", "li", "TEXT", "b", "TEXT"]);
    }

    #[test]
    fn test_clone_and_eq_compare_whole_subtree() {
        let ul = list();
        let copy = ul.clone();
        assert_eq!(copy, ul);
        assert_ne!(copy, Node::element("ul", vec![Attribute::new("class", "menu")], vec![]));
        assert_ne!(Node::text("a"), Node::text("b"));
    }

    #[test]
    fn test_tokens_close_every_element() {
        let tokens = Node::element("p", vec![], vec![Node::text("x")]).tokens();
        assert_eq!(
            tokens,
            vec![
                Token::start_tag("p", Vec::<(&str, &str)>::new(), false),
                Token::text("x"),
                Token::end_tag("p"),
            ]
        );
    }

    #[test]
    fn test_serialize_shape() {
        let node = Node::element(
            "a",
            vec![Attribute::new("href", "/")],
            vec![Node::text("home")],
        );
        let json = serde_json::to_value(&node).unwrap();
        assert_eq!(
            json,
            serde_json::json!({
                "tag": "a",
                "attrs": [{"name": "href", "value": "/"}],
                "children": ["home"],
            })
        );
        assert_eq!(serde_json::to_value(Node::text("hi")).unwrap(), serde_json::json!("hi"));
    }

    #[test]
    fn test_deserialize() {
        let node: Node = serde_json::from_str(
            r#"{"tag":"div","attrs":[{"name":"id","value":"x"}],"children":["a",{"tag":"br"}]}"#,
        )
        .unwrap();
        assert_eq!(node.attr("id"), Some("x"));
        assert_eq!(node.children().len(), 2);
        assert_eq!(node.children()[1].tag_name(), "br");
        assert_eq!(node.inner_text(), "a");
    }
}
