//! Compound selectors
//!
//! Supports the `tag.class.class#id` subset: at most one leading tag name,
//! any number of `.class` parts, and one `#id`. No combinators, no
//! pseudo-classes, no attribute operators.
//!
//! A selector is a set of requirements. A start tag matches when each
//! required set (tags, classes, ids) is contained in the tag's own set.
//! An empty requirement is always met, so `""` matches every element.

use std::collections::HashSet;
use std::fmt;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::{Node, Token};

static TAG_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9_]+").unwrap());
static CLASS_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\.([A-Za-z0-9_\-]+)").unwrap());
static ID_PATTERN: Lazy<Regex> = Lazy::new(|| Regex::new(r"#([A-Za-z0-9_\-]+)").unwrap());

/// Compiled `tag.class#id` selector
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selector {
    tags: HashSet<String>,
    classes: HashSet<String>,
    ids: HashSet<String>,
}

impl Selector {
    /// Compile a selector expression.
    ///
    /// Parts that do not fit the grammar are ignored. Only the first `#id`
    /// is kept.
    pub fn new(expression: &str) -> Self {
        let tags = TAG_PATTERN
            .find(expression)
            .map(|m| m.as_str().to_string())
            .into_iter()
            .collect();
        let classes = CLASS_PATTERN
            .captures_iter(expression)
            .map(|caps| caps[1].to_string())
            .collect();
        let ids = ID_PATTERN
            .captures(expression)
            .map(|caps| caps[1].to_string())
            .into_iter()
            .collect();

        let selector = Self { tags, classes, ids };
        tracing::trace!(expression, ?selector, "compiled selector");
        selector
    }

    /// Required tag name, if any
    pub fn tag(&self) -> Option<&str> {
        self.tags.iter().next().map(String::as_str)
    }

    /// Required id, if any
    pub fn id(&self) -> Option<&str> {
        self.ids.iter().next().map(String::as_str)
    }

    /// Required classes, in no particular order
    pub fn classes(&self) -> impl Iterator<Item = &str> {
        self.classes.iter().map(String::as_str)
    }

    /// Whether the selector places no requirement at all
    pub fn is_universal(&self) -> bool {
        self.tags.is_empty() && self.classes.is_empty() && self.ids.is_empty()
    }

    /// Match a token. Only start tags can match.
    pub fn matches_token(&self, token: &Token) -> bool {
        if !token.is_start_tag() {
            return false;
        }

        let tags: HashSet<&str> = HashSet::from([token.tag_name()]);
        let classes: HashSet<&str> = token.classes().unwrap_or_default().into_iter().collect();
        let ids: HashSet<&str> = token.attr("id").into_iter().collect();

        contains_all(&tags, &self.tags)
            && contains_all(&classes, &self.classes)
            && contains_all(&ids, &self.ids)
    }

    /// Match the token a node wraps
    #[inline]
    pub fn matches_node(&self, node: &Node) -> bool {
        self.matches_token(node.token())
    }

    /// Token predicate, e.g. for [`TokenCursor::take`](crate::TokenCursor::take)
    pub fn token_predicate(self) -> impl Fn(&Token) -> bool {
        move |token| self.matches_token(token)
    }

    /// Node predicate, e.g. for [`Node::find`]
    pub fn node_predicate(self) -> impl Fn(&Node) -> bool {
        move |node| self.matches_node(node)
    }
}

fn contains_all(actual: &HashSet<&str>, required: &HashSet<String>) -> bool {
    required.iter().all(|item| actual.contains(item.as_str()))
}

impl From<&str> for Selector {
    fn from(expression: &str) -> Self {
        Self::new(expression)
    }
}

impl fmt::Display for Selector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(tag) = self.tag() {
            write!(f, "{tag}")?;
        }
        let mut classes: Vec<&str> = self.classes().collect();
        classes.sort_unstable();
        for class in classes {
            write!(f, ".{class}")?;
        }
        if let Some(id) = self.id() {
            write!(f, "#{id}")?;
        }
        Ok(())
    }
}
