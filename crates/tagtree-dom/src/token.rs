//! Markup tokens
//!
//! One token per tokenizer event. Tokens carry no tree structure; nesting
//! is recovered later by the tree builder.

use serde::{Deserialize, Serialize};

/// Tag name reported by text tokens
pub const TEXT_TAG_NAME: &str = "TEXT";

/// A `name="value"` pair on a start tag
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

impl Attribute {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A single markup event
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Opening tag, possibly self-closing (`<br/>`)
    StartTag {
        name: String,
        attrs: Vec<Attribute>,
        self_closing: bool,
    },
    /// Closing tag
    EndTag { name: String },
    /// Character data
    Text { text: String },
}

impl Token {
    /// Create a start tag from `(name, value)` pairs
    pub fn start_tag<N, V>(
        name: impl Into<String>,
        attrs: impl IntoIterator<Item = (N, V)>,
        self_closing: bool,
    ) -> Self
    where
        N: Into<String>,
        V: Into<String>,
    {
        Token::StartTag {
            name: name.into(),
            attrs: attrs
                .into_iter()
                .map(|(name, value)| Attribute::new(name, value))
                .collect(),
            self_closing,
        }
    }

    pub fn end_tag(name: impl Into<String>) -> Self {
        Token::EndTag { name: name.into() }
    }

    pub fn text(text: impl Into<String>) -> Self {
        Token::Text { text: text.into() }
    }

    /// Tag name, or `"TEXT"` for character data
    pub fn tag_name(&self) -> &str {
        match self {
            Token::StartTag { name, .. } | Token::EndTag { name } => name.as_str(),
            Token::Text { .. } => TEXT_TAG_NAME,
        }
    }

    /// Value of the first attribute called `name`.
    ///
    /// Only start tags carry attributes; every other token reports `None`.
    pub fn attr(&self, name: &str) -> Option<&str> {
        match self {
            Token::StartTag { attrs, .. } => attrs
                .iter()
                .find(|attr| attr.name == name)
                .map(|attr| attr.value.as_str()),
            _ => None,
        }
    }

    /// Attributes in source order (empty for non-start tags)
    pub fn attrs(&self) -> &[Attribute] {
        match self {
            Token::StartTag { attrs, .. } => attrs.as_slice(),
            _ => &[],
        }
    }

    /// Class names from the `class` attribute, split on whitespace.
    ///
    /// Order and duplicates are kept. `None` when there is no `class`
    /// attribute at all.
    pub fn classes(&self) -> Option<Vec<&str>> {
        self.attr("class")
            .map(|value| value.split_whitespace().collect())
    }

    #[inline]
    pub fn is_start_tag(&self) -> bool {
        matches!(self, Token::StartTag { .. })
    }

    #[inline]
    pub fn is_end_tag(&self) -> bool {
        matches!(self, Token::EndTag { .. })
    }

    #[inline]
    pub fn is_text(&self) -> bool {
        matches!(self, Token::Text { .. })
    }

    /// Whether this is a `<tag/>` start tag
    #[inline]
    pub fn is_self_closing(&self) -> bool {
        matches!(self, Token::StartTag { self_closing: true, .. })
    }

    /// Character data if this is a text token
    #[inline]
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Token::Text { text } => Some(text.as_str()),
            _ => None,
        }
    }
}
