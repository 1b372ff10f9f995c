//! tagtree HTML source
//!
//! Feeds html5ever's tokenizer output into the tagtree pipeline. The
//! tokenizer runs on a blocking thread and reports events; the cursor is
//! collected asynchronously, then built into a forest.
//!
//! No HTML tree construction rules are applied: nesting comes only from the
//! order of start and end tags in the source.

mod parser;
mod source;

pub use parser::{HtmlParser, ParseConfig};
pub use source::{HtmlEventSource, VOID_ELEMENTS, tokenize};
pub use tagtree_dom::{BuildConfig, BuildError, CursorError, Forest, Node, Selector, Token};

/// Parse an HTML string with default settings
pub fn parse(html: &str) -> Result<Forest, HtmlError> {
    HtmlParser::new().parse(html)
}

/// Parse and return the topmost elements matching `expression`
pub fn select(html: &str, expression: &str) -> Result<Vec<Node>, HtmlError> {
    let forest = parse(html)?;
    Ok(forest.select(expression).into_iter().cloned().collect())
}

/// Parse error
#[derive(Debug, thiserror::Error)]
pub enum HtmlError {
    #[error("Token collection failed: {0}")]
    Cursor(#[from] CursorError),

    #[error("Malformed markup: {0}")]
    Build(#[from] BuildError),
}
