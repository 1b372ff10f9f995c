//! Error types

/// Problems noticed while assembling a tree.
///
/// In lenient mode these are diagnostics only and never change the tree.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("Mismatched end tag: expected </{expected}>, found </{found}>")]
    MismatchedEndTag { expected: String, found: String },

    #[error("Unclosed tag: {tag}")]
    UnclosedTag { tag: String },

    #[error("End tag </{tag}> with no open element")]
    StrayEndTag { tag: String },
}

/// Failures while gathering tokenizer events into a cursor
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CursorError {
    #[error("Event source closed after {received} tokens without finishing")]
    SourceClosed { received: usize },

    #[error("Token cursor is no longer being collected")]
    ConsumerGone,
}
