//! Tree construction
//!
//! Turns a token cursor into nested nodes with a single forward pass. Each
//! start tag opens a frame that collects children until the next end tag.
//! The end tag's name is not checked against the open element; mismatches
//! and unterminated elements are recorded as diagnostics and, in strict
//! mode, reported as errors.

use crate::{BuildError, Node, Token, TokenCursor};

/// Tree builder options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildConfig {
    /// Turn recorded diagnostics into a hard error
    pub strict: bool,
}

impl BuildConfig {
    pub fn strict() -> Self {
        Self { strict: true }
    }
}

/// Single-pass tree builder
#[derive(Debug, Default)]
pub struct TreeBuilder {
    config: BuildConfig,
    diagnostics: Vec<BuildError>,
}

/// Every top-level tree built from one cursor
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    pub roots: Vec<Node>,
    pub diagnostics: Vec<BuildError>,
}

impl TreeBuilder {
    pub fn new(config: BuildConfig) -> Self {
        Self {
            config,
            diagnostics: Vec::new(),
        }
    }

    pub fn config(&self) -> BuildConfig {
        self.config
    }

    /// Problems seen so far
    pub fn diagnostics(&self) -> &[BuildError] {
        &self.diagnostics
    }

    /// In strict mode, fail on the first recorded diagnostic
    pub fn check(&self) -> Result<(), BuildError> {
        match self.diagnostics.first() {
            Some(err) if self.config.strict => Err(err.clone()),
            _ => Ok(()),
        }
    }

    /// Build the subtree that starts with `token`.
    ///
    /// Text and self-closing tags become leaves. Any other start tag reads
    /// children from `cursor` until an end tag or until the cursor runs
    /// dry. An end tag cannot start a subtree and yields `None`.
    pub fn build(&mut self, token: Token, cursor: &mut TokenCursor) -> Option<Node> {
        match token {
            Token::EndTag { .. } => None,
            Token::Text { .. } | Token::StartTag { self_closing: true, .. } => {
                Some(Node::new(token, Vec::new()))
            }
            Token::StartTag { .. } => Some(self.build_element(token, cursor)),
        }
    }

    fn build_element(&mut self, token: Token, cursor: &mut TokenCursor) -> Node {
        // Open elements, innermost last. Nesting depth lives on the heap so
        // unclosed tags cannot exhaust the call stack.
        let mut open: Vec<(Token, Vec<Node>)> = Vec::new();
        let mut current = (token, Vec::new());
        loop {
            let Some(next) = cursor.get() else {
                // Close everything from the innermost element outwards
                loop {
                    self.record(BuildError::UnclosedTag {
                        tag: current.0.tag_name().to_string(),
                    });
                    let node = Node::new(current.0, current.1);
                    match open.pop() {
                        Some(parent) => {
                            current = parent;
                            current.1.push(node);
                        }
                        None => return node,
                    }
                }
            };
            match next {
                Token::EndTag { name } => {
                    if name != current.0.tag_name() {
                        self.record(BuildError::MismatchedEndTag {
                            expected: current.0.tag_name().to_string(),
                            found: name,
                        });
                    }
                    let node = Node::new(current.0, current.1);
                    match open.pop() {
                        Some(parent) => {
                            current = parent;
                            current.1.push(node);
                        }
                        None => return node,
                    }
                }
                start @ Token::StartTag {
                    self_closing: false,
                    ..
                } => open.push(std::mem::replace(&mut current, (start, Vec::new()))),
                leaf => current.1.push(Node::new(leaf, Vec::new())),
            }
        }
    }

    /// Skip to the first token matching `predicate` and build its subtree
    pub fn build_from<P>(&mut self, cursor: &mut TokenCursor, predicate: P) -> Option<Node>
    where
        P: FnMut(&Token) -> bool,
    {
        let token = cursor.take(predicate)?;
        self.build(token, cursor)
    }

    /// Drain `cursor`, building one root per top-level token.
    ///
    /// Top-level end tags have nothing to close; they are skipped and
    /// recorded as [`BuildError::StrayEndTag`].
    pub fn build_forest(mut self, mut cursor: TokenCursor) -> Result<Forest, BuildError> {
        let roots = self.assemble(&mut cursor);
        self.check()?;

        tracing::debug!(
            "Built {} roots ({} nodes, {} diagnostics)",
            roots.len(),
            roots.iter().map(Node::node_count).sum::<usize>(),
            self.diagnostics.len()
        );
        Ok(Forest {
            roots,
            diagnostics: self.diagnostics,
        })
    }

    fn assemble(&mut self, cursor: &mut TokenCursor) -> Vec<Node> {
        let mut roots = Vec::new();
        while let Some(token) = cursor.get() {
            if let Token::EndTag { name } = &token {
                self.record(BuildError::StrayEndTag { tag: name.clone() });
                continue;
            }
            if let Some(node) = self.build(token, cursor) {
                roots.push(node);
            }
        }
        roots
    }

    fn record(&mut self, err: BuildError) {
        tracing::warn!("{err}");
        self.diagnostics.push(err);
    }
}

impl Forest {
    /// Build with default (lenient) settings, which never fail
    pub fn build(mut cursor: TokenCursor) -> Self {
        let mut builder = TreeBuilder::default();
        let roots = builder.assemble(&mut cursor);
        Forest {
            roots,
            diagnostics: builder.diagnostics,
        }
    }

    /// Topmost matches across all roots, in document order
    pub fn find<P>(&self, predicate: P) -> Vec<&Node>
    where
        P: Fn(&Node) -> bool,
    {
        self.roots
            .iter()
            .flat_map(|root| root.find(&predicate))
            .collect()
    }

    pub fn select(&self, expression: &str) -> Vec<&Node> {
        let selector = crate::Selector::new(expression);
        self.find(|node| selector.matches_node(node))
    }

    /// Concatenated text of every root
    pub fn inner_text(&self) -> String {
        self.roots.iter().map(Node::inner_text).collect()
    }

    /// Whether the input was well nested
    pub fn is_clean(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Wrap all roots in a synthetic element
    pub fn into_root(self, name: &str) -> Node {
        Node::element(name, Vec::new(), self.roots)
    }
}
