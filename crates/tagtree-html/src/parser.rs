//! HTML parser pipeline
//!
//! html5ever tokenizer → event channel → token cursor → tree builder.

use tagtree_dom::{BuildConfig, Forest, Node, Selector, TokenCursor, TreeBuilder, event_channel};

use crate::HtmlError;
use crate::source::tokenize;

/// Parser options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseConfig {
    /// Tree builder settings
    pub build: BuildConfig,
    /// Drop text events that contain only whitespace
    pub skip_whitespace_text: bool,
    /// Treat `<br>`, `<img>` and the other void elements as self-closing
    pub void_elements: bool,
}

impl Default for ParseConfig {
    fn default() -> Self {
        Self {
            build: BuildConfig::default(),
            skip_whitespace_text: false,
            void_elements: true,
        }
    }
}

/// HTML parser
#[derive(Debug, Clone, Default)]
pub struct HtmlParser {
    config: ParseConfig,
}

impl HtmlParser {
    /// Create a parser with default settings
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: ParseConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &ParseConfig {
        &self.config
    }

    /// Tokenize `html` on a blocking thread and collect the cursor
    pub async fn tokenize(&self, html: &str) -> Result<TokenCursor, HtmlError> {
        let (events, rx) = event_channel();
        let html = html.to_owned();
        let config = self.config;
        let producer = smol::unblock(move || tokenize(&html, events, config));

        let cursor = TokenCursor::collect(rx).await?;
        let sent = producer.await;
        tracing::trace!("Producer finished after {sent} events");
        Ok(cursor)
    }

    /// Parse `html` into a forest
    pub async fn parse_async(&self, html: &str) -> Result<Forest, HtmlError> {
        let cursor = self.tokenize(html).await?;
        let forest = TreeBuilder::new(self.config.build).build_forest(cursor)?;
        Ok(forest)
    }

    /// Blocking variant of [`parse_async`](Self::parse_async)
    pub fn parse(&self, html: &str) -> Result<Forest, HtmlError> {
        smol::block_on(self.parse_async(html))
    }

    /// Build only the subtree of the first element matching `expression`.
    ///
    /// Tokens before the match are skipped without being built.
    pub fn parse_first(&self, html: &str, expression: &str) -> Result<Option<Node>, HtmlError> {
        smol::block_on(async {
            let mut cursor = self.tokenize(html).await?;
            let selector = Selector::new(expression);
            let mut builder = TreeBuilder::new(self.config.build);
            let node = builder.build_from(&mut cursor, |token| selector.matches_token(token));
            builder.check()?;
            Ok::<_, HtmlError>(node)
        })
    }
}
