//! tagtree DOM
//!
//! Builds nested trees from flat markup token streams and queries them with
//! `tag.class#id` selectors.
//!
//! Tokenizing is left to an upstream tokenizer, which feeds
//! [`TokenEvent`]s into [`TokenCursor::collect`]. The finished cursor is
//! consumed once by a [`TreeBuilder`].
//!
//! # Example
//! ```rust
//! use tagtree_dom::{Forest, Token, TokenCursor};
//!
//! let cursor = TokenCursor::new(vec![
//!     Token::start_tag("div", [("class", "a b")], false),
//!     Token::text("hi"),
//!     Token::end_tag("div"),
//! ]);
//! let forest = Forest::build(cursor);
//! assert_eq!(forest.select(".a")[0].inner_text(), "hi");
//! ```

mod builder;
mod cursor;
mod error;
mod event;
mod node;
mod selector;
mod token;

pub use builder::{BuildConfig, Forest, TreeBuilder};
pub use cursor::TokenCursor;
pub use error::{BuildError, CursorError};
pub use event::{EventSender, TokenEvent, event_channel};
pub use node::{Descendants, Node};
pub use selector::Selector;
pub use token::{Attribute, TEXT_TAG_NAME, Token};
