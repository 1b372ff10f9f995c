//! html5ever event source
//!
//! A `TokenSink` that turns html5ever tokens into [`TokenEvent`]s. Runs of
//! character tokens are merged into one text event; comments, doctypes and
//! tokenizer errors are dropped.

use std::cell::{Cell, RefCell};

use html5ever::tendril::StrTendril;
use html5ever::tokenizer::states::RawKind;
use html5ever::tokenizer::{
    BufferQueue, Tag, TagKind, Token as HtmlToken, TokenSink, TokenSinkResult, Tokenizer,
    TokenizerOpts,
};
use html5ever::TokenizerResult;
use tagtree_dom::{Attribute, EventSender, TokenEvent};

use crate::ParseConfig;

/// Void elements (never have an end tag)
pub const VOID_ELEMENTS: &[&str] = &[
    "area", "base", "br", "col", "embed", "hr", "img", "input", "link", "meta", "param", "source",
    "track", "wbr",
];

/// Tokenizer state to switch to after a start tag, if its content is not markup
fn raw_kind(tag: &str) -> Option<RawKind> {
    match tag {
        "script" => Some(RawKind::ScriptData),
        "style" | "xmp" | "iframe" | "noembed" | "noframes" => Some(RawKind::Rawtext),
        "title" | "textarea" => Some(RawKind::Rcdata),
        _ => None,
    }
}

/// html5ever sink that forwards tokens as events
pub struct HtmlEventSource {
    events: EventSender,
    config: ParseConfig,
    pending_text: RefCell<String>,
    sent: Cell<usize>,
}

impl HtmlEventSource {
    pub fn new(events: EventSender, config: ParseConfig) -> Self {
        Self {
            events,
            config,
            pending_text: RefCell::new(String::new()),
            sent: Cell::new(0),
        }
    }

    /// Events sent so far, `Finish` included
    pub fn sent(&self) -> usize {
        self.sent.get()
    }

    fn send(&self, event: TokenEvent) {
        match self.events.send(event) {
            Ok(()) => self.sent.set(self.sent.get() + 1),
            Err(err) => tracing::debug!("Dropping event: {err}"),
        }
    }

    fn flush_text(&self) {
        let text = self.pending_text.take();
        if text.is_empty() {
            return;
        }
        if self.config.skip_whitespace_text && text.trim().is_empty() {
            return;
        }
        self.send(TokenEvent::Text { text });
    }

    fn emit_tag(&self, tag: Tag) -> TokenSinkResult<()> {
        let name = tag.name.to_string();
        match tag.kind {
            TagKind::StartTag => {
                let self_closing = tag.self_closing
                    || (self.config.void_elements && VOID_ELEMENTS.contains(&name.as_str()));
                let attrs = tag
                    .attrs
                    .into_iter()
                    .map(|attr| Attribute::new(attr.name.local.to_string(), attr.value.to_string()))
                    .collect();
                let raw = if self_closing { None } else { raw_kind(&name) };
                self.send(TokenEvent::StartTag {
                    name,
                    attrs,
                    self_closing,
                });
                if let Some(kind) = raw {
                    return TokenSinkResult::RawData(kind);
                }
            }
            TagKind::EndTag => {
                if self.config.void_elements && VOID_ELEMENTS.contains(&name.as_str()) {
                    tracing::trace!("Ignoring end tag for void element {name}");
                } else {
                    self.send(TokenEvent::EndTag { name });
                }
            }
        }
        TokenSinkResult::Continue
    }
}

impl TokenSink for HtmlEventSource {
    type Handle = ();

    fn process_token(&self, token: HtmlToken, line_number: u64) -> TokenSinkResult<()> {
        match token {
            HtmlToken::CharacterTokens(text) => self.pending_text.borrow_mut().push_str(&text),
            HtmlToken::NullCharacterToken => self.pending_text.borrow_mut().push('\0'),
            HtmlToken::TagToken(tag) => {
                self.flush_text();
                return self.emit_tag(tag);
            }
            HtmlToken::EOFToken => {
                self.flush_text();
                self.send(TokenEvent::Finish);
            }
            HtmlToken::ParseError(err) => {
                tracing::trace!("Tokenizer error at line {line_number}: {err}");
            }
            _ => {}
        }
        TokenSinkResult::Continue
    }
}

/// Tokenize `html`, sending every event to `events`, then `Finish`
pub fn tokenize(html: &str, events: EventSender, config: ParseConfig) -> usize {
    let sink = HtmlEventSource::new(events, config);
    let input = BufferQueue::default();
    input.push_back(StrTendril::from_slice(html));

    let tokenizer = Tokenizer::new(sink, TokenizerOpts::default());
    match tokenizer.feed(&input) {
        TokenizerResult::Done => {}
        // The sink never requests script execution
        TokenizerResult::Script(()) => {
            tracing::debug!("Tokenizer suspended for a script before the end of input");
        }
    }
    tokenizer.end();

    let sent = tokenizer.sink.sent();
    tracing::debug!("Tokenized {} bytes into {} events", html.len(), sent);
    sent
}
