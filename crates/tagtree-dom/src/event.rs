//! Tokenizer events
//!
//! An upstream tokenizer reports start tags, end tags and text as they are
//! scanned, then a single `Finish`. [`TokenCursor::collect`] gathers those
//! events into a cursor and resolves once, when `Finish` arrives.

use smol::channel::{self, Receiver, Sender};

use crate::{Attribute, CursorError, Token, TokenCursor};

/// One event from the upstream tokenizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenEvent {
    StartTag {
        name: String,
        attrs: Vec<Attribute>,
        self_closing: bool,
    },
    EndTag {
        name: String,
    },
    Text {
        text: String,
    },
    /// No further events will follow
    Finish,
}

impl TokenEvent {
    /// The token this event appends, or `None` for `Finish`
    pub fn into_token(self) -> Option<Token> {
        match self {
            TokenEvent::StartTag {
                name,
                attrs,
                self_closing,
            } => Some(Token::StartTag {
                name,
                attrs,
                self_closing,
            }),
            TokenEvent::EndTag { name } => Some(Token::EndTag { name }),
            TokenEvent::Text { text } => Some(Token::Text { text }),
            TokenEvent::Finish => None,
        }
    }
}

impl From<Token> for TokenEvent {
    fn from(token: Token) -> Self {
        match token {
            Token::StartTag {
                name,
                attrs,
                self_closing,
            } => TokenEvent::StartTag {
                name,
                attrs,
                self_closing,
            },
            Token::EndTag { name } => TokenEvent::EndTag { name },
            Token::Text { text } => TokenEvent::Text { text },
        }
    }
}

/// Producer half of an event channel
#[derive(Debug, Clone)]
pub struct EventSender {
    tx: Sender<TokenEvent>,
}

/// Create an unbounded event channel.
///
/// The producer never blocks; the receiver is meant for
/// [`TokenCursor::collect`].
pub fn event_channel() -> (EventSender, Receiver<TokenEvent>) {
    let (tx, rx) = channel::unbounded();
    (EventSender { tx }, rx)
}

impl EventSender {
    pub fn start_tag(
        &self,
        name: impl Into<String>,
        attrs: Vec<Attribute>,
        self_closing: bool,
    ) -> Result<(), CursorError> {
        self.send(TokenEvent::StartTag {
            name: name.into(),
            attrs,
            self_closing,
        })
    }

    pub fn end_tag(&self, name: impl Into<String>) -> Result<(), CursorError> {
        self.send(TokenEvent::EndTag { name: name.into() })
    }

    pub fn text(&self, text: impl Into<String>) -> Result<(), CursorError> {
        self.send(TokenEvent::Text { text: text.into() })
    }

    /// Signal the end of input. Resolves the pending collection.
    pub fn finish(&self) -> Result<(), CursorError> {
        self.send(TokenEvent::Finish)
    }

    /// Send a raw event
    pub fn send(&self, event: TokenEvent) -> Result<(), CursorError> {
        self.tx
            .try_send(event)
            .map_err(|_| CursorError::ConsumerGone)
    }
}

impl TokenCursor {
    /// Buffer events until `Finish`, then hand back the complete cursor.
    ///
    /// Events after `Finish` are left in the channel. If every sender is
    /// dropped before `Finish` arrives the collection fails with
    /// [`CursorError::SourceClosed`].
    pub async fn collect(events: Receiver<TokenEvent>) -> Result<TokenCursor, CursorError> {
        let mut tokens = Vec::new();
        loop {
            let event = match events.recv().await {
                Ok(event) => event,
                Err(_) => {
                    return Err(CursorError::SourceClosed {
                        received: tokens.len(),
                    });
                }
            };
            tracing::trace!(?event, "token event");
            match event.into_token() {
                Some(token) => tokens.push(token),
                None => break,
            }
        }
        tracing::debug!("Collected {} tokens", tokens.len());
        Ok(TokenCursor::new(tokens))
    }
}
