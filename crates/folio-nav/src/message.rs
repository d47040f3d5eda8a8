//! Transient messages: the notifications shown above the status line.
//!
//! Each message has two dismissal triggers:
//!
//! - **timeout**: [`MessageBoard::expire`] removes it once its lifetime is up;
//! - **interaction**: [`MessageBoard::dismiss_interaction`] removes it on the
//!   next key or click, but only after it is armed, a short delay after it
//!   appeared. The key that produced a message never dismisses it.
//!
//! Both paths end in [`MessageBoard::dismiss`], which removes by id and is a
//! no-op for an id that is already gone. Whichever trigger comes second
//! finds nothing to do.

use std::time::{Duration, Instant};

use tracing::trace;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MessageId(u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Info,
    Error,
}

/// Why a message went away.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DismissReason {
    Timeout,
    Interaction,
    Cleared,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Message {
    pub id: MessageId,
    pub text: String,
    pub kind: MessageKind,
    pub shown_at: Instant,
    /// From here on, interaction dismisses it.
    pub armed_at: Instant,
    /// From here on, the timeout dismisses it.
    pub expires_at: Instant,
}

impl Message {
    #[must_use]
    pub fn is_armed(&self, now: Instant) -> bool {
        now >= self.armed_at
    }

    #[must_use]
    pub fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// The stack of visible messages, oldest first.
#[derive(Debug, Clone)]
pub struct MessageBoard {
    messages: Vec<Message>,
    next_id: u64,
    lifetime: Duration,
    arm_delay: Duration,
}

impl MessageBoard {
    #[must_use]
    pub const fn new(lifetime: Duration, arm_delay: Duration) -> Self {
        Self {
            messages: Vec::new(),
            next_id: 0,
            lifetime,
            arm_delay,
        }
    }

    /// Show a message at `now` and return its id.
    pub fn push(&mut self, text: impl Into<String>, kind: MessageKind, now: Instant) -> MessageId {
        let id = MessageId(self.next_id);
        self.next_id += 1;
        self.messages.push(Message {
            id,
            text: text.into(),
            kind,
            shown_at: now,
            armed_at: now + self.arm_delay,
            expires_at: now + self.lifetime,
        });
        id
    }

    /// Remove one message. `false` if it was already gone.
    pub fn dismiss(&mut self, id: MessageId, reason: DismissReason) -> bool {
        let Some(pos) = self.messages.iter().position(|m| m.id == id) else {
            return false;
        };
        self.messages.remove(pos);
        trace!(?id, ?reason, "message dismissed");
        true
    }

    fn dismiss_where(&mut self, reason: DismissReason, pred: impl Fn(&Message) -> bool) -> usize {
        let ids: Vec<MessageId> = self.messages.iter().filter(|&m| pred(m)).map(|m| m.id).collect();
        ids.into_iter().filter(|&id| self.dismiss(id, reason)).count()
    }

    /// A key or click happened at `now`: drop every armed message.
    pub fn dismiss_interaction(&mut self, now: Instant) -> usize {
        self.dismiss_where(DismissReason::Interaction, |m| m.is_armed(now))
    }

    /// Drop every message whose lifetime is up.
    pub fn expire(&mut self, now: Instant) -> usize {
        self.dismiss_where(DismissReason::Timeout, |m| m.is_expired(now))
    }

    pub fn clear(&mut self) -> usize {
        self.dismiss_where(DismissReason::Cleared, |_| true)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Message> {
        self.messages.iter()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.messages.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.messages.is_empty()
    }
}
