use super::*;
use crate::state::Round;
use crate::state::Session;
use crate::state::Sessions;
use crate::*;

/// Which render of a player's bet-status message a dispatch carries.
/// A render is stale once the session has moved past its revision.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Stamp {
    pub round: u64,
    pub revision: u64,
}

impl Stamp {
    /// The render `session` is about to be shown in `round`.
    pub fn of(round: &Round, session: &Session) -> Self {
        Self {
            round: round.number(),
            revision: session.revision(),
        }
    }
}

/// One pending delivery.
#[derive(Clone, Debug, PartialEq)]
pub enum Dispatch {
    /// A new message, removed again at the next round's cleanup.
    Send {
        to: ChatId,
        notice: Notice,
        keyboard: Keyboard,
    },
    /// Edit the player's bet-status message.
    /// Falls back to a fresh message when there is none or it is gone.
    Status {
        to: ChatId,
        stamp: Stamp,
        handle: Option<MessageId>,
        notice: Notice,
        keyboard: Keyboard,
    },
    /// Remove a message left over from an earlier round.
    Delete { to: ChatId, handle: MessageId },
}

impl Dispatch {
    pub fn recipient(&self) -> ChatId {
        match self {
            Dispatch::Send { to, .. } => *to,
            Dispatch::Status { to, .. } => *to,
            Dispatch::Delete { to, .. } => *to,
        }
    }
    pub fn notice(&self) -> Option<&Notice> {
        match self {
            Dispatch::Send { notice, .. } => Some(notice),
            Dispatch::Status { notice, .. } => Some(notice),
            Dispatch::Delete { .. } => None,
        }
    }
}

/// Deliveries collected under the state lock, performed after it is released.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Outbox(Vec<Dispatch>);

impl Outbox {
    /// A single plain reply.
    pub fn reply(to: ChatId, notice: Notice) -> Self {
        let mut outbox = Self::default();
        outbox.send(to, notice);
        outbox
    }
    pub fn send(&mut self, to: ChatId, notice: Notice) {
        self.send_with(to, notice, Keyboard::None);
    }
    pub fn send_with(&mut self, to: ChatId, notice: Notice, keyboard: Keyboard) {
        self.0.push(Dispatch::Send {
            to,
            notice,
            keyboard,
        });
    }
    pub fn status(
        &mut self,
        to: ChatId,
        stamp: Stamp,
        handle: Option<MessageId>,
        notice: Notice,
        keyboard: Keyboard,
    ) {
        self.0.push(Dispatch::Status {
            to,
            stamp,
            handle,
            notice,
            keyboard,
        });
    }
    pub fn delete(&mut self, to: ChatId, handle: MessageId) {
        self.0.push(Dispatch::Delete { to, handle });
    }
    /// Sends `notice` to every session with notifications on.
    pub fn broadcast(&mut self, sessions: &Sessions, notice: Notice) {
        sessions
            .subscribers()
            .into_iter()
            .for_each(|to| self.send(to, notice.clone()));
    }
    pub fn len(&self) -> usize {
        self.0.len()
    }
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
    pub fn iter(&self) -> impl Iterator<Item = &Dispatch> {
        self.0.iter()
    }
    /// Notices addressed to `chat`, in order.
    pub fn notices(&self, chat: ChatId) -> Vec<&Notice> {
        self.iter()
            .filter(|d| d.recipient() == chat)
            .filter_map(Dispatch::notice)
            .collect()
    }
    /// Splits into per-recipient batches, keeping each recipient's order.
    pub fn batches(self) -> Vec<(ChatId, Vec<Dispatch>)> {
        let mut index = std::collections::HashMap::<ChatId, usize>::new();
        let mut batches = Vec::<(ChatId, Vec<Dispatch>)>::new();
        for dispatch in self.0 {
            let to = dispatch.recipient();
            match index.get(&to) {
                Some(&i) => batches[i].1.push(dispatch),
                None => {
                    index.insert(to, batches.len());
                    batches.push((to, vec![dispatch]));
                }
            }
        }
        batches
    }
}
