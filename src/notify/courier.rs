use super::*;
use crate::engine::Config;
use crate::state::Context;
use crate::*;
use std::collections::HashMap;
use std::future::Future;
use std::sync::Arc;
use std::sync::Mutex;
use std::time::Duration;

/// Performs outboxes against a [`Notifier`].
///
/// Transient failures are retried with exponential backoff up to a fixed
/// number of attempts; anything else is logged and dropped. Handles of new
/// messages are written back into the owning session under a short write
/// lock, so the courier must never run while the caller holds the state lock.
///
/// Bet-status renders are latest-wins per recipient: each attempt holds
/// the recipient's gate and is dropped once the session has a newer render.
#[derive(Clone)]
pub struct Courier {
    notifier: Arc<dyn Notifier>,
    context: Context,
    attempts: u32,
    backoff: Duration,
    gates: Arc<Mutex<HashMap<ChatId, Arc<tokio::sync::Mutex<()>>>>>,
}

impl Courier {
    pub fn new(notifier: Arc<dyn Notifier>, context: Context, config: &Config) -> Self {
        Self {
            notifier,
            context,
            attempts: config.attempts.max(1),
            backoff: config.backoff,
            gates: Arc::default(),
        }
    }
    /// Delivers every dispatch. Recipients proceed concurrently,
    /// each recipient's dispatches in order.
    pub async fn deliver(&self, outbox: Outbox) {
        if outbox.is_empty() {
            return;
        }
        log::trace!("[courier] delivering {} dispatches", outbox.len());
        futures::future::join_all(
            outbox
                .batches()
                .into_iter()
                .map(|(chat, batch)| self.deliver_to(chat, batch)),
        )
        .await;
    }
    /// Delivers in a background task. The caller does not wait on the channel.
    pub fn dispatch(&self, outbox: Outbox) {
        if outbox.is_empty() {
            return;
        }
        let courier = self.clone();
        tokio::spawn(async move { courier.deliver(outbox).await });
    }
}

impl Courier {
    async fn deliver_to(&self, chat: ChatId, batch: Vec<Dispatch>) {
        for dispatch in batch {
            match dispatch {
                Dispatch::Send {
                    notice, keyboard, ..
                } => self.post(chat, &notice.to_string(), keyboard).await,
                Dispatch::Status {
                    stamp,
                    handle,
                    notice,
                    keyboard,
                    ..
                } => {
                    self.status(chat, stamp, handle, &notice.to_string(), keyboard)
                        .await
                }
                Dispatch::Delete { handle, .. } => self.erase(chat, handle).await,
            }
        }
    }
    async fn post(&self, chat: ChatId, text: &str, keyboard: Keyboard) {
        match self
            .retry("send", chat, move || self.notifier.send(chat, text, keyboard))
            .await
        {
            Ok(handle) => self.track(chat, handle, None).await,
            Err(e) => log::warn!("[courier] dropped message to {}: {}", chat, e),
        }
    }
    async fn status(
        &self,
        chat: ChatId,
        stamp: Stamp,
        handle: Option<MessageId>,
        text: &str,
        keyboard: Keyboard,
    ) {
        let gate = &self.gate(chat);
        match self
            .retry("status", chat, move || {
                self.render(gate, chat, stamp, handle, text, keyboard)
            })
            .await
        {
            Ok(()) => {}
            Err(DeliveryError::Superseded) => {
                log::trace!("[courier] status {} of {} superseded", stamp.revision, chat)
            }
            Err(e) => log::warn!("[courier] dropped status for {}: {}", chat, e),
        }
    }
    /// One attempt at showing a status render. Edits the current status
    /// message in place, or sends a new one when it is missing or gone.
    async fn render(
        &self,
        gate: &tokio::sync::Mutex<()>,
        chat: ChatId,
        stamp: Stamp,
        handle: Option<MessageId>,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<(), DeliveryError> {
        let _turn = gate.lock().await;
        let handle = self.latest(chat, stamp).await?.or(handle);
        if let Some(handle) = handle {
            match self.notifier.edit(chat, handle, text, keyboard).await {
                Err(e) if e.is_missing() => {
                    log::debug!("[courier] status {} of {} is gone, resending", handle, chat)
                }
                result => return result,
            }
        }
        let handle = self.notifier.send(chat, text, keyboard).await?;
        self.track(chat, handle, Some(stamp.round)).await;
        Ok(())
    }
    /// The status handle a render should edit, unless a newer render exists.
    async fn latest(&self, chat: ChatId, stamp: Stamp) -> Result<Option<MessageId>, DeliveryError> {
        let state = self.context.read().await;
        match state.sessions.get(chat) {
            None => Ok(None),
            Some(_) if state.round.number() != stamp.round => Err(DeliveryError::Superseded),
            Some(session) if session.revision() != stamp.revision => Err(DeliveryError::Superseded),
            Some(session) => Ok(session.status()),
        }
    }
    fn gate(&self, chat: ChatId) -> Arc<tokio::sync::Mutex<()>> {
        self.gates
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .entry(chat)
            .or_default()
            .clone()
    }
    async fn erase(&self, chat: ChatId, handle: MessageId) {
        match self
            .retry("delete", chat, move || self.notifier.delete(chat, handle))
            .await
        {
            Ok(()) => {}
            Err(e) if e.is_missing() => {}
            Err(e) => log::warn!("[courier] failed to delete {} for {}: {}", handle, chat, e),
        }
    }
    /// Records a delivered handle. Status handles only stick to the round
    /// they were rendered for; late ones are still cleaned up.
    async fn track(&self, chat: ChatId, handle: MessageId, status: Option<u64>) {
        let mut state = self.context.write().await;
        let current = state.round.number();
        if let Some(session) = state.sessions.get_mut(chat) {
            match status {
                Some(round) if round == current => session.set_status(handle),
                _ => session.track(handle),
            }
        }
    }
    async fn retry<T, F, Fut>(&self, op: &str, chat: ChatId, mut f: F) -> Result<T, DeliveryError>
    where
        F: FnMut() -> Fut,
        Fut: Future<Output = Result<T, DeliveryError>>,
    {
        let mut backoff = self.backoff;
        let mut attempt = 1;
        loop {
            match f().await {
                Ok(value) => return Ok(value),
                Err(e) if e.is_transient() && attempt < self.attempts => {
                    log::warn!(
                        "[courier] {} to {} failed (attempt {}/{}): {}. retrying",
                        op,
                        chat,
                        attempt,
                        self.attempts,
                        e
                    );
                    tokio::time::sleep(backoff).await;
                    backoff *= 2;
                    attempt += 1;
                }
                Err(e) if e.is_transient() => {
                    log::warn!("[courier] {} to {} failed after {} attempts", op, chat, attempt);
                    return Err(e);
                }
                Err(e) => return Err(e),
            }
        }
    }
}
