use super::*;
use crate::*;
use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::AtomicI64;
use std::sync::atomic::Ordering;

/// What a [`Recorder`] saw.
#[derive(Debug, Clone, PartialEq)]
pub enum Record {
    Sent {
        chat: ChatId,
        handle: MessageId,
        text: String,
        keyboard: Keyboard,
    },
    Edited {
        chat: ChatId,
        handle: MessageId,
        text: String,
        keyboard: Keyboard,
    },
    Deleted {
        chat: ChatId,
        handle: MessageId,
    },
}

#[derive(Default)]
struct Log {
    records: Vec<Record>,
    live: Vec<(ChatId, MessageId)>,
    failures: VecDeque<DeliveryError>,
}

/// In-memory [`Notifier`] that keeps every delivery.
/// Failures can be scripted ahead of time with [`Recorder::fail_next`].
#[derive(Default)]
pub struct Recorder {
    log: Mutex<Log>,
    next: AtomicI64,
}

impl Recorder {
    /// Makes the next operation fail with `error`. Queued failures fire in order.
    pub fn fail_next(&self, error: DeliveryError) {
        self.lock().failures.push_back(error);
    }
    pub fn records(&self) -> Vec<Record> {
        self.lock().records.clone()
    }
    /// Texts of every message sent to `chat`, in order.
    pub fn texts(&self, chat: ChatId) -> Vec<String> {
        self.lock()
            .records
            .iter()
            .filter_map(|record| match record {
                Record::Sent { chat: to, text, .. } if *to == chat => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
    /// Every text `chat` was shown, sends and edits alike.
    pub fn seen(&self, chat: ChatId) -> Vec<String> {
        self.lock()
            .records
            .iter()
            .filter_map(|record| match record {
                Record::Sent { chat: to, text, .. } if *to == chat => Some(text.clone()),
                Record::Edited { chat: to, text, .. } if *to == chat => Some(text.clone()),
                _ => None,
            })
            .collect()
    }
    pub fn edits(&self) -> usize {
        self.lock()
            .records
            .iter()
            .filter(|record| matches!(record, Record::Edited { .. }))
            .count()
    }
    pub fn deleted(&self, chat: ChatId) -> Vec<MessageId> {
        self.lock()
            .records
            .iter()
            .filter_map(|record| match record {
                Record::Deleted { chat: to, handle } if *to == chat => Some(*handle),
                _ => None,
            })
            .collect()
    }
    /// Messages still visible to `chat`.
    pub fn live(&self, chat: ChatId) -> usize {
        self.lock().live.iter().filter(|(to, _)| *to == chat).count()
    }
}

impl Recorder {
    fn lock(&self) -> std::sync::MutexGuard<'_, Log> {
        self.log.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
    fn fail(log: &mut Log) -> Result<(), DeliveryError> {
        match log.failures.pop_front() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }
}

#[async_trait::async_trait]
impl Notifier for Recorder {
    async fn send(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<MessageId, DeliveryError> {
        let mut log = self.lock();
        Self::fail(&mut log)?;
        let handle = self.next.fetch_add(1, Ordering::Relaxed) + 1;
        log.live.push((chat, handle));
        log.records.push(Record::Sent {
            chat,
            handle,
            text: text.to_string(),
            keyboard,
        });
        Ok(handle)
    }
    async fn edit(
        &self,
        chat: ChatId,
        handle: MessageId,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<(), DeliveryError> {
        let mut log = self.lock();
        Self::fail(&mut log)?;
        if !log.live.contains(&(chat, handle)) {
            return Err(DeliveryError::NotFound);
        }
        log.records.push(Record::Edited {
            chat,
            handle,
            text: text.to_string(),
            keyboard,
        });
        Ok(())
    }
    async fn delete(&self, chat: ChatId, handle: MessageId) -> Result<(), DeliveryError> {
        let mut log = self.lock();
        Self::fail(&mut log)?;
        match log.live.iter().position(|live| *live == (chat, handle)) {
            None => Err(DeliveryError::NotFound),
            Some(i) => {
                log.live.swap_remove(i);
                log.records.push(Record::Deleted { chat, handle });
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    #[tokio::test]
    async fn handles_are_unique() {
        let recorder = Recorder::default();
        let a = recorder.send(1, "a", Keyboard::None).await.unwrap();
        let b = recorder.send(2, "b", Keyboard::None).await.unwrap();
        assert_ne!(a, b);
        assert_eq!(recorder.texts(1), vec!["a".to_string()]);
    }
    #[tokio::test]
    async fn deleted_messages_cannot_be_edited() {
        let recorder = Recorder::default();
        let handle = recorder.send(1, "a", Keyboard::None).await.unwrap();
        recorder.delete(1, handle).await.unwrap();
        assert_eq!(
            recorder.edit(1, handle, "b", Keyboard::None).await,
            Err(DeliveryError::NotFound)
        );
        assert_eq!(recorder.delete(1, handle).await, Err(DeliveryError::NotFound));
        assert_eq!(recorder.live(1), 0);
    }
    #[tokio::test]
    async fn scripted_failures_fire_once() {
        let recorder = Recorder::default();
        recorder.fail_next(DeliveryError::Gateway);
        assert_eq!(
            recorder.send(1, "a", Keyboard::None).await,
            Err(DeliveryError::Gateway)
        );
        assert!(recorder.send(1, "a", Keyboard::None).await.is_ok());
    }
}
