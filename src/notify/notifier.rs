use super::*;
use crate::*;

/// Why a delivery failed.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DeliveryError {
    #[error("too many requests")]
    RateLimited,
    #[error("bad gateway")]
    Gateway,
    #[error("message not found")]
    NotFound,
    #[error("rejected by channel: {0}")]
    Rejected(String),
    #[error("superseded by a newer render")]
    Superseded,
}

impl DeliveryError {
    /// Worth retrying after a backoff.
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited | Self::Gateway)
    }
    /// The target message is already gone.
    pub fn is_missing(&self) -> bool {
        matches!(self, Self::NotFound)
    }
}

/// Capability to put text in front of a recipient.
///
/// Implementations wrap a concrete chat channel. The game only ever asks
/// for these three operations and treats every failure as non-fatal.
#[async_trait::async_trait]
pub trait Notifier: Send + Sync {
    /// Delivers a new message and returns its handle.
    async fn send(
        &self,
        chat: ChatId,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<MessageId, DeliveryError>;

    /// Replaces the text and keyboard of a delivered message.
    async fn edit(
        &self,
        chat: ChatId,
        handle: MessageId,
        text: &str,
        keyboard: Keyboard,
    ) -> Result<(), DeliveryError>;

    /// Removes a delivered message.
    async fn delete(&self, chat: ChatId, handle: MessageId) -> Result<(), DeliveryError>;
}
