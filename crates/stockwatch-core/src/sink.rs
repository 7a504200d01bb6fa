// ── Notification sink ──

use std::future::Future;
use std::sync::Arc;

use tracing::debug;

use stockwatch_api::{BotClient, ChatId};

use crate::error::CoreError;

/// Outbound messaging transport: the change digest and the status board.
pub trait NotificationSink: Send + Sync {
    /// Post a new message to the channel.
    fn send_message(&self, text: &str) -> impl Future<Output = Result<(), CoreError>> + Send;

    /// Replace the text of an existing channel message.
    fn edit_message(
        &self,
        message_id: i64,
        text: &str,
    ) -> impl Future<Output = Result<(), CoreError>> + Send;
}

/// [`NotificationSink`] backed by a Telegram chat.
pub struct TelegramSink {
    client: Arc<BotClient>,
    chat_id: ChatId,
}

impl TelegramSink {
    pub fn new(client: Arc<BotClient>, chat_id: ChatId) -> Self {
        Self { client, chat_id }
    }

    pub fn chat_id(&self) -> &ChatId {
        &self.chat_id
    }
}

impl NotificationSink for TelegramSink {
    async fn send_message(&self, text: &str) -> Result<(), CoreError> {
        let sent = self.client.send_message(&self.chat_id, text).await?;
        debug!(message_id = sent.message_id, "notification sent");
        Ok(())
    }

    async fn edit_message(&self, message_id: i64, text: &str) -> Result<(), CoreError> {
        match self
            .client
            .edit_message_text(&self.chat_id, message_id, text)
            .await
        {
            Ok(()) => Ok(()),
            Err(e) if e.is_not_modified() => {
                debug!(message_id, "status board already up to date");
                Ok(())
            }
            Err(e) => Err(e.into()),
        }
    }
}
