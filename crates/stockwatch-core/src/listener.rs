// ── Inbound command listener ──
//
// Long-polls the Bot API for messages and answers the welcome commands.
// Shares no state with the poll loop.

use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use stockwatch_api::{BotClient, ChatId, Update};

use crate::error::CoreError;

/// Server-side long-poll window for `getUpdates`.
pub const LONG_POLL_SECS: u64 = 20;

/// Commands the bot answers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BotCommand {
    Start,
    Help,
}

impl BotCommand {
    /// Parse a message text such as `/start`, `/help@my_bot` or `/start payload`.
    pub fn parse(text: &str) -> Option<Self> {
        let word = text.split_whitespace().next()?;
        let command = word.strip_prefix('/')?;
        let name = command.split('@').next().unwrap_or(command);
        match name.to_ascii_lowercase().as_str() {
            "start" => Some(Self::Start),
            "help" => Some(Self::Help),
            _ => None,
        }
    }
}

pub struct CommandListener {
    client: Arc<BotClient>,
    welcome_text: String,
    offset: Option<i64>,
    long_poll_secs: u64,
    retry_delay: Duration,
}

impl CommandListener {
    pub fn new(client: Arc<BotClient>, welcome_text: String, retry_delay: Duration) -> Self {
        Self {
            client,
            welcome_text,
            offset: None,
            long_poll_secs: LONG_POLL_SECS,
            retry_delay,
        }
    }

    /// Override the long-poll window (`0` makes `getUpdates` return at once).
    pub fn with_long_poll(mut self, secs: u64) -> Self {
        self.long_poll_secs = secs;
        self
    }

    /// Offset of the next update to request.
    pub fn offset(&self) -> Option<i64> {
        self.offset
    }

    /// Fetch one batch of updates and answer any commands in it.
    ///
    /// Returns the number of replies sent. A failed reply is logged and
    /// does not prevent the offset from advancing past its update.
    pub async fn poll_once(&mut self) -> Result<usize, CoreError> {
        let updates = self
            .client
            .get_updates(self.offset, self.long_poll_secs)
            .await?;

        let mut replies = 0;
        for update in &updates {
            self.offset = Some(update.update_id + 1);
            if self.answer(update).await {
                replies += 1;
            }
        }
        Ok(replies)
    }

    /// Answer commands until `cancel` fires.
    pub async fn run(mut self, cancel: CancellationToken) {
        info!("command listener started");
        loop {
            let delay = tokio::select! {
                biased;
                () = cancel.cancelled() => break,
                result = self.poll_once() => match result {
                    Ok(_) => None,
                    Err(e) => {
                        warn!(error = %e, "failed to fetch bot updates");
                        Some(self.retry_delay)
                    }
                },
            };

            if let Some(delay) = delay {
                tokio::select! {
                    biased;
                    () = cancel.cancelled() => break,
                    () = tokio::time::sleep(delay) => {}
                }
            }
        }
        info!("command listener stopped");
    }

    async fn answer(&self, update: &Update) -> bool {
        let Some(message) = &update.message else {
            return false;
        };
        let Some(command) = message.text.as_deref().and_then(BotCommand::parse) else {
            return false;
        };

        debug!(?command, chat_id = message.chat.id, "answering command");
        let chat_id = ChatId::Id(message.chat.id);
        match self.client.send_message(&chat_id, &self.welcome_text).await {
            Ok(_) => true,
            Err(e) => {
                warn!(error = %e, chat_id = message.chat.id, "failed to answer command");
                false
            }
        }
    }
}
