// Telegram Bot API client
//
// Hand-written client for the handful of Bot API methods the watcher needs:
// sending the change digest, editing the pinned status board, and long-polling
// for inbound commands. Every response uses the `{ ok, result }` envelope.

pub mod client;
pub mod models;

pub use client::BotClient;
pub use models::{Chat, ChatId, IncomingMessage, SentMessage, Update};
