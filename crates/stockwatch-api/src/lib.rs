// stockwatch-api: Async HTTP clients for the inventory endpoint and the Telegram Bot API

pub mod bot;
pub mod error;
pub mod inventory;
pub mod transport;

pub use bot::client::DEFAULT_API_BASE;
pub use bot::{BotClient, ChatId, IncomingMessage, SentMessage, Update};
pub use error::Error;
pub use inventory::{InventoryClient, InventoryDocument};
pub use transport::TransportConfig;
