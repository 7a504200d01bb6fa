// Bot API wire types
//
// Only the fields the watcher reads are modelled; everything else in the
// Telegram payloads is ignored by serde.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Response envelope shared by every Bot API method.
#[derive(Debug, Deserialize)]
pub(crate) struct BotResponse<T> {
    pub ok: bool,
    pub result: Option<T>,
    pub error_code: Option<u16>,
    pub description: Option<String>,
}

/// Target chat: numeric id (groups are negative) or `@channelusername`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ChatId {
    Id(i64),
    Username(String),
}

impl fmt::Display for ChatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Id(id) => write!(f, "{id}"),
            Self::Username(name) => f.write_str(name),
        }
    }
}

impl From<i64> for ChatId {
    fn from(id: i64) -> Self {
        Self::Id(id)
    }
}

impl From<&str> for ChatId {
    fn from(name: &str) -> Self {
        name.parse::<i64>()
            .map_or_else(|_| Self::Username(name.to_owned()), Self::Id)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Chat {
    pub id: i64,
}

/// A message the bot sent (`sendMessage` / `editMessageText` result).
#[derive(Debug, Clone, Deserialize)]
pub struct SentMessage {
    pub message_id: i64,
    pub chat: Chat,
}

/// A message received through `getUpdates`.
#[derive(Debug, Clone, Deserialize)]
pub struct IncomingMessage {
    pub message_id: i64,
    pub chat: Chat,
    #[serde(default)]
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    #[serde(default)]
    pub message: Option<IncomingMessage>,
}

#[derive(Debug, Serialize)]
pub(crate) struct SendMessageRequest<'a> {
    pub chat_id: &'a ChatId,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct EditMessageTextRequest<'a> {
    pub chat_id: &'a ChatId,
    pub message_id: i64,
    pub text: &'a str,
}

#[derive(Debug, Serialize)]
pub(crate) struct GetUpdatesRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub offset: Option<i64>,
    pub timeout: u64,
    pub allowed_updates: &'static [&'static str],
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn chat_id_from_numeric_string() {
        assert_eq!(ChatId::from("-1001234"), ChatId::Id(-1_001_234));
    }

    #[test]
    fn chat_id_from_username() {
        assert_eq!(
            ChatId::from("@restock_alerts"),
            ChatId::Username("@restock_alerts".into())
        );
    }

    #[test]
    fn chat_id_serializes_untagged() {
        let id = serde_json::to_value(ChatId::Id(-42)).unwrap();
        assert_eq!(id, serde_json::json!(-42));
        let name = serde_json::to_value(ChatId::Username("@chan".into())).unwrap();
        assert_eq!(name, serde_json::json!("@chan"));
    }
}
