use serde::{Deserialize, Serialize};

/// Normalized inbound chat event. The gateway client (Discord or otherwise)
/// maps its own message type into this before handing it to the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IncomingMessage {
    pub author_id: String,
    pub is_bot: bool,
    pub content: String,
    pub mentions_bot: bool,
    pub channel_id: String,
    /// Platform message id, when the platform has one; used as the reply
    /// reference.
    pub message_id: Option<String>,
}

impl IncomingMessage {
    /// Create a plain user message for the given author and channel.
    pub fn user(author_id: &str, channel_id: &str, content: impl Into<String>) -> Self {
        Self {
            author_id: author_id.to_string(),
            is_bot: false,
            content: content.into(),
            mentions_bot: false,
            channel_id: channel_id.to_string(),
            message_id: None,
        }
    }

    /// Whether the bot should engage conversationally: an explicit mention
    /// or the bot's name appearing anywhere in the text.
    pub fn addresses_bot(&self, bot_name: &str) -> bool {
        self.mentions_bot || self.content.to_lowercase().contains(&bot_name.to_lowercase())
    }
}

/// Final output of the response pipeline for one turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedResponse {
    pub response: String,
    pub follow_up: Option<String>,
}
