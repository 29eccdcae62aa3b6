use serde::{Deserialize, Serialize};

/// Telegram delivery credentials, as entered by the operator.
///
/// Stored verbatim; never validated beyond non-emptiness.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationTarget {
    pub bot_token: String,
    pub chat_id: String,
}

impl NotificationTarget {
    #[must_use]
    pub const fn new(bot_token: String, chat_id: String) -> Self {
        Self { bot_token, chat_id }
    }

    /// Both credentials present and non-empty.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        !self.bot_token.trim().is_empty() && !self.chat_id.trim().is_empty()
    }
}
