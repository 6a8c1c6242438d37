//! Customer-to-admin Message Model

use serde::{Deserialize, Serialize};

/// Message inbox status
///
/// Normal lifecycle only moves forward (`unread → read → replied`);
/// admins may force-set any state via an explicit status update.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum MessageStatus {
    Unread,
    Read,
    Replied,
}

impl MessageStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageStatus::Unread => "unread",
            MessageStatus::Read => "read",
            MessageStatus::Replied => "replied",
        }
    }
}

impl std::fmt::Display for MessageStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Message entity
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Message {
    pub id: i64,
    pub message_code: String,
    pub user_id: i64,
    pub subject: String,
    pub body: String,
    pub admin_response: Option<String>,
    pub status: MessageStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Message joined with sender display fields (admin inbox)
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct MessageWithSender {
    pub id: i64,
    pub message_code: String,
    pub user_id: i64,
    pub sender_name: String,
    pub sender_email: String,
    pub subject: String,
    pub body: String,
    pub admin_response: Option<String>,
    pub status: MessageStatus,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Create message payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageCreate {
    pub subject: String,
    pub message_content: String,
}

/// Admin response payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageRespond {
    pub response: String,
}

/// Explicit status override request (admin)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MessageStatusUpdate {
    pub status: MessageStatus,
}
