//! Message Repository

use super::{RepoError, RepoResult};
use shared::models::{Message, MessageStatus, MessageWithSender};
use sqlx::SqlitePool;

const MESSAGE_SELECT: &str = "SELECT id, message_code, user_id, subject, body, admin_response, \
     status, created_at, updated_at FROM admin_messages";

const MESSAGE_WITH_SENDER_SELECT: &str = "SELECT m.id, m.message_code, m.user_id, \
     u.first_name || ' ' || u.last_name AS sender_name, u.email AS sender_email, m.subject, \
     m.body, m.admin_response, m.status, m.created_at, m.updated_at \
     FROM admin_messages m JOIN users u ON m.user_id = u.id";

pub async fn create(
    pool: &SqlitePool,
    user_id: i64,
    subject: &str,
    body: &str,
) -> RepoResult<Message> {
    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    let message_code = shared::util::display_code("MSG");
    sqlx::query(
        "INSERT INTO admin_messages (id, message_code, user_id, subject, body, status, \
         created_at, updated_at) VALUES (?, ?, ?, ?, ?, 'unread', ?, ?)",
    )
    .bind(id)
    .bind(&message_code)
    .bind(user_id)
    .bind(subject)
    .bind(body)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await?;
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create message".into()))
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<Message>> {
    let sql = format!("{MESSAGE_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, Message>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// One customer's own messages, newest first.
pub async fn find_by_user(pool: &SqlitePool, user_id: i64) -> RepoResult<Vec<Message>> {
    let sql = format!("{MESSAGE_SELECT} WHERE user_id = ? ORDER BY created_at DESC");
    let rows = sqlx::query_as::<_, Message>(&sql)
        .bind(user_id)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Admin inbox, optionally filtered by status, newest first.
pub async fn find_all(
    pool: &SqlitePool,
    status: Option<MessageStatus>,
) -> RepoResult<Vec<MessageWithSender>> {
    let sql = format!(
        "{MESSAGE_WITH_SENDER_SELECT} WHERE (?1 IS NULL OR m.status = ?1) \
         ORDER BY m.created_at DESC"
    );
    let rows = sqlx::query_as::<_, MessageWithSender>(&sql)
        .bind(status)
        .fetch_all(pool)
        .await?;
    Ok(rows)
}

/// Store the admin response and force the status to `replied`.
pub async fn respond(pool: &SqlitePool, id: i64, response: &str) -> RepoResult<Message> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE admin_messages SET admin_response = ?, status = 'replied', updated_at = ? \
         WHERE id = ?",
    )
    .bind(response)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Message {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Message {id}")))
}

/// Explicit status override (admin only at the API layer).
pub async fn update_status(
    pool: &SqlitePool,
    id: i64,
    status: MessageStatus,
) -> RepoResult<Message> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE admin_messages SET status = ?, updated_at = ? WHERE id = ?")
        .bind(status)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("Message {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("Message {id}")))
}
