//! User Repository

use super::{RepoError, RepoResult, map_unique_violation};
use shared::models::{User, UserCreate, UserProfileUpdate, UserRole};
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT id, username, email, password_hash, first_name, last_name, \
     phone, role, is_active, created_at, updated_at FROM users";

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_email(pool: &SqlitePool, email: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE email = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(email)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

/// Create an account. The caller supplies the already-hashed password.
///
/// Email and username are checked up front for a precise error message;
/// the UNIQUE columns remain the authoritative guard underneath.
pub async fn create(
    pool: &SqlitePool,
    data: &UserCreate,
    password_hash: &str,
    role: UserRole,
) -> RepoResult<User> {
    if find_by_email(pool, &data.email).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Email '{}' is already registered",
            data.email
        )));
    }
    if find_by_username(pool, &data.username).await?.is_some() {
        return Err(RepoError::Duplicate(format!(
            "Username '{}' is already taken",
            data.username
        )));
    }

    let now = shared::util::now_millis();
    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO users (id, username, email, password_hash, first_name, last_name, phone, \
         role, is_active, created_at, updated_at) VALUES (?, ?, ?, ?, ?, ?, ?, ?, 1, ?, ?)",
    )
    .bind(id)
    .bind(&data.username)
    .bind(&data.email)
    .bind(password_hash)
    .bind(&data.first_name)
    .bind(&data.last_name)
    .bind(&data.phone)
    .bind(role)
    .bind(now)
    .bind(now)
    .execute(pool)
    .await
    .map_err(|e| map_unique_violation(e, "Email or username is already registered"))?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

/// Apply a typed profile patch; absent fields keep their current value.
pub async fn update_profile(
    pool: &SqlitePool,
    id: i64,
    patch: &UserProfileUpdate,
) -> RepoResult<User> {
    let now = shared::util::now_millis();
    let rows = sqlx::query(
        "UPDATE users SET first_name = COALESCE(?1, first_name), \
         last_name = COALESCE(?2, last_name), phone = COALESCE(?3, phone), \
         updated_at = ?4 WHERE id = ?5",
    )
    .bind(&patch.first_name)
    .bind(&patch.last_name)
    .bind(&patch.phone)
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id}")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id}")))
}

pub async fn update_password(pool: &SqlitePool, id: i64, password_hash: &str) -> RepoResult<()> {
    let now = shared::util::now_millis();
    let rows = sqlx::query("UPDATE users SET password_hash = ?, updated_at = ? WHERE id = ?")
        .bind(password_hash)
        .bind(now)
        .bind(id)
        .execute(pool)
        .await?;
    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id}")));
    }
    Ok(())
}
