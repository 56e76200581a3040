use anyhow::Result;
use chrono::Utc;
use sea_orm::{ConnectionTrait, DatabaseBackend, Statement};

use super::jwt;

/// Store a freshly issued refresh token; only its hash hits the database
pub async fn store(conn: &impl ConnectionTrait, user_id: &str, token: &str) -> Result<()> {
    let token_id = uuid::Uuid::new_v4().to_string();
    let expires_at = jwt::calculate_refresh_token_expiration();
    let created_at = Utc::now().to_rfc3339();

    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "INSERT INTO sys_refresh_tokens (id, user_id, token_hash, expires_at, created_at)
         VALUES (?, ?, ?, ?, ?)",
        [
            token_id.into(),
            user_id.to_string().into(),
            hash_token(token).into(),
            expires_at.into(),
            created_at.into(),
        ],
    ))
    .await?;

    Ok(())
}

/// Owner of a live (unexpired, unrevoked) refresh token
pub async fn find_user_id(conn: &impl ConnectionTrait, token: &str) -> Result<Option<String>> {
    let now = Utc::now().to_rfc3339();

    let result = conn
        .query_one(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "SELECT user_id FROM sys_refresh_tokens
             WHERE token_hash = ? AND expires_at > ? AND revoked_at IS NULL",
            [hash_token(token).into(), now.into()],
        ))
        .await?;

    match result {
        Some(row) => Ok(Some(row.try_get("", "user_id")?)),
        None => Ok(None),
    }
}

pub async fn revoke(conn: &impl ConnectionTrait, token: &str) -> Result<bool> {
    let revoked_at = Utc::now().to_rfc3339();

    let result = conn
        .execute(Statement::from_sql_and_values(
            DatabaseBackend::Sqlite,
            "UPDATE sys_refresh_tokens SET revoked_at = ?
             WHERE token_hash = ? AND revoked_at IS NULL",
            [revoked_at.into(), hash_token(token).into()],
        ))
        .await?;

    Ok(result.rows_affected() > 0)
}

/// Revoke every token of a user, e.g. when the account is deleted
pub async fn revoke_all_for_user(conn: &impl ConnectionTrait, user_id: &str) -> Result<()> {
    conn.execute(Statement::from_sql_and_values(
        DatabaseBackend::Sqlite,
        "UPDATE sys_refresh_tokens SET revoked_at = ?
         WHERE user_id = ? AND revoked_at IS NULL",
        [Utc::now().to_rfc3339().into(), user_id.to_string().into()],
    ))
    .await?;
    Ok(())
}

fn hash_token(token: &str) -> String {
    use sha2::{Digest, Sha256};
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}
