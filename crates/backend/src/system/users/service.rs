use chrono::Utc;
use contracts::enums::UserRole;
use contracts::system::auth::TokenClaims;
use contracts::system::users::{ChangePasswordDto, CreateUserDto, UpdateUserDto, User};
use sea_orm::ConnectionTrait;

use super::repository;
use crate::shared::error::{ServiceError, ServiceResult};
use crate::system::auth::{password, refresh_token};

const ELEMENT: &str = "User";

fn validate_email(email: &Option<String>) -> ServiceResult<()> {
    if let Some(email) = email {
        if !email.trim().is_empty() && !email.contains('@') {
            return Err(ServiceError::validation("Invalid email format"));
        }
    }
    Ok(())
}

/// Create a new user
pub async fn create(
    conn: &impl ConnectionTrait,
    dto: CreateUserDto,
    created_by: Option<String>,
) -> ServiceResult<User> {
    let username = dto.username.trim().to_string();
    if username.is_empty() {
        return Err(ServiceError::validation("Username cannot be empty"));
    }

    if repository::get_by_username(conn, &username).await?.is_some() {
        return Err(ServiceError::conflict(format!(
            "Username '{}' already exists",
            username
        )));
    }

    validate_email(&dto.email)?;
    password::validate_password_strength(&dto.password).map_err(ServiceError::Validation)?;

    let password_hash = password::hash_password(&dto.password)?;
    let now = Utc::now().to_rfc3339();

    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        username,
        email: dto.email.filter(|e| !e.trim().is_empty()),
        full_name: dto.full_name,
        role: dto.role,
        phone: dto.phone,
        is_active: true,
        created_at: now.clone(),
        updated_at: now,
        last_login_at: None,
        created_by,
    };

    repository::create_with_password(conn, &user, &password_hash).await?;
    tracing::info!("Created {} user '{}'", user.role, user.username);

    Ok(user)
}

pub async fn update(conn: &impl ConnectionTrait, id: &str, dto: UpdateUserDto) -> ServiceResult<User> {
    let mut user = get(conn, id).await?;

    validate_email(&dto.email)?;

    user.email = dto.email.filter(|e| !e.trim().is_empty());
    user.full_name = dto.full_name;
    user.role = dto.role;
    user.phone = dto.phone;
    user.is_active = dto.is_active;
    user.updated_at = Utc::now().to_rfc3339();

    repository::update(conn, &user).await?;
    if !user.is_active {
        refresh_token::revoke_all_for_user(conn, &user.id).await?;
    }

    Ok(user)
}

pub async fn delete(conn: &impl ConnectionTrait, id: &str, requester_id: &str) -> ServiceResult<()> {
    if id == requester_id {
        return Err(ServiceError::conflict("You cannot delete your own account"));
    }
    if !repository::delete(conn, id).await? {
        return Err(ServiceError::NotFound(ELEMENT));
    }
    refresh_token::revoke_all_for_user(conn, id).await?;
    Ok(())
}

pub async fn get(conn: &impl ConnectionTrait, id: &str) -> ServiceResult<User> {
    repository::get_by_id(conn, id)
        .await?
        .ok_or(ServiceError::NotFound(ELEMENT))
}

pub async fn list(conn: &impl ConnectionTrait, role: Option<UserRole>) -> ServiceResult<Vec<User>> {
    Ok(repository::list(conn, role).await?)
}

/// Change a password. Users change their own (old password required),
/// admins may reset anyone's.
pub async fn change_password(
    conn: &impl ConnectionTrait,
    user_id: &str,
    dto: ChangePasswordDto,
    requester: &TokenClaims,
) -> ServiceResult<()> {
    let user = get(conn, user_id).await?;

    if user.id != requester.sub {
        if !requester.is_admin() {
            return Err(ServiceError::Forbidden);
        }
    } else {
        let old_password = dto
            .old_password
            .as_deref()
            .ok_or_else(|| ServiceError::validation("Old password is required"))?;
        let current_hash = repository::get_password_hash(conn, &user.id)
            .await?
            .ok_or(ServiceError::NotFound(ELEMENT))?;
        if !password::verify_password(old_password, &current_hash)? {
            return Err(ServiceError::validation("Invalid old password"));
        }
    }

    password::validate_password_strength(&dto.new_password).map_err(ServiceError::Validation)?;
    let new_hash = password::hash_password(&dto.new_password)?;
    repository::update_password(conn, &user.id, &new_hash).await?;

    tracing::info!("Password changed for user '{}'", user.username);
    Ok(())
}

/// Verify user credentials (for login). Unknown users, wrong passwords and
/// inactive accounts all look the same to the caller.
pub async fn verify_credentials(
    conn: &impl ConnectionTrait,
    username: &str,
    password: &str,
) -> ServiceResult<User> {
    let user = repository::get_by_username(conn, username.trim())
        .await?
        .ok_or(ServiceError::Unauthorized)?;

    if !user.is_active {
        tracing::warn!("Login attempt for inactive user '{}'", user.username);
        return Err(ServiceError::Unauthorized);
    }

    let password_hash = repository::get_password_hash(conn, &user.id)
        .await?
        .ok_or(ServiceError::Unauthorized)?;

    if !password::verify_password(password, &password_hash)? {
        return Err(ServiceError::Unauthorized);
    }

    if let Err(e) = repository::update_last_login(conn, &user.id).await {
        tracing::warn!("Failed to record last login for '{}': {}", user.username, e);
    }

    Ok(user)
}

/// Check that `user_id`, when set, names an active user holding `role`
pub async fn ensure_role(
    conn: &impl ConnectionTrait,
    user_id: Option<&str>,
    role: UserRole,
) -> ServiceResult<()> {
    let Some(user_id) = user_id else {
        return Ok(());
    };
    match repository::get_by_id(conn, user_id).await? {
        Some(user) if user.role == role => Ok(()),
        Some(user) => Err(ServiceError::validation(format!(
            "User '{}' is not a {}",
            user.username, role
        ))),
        None => Err(ServiceError::validation(format!(
            "Assigned {} does not exist",
            role
        ))),
    }
}
