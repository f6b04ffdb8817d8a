//! User Repository
//!
//! Passwords arrive plaintext in payloads and are argon2-hashed here
//! before any write. The hash never leaves this layer except inside the
//! internal [`User`] row type, which handlers map to `UserResponse`.

use super::{RepoError, RepoResult};
use shared::ErrorCode;
use shared::models::{User, UserCreate, UserUpdate};
use sqlx::SqlitePool;

const USER_SELECT: &str = "SELECT id, username, password_hash, display_name, role FROM user";

/// Hash password using argon2
pub fn hash_password(password: &str) -> Result<String, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHasher, SaltString, rand_core::OsRng},
    };

    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();
    let password_hash = argon2.hash_password(password.as_bytes(), &salt)?;
    Ok(password_hash.to_string())
}

/// Verify password using argon2
pub fn verify_password(hash: &str, password: &str) -> Result<bool, argon2::password_hash::Error> {
    use argon2::{
        Argon2,
        password_hash::{PasswordHash, PasswordVerifier},
    };

    let parsed_hash = PasswordHash::new(hash)?;
    Ok(Argon2::default()
        .verify_password(password.as_bytes(), &parsed_hash)
        .is_ok())
}

pub async fn find_all(pool: &SqlitePool) -> RepoResult<Vec<User>> {
    let sql = format!("{USER_SELECT} ORDER BY username");
    let rows = sqlx::query_as::<_, User>(&sql).fetch_all(pool).await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &SqlitePool, id: i64) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE id = ?");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn find_by_username(pool: &SqlitePool, username: &str) -> RepoResult<Option<User>> {
    let sql = format!("{USER_SELECT} WHERE username = ? LIMIT 1");
    let row = sqlx::query_as::<_, User>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?;
    Ok(row)
}

pub async fn create(pool: &SqlitePool, data: UserCreate) -> RepoResult<User> {
    if find_by_username(pool, &data.username).await?.is_some() {
        return Err(RepoError::Business(
            ErrorCode::UsernameTaken,
            format!("Username '{}' already exists", data.username),
        ));
    }

    let password_hash = hash_password(&data.password)
        .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?;

    let id = shared::util::snowflake_id();
    sqlx::query(
        "INSERT INTO user (id, username, password_hash, display_name, role) VALUES (?1, ?2, ?3, ?4, ?5)",
    )
    .bind(id)
    .bind(&data.username)
    .bind(&password_hash)
    .bind(&data.display_name)
    .bind(data.role)
    .execute(pool)
    .await?;

    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::Database("Failed to create user".into()))
}

pub async fn update(pool: &SqlitePool, id: i64, data: UserUpdate) -> RepoResult<User> {
    if let Some(ref new_username) = data.username
        && let Some(existing) = find_by_username(pool, new_username).await?
        && existing.id != id
    {
        return Err(RepoError::Business(
            ErrorCode::UsernameTaken,
            format!("Username '{new_username}' already exists"),
        ));
    }

    let password_hash = match data.password.as_deref() {
        Some(pw) => Some(
            hash_password(pw)
                .map_err(|e| RepoError::Database(format!("Failed to hash password: {e}")))?,
        ),
        None => None,
    };

    let rows = sqlx::query(
        "UPDATE user SET username = COALESCE(?1, username), password_hash = COALESCE(?2, password_hash), display_name = COALESCE(?3, display_name), role = COALESCE(?4, role) WHERE id = ?5",
    )
    .bind(&data.username)
    .bind(&password_hash)
    .bind(&data.display_name)
    .bind(data.role)
    .bind(id)
    .execute(pool)
    .await?;

    if rows.rows_affected() == 0 {
        return Err(RepoError::NotFound(format!("User {id} not found")));
    }
    find_by_id(pool, id)
        .await?
        .ok_or_else(|| RepoError::NotFound(format!("User {id} not found")))
}

pub async fn delete(pool: &SqlitePool, id: i64) -> RepoResult<bool> {
    // Users stay while purchase orders carry their name
    let order_refs: i64 =
        sqlx::query_scalar("SELECT COUNT(*) FROM purchase_order WHERE created_by = ?")
            .bind(id)
            .fetch_one(pool)
            .await?;
    if order_refs > 0 {
        return Err(RepoError::Business(
            ErrorCode::UserInUse,
            format!("Cannot delete user: {order_refs} order(s) reference them"),
        ));
    }

    let rows = sqlx::query("DELETE FROM user WHERE id = ?")
        .bind(id)
        .execute(pool)
        .await?;
    Ok(rows.rows_affected() > 0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::test_support::test_pool;
    use shared::models::UserRole;

    fn captain() -> UserCreate {
        UserCreate {
            username: "captain.smith".into(),
            password: "password123".into(),
            display_name: "Captain John Smith".into(),
            role: UserRole::Admin,
        }
    }

    #[tokio::test]
    async fn create_hashes_password() {
        let pool = test_pool().await;
        let user = create(&pool, captain()).await.unwrap();
        assert_ne!(user.password_hash, "password123");
        assert!(verify_password(&user.password_hash, "password123").unwrap());
        assert!(!verify_password(&user.password_hash, "wrong").unwrap());
    }

    #[tokio::test]
    async fn duplicate_username_is_rejected() {
        let pool = test_pool().await;
        create(&pool, captain()).await.unwrap();
        let err = create(&pool, captain()).await.unwrap_err();
        assert!(matches!(
            err,
            RepoError::Business(ErrorCode::UsernameTaken, _)
        ));
    }

    #[tokio::test]
    async fn update_rehashes_new_password() {
        let pool = test_pool().await;
        let user = create(&pool, captain()).await.unwrap();
        let updated = update(
            &pool,
            user.id,
            UserUpdate {
                password: Some("new-secret".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert!(verify_password(&updated.password_hash, "new-secret").unwrap());
        assert!(!verify_password(&updated.password_hash, "password123").unwrap());
    }

    #[tokio::test]
    async fn delete_refuses_while_orders_reference_the_user() {
        let pool = test_pool().await;
        let user = create(&pool, captain()).await.unwrap();
        sqlx::query(
            "INSERT INTO purchase_order (id, order_no, status, created_by, created_at) VALUES (1, 'ORD-2026-001', 'pending-quotes', ?, 0)",
        )
        .bind(user.id)
        .execute(&pool)
        .await
        .unwrap();

        let err = delete(&pool, user.id).await.unwrap_err();
        assert!(matches!(err, RepoError::Business(ErrorCode::UserInUse, _)));
        assert!(find_by_id(&pool, user.id).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn delete_unreferenced_user_succeeds() {
        let pool = test_pool().await;
        let user = create(&pool, captain()).await.unwrap();
        assert!(delete(&pool, user.id).await.unwrap());
        assert!(find_by_id(&pool, user.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn update_can_keep_own_username() {
        let pool = test_pool().await;
        let user = create(&pool, captain()).await.unwrap();
        let updated = update(
            &pool,
            user.id,
            UserUpdate {
                username: Some("captain.smith".into()),
                display_name: Some("Capt. J. Smith".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
        assert_eq!(updated.display_name, "Capt. J. Smith");
    }
}
