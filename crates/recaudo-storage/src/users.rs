//! User repository. Passwords arrive already hashed; this layer never
//! sees a plaintext credential. A user carries at most one active role
//! through the soft-deletable `user_roles` join.

use recaudo_core::model::{NewUser, UpdateUser, User, UserView};
use recaudo_core::{Page, PageParams};
use sqlx::PgPool;

use crate::StorageError;

const ENTITY: &str = "user";

const USER_WITH_ROLE: &str = r#"
SELECT u.*, r.name AS role
  FROM users u
  LEFT JOIN user_roles ur ON ur.user_id = u.id AND ur.deleted_at IS NULL
  LEFT JOIN roles r ON r.id = ur.role_id AND r.deleted_at IS NULL
"#;

/// Inserts the user row and its optional role join in one transaction,
/// so a failure cannot leave a roleless user behind.
pub async fn create(
    pool: &PgPool,
    new: &NewUser,
    password_hash: &str,
) -> Result<UserView, StorageError> {
    let mut tx = pool.begin().await?;
    let user = sqlx::query_as::<_, User>(
        r#"
        INSERT INTO users
            (first_name, last_name, email, password, profile_image, username, channel_id)
        VALUES ($1, $2, $3, $4, $5, $6, $7)
        RETURNING *
        "#,
    )
    .bind(&new.first_name)
    .bind(&new.last_name)
    .bind(&new.email)
    .bind(password_hash)
    .bind(&new.profile_image)
    .bind(&new.username)
    .bind(new.channel_id)
    .fetch_one(&mut *tx)
    .await?;

    if let Some(role_id) = new.role_id {
        sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
            .bind(user.id)
            .bind(role_id)
            .execute(&mut *tx)
            .await?;
    }
    tx.commit().await?;

    find_by_id(pool, user.id).await
}

pub async fn find_all(pool: &PgPool, params: PageParams) -> Result<Page<UserView>, StorageError> {
    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE deleted_at IS NULL")
        .fetch_one(pool)
        .await?;

    let sql = format!(
        "{USER_WITH_ROLE} WHERE u.deleted_at IS NULL ORDER BY u.created_at DESC LIMIT $1 OFFSET $2"
    );
    let rows = sqlx::query_as::<_, UserView>(&sql)
        .bind(params.limit)
        .bind(params.offset())
        .fetch_all(pool)
        .await?;

    Ok(Page::new(rows, total, params))
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<UserView, StorageError> {
    let sql = format!("{USER_WITH_ROLE} WHERE u.id = $1 AND u.deleted_at IS NULL");
    sqlx::query_as::<_, UserView>(&sql)
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::not_found(ENTITY, id))
}

pub async fn find_by_username(pool: &PgPool, username: &str) -> Result<UserView, StorageError> {
    let sql = format!("{USER_WITH_ROLE} WHERE u.username = $1 AND u.deleted_at IS NULL");
    sqlx::query_as::<_, UserView>(&sql)
        .bind(username)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::not_found(ENTITY, username))
}

/// Partial update. `password_hash`, when present, replaces the stored
/// hash; role reassignment updates the existing active join row in place
/// or inserts one, inside the same transaction as the user write.
pub async fn update(
    pool: &PgPool,
    id: i32,
    changes: UpdateUser,
    password_hash: Option<String>,
) -> Result<UserView, StorageError> {
    let mut tx = pool.begin().await?;

    let current = sqlx::query_as::<_, User>(
        "SELECT * FROM users WHERE id = $1 AND deleted_at IS NULL",
    )
    .bind(id)
    .fetch_optional(&mut *tx)
    .await?
    .ok_or_else(|| StorageError::not_found(ENTITY, id))?;

    sqlx::query(
        r#"
        UPDATE users
           SET first_name = $2,
               last_name = $3,
               email = $4,
               password = $5,
               username = $6,
               profile_image = $7,
               channel_id = $8,
               is_active = $9,
               dark_mode = $10,
               updated_at = NOW()
         WHERE id = $1
        "#,
    )
    .bind(id)
    .bind(changes.first_name.unwrap_or(current.first_name))
    .bind(changes.last_name.unwrap_or(current.last_name))
    .bind(changes.email.unwrap_or(current.email))
    .bind(password_hash.unwrap_or(current.password))
    .bind(changes.username.unwrap_or(current.username))
    .bind(changes.profile_image.or(current.profile_image))
    .bind(changes.channel_id.or(current.channel_id))
    .bind(changes.is_active.unwrap_or(current.is_active))
    .bind(changes.dark_mode.unwrap_or(current.dark_mode))
    .execute(&mut *tx)
    .await?;

    if let Some(role_id) = changes.role_id {
        let existing: Option<i32> = sqlx::query_scalar(
            "SELECT id FROM user_roles WHERE user_id = $1 AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&mut *tx)
        .await?;
        match existing {
            Some(join_id) => {
                sqlx::query("UPDATE user_roles SET role_id = $2 WHERE id = $1")
                    .bind(join_id)
                    .bind(role_id)
                    .execute(&mut *tx)
                    .await?;
            }
            None => {
                sqlx::query("INSERT INTO user_roles (user_id, role_id) VALUES ($1, $2)")
                    .bind(id)
                    .bind(role_id)
                    .execute(&mut *tx)
                    .await?;
            }
        }
    }
    tx.commit().await?;

    find_by_id(pool, id).await
}

/// Soft delete: the row stays, the account is deactivated, and active
/// role joins are retired with it.
pub async fn delete(pool: &PgPool, id: i32) -> Result<(), StorageError> {
    let mut tx = pool.begin().await?;
    let result = sqlx::query(
        r#"
        UPDATE users
           SET deleted_at = NOW(), is_active = FALSE, updated_at = NOW()
         WHERE id = $1 AND deleted_at IS NULL
        "#,
    )
    .bind(id)
    .execute(&mut *tx)
    .await?;
    if result.rows_affected() == 0 {
        return Err(StorageError::not_found(ENTITY, id));
    }
    sqlx::query("UPDATE user_roles SET deleted_at = NOW() WHERE user_id = $1 AND deleted_at IS NULL")
        .bind(id)
        .execute(&mut *tx)
        .await?;
    tx.commit().await?;
    Ok(())
}
