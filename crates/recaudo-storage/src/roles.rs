use recaudo_core::model::{NewRole, Role, UpdateRole};
use sqlx::PgPool;

use crate::StorageError;

const ENTITY: &str = "role";

pub async fn create(pool: &PgPool, new: &NewRole) -> Result<Role, StorageError> {
    let row = sqlx::query_as::<_, Role>(
        "INSERT INTO roles (name, description) VALUES ($1, $2) RETURNING *",
    )
    .bind(&new.name)
    .bind(&new.description)
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn find_all(pool: &PgPool) -> Result<Vec<Role>, StorageError> {
    let rows =
        sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE deleted_at IS NULL ORDER BY name")
            .fetch_all(pool)
            .await?;
    Ok(rows)
}

pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Role, StorageError> {
    sqlx::query_as::<_, Role>("SELECT * FROM roles WHERE id = $1 AND deleted_at IS NULL")
        .bind(id)
        .fetch_optional(pool)
        .await?
        .ok_or_else(|| StorageError::not_found(ENTITY, id))
}

pub async fn update(pool: &PgPool, id: i32, changes: UpdateRole) -> Result<Role, StorageError> {
    let current = find_by_id(pool, id).await?;
    let row = sqlx::query_as::<_, Role>(
        r#"
        UPDATE roles
           SET name = $2, description = $3, updated_at = NOW()
         WHERE id = $1
        RETURNING *
        "#,
    )
    .bind(id)
    .bind(changes.name.unwrap_or(current.name))
    .bind(changes.description.or(current.description))
    .fetch_one(pool)
    .await?;
    Ok(row)
}

pub async fn delete(pool: &PgPool, id: i32) -> Result<(), StorageError> {
    let result =
        sqlx::query("UPDATE roles SET deleted_at = NOW() WHERE id = $1 AND deleted_at IS NULL")
            .bind(id)
            .execute(pool)
            .await?;
    if result.rows_affected() == 0 {
        return Err(StorageError::not_found(ENTITY, id));
    }
    Ok(())
}
