use sqlx::{Pool, Postgres};

use crate::storage::{DB_TABLE_USERS, validate_postgres_table_schema};
use crate::userdb::{errors::UserError, types::User};

// PostgreSQL implementations
pub(super) async fn create_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            email TEXT PRIMARY KEY,
            username TEXT NOT NULL,
            password TEXT NOT NULL,
            created_at TIMESTAMPTZ NOT NULL DEFAULT now()
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

/// Validates that the users table matches the columns this store reads and writes
pub(super) async fn validate_user_tables_postgres(pool: &Pool<Postgres>) -> Result<(), UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    let expected_columns = vec![
        ("email", "text"),
        ("username", "text"),
        ("password", "text"),
        ("created_at", "timestamp with time zone"),
    ];

    validate_postgres_table_schema(pool, users_table, &expected_columns, UserError::Storage).await
}

pub(super) async fn get_all_users_postgres(pool: &Pool<Postgres>) -> Result<Vec<User>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let users = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT email, username, password, created_at FROM {table_name} ORDER BY email DESC
        "#
    ))
    .fetch_all(pool)
    .await?;

    Ok(users)
}

pub(super) async fn find_user_postgres(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<Option<User>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT email, username, password, created_at FROM {table_name} WHERE email = $1
        "#
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub(super) async fn insert_user_postgres(
    pool: &Pool<Postgres>,
    user: &User,
) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (email, username, password, created_at)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET
            username = EXCLUDED.username,
            password = EXCLUDED.password,
            created_at = EXCLUDED.created_at
        "#
    ))
    .bind(&user.email)
    .bind(&user.name)
    .bind(&user.password)
    .bind(user.created_at)
    .execute(pool)
    .await?;

    Ok(())
}

/// Returns the number of rows changed
pub(super) async fn update_user_postgres(
    pool: &Pool<Postgres>,
    user: &User,
) -> Result<u64, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let result = sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET username = $1, password = $2 WHERE email = $3
        "#
    ))
    .bind(&user.name)
    .bind(&user.password)
    .bind(&user.email)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

/// Returns the number of rows removed
pub(super) async fn delete_user_postgres(
    pool: &Pool<Postgres>,
    email: &str,
) -> Result<u64, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let result = sqlx::query(&format!(
        r#"
        DELETE FROM {table_name} WHERE email = $1
        "#
    ))
    .bind(email)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
