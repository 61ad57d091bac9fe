use sqlx::{Pool, Sqlite};

use crate::storage::{DB_TABLE_USERS, validate_sqlite_table_schema};
use crate::userdb::{errors::UserError, types::User};

// SQLite implementations
pub(super) async fn create_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        CREATE TABLE IF NOT EXISTS {table_name} (
            email TEXT PRIMARY KEY,
            username TEXT NOT NULL,
            password TEXT NOT NULL,
            created_at TIMESTAMP NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#
    ))
    .execute(pool)
    .await?;

    Ok(())
}

pub(super) async fn validate_user_tables_sqlite(pool: &Pool<Sqlite>) -> Result<(), UserError> {
    let users_table = DB_TABLE_USERS.as_str();

    let expected_columns = vec![
        ("email", "TEXT"),
        ("username", "TEXT"),
        ("password", "TEXT"),
        ("created_at", "TIMESTAMP"),
    ];

    validate_sqlite_table_schema(pool, users_table, &expected_columns, UserError::Storage).await
}

pub(super) async fn get_all_users_sqlite(pool: &Pool<Sqlite>) -> Result<Vec<User>, UserError> {
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

pub(super) async fn find_user_sqlite(
    pool: &Pool<Sqlite>,
    email: &str,
) -> Result<Option<User>, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let user = sqlx::query_as::<_, User>(&format!(
        r#"
        SELECT email, username, password, created_at FROM {table_name} WHERE email = ?
        "#
    ))
    .bind(email)
    .fetch_optional(pool)
    .await?;

    Ok(user)
}

pub(super) async fn insert_user_sqlite(pool: &Pool<Sqlite>, user: &User) -> Result<(), UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    sqlx::query(&format!(
        r#"
        INSERT INTO {table_name} (email, username, password, created_at)
        VALUES (?, ?, ?, ?)
        ON CONFLICT (email) DO UPDATE SET
            username = excluded.username,
            password = excluded.password,
            created_at = excluded.created_at
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

pub(super) async fn update_user_sqlite(pool: &Pool<Sqlite>, user: &User) -> Result<u64, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let result = sqlx::query(&format!(
        r#"
        UPDATE {table_name} SET username = ?, password = ? WHERE email = ?
        "#
    ))
    .bind(&user.name)
    .bind(&user.password)
    .bind(&user.email)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}

pub(super) async fn delete_user_sqlite(pool: &Pool<Sqlite>, email: &str) -> Result<u64, UserError> {
    let table_name = DB_TABLE_USERS.as_str();

    let result = sqlx::query(&format!(
        r#"
        DELETE FROM {table_name} WHERE email = ?
        "#
    ))
    .bind(email)
    .execute(pool)
    .await?;

    Ok(result.rows_affected())
}
