use crate::domain::error::{AppError, Result};

use sqlx::sqlite::{
    SqliteConnectOptions, SqliteJournalMode, SqlitePool, SqlitePoolOptions, SqliteSynchronous,
};
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

use tracing::warn;

const PLANIX_SCHEMA: &str = include_str!("../../../resources/planix/schema.sql");

const PLANIX_SCHEMA_VERSION: i32 = 1;
const ENV_DB_ALLOW_RECREATE: &str = "PLANIX_DB_ALLOW_RECREATE";

/// Opens (creating if needed) the Planix database and brings its schema up
/// to date.
///
/// Schema versioning uses PRAGMA user_version. The schema is applied
/// additively; dropping and recreating on a version mismatch only happens
/// when PLANIX_DB_ALLOW_RECREATE is set, so a valuable database is never
/// lost by accident. A database newer than this build fails fast.
pub async fn init_db(db_path: &Path) -> Result<SqlitePool> {
    let current_version = get_user_version(db_path).await.unwrap_or(0);

    if current_version != 0 && current_version < PLANIX_SCHEMA_VERSION && allow_recreate() {
        warn!(
            current_version,
            target_version = PLANIX_SCHEMA_VERSION,
            "Recreating Planix database (PLANIX_DB_ALLOW_RECREATE set)"
        );
        recreate_db(db_path)?;
    }

    let pool = connect_pool(db_path, true).await?;

    let effective_version = read_user_version(&pool).await?;
    if effective_version > PLANIX_SCHEMA_VERSION {
        return Err(AppError::DatabaseError(format!(
            "Database schema too new: db user_version={} > app supported_version={}",
            effective_version, PLANIX_SCHEMA_VERSION
        )));
    }

    apply_schema(&pool).await?;
    set_user_version(&pool, PLANIX_SCHEMA_VERSION).await?;

    sqlx::query("SELECT 1")
        .execute(&pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Database health check failed: {}", e)))?;

    Ok(pool)
}

async fn apply_schema(pool: &SqlitePool) -> Result<()> {
    for stmt in split_sql_statements(PLANIX_SCHEMA) {
        let sql = stmt.trim();
        if sql.is_empty() {
            continue;
        }
        sqlx::query(sql).execute(pool).await.map_err(|e| {
            AppError::DatabaseError(format!("Failed to apply schema statement: {}", e))
        })?;
    }
    Ok(())
}

fn split_sql_statements(schema: &str) -> Vec<&str> {
    schema.split(';').collect()
}

async fn connect_pool(db_path: &Path, create_if_missing: bool) -> Result<SqlitePool> {
    let db_url = db_path_to_url(db_path)?;
    let options = SqliteConnectOptions::from_str(&db_url)
        .map_err(|e| AppError::DatabaseError(format!("Failed to parse database URL: {}", e)))?
        .create_if_missing(create_if_missing)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .foreign_keys(true)
        .busy_timeout(Duration::from_secs(5));

    SqlitePoolOptions::new()
        .max_connections(4)
        .acquire_timeout(Duration::from_secs(5))
        .connect_with(options)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to connect to database: {}", e)))
}

fn db_path_to_url(db_path: &Path) -> Result<String> {
    let db_path_str = db_path
        .to_str()
        .ok_or_else(|| AppError::DatabaseError("Database path is not valid UTF-8".to_string()))?;
    Ok(format!("sqlite://{}", db_path_str.replace('\\', "/")))
}

fn allow_recreate() -> bool {
    match std::env::var(ENV_DB_ALLOW_RECREATE) {
        Ok(val) => {
            let v = val.trim().to_ascii_lowercase();
            v == "1" || v == "true" || v == "yes" || v == "y"
        }
        Err(_) => false,
    }
}

fn recreate_db(db_path: &Path) -> Result<()> {
    if db_path.exists() {
        std::fs::remove_file(db_path)
            .map_err(|e| AppError::DatabaseError(format!("Failed to remove database: {}", e)))?;
    }
    Ok(())
}

async fn get_user_version(db_path: &Path) -> Result<i32> {
    if !db_path.exists() {
        return Ok(0);
    }
    let pool = connect_pool(db_path, false).await?;
    read_user_version(&pool).await
}

async fn read_user_version(pool: &SqlitePool) -> Result<i32> {
    sqlx::query_scalar("PRAGMA user_version")
        .fetch_one(pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to read PRAGMA user_version: {}", e)))
}

async fn set_user_version(pool: &SqlitePool, version: i32) -> Result<()> {
    let sql = format!("PRAGMA user_version = {}", version);
    sqlx::query(&sql)
        .execute(pool)
        .await
        .map_err(|e| AppError::DatabaseError(format!("Failed to set PRAGMA user_version: {}", e)))
        .map(|_| ())
}
