// SPDX-License-Identifier: PolyForm-Noncommercial-1.0.0
// Copyright (c) 2025 Sylvex. All rights reserved.

//! PostgreSQL user repository.

use async_trait::async_trait;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::{debug, info};

use super::UserRepository;
use crate::error::{CoreError, CoreResult};
use crate::types::User;

const CREATE_USERS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS users (
    id          VARCHAR(100) PRIMARY KEY,
    name        VARCHAR(100) NOT NULL,
    password    VARCHAR(255) NOT NULL,
    token       TEXT NULL,
    created_at  BIGINT NOT NULL,
    updated_at  BIGINT NOT NULL
)
"#;

fn store_error(e: sqlx::Error) -> CoreError {
    CoreError::store(format!("postgres: {}", e))
}

/// User records in a PostgreSQL `users` table.
#[derive(Debug, Clone)]
pub struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    /// Wraps an existing pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Opens a pool against `url`.
    pub async fn connect(url: &str, max_connections: u32) -> CoreResult<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(url)
            .await
            .map_err(store_error)?;

        info!(max_connections, "Connected to PostgreSQL");
        Ok(Self::new(pool))
    }

    /// Creates the `users` table if it does not exist.
    pub async fn migrate(&self) -> CoreResult<()> {
        sqlx::query(CREATE_USERS_TABLE)
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        debug!("users table ready");
        Ok(())
    }

    /// Returns the underlying pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn insert(&self, user: &User) -> CoreResult<()> {
        sqlx::query(
            "INSERT INTO users (id, name, password, token, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, $6)",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.password)
        .bind(&user.token)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(ref db) if db.is_unique_violation() => {
                CoreError::conflict(format!("user '{}' already exists", user.id))
            }
            other => store_error(other),
        })?;
        Ok(())
    }

    async fn find_by_id(&self, id: &str) -> CoreResult<Option<User>> {
        sqlx::query_as::<_, User>(
            "SELECT id, name, password, token, created_at, updated_at FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(store_error)
    }

    async fn update(&self, user: &User) -> CoreResult<()> {
        let result = sqlx::query(
            "UPDATE users SET name = $2, password = $3, token = $4, updated_at = $5 WHERE id = $1",
        )
        .bind(&user.id)
        .bind(&user.name)
        .bind(&user.password)
        .bind(&user.token)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await
        .map_err(store_error)?;

        if result.rows_affected() == 0 {
            return Err(CoreError::not_found(format!("user '{}'", user.id)));
        }
        Ok(())
    }

    async fn count(&self) -> CoreResult<u64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(count.max(0) as u64)
    }

    async fn ping(&self) -> CoreResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(store_error)?;
        Ok(())
    }

    fn name(&self) -> &'static str {
        "postgres"
    }
}
