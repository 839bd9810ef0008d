//! PostgreSQL implementations of the repository traits.

mod categories;
mod todos;
mod users;

use sqlx::PgPool;

/// Repository backend over a shared connection pool
#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}
