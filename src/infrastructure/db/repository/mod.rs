mod cells;
mod charts;
mod spreadsheets;

use sqlx::SqlitePool;

/// Data access for spreadsheets, their cells and saved charts. Methods are
/// split across the sibling modules by table.
pub struct PlanixRepository {
    pub(crate) pool: SqlitePool,
}

impl PlanixRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}
