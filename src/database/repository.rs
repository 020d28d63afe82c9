use serde::Serialize;
use sqlx::{self, postgres::PgRow, FromRow, PgPool};

use crate::services::error::{ServiceError, ServiceResult};

/// Plain reads and deletes for a table keyed by a single integer column
pub struct Repository<T> {
    table_name: &'static str,
    key_column: &'static str,
    pool: PgPool,
    _phantom: std::marker::PhantomData<T>,
}

impl<T> Repository<T>
where
    T: for<'r> FromRow<'r, PgRow> + Send + Unpin + Serialize,
{
    pub fn new(table_name: &'static str, key_column: &'static str, pool: PgPool) -> Self {
        Self {
            table_name,
            key_column,
            pool,
            _phantom: std::marker::PhantomData,
        }
    }

    /// All rows ordered by `order_by`, or by key when None
    pub async fn select_all(&self, order_by: Option<&str>) -> ServiceResult<Vec<T>> {
        let sql = format!(
            "SELECT * FROM {} ORDER BY {}",
            self.table_name,
            order_by.unwrap_or(self.key_column)
        );
        let rows = sqlx::query_as::<_, T>(&sql).fetch_all(&self.pool).await?;
        Ok(rows)
    }

    pub async fn select_one(&self, id: i32) -> ServiceResult<Option<T>> {
        let sql = format!("SELECT * FROM {} WHERE {} = $1", self.table_name, self.key_column);
        let row = sqlx::query_as::<_, T>(&sql).bind(id).fetch_optional(&self.pool).await?;
        Ok(row)
    }

    pub async fn select_404(&self, id: i32) -> ServiceResult<T> {
        self.select_one(id)
            .await?
            .ok_or_else(|| ServiceError::not_found(format!("{} {} not found", self.singular(), id)))
    }

    /// Delete by key; NotFound when no row matched
    pub async fn delete(&self, id: i32) -> ServiceResult<()> {
        let sql = format!("DELETE FROM {} WHERE {} = $1", self.table_name, self.key_column);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(|e| ServiceError::from_delete(e.into()))?;

        if result.rows_affected() == 0 {
            return Err(ServiceError::not_found(format!("{} {} not found", self.singular(), id)));
        }
        Ok(())
    }

    fn singular(&self) -> &'static str {
        self.key_column.strip_suffix("_id").unwrap_or(self.key_column)
    }
}
