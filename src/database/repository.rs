use super::models::{FolderRow, PropertyTypeRow};
use super::DbPool;
use anyhow::Result;
use async_trait::async_trait;
use tracing::debug;

/// Read seam over the two menu tables. The menu service depends on this
/// trait so tests can run against a mock instead of a live database.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait MenuStore: Send + Sync {
    /// Active root rows (`parent_id IS NULL`) for one transaction type.
    async fn root_property_types(&self, transaction_type: i32) -> Result<Vec<PropertyTypeRow>>;

    /// All active rows for one transaction type, roots and children alike.
    async fn all_property_types(&self, transaction_type: i32) -> Result<Vec<PropertyTypeRow>>;

    /// Published direct children of a folder, ordered by display_order.
    async fn folder_children(&self, parent_id: i32) -> Result<Vec<FolderRow>>;
}

pub struct MenuRepository {
    pub pool: DbPool,
}

impl MenuRepository {
    pub fn new(pool: DbPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MenuStore for MenuRepository {
    async fn root_property_types(&self, transaction_type: i32) -> Result<Vec<PropertyTypeRow>> {
        let rows = sqlx::query_as::<_, PropertyTypeRow>(
            r#"SELECT
                id,
                title,
                parent_id,
                transaction_type,
                vietnamese,
                slug,
                aactive
               FROM property_type
               WHERE aactive = true
                 AND transaction_type = $1
                 AND parent_id IS NULL"#,
        )
        .bind(transaction_type)
        .fetch_all(self.pool.get_pool())
        .await?;

        debug!(
            "Fetched {} root property types for transaction {}",
            rows.len(),
            transaction_type
        );

        Ok(rows)
    }

    async fn all_property_types(&self, transaction_type: i32) -> Result<Vec<PropertyTypeRow>> {
        let rows = sqlx::query_as::<_, PropertyTypeRow>(
            r#"SELECT
                id,
                title,
                parent_id,
                transaction_type,
                vietnamese,
                slug,
                aactive
               FROM property_type
               WHERE aactive = true
                 AND transaction_type = $1"#,
        )
        .bind(transaction_type)
        .fetch_all(self.pool.get_pool())
        .await?;

        debug!(
            "Fetched {} property types (flat) for transaction {}",
            rows.len(),
            transaction_type
        );

        Ok(rows)
    }

    async fn folder_children(&self, parent_id: i32) -> Result<Vec<FolderRow>> {
        let rows = sqlx::query_as::<_, FolderRow>(
            r#"SELECT
                id,
                parent,
                name,
                label,
                publish,
                display_order
               FROM folder
               WHERE publish = 'T'
                 AND parent = $1
               ORDER BY display_order ASC"#,
        )
        .bind(parent_id)
        .fetch_all(self.pool.get_pool())
        .await?;

        debug!("Fetched {} folders under parent {}", rows.len(), parent_id);

        Ok(rows)
    }
}
