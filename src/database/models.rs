use serde::Serialize;
use sqlx::FromRow;

/// Row from the `property_type` table. One leaf or branch of the
/// "what are you looking for" taxonomy, partitioned by transaction type.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct PropertyTypeRow {
    pub id: i32,
    pub title: Option<String>,
    pub parent_id: Option<i32>,
    pub transaction_type: Option<i32>,
    pub vietnamese: Option<String>,
    pub slug: Option<String>,
    pub aactive: Option<bool>,
}

/// Row from the `folder` table. A news category node; `publish` is a
/// CHAR(1) column where 'T' means published.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct FolderRow {
    pub id: i32,
    pub parent: Option<i32>,
    pub name: Option<String>,
    pub label: Option<String>,
    pub publish: Option<String>,
    pub display_order: Option<i32>,
}
