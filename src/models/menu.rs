use crate::database::{FolderRow, PropertyTypeRow};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Transaction type partitioning the property taxonomy.
/// Stored in the database as 1 = sale, 2 = rent, 3 = project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Sale,
    Rent,
    Project,
}

impl TransactionType {
    /// Numeric code used by the `property_type.transaction_type` column.
    pub fn code(self) -> i32 {
        match self {
            TransactionType::Sale => 1,
            TransactionType::Rent => 2,
            TransactionType::Project => 3,
        }
    }

    /// Site-root-relative base path for listing pages of this type.
    pub fn base_path(self) -> &'static str {
        match self {
            TransactionType::Sale => "/mua-ban",
            TransactionType::Rent => "/cho-thue",
            TransactionType::Project => "/du-an",
        }
    }
}

/// Property taxonomy node as the menu service sees it.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyType {
    pub id: i32,
    pub title: String,
    pub parent_id: Option<i32>,
    pub transaction_type: i32,
    pub vietnamese: Option<String>,
    pub slug: Option<String>,
    pub active: bool,
}

impl From<PropertyTypeRow> for PropertyType {
    fn from(row: PropertyTypeRow) -> Self {
        Self {
            id: row.id,
            title: row.title.unwrap_or_default(),
            parent_id: row.parent_id,
            transaction_type: row.transaction_type.unwrap_or(0),
            vietnamese: row.vietnamese,
            slug: row.slug,
            active: row.aactive.unwrap_or(false),
        }
    }
}

/// News category node. `sub_folders` is only populated (and only
/// serialized) when the node actually has published children.
#[derive(Debug, Clone, Serialize)]
pub struct Folder {
    pub id: i32,
    pub parent: Option<i32>,
    pub name: Option<String>,
    pub label: Option<String>,
    pub published: bool,
    pub display_order: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sub_folders: Option<Vec<Folder>>,
}

impl From<FolderRow> for Folder {
    fn from(row: FolderRow) -> Self {
        Self {
            id: row.id,
            parent: row.parent,
            name: row.name,
            label: row.label,
            published: row.publish.as_deref() == Some("T"),
            display_order: row.display_order,
            sub_folders: None,
        }
    }
}

/// Property types grouped by transaction type, in fixed structural order.
#[derive(Debug, Clone, Serialize)]
pub struct PropertyTypesByTransaction {
    pub sale: Vec<PropertyType>,
    pub rent: Vec<PropertyType>,
    pub project: Vec<PropertyType>,
}

/// Composite menu structure built once per cache window.
#[derive(Debug, Clone, Serialize)]
pub struct MenuStructure {
    pub property_types: PropertyTypesByTransaction,
    pub news_folders: Vec<Folder>,
    pub generated_at: DateTime<Utc>,
}

/// Generic navigation tree node handed to the rendering layer.
/// No database-specific fields survive past this point.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavItem {
    pub label: String,
    pub href: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub children: Option<Vec<NavItem>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transaction_type_codes() {
        assert_eq!(TransactionType::Sale.code(), 1);
        assert_eq!(TransactionType::Rent.code(), 2);
        assert_eq!(TransactionType::Project.code(), 3);
    }

    #[test]
    fn folder_published_flag() {
        let row = FolderRow {
            id: 1,
            parent: Some(11),
            name: Some("du-an".to_string()),
            label: None,
            publish: Some("T".to_string()),
            display_order: Some(1),
        };
        assert!(Folder::from(row).published);

        let row = FolderRow {
            id: 2,
            parent: Some(11),
            name: None,
            label: None,
            publish: Some("F".to_string()),
            display_order: None,
        };
        assert!(!Folder::from(row).published);
    }

    #[test]
    fn nav_item_children_absent_from_wire() {
        let item = NavItem {
            label: "Liên hệ".to_string(),
            href: "/lien-he".to_string(),
            children: None,
        };
        let json = serde_json::to_value(&item).unwrap();
        assert!(json.get("children").is_none());
    }
}
