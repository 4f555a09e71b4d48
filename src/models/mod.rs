pub mod menu;

pub use menu::{
    Folder, MenuStructure, NavItem, PropertyType, PropertyTypesByTransaction, TransactionType,
};
