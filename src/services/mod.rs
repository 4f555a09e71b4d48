pub mod menu_cache;
pub mod menu_service;

pub use menu_cache::MenuCache;
pub use menu_service::{MenuService, MenuServiceOptions};
