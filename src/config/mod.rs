pub mod settings;

pub use settings::{DatabaseConfig, MenuConfig, ServerConfig, Settings};
