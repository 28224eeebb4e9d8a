pub mod app_config;
pub mod token_store;

pub use app_config::Config;
pub use token_store::{FileTokenStorage, MemoryTokenStorage, StorageError, TokenStorage};
