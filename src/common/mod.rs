pub mod config;
pub mod error;
pub mod paths;

pub use config::{Config, SdkOptions, DEFAULT_BASE_URL};
pub use error::{FaceAuthError, Result};
pub use paths::{config_search_paths, user_config_file};
