//! Configuration Module
//!
//! Client settings loaded from environment variables and `.env` files.

mod settings;

pub use settings::{ClientSettings, ConfigError, LoginCredentials, load_dotenv};
