//! Job tracker process: configuration, storage, HTTP routes, and clipboard glue.
pub mod clipboard;
pub mod config;
pub mod error;
pub mod logging;
pub mod routes;
pub mod store;

pub use clipboard::SystemClipboard;
pub use config::{AppConfig, ClipboardSettings, ConfigError};
pub use error::AppError;
pub use logging::LogDestination;
pub use routes::{create_router, AppState};
pub use store::{
    Application, ApplicationStore, ApplicationUpdate, InsertOutcome, NewApplication, StoreError,
};
