pub mod loader;
pub mod models;
pub mod workspace;

pub use loader::{ConfigFormat, ConfigLoader, FileConfigLoader};
pub use workspace::Workspace;
