//! Application orchestration module

pub mod initialization;
pub mod execution;
pub mod repository;

pub use repository::resolve_repository_path;
pub use initialization::{load_configuration, configure_logging};
pub use execution::{run_fame, run_with_source};
