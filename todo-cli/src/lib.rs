//! A single-user todo list with login, persisted as JSON files.
pub mod config;
pub mod manager;
pub mod session;
pub mod storage;
pub mod todo;
pub mod user;

pub use config::AppConfig;
pub use manager::{TodoManager, TodoUpdate};
pub use session::{Prompt, Session, TerminalPrompt};
pub use storage::{JsonFile, StorageError};
pub use todo::{Priority, Status, TodoItem};
pub use user::{SignupError, User, UserStore};

/// Installs a stderr `tracing` subscriber filtered by `RUST_LOG` (default `warn`).
pub fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init();
}
