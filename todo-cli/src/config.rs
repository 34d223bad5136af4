use std::path::{Path, PathBuf};

use serde::Deserialize;

pub const USERS_FILE: &str = "users.json";
pub const TODOS_FILE: &str = "todos.json";

/// Where the data files live.
///
/// Sources, lowest precedence first: the built-in default, an optional
/// `todo-cli.toml` in the working directory, then `TODO_CLI_*` environment
/// variables.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct AppConfig {
    pub data_dir: PathBuf,
}

impl AppConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        Self::builder(&default_data_dir())?
            .add_source(config::File::with_name("todo-cli").required(false))
            .add_source(config::Environment::with_prefix("TODO_CLI"))
            .build()?
            .try_deserialize()
    }

    fn builder(
        default_data_dir: &Path,
    ) -> Result<config::ConfigBuilder<config::builder::DefaultState>, config::ConfigError> {
        config::Config::builder()
            .set_default("data_dir", default_data_dir.display().to_string())
    }

    pub fn users_file(&self) -> PathBuf {
        self.data_dir.join(USERS_FILE)
    }

    pub fn todos_file(&self) -> PathBuf {
        self.data_dir.join(TODOS_FILE)
    }

    pub fn ensure_data_dir(&self) -> std::io::Result<()> {
        std::fs::create_dir_all(&self.data_dir)
    }
}

/// `data/` beside the directory holding the executable.
pub fn default_data_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().and_then(Path::parent).map(Path::to_path_buf))
        .unwrap_or_default()
        .join("data")
}
