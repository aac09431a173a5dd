//! Command-line and environment configuration for the server binary.

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, ValueEnum};
use todo_core::{InMemoryTodoStore, SqliteTodoStore, StoreResult};

use crate::SharedStore;

/// Which `TodoStore` backend the server runs on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum StoreKind {
    Memory,
    Sqlite,
}

/// Todo service HTTP server
#[derive(Debug, Parser)]
#[command(name = "todo-server", version, about = "Serve a todo store over HTTP")]
pub struct ServerConfig {
    /// Address to bind
    #[arg(long, env = "TODO_HOST", default_value = "127.0.0.1")]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, env = "PORT", default_value_t = 3000)]
    pub port: u16,

    /// Storage backend
    #[arg(long, env = "TODO_STORE", value_enum, default_value_t = StoreKind::Memory)]
    pub store: StoreKind,

    /// SQLite database file, used with `--store sqlite`
    #[arg(long, env = "TODO_DB_PATH", default_value = "todos.db")]
    pub db_path: PathBuf,

    /// Default log filter when RUST_LOG is unset
    #[arg(long, env = "LOG_LEVEL", default_value = "info")]
    pub log_level: String,
}

impl ServerConfig {
    pub fn addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }

    /// Build the configured backend.
    pub fn open_store(&self) -> StoreResult<SharedStore> {
        Ok(match self.store {
            StoreKind::Memory => Arc::new(InMemoryTodoStore::new()),
            StoreKind::Sqlite => Arc::new(SqliteTodoStore::open(&self.db_path)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use todo_core::TodoStore;

    #[test]
    fn addr_joins_host_and_port() {
        let config =
            ServerConfig::parse_from(["todo-server", "--host", "0.0.0.0", "--port", "8080"]);
        assert_eq!(config.addr(), "0.0.0.0:8080");
    }

    #[test]
    fn memory_store_starts_empty() {
        let config = ServerConfig::parse_from(["todo-server", "--store", "memory"]);
        assert_eq!(config.store, StoreKind::Memory);
        assert!(config.open_store().unwrap().get_todo_all().unwrap().is_empty());
    }

    #[test]
    fn selects_sqlite_store() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("todos.db");
        let config = ServerConfig::parse_from([
            "todo-server",
            "--store",
            "sqlite",
            "--db-path",
            path.to_str().unwrap(),
        ]);
        assert_eq!(config.store, StoreKind::Sqlite);

        let store = config.open_store().unwrap();
        let todo = store.create_todo("persisted").unwrap();
        assert_eq!(store.get_todo_by_id(todo.id).unwrap(), todo);
        assert!(path.exists());
    }
}
