use kanban_core::{AppConfig, KanbanError, KanbanResult};
use kanban_domain::{Actor, UserId};
use kanban_persistence::JsonFileStore;
use kanban_service::{KanbanOperations, KanbanService, ServiceConfig};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Everything a CLI command needs: the operations over the data file and the
/// user the command runs as.
pub struct CliContext {
    pub ops: Arc<dyn KanbanOperations>,
    as_user: Option<UserId>,
}

impl CliContext {
    pub async fn open(file: &Path, as_user: Option<UserId>, config: &AppConfig) -> KanbanResult<Self> {
        let service = KanbanService::open(JsonFileStore::new(file), ServiceConfig::from(config)).await?;
        Ok(Self {
            ops: Arc::new(service),
            as_user,
        })
    }

    pub fn actor(&self) -> KanbanResult<Actor> {
        self.as_user
            .map(Actor::new)
            .ok_or_else(|| KanbanError::Validation("--as-user (or KANBAN_USER) is required".to_string()))
    }
}

/// `--file` wins over the configured data file.
pub fn resolve_data_file(flag: Option<PathBuf>, config: &AppConfig) -> KanbanResult<PathBuf> {
    flag.or_else(|| config.effective_data_file())
        .ok_or_else(|| KanbanError::Validation("--file (or KANBAN_FILE) is required".to_string()))
}
