use kanban_service::KanbanOperations;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub ops: Arc<dyn KanbanOperations>,
}

impl AppState {
    pub fn new(ops: Arc<dyn KanbanOperations>) -> Self {
        Self { ops }
    }
}
