use crate::KanbanResult;
use async_trait::async_trait;

/// Single-document persistence. Implementations must make `save` atomic for
/// one entity; nothing is promised across entities.
#[async_trait]
pub trait Repository<T, Id>: Send + Sync {
    async fn find_by_id(&self, id: Id) -> KanbanResult<Option<T>>;
    async fn find_all(&self) -> KanbanResult<Vec<T>>;
    async fn save(&self, entity: &T) -> KanbanResult<T>;
    async fn delete(&self, id: Id) -> KanbanResult<()>;
}
