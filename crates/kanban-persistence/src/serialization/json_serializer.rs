use crate::traits::Serializer;
use kanban_core::{KanbanError, KanbanResult};

/// JSON serializer for snapshot payloads. Compact; the file store pretty-prints
/// the envelope around it.
pub struct JsonSerializer;

impl<T: serde::Serialize + serde::de::DeserializeOwned + Send + Sync> Serializer<T>
    for JsonSerializer
{
    fn serialize(&self, data: &T) -> KanbanResult<Vec<u8>> {
        serde_json::to_vec(data).map_err(|e| KanbanError::Serialization(e.to_string()))
    }

    fn deserialize(&self, bytes: &[u8]) -> KanbanResult<T> {
        serde_json::from_slice(bytes).map_err(|e| KanbanError::Serialization(e.to_string()))
    }
}
