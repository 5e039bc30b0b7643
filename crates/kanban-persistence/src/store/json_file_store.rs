use crate::store::atomic_writer::AtomicWriter;
use crate::traits::{PersistenceMetadata, PersistenceStore, StoreSnapshot};
use kanban_core::{KanbanError, KanbanResult};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use uuid::Uuid;

pub const FORMAT_VERSION: u32 = 1;

/// JSON file-based persistence store
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
    instance_id: Uuid,
}

/// On-disk layout of the data file
#[derive(Debug, Serialize, Deserialize)]
pub struct JsonEnvelope {
    pub version: u32,
    pub metadata: PersistenceMetadata,
    pub data: serde_json::Value,
}

impl JsonFileStore {
    pub fn new(path: impl AsRef<Path>) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
            instance_id: Uuid::new_v4(),
        }
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }
}

#[async_trait::async_trait]
impl PersistenceStore for JsonFileStore {
    async fn save(&self, mut snapshot: StoreSnapshot) -> KanbanResult<PersistenceMetadata> {
        snapshot.metadata.instance_id = self.instance_id;
        snapshot.metadata.saved_at = chrono::Utc::now();
        snapshot.metadata.format_version = FORMAT_VERSION;

        let data_value: serde_json::Value = serde_json::from_slice(&snapshot.data)
            .map_err(|e| KanbanError::Serialization(e.to_string()))?;
        let envelope = JsonEnvelope {
            version: FORMAT_VERSION,
            metadata: snapshot.metadata.clone(),
            data: data_value,
        };

        let json_bytes = serde_json::to_vec_pretty(&envelope)
            .map_err(|e| KanbanError::Serialization(e.to_string()))?;

        AtomicWriter::write_atomic(&self.path, &json_bytes).await?;

        tracing::info!(
            "Saved {} bytes to {}",
            json_bytes.len(),
            self.path.display()
        );

        Ok(snapshot.metadata)
    }

    async fn load(&self) -> KanbanResult<(StoreSnapshot, PersistenceMetadata)> {
        let file_bytes = AtomicWriter::read_all(&self.path).await?;

        let envelope: JsonEnvelope = serde_json::from_slice(&file_bytes)
            .map_err(|e| KanbanError::Serialization(e.to_string()))?;

        if envelope.version != FORMAT_VERSION {
            return Err(KanbanError::Serialization(format!(
                "Unsupported format version: {}",
                envelope.version
            )));
        }

        let data = serde_json::to_vec(&envelope.data)
            .map_err(|e| KanbanError::Serialization(e.to_string()))?;
        let snapshot = StoreSnapshot {
            data,
            metadata: envelope.metadata.clone(),
        };

        tracing::info!(
            "Loaded {} bytes from {}",
            file_bytes.len(),
            self.path.display()
        );

        Ok((snapshot, envelope.metadata))
    }

    async fn exists(&self) -> bool {
        tokio::fs::try_exists(&self.path).await.unwrap_or(false)
    }

    fn path(&self) -> &Path {
        &self.path
    }
}
