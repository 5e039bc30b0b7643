use kanban_core::KanbanResult;
use std::path::Path;
use tokio::fs;

/// Writes whole files through a temp file and a rename, so readers see either
/// the old contents or the new ones.
pub struct AtomicWriter;

impl AtomicWriter {
    pub async fn write_atomic(path: &Path, data: &[u8]) -> KanbanResult<()> {
        // Temp file in the target directory so the rename stays on one filesystem
        let parent = match path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(parent).await?;
        let temp_file = tempfile::NamedTempFile::new_in(parent)?;

        fs::write(temp_file.path(), data).await?;
        temp_file.persist(path).map_err(|e| e.error)?;

        tracing::debug!(
            "Atomically wrote {} bytes to {}",
            data.len(),
            path.display()
        );
        Ok(())
    }

    pub async fn read_all(path: &Path) -> KanbanResult<Vec<u8>> {
        let data = fs::read(path).await?;
        tracing::debug!("Read {} bytes from {}", data.len(), path.display());
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[tokio::test]
    async fn test_atomic_write_overwrites() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("boards.json");

        AtomicWriter::write_atomic(&file_path, b"First").await.unwrap();
        AtomicWriter::write_atomic(&file_path, b"Second").await.unwrap();

        let read_data = AtomicWriter::read_all(&file_path).await.unwrap();
        assert_eq!(read_data, b"Second");
    }

    #[tokio::test]
    async fn test_atomic_write_creates_parent_dirs() {
        let dir = tempdir().unwrap();
        let file_path = dir.path().join("kanban").join("nested").join("boards.json");

        AtomicWriter::write_atomic(&file_path, b"{}").await.unwrap();

        assert!(file_path.exists());
        let leftovers = std::fs::read_dir(file_path.parent().unwrap()).unwrap().count();
        assert_eq!(leftovers, 1);
    }
}
