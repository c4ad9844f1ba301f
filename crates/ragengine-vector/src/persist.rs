//! Atomic JSON file persistence.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde::de::DeserializeOwned;
use tokio::fs;

use crate::TRACING_TARGET_PERSIST;
use crate::error::{VectorError, VectorResult};

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().map(|n| n.to_os_string()).unwrap_or_default();
    name.push(".tmp");
    path.with_file_name(name)
}

/// Serializes `value` to `path` through a temporary file and a rename.
///
/// Readers never observe a partially written file. Missing parent
/// directories are created.
pub(crate) async fn write_json<T>(path: &Path, value: &T) -> VectorResult<()>
where
    T: Serialize + ?Sized,
{
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .await
            .map_err(|e| VectorError::persistence(parent, e))?;
    }

    let bytes = serde_json::to_vec_pretty(value)?;
    let temp = temp_path(path);
    fs::write(&temp, &bytes)
        .await
        .map_err(|e| VectorError::persistence(&temp, e))?;
    fs::rename(&temp, path)
        .await
        .map_err(|e| VectorError::persistence(path, e))?;

    tracing::trace!(
        target: TRACING_TARGET_PERSIST,
        path = %path.display(),
        bytes = bytes.len(),
        "Wrote file"
    );

    Ok(())
}

/// Reads and deserializes `path`, or returns `None` if it does not exist.
pub(crate) async fn read_json<T>(path: &Path) -> VectorResult<Option<T>>
where
    T: DeserializeOwned,
{
    let bytes = match fs::read(path).await {
        Ok(bytes) => bytes,
        Err(e) if e.kind() == ErrorKind::NotFound => return Ok(None),
        Err(e) => return Err(VectorError::persistence(path, e)),
    };

    Ok(Some(serde_json::from_slice(&bytes)?))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;

    #[tokio::test]
    async fn write_then_read() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("nested").join("file.json");

        let mut value = BTreeMap::new();
        value.insert("key".to_owned(), 42_u32);
        write_json(&path, &value).await?;

        let read: Option<BTreeMap<String, u32>> = read_json(&path).await?;
        assert_eq!(read, Some(value));
        assert!(!temp_path(&path).exists());
        Ok(())
    }

    #[tokio::test]
    async fn missing_file_reads_as_none() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let read: Option<u32> = read_json(&dir.path().join("absent.json")).await?;
        assert_eq!(read, None);
        Ok(())
    }

    #[tokio::test]
    async fn corrupt_file_is_an_error() -> anyhow::Result<()> {
        let dir = tempfile::tempdir()?;
        let path = dir.path().join("bad.json");
        std::fs::write(&path, b"{ not json")?;

        let read = read_json::<u32>(&path).await;
        assert!(matches!(read, Err(VectorError::Serialization(_))));
        Ok(())
    }
}
