use std::io;
use std::path::{Path, PathBuf};

use tokio::fs;

use crate::error::ShardError;
use crate::routing::types::{FileType, NodeId};
use crate::storage::archive;

/// One node's view of its slice of the store: an identity and a root
/// directory. All five operations address files by physical path
/// (`~/<segment>/<rest>`) and resolve the anchor against the root.
pub struct StorageNode {
    id: NodeId,
    root: PathBuf,
}

impl StorageNode {
    pub fn new(id: NodeId, root: PathBuf) -> Self {
        Self { id, root }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Creates the root directory if it does not exist yet. Idempotent;
    /// called once at startup so a fresh node can accept its first store.
    pub async fn ensure_root(&self) -> Result<(), ShardError> {
        fs::create_dir_all(&self.root).await?;
        Ok(())
    }

    /// Resolves a physical path against this node's root. The anchor segment
    /// must be this node's own; anything else is a routing mistake upstream.
    fn local_path(&self, physical: &str) -> Result<PathBuf, ShardError> {
        let rest = physical
            .strip_prefix("~/")
            .ok_or_else(|| ShardError::MalformedPath(physical.to_string()))?;
        let (anchor, tail) = match rest.split_once('/') {
            Some((anchor, tail)) => (anchor, tail),
            None => (rest, ""),
        };
        if anchor != self.id.segment() {
            return Err(ShardError::MalformedPath(physical.to_string()));
        }
        if tail.is_empty() {
            Ok(self.root.clone())
        } else {
            Ok(self.root.join(tail))
        }
    }

    /// Writes `bytes` at `physical`, creating every missing parent directory
    /// first. An existing file is truncated and overwritten.
    pub async fn store(&self, physical: &str, bytes: &[u8]) -> Result<(), ShardError> {
        let path = self.local_path(physical)?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).await?;
        }
        fs::write(&path, bytes).await?;
        tracing::debug!("stored {} ({} bytes)", path.display(), bytes.len());
        Ok(())
    }

    /// Reads the full contents at `physical`.
    pub async fn fetch(&self, physical: &str) -> Result<Vec<u8>, ShardError> {
        let path = self.local_path(physical)?;
        match fs::read(&path).await {
            Ok(bytes) => Ok(bytes),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ShardError::NotFound(physical.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Unlinks the file at `physical`. Parent directories are left in place
    /// even when they become empty.
    pub async fn delete(&self, physical: &str) -> Result<(), ShardError> {
        let path = self.local_path(physical)?;
        match fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                Err(ShardError::NotFound(physical.to_string()))
            }
            Err(e) => Err(e.into()),
        }
    }

    /// Names of the regular files directly inside `physical` (non-recursive),
    /// ordered by extension class (c, pdf, txt, zip) and lexicographically
    /// within each class. Hidden entries and non-regular files are omitted.
    pub async fn list(&self, physical: &str) -> Result<Vec<String>, ShardError> {
        let dir = self.local_path(physical)?;
        let mut entries = match fs::read_dir(&dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(ShardError::NotFound(physical.to_string()))
            }
            Err(e) => return Err(e.into()),
        };

        let mut ranked: Vec<(u8, String)> = Vec::new();
        while let Some(entry) = entries.next_entry().await? {
            if !entry.file_type().await?.is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy().into_owned();
            if name.starts_with('.') {
                continue;
            }
            // Files outside the four classes sort after every known class.
            let rank = FileType::from_name(&name)
                .map(|t| t as u8)
                .unwrap_or(u8::MAX);
            ranked.push((rank, name));
        }
        ranked.sort();
        Ok(ranked.into_iter().map(|(_, name)| name).collect())
    }

    /// Tars every file of `ftype` under this node's root. Only the owning
    /// node accepts the type, and `zip` is never archivable.
    pub async fn archive(&self, ftype: FileType) -> Result<Vec<u8>, ShardError> {
        if !ftype.archivable() {
            return Err(ShardError::UnsupportedArchiveType(ftype.to_string()));
        }
        if ftype.owner() != self.id {
            return Err(ShardError::UnsupportedArchiveType(format!(
                "{} files are not stored on {}",
                ftype, self.id
            )));
        }
        let root = self.root.clone();
        let bytes = tokio::task::spawn_blocking(move || archive::build(&root, ftype))
            .await
            .map_err(|e| ShardError::IoError(io::Error::new(io::ErrorKind::Other, e)))??;
        tracing::debug!("archived {} files into {} bytes", ftype, bytes.len());
        Ok(bytes)
    }
}
