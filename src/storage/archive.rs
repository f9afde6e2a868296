use std::io;
use std::path::Path;

use walkdir::WalkDir;

use crate::error::ShardError;
use crate::routing::types::FileType;

/// Builds a tar archive of every file of `ftype` under `root`, recursively.
///
/// Member paths are relative to the root, so unpacking reproduces the same
/// tree shape. The archive is produced fully in memory, sized, and returned;
/// callers frame it as a single payload. A missing or empty root yields an
/// empty (but valid) archive.
///
/// The walk and the tar writer are blocking; the caller runs this under
/// `spawn_blocking`.
pub fn build(root: &Path, ftype: FileType) -> Result<Vec<u8>, ShardError> {
    let mut builder = tar::Builder::new(Vec::new());

    if root.is_dir() {
        for entry in WalkDir::new(root).follow_links(false) {
            let entry = entry.map_err(io::Error::from)?;
            if !entry.file_type().is_file() {
                continue;
            }
            let name = entry.file_name().to_string_lossy();
            if FileType::from_name(&name) != Some(ftype) {
                continue;
            }
            let relative = entry.path().strip_prefix(root).unwrap_or(entry.path());
            builder.append_path_with_name(entry.path(), relative)?;
        }
    }

    let bytes = builder.into_inner()?;
    Ok(bytes)
}
