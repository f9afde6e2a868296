use crate::error::ShardError;
use crate::routing::types::NodeId;

/// Translates a client-visible path into the target node's namespace.
///
/// The canonical client form is `~/S1/<segments...>`; the anchor segment is
/// replaced with the target's segment and everything after it is preserved
/// verbatim. A bare or relative path is interpreted as relative to the
/// target's root. Paths that are absolute, or tilde-anchored at anything
/// other than a recognized root, fail with `MalformedPath`.
pub fn rewrite(logical: &str, target: NodeId) -> Result<String, ShardError> {
    if logical.is_empty() {
        return Err(ShardError::MalformedPath("empty path".to_string()));
    }
    if logical.starts_with('/') {
        return Err(ShardError::MalformedPath(logical.to_string()));
    }
    if let Some(rest) = logical.strip_prefix("~/") {
        let (anchor, tail) = match rest.split_once('/') {
            Some((anchor, tail)) => (anchor, Some(tail)),
            None => (rest, None),
        };
        if NodeId::from_segment(anchor).is_none() {
            return Err(ShardError::MalformedPath(logical.to_string()));
        }
        return Ok(match tail {
            Some(tail) => format!("~/{}/{}", target.segment(), tail),
            None => format!("~/{}", target.segment()),
        });
    }
    if logical.starts_with('~') {
        return Err(ShardError::MalformedPath(logical.to_string()));
    }
    Ok(format!("~/{}/{}", target.segment(), logical))
}

/// Appends a filename to a logical directory path.
pub fn join(dir: &str, name: &str) -> String {
    format!("{}/{}", dir.trim_end_matches('/'), name)
}

/// The basename of a client-supplied path.
pub fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}
