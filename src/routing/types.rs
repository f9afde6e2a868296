use std::fmt;

use crate::error::ShardError;

/// File classes the store accepts, in listing order.
///
/// The variant order is load-bearing: directory listings sort by class in
/// exactly this sequence before falling back to lexicographic name order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum FileType {
    C,
    Pdf,
    Txt,
    Zip,
}

impl FileType {
    pub const ALL: [FileType; 4] = [FileType::C, FileType::Pdf, FileType::Txt, FileType::Zip];

    /// Classifies a filename by the portion after its final dot, lowercased.
    /// Accepts full paths; only the basename is examined.
    pub fn from_name(name: &str) -> Option<FileType> {
        let base = name.rsplit('/').next().unwrap_or(name);
        let (_, ext) = base.rsplit_once('.')?;
        Self::parse(&ext.to_ascii_lowercase())
    }

    /// Like [`FileType::from_name`] but fails with `UnsupportedType`,
    /// matching the front door's rejection behavior.
    pub fn of(name: &str) -> Result<FileType, ShardError> {
        Self::from_name(name).ok_or_else(|| ShardError::UnsupportedType(name.to_string()))
    }

    /// Parses a bare type token as typed by `downltar`.
    pub fn parse(token: &str) -> Option<FileType> {
        match token {
            "c" => Some(FileType::C),
            "pdf" => Some(FileType::Pdf),
            "txt" => Some(FileType::Txt),
            "zip" => Some(FileType::Zip),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            FileType::C => "c",
            FileType::Pdf => "pdf",
            FileType::Txt => "txt",
            FileType::Zip => "zip",
        }
    }

    /// The node that stores every file of this type.
    pub fn owner(self) -> NodeId {
        match self {
            FileType::C => NodeId::N1,
            FileType::Pdf => NodeId::N2,
            FileType::Txt => NodeId::N3,
            FileType::Zip => NodeId::N4,
        }
    }

    /// `zip` files are already containers and are never re-archived.
    pub fn archivable(self) -> bool {
        !matches!(self, FileType::Zip)
    }
}

impl fmt::Display for FileType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Identity of a node in the fixed four-node topology.
///
/// N1 is the front door; N2-N4 are storage backends reachable only from N1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NodeId {
    N1,
    N2,
    N3,
    N4,
}

impl NodeId {
    pub const ALL: [NodeId; 4] = [NodeId::N1, NodeId::N2, NodeId::N3, NodeId::N4];

    /// The root directory segment this node owns (`S1`..`S4`).
    pub fn segment(self) -> &'static str {
        match self {
            NodeId::N1 => "S1",
            NodeId::N2 => "S2",
            NodeId::N3 => "S3",
            NodeId::N4 => "S4",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            NodeId::N1 => "n1",
            NodeId::N2 => "n2",
            NodeId::N3 => "n3",
            NodeId::N4 => "n4",
        }
    }

    pub fn parse(token: &str) -> Option<NodeId> {
        match token.to_ascii_lowercase().as_str() {
            "n1" => Some(NodeId::N1),
            "n2" => Some(NodeId::N2),
            "n3" => Some(NodeId::N3),
            "n4" => Some(NodeId::N4),
            _ => None,
        }
    }

    /// Inverse of [`NodeId::segment`], used to recognize anchored paths.
    pub fn from_segment(segment: &str) -> Option<NodeId> {
        match segment {
            "S1" => Some(NodeId::N1),
            "S2" => Some(NodeId::N2),
            "S3" => Some(NodeId::N3),
            "S4" => Some(NodeId::N4),
            _ => None,
        }
    }

    /// Only N1 accepts client sessions.
    pub fn is_front_door(self) -> bool {
        matches!(self, NodeId::N1)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Maps a filename to the node that must store it.
pub fn route(filename: &str) -> Result<NodeId, ShardError> {
    Ok(FileType::of(filename)?.owner())
}
