use std::fmt;

/// Status keyword carried in the keyword slot of every response frame.
///
/// The front door forwards backend statuses to the client verbatim; no
/// translation happens anywhere on the reply path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Operation succeeded; payload semantics depend on the request.
    Ok,
    /// Target file or directory absent on the owning node.
    NotFound,
    /// Local filesystem failure on the owning node.
    IoError,
    /// Request rejected: unknown type, unarchivable type, bad path or syntax.
    Unsupported,
    /// The front door could not reach or finish an exchange with a backend.
    Unavailable,
    /// A frame ended before its declared payload length was satisfied.
    Truncated,
}

impl Status {
    pub fn as_str(self) -> &'static str {
        match self {
            Status::Ok => "ok",
            Status::NotFound => "notfound",
            Status::IoError => "ioerror",
            Status::Unsupported => "unsupported",
            Status::Unavailable => "unavailable",
            Status::Truncated => "truncated",
        }
    }

    pub fn parse(keyword: &str) -> Option<Status> {
        match keyword {
            "ok" => Some(Status::Ok),
            "notfound" => Some(Status::NotFound),
            "ioerror" => Some(Status::IoError),
            "unsupported" => Some(Status::Unsupported),
            "unavailable" => Some(Status::Unavailable),
            "truncated" => Some(Status::Truncated),
            _ => None,
        }
    }

    pub fn is_ok(self) -> bool {
        matches!(self, Status::Ok)
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
