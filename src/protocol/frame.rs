use std::io;

use tokio::io::{AsyncBufReadExt, AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt, BufReader};

use crate::error::ShardError;
use crate::protocol::status::Status;

/// Upper bound on a header line; client paths are capped well below this.
const MAX_HEADER_BYTES: usize = 4096;
/// Sanity cap on a single framed payload.
const MAX_PAYLOAD_BYTES: usize = 1 << 30;

// --- Client command keywords (client -> front door) ---

pub const CMD_UPLOAD: &str = "uploadf";
pub const CMD_DOWNLOAD: &str = "downlf";
pub const CMD_REMOVE: &str = "removef";
pub const CMD_TAR: &str = "downltar";
pub const CMD_LIST_NAMES: &str = "dispfnames";
pub const CMD_EXIT: &str = "exit";

// --- Storage operation keywords (front door -> backend) ---

pub const OP_STORE: &str = "store";
pub const OP_FETCH: &str = "fetch";
pub const OP_DELETE: &str = "delete";
pub const OP_LIST: &str = "list";
pub const OP_ARCHIVE: &str = "archive";

/// One atomic message on the wire: a keyword, its arguments, and a payload
/// whose length the header declares.
///
/// Header tokens are whitespace-delimited, so arguments are whitespace-free
/// by construction (the client command line is split the same way).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    pub keyword: String,
    pub args: Vec<String>,
    pub payload: Vec<u8>,
}

impl Frame {
    pub fn new(keyword: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            keyword: keyword.into(),
            args,
            payload: Vec::new(),
        }
    }

    pub fn with_payload(keyword: impl Into<String>, args: Vec<String>, payload: Vec<u8>) -> Self {
        Self {
            keyword: keyword.into(),
            args,
            payload,
        }
    }

    /// A bare status response.
    pub fn status(status: Status) -> Self {
        Self::new(status.as_str(), Vec::new())
    }

    /// A status response carrying a payload (file bytes, listing, diagnostic).
    pub fn status_with(status: Status, payload: Vec<u8>) -> Self {
        Self::with_payload(status.as_str(), Vec::new(), payload)
    }

    pub fn arg(&self, index: usize) -> Option<&str> {
        self.args.get(index).map(String::as_str)
    }

    /// The response status this frame carries, if its keyword is one.
    pub fn as_status(&self) -> Option<Status> {
        Status::parse(&self.keyword)
    }

    fn header(&self) -> String {
        let mut line = String::with_capacity(self.keyword.len() + 16);
        line.push_str(&self.keyword);
        for arg in &self.args {
            line.push(' ');
            line.push_str(arg);
        }
        line.push(' ');
        line.push_str(&self.payload.len().to_string());
        line.push('\n');
        line
    }
}

/// Framed reader/writer over one connection.
///
/// Connection-scoped and never shared across concurrent operations. All
/// reads and writes loop internally until the declared byte count has been
/// transferred or the connection fails.
pub struct FrameStream<S> {
    inner: BufReader<S>,
}

impl<S: AsyncRead + AsyncWrite + Unpin> FrameStream<S> {
    pub fn new(stream: S) -> Self {
        Self {
            inner: BufReader::new(stream),
        }
    }

    /// Reads one full frame. Returns `Ok(None)` on a clean EOF at a frame
    /// boundary; EOF mid-frame fails with `Truncated`.
    pub async fn read(&mut self) -> Result<Option<Frame>, ShardError> {
        let mut line = String::new();
        let read = self
            .inner
            .read_line(&mut line)
            .await
            .map_err(|e| match e.kind() {
                io::ErrorKind::InvalidData => {
                    ShardError::MalformedCommand("header is not valid text".to_string())
                }
                _ => ShardError::IoError(e),
            })?;
        if read == 0 {
            return Ok(None);
        }
        if !line.ends_with('\n') {
            return Err(ShardError::Truncated);
        }
        if line.len() > MAX_HEADER_BYTES {
            return Err(ShardError::MalformedCommand("header too long".to_string()));
        }

        let mut tokens: Vec<&str> = line.split_whitespace().collect();
        if tokens.len() < 2 {
            return Err(ShardError::MalformedCommand(line.trim().to_string()));
        }
        let declared: usize = tokens
            .pop()
            .unwrap_or_default()
            .parse()
            .map_err(|_| ShardError::MalformedCommand(line.trim().to_string()))?;
        if declared > MAX_PAYLOAD_BYTES {
            return Err(ShardError::MalformedCommand(format!(
                "payload length {} exceeds limit",
                declared
            )));
        }
        let keyword = tokens.remove(0).to_string();
        let args = tokens.into_iter().map(str::to_string).collect();

        let mut payload = vec![0u8; declared];
        if declared > 0 {
            self.inner
                .read_exact(&mut payload)
                .await
                .map_err(|e| match e.kind() {
                    io::ErrorKind::UnexpectedEof => ShardError::Truncated,
                    _ => ShardError::IoError(e),
                })?;
        }

        Ok(Some(Frame {
            keyword,
            args,
            payload,
        }))
    }

    /// Writes one full frame and flushes it.
    pub async fn write(&mut self, frame: &Frame) -> Result<(), ShardError> {
        let stream = self.inner.get_mut();
        stream.write_all(frame.header().as_bytes()).await?;
        if !frame.payload.is_empty() {
            stream.write_all(&frame.payload).await?;
        }
        stream.flush().await?;
        Ok(())
    }
}
