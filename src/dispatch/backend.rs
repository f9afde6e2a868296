use std::net::SocketAddr;

use tokio::net::TcpStream;

use crate::error::ShardError;
use crate::protocol::frame::{Frame, FrameStream};
use crate::routing::types::NodeId;

/// A short-lived connection to one storage backend: one dial, one exchange,
/// then the socket is dropped. Every failure on this path, truncation
/// included, surfaces as `BackendUnavailable`.
pub struct BackendClient {
    node: NodeId,
    stream: FrameStream<TcpStream>,
}

impl BackendClient {
    pub async fn dial(node: NodeId, addr: SocketAddr) -> Result<Self, ShardError> {
        let stream = TcpStream::connect(addr).await.map_err(|e| {
            ShardError::BackendUnavailable(format!("dial {} at {}: {}", node, addr, e))
        })?;
        tracing::debug!("dialed backend {} at {}", node, addr);
        Ok(Self {
            node,
            stream: FrameStream::new(stream),
        })
    }

    /// Sends one request and awaits its response. Consumes the client so the
    /// connection cannot be reused for a second command.
    pub async fn exchange(mut self, request: Frame) -> Result<Frame, ShardError> {
        self.stream.write(&request).await.map_err(|e| {
            ShardError::BackendUnavailable(format!("send to {}: {}", self.node, e))
        })?;
        match self.stream.read().await {
            Ok(Some(response)) => Ok(response),
            Ok(None) => Err(ShardError::BackendUnavailable(format!(
                "{} closed the connection mid-exchange",
                self.node
            ))),
            Err(e) => Err(ShardError::BackendUnavailable(format!(
                "reply from {}: {}",
                self.node, e
            ))),
        }
    }
}
