use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};

use crate::error::ShardError;
use crate::protocol::frame::{Frame, FrameStream, OP_ARCHIVE, OP_DELETE, OP_FETCH, OP_LIST, OP_STORE};
use crate::protocol::status::Status;
use crate::routing::types::FileType;
use crate::storage::node::StorageNode;

/// Answers storage operations on one inbound connection until the peer
/// hangs up. The front door dials once per operation, so a connection
/// usually carries a single exchange, but nothing here depends on that.
pub async fn serve_connection<S>(stream: S, node: Arc<StorageNode>) -> anyhow::Result<()>
where
    S: AsyncRead + AsyncWrite + Unpin,
{
    let mut frames = FrameStream::new(stream);
    while let Some(frame) = frames.read().await? {
        let reply = match execute(&frame, &node).await {
            Ok(reply) => reply,
            Err(e) => {
                tracing::debug!("operation {} failed: {}", frame.keyword, e);
                Frame::status_with(e.status(), e.to_string().into_bytes())
            }
        };
        frames.write(&reply).await?;
    }
    Ok(())
}

async fn execute(frame: &Frame, node: &StorageNode) -> Result<Frame, ShardError> {
    let path = || {
        frame
            .arg(0)
            .ok_or_else(|| ShardError::MalformedCommand(format!("{} needs an argument", frame.keyword)))
    };

    match frame.keyword.as_str() {
        OP_STORE => {
            node.store(path()?, &frame.payload).await?;
            Ok(Frame::status(Status::Ok))
        }
        OP_FETCH => {
            let bytes = node.fetch(path()?).await?;
            Ok(Frame::status_with(Status::Ok, bytes))
        }
        OP_DELETE => {
            node.delete(path()?).await?;
            Ok(Frame::status(Status::Ok))
        }
        OP_LIST => {
            let names = node.list(path()?).await?;
            Ok(Frame::status_with(Status::Ok, names.join("\n").into_bytes()))
        }
        OP_ARCHIVE => {
            let token = path()?;
            let ftype = FileType::parse(token)
                .ok_or_else(|| ShardError::UnsupportedType(token.to_string()))?;
            let bytes = node.archive(ftype).await?;
            Ok(Frame::status_with(Status::Ok, bytes))
        }
        other => Err(ShardError::MalformedCommand(format!(
            "unknown operation: {}",
            other
        ))),
    }
}
