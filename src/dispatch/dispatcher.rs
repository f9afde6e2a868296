use std::collections::HashMap;
use std::net::SocketAddr;
use std::sync::Arc;

use tokio::io::{AsyncRead, AsyncWrite};
use uuid::Uuid;

use crate::dispatch::backend::BackendClient;
use crate::dispatch::command::ClientCommand;
use crate::error::ShardError;
use crate::protocol::frame::{
    Frame, FrameStream, OP_ARCHIVE, OP_DELETE, OP_FETCH, OP_LIST, OP_STORE,
};
use crate::protocol::status::Status;
use crate::routing::rewrite::{basename, join, rewrite};
use crate::routing::types::{FileType, NodeId};
use crate::storage::node::StorageNode;

/// The anchor every client-visible path hangs from.
const CLIENT_ROOT: &str = "~/S1";

/// Executes client commands on behalf of one front-door node.
///
/// The dispatcher holds no per-client state; one instance is shared by every
/// client worker. Each worker drives [`Dispatcher::serve`] with its own
/// socket, and every backend connection is opened inside a single command
/// and closed before the reply goes out.
pub struct Dispatcher {
    node: Arc<StorageNode>,
    peers: HashMap<NodeId, SocketAddr>,
}

impl Dispatcher {
    pub fn new(node: Arc<StorageNode>, peers: HashMap<NodeId, SocketAddr>) -> Self {
        Self { node, peers }
    }

    /// Serves one client session: reads commands until the client sends
    /// `exit` or hangs up, answering each command with exactly one frame.
    pub async fn serve<S>(&self, stream: S) -> anyhow::Result<()>
    where
        S: AsyncRead + AsyncWrite + Unpin,
    {
        let worker = Uuid::new_v4();
        tracing::info!("worker {} serving new client session", worker);

        let mut frames = FrameStream::new(stream);
        loop {
            let frame = match frames.read().await {
                Ok(Some(frame)) => frame,
                Ok(None) => {
                    tracing::info!("worker {} client disconnected", worker);
                    break;
                }
                Err(e @ ShardError::MalformedCommand(_)) => {
                    // A bad header is fatal to this command only.
                    frames.write(&error_frame(&e)).await?;
                    continue;
                }
                Err(e) => {
                    tracing::warn!("worker {} session aborted: {}", worker, e);
                    break;
                }
            };

            let command = match ClientCommand::from_frame(&frame) {
                Ok(command) => command,
                Err(e) => {
                    frames.write(&error_frame(&e)).await?;
                    continue;
                }
            };

            if command == ClientCommand::Exit {
                tracing::info!("worker {} client sent exit", worker);
                break;
            }

            tracing::debug!("worker {} executing {}", worker, frame.keyword);
            let reply = match self.execute(command, frame.payload).await {
                Ok(reply) => reply,
                Err(e) => error_frame(&e),
            };
            frames.write(&reply).await?;
        }

        Ok(())
    }

    async fn execute(
        &self,
        command: ClientCommand,
        payload: Vec<u8>,
    ) -> Result<Frame, ShardError> {
        match command {
            ClientCommand::Upload { local, dest } => {
                self.upload(&local, dest.as_deref(), payload).await
            }
            ClientCommand::Download { path } => self.download(&path).await,
            ClientCommand::Remove { path } => self.remove(&path).await,
            ClientCommand::Tar { ftype } => self.tar(ftype).await,
            ClientCommand::List { dir } => self.list_names(dir.as_deref()).await,
            ClientCommand::Exit => unreachable!("exit is handled by the session loop"),
        }
    }

    /// `uploadf`: the file's type picks the owning node; the destination
    /// directory (default: the root) plus the file's basename becomes the
    /// logical path, rewritten into the owner's namespace.
    async fn upload(
        &self,
        local: &str,
        dest: Option<&str>,
        payload: Vec<u8>,
    ) -> Result<Frame, ShardError> {
        let ftype = FileType::of(local)?;
        let owner = ftype.owner();
        let logical = join(dest.unwrap_or(CLIENT_ROOT), basename(local));
        let physical = rewrite(&logical, owner)?;

        if owner == self.node.id() {
            self.node.store(&physical, &payload).await?;
            Ok(Frame::status(Status::Ok))
        } else {
            self.forward(owner, Frame::with_payload(OP_STORE, vec![physical], payload))
                .await
        }
    }

    /// `downlf`: fetch locally or from the owning backend; the response
    /// frame (bytes or error) is relayed to the client unchanged.
    async fn download(&self, path: &str) -> Result<Frame, ShardError> {
        let owner = FileType::of(path)?.owner();
        let physical = rewrite(path, owner)?;

        if owner == self.node.id() {
            let bytes = self.node.fetch(&physical).await?;
            Ok(Frame::status_with(Status::Ok, bytes))
        } else {
            self.forward(owner, Frame::new(OP_FETCH, vec![physical])).await
        }
    }

    /// `removef`: identical dispatch rules with the delete operation.
    async fn remove(&self, path: &str) -> Result<Frame, ShardError> {
        let owner = FileType::of(path)?.owner();
        let physical = rewrite(path, owner)?;

        if owner == self.node.id() {
            self.node.delete(&physical).await?;
            Ok(Frame::status(Status::Ok))
        } else {
            self.forward(owner, Frame::new(OP_DELETE, vec![physical])).await
        }
    }

    /// `downltar`: `zip` is rejected here, before any backend traffic.
    async fn tar(&self, ftype: FileType) -> Result<Frame, ShardError> {
        if !ftype.archivable() {
            return Err(ShardError::UnsupportedArchiveType(ftype.to_string()));
        }
        let owner = ftype.owner();
        if owner == self.node.id() {
            let bytes = self.node.archive(ftype).await?;
            Ok(Frame::status_with(Status::Ok, bytes))
        } else {
            self.forward(owner, Frame::new(OP_ARCHIVE, vec![ftype.to_string()]))
                .await
        }
    }

    /// `dispfnames`: one listing per node, concatenated in fixed order
    /// N1, N2, N3, N4. Each node has already ordered its own names by class,
    /// so the concatenation is globally ordered: all `.c` names first, then
    /// `.pdf`, `.txt`, `.zip`. A node without the directory contributes
    /// nothing; any other backend failure aborts the whole command.
    async fn list_names(&self, dir: Option<&str>) -> Result<Frame, ShardError> {
        let dir = dir.unwrap_or(CLIENT_ROOT);
        let mut names: Vec<String> = Vec::new();

        let local_dir = rewrite(dir, self.node.id())?;
        match self.node.list(&local_dir).await {
            Ok(local) => names.extend(local),
            Err(ShardError::NotFound(_)) => {}
            Err(e) => return Err(e),
        }

        for peer in NodeId::ALL {
            if peer == self.node.id() {
                continue;
            }
            let peer_dir = rewrite(dir, peer)?;
            let response = self.forward(peer, Frame::new(OP_LIST, vec![peer_dir])).await?;
            match response.as_status() {
                Some(Status::Ok) => {
                    let text = String::from_utf8_lossy(&response.payload);
                    names.extend(text.lines().map(str::to_string));
                }
                Some(Status::NotFound) => {}
                _ => {
                    return Err(ShardError::BackendUnavailable(format!(
                        "{} failed while listing {}",
                        peer, dir
                    )))
                }
            }
        }

        Ok(Frame::status_with(Status::Ok, names.join("\n").into_bytes()))
    }

    /// Dials the owner, runs one exchange, and hands back whatever frame the
    /// backend produced.
    async fn forward(&self, owner: NodeId, request: Frame) -> Result<Frame, ShardError> {
        let addr = self.peers.get(&owner).copied().ok_or_else(|| {
            ShardError::BackendUnavailable(format!("no address configured for {}", owner))
        })?;
        let client = BackendClient::dial(owner, addr).await?;
        client.exchange(request).await
    }
}

/// Encodes a local failure as a response frame; the diagnostic rides in the
/// payload so the client can print one line.
fn error_frame(error: &ShardError) -> Frame {
    Frame::status_with(error.status(), error.to_string().into_bytes())
}
