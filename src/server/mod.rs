//! Server Module
//!
//! The connection model. Every node owns one TCP listener; each accepted
//! connection gets its own spawned worker while the accept loop keeps
//! running. The node configured as the front door serves client sessions
//! through the dispatcher; every other node answers raw storage operations.
//!
//! Workers are fully isolated: each owns its socket and buffers, failures
//! are logged and confined to the worker, and nothing is shared across
//! workers but the filesystem itself.

pub mod service;

use std::sync::Arc;

use tokio::net::TcpListener;

use crate::config::NodeConfig;
use crate::dispatch::dispatcher::Dispatcher;
use crate::storage::node::StorageNode;

/// Binds the configured address and serves forever.
pub async fn run(config: NodeConfig) -> anyhow::Result<()> {
    let listener = TcpListener::bind(config.bind).await?;
    run_with_listener(listener, config).await
}

/// Serves on an already-bound listener. Split out so tests can bind an
/// ephemeral port themselves and learn the address before the node starts.
pub async fn run_with_listener(listener: TcpListener, config: NodeConfig) -> anyhow::Result<()> {
    let node = Arc::new(StorageNode::new(config.id, config.root.clone()));
    node.ensure_root().await?;

    tracing::info!(
        "node {} listening on {} (root {})",
        config.id,
        listener.local_addr()?,
        config.root.display()
    );

    if config.id.is_front_door() {
        let dispatcher = Arc::new(Dispatcher::new(node, config.peers.clone()));
        loop {
            let (stream, peer) = listener.accept().await?;
            tracing::debug!("accepted client connection from {}", peer);
            let dispatcher = dispatcher.clone();
            tokio::spawn(async move {
                if let Err(e) = dispatcher.serve(stream).await {
                    tracing::warn!("client session from {} ended with error: {}", peer, e);
                }
            });
        }
    } else {
        loop {
            let (stream, peer) = listener.accept().await?;
            tracing::debug!("accepted storage connection from {}", peer);
            let node = node.clone();
            tokio::spawn(async move {
                if let Err(e) = service::serve_connection(stream, node).await {
                    tracing::warn!("storage connection from {} ended with error: {}", peer, e);
                }
            });
        }
    }
}
