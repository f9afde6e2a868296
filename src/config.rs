//! Node Configuration
//!
//! Everything a node needs to run: its identity, its listen address, its
//! root directory, and (for the front door) the addresses of the storage
//! backends it dials. Parsed from command-line flags with environment
//! overrides; nothing is read from disk.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{bail, Context, Result};

use crate::routing::types::NodeId;

/// Environment variable that relocates every node root, mainly so four
/// nodes can share one host during development.
pub const ROOT_ENV: &str = "SHARDFS_ROOT";

#[derive(Debug, Clone)]
pub struct NodeConfig {
    /// Which of the four fixed identities this process plays.
    pub id: NodeId,
    /// TCP listen address.
    pub bind: SocketAddr,
    /// Root directory this node stores files under.
    pub root: PathBuf,
    /// Backend addresses the front door dials. Empty on pure backends.
    pub peers: HashMap<NodeId, SocketAddr>,
}

impl NodeConfig {
    /// Parses `--node`, `--bind`, `--peer` and `--root` flags.
    ///
    /// `--peer` takes `<node>=<addr:port>` and repeats once per backend;
    /// it is required (for n2, n3 and n4) when the node is n1 and rejected
    /// otherwise. `--root` defaults to `$SHARDFS_ROOT/<segment>` when the
    /// variable is set, else `$HOME/<segment>`.
    pub fn from_args(args: &[String]) -> Result<NodeConfig> {
        let mut id: Option<NodeId> = None;
        let mut bind: Option<SocketAddr> = None;
        let mut root: Option<PathBuf> = None;
        let mut peers: HashMap<NodeId, SocketAddr> = HashMap::new();

        let mut i = 0;
        while i < args.len() {
            match args[i].as_str() {
                "--node" => {
                    let value = flag_value(args, i, "--node")?;
                    id = Some(
                        NodeId::parse(value)
                            .with_context(|| format!("unknown node id: {}", value))?,
                    );
                    i += 2;
                }
                "--bind" => {
                    let value = flag_value(args, i, "--bind")?;
                    bind = Some(value.parse().with_context(|| format!("bad bind address: {}", value))?);
                    i += 2;
                }
                "--peer" => {
                    let value = flag_value(args, i, "--peer")?;
                    let (name, addr) = value
                        .split_once('=')
                        .with_context(|| format!("--peer expects <node>=<addr:port>, got {}", value))?;
                    let peer = NodeId::parse(name)
                        .with_context(|| format!("unknown peer node id: {}", name))?;
                    let addr: SocketAddr = addr
                        .parse()
                        .with_context(|| format!("bad peer address: {}", addr))?;
                    peers.insert(peer, addr);
                    i += 2;
                }
                "--root" => {
                    let value = flag_value(args, i, "--root")?;
                    root = Some(PathBuf::from(value));
                    i += 2;
                }
                other => bail!("unknown flag: {}", other),
            }
        }

        let id = id.context("--node is required")?;
        let bind = bind.context("--bind is required")?;
        let root = match root {
            Some(root) => root,
            None => default_root(id)?,
        };

        if id.is_front_door() {
            for peer in NodeId::ALL.iter().filter(|n| !n.is_front_door()) {
                if !peers.contains_key(peer) {
                    bail!("front door needs --peer {}=<addr:port>", peer);
                }
            }
        } else if !peers.is_empty() {
            bail!("only the front door (n1) takes --peer flags");
        }

        Ok(NodeConfig {
            id,
            bind,
            root,
            peers,
        })
    }
}

fn flag_value<'a>(args: &'a [String], i: usize, flag: &str) -> Result<&'a str> {
    args.get(i + 1)
        .map(String::as_str)
        .with_context(|| format!("{} expects a value", flag))
}

fn default_root(id: NodeId) -> Result<PathBuf> {
    if let Ok(base) = std::env::var(ROOT_ENV) {
        return Ok(PathBuf::from(base).join(id.segment()));
    }
    let home = std::env::var("HOME").context("HOME is not set and --root was not given")?;
    Ok(PathBuf::from(home).join(id.segment()))
}
