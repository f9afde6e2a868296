//! Storage Module
//!
//! The per-node filesystem layer. Every node, the front door included, owns
//! one root directory and answers the five storage operations against it.
//!
//! ## Core Concepts
//! - **Roots**: each node owns exactly one directory tree (`~/S1`..`~/S4`);
//!   the tree mirrors whatever logical paths clients have uploaded. There is
//!   no sidecar metadata of any kind.
//! - **Physical paths**: operations address files as `~/<segment>/<rest>`;
//!   the node resolves the anchor against its own root and refuses paths
//!   anchored at another node's segment.
//! - **Archives**: a node can tar every file of the type it owns, preserving
//!   relative paths beneath its root.
//!
//! ## Submodules
//! - **`node`**: The five operations (store, fetch, delete, list, archive).
//! - **`archive`**: Recursive scan and in-memory tar construction.

pub mod archive;
pub mod node;
