//! Type-Sharded Distributed File Store Library
//!
//! This library crate defines the core modules that make up the file store.
//! It serves as the foundation for the node binary (`main.rs`) and the thin
//! interactive client (`bin/client.rs`).
//!
//! ## Architecture Modules
//! The system is composed of five loosely coupled subsystems:
//!
//! - **`routing`**: The type-based placement layer. Maps a filename's extension
//!   to the node that owns it and rewrites client-visible paths into the owning
//!   node's namespace.
//! - **`protocol`**: The framed wire format used on every TCP link, both
//!   client-to-front-door and front-door-to-backend.
//! - **`storage`**: The per-node filesystem layer. Implements the five storage
//!   operations (store, fetch, delete, list, archive) against a node's root
//!   directory.
//! - **`dispatch`**: The front-door brain. Parses client commands, executes
//!   them locally or over short-lived backend connections, and aggregates
//!   multi-node responses.
//! - **`server`**: The connection model. Accept loops that spawn one
//!   independent worker per connection.

pub mod config;
pub mod dispatch;
pub mod error;
pub mod protocol;
pub mod routing;
pub mod server;
pub mod storage;
