//! Dispatch Module
//!
//! The front-door brain. One dispatcher serves one client connection: it
//! parses each command, validates it, executes it against the local store or
//! over a short-lived backend connection, rewrites paths on the way out, and
//! relays responses back to the client without translating them.
//!
//! ## Core Concepts
//! - **Per-command dialing**: every forwarded operation opens a fresh TCP
//!   connection to the owning backend and closes it after one exchange.
//!   Nothing is pooled, so no state survives between commands.
//! - **Verbatim relay**: backend status frames travel to the client as-is;
//!   the dispatcher adds its own status only for failures it detects itself
//!   (rejections before any dial, and unreachable backends).
//! - **Aggregation**: `dispfnames` is the one fan-out command; responses are
//!   concatenated in fixed node order, never in arrival order.
//!
//! ## Submodules
//! - **`command`**: Client command grammar and the syntax validator.
//! - **`backend`**: Short-lived outbound connections to storage backends.
//! - **`dispatcher`**: The per-client session loop and command execution.

pub mod backend;
pub mod command;
pub mod dispatcher;
