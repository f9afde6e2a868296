//! Routing Module
//!
//! Decides where a file lives. Placement is a pure function of the filename's
//! extension: each supported type is owned by exactly one node, and the owning
//! node stores the file under its own root with the same relative layout the
//! client used.
//!
//! ## Core Concepts
//! - **Type table**: a fixed, build-time mapping from extension to owning node
//!   (`c` -> N1, `pdf` -> N2, `txt` -> N3, `zip` -> N4).
//! - **Rewriting**: client paths are anchored at `~/S1/...`; before an
//!   operation is forwarded, the anchor segment is swapped for the owning
//!   node's segment (`~/S2/...` and so on). Intermediate segments are
//!   preserved verbatim.

pub mod rewrite;
pub mod types;
