//! Wire Protocol Module
//!
//! The framed request/response format used on every TCP link in the system,
//! both client-to-front-door and front-door-to-backend.
//!
//! ## Frame Shape
//! One ASCII header line, then an optional binary payload:
//!
//! ```text
//! <keyword> [<arg> ...] <payload-length>\n
//! <payload-length bytes>
//! ```
//!
//! The declared length is authoritative: the reader consumes exactly that
//! many bytes after the header terminator and then returns to header-parsing
//! state. Responses put a status keyword in the keyword slot.
//!
//! ## Submodules
//! - **`frame`**: Frame type, command keywords, and the framed stream adapter.
//! - **`status`**: Response status keywords and their mapping to error kinds.

pub mod frame;
pub mod status;
