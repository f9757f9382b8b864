//! I/O module
//!
//! Streaming ingress and egress for the 94-character wire format.
//!
//! # Components
//!
//! - `reader` - line-oriented parser with current-batch context
//! - `writer` - canonical renderer with block padding and explicit flush

pub mod reader;
pub mod writer;

pub use reader::Reader;
pub use writer::Writer;
