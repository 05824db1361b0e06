//! Embedding of Pogberry scripts into a C stub.
//!
//! A script is turned into an [`EscapedLiteral`] (one quoted C string per
//! source line) and spliced into a [`StubTemplate`] in place of its
//! [`PLACEHOLDER`]. The result is a complete C translation unit that, once
//! linked against the `pogberry` runtime, interprets the script at startup.

pub mod error;
pub mod escape;
pub mod template;

pub use error::TemplateError;
pub use escape::{EscapedLiteral, escape_script};
pub use template::{PLACEHOLDER, StubTemplate};
