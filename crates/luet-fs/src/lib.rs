//! Filesystem layer for luet
//!
//! Lexical path resolution, directory helpers with atomic writes, and a
//! format-agnostic document store used to load and persist configuration.

pub mod error;
pub mod io;
pub mod path;
pub mod store;

pub use error::{Error, Result};
pub use path::{absolutize, clean, join_under};
pub use store::{DocumentFormat, DocumentStore};
