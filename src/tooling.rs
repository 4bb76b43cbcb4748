//! Tooling Layer
//!
//! Command-line access to the index. It plays the part of the request layer:
//! it parses arguments, calls one `FsIndex` operation per command, and renders
//! the result.

pub mod cli;

pub use cli::{Cli, CliContext, Commands};
