#![forbid(unsafe_code)]
//! hopmap-core library.
//!
//! Turns an OpenSSH client config into a graph of which host is reached
//! through which jump host.
//!
//! # Conventions
//!
//! - **Errors**: [`error::ParseError`] for the parser; `anyhow::Result` for
//!   settings loading.
//! - **Logging**: Use `tracing` macros (`info!`, `warn!`, `debug!`).
//!   Per-node graph changes go through [`graph::EventSink`].

pub mod config;
pub mod error;
pub mod export;
pub mod graph;
pub mod parse;
pub mod pipeline;
pub mod postprocess;
pub mod source;
pub mod wildcard;

pub use config::RunConfig;
pub use error::{ErrorCode, ParseError};
pub use graph::{TopologyGraph, build};
pub use parse::{ConfigParser, HostEntry, HostTable, ParseOptions, parse};
pub use pipeline::{Topology, run, run_with};
pub use source::{ConfigSource, FsSource, MemorySource};
