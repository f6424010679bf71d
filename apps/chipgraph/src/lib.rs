//! # Chipgraph
//!
//! Library half of the `chipgraph` binary: CLI definitions, command
//! implementations and configuration loading. `main.rs` only sets up logging
//! and hands the parsed arguments to [`cli::execute`].

pub mod cli;
pub mod config;
