//! Command-line interface for pipeline-forge.
//!
//! Provides commands for rendering, linting and deploying pipeline models,
//! browsing the component registry, and serving the generation endpoint.

mod commands;

pub use commands::{load_model_file, parse_cli, run, run_with_cli, Cli, Commands};
