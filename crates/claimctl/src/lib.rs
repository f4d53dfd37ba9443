//! claimctl library - exposes modules for integration tests

pub mod cli;
pub mod commands;
pub mod errors;
pub mod logging;
pub mod render;
pub mod repl;
pub mod spinner;
