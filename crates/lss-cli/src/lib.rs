//! Command-line host for label sheets.
//!
//! Wires record ingestion, option persistence and the label session
//! together behind the `label-sheet` binary.

pub mod cli;
pub mod commands;
pub mod logging;
pub mod output;
