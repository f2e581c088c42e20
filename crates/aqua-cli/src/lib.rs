//! # aqua-cli — Service Entry Point
//!
//! Subcommand handlers for the `aqua` binary. Currently a single
//! `serve` subcommand that runs the HTTP matching service.

pub mod serve;
