//! CLI module for hackulus - command-line interface and subcommands.

pub mod commands;

pub use commands::Cli;
