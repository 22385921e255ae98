//! Command implementations
//!
//! Each submodule backs one subcommand. All of them receive the registry,
//! client, and config explicitly from `main`.

pub mod list;
pub mod push;
pub mod save;
pub mod web;
