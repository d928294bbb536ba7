//! Workspace-level behavioral specs for the `gw` binary
//!
//! Run with `cargo test --workspace` so the binary is built first.

#[path = "specs/prelude.rs"]
mod prelude;

#[path = "specs/cli/mod.rs"]
mod cli;
