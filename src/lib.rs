//! goscaffold - scaffold a Go web service skeleton
//!
//! Creates the directory layout, runs `go mod init` and `go get` for a fixed
//! dependency set, writes placeholder files and a completion marker. Rolls
//! back a half-created project on failure.

pub mod commands;
pub mod config;
pub mod errors;
pub mod models;
pub mod rollback;
pub mod runner;
pub mod steps;
pub mod validation;
pub mod workflow;
