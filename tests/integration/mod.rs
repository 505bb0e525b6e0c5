//! Integration tests for editor-shell
//!
//! These tests drive the shell state, the persistence layer, the HTTP client
//! and the bundled server together.

#[path = "../common/mod.rs"]
pub mod common;

pub mod polling;
pub mod proxy;
pub mod shell_flow;
