//! Route tables for the web server.

pub mod api;
