//! # Blog API Server
//!
//! HTTP surface for the post resource. The binary in `main.rs` wires these
//! modules to a listening socket; tests mount the same routes in-process.

pub mod config;
pub mod handlers;
pub mod middleware;
pub mod state;
pub mod telemetry;
