//! MCP server
//!
//! Exposes the calculator and profile tools over stdio.

mod server;

pub use server::WeightcalcService;
