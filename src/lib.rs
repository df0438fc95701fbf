//! Weight-Loss Calculator library
//!
//! Projection engine (target date from intake, or intake from target date)
//! plus the profile store and MCP tools built on it.

pub mod build_info;
pub mod calculator;
pub mod config;
pub mod db;
pub mod mcp;
pub mod models;
pub mod tools;
