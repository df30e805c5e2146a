//! ARGUS — Resolution-Source Monitoring & Arbitrage Signal Engine
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod config;
pub mod types;
pub mod text;
pub mod sources;
pub mod http;
pub mod ingest;
pub mod monitor;
pub mod roi;
pub mod detector;
pub mod signals;
pub mod state;
pub mod engine;
