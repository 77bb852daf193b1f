//! Adapters - concrete implementations of ports
//!
//! Each adapter stores named slots somewhere: JSON files on disk, a DuckDB
//! table, or a process-local map.

pub mod duckdb;
pub mod file;
pub mod memory;
