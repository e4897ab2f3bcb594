//! Backend core for a demo sales-intelligence dashboard.
//!
//! Owns the SQLite store of synthetic beverage-industry sales data (accounts,
//! opportunities, communications, AI insights), the validation contract every
//! write passes through, and the read-side aggregations the dashboards render.
//! HTTP routing, page rendering, and the remote-model client sit outside this
//! crate and consume it through `SalesDb`, `queries::*`, and `insight_io::*`.

pub mod config;
pub mod db;
pub mod demo;
pub mod insight_io;
mod migrations;
pub mod queries;
pub mod types;
pub mod validate;

pub use config::StoreConfig;
pub use db::{SalesDb, StoreError};
