//! # OEE Rust Backend
//!
//! Overall Equipment Effectiveness engine for production lines.
//!
//! This crate turns raw per-unit test records (pass/fail, model, target rate)
//! into Quality, Performance and OEE figures over arbitrary ranges and
//! hour-aligned buckets, and serves them over a REST and WebSocket API.
//!
//! ## Architecture
//!
//! The crate is organized into several logical modules:
//!
//! - [`models`]: Records, time windows, shifts and summary types
//! - [`db`]: Record store abstraction (in-memory and SQL Server repositories)
//! - [`services`]: Per-model aggregation, hourly rollup, subscriptions
//! - [`http`]: Axum-based HTTP server, WebSocket push loop
//!
//! ## Metrics
//!
//! - **Quality**: passed units over all units
//! - **Performance**: theoretical time at the target rate over elapsed time
//! - **OEE**: Quality × Performance
//!
//! A model without a target rate has no Performance or OEE; that is reported
//! as `null`, never as zero.

// Allow large error types - RepositoryError contains rich context for debugging
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
