//! HTTP server module for the OEE backend.
//!
//! This module provides an axum-based HTTP server that exposes the
//! aggregation services as a REST API and pushes results over WebSockets.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────┐
//! │  HTTP Layer (axum handlers, WebSocket push loops)         │
//! │  - Request parsing and validation                         │
//! │  - JSON serialization, CORS, compression                  │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Service Layer (services/)                                │
//! │  - Per-model aggregation, hourly rollup                   │
//! │  - Subscription registry                                  │
//! └───────────────────┬──────────────────────────────────────┘
//!                     │
//! ┌───────────────────▼──────────────────────────────────────┐
//! │  Repository Layer (db/)                                   │
//! │  - LocalRepository / MssqlRepository                      │
//! └──────────────────────────────────────────────────────────┘
//! ```

pub mod config;
pub mod dto;
pub mod error;
pub mod handlers;
pub mod router;
pub mod state;
pub mod ws;

pub use config::ServerConfig;
pub use router::create_router;
pub use state::AppState;
