//! Marketplace API
//!
//! REST backend for a small marketplace: accounts with USER/ADMIN roles,
//! a product catalog grouped by category, and orders whose line prices are
//! snapshotted when the order is placed.
//!
//! # Architecture Layers
//!
//! - **cli** / **commands**: `serve`, `migrate` and `seed`
//! - **config**: environment configuration and constants
//! - **domain**: entities and value objects
//! - **services**: use cases behind traits
//! - **infra**: SeaORM entities, repositories, migrations, Unit of Work
//! - **api**: handlers, middleware, extractors and routes
//! - **errors**: one error type and its HTTP mapping
//!
//! # CLI Usage
//!
//! ```bash
//! cargo run -- migrate up
//! cargo run -- seed --admin-email admin@example.com --admin-password changeme123
//! cargo run -- serve --port 3000
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod services;
pub mod types;

pub use api::AppState;
pub use config::Config;
pub use domain::{Order, OrderStatus, Password, Product, Role, User};
pub use errors::{AppError, AppResult};
