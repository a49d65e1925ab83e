//! Studio Portal - design-studio portal API
//!
//! A REST backend for a design-studio service: clients open draft jobs,
//! upload artwork against them, submit for production, message their
//! designer, and pay for design packages; admins manage users, email
//! templates, voucher codes, and pricing.
//!
//! # Architecture Layers
//!
//! - **cli**: Command-line interface
//! - **commands**: CLI command implementations
//! - **config**: Application configuration and constants
//! - **domain**: Core business entities and logic
//! - **services**: Application use cases and business logic
//! - **infra**: Infrastructure (database, cache, storage, mail, payments)
//! - **api**: HTTP handlers, middleware, and routes
//! - **jobs**: Background jobs (email queue, draft sweep)
//! - **types**: Shared types (pagination, responses)
//! - **errors**: Centralized error handling
//!
//! # CLI Usage
//!
//! ```bash
//! # Start the server
//! cargo run -- serve
//!
//! # Run migrations
//! cargo run -- migrate up
//!
//! # Run the worker (email queue + daily draft sweep)
//! cargo run -- jobs work
//! ```

pub mod api;
pub mod cli;
pub mod commands;
pub mod config;
pub mod domain;
pub mod errors;
pub mod infra;
pub mod jobs;
pub mod services;
pub mod types;

// Re-export commonly used types at crate root
pub use api::AppState;
pub use config::Config;
pub use domain::{Actor, Password, User, UserRole};
pub use errors::{AppError, AppResult};
