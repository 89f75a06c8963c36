//! Voss Core - agricultural marketplace backend
//!
//! REST API over two identity pools (users and admins), the ownership policy
//! that guards every mutation, and a client that holds both kinds of session.

pub mod api;
pub mod client;
pub mod config;
pub mod domain;
pub mod error;
pub mod jwt;
pub mod middleware;
pub mod migration;
pub mod openapi;
pub mod policy;
pub mod repository;
pub mod server;
pub mod service;
pub mod state;
pub mod telemetry;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, Result};
