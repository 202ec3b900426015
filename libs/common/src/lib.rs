//! Common library for the FocusFlow backend
//!
//! This crate provides shared infrastructure used by the FocusFlow
//! services: PostgreSQL connection pooling, database health checks,
//! and the database error taxonomy.

pub mod database;
pub mod error;
