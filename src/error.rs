//! Error types for hashbase
//!
//! Provides a unified error type for all operations.

use std::collections::TryReserveError;

use thiserror::Error;

/// Result type alias using HashbaseError
pub type Result<T> = std::result::Result<T, HashbaseError>;

/// Unified error type for hashbase operations
#[derive(Debug, Error)]
pub enum HashbaseError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Memory Errors
    // -------------------------------------------------------------------------
    #[error("Allocation failed: {0}")]
    Allocation(#[from] TryReserveError),

    // -------------------------------------------------------------------------
    // Store Errors
    // -------------------------------------------------------------------------
    #[error("Key not found")]
    KeyNotFound,

    #[error("Store is full ({capacity} slots)")]
    StoreFull { capacity: usize },

    // -------------------------------------------------------------------------
    // Protocol / Command Errors
    // -------------------------------------------------------------------------
    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Command error: {0}")]
    Command(String),

    // -------------------------------------------------------------------------
    // Network Errors
    // -------------------------------------------------------------------------
    #[error("Network error: {0}")]
    Network(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}
