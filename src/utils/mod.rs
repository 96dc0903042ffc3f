//! Utility functions for code generation, URL validation, and error mapping.
//!
//! - [`code_generator`] - Short code generation
//! - [`url_validation`] - Absolute URI validation
//! - [`db_error`] - `sqlx` error classification

pub mod code_generator;
pub mod db_error;
pub mod url_validation;
