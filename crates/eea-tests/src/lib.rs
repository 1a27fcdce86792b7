//! Integration tests for the E/E architecture builder
//!
//! This crate contains tests that exercise the full pipeline:
//! - definition loading and the dependency-ordered build
//! - validation of the finished model
//! - export through the file and mock backends
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p eea-tests
//! ```
//!
//! # Test Structure
//!
//! - `e2e_test.rs` - Built-in platform from definition to exported document
//! - `validation_test.rs` - Build-time errors and validator findings

// This crate only contains tests, no library code
