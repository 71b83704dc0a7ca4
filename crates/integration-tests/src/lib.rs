//! Integration tests for Himsols.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p himsols-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `cart_ledger` - Cart arithmetic and checkout across many operation sequences
//! - `form_flow` - Submission, validation and timed reset with the tokio scheduler
//! - `session` - Page navigation in the interactive session
