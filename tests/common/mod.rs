//! Common test utilities and fixtures for the caro-store test suite.
//!
//! Shared records, keys, and helpers used across store, file medium, crypto,
//! and property-based tests.

pub mod fixtures;
