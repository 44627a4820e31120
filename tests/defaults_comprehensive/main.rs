//! Defaults Comprehensive Test Suite
//!
//! End-to-end tests through the `stowage` facade: bridges, accessors and
//! observations working together over real stores.
//!
//! ## Test Tier Structure
//!
//! - **Tier 1: Core Invariants** (fast, must pass)
//!   Round-trip, default fallback, clear equivalence, raw-value precedence,
//!   exactly-once delivery.
//!
//! - **Tier 2: Behavioral Scenarios**
//!   Preference-screen workflows, persistence across reopen, config files.
//!
//! - **Tier 3: Stress** (opt-in with #[ignore], slow)
//!   Concurrent writers, observers and cancels on shared keys.
//!
//! ## Running Tests
//!
//! ```bash
//! cargo test --test defaults_comprehensive
//!
//! # Stress tests
//! cargo test --test defaults_comprehensive stress -- --ignored
//! ```


// Tier 1
mod invariant_tests;

mod scenario_tests;

// Tier 3
mod stress_tests;
