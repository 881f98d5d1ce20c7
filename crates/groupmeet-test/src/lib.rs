//! Shared test fixtures for groupmeet crates.
//!
//! This crate provides data and pure functions for testing. It depends on
//! `groupmeet-core` only, so the solver can use it as a dev-dependency.
//!
//! - [`roster`] - participant builders
//! - [`scenarios`] - reference scheduling rounds
//! - [`invariants`] - independent check of the hard constraints
//! - [`brute_force`] - exhaustive optimum for tiny rounds
//!
//! # Usage
//!
//! Add as a dev-dependency in your crate's `Cargo.toml`:
//!
//! ```toml
//! [dev-dependencies]
//! groupmeet-test = { workspace = true }
//! ```
//!
//! Then import the fixtures you need:
//!
//! ```
//! use groupmeet_test::scenarios;
//! use groupmeet_test::invariants::check_invariants;
//!
//! let scenario = scenarios::single_overflow_slot();
//! assert_eq!(scenario.problem.participants().len(), 6);
//! ```

pub mod brute_force;
pub mod invariants;
pub mod roster;
pub mod scenarios;

pub use brute_force::optimal_cost;
pub use invariants::{check_invariants, recompute_cost};
pub use roster::{numbered_roster, roster};
pub use scenarios::Scenario;
