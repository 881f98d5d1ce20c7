//! Participant builders.
//!
//! # Example
//!
//! ```
//! use groupmeet_test::roster::{numbered_roster, roster};
//!
//! let named = roster(&["A", "B"]);
//! assert_eq!(named[1].id().as_str(), "B");
//!
//! let numbered = numbered_roster(3);
//! assert_eq!(numbered[2].name(), "P2");
//! ```

use groupmeet_core::Participant;

/// Creates participants whose id and name are the given strings.
pub fn roster(names: &[&str]) -> Vec<Participant> {
    names.iter().map(|&name| Participant::named(name)).collect()
}

/// Creates `n` participants named `P0`, `P1`, ...
pub fn numbered_roster(n: usize) -> Vec<Participant> {
    (0..n).map(|i| Participant::named(format!("P{i}"))).collect()
}
