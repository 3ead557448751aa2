//! Shared constants for end-to-end tests
//!
//! When the fixture dataset changes, update only this file and fixtures.rs.

// ============================================================================
// Test Dataset Titles
// ============================================================================

pub const DUNE: &str = "Dune";
pub const EMMA: &str = "Emma";
pub const NEUROMANCER: &str = "Neuromancer";
pub const THE_HOBBIT: &str = "The Hobbit";

/// Present in the similarity matrix but missing from the catalog.
pub const GHOST_TITLE: &str = "Ghost Title";

/// Not present anywhere in the dataset.
pub const UNKNOWN_TITLE: &str = "A Book Nobody Wrote";

// ============================================================================
// Test Dataset Details
// ============================================================================

/// ISBN of the first catalog edition of The Hobbit
pub const THE_HOBBIT_ISBN: &str = "0261102214";

/// ISBN of the second catalog edition of The Hobbit, never served
pub const THE_HOBBIT_SECOND_ISBN: &str = "0345339681";

pub const THE_HOBBIT_AUTHOR: &str = "J. R. R. Tolkien";
pub const THE_HOBBIT_YEAR: &str = "1937";
pub const THE_HOBBIT_PUBLISHER: &str = "Allen & Unwin";

pub const DUNE_AUTHOR: &str = "Frank Herbert";

pub const NUM_BOOKS: usize = 5;
pub const NUM_POPULAR: usize = 2;
pub const NUM_KNOWN_TITLES: usize = 5;

/// Stylesheet served from the test static directory
pub const STATIC_CSS_NAME: &str = "style.css";
pub const STATIC_CSS_CONTENT: &str = "body { color: black; }";

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for the server to become ready
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Delay between readiness polls
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 20;

/// Timeout applied to every test request
pub const REQUEST_TIMEOUT_SECS: u64 = 5;
