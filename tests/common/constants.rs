//! Shared constants for end-to-end tests
//!
//! When the fixture spots change, update only this file and `fixtures.rs`.

// ============================================================================
// Fixture Spot IDs
// ============================================================================

/// "Lose Yourself" by Eminem
pub const SPOT_1_ID: &str = "spot-1";

/// "Bad Romance" by Lady Gaga, the most viewed fixture
pub const SPOT_2_ID: &str = "spot-2";

/// "Sabotage" by Beastie Boys, the least viewed fixture
pub const SPOT_3_ID: &str = "spot-3";

/// "Closer" by Nine Inch Nails
pub const SPOT_4_ID: &str = "spot-4";

/// "Stan" by Eminem and Dido
pub const SPOT_5_ID: &str = "spot-5";

pub const FIXTURE_SPOTS_COUNT: usize = 5;

// ============================================================================
// Fixture Metadata
// ============================================================================

pub const SPOT_1_TITLE: &str = "Lose Yourself";

pub const SHARED_PERFORMER: &str = "Eminem";

pub const SHARED_LABEL: &str = "Interscope";

// ============================================================================
// Sessions
// ============================================================================

/// Session token injected into the session store by `TestServer::login_session`
pub const TEST_SESSION_TOKEN: &str = "test-session-token-0123456789";

pub const TEST_USER_SUBJECT: &str = "test-subject";

pub const TEST_USER_NAME: &str = "testuser";

// ============================================================================
// Test Timeouts and Configuration
// ============================================================================

/// Maximum time to wait for server to become ready (milliseconds)
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Timeout for individual HTTP requests (seconds)
pub const REQUEST_TIMEOUT_SECS: u64 = 10;

/// Polling interval when waiting for server ready (milliseconds)
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;
