//! Shared constants for end-to-end tests
//!
//! Tokens, codes and credentials understood by the fake upstream services.
//! When fixture data changes, update only this file and `fixtures.rs`.

// ============================================================================
// Access Tokens
// ============================================================================

/// Token accepted by the fake music API, with a full listening history
pub const VALID_TOKEN: &str = "BQDvalid-test-token-0123456789";

/// Token the fake music API rejects with 401 on every endpoint
pub const EXPIRED_TOKEN: &str = "BQDexpired-test-token-0123456789";

/// Token for a user whose top artists carry no genre tags
pub const NO_GENRES_TOKEN: &str = "BQDno-genres-test-token-0123456789";

/// Token whose top-artists call fails with 503
pub const FLAKY_TOKEN: &str = "BQDflaky-test-token-0123456789";

// ============================================================================
// OAuth
// ============================================================================

pub const CLIENT_ID: &str = "test-client-id";
pub const CLIENT_SECRET: &str = "test-client-secret";
pub const REDIRECT_URI: &str = "http://127.0.0.1:3001/api/callback";

/// Authorization code the fake accounts service exchanges successfully
pub const GOOD_CODE: &str = "AQDgood-code";

/// Tokens returned for [`GOOD_CODE`]
pub const ISSUED_ACCESS_TOKEN: &str = "BQDissued-access-token";
pub const ISSUED_REFRESH_TOKEN: &str = "AQDissued-refresh-token";
pub const ISSUED_EXPIRES_IN: i64 = 3600;

// ============================================================================
// Fixture data
// ============================================================================

pub const USER_ID: &str = "test-user";
pub const USER_DISPLAY_NAME: &str = "Test Listener";

/// Genres of the fake user's top artists, in first-seen order
pub const USER_GENRES: [&str; 6] = [
    "indie pop",
    "bedroom pop",
    "rock",
    "pop",
    "art pop",
    "dream pop",
];

// ============================================================================
// Timeouts
// ============================================================================

/// Maximum time to wait for server to become ready
pub const SERVER_READY_TIMEOUT_MS: u64 = 5000;

/// Interval between readiness checks
pub const SERVER_READY_POLL_INTERVAL_MS: u64 = 50;

/// Default timeout for HTTP requests in tests
pub const REQUEST_TIMEOUT_SECS: u64 = 10;
