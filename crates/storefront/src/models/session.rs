//! Session keys.
//!
//! The session never holds a copy of the user record, only its ID; the
//! record itself is reloaded from the store on each request.

/// Session keys for authentication data.
pub mod keys {
    /// Key for the logged-in user's ID.
    pub const USER_ID: &str = "_user_id";

    /// Key for queued flash messages.
    pub const FLASHES: &str = "_flashes";
}
