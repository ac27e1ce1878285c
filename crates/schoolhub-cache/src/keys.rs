//! Key builders for values kept in the session store.

/// Key for the password reset state of one browser session.
pub fn password_reset(session_id: &str) -> String {
    format!("password_reset:{}", session_id)
}
