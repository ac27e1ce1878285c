//! The password reset state machine.
//!
//! ```text
//! Idle ──request──▶ OtpSent ──verify──▶ OtpVerified ──complete──▶ Idle
//! ```
//!
//! Every transition is a pure function of the current state and its input
//! and returns the next state alongside the outcome. Loading and persisting
//! the state is the service's job. Failed transitions hand back the state
//! they were given, unchanged.

use schoolhub_core::AccountError;
use serde::{Deserialize, Serialize};

/// Reset progress for one session.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum ResetState {
    #[default]
    Idle,
    OtpSent {
        username: String,
        otp: u32,
    },
    OtpVerified {
        username: String,
        otp: u32,
    },
}

/// `(next_state, outcome)` produced by a transition.
pub type Transition<T> = (ResetState, Result<T, AccountError>);

impl ResetState {
    /// An OTP was delivered to `username`. Restarts the flow from any state.
    pub fn otp_sent(username: impl Into<String>, otp: u32) -> Self {
        ResetState::OtpSent {
            username: username.into(),
            otp,
        }
    }

    /// Checks a submitted code against the pending OTP.
    ///
    /// Input that is not a number is `InvalidFormat`; a wrong number, or no
    /// pending OTP at all, is `InvalidOtp`. A correct code moves the flow to
    /// `OtpVerified`. There is no attempt limit.
    pub fn verify(self, code: &str) -> Transition<()> {
        let submitted = match parse_code(code) {
            Ok(submitted) => submitted,
            Err(err) => return (self, Err(err)),
        };

        match self {
            ResetState::OtpSent { username, otp } | ResetState::OtpVerified { username, otp }
                if Some(otp) == submitted =>
            {
                (ResetState::OtpVerified { username, otp }, Ok(()))
            }
            state => (state, Err(AccountError::InvalidOtp)),
        }
    }

    /// Accepts the new password once the OTP has been verified.
    ///
    /// On success the flow returns to `Idle` and the outcome is the username
    /// whose password must now be stored. The caller persists the password
    /// before persisting the new state.
    pub fn complete(self, new_password: &str, confirm_password: &str) -> Transition<String> {
        match self {
            ResetState::OtpVerified { username, .. } if new_password == confirm_password => {
                (ResetState::Idle, Ok(username))
            }
            state @ ResetState::OtpVerified { .. } => (state, Err(AccountError::PasswordMismatch)),
            state => (state, Err(AccountError::ResetNotVerified)),
        }
    }
}

/// `Ok(None)` for a well-formed number too large to be any OTP.
fn parse_code(code: &str) -> Result<Option<u32>, AccountError> {
    let code = code.trim();
    let digits = code.strip_prefix('+').unwrap_or(code);

    if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AccountError::InvalidFormat("OTP".to_string()));
    }

    Ok(digits.parse().ok())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sent() -> ResetState {
        ResetState::otp_sent("adm001", 482913)
    }

    fn verified() -> ResetState {
        ResetState::OtpVerified {
            username: "adm001".into(),
            otp: 482913,
        }
    }

    #[test]
    fn test_correct_code_verifies() {
        let (state, result) = sent().verify("482913");
        assert!(result.is_ok());
        assert_eq!(state, verified());
    }

    #[test]
    fn test_surrounding_whitespace_is_ignored() {
        let (state, result) = sent().verify(" 482913\n");
        assert!(result.is_ok());
        assert_eq!(state, verified());
    }

    #[test]
    fn test_wrong_code_leaves_state_unchanged() {
        let (state, result) = sent().verify("111111");
        assert_eq!(result, Err(AccountError::InvalidOtp));
        assert_eq!(state, sent());
    }

    #[test]
    fn test_non_numeric_code_is_invalid_format() {
        for code in ["abc", "", "12a456", "4829.13", "-"] {
            let (state, result) = sent().verify(code);
            assert_eq!(
                result,
                Err(AccountError::InvalidFormat("OTP".into())),
                "code {code:?}"
            );
            assert_eq!(state, sent());
        }
    }

    #[test]
    fn test_oversized_number_is_a_mismatch() {
        let (_, result) = sent().verify("99999999999999999999");
        assert_eq!(result, Err(AccountError::InvalidOtp));
    }

    #[test]
    fn test_verify_without_pending_otp() {
        let (state, result) = ResetState::Idle.verify("482913");
        assert_eq!(result, Err(AccountError::InvalidOtp));
        assert_eq!(state, ResetState::Idle);
    }

    #[test]
    fn test_wrong_code_after_verification_keeps_verification() {
        let (state, result) = verified().verify("000000");
        assert_eq!(result, Err(AccountError::InvalidOtp));
        assert_eq!(state, verified());
    }

    #[test]
    fn test_complete_requires_verification() {
        for state in [ResetState::Idle, sent()] {
            let before = state.clone();
            let (after, result) = state.complete("newpass", "newpass");
            assert_eq!(result, Err(AccountError::ResetNotVerified));
            assert_eq!(after, before);
        }
    }

    #[test]
    fn test_complete_rejects_mismatch() {
        let (state, result) = verified().complete("newpass", "newpasss");
        assert_eq!(result, Err(AccountError::PasswordMismatch));
        assert_eq!(state, verified());
    }

    #[test]
    fn test_complete_returns_to_idle() {
        let (state, result) = verified().complete("newpass", "newpass");
        assert_eq!(result, Ok("adm001".to_string()));
        assert_eq!(state, ResetState::Idle);

        // Replaying the final step is refused.
        let (_, replay) = state.complete("newpass", "newpass");
        assert_eq!(replay, Err(AccountError::ResetNotVerified));
    }

    #[test]
    fn test_new_request_restarts_flow() {
        // A fresh OTP replaces a verified flow; the old code no longer works.
        let state = ResetState::otp_sent("other", 123456);
        let (state, result) = state.verify("482913");
        assert_eq!(result, Err(AccountError::InvalidOtp));
        assert_eq!(state, ResetState::otp_sent("other", 123456));
    }

    #[test]
    fn test_state_serializes_with_tag() {
        let json = serde_json::to_value(sent()).unwrap();
        assert_eq!(json["state"], "otp_sent");
        assert_eq!(json["username"], "adm001");
        let back: ResetState = serde_json::from_value(json).unwrap();
        assert_eq!(back, sent());
    }
}
