//! Credential material issued to new accounts and password reset flows.
//!
//! Everything here draws from [`rand::rngs::OsRng`]. The generators are
//! synchronous so callers never hold an RNG across an `.await`.

use rand::{Rng, distributions::Alphanumeric, rngs::OsRng};

/// Length of generated initial passwords.
pub const PASSWORD_LENGTH: usize = 12;

/// Inclusive bounds of a password reset one-time code.
pub const OTP_MIN: u32 = 100_000;
pub const OTP_MAX: u32 = 999_999;

/// Random password over `[A-Za-z0-9]`.
pub fn generate_password() -> String {
    generate_password_with_length(PASSWORD_LENGTH)
}

pub fn generate_password_with_length(length: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(length.max(PASSWORD_LENGTH))
        .map(char::from)
        .collect()
}

/// Lowercase alphanumeric suffix used in generated usernames.
pub fn random_suffix(length: usize) -> String {
    OsRng
        .sample_iter(&Alphanumeric)
        .take(length)
        .map(|b| char::from(b).to_ascii_lowercase())
        .collect()
}

/// Six digit code, uniform over [`OTP_MIN`]..=[`OTP_MAX`].
pub fn generate_otp() -> u32 {
    OsRng.gen_range(OTP_MIN..=OTP_MAX)
}

/// `jonathan@school.edu` -> `jo****@school.edu`.
///
/// Keeps the first two characters of the address and everything from the
/// `@` on. An address without `@` keeps only the two leading characters.
pub fn mask_email(email: &str) -> String {
    let head: String = email.chars().take(2).collect();
    let domain = email.find('@').map(|idx| &email[idx..]).unwrap_or("");
    format!("{}****{}", head, domain)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_password_length_and_alphabet() {
        let password = generate_password();
        assert_eq!(password.len(), PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }

    #[test]
    fn test_password_never_shorter_than_minimum() {
        assert_eq!(generate_password_with_length(4).len(), PASSWORD_LENGTH);
        assert_eq!(generate_password_with_length(20).len(), 20);
    }

    #[test]
    fn test_passwords_are_distinct() {
        let set: HashSet<String> = (0..50).map(|_| generate_password()).collect();
        assert_eq!(set.len(), 50);
    }

    #[test]
    fn test_random_suffix_is_lowercase() {
        let suffix = random_suffix(6);
        assert_eq!(suffix.len(), 6);
        assert!(
            suffix
                .chars()
                .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit())
        );
    }

    #[test]
    fn test_otp_range() {
        for _ in 0..1000 {
            let otp = generate_otp();
            assert!((OTP_MIN..=OTP_MAX).contains(&otp));
        }
    }

    #[test]
    fn test_mask_email() {
        assert_eq!(mask_email("jonathan@school.edu"), "jo****@school.edu");
        assert_eq!(mask_email("a@b.io"), "a@****@b.io");
        assert_eq!(mask_email("nodomain"), "no****");
    }
}
