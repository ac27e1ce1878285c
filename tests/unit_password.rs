use schoolhub_core::credentials::{
    OTP_MAX, OTP_MIN, PASSWORD_LENGTH, generate_otp, generate_password,
};
use schoolhub_core::password::{hash_password, verify_password};

#[test]
fn test_hash_password_success() {
    let password = "testpassword123";
    let hash = hash_password(password).unwrap();

    assert!(!hash.is_empty());
    assert_ne!(hash, password);
}

#[test]
fn test_verify_password_correct() {
    let hash = hash_password("correctpassword").unwrap();
    assert!(verify_password("correctpassword", &hash).unwrap());
}

#[test]
fn test_verify_password_incorrect() {
    let hash = hash_password("correctpassword").unwrap();
    assert!(!verify_password("wrongpassword", &hash).unwrap());
}

#[test]
fn test_same_password_hashes_differently() {
    let first = hash_password("repeatable").unwrap();
    let second = hash_password("repeatable").unwrap();

    assert_ne!(first, second);
    assert!(verify_password("repeatable", &first).unwrap());
    assert!(verify_password("repeatable", &second).unwrap());
}

#[test]
fn test_generated_password_is_alphanumeric() {
    for _ in 0..50 {
        let password = generate_password();
        assert!(password.len() >= PASSWORD_LENGTH);
        assert!(password.chars().all(|c| c.is_ascii_alphanumeric()));
    }
}

#[test]
fn test_generated_passwords_verify_after_hashing() {
    let password = generate_password();
    let hash = hash_password(&password).unwrap();
    assert!(verify_password(&password, &hash).unwrap());
}

#[test]
fn test_otp_is_six_digits() {
    for _ in 0..200 {
        let otp = generate_otp();
        assert!((OTP_MIN..=OTP_MAX).contains(&otp));
        assert_eq!(otp.to_string().len(), 6);
    }
}
