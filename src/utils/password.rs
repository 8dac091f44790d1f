use rand::Rng;

const ALPHANUMERIC_UPPER: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";

/// Random uppercase-alphanumeric string, used for generated account
/// passwords (8 chars) and password-reset tokens (12 chars).
pub fn generate_password(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| ALPHANUMERIC_UPPER[rng.gen_range(0..ALPHANUMERIC_UPPER.len())] as char)
        .collect()
}

/// Four-digit numeric OTP for password reset.
pub fn generate_otp() -> String {
    let mut rng = rand::thread_rng();
    (0..4).map(|_| rng.gen_range(0..10).to_string()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn generated_password_has_requested_length_and_charset() {
        let pwd = generate_password(8);
        assert_eq!(pwd.len(), 8);
        assert!(pwd
            .chars()
            .all(|c| c.is_ascii_uppercase() || c.is_ascii_digit()));
    }

    #[test]
    fn otp_is_four_digits() {
        let otp = generate_otp();
        assert_eq!(otp.len(), 4);
        assert!(otp.chars().all(|c| c.is_ascii_digit()));
    }
}
