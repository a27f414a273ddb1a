//! Input validation for prompted configuration values.

use std::sync::LazyLock;

use regex::Regex;

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_.+-]+@[A-Za-z0-9-]+\.[A-Za-z0-9-.]+$")
        .expect("email pattern compiles")
});

static RECAPTCHA_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z0-9_-]{40}$").expect("recaptcha key pattern compiles")
});

/// Shape check for a mail address: `local@domain.tld`. No MX or network
/// verification.
pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

/// Shape check for a reCAPTCHA secret key: exactly 40 characters from
/// `[A-Za-z0-9_-]`.
pub fn is_valid_recaptcha_key(value: &str) -> bool {
    RECAPTCHA_KEY_RE.is_match(value)
}
