//! Identifier format checks shared by services and DTOs.

use regex::Regex;
use std::sync::LazyLock;

/// Five-digit US ZIP code.
pub static ZIP_CODE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{5}$").expect("static pattern compiles"));

/// Public water system id: two-letter state code and seven digits.
pub static PWSID_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z]{2}\d{7}$").expect("static pattern compiles"));

pub fn is_zip_code(value: &str) -> bool {
    ZIP_CODE_RE.is_match(value)
}

pub fn is_pwsid(value: &str) -> bool {
    PWSID_RE.is_match(value)
}
