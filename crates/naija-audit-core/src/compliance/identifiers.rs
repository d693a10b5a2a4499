//! CAC registration and FIRS tax identification number formats.

use regex::Regex;
use std::sync::LazyLock;

/// Limited company (`RC`) or business name (`BN`) registration.
static CAC_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^(RC|BN)\d+$").unwrap());
static TIN_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^\d{12}$").unwrap());

/// Trimmed and upper-cased before matching, so `" rc123456 "` is valid.
pub fn is_valid_cac_number(raw: &str) -> bool {
    CAC_PATTERN.is_match(&raw.trim().to_ascii_uppercase())
}

/// TIN with hyphens and spaces removed.
pub fn normalize_tin(raw: &str) -> String {
    raw.chars().filter(|c| *c != '-' && !c.is_whitespace()).collect()
}

/// Twelve digits once separators are removed.
pub fn is_valid_tin(raw: &str) -> bool {
    TIN_PATTERN.is_match(&normalize_tin(raw))
}
