//! Phone number helpers.
//!
//! Nothing here rewrites a number. Advisories are warnings for the caller to
//! show; the builder never rejects a request because of them.

use serde::Deserialize;

/// One phone number attached to a contact record.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct PhoneEntry {
    pub phone: String,
    #[serde(default, alias = "is_primary_phone")]
    pub is_primary: bool,
}

impl PhoneEntry {
    pub fn new(phone: impl Into<String>, is_primary: bool) -> Self {
        Self {
            phone: phone.into(),
            is_primary,
        }
    }
}

/// Pick the number to message for a record.
///
/// The first primary-flagged entry with a non-blank number wins; otherwise
/// the first entry, if its number is non-blank.
pub fn select_primary_phone(entries: &[PhoneEntry]) -> Option<&str> {
    entries
        .iter()
        .find(|e| e.is_primary && !e.phone.trim().is_empty())
        .or_else(|| entries.first().filter(|e| !e.phone.trim().is_empty()))
        .map(|e| e.phone.trim())
}

/// Non-blocking observations about a phone number.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PhoneAdvisory {
    /// No leading `+` country-code prefix.
    MissingCountryCode,
    /// Spaces, dashes, brackets or other non-digit characters.
    ContainsFormatting,
}

impl PhoneAdvisory {
    pub fn message(&self) -> &'static str {
        match self {
            Self::MissingCountryCode => "Include country code (e.g. +966501234567)",
            Self::ContainsFormatting => "Phone number contains characters other than digits",
        }
    }
}

/// Advisories for `phone`, in a stable order.
pub fn advise(phone: &str) -> Vec<PhoneAdvisory> {
    let phone = phone.trim();
    let mut advisories = Vec::new();
    if phone.is_empty() {
        return advisories;
    }

    let digits = phone.strip_prefix('+');
    if digits.is_none() {
        advisories.push(PhoneAdvisory::MissingCountryCode);
    }
    if !digits.unwrap_or(phone).chars().all(|c| c.is_ascii_digit()) {
        advisories.push(PhoneAdvisory::ContainsFormatting);
    }

    advisories
}
