//! # Form Validation
//!
//! `Validator` accumulates per-field and general failures for a submitted
//! form. The free functions are the checks handlers feed into
//! [`Validator::check_field`].

use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;

/// Shape check for email addresses (the WHATWG "valid email" pattern).
pub static EMAIL_RX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"^[a-zA-Z0-9.!#$%&'*+/=?^_`{|}~-]+@[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?(?:\.[a-zA-Z0-9](?:[a-zA-Z0-9-]{0,61}[a-zA-Z0-9])?)*$",
    )
    .expect("email pattern compiles")
});

#[derive(Debug, Clone, Default, Serialize)]
pub struct Validator {
    /// Field name to its first failure message
    pub field_errors: BTreeMap<String, String>,
    pub non_field_errors: Vec<String>,
}

impl Validator {
    /// True when nothing has been recorded at all.
    pub fn valid(&self) -> bool {
        self.field_errors.is_empty() && self.non_field_errors.is_empty()
    }

    /// Record `message` for `key` unless that field already failed.
    pub fn add_field_error(&mut self, key: &str, message: &str) {
        self.field_errors
            .entry(key.to_string())
            .or_insert_with(|| message.to_string());
    }

    pub fn add_non_field_error(&mut self, message: &str) {
        self.non_field_errors.push(message.to_string());
    }

    pub fn check_field(&mut self, ok: bool, key: &str, message: &str) {
        if !ok {
            self.add_field_error(key, message);
        }
    }
}

pub fn not_blank(value: &str) -> bool {
    !value.trim().is_empty()
}

/// Counts characters, not bytes.
pub fn max_chars(value: &str, n: usize) -> bool {
    value.chars().count() <= n
}

pub fn min_chars(value: &str, n: usize) -> bool {
    value.chars().count() >= n
}

pub fn permitted_value<T: PartialEq>(value: T, permitted: &[T]) -> bool {
    permitted.contains(&value)
}

/// The whole of `value` must match; patterns are expected to be anchored.
pub fn matches(value: &str, rx: &Regex) -> bool {
    rx.is_match(value)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_first_message_per_field_is_kept() {
        let mut v = Validator::default();
        assert!(v.valid());

        v.check_field(false, "title", "This field cannot be blank");
        v.check_field(false, "title", "This field cannot be more than 100 characters long");
        v.check_field(true, "content", "never recorded");

        assert!(!v.valid());
        assert_eq!(v.field_errors.len(), 1);
        assert_eq!(v.field_errors["title"], "This field cannot be blank");
    }

    #[test]
    fn non_field_errors_make_it_invalid() {
        let mut v = Validator::default();
        v.add_non_field_error("Email or password is incorrect");
        assert!(!v.valid());
        assert!(v.field_errors.is_empty());
    }

    #[test]
    fn blank_means_whitespace_only() {
        assert!(!not_blank(""));
        assert!(!not_blank(" \t\n"));
        assert!(not_blank(" x "));
    }

    #[test]
    fn lengths_count_characters() {
        let hundred_wide = "é".repeat(100);
        assert_eq!(hundred_wide.len(), 200);
        assert!(max_chars(&hundred_wide, 100));
        assert!(!max_chars(&"é".repeat(101), 100));

        assert!(min_chars("ünïcödé", 7));
        assert!(!min_chars("ünïcöd", 7));
    }

    #[test]
    fn permitted_values() {
        for days in [1, 7, 365] {
            assert!(permitted_value(days, &[1, 7, 365]));
        }
        for days in [0, -1, 2, 30, 366] {
            assert!(!permitted_value(days, &[1, 7, 365]));
        }
    }

    #[test]
    fn email_shapes() {
        assert!(matches("alice@example.com", &EMAIL_RX));
        assert!(matches("a.b+tag@sub.example.co.uk", &EMAIL_RX));
        assert!(!matches("alice@", &EMAIL_RX));
        assert!(!matches("alice example.com", &EMAIL_RX));
        assert!(!matches("alice@-example.com", &EMAIL_RX));
    }
}
