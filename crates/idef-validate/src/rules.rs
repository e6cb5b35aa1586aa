//! Per-rule checks.

use std::sync::LazyLock;

use idef_model::Validator;
use regex::Regex;

use crate::date;

/// Practical email shape: no whitespace, one `@`, a dot in the domain.
static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("Invalid email regex")
});

/// Length in Unicode scalar values.
fn char_len(value: &str) -> usize {
    value.chars().count()
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value)
}

/// Check `value` against one validator.
///
/// Returns the user-facing message when the rule fails.
pub fn check(validator: &Validator, label: &str, value: &str) -> Option<String> {
    match validator {
        Validator::MinLength { value: min } => {
            (char_len(value) < *min).then(|| format!("{label} must be at least {min} characters"))
        }
        Validator::MaxLength { value: max } => {
            let max = (*max)?;
            (char_len(value) > max).then(|| format!("{label} must be at most {max} characters"))
        }
        Validator::EmailFormat => {
            (!is_valid_email(value)).then(|| format!("{label} has an invalid format"))
        }
        Validator::PhoneJpLen { min, max } => {
            let len = char_len(value);
            (len < *min || len > *max).then(|| format!("{label} must be {min} to {max} digits"))
        }
        Validator::EnumOneOf { values } => (!values.iter().any(|allowed| allowed == value))
            .then(|| format!("{label} is invalid (allowed: {})", values.join(", "))),
        Validator::DateParseable { formats } => (!date::is_parseable(value, formats))
            .then(|| format!("{label} has an invalid date format")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("taro.yamada+x@example.co.jp"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a b@c.d"));
        assert!(!is_valid_email("a@@b.c"));
        assert!(!is_valid_email("@b.c"));
    }

    #[test]
    fn lengths_count_characters_not_bytes() {
        let min = Validator::MinLength { value: 3 };
        assert_eq!(check(&min, "Name", "山田太"), None);
        assert_eq!(
            check(&min, "Name", "山田").as_deref(),
            Some("Name must be at least 3 characters")
        );

        let max = Validator::MaxLength { value: Some(2) };
        assert_eq!(check(&max, "Name", "山田"), None);
        assert_eq!(
            check(&max, "Name", "山田太").as_deref(),
            Some("Name must be at most 2 characters")
        );
    }

    #[test]
    fn unlimited_max_length_never_fails() {
        let max = Validator::MaxLength { value: None };
        assert_eq!(check(&max, "Memo", &"x".repeat(10_000)), None);
    }

    #[test]
    fn phone_bounds_are_inclusive() {
        let phone = Validator::phone_jp_len();
        assert_eq!(check(&phone, "Phone", "123456789"), None);
        assert_eq!(check(&phone, "Phone", "12345678901"), None);
        assert_eq!(
            check(&phone, "Phone", "12345678").as_deref(),
            Some("Phone must be 9 to 11 digits")
        );
        assert!(check(&phone, "Phone", "123456789012").is_some());
    }

    #[test]
    fn enum_membership_is_exact() {
        let gender = Validator::one_of(["male", "female"]);
        assert_eq!(check(&gender, "Gender", "female"), None);
        assert_eq!(
            check(&gender, "Gender", "Female").as_deref(),
            Some("Gender is invalid (allowed: male, female)")
        );
    }

    #[test]
    fn date_rule_uses_calendar() {
        let birthday = Validator::date_parseable();
        assert_eq!(check(&birthday, "Birthday", "2024/02/29"), None);
        assert_eq!(
            check(&birthday, "Birthday", "2024/02/30").as_deref(),
            Some("Birthday has an invalid date format")
        );
    }
}
