//! Token patterns for `date_parseable` formats.
//!
//! A pattern such as `YYYY/MM/DD` is made of three tokens and literal
//! characters. `YYYY` matches exactly four digits; `MM` and `DD` match one or
//! two digits. Every other character must appear verbatim.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::DefinitionError;

/// One element of a parsed date pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DatePart {
    Year,
    Month,
    Day,
    Literal(char),
}

/// Numeric date components extracted by a [`DateFormat`].
///
/// The components are not checked against the calendar here.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateComponents {
    pub year: i32,
    pub month: u32,
    pub day: u32,
}

/// A validated date pattern.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct DateFormat {
    pattern: String,
    parts: Vec<DatePart>,
}

impl DateFormat {
    /// Parse a pattern, requiring each of `YYYY`, `MM` and `DD` exactly once.
    pub fn parse(pattern: &str) -> Result<Self, DefinitionError> {
        let mut parts = Vec::new();
        let mut rest = pattern;
        while let Some(ch) = rest.chars().next() {
            if let Some(tail) = rest.strip_prefix("YYYY") {
                parts.push(DatePart::Year);
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("MM") {
                parts.push(DatePart::Month);
                rest = tail;
            } else if let Some(tail) = rest.strip_prefix("DD") {
                parts.push(DatePart::Day);
                rest = tail;
            } else {
                parts.push(DatePart::Literal(ch));
                rest = &rest[ch.len_utf8()..];
            }
        }

        for (token, part) in [
            ("YYYY", DatePart::Year),
            ("MM", DatePart::Month),
            ("DD", DatePart::Day),
        ] {
            let count = parts.iter().filter(|p| **p == part).count();
            if count != 1 {
                return Err(DefinitionError::InvalidDateFormat {
                    pattern: pattern.to_string(),
                    reason: format!("expected `{token}` exactly once, found {count}"),
                });
            }
        }

        Ok(Self {
            pattern: pattern.to_string(),
            parts,
        })
    }

    /// The formats used when a rule does not list any.
    pub fn defaults() -> Vec<DateFormat> {
        ["YYYY/MM/DD", "YYYY-MM-DD"]
            .into_iter()
            .filter_map(|pattern| DateFormat::parse(pattern).ok())
            .collect()
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn parts(&self) -> &[DatePart] {
        &self.parts
    }

    /// Extract year, month and day if `value` (trimmed) matches the whole pattern.
    pub fn extract(&self, value: &str) -> Option<DateComponents> {
        let chars: Vec<char> = value.trim().chars().collect();
        let mut found = Found::default();
        if match_parts(&self.parts, &chars, &mut found) {
            Some(DateComponents {
                year: found.year?,
                month: found.month?,
                day: found.day?,
            })
        } else {
            None
        }
    }
}

#[derive(Default, Clone, Copy)]
struct Found {
    year: Option<i32>,
    month: Option<u32>,
    day: Option<u32>,
}

fn digits_value(chars: &[char]) -> Option<u32> {
    chars.iter().try_fold(0u32, |acc, ch| {
        let digit = ch.to_digit(10)?;
        Some(acc * 10 + digit)
    })
}

/// Match `parts` against `input` in full, backtracking over the one-or-two
/// digit widths of month and day.
fn match_parts(parts: &[DatePart], input: &[char], found: &mut Found) -> bool {
    let Some((first, rest)) = parts.split_first() else {
        return input.is_empty();
    };
    match first {
        DatePart::Literal(ch) => match input.split_first() {
            Some((head, tail)) if head == ch => match_parts(rest, tail, found),
            _ => false,
        },
        DatePart::Year => {
            if input.len() < 4 {
                return false;
            }
            let Some(year) = digits_value(&input[..4]) else {
                return false;
            };
            let saved = *found;
            found.year = i32::try_from(year).ok();
            if match_parts(rest, &input[4..], found) {
                return true;
            }
            *found = saved;
            false
        }
        DatePart::Month | DatePart::Day => {
            for width in [2usize, 1] {
                if input.len() < width {
                    continue;
                }
                let Some(number) = digits_value(&input[..width]) else {
                    continue;
                };
                let saved = *found;
                if *first == DatePart::Month {
                    found.month = Some(number);
                } else {
                    found.day = Some(number);
                }
                if match_parts(rest, &input[width..], found) {
                    return true;
                }
                *found = saved;
            }
            false
        }
    }
}

impl TryFrom<String> for DateFormat {
    type Error = DefinitionError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        DateFormat::parse(&value)
    }
}

impl From<DateFormat> for String {
    fn from(value: DateFormat) -> Self {
        value.pattern
    }
}

impl fmt::Display for DateFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.pattern)
    }
}
