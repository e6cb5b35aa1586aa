//! Duplicate candidates and their resolutions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Which attributes made two records look alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchType {
    NameAddress,
    NameOnly,
    /// Part of the vocabulary, but no classification rule produces it yet.
    AddressOnly,
    /// An identifier such as email or phone is equal to an existing record's.
    Identifier,
}

impl MatchType {
    pub fn as_str(&self) -> &'static str {
        match self {
            MatchType::NameAddress => "name_address",
            MatchType::NameOnly => "name_only",
            MatchType::AddressOnly => "address_only",
            MatchType::Identifier => "identifier",
        }
    }
}

impl fmt::Display for MatchType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A probable duplicate of an earlier record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateCandidate {
    /// Index of the matched record (an earlier batch row, or an entry of an
    /// existing-record pool).
    pub candidate_index: usize,
    pub match_type: MatchType,
    /// Similarity score, 0..=100.
    pub score: u8,
    /// Human-readable justification.
    pub reason: String,
}

/// How a reviewer settled a duplicate candidate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResolutionAction {
    /// Merge the new row into the matched record.
    Merged,
    /// Keep both; create the new row as a separate record.
    CreatedNew,
    /// Drop the new row.
    Ignored,
}

impl ResolutionAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ResolutionAction::Merged => "merged",
            ResolutionAction::CreatedNew => "created_new",
            ResolutionAction::Ignored => "ignored",
        }
    }
}

impl fmt::Display for ResolutionAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ResolutionAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "merged" => Ok(ResolutionAction::Merged),
            "created_new" => Ok(ResolutionAction::CreatedNew),
            "ignored" => Ok(ResolutionAction::Ignored),
            other => Err(format!("unknown resolution action: {other}")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn address_only_is_serializable() {
        assert_eq!(
            serde_json::to_string(&MatchType::AddressOnly).unwrap(),
            "\"address_only\""
        );
    }

    #[test]
    fn resolution_parses_wire_names() {
        assert_eq!(
            "created_new".parse::<ResolutionAction>(),
            Ok(ResolutionAction::CreatedNew)
        );
        assert!("delete".parse::<ResolutionAction>().is_err());
    }
}
