//! Duplicate candidate detection.
//!
//! Each record is compared against the records before it (or against a pool
//! of existing records) by name and address similarity. Records carrying a
//! reliable identifier are skipped by the similarity pass; against a pool of
//! existing records they are matched on equal identifiers instead.

use std::collections::BTreeMap;

use idef_model::{
    DEFAULT_CANDIDATE_THRESHOLD, DedupePolicy, DuplicateCandidate, MatchType, RowProcessed,
};

use crate::similarity::{average, similarity};

/// Name key used when the policy names none.
pub const DEFAULT_NAME_KEY: &str = "full_name";
/// Address key used when the policy names none.
pub const DEFAULT_ADDRESS_KEY: &str = "address_line1";
/// Identifier keys used when there is no policy at all.
pub const DEFAULT_PRIORITY_KEYS: [&str; 2] = ["email", "phone"];

const STRONG_NAME: u8 = 90;
const STRONG_NAME_ADDRESS: u8 = 80;
const WEAK_MATCH: u8 = 70;
const EXACT_SCORE: u8 = 100;

/// Read access to normalized values by field key.
pub trait NormalizedRecord {
    /// The normalized value for `key`, or `""` when absent.
    fn value(&self, key: &str) -> &str;
}

impl NormalizedRecord for RowProcessed {
    fn value(&self, key: &str) -> &str {
        self.normalized_value(key)
    }
}

impl NormalizedRecord for BTreeMap<String, String> {
    fn value(&self, key: &str) -> &str {
        self.get(key).map_or("", String::as_str)
    }
}

fn is_blank(value: &str) -> bool {
    value.trim().is_empty()
}

/// Resolved detection settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DedupeConfig {
    /// A record with any of these non-blank is never fuzzily matched.
    pub priority_keys: Vec<String>,
    pub name_key: String,
    pub address_key: String,
    /// Minimum score for a candidate to be reported.
    pub threshold: u8,
}

impl Default for DedupeConfig {
    fn default() -> Self {
        Self {
            priority_keys: DEFAULT_PRIORITY_KEYS.iter().map(ToString::to_string).collect(),
            name_key: DEFAULT_NAME_KEY.to_string(),
            address_key: DEFAULT_ADDRESS_KEY.to_string(),
            threshold: DEFAULT_CANDIDATE_THRESHOLD,
        }
    }
}

impl DedupeConfig {
    /// Resolve settings from an optional definition policy.
    ///
    /// Priority keys are the union of `priority_keys` and
    /// `candidate_rule.when_missing_all`. The first two `match_keys` name the
    /// name and address fields; further keys are ignored.
    pub fn from_policy(policy: Option<&DedupePolicy>) -> Self {
        let Some(policy) = policy else {
            return Self::default();
        };

        let mut priority_keys: Vec<String> = Vec::new();
        let rule_keys = policy
            .candidate_rule
            .iter()
            .flat_map(|rule| rule.when_missing_all.iter());
        for key in policy.priority_keys.iter().chain(rule_keys) {
            if !priority_keys.contains(key) {
                priority_keys.push(key.clone());
            }
        }

        let match_keys = policy
            .candidate_rule
            .as_ref()
            .map(|rule| rule.match_keys.as_slice())
            .unwrap_or_default();

        Self {
            priority_keys,
            name_key: match_keys
                .first()
                .cloned()
                .unwrap_or_else(|| DEFAULT_NAME_KEY.to_string()),
            address_key: match_keys
                .get(1)
                .cloned()
                .unwrap_or_else(|| DEFAULT_ADDRESS_KEY.to_string()),
            threshold: policy.threshold(),
        }
    }

    pub fn with_threshold(mut self, threshold: u8) -> Self {
        self.threshold = threshold;
        self
    }
}

/// Scores and classifies candidate pairs under a [`DedupeConfig`].
#[derive(Debug, Clone, Default)]
pub struct CandidateDetector {
    config: DedupeConfig,
}

impl CandidateDetector {
    pub fn new(config: DedupeConfig) -> Self {
        Self { config }
    }

    pub fn from_policy(policy: Option<&DedupePolicy>) -> Self {
        Self::new(DedupeConfig::from_policy(policy))
    }

    pub fn config(&self) -> &DedupeConfig {
        &self.config
    }

    /// Whether `record` carries an identifier that disables fuzzy matching.
    pub fn is_suppressed<R: NormalizedRecord + ?Sized>(&self, record: &R) -> bool {
        self.config
            .priority_keys
            .iter()
            .any(|key| !is_blank(record.value(key)))
    }

    /// Candidates for `rows[index]` among `rows[..index]`.
    ///
    /// Returns nothing when `index` is out of range.
    pub fn detect_for_row<R: NormalizedRecord>(
        &self,
        rows: &[R],
        index: usize,
    ) -> Vec<DuplicateCandidate> {
        match rows.get(index) {
            Some(record) => self.detect_against(record, &rows[..index]),
            None => Vec::new(),
        }
    }

    /// Candidates for every row, each against its own prefix.
    pub fn detect_all<R: NormalizedRecord>(&self, rows: &[R]) -> Vec<Vec<DuplicateCandidate>> {
        let all: Vec<_> = (0..rows.len())
            .map(|index| self.detect_for_row(rows, index))
            .collect();
        tracing::debug!(
            rows = rows.len(),
            rows_with_candidates = all.iter().filter(|c| !c.is_empty()).count(),
            candidates = all.iter().map(Vec::len).sum::<usize>(),
            threshold = self.config.threshold,
            "duplicate detection complete"
        );
        all
    }

    /// Candidates for `record` among `pool`; indices point into `pool`.
    ///
    /// Results are sorted by score, highest first; ties keep pool order.
    pub fn detect_against<R, P>(&self, record: &R, pool: &[P]) -> Vec<DuplicateCandidate>
    where
        R: NormalizedRecord + ?Sized,
        P: NormalizedRecord,
    {
        if self.is_suppressed(record) {
            tracing::trace!("identifier present, fuzzy matching skipped");
            return Vec::new();
        }
        let name = record.value(&self.config.name_key);
        if is_blank(name) {
            return Vec::new();
        }
        let address = record.value(&self.config.address_key);

        let mut candidates: Vec<DuplicateCandidate> = pool
            .iter()
            .enumerate()
            .filter_map(|(index, other)| self.compare(name, address, other, index))
            .filter(|candidate| candidate.score >= self.config.threshold)
            .collect();
        candidates.sort_by(|a, b| b.score.cmp(&a.score));
        candidates
    }

    /// Candidates for `record` among pre-existing records.
    ///
    /// Every pool entry sharing a non-blank priority key value with `record`
    /// is reported at score 100, named after the first equal key in priority
    /// order. Only when no identifier is equal do the similarity rules of
    /// [`CandidateDetector::detect_against`] apply.
    pub fn detect_existing<R, P>(&self, record: &R, pool: &[P]) -> Vec<DuplicateCandidate>
    where
        R: NormalizedRecord + ?Sized,
        P: NormalizedRecord,
    {
        let exact: Vec<DuplicateCandidate> = pool
            .iter()
            .enumerate()
            .filter_map(|(index, other)| self.identifier_match(record, other, index))
            .collect();
        if exact.is_empty() {
            self.detect_against(record, pool)
        } else {
            tracing::trace!(matches = exact.len(), "identifier matched existing records");
            exact
        }
    }

    fn identifier_match<R, P>(
        &self,
        record: &R,
        other: &P,
        index: usize,
    ) -> Option<DuplicateCandidate>
    where
        R: NormalizedRecord + ?Sized,
        P: NormalizedRecord,
    {
        self.config.priority_keys.iter().find_map(|key| {
            let value = record.value(key);
            (!is_blank(value) && value == other.value(key)).then(|| DuplicateCandidate {
                candidate_index: index,
                match_type: MatchType::Identifier,
                score: EXACT_SCORE,
                reason: format!("{key} exact match: {value}"),
            })
        })
    }

    fn compare<P: NormalizedRecord>(
        &self,
        name: &str,
        address: &str,
        other: &P,
        index: usize,
    ) -> Option<DuplicateCandidate> {
        let other_name = other.value(&self.config.name_key);
        if is_blank(other_name) {
            return None;
        }
        let other_address = other.value(&self.config.address_key);

        let name_sim = similarity(name, other_name);
        let addr_sim = if is_blank(address) || is_blank(other_address) {
            0
        } else {
            similarity(address, other_address)
        };

        let name_reason = format!("name similar: {other_name} ({name_sim}%)");
        let with_address =
            || format!("{name_reason} / address similar: {other_address} ({addr_sim}%)");

        let (match_type, score, reason) =
            if name_sim >= STRONG_NAME && addr_sim >= STRONG_NAME_ADDRESS {
                (MatchType::NameAddress, average(name_sim, addr_sim), with_address())
            } else if name_sim >= STRONG_NAME {
                (MatchType::NameOnly, name_sim, name_reason.clone())
            } else if name_sim >= WEAK_MATCH && addr_sim >= WEAK_MATCH {
                (MatchType::NameAddress, average(name_sim, addr_sim), with_address())
            } else {
                return None;
            };

        Some(DuplicateCandidate {
            candidate_index: index,
            match_type,
            score,
            reason,
        })
    }
}

/// Detect candidates for every row with default keys and the given threshold.
pub fn detect_all_candidates<R: NormalizedRecord>(
    rows: &[R],
    threshold: u8,
) -> Vec<Vec<DuplicateCandidate>> {
    CandidateDetector::new(DedupeConfig::default().with_threshold(threshold)).detect_all(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use idef_model::CandidateRule;

    fn record(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn policy_keys_are_merged_without_duplicates() {
        let policy = DedupePolicy {
            priority_keys: vec!["email_norm".into(), "phone".into()],
            candidate_rule: Some(CandidateRule {
                when_missing_all: vec!["phone".into(), "member_no".into()],
                match_keys: vec!["name".into(), "addr".into(), "city".into()],
                threshold: 80,
            }),
        };
        let config = DedupeConfig::from_policy(Some(&policy));
        assert_eq!(config.priority_keys, ["email_norm", "phone", "member_no"]);
        assert_eq!(config.name_key, "name");
        assert_eq!(config.address_key, "addr");
        assert_eq!(config.threshold, 80);
    }

    #[test]
    fn policy_without_rule_uses_default_match_keys() {
        let policy = DedupePolicy {
            priority_keys: vec!["email".into()],
            candidate_rule: None,
        };
        let config = DedupeConfig::from_policy(Some(&policy));
        assert_eq!(config.priority_keys, ["email"]);
        assert_eq!(config.name_key, DEFAULT_NAME_KEY);
        assert_eq!(config.address_key, DEFAULT_ADDRESS_KEY);
        assert_eq!(config.threshold, DEFAULT_CANDIDATE_THRESHOLD);
        assert_eq!(DedupeConfig::from_policy(None), DedupeConfig::default());
    }

    #[test]
    fn strong_name_without_address_is_name_only() {
        let detector = CandidateDetector::default();
        let rows = vec![
            record(&[("full_name", "Yamada Taro")]),
            record(&[("full_name", "Yamada Taro")]),
        ];
        let found = detector.detect_for_row(&rows, 1);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].match_type, MatchType::NameOnly);
        assert_eq!(found[0].score, 100);
        assert_eq!(found[0].reason, "name similar: Yamada Taro (100%)");
    }

    #[test]
    fn weak_name_needs_address() {
        let detector = CandidateDetector::default();
        // "abcdefghij" vs "abcdefgxyz": 70%.
        let rows = vec![
            record(&[("full_name", "abcdefghij"), ("address_line1", "1-2-3 Chuo")]),
            record(&[("full_name", "abcdefgxyz"), ("address_line1", "1-2-3 Chuo")]),
            record(&[("full_name", "abcdefgxyz")]),
        ];
        let found = detector.detect_for_row(&rows, 1);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].match_type, MatchType::NameAddress);
        assert_eq!(found[0].score, 85);

        let without_address = detector.detect_for_row(&rows, 2);
        assert_eq!(without_address.len(), 1);
        assert_eq!(without_address[0].candidate_index, 1);
        assert_eq!(without_address[0].match_type, MatchType::NameOnly);
    }

    #[test]
    fn equal_identifier_matches_existing_record() {
        let detector = CandidateDetector::default();
        let pool = vec![
            record(&[("full_name", "Suzuki Ichiro"), ("phone", "0312345678")]),
            record(&[("full_name", "Yamada Taro"), ("email", "taro@example.com")]),
            record(&[("full_name", "Yamada Taro")]),
        ];
        let new_row = record(&[("full_name", "Yamada Taro"), ("email", "taro@example.com")]);

        let found = detector.detect_existing(&new_row, &pool);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].candidate_index, 1);
        assert_eq!(found[0].match_type, MatchType::Identifier);
        assert_eq!(found[0].score, 100);
        assert_eq!(found[0].reason, "email exact match: taro@example.com");

        // An identifier without an equal counterpart still suppresses similarity.
        let other = record(&[("full_name", "Yamada Taro"), ("email", "other@example.com")]);
        assert!(detector.detect_existing(&other, &pool).is_empty());
    }

    #[test]
    fn existing_pool_falls_back_to_similarity() {
        let detector = CandidateDetector::default();
        let pool = vec![record(&[("full_name", "Yamada Taro"), ("email", "taro@example.com")])];
        let new_row = record(&[("full_name", "Yamada Taro")]);
        let found = detector.detect_existing(&new_row, &pool);
        assert_eq!(found.len(), 1);
        assert_eq!(found[0].match_type, MatchType::NameOnly);
    }

    #[test]
    fn out_of_range_index_is_empty() {
        let rows: Vec<BTreeMap<String, String>> = Vec::new();
        assert!(CandidateDetector::default().detect_for_row(&rows, 3).is_empty());
    }
}
