//! Import definition schema.
//!
//! An [`ImportDefinition`] is the versioned contract for one target entity:
//! which fields exist, how each is normalized and validated, which fields are
//! derived from others, and how duplicates are detected. Definitions are
//! loaded once per session and shared read-only across all rows.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::error::Result;
use crate::ids::{FieldType, NormalizerId};
use crate::validator::Validator;

/// Default minimum score for a duplicate candidate.
pub const DEFAULT_CANDIDATE_THRESHOLD: u8 = 70;

/// The versioned mapping, normalization and validation contract for one entity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportDefinition {
    /// Informational schema version.
    pub schema_version: String,
    /// Name of the target record type (e.g. "customer").
    pub entity: String,
    /// Target fields in processing and error-reporting order.
    pub fields: Vec<FieldDefinition>,
    /// Derived fields, evaluated in order after all fields are normalized.
    #[serde(default)]
    pub computed_fields: Vec<ComputedField>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dedupe_policy: Option<DedupePolicy>,
}

impl ImportDefinition {
    pub fn new(
        schema_version: impl Into<String>,
        entity: impl Into<String>,
        fields: Vec<FieldDefinition>,
    ) -> Self {
        Self {
            schema_version: schema_version.into(),
            entity: entity.into(),
            fields,
            computed_fields: Vec::new(),
            dedupe_policy: None,
        }
    }

    #[must_use]
    pub fn with_computed_field(mut self, computed: ComputedField) -> Self {
        self.computed_fields.push(computed);
        self
    }

    #[must_use]
    pub fn with_dedupe_policy(mut self, policy: DedupePolicy) -> Self {
        self.dedupe_policy = Some(policy);
        self
    }

    /// Parse a JSON document and check its cross-references.
    ///
    /// # Errors
    ///
    /// Returns [`DefinitionError::Schema`](crate::DefinitionError::Schema) when
    /// the document does not match the definition shape (including unknown
    /// normalizer or rule names), or any cross-reference error from
    /// [`ImportDefinition::validate`].
    pub fn from_json_str(json: &str) -> Result<Self> {
        let definition: Self = serde_json::from_str(json)?;
        definition.validate()?;
        Ok(definition)
    }

    /// Same as [`ImportDefinition::from_json_str`] for an already parsed value.
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        let definition: Self = serde_json::from_value(value)?;
        definition.validate()?;
        Ok(definition)
    }

    pub fn field(&self, key: &str) -> Option<&FieldDefinition> {
        self.fields.iter().find(|f| f.key == key)
    }

    pub fn computed_field(&self, key: &str) -> Option<&ComputedField> {
        self.computed_fields.iter().find(|c| c.key == key)
    }

    /// True if `key` names a field or a computed field.
    pub fn has_key(&self, key: &str) -> bool {
        self.field(key).is_some() || self.computed_field(key).is_some()
    }

    pub fn required_fields(&self) -> impl Iterator<Item = &FieldDefinition> {
        self.fields.iter().filter(|f| f.required)
    }
}

/// One target field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldDefinition {
    /// Stable identifier, unique within the definition.
    pub key: String,
    /// Human-readable name used in error messages and mapping suggestions.
    pub label: String,
    pub required: bool,
    #[serde(rename = "type")]
    pub field_type: FieldType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ui: Option<FieldUi>,
    /// Transforms applied left to right.
    #[serde(default)]
    pub normalizers: Vec<NormalizerId>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub normalizer_params: Option<NormalizerParams>,
    /// Rules applied left to right; all of them run.
    #[serde(default)]
    pub validators: Vec<Validator>,
}

impl FieldDefinition {
    pub fn new(key: impl Into<String>, label: impl Into<String>, field_type: FieldType) -> Self {
        Self {
            key: key.into(),
            label: label.into(),
            required: false,
            field_type,
            ui: None,
            normalizers: Vec::new(),
            normalizer_params: None,
            validators: Vec::new(),
        }
    }

    #[must_use]
    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    #[must_use]
    pub fn with_normalizers(mut self, normalizers: impl IntoIterator<Item = NormalizerId>) -> Self {
        self.normalizers.extend(normalizers);
        self
    }

    #[must_use]
    pub fn with_normalizer_params(mut self, params: NormalizerParams) -> Self {
        self.normalizer_params = Some(params);
        self
    }

    #[must_use]
    pub fn with_validator(mut self, validator: Validator) -> Self {
        self.validators.push(validator);
        self
    }
}

/// Presentation hints for mapping screens.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldUi {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hint: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<EnumOption>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EnumOption {
    pub value: String,
    pub label: String,
}

/// Parameters consumed by parameterized normalizers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizerParams {
    /// Canonical value -> accepted aliases, for `enum_map`.
    #[serde(default)]
    pub enum_map: BTreeMap<String, Vec<String>>,
    /// Value returned by `enum_map` when nothing matches.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<String>,
}

impl NormalizerParams {
    #[must_use]
    pub fn with_alias<I, S>(mut self, canonical: impl Into<String>, aliases: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.enum_map.insert(
            canonical.into(),
            aliases.into_iter().map(Into::into).collect(),
        );
        self
    }

    #[must_use]
    pub fn with_default(mut self, default: impl Into<String>) -> Self {
        self.default = Some(default.into());
        self
    }
}

/// A field derived from another field's normalized value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComputedField {
    pub key: String,
    pub from: String,
    #[serde(default)]
    pub normalizers: Vec<NormalizerId>,
}

impl ComputedField {
    pub fn new(
        key: impl Into<String>,
        from: impl Into<String>,
        normalizers: impl IntoIterator<Item = NormalizerId>,
    ) -> Self {
        Self {
            key: key.into(),
            from: from.into(),
            normalizers: normalizers.into_iter().collect(),
        }
    }
}

/// Thresholds and trigger conditions for duplicate detection.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DedupePolicy {
    /// Fields treated as reliable identifiers; a non-blank value suppresses
    /// fuzzy detection for the row.
    #[serde(default)]
    pub priority_keys: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub candidate_rule: Option<CandidateRule>,
}

impl DedupePolicy {
    /// Every key the policy refers to, in declaration order.
    pub fn referenced_keys(&self) -> impl Iterator<Item = &str> {
        let rule_keys = self
            .candidate_rule
            .iter()
            .flat_map(|rule| rule.when_missing_all.iter().chain(rule.match_keys.iter()));
        self.priority_keys
            .iter()
            .chain(rule_keys)
            .map(String::as_str)
    }

    pub fn threshold(&self) -> u8 {
        self.candidate_rule
            .as_ref()
            .map_or(DEFAULT_CANDIDATE_THRESHOLD, |rule| rule.threshold)
    }
}

/// When and how fuzzy candidates are computed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRule {
    /// Fuzzy matching only runs when all of these are blank.
    #[serde(default)]
    pub when_missing_all: Vec<String>,
    /// Keys compared by similarity: name first, then address.
    #[serde(default)]
    pub match_keys: Vec<String>,
    #[serde(default = "default_threshold")]
    pub threshold: u8,
}

impl Default for CandidateRule {
    fn default() -> Self {
        Self {
            when_missing_all: Vec::new(),
            match_keys: Vec::new(),
            threshold: DEFAULT_CANDIDATE_THRESHOLD,
        }
    }
}

fn default_threshold() -> u8 {
    DEFAULT_CANDIDATE_THRESHOLD
}
