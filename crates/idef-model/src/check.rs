//! Cross-reference checks for import definitions.

use std::collections::BTreeSet;

use crate::definition::ImportDefinition;
use crate::error::{DefinitionError, Result};

impl ImportDefinition {
    /// Check the invariants serde cannot express.
    ///
    /// - field keys are non-blank and unique;
    /// - computed keys are non-blank and collide with nothing defined before;
    /// - every computed `from` names a field or an earlier computed field;
    /// - every dedupe key names a field or a computed field;
    /// - the dedupe threshold lies in `0..=100`.
    ///
    /// # Errors
    ///
    /// Returns the first violation found, in declaration order.
    pub fn validate(&self) -> Result<()> {
        let mut known: BTreeSet<&str> = BTreeSet::new();

        for (index, field) in self.fields.iter().enumerate() {
            if field.key.trim().is_empty() {
                return Err(DefinitionError::BlankKey {
                    kind: "field",
                    index,
                });
            }
            if !known.insert(field.key.as_str()) {
                return Err(DefinitionError::DuplicateKey(field.key.clone()));
            }
        }

        for (index, computed) in self.computed_fields.iter().enumerate() {
            if computed.key.trim().is_empty() {
                return Err(DefinitionError::BlankKey {
                    kind: "computed field",
                    index,
                });
            }
            if !known.contains(computed.from.as_str()) {
                return Err(DefinitionError::UnknownReference {
                    context: format!("computed field `{}`", computed.key),
                    key: computed.from.clone(),
                });
            }
            if !known.insert(computed.key.as_str()) {
                return Err(DefinitionError::ComputedKeyCollision(computed.key.clone()));
            }
        }

        if let Some(policy) = &self.dedupe_policy {
            for key in policy.referenced_keys() {
                if !known.contains(key) {
                    return Err(DefinitionError::UnknownReference {
                        context: "dedupe policy".to_string(),
                        key: key.to_string(),
                    });
                }
            }
            let threshold = policy.threshold();
            if threshold > 100 {
                return Err(DefinitionError::ThresholdOutOfRange(threshold));
            }
        }

        Ok(())
    }
}
