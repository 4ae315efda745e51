//! Error types for the core crate

use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("Unencodable field {field:?} in {rule_type} rule: {reason}")]
    UnencodableField {
        rule_type: String,
        field: String,
        reason: &'static str,
    },

    #[error("Rule type '{0}' does not belong to a policy section")]
    UnknownRuleType(String),

    #[error("Empty {0} rule cannot be encoded")]
    EmptyRule(String),

    #[error("Rule type '{rule_type}' is stored under section '{section}'")]
    SectionMismatch { section: String, rule_type: String },
}
