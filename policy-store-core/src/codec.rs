//! Line codec for the stored policy format
//!
//! Each rule is stored as one line: `<ruleType>, <field1>, <field2>, ...`.
//! The format has no escaping, so fields must not contain the separator
//! or a line break.

use crate::model::{PolicyModel, Rule, POLICY_SECTIONS};
use crate::CoreError;

const FIELD_SEPARATOR: char = ',';
const JOIN_SEPARATOR: &str = ", ";
const COMMENT_PREFIX: char = '#';

/// Renders one rule as a line of text
pub trait LineEncoder: Send + Sync {
    /// Encode a rule, including the trailing newline
    fn encode_line(&self, rule_type: &str, rule: &[String]) -> Result<String, CoreError>;
}

/// Parses one line of text into a model
pub trait LineDecoder: Send + Sync {
    /// Add the rule encoded by `line` to `model`.
    ///
    /// Blank, comment and malformed lines are ignored.
    fn decode_line(&self, line: &str, model: &mut PolicyModel);
}

/// A matching encoder/decoder pair
pub trait LineCodec: LineEncoder + LineDecoder {}

impl<T> LineCodec for T where T: LineEncoder + LineDecoder {}

/// Join rule fields with the standard `", "` separator
pub fn array_to_string(fields: &[String]) -> String {
    fields.join(JOIN_SEPARATOR)
}

/// Comma-separated codec used by the policy framework's file adapter
#[derive(Debug, Clone, Copy, Default)]
pub struct CsvLineCodec;

impl CsvLineCodec {
    pub fn new() -> Self {
        Self
    }

    fn check_field(rule_type: &str, field: &str) -> Result<(), CoreError> {
        let reason = if field.contains(FIELD_SEPARATOR) {
            "contains the field separator"
        } else if field.contains(['\n', '\r']) {
            "contains a line break"
        } else if field.trim() != field {
            "has surrounding whitespace"
        } else {
            return Ok(());
        };

        Err(CoreError::UnencodableField {
            rule_type: rule_type.to_string(),
            field: field.to_string(),
            reason,
        })
    }
}

impl LineEncoder for CsvLineCodec {
    fn encode_line(&self, rule_type: &str, rule: &[String]) -> Result<String, CoreError> {
        if PolicyModel::section_of(rule_type).is_none() {
            return Err(CoreError::UnknownRuleType(rule_type.to_string()));
        }
        Self::check_field(rule_type, rule_type)?;
        if rule.is_empty() {
            return Err(CoreError::EmptyRule(rule_type.to_string()));
        }
        for field in rule {
            Self::check_field(rule_type, field)?;
        }

        Ok(format!("{}, {}\n", rule_type, array_to_string(rule)))
    }
}

impl LineDecoder for CsvLineCodec {
    fn decode_line(&self, line: &str, model: &mut PolicyModel) {
        if line.is_empty() || line.starts_with(COMMENT_PREFIX) {
            return;
        }

        let mut tokens = line.split(FIELD_SEPARATOR).map(str::trim);
        let rule_type = match tokens.next() {
            Some(t) => t,
            None => return,
        };
        let section = match PolicyModel::section_of(rule_type) {
            Some(sec) => sec,
            None => return,
        };

        let rule: Rule = tokens.map(str::to_string).collect();
        if rule.is_empty() {
            return;
        }

        model.add_rule(section, rule_type, rule);
    }
}

/// Render every persisted section of `model`: "p" first, then "g".
///
/// A rule type filed under a section other than its own is rejected, since
/// the decoder would put it back under a different section.
pub fn encode_model<E>(encoder: &E, model: &PolicyModel) -> Result<String, CoreError>
where
    E: LineEncoder + ?Sized,
{
    let mut out = String::new();
    for section in POLICY_SECTIONS {
        for (rule_type, rules) in model.rule_types(section) {
            if PolicyModel::section_of(rule_type) != Some(section) {
                return Err(CoreError::SectionMismatch {
                    section: section.to_string(),
                    rule_type: rule_type.to_string(),
                });
            }
            for rule in rules {
                out.push_str(&encoder.encode_line(rule_type, rule)?);
            }
        }
    }
    Ok(out)
}

/// Decode a whole policy text, trimming each line first
pub fn decode_text<D>(decoder: &D, text: &str, model: &mut PolicyModel)
where
    D: LineDecoder + ?Sized,
{
    for line in text.lines() {
        decoder.decode_line(line.trim(), model);
    }
}
