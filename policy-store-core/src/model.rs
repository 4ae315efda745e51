//! In-memory policy model

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Sections persisted by the adapter, in the order they are written.
pub const POLICY_SECTIONS: [&str; 2] = ["p", "g"];

/// One policy rule: its ordered fields, without the rule type.
pub type Rule = Vec<String>;

/// Rule table grouped by section ("p", "g") and rule type ("p", "p2", "g2", ...)
///
/// Rule types iterate in lexical order; rules keep their insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PolicyModel {
    sections: BTreeMap<String, BTreeMap<String, Vec<Rule>>>,
}

impl PolicyModel {
    pub fn new() -> Self {
        Self::default()
    }

    /// Section a rule type belongs to, derived from its first character.
    pub fn section_of(rule_type: &str) -> Option<&'static str> {
        let first = rule_type.get(..1)?;
        POLICY_SECTIONS.iter().copied().find(|sec| *sec == first)
    }

    /// Append a rule under `section` / `rule_type`
    pub fn add_rule(&mut self, section: &str, rule_type: &str, rule: Rule) {
        self.sections
            .entry(section.to_string())
            .or_default()
            .entry(rule_type.to_string())
            .or_default()
            .push(rule);
    }

    /// Rules stored under `section` / `rule_type`, in insertion order
    pub fn rules(&self, section: &str, rule_type: &str) -> &[Rule] {
        self.sections
            .get(section)
            .and_then(|types| types.get(rule_type))
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Iterate the rule types of a section with their rules
    pub fn rule_types<'a>(
        &'a self,
        section: &str,
    ) -> impl Iterator<Item = (&'a str, &'a [Rule])> + 'a {
        self.sections
            .get(section)
            .into_iter()
            .flat_map(|types| types.iter())
            .map(|(rule_type, rules)| (rule_type.as_str(), rules.as_slice()))
    }

    /// Total number of rules across all sections
    pub fn rule_count(&self) -> usize {
        self.sections
            .values()
            .flat_map(|types| types.values())
            .map(Vec::len)
            .sum()
    }

    pub fn is_empty(&self) -> bool {
        self.rule_count() == 0
    }

    pub fn clear(&mut self) {
        self.sections.clear();
    }

    /// Append every rule of `other` after the rules already stored here
    pub fn merge(&mut self, other: PolicyModel) {
        for (section, types) in other.sections {
            let target = self.sections.entry(section).or_default();
            for (rule_type, rules) in types {
                target.entry(rule_type).or_default().extend(rules);
            }
        }
    }
}
