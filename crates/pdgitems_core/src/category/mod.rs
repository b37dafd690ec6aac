//! Name-pattern categorization of items and groups.
//!
//! # Responsibility
//! - Map an item name to a category label through an ordered rule list.
//! - Pick the category of a group as the mode of its member categories.
//!
//! # Invariants
//! - Classification is total: names matching no rule get [`ERROR_CATEGORY`].
//! - Rule order is fixed; the first matching rule wins.
//! - Group mode ties go to the category encountered first.

use log::{debug, warn};
use std::cell::RefCell;
use std::collections::HashMap;

pub mod rules;

pub use rules::{default_rules, member, CategoryLabel, CategoryRule};

/// Label of names no rule matches.
pub const ERROR_CATEGORY: &str = "Error";

/// Maps item names to category labels.
pub trait NameClassifier {
    fn classify(&self, item_name: &str) -> String;
}

/// Rule-list classifier with a per-instance memo.
pub struct PatternCategorizer {
    rules: Vec<CategoryRule>,
    edition: Option<String>,
    memo: RefCell<HashMap<String, String>>,
}

impl PatternCategorizer {
    /// Categorizer with the built-in rules.
    pub fn new(edition: Option<String>) -> Self {
        Self::with_rules(default_rules(), edition)
    }

    pub fn with_rules(rules: Vec<CategoryRule>, edition: Option<String>) -> Self {
        Self {
            rules,
            edition,
            memo: RefCell::new(HashMap::new()),
        }
    }

    fn evaluate(&self, item_name: &str) -> String {
        match self.rules.iter().find(|rule| rule.matches(item_name)) {
            Some(rule) => {
                let label = rule.label.resolve(self.edition.as_deref());
                debug!(
                    "event=category_match module=category status=ok name={item_name:?} rule={} label={label:?}",
                    rule.name
                );
                label.to_string()
            }
            None => {
                warn!("event=category_gap module=category status=fallback name={item_name:?}");
                ERROR_CATEGORY.to_string()
            }
        }
    }
}

impl NameClassifier for PatternCategorizer {
    fn classify(&self, item_name: &str) -> String {
        if let Some(label) = self.memo.borrow().get(item_name) {
            return label.clone();
        }
        let label = self.evaluate(item_name);
        self.memo
            .borrow_mut()
            .insert(item_name.to_string(), label.clone());
        label
    }
}

/// Most frequent value, ties broken by first occurrence.
pub fn majority<I, T>(values: I) -> Option<T>
where
    I: IntoIterator<Item = T>,
    T: PartialEq,
{
    let mut counts: Vec<(T, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(seen, _)| *seen == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((value, 1)),
        }
    }

    let mut best: Option<(T, usize)> = None;
    for (value, count) in counts {
        if best.as_ref().map_or(true, |(_, best_count)| count > *best_count) {
            best = Some((value, count));
        }
    }
    best.map(|(value, _)| value)
}

/// Category of a set of member names.
pub fn group_category<'a, C, I>(classifier: &C, member_names: I) -> String
where
    C: NameClassifier + ?Sized,
    I: IntoIterator<Item = &'a str>,
{
    majority(member_names.into_iter().map(|name| classifier.classify(name)))
        .unwrap_or_else(|| ERROR_CATEGORY.to_string())
}

#[cfg(test)]
mod tests {
    use super::{
        group_category, majority, CategoryRule, NameClassifier, PatternCategorizer,
        ERROR_CATEGORY,
    };

    #[test]
    fn representative_names_get_their_categories() {
        let categorizer = PatternCategorizer::new(Some("2024".to_string()));
        let cases = [
            ("pi0", "Pions"),
            ("pi(1300)", "Pions"),
            ("Delta(1232)++", "Delta baryons"),
            ("gamma", "Gauge/Higgs bosons"),
            ("tau-", "Leptons"),
            ("cbar", "Quarks"),
            ("eta'(958)", "Light eta mesons"),
            ("eta_c(1S)", "Charmonia"),
            ("J/psi(1S)", "Charmonia"),
            ("chi_b0(1P)", "Bottomonia"),
            ("phi(1020)", "Phi mesons"),
            ("K^*(892)+", "Strange mesons"),
            ("D0", "Charmed mesons"),
            ("B+", "Bottom mesons"),
            ("p", "N baryons"),
            ("N(1440)", "N baryons"),
            ("Lambda_c+", "Lambda baryons"),
            ("Xi0", "Xi baryons"),
            ("Omega-", "Omega baryons"),
            ("Z0", "Gauge/Higgs bosons"),
            ("X(3872)", "Other mesons"),
            ("P_c(4312)+", "Pentaquarks and tetraquarks"),
            ("T_cc(3875)+", "Pentaquarks and tetraquarks"),
        ];
        for (name, expected) in cases {
            assert_eq!(categorizer.classify(name), expected, "{name}");
        }
    }

    #[test]
    fn edition_2023_labels_exotics_as_pentaquarks() {
        let categorizer = PatternCategorizer::new(Some("2023".to_string()));
        assert_eq!(categorizer.classify("P_c(4312)+"), "Pentaquarks");
    }

    #[test]
    fn unmatched_name_falls_back_to_error_category() {
        let categorizer = PatternCategorizer::new(None);
        assert_eq!(categorizer.classify("sneutrino"), ERROR_CATEGORY);
        assert_eq!(categorizer.classify("sneutrino"), ERROR_CATEGORY);
    }

    #[test]
    fn rule_list_is_replaceable() {
        fn starts_with_x(name: &str) -> bool {
            name.starts_with('x')
        }
        let categorizer = PatternCategorizer::with_rules(
            vec![CategoryRule::fixed("x", starts_with_x, "Ex")],
            None,
        );
        assert_eq!(categorizer.classify("xyz"), "Ex");
        assert_eq!(categorizer.classify("pi0"), ERROR_CATEGORY);
    }

    #[test]
    fn majority_breaks_ties_by_first_occurrence() {
        assert_eq!(majority(["b", "a", "a", "b"]), Some("b"));
        assert_eq!(majority(["b", "a", "a"]), Some("a"));
        assert_eq!(majority(Vec::<&str>::new()), None);
    }

    #[test]
    fn group_category_is_mode_of_member_categories() {
        let categorizer = PatternCategorizer::new(None);
        let category = group_category(&categorizer, ["pi+", "pi-", "pi+-", "X(3915)"]);
        assert_eq!(category, "Pions");
    }
}
