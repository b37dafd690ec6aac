//! Default name-pattern rules for particle categories.
//!
//! Rules are evaluated in list order and the first match wins, so the order
//! below is part of the behavior (e.g. `pi` mesons before `p` baryons).

use once_cell::sync::Lazy;
use regex::Regex;

static PARENTHESIZED_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\([^)]*\)").expect("valid parenthesized regex"));

const GAUGE_AND_HIGGS: &[&str] = &["gamma", "g", "graviton", "W+", "W-", "Z0", "H0", "H"];
const LEPTONS: &[&str] = &["e-", "e+", "mu-", "mu+", "tau-", "tau+"];
const QUARK_FLAVORS: &str = "udscbt";
const UNFLAVORED_MULTIPLETS: &[&str] = &[
    "pi", "eta", "eta^'", "rho", "omega", "phi", "a_", "b_", "f_", "h_",
];
const CHARMONIA: &[&str] = &["eta_c", "J/psi", "psi", "chi_c", "h_c"];
const BOTTOMONIA: &[&str] = &["Upsilon", "eta_b", "chi_b", "h_b"];
const N_BARYONS: &[&str] = &["p", "n", "N"];

/// Label produced by a matching rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CategoryLabel {
    Fixed(&'static str),
    /// Label depending on the dataset edition.
    ByEdition {
        edition: &'static str,
        matching: &'static str,
        otherwise: &'static str,
    },
}

impl CategoryLabel {
    pub fn resolve(self, edition: Option<&str>) -> &'static str {
        match self {
            Self::Fixed(label) => label,
            Self::ByEdition {
                edition: wanted,
                matching,
                otherwise,
            } => {
                if edition == Some(wanted) {
                    matching
                } else {
                    otherwise
                }
            }
        }
    }
}

/// One `(predicate, label)` pair of the ordered rule list.
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    /// Short rule name used in diagnostics.
    pub name: &'static str,
    pub predicate: fn(&str) -> bool,
    pub label: CategoryLabel,
}

impl CategoryRule {
    pub const fn fixed(name: &'static str, predicate: fn(&str) -> bool, label: &'static str) -> Self {
        Self {
            name,
            predicate,
            label: CategoryLabel::Fixed(label),
        }
    }

    pub fn matches(&self, item_name: &str) -> bool {
        (self.predicate)(item_name)
    }
}

/// The built-in rule list, in evaluation order.
pub fn default_rules() -> Vec<CategoryRule> {
    vec![
        CategoryRule::fixed("gauge_higgs", is_gauge_or_higgs, "Gauge/Higgs bosons"),
        CategoryRule::fixed("lepton", is_lepton, "Leptons"),
        CategoryRule::fixed("quark", is_quark, "Quarks"),
        CategoryRule::fixed("pion", is_pion, "Pions"),
        CategoryRule::fixed("eta", is_eta, "Light eta mesons"),
        CategoryRule::fixed("rho", is_rho, "Rho mesons"),
        CategoryRule::fixed("omega_meson", is_omega_meson, "Omega mesons"),
        CategoryRule::fixed("phi", is_phi, "Phi mesons"),
        CategoryRule::fixed("a_meson", is_a_meson, "a mesons"),
        CategoryRule::fixed("b_meson", is_b_meson, "b mesons"),
        CategoryRule::fixed("f_meson", is_f_meson, "f mesons"),
        CategoryRule::fixed("h_meson", is_h_meson, "Light h mesons"),
        CategoryRule::fixed("strange_meson", is_strange_meson, "Strange mesons"),
        CategoryRule::fixed("charmed_meson", is_charmed_meson, "Charmed mesons"),
        CategoryRule::fixed("bottom_meson", is_bottom_meson, "Bottom mesons"),
        CategoryRule::fixed("charmonium", is_charmonium, "Charmonia"),
        CategoryRule::fixed("bottomonium", is_bottomonium, "Bottomonia"),
        CategoryRule::fixed("n_baryon", is_n_baryon, "N baryons"),
        CategoryRule::fixed("delta_baryon", is_delta_baryon, "Delta baryons"),
        CategoryRule::fixed("lambda_baryon", is_lambda_baryon, "Lambda baryons"),
        CategoryRule::fixed("sigma_baryon", is_sigma_baryon, "Sigma baryons"),
        CategoryRule::fixed("xi_baryon", is_xi_baryon, "Xi baryons"),
        CategoryRule::fixed("omega_baryon", is_omega_baryon, "Omega baryons"),
        CategoryRule {
            name: "exotic",
            predicate: is_tetra_or_pentaquark,
            label: CategoryLabel::ByEdition {
                edition: "2023",
                matching: "Pentaquarks",
                otherwise: "Pentaquarks and tetraquarks",
            },
        },
        CategoryRule::fixed("other_meson", is_other_meson, "Other mesons"),
    ]
}

/// Whether `name`, without its first parenthesized part, starts with the
/// multiplet prefix. `Delta(1232)++` is a member of `Delta`.
pub fn member(name: &str, multiplet: &str) -> bool {
    PARENTHESIZED_RE.replacen(name, 1, "").starts_with(multiplet)
}

fn member_of_any(name: &str, multiplets: &[&str]) -> bool {
    multiplets.iter().any(|multiplet| member(name, multiplet))
}

fn is_gauge_or_higgs(name: &str) -> bool {
    GAUGE_AND_HIGGS.contains(&name)
}

fn is_lepton(name: &str) -> bool {
    LEPTONS.contains(&name)
}

fn is_quark(name: &str) -> bool {
    let flavor = name.strip_suffix("bar").unwrap_or(name);
    flavor.len() == 1 && QUARK_FLAVORS.contains(flavor)
}

fn is_unflavored_meson(name: &str) -> bool {
    !name.contains("_c") && !name.contains("_b") && member_of_any(name, UNFLAVORED_MULTIPLETS)
}

fn is_pion(name: &str) -> bool {
    is_unflavored_meson(name) && member(name, "pi")
}

fn is_eta(name: &str) -> bool {
    is_unflavored_meson(name) && (member(name, "eta") || member(name, "eta^"))
}

fn is_rho(name: &str) -> bool {
    is_unflavored_meson(name) && member(name, "rho")
}

fn is_omega_meson(name: &str) -> bool {
    is_unflavored_meson(name) && member(name, "omega")
}

fn is_phi(name: &str) -> bool {
    is_unflavored_meson(name) && member(name, "phi")
}

fn is_a_meson(name: &str) -> bool {
    is_unflavored_meson(name) && member(name, "a_")
}

fn is_b_meson(name: &str) -> bool {
    is_unflavored_meson(name) && member(name, "b_")
}

fn is_f_meson(name: &str) -> bool {
    is_unflavored_meson(name) && member(name, "f_")
}

fn is_h_meson(name: &str) -> bool {
    is_unflavored_meson(name) && member(name, "h_")
}

fn is_strange_meson(name: &str) -> bool {
    name.starts_with('K')
}

fn is_charmed_meson(name: &str) -> bool {
    name.starts_with('D') && !name.starts_with("Delta")
}

fn is_bottom_meson(name: &str) -> bool {
    name.starts_with('B')
}

fn is_charmonium(name: &str) -> bool {
    member_of_any(name, CHARMONIA)
}

fn is_bottomonium(name: &str) -> bool {
    member_of_any(name, BOTTOMONIA)
}

fn is_n_baryon(name: &str) -> bool {
    member_of_any(name, N_BARYONS) && !name.starts_with("pi") && !name.starts_with("phi")
}

fn is_delta_baryon(name: &str) -> bool {
    member(name, "Delta")
}

fn is_lambda_baryon(name: &str) -> bool {
    member(name, "Lambda")
}

fn is_sigma_baryon(name: &str) -> bool {
    member(name, "Sigma")
}

fn is_xi_baryon(name: &str) -> bool {
    member(name, "Xi")
}

fn is_omega_baryon(name: &str) -> bool {
    member(name, "Omega")
}

fn is_tetra_or_pentaquark(name: &str) -> bool {
    name.starts_with('P') || name.starts_with('T')
}

fn is_other_meson(name: &str) -> bool {
    name.starts_with(['R', 'X', 'Y', 'Z']) && name != "Z0" && !name.starts_with("Xi")
}

#[cfg(test)]
mod tests {
    use super::{default_rules, is_quark, member, CategoryLabel};
    use std::collections::HashSet;

    #[test]
    fn member_ignores_first_parenthesized_part() {
        assert!(member("Delta(1232)++", "Delta"));
        assert!(member("a_1(1260)+", "a_"));
        assert!(member("psi(2S)", "psi"));
        assert!(!member("(pi)X", "X(pi"));
        assert!(!member("K^*(892)", "pi"));
    }

    #[test]
    fn default_rule_names_are_distinct() {
        let rules = default_rules();
        let names: HashSet<&str> = rules.iter().map(|rule| rule.name).collect();
        assert_eq!(names.len(), rules.len());
        assert!(!names.contains(""));
    }

    #[test]
    fn quarks_match_flavor_and_antiflavor() {
        for name in ["u", "dbar", "t", "bbar"] {
            assert!(is_quark(name), "{name}");
        }
        for name in ["q", "ubarbar", "bar", "uu"] {
            assert!(!is_quark(name), "{name}");
        }
    }

    #[test]
    fn edition_label_switches_on_exact_edition() {
        let label = CategoryLabel::ByEdition {
            edition: "2023",
            matching: "Pentaquarks",
            otherwise: "Pentaquarks and tetraquarks",
        };
        assert_eq!(label.resolve(Some("2023")), "Pentaquarks");
        assert_eq!(label.resolve(Some("2024")), "Pentaquarks and tetraquarks");
        assert_eq!(label.resolve(None), "Pentaquarks and tetraquarks");
    }
}
