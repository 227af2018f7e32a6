//! Resource and reserve category normalization
//!
//! Free-text categories are resolved against a fixed alias table keyed by canonical
//! class, then rendered in the target standard's vocabulary. Unrecognized terms pass
//! through unchanged; use [`resolve_category`] to detect them.

use crate::standard::StandardId;
use serde::{Deserialize, Serialize};

/// Canonical resource/reserve confidence class
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CategoryClass {
    Measured,
    Indicated,
    Inferred,
    ProvedReserve,
    ProbableReserve,
}

/// Alias table; classes are tried in order, first alias contained in the input wins
const ALIASES: &[(CategoryClass, &[&str])] = &[
    (CategoryClass::Measured, &["measured", "medido", "medida"]),
    (CategoryClass::Indicated, &["indicated", "indicado", "indicada"]),
    (CategoryClass::Inferred, &["inferred", "inferido", "inferida"]),
    (
        CategoryClass::ProvedReserve,
        &["proved", "proven", "provada", "provado"],
    ),
    (
        CategoryClass::ProbableReserve,
        &["probable", "provável", "provavel"],
    ),
];

impl CategoryClass {
    /// Localized term used by `standard`
    pub fn term(self, standard: StandardId) -> &'static str {
        use CategoryClass::*;
        use StandardId::*;

        match (self, standard) {
            (Measured, Cbrr) => "Medido",
            (Measured, _) => "Measured",
            (Indicated, Cbrr) => "Indicado",
            (Indicated, _) => "Indicated",
            (Inferred, Cbrr) => "Inferido",
            (Inferred, _) => "Inferred",
            (ProvedReserve, Jorc) => "Proved Ore Reserve",
            (ProvedReserve, Ni43101) => "Proven Mineral Reserve",
            (ProvedReserve, Perc) => "Proved Reserve",
            (ProvedReserve, Samrec) => "Proved Mineral Reserve",
            (ProvedReserve, Cbrr) => "Reserva Provada",
            (ProbableReserve, Jorc) => "Probable Ore Reserve",
            (ProbableReserve, Ni43101) => "Probable Mineral Reserve",
            (ProbableReserve, Perc) => "Probable Reserve",
            (ProbableReserve, Samrec) => "Probable Mineral Reserve",
            (ProbableReserve, Cbrr) => "Reserva Provável",
        }
    }

    /// Whether the class is a reserve (as opposed to a resource)
    pub fn is_reserve(self) -> bool {
        matches!(self, Self::ProvedReserve | Self::ProbableReserve)
    }
}

/// Alias containment test against an already lowercased term
fn alias_matches(lowered_term: &str, alias: &str) -> bool {
    lowered_term.contains(alias)
}

/// Resolve a free-text category to its canonical class
pub fn resolve_category(term: &str) -> Option<CategoryClass> {
    let lowered = term.to_lowercase();
    ALIASES
        .iter()
        .find(|(_, aliases)| aliases.iter().any(|alias| alias_matches(&lowered, alias)))
        .map(|(class, _)| *class)
}

/// Render `term` in `target`'s vocabulary, passing unknown terms through unchanged
pub fn normalize_category(term: &str, target: StandardId) -> String {
    match resolve_category(term) {
        Some(class) => class.term(target).to_string(),
        None => term.to_string(),
    }
}
