//! Property tests: category normalization is deterministic and idempotent.

use proptest::prelude::*;
use qivo_types::{normalize_category, resolve_category, StandardId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_standard() -> impl Strategy<Value = StandardId> {
    prop_oneof![
        Just(StandardId::Jorc),
        Just(StandardId::Ni43101),
        Just(StandardId::Perc),
        Just(StandardId::Samrec),
        Just(StandardId::Cbrr),
    ]
}

/// Free text mixed with known aliases in varying case.
fn arb_category() -> impl Strategy<Value = String> {
    prop_oneof![
        "[A-Za-z ]{0,24}",
        (
            "[A-Za-z ]{0,8}",
            prop::sample::select(vec![
                "Measured", "MEDIDO", "indicated", "Indicada", "Inferred", "inferido", "Proven",
                "Provada", "probable", "Provável",
            ]),
            "[A-Za-z ]{0,8}",
        )
            .prop_map(|(prefix, alias, suffix)| format!("{prefix}{alias}{suffix}")),
    ]
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn normalize_is_idempotent(term in arb_category(), standard in arb_standard()) {
        let once = normalize_category(&term, standard);
        let twice = normalize_category(&once, standard);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn unresolved_terms_pass_through(term in arb_category(), standard in arb_standard()) {
        if resolve_category(&term).is_none() {
            prop_assert_eq!(normalize_category(&term, standard), term);
        }
    }

    #[test]
    fn normalization_preserves_class(term in arb_category(), standard in arb_standard()) {
        if let Some(class) = resolve_category(&term) {
            let normalized = normalize_category(&term, standard);
            prop_assert_eq!(resolve_category(&normalized), Some(class));
        }
    }
}
