//! Property tests: mapping to any standard and reading back is lossless for person
//! names and tonnages, directly or through a chain of conversions.

use proptest::prelude::*;
use qivo_mappers::{convert, to_canonical, to_standard};
use qivo_types::{CanonicalReport, ResourceEstimate, ResponsiblePerson, StandardId};

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn arb_standard() -> impl Strategy<Value = StandardId> {
    prop::sample::select(StandardId::ALL.to_vec())
}

fn arb_category() -> impl Strategy<Value = Option<String>> {
    prop::option::of(prop::sample::select(vec![
        "Measured".to_string(),
        "Indicado".to_string(),
        "Inferred".to_string(),
        "Proved Ore Reserve".to_string(),
        "Reserva Provável".to_string(),
        "Exploration Target".to_string(),
    ]))
}

fn arb_estimate() -> impl Strategy<Value = ResourceEstimate> {
    (arb_category(), 0.0f64..1.0e9).prop_map(|(category, tonnage)| ResourceEstimate {
        category,
        tonnage: Some(tonnage),
        ..Default::default()
    })
}

fn arb_name() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => "[A-Z][a-z]{2,10} [A-Z][a-z]{2,12}",
        1 => Just("-".to_string()),
        1 => Just("Not provided".to_string()),
        1 => Just("A ser informado".to_string()),
        1 => " {0,3}",
    ]
}

fn arb_report() -> impl Strategy<Value = CanonicalReport> {
    (
        prop::collection::vec(arb_name(), 0..4),
        prop::collection::vec(arb_estimate(), 0..6),
    )
        .prop_map(|(names, estimates)| CanonicalReport {
            responsible_persons: names.into_iter().map(ResponsiblePerson::new).collect(),
            resource_estimates: estimates,
            ..Default::default()
        })
}

fn names(report: &CanonicalReport) -> Vec<String> {
    report.responsible_persons.iter().map(|p| p.name.clone()).collect()
}

fn tonnages(report: &CanonicalReport) -> Vec<Option<f64>> {
    report.resource_estimates.iter().map(|r| r.tonnage).collect()
}

// ---------------------------------------------------------------------------
// Property Tests
// ---------------------------------------------------------------------------

proptest! {
    #[test]
    fn read_back_preserves_names_and_tonnages(report in arb_report(), standard in arb_standard()) {
        let back = to_canonical(&to_standard(standard, &report));
        prop_assert_eq!(names(&back), names(&report));
        prop_assert_eq!(tonnages(&back), tonnages(&report));
    }

    #[test]
    fn conversion_chain_preserves_names_and_tonnages(
        report in arb_report(),
        source in arb_standard(),
        middle in arb_standard(),
        target in arb_standard(),
    ) {
        let view = convert(&convert(&to_standard(source, &report), middle), target);
        prop_assert_eq!(view.standard(), target);

        let back = to_canonical(&view);
        prop_assert_eq!(names(&back), names(&report));
        prop_assert_eq!(tonnages(&back), tonnages(&report));
    }

    #[test]
    fn resource_rows_never_dropped(report in arb_report(), standard in arb_standard()) {
        let back = to_canonical(&to_standard(standard, &report));
        prop_assert_eq!(back.resource_estimates.len(), report.resource_estimates.len());
    }
}
