use fixgrid::{Reconciler, SeriesSpec};
use proptest::prelude::*;

use crate::helpers::{country, d, dynamic, range, records};

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn report_matches_the_gap_pattern(
        present in proptest::collection::vec(any::<bool>(), 1..60),
        rate in 1.0f64..100.0
    ) {
        let start = d(2011, 12, 15);
        // Day 0 always has a record so no seeding is needed.
        let days: Vec<u64> = present
            .iter()
            .enumerate()
            .filter(|(i, p)| *i == 0 || **p)
            .map(|(i, _)| i as u64)
            .collect();
        let (source, _) = dynamic("props", vec![("X", records(start, &days, |k| rate + k as f64))]);

        let out = Reconciler::builder()
            .with_source(source)
            .range(range(start, present.len() as u64))
            .series(SeriesSpec::new("x", "X", country("USA")))
            .build()
            .unwrap()
            .reconcile()
            .unwrap();

        let col = out.table().column("x").unwrap();
        prop_assert_eq!(col.len(), present.len());
        let mut last = rate;
        for (i, v) in col.iter().enumerate() {
            if days.contains(&(i as u64)) {
                last = rate + i as f64;
            }
            prop_assert_eq!(*v, last);
        }

        let report = out.report().series("x").unwrap();
        prop_assert_eq!(report.observed, days.len());
        prop_assert_eq!(report.carried, present.len() - days.len());
        let spanned: usize = report.carried_spans.iter().map(|s| s.days()).sum();
        prop_assert_eq!(spanned, report.carried);
        prop_assert!(out.report().is_clean());
    }
}
