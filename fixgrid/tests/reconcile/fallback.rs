use std::sync::Arc;

use fixgrid::{
    ReconcileError, ReconcileWarning, Reconciler, Reconciliation, RecordSource, SeriesSpec,
    SparseSeries,
};
use fixgrid_mock::MockBehavior;

use crate::helpers::{country, d, dynamic, range, records};

fn usd() -> SeriesSpec {
    SeriesSpec::new("usd", "USD", country("USA"))
}

fn five_days() -> SparseSeries {
    records(d(2010, 3, 1), &[0, 1, 2, 3, 4], |k| 30.0 + k as f64)
}

fn reconcile(sources: Vec<Arc<dyn RecordSource>>) -> Result<Reconciliation, ReconcileError> {
    let mut b = Reconciler::builder().range(range(d(2010, 3, 1), 5)).series(usd());
    for s in sources {
        b = b.with_source(s);
    }
    b.build()?.reconcile()
}

#[test]
fn not_found_falls_through_to_next_source() {
    let (first, first_ctl) = dynamic("first", vec![]);
    let (second, _) = dynamic("second", vec![("USD", five_days())]);

    let out = reconcile(vec![first, second]).unwrap();
    assert_eq!(out.report().series("usd").unwrap().source, "second");
    assert_eq!(out.table().value(4, "usd"), Some(34.0));
    assert_eq!(first_ctl.series_requests(), ["USD"]);
}

#[test]
fn first_source_with_records_wins() {
    let (first, _) = dynamic("first", vec![("USD", five_days())]);
    let (second, second_ctl) = dynamic("second", vec![("USD", five_days())]);

    let out = reconcile(vec![first, second]).unwrap();
    assert_eq!(out.report().series("usd").unwrap().source, "first");
    assert!(second_ctl.series_requests().is_empty());
}

#[test]
fn empty_answer_falls_through() {
    let (first, _) = dynamic("first", vec![("USD", SparseSeries::new("usd"))]);
    let (second, _) = dynamic("second", vec![("USD", five_days())]);

    let out = reconcile(vec![first, second]).unwrap();
    assert_eq!(out.report().series("usd").unwrap().source, "second");
}

#[test]
fn only_empty_answers_mean_insufficient_history() {
    let (first, _) = dynamic("first", vec![("USD", SparseSeries::new("usd"))]);
    let (second, _) = dynamic("second", vec![]);

    let err = reconcile(vec![first, second]).unwrap_err();
    assert_eq!(err, ReconcileError::insufficient_history("usd", d(2010, 3, 1)));
}

#[test]
fn all_not_found_collapses_to_not_found() {
    let (first, _) = dynamic("first", vec![]);
    let (second, _) = dynamic("second", vec![]);

    let err = reconcile(vec![first, second]).unwrap_err();
    assert!(err.is_not_found(), "{err:?}");
}

#[test]
fn failures_are_collected_and_tagged() {
    let (first, first_ctl) = dynamic("first", vec![]);
    first_ctl.set_series_behavior(
        "USD",
        MockBehavior::Fail(ReconcileError::Data("garbled payload".into())),
    );
    let (second, second_ctl) = dynamic("second", vec![]);
    second_ctl.set_series_behavior(
        "USD",
        MockBehavior::Fail(ReconcileError::source_failure("second", "timeout")),
    );
    let (third, _) = dynamic("third", vec![]);

    let err = reconcile(vec![first, second, third]).unwrap_err();
    let ReconcileError::AllSourcesFailed(errors) = err else {
        panic!("expected AllSourcesFailed, got {err:?}");
    };
    assert_eq!(errors.len(), 3);
    assert_eq!(
        errors[0],
        ReconcileError::source_failure("first", "data issue: garbled payload")
    );
    assert_eq!(errors[1], ReconcileError::source_failure("second", "timeout"));
    assert!(errors[2].is_not_found());
}

#[test]
fn a_failure_does_not_hide_a_later_success() {
    let (first, first_ctl) = dynamic("first", vec![]);
    first_ctl.set_series_behavior(
        "USD",
        MockBehavior::Fail(ReconcileError::source_failure("first", "down")),
    );
    let (second, _) = dynamic("second", vec![("USD", five_days())]);

    let out = reconcile(vec![first, second]).unwrap();
    assert_eq!(out.report().series("usd").unwrap().source, "second");
}

#[test]
fn history_must_reach_the_first_day() {
    let late = records(d(2010, 3, 3), &[0, 1], |_| 30.0);
    let (source, _) = dynamic("late", vec![("USD", late)]);

    let err = reconcile(vec![source]).unwrap_err();
    assert_eq!(
        err,
        ReconcileError::InsufficientHistory {
            series: "usd".into(),
            start: d(2010, 3, 1),
        }
    );
}

#[test]
fn earlier_history_seeds_the_first_day() {
    let early = records(d(2010, 2, 26), &[0, 5], |k| if k == 0 { 29.0 } else { 31.0 });
    let (source, _) = dynamic("early", vec![("USD", early)]);

    let out = reconcile(vec![source]).unwrap();
    assert_eq!(
        out.table().column("usd").unwrap(),
        [29.0, 29.0, 31.0, 31.0, 31.0]
    );
    let usd = out.report().series("usd").unwrap();
    assert_eq!(usd.seeded_from, Some(d(2010, 2, 26)));
    assert_eq!(usd.observed, 1);
    assert_eq!(
        out.report().warnings,
        [ReconcileWarning::SeededFromHistory {
            series: "usd".into(),
            date: d(2010, 2, 26),
        }]
    );
}
