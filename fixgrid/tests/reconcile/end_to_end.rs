use fixgrid::{RebaseEvent, ReconcileConfig, Reconciler, SeriesSpec};
use fixgrid_mock::MockBehavior;

use crate::helpers::{assert_close, country, d, dynamic, flat_cpi, plus, range, records};

const ALL: [u64; 20] = [0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, 18, 19];

fn three_currencies() -> ReconcileConfig {
    let start = d(2004, 12, 22);
    ReconcileConfig {
        range: range(start, 20),
        series: vec![
            SeriesSpec::new("usd", "USD", country("USA")),
            SeriesSpec::new("eur", "EUR", country("EA19")),
            SeriesSpec::new("tkr", "TRY", country("TUR")),
        ],
        rebase_events: vec![RebaseEvent::new("tkr", plus(start, 10), 1_000_000.0)],
        normalize_inflation: true,
        ..ReconcileConfig::default()
    }
}

fn run(tkr_days: &[u64], events: bool) -> fixgrid::Reconciliation {
    let start = d(2004, 12, 22);
    let eur_days: Vec<u64> = ALL.iter().copied().filter(|k| !(5..=8).contains(k)).collect();
    let (source, ctl) = dynamic(
        "synthetic",
        vec![
            ("USD", records(start, &ALL, |_| 30.0)),
            ("EUR", records(start, &eur_days, |_| 40.0)),
            // One lira is quoted per million old units until day 10.
            ("TRY", records(start, tkr_days, |k| if k < 10 { 0.000_025 } else { 25.0 })),
        ],
    );
    ctl.set_inflation_behavior(MockBehavior::Return(flat_cpi(
        &["RUS", "USA", "EA19", "TUR"],
        2004..=2005,
        0.0,
    )));

    let mut cfg = three_currencies();
    if !events {
        cfg.rebase_events.clear();
    }
    Reconciler::builder()
        .with_source(source)
        .config(cfg)
        .build()
        .unwrap()
        .reconcile()
        .unwrap()
}

#[test]
fn three_currencies_with_redenomination() {
    let out = run(&ALL, true);
    let table = out.table();

    assert_eq!(table.names(), ["usd", "eur", "tkr", "rur"]);
    assert_eq!(table.len(), 20);
    assert_eq!(table.date_at(10), Some(d(2005, 1, 1)));
    for day in [0, 9, 10, 19] {
        assert_close(table.value(day, "usd").unwrap(), 30.0);
        assert_close(table.value(day, "eur").unwrap(), 40.0);
        assert_close(table.value(day, "tkr").unwrap(), 25.0);
        assert_eq!(table.value(day, "rur"), Some(1.0));
    }

    let report = out.report();
    assert!(report.is_clean(), "{:?}", report.warnings);
    let eur = report.series("eur").unwrap();
    assert_eq!((eur.observed, eur.carried), (16, 4));
    assert_eq!(eur.carried_spans.len(), 1);
    assert_eq!(eur.carried_spans[0].start, plus(d(2004, 12, 22), 5));
    assert_eq!(eur.longest_gap(), 4);
    assert_eq!(report.series("tkr").unwrap().rebases_applied, 1);
    assert_eq!(report.series("usd").unwrap().rebases_applied, 0);
    assert_eq!(report.series("usd").unwrap().source, "synthetic");
}

#[test]
fn without_the_event_old_units_survive() {
    let out = run(&ALL, false);
    assert_close(out.table().value(0, "tkr").unwrap(), 0.000_025);
    assert_close(out.table().value(9, "tkr").unwrap(), 0.000_025);
    assert_close(out.table().value(10, "tkr").unwrap(), 25.0);
}

#[test]
fn carried_days_across_the_cutoff_use_the_new_unit() {
    let tkr_days: Vec<u64> = ALL.iter().copied().filter(|k| !(9..=11).contains(k)).collect();
    let out = run(&tkr_days, true);

    for day in 8..=12 {
        assert_close(out.table().value(day, "tkr").unwrap(), 25.0);
    }
    let tkr = out.report().series("tkr").unwrap();
    assert_eq!(tkr.carried, 3);
    assert_eq!(tkr.longest_gap(), 3);
}

#[test]
fn analytics_on_a_flat_table_hold_the_reference() {
    let out = run(&ALL, true);
    let analysis = out.analyze().unwrap();

    // Nothing moves, so the reference wins every window and growth is flat.
    assert_eq!(analysis.best.wins.len(), 20 - 7);
    assert_eq!(analysis.best.wins_for("rur"), 13);
    assert!(analysis.oracle.values.is_empty());
    for row in analysis.basket.rows() {
        assert_close(row.sum(), 1.0);
    }
}
