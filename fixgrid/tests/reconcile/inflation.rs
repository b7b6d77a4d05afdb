use fixgrid::{InflationTreatment, ReconcileError, ReconcileWarning, Reconciler, SeriesSpec};
use fixgrid_mock::MockBehavior;

use crate::helpers::{assert_close, country, d, dynamic, flat_cpi, range, records};

fn daily(percent: f64) -> f64 {
    (1.0 + percent / 100.0).powf(1.0 / 365.0)
}

fn usd() -> SeriesSpec {
    SeriesSpec::new("usd", "USD", country("USA"))
}

fn brent() -> SeriesSpec {
    SeriesSpec::new("brent", "BRENT", country("USA")).with_treatment(InflationTreatment::Deflate)
}

#[test]
fn cross_rate_restated_by_both_countries() {
    let start = d(2004, 12, 30);
    let (source, ctl) = dynamic(
        "cbr",
        vec![("USD", records(start, &[0, 1], |_| 30.0))],
    );
    let mut cpi = flat_cpi(&["USA"], 2004..=2005, 0.0);
    cpi.insert(country("RUS"), 2004, 10.0).unwrap();
    cpi.insert(country("RUS"), 2005, 20.0).unwrap();
    ctl.set_inflation_behavior(MockBehavior::Return(cpi));

    let out = Reconciler::builder()
        .with_source(source)
        .range(range(start, 4))
        .series(usd())
        .normalize_inflation(true)
        .build()
        .unwrap()
        .reconcile()
        .unwrap();

    // Observed days use the cumulative ratio; carried days compound the daily
    // ratio of the year they fall in.
    let (r04, r05) = (daily(10.0), daily(20.0));
    let col = out.table().column("usd").unwrap();
    assert_close(col[0], 30.0);
    assert_close(col[1], 30.0 / r04);
    assert_close(col[2], 30.0 / (r04 * r05));
    assert_close(col[3], 30.0 / (r04 * r05 * r05));
    assert!(out.report().is_clean());
}

#[test]
fn prices_are_deflated_and_multiplied_into_rubles() {
    let start = d(2012, 6, 1);
    let all = [0, 1, 2];
    let (source, ctl) = dynamic(
        "mixed",
        vec![
            ("USD", records(start, &all, |_| 30.0)),
            ("BRENT", records(start, &all, |_| 100.0)),
        ],
    );
    let mut cpi = flat_cpi(&["RUS"], 2012..=2012, 0.0);
    cpi.insert(country("USA"), 2012, 5.0).unwrap();
    ctl.set_inflation_behavior(MockBehavior::Return(cpi));

    let out = Reconciler::builder()
        .with_source(source)
        .range(range(start, 3))
        .series(usd())
        .series(brent())
        .normalize_inflation(true)
        .build()
        .unwrap()
        .reconcile()
        .unwrap()
        .with_product("brent_rub", "usd", "brent")
        .unwrap();

    let u = daily(5.0);
    let t = out.table();
    assert_eq!(t.names(), ["usd", "brent", "brent_rub", "rur"]);
    for (i, m) in [1.0, u, u * u].into_iter().enumerate() {
        assert_close(t.value(i, "usd").unwrap(), 30.0 * m);
        assert_close(t.value(i, "brent").unwrap(), 100.0 / m);
        // Dollar inflation cancels out of the ruble price.
        assert_close(t.value(i, "brent_rub").unwrap(), 3000.0);
    }
}

#[test]
fn missing_figures_warn_once_and_stay_flat() {
    let start = d(2005, 12, 30);
    let all = [0, 1, 2, 3];
    let (source, ctl) = dynamic(
        "mixed",
        vec![
            ("USD", records(start, &all, |_| 30.0)),
            ("BRENT", records(start, &all, |_| 60.0)),
        ],
    );
    // Nothing for the US, and nothing for Russia in 2006.
    ctl.set_inflation_behavior(MockBehavior::Return(flat_cpi(&["RUS"], 2005..=2005, 0.0)));

    let out = Reconciler::builder()
        .with_source(source)
        .range(range(start, 4))
        .series(usd())
        .series(brent())
        .normalize_inflation(true)
        .build()
        .unwrap()
        .reconcile()
        .unwrap();

    let warn = |code: &str, year| ReconcileWarning::MissingInflationFigure {
        country: country(code),
        year,
    };
    let warnings = &out.report().warnings;
    assert_eq!(warnings.len(), 3, "{warnings:?}");
    for w in [warn("USA", 2005), warn("USA", 2006), warn("RUS", 2006)] {
        assert!(warnings.contains(&w), "missing {w}");
    }
    assert_eq!(out.table().column("usd").unwrap(), [30.0; 4]);
    assert_eq!(out.table().column("brent").unwrap(), [60.0; 4]);
}

#[test]
fn nominal_runs_never_ask_for_inflation() {
    let start = d(2012, 6, 1);
    let (source, _) = dynamic("cbr", vec![("USD", records(start, &[0, 1], |_| 30.0))]);

    let out = Reconciler::builder()
        .with_source(source)
        .range(range(start, 2))
        .series(usd())
        .build()
        .unwrap()
        .reconcile()
        .unwrap();
    assert_eq!(out.table().column("usd").unwrap(), [30.0, 30.0]);
}

#[test]
fn untreated_series_stay_nominal() {
    let start = d(2012, 6, 1);
    let (source, ctl) = dynamic(
        "cbr",
        vec![
            ("USD", records(start, &[0, 1], |_| 30.0)),
            ("JPY", records(start, &[0, 1], |_| 0.3)),
        ],
    );
    ctl.set_inflation_behavior(MockBehavior::Return(flat_cpi(&["RUS", "USA"], 2012..=2012, 8.0)));

    let out = Reconciler::builder()
        .with_source(source)
        .range(range(start, 2))
        .series(usd())
        .series(
            SeriesSpec::new("jpy", "JPY", country("JPN")).with_treatment(InflationTreatment::None),
        )
        .normalize_inflation(true)
        .build()
        .unwrap()
        .reconcile()
        .unwrap();
    assert_eq!(out.table().column("jpy").unwrap(), [0.3, 0.3]);
    // Same figure on both sides: the cross rate is unchanged.
    assert_close(out.table().value(1, "usd").unwrap(), 30.0);
    assert!(out.report().is_clean());
}

#[test]
fn normalization_needs_an_inflation_source() {
    let start = d(2012, 6, 1);
    let (source, _) = dynamic("cbr", vec![("USD", records(start, &[0, 1], |_| 30.0))]);

    let err = Reconciler::builder()
        .with_source(source)
        .range(range(start, 2))
        .series(usd())
        .normalize_inflation(true)
        .build()
        .unwrap()
        .reconcile()
        .unwrap_err();
    assert_eq!(err, ReconcileError::not_found("inflation figures"));
}
