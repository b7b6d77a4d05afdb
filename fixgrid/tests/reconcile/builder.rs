use std::sync::Arc;

use fixgrid::{
    ReconcileConfig, ReconcileError, Reconciler, ReconcilerBuilder, SeriesSpec, WinThreshold,
    WindowConfig,
};
use fixgrid_mock::MockSource;

use crate::helpers::{country, d, range};

fn usd() -> SeriesSpec {
    SeriesSpec::new("usd", "R01235", country("USA"))
}

fn invalid(b: ReconcilerBuilder) -> String {
    match b.build() {
        Err(ReconcileError::InvalidArg(msg)) => msg,
        Err(e) => panic!("expected InvalidArg, got {e:?}"),
        Ok(_) => panic!("expected InvalidArg, got a reconciler"),
    }
}

#[test]
fn build_requires_a_source() {
    let msg = invalid(Reconciler::builder().series(usd()));
    assert!(msg.contains("no sources registered"), "{msg}");
}

#[test]
fn build_validates_the_configuration() {
    let with_mock = || Reconciler::builder().with_source(Arc::new(MockSource::new()));

    assert!(invalid(with_mock()).contains("no series"));
    assert!(invalid(with_mock().series(usd()).series(usd())).contains("duplicate"));
    assert!(
        invalid(with_mock().series(SeriesSpec::new("rur", "X", country("RUS"))))
            .contains("reference")
    );
    assert!(invalid(with_mock().series(usd()).rebase("tkr", d(2005, 1, 1), 1e6)).contains("tkr"));
    assert!(invalid(with_mock().series(usd()).rebase("usd", d(2005, 1, 1), 0.0)).contains("factor"));
    invalid(with_mock().series(usd()).windows(WindowConfig {
        best_width: 0,
        ..WindowConfig::default()
    }));
    invalid(with_mock().series(usd()).basket_reference("gbp"));
}

#[test]
fn builder_modifiers_land_in_the_config() {
    let r = Reconciler::builder()
        .with_source(Arc::new(MockSource::new()))
        .config(ReconcileConfig::ruble_basket())
        .range(range(d(2004, 1, 1), 30))
        .reference("rub")
        .home_country(country("rus"))
        .normalize_inflation(true)
        .windows(WindowConfig {
            best_width: 5,
            oracle_width: 10,
            threshold: WinThreshold::Inclusive,
        })
        .basket_reference("eur")
        .build()
        .unwrap();

    let cfg = r.config();
    assert_eq!(cfg.range.days(), 30);
    assert_eq!(cfg.reference, "rub");
    assert_eq!(cfg.home_country.as_str(), "RUS");
    assert!(cfg.normalize_inflation);
    assert_eq!(cfg.windows.best_width, 5);
    assert_eq!(cfg.basket_reference.as_deref(), Some("eur"));
    assert_eq!(cfg.series.len(), 5);
    assert_eq!(cfg.rebase_events.len(), 1);
}

#[test]
fn inflation_countries_start_with_home() {
    let r = Reconciler::builder()
        .with_source(Arc::new(MockSource::new()))
        .config(ReconcileConfig::brent_in_rubles())
        .build()
        .unwrap();
    let countries = r.inflation_countries();
    let codes: Vec<&str> = countries.iter().map(|c| c.as_str()).collect();
    assert_eq!(codes, ["RUS", "USA"]);
}
