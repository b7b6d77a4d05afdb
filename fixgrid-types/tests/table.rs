use chrono::NaiveDate;
use fixgrid_types::{AlignedTable, ReconcileError};

fn d(y: i32, m: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, day).unwrap()
}

fn names(v: &[&str]) -> Vec<String> {
    v.iter().map(|s| (*s).to_string()).collect()
}

fn sample() -> AlignedTable {
    AlignedTable::from_columns(
        d(2000, 12, 30),
        names(&["usd", "eur", "rur"]),
        vec![
            vec![28.0, 28.2, 28.4, 28.6],
            vec![26.0, 26.1, 26.2, 26.3],
            vec![1.0; 4],
        ],
    )
    .unwrap()
}

#[test]
fn rows_and_columns_agree() {
    let t = sample();
    assert_eq!(t.len(), 4);
    assert_eq!(t.reference(), "rur");
    assert_eq!(t.series_names(), ["usd", "eur"]);
    assert_eq!(t.column("eur").unwrap()[2], 26.2);

    let row = t.row(2).unwrap();
    assert_eq!(row.date(), d(2001, 1, 1));
    assert_eq!(row.get("usd"), Some(28.4));
    let keys: Vec<&str> = row.iter().map(|(k, _)| k).collect();
    assert_eq!(keys, ["usd", "eur", "rur"]);
    assert!((row.sum() - (28.4 + 26.2 + 1.0)).abs() < 1e-12);
    assert!(t.row(4).is_none());
}

#[test]
fn year_slices_split_on_january_first() {
    let t = sample();
    assert_eq!(t.year_slices(), vec![(2000, 0..2), (2001, 2..4)]);
    let y2001 = t.slice(2..4).unwrap();
    assert_eq!(y2001.start(), d(2001, 1, 1));
    assert_eq!(y2001.column("usd").unwrap(), [28.4, 28.6]);
    assert!(t.slice(3..3).is_err());
    assert!(t.slice(2..5).is_err());
}

#[test]
fn product_column_lands_before_reference() {
    let t = sample().with_product("usdeur", "usd", "eur").unwrap();
    assert_eq!(t.names(), ["usd", "eur", "usdeur", "rur"]);
    assert!((t.value(0, "usdeur").unwrap() - 28.0 * 26.0).abs() < 1e-9);
    assert_eq!(t.reference(), "rur");

    assert!(matches!(
        sample().with_product("x", "usd", "gbp"),
        Err(ReconcileError::NotFound { .. })
    ));
    assert!(matches!(
        sample().with_product("eur", "usd", "eur"),
        Err(ReconcileError::InvalidArg(_))
    ));
}

#[test]
fn malformed_tables_are_rejected() {
    assert!(matches!(
        AlignedTable::from_columns(d(2000, 1, 1), names(&["a", "b"]), vec![vec![1.0], vec![1.0, 2.0]]),
        Err(ReconcileError::RangeMismatch { .. })
    ));
    assert!(matches!(
        AlignedTable::from_columns(d(2000, 1, 1), names(&["a", "a"]), vec![vec![1.0], vec![1.0]]),
        Err(ReconcileError::InvalidArg(_))
    ));
    assert!(matches!(
        AlignedTable::from_columns(d(2000, 1, 1), names(&["a"]), vec![vec![]]),
        Err(ReconcileError::InvalidArg(_))
    ));
}

#[test]
fn deserialize_enforces_table_invariants() {
    let t = AlignedTable::from_columns(
        d(2000, 1, 1),
        names(&["usd", "rur"]),
        vec![vec![28.0, 28.5, 29.0], vec![1.0; 3]],
    )
    .unwrap();
    let json = serde_json::to_string(&t).expect("serialize table");
    let de: AlignedTable = serde_json::from_str(&json).expect("deserialize table");
    assert_eq!(de, t);

    let short = r#"{"start":"2000-01-01","len":10,"names":["usd","rur"],"columns":[[1.0,2.0],[1.0,1.0]]}"#;
    assert!(serde_json::from_str::<AlignedTable>(short).is_err());
    let ragged = r#"{"start":"2000-01-01","len":2,"names":["usd","rur"],"columns":[[1.0,2.0],[1.0]]}"#;
    assert!(serde_json::from_str::<AlignedTable>(ragged).is_err());
    let bare = r#"{"start":"2000-01-01","len":0,"names":[],"columns":[]}"#;
    assert!(serde_json::from_str::<AlignedTable>(bare).is_err());
}
