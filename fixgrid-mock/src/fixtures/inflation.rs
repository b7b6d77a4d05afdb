use fixgrid_core::{CountryCode, InflationRecord};

// Annual CPI rows as published; Russia has two rows for 2004 that average
// to 10.9.
const ROWS: &[(&str, i32, f64)] = &[
    ("RUS", 2003, 13.7),
    ("RUS", 2004, 10.8),
    ("RUS", 2004, 11.0),
    ("RUS", 2005, 12.7),
    ("USA", 2003, 2.3),
    ("USA", 2004, 2.7),
    ("USA", 2005, 3.4),
    ("GBR", 2003, 1.4),
    ("GBR", 2004, 1.3),
    ("GBR", 2005, 2.1),
    ("EA19", 2003, 2.1),
    ("EA19", 2004, 2.2),
    ("EA19", 2005, 2.2),
    ("TUR", 2003, 21.6),
    ("TUR", 2004, 8.6),
    ("TUR", 2005, 8.2),
    ("JPN", 2003, -0.3),
    ("JPN", 2004, 0.0),
    ("JPN", 2005, -0.3),
];

/// Rows for the requested countries.
pub fn records(countries: &[CountryCode]) -> Vec<InflationRecord> {
    ROWS.iter()
        .filter_map(|(code, year, percent)| {
            let country = CountryCode::new(code).ok()?;
            countries.contains(&country).then_some(InflationRecord {
                country,
                year: *year,
                percent: *percent,
            })
        })
        .collect()
}
