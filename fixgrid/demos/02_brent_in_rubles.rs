use std::sync::Arc;

use fixgrid::{DateRange, Direction, ReconcileConfig, Reconciler};
use fixgrid_mock::MockSource;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .try_init();

    let range = DateRange::new(
        chrono::NaiveDate::from_ymd_opt(2004, 1, 1).ok_or("bad date")?,
        MockSource::end_day(),
    )?;

    // Dollar rate and Brent, both in 2004 money, multiplied into a ruble price.
    let run = Reconciler::builder()
        .with_source(Arc::new(MockSource::new()))
        .config(ReconcileConfig::brent_in_rubles())
        .range(range)
        .build()?
        .reconcile()?
        .with_product("brent_rub", "usd", "brent")?;

    let table = run.table();
    let last = table.len() - 1;
    println!(
        "brent in rubles: {:.0} on {} -> {:.0} on {}",
        table.value(0, "brent_rub").unwrap_or(f64::NAN),
        table.start(),
        table.value(last, "brent_rub").unwrap_or(f64::NAN),
        table.date_at(last).map(|d| d.to_string()).unwrap_or_default(),
    );

    // Monthly drops and spikes of more than 0.02 decades within 30 days.
    for direction in [Direction::Drop, Direction::Spike] {
        for e in run.excursions("brent_rub", 30, 0.02, direction)? {
            println!("{direction:?} {}-{:02}: {:+.3}", e.year, e.month, e.delta);
        }
    }
    Ok(())
}
