use std::sync::Arc;

use fixgrid::{DateRange, ReconcileConfig, Reconciler};
use fixgrid_mock::MockSource;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Suggested: RUST_LOG=info,fixgrid=debug,fixgrid_core=debug (build with --features tracing)
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_target(false)
        .try_init();

    // 1. The mock source serves fixings for Dec 2003 to Dec 2005.
    let range = DateRange::new(
        chrono::NaiveDate::from_ymd_opt(2004, 1, 1).ok_or("bad date")?,
        MockSource::end_day(),
    )?;

    // 2. Reconcile the five-currency basket, lira redenomination included.
    let run = Reconciler::builder()
        .with_source(Arc::new(MockSource::new()))
        .config(ReconcileConfig::ruble_basket())
        .range(range)
        .build()?
        .reconcile()?;

    // 3. Coverage.
    for s in &run.report().series {
        println!(
            "{:>4}: {} observed, {} carried, longest gap {} days",
            s.name,
            s.observed,
            s.carried,
            s.longest_gap()
        );
    }
    for w in &run.report().warnings {
        println!("note: {w}");
    }

    // 4. Which currency grew most over each week, and the hindsight ceiling.
    let analysis = run.analyze()?;
    println!("best in {}-day window:", analysis.best.width);
    for (name, wins) in analysis.best.tally_by_name() {
        println!("  {name:>4}: {wins}");
    }
    let peak = analysis
        .oracle
        .points()
        .fold(None::<fixgrid::DatedValue>, |best, p| match best {
            Some(b) if b.value >= p.value => Some(b),
            _ => Some(p),
        });
    if let Some(p) = peak {
        println!(
            "best {}-day oracle window starts {} ({:.4}x)",
            analysis.oracle.width, p.date, p.value
        );
    }

    // 5. Correlations of basket shares per year.
    for y in run.yearly_correlations()? {
        let c = y.matrix.get("usd", "eur").unwrap_or(f64::NAN);
        println!("{}: usd/eur share correlation {c:.3} over {} days", y.year, y.rows);
    }
    Ok(())
}
