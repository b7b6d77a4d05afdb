use fixgrid_core::{
    CarryPolicy, DenseSeries, FillOutcome, InflationIndex, InflationTreatment, ReconcileError,
    ReconcileReport, ReconcileWarning, SeriesReport, SeriesSpec, SparseSeries, align,
    applicable_events, deflate_tracked, fill_tracked, normalize_tracked, rebase_records,
};

use crate::core::Reconciler;
use crate::reconciliation::Reconciliation;

struct Processed {
    series: DenseSeries,
    report: SeriesReport,
    warnings: Vec<ReconcileWarning>,
}

impl Reconciler {
    /// Run the full reconciliation: fetch, rebase, fill, normalize, align.
    ///
    /// Each configured series goes through the same steps:
    /// 1. records come from the first source that has them;
    /// 2. redenomination events rescale records dated before their cutoff;
    /// 3. gaps are filled by carrying the last value forward, seeding the
    ///    first day from earlier history when needed;
    /// 4. with normalization enabled, cross rates are restated by both
    ///    countries' inflation and prices are deflated by their own.
    ///
    /// The series are then aligned on the shared axis with the constant
    /// reference column appended last.
    ///
    /// With the `parallel` feature, series are processed on the rayon pool;
    /// table order and results are unchanged.
    ///
    /// # Errors
    /// - Source errors from [`fetch_series`](Self::fetch_series) and
    ///   [`fetch_inflation`](Self::fetch_inflation).
    /// - `InsufficientHistory` if a series has nothing at or before the first day.
    /// - Any alignment error.
    #[cfg_attr(
        feature = "tracing",
        tracing::instrument(
            name = "fixgrid::reconcile",
            skip(self),
            fields(
                series = self.cfg.series.len(),
                start = %self.cfg.range.start(),
                days = self.cfg.range.days(),
            ),
        )
    )]
    pub fn reconcile(&self) -> Result<Reconciliation, ReconcileError> {
        let cpi = if self.cfg.needs_inflation() {
            Some(self.fetch_inflation()?)
        } else {
            None
        };
        let processed = self.process_all(cpi.as_ref())?;

        let mut report = ReconcileReport::default();
        let mut dense = Vec::with_capacity(processed.len());
        for p in processed {
            for w in p.warnings {
                if !report.warnings.contains(&w) {
                    report.warnings.push(w);
                }
            }
            report.series.push(p.report);
            dense.push(p.series);
        }
        let table = align(dense, &self.cfg.reference)?;

        #[cfg(feature = "tracing")]
        tracing::info!(
            rows = table.len(),
            warnings = report.warnings.len(),
            "reconciliation complete"
        );
        Ok(Reconciliation::new(
            table,
            report,
            self.cfg.windows,
            self.cfg.basket_reference.clone(),
        ))
    }

    #[cfg(feature = "parallel")]
    fn process_all(&self, cpi: Option<&InflationIndex>) -> Result<Vec<Processed>, ReconcileError> {
        use rayon::prelude::*;
        self.cfg
            .series
            .par_iter()
            .map(|spec| self.process(spec, cpi))
            .collect()
    }

    #[cfg(not(feature = "parallel"))]
    fn process_all(&self, cpi: Option<&InflationIndex>) -> Result<Vec<Processed>, ReconcileError> {
        self.cfg
            .series
            .iter()
            .map(|spec| self.process(spec, cpi))
            .collect()
    }

    fn process(
        &self,
        spec: &SeriesSpec,
        cpi: Option<&InflationIndex>,
    ) -> Result<Processed, ReconcileError> {
        let (mut sparse, source) = self.fetch_series(spec)?;
        if sparse.name() != spec.name {
            sparse = SparseSeries::from_records(spec.name.clone(), sparse.iter())?;
        }
        let sparse = rebase_records(&sparse, &self.cfg.rebase_events)?;

        let FillOutcome {
            series,
            seeded_from,
            mut warnings,
        } = fill_tracked(&sparse, self.cfg.range, CarryPolicy::LastKnown)?;

        let series = match (cpi, spec.treatment) {
            (Some(cpi), InflationTreatment::CrossRate) => {
                let n = normalize_tracked(&series, &spec.country, &self.cfg.home_country, cpi);
                warnings.extend(n.warnings);
                n.series
            }
            (Some(cpi), InflationTreatment::Deflate) => {
                let n = deflate_tracked(&series, &spec.country, cpi);
                warnings.extend(n.warnings);
                n.series
            }
            _ => series,
        };

        let carried = series.carried_count();
        let report = SeriesReport {
            name: spec.name.clone(),
            source: source.to_string(),
            observed: series.len() - carried,
            carried,
            seeded_from,
            carried_spans: series.carried_spans(),
            rebases_applied: applicable_events(&spec.name, &self.cfg.rebase_events),
        };
        Ok(Processed {
            series,
            report,
            warnings,
        })
    }
}
