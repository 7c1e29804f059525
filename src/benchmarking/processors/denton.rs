//! Built-in [`DentonProcessor`].
use crate::benchmarking::{
    core::{
        alignment::ConstraintAligner,
        options::DentonSpec,
        series::TsData,
        units::ratio_of,
        validation::validate_no_infinite,
    },
    errors::{BenchError, BenchResult},
    models::denton::DentonEngine,
    processors::{DentonProcessor, HighFrequency},
};
use tracing::debug;

/// Matrix-based Denton processor: banded augmented-system solve.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultDentonProcessor;

impl DentonProcessor for DefaultDentonProcessor {
    fn benchmark(&self, high: HighFrequency<'_>, low: &TsData, spec: &DentonSpec) -> BenchResult<TsData> {
        let ratio = ratio_of(high.unit(), low.unit())?;
        let engine = DentonEngine::new(*spec)?;
        let aligner = ConstraintAligner::new(spec.aggregation);

        match high {
            HighFrequency::Series(series) => {
                let (clean, lead) = series.clean_extremities();
                if clean.is_empty() {
                    return Err(BenchError::EmptySeries);
                }
                validate_no_infinite(low.values())?;
                let alignment = aligner.align(&clean, low)?;
                debug!(
                    n = clean.len(),
                    ratio,
                    leading_missing = lead,
                    offset = alignment.offset(),
                    constraints = alignment.count_observed(),
                    "denton reconciliation"
                );
                let values = engine.reconcile(clean.values(), &alignment).map_err(|e| shift_index(e, lead))?;
                Ok(TsData::new(clean.unit(), clean.start(), values).extend(series.start(), series.len()))
            }
            HighFrequency::Unit(unit) => {
                let (clean, _) = low.clean_extremities();
                if clean.is_empty() {
                    return Err(BenchError::EmptySeries);
                }
                let alignment = aligner.align_to_unit(unit, &clean)?;
                debug!(ny = clean.len(), ratio, "denton interpolation");
                let values = engine.interpolate(&alignment)?;
                Ok(TsData::new(unit, clean.start() * ratio as i64, values))
            }
        }
    }
}

/// Report series indices relative to the untrimmed input.
fn shift_index(err: BenchError, lead: usize) -> BenchError {
    match err {
        BenchError::InteriorMissing { index } => BenchError::InteriorMissing { index: index + lead },
        BenchError::ZeroReference { index } => BenchError::ZeroReference { index: index + lead },
        BenchError::NonFiniteData { index, value } => BenchError::NonFiniteData { index: index + lead, value },
        other => other,
    }
}
