//! Built-in [`CholetteProcessor`].
use crate::benchmarking::{
    core::{options::CholetteSpec, series::TsData, units::ratio_of, validation::validate_no_infinite},
    errors::{BenchError, BenchResult},
    models::cholette::CholetteEngine,
    processors::CholetteProcessor,
};

/// State-space Cholette processor: Kalman filter and smoother.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DefaultCholetteProcessor;

impl CholetteProcessor for DefaultCholetteProcessor {
    fn benchmark(&self, high: &TsData, low: &TsData, spec: &CholetteSpec) -> BenchResult<TsData> {
        ratio_of(high.unit(), low.unit())?;
        let engine = CholetteEngine::new(*spec)?;

        validate_no_infinite(high.values())?;
        let (clean, _) = high.clean_extremities();
        if clean.is_empty() {
            return Err(BenchError::EmptySeries);
        }
        let values = engine.benchmark(&clean, low)?;
        Ok(TsData::new(clean.unit(), clean.start(), values).extend(high.start(), high.len()))
    }
}
