use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fixgrid_core::source::{InflationProvider, RecordSource, SeriesProvider};
use fixgrid_core::{CountryCode, InflationIndex, ReconcileError, SeriesSpec, SparseSeries};

/// Instruction for how a method should behave for a given input.
#[derive(Clone)]
pub enum MockBehavior<T> {
    /// Return the provided value.
    Return(T),
    /// Fail with the provided error.
    Fail(ReconcileError),
}

#[derive(Default)]
struct InternalState {
    series_rules: HashMap<String, MockBehavior<SparseSeries>>,
    inflation_rule: Option<MockBehavior<InflationIndex>>,
    series_requests: Vec<String>,
}

fn lock(state: &Mutex<InternalState>) -> MutexGuard<'_, InternalState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Controller handle used by tests to drive the dynamic mock from the outside.
pub struct DynamicMockController {
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockController {
    /// Set the behavior for `series` calls for a specific source id.
    ///
    /// A returned series is renamed to the requested spec name.
    pub fn set_series_behavior(
        &self,
        source_id: impl Into<String>,
        behavior: MockBehavior<SparseSeries>,
    ) {
        lock(&self.state)
            .series_rules
            .insert(source_id.into(), behavior);
    }

    /// Set the behavior for `inflation` calls.
    pub fn set_inflation_behavior(&self, behavior: MockBehavior<InflationIndex>) {
        lock(&self.state).inflation_rule = Some(behavior);
    }

    /// Source ids requested so far, in call order.
    #[must_use]
    pub fn series_requests(&self) -> Vec<String> {
        lock(&self.state).series_requests.clone()
    }

    /// Clear all configured behaviors and request logs.
    pub fn clear_all_behaviors(&self) {
        let mut guard = lock(&self.state);
        guard.series_rules.clear();
        guard.inflation_rule = None;
        guard.series_requests.clear();
    }
}

/// A record source that defers all behavior to an external controller.
///
/// Unconfigured source ids and an unconfigured inflation table answer
/// `NotFound`.
pub struct DynamicMockSource {
    name: &'static str,
    state: Arc<Mutex<InternalState>>,
}

impl DynamicMockSource {
    /// Create a new dynamic mock source and its controller.
    #[must_use]
    pub fn new_with_controller(name: &'static str) -> (Arc<dyn RecordSource>, DynamicMockController) {
        let state = Arc::new(Mutex::new(InternalState::default()));
        let controller = DynamicMockController {
            state: Arc::clone(&state),
        };
        let me = Arc::new(Self { name, state });
        (me as Arc<dyn RecordSource>, controller)
    }
}

impl RecordSource for DynamicMockSource {
    fn name(&self) -> &'static str {
        self.name
    }

    fn vendor(&self) -> &'static str {
        "DynamicMock"
    }

    fn as_series_provider(&self) -> Option<&dyn SeriesProvider> {
        Some(self as &dyn SeriesProvider)
    }

    fn as_inflation_provider(&self) -> Option<&dyn InflationProvider> {
        Some(self as &dyn InflationProvider)
    }
}

impl SeriesProvider for DynamicMockSource {
    fn series(&self, spec: &SeriesSpec) -> Result<SparseSeries, ReconcileError> {
        let behavior = {
            let mut guard = lock(&self.state);
            guard.series_requests.push(spec.source_id.clone());
            guard.series_rules.get(&spec.source_id).cloned()
        };
        match behavior {
            Some(MockBehavior::Return(s)) => {
                SparseSeries::from_records(spec.name.clone(), s.iter())
            }
            Some(MockBehavior::Fail(e)) => Err(e),
            None => Err(ReconcileError::not_found(format!(
                "series {} at {}",
                spec.source_id, self.name
            ))),
        }
    }
}

impl InflationProvider for DynamicMockSource {
    fn inflation(&self, _countries: &[CountryCode]) -> Result<InflationIndex, ReconcileError> {
        let behavior = lock(&self.state).inflation_rule.clone();
        match behavior {
            Some(MockBehavior::Return(idx)) => Ok(idx),
            Some(MockBehavior::Fail(e)) => Err(e),
            None => Err(ReconcileError::not_found(format!(
                "inflation table at {}",
                self.name
            ))),
        }
    }
}
