//! Dashboard data store with parking_lot::RwLock
//!
//! Holds the latest applied fetch and the load state. Every load is tagged
//! with a generation; only the most recent request may apply its response,
//! so an earlier slow fetch can never overwrite a newer one.

use crate::error::{CoreError, LoadState};
use crate::event::{DataEvent, EventBus};
use crate::models::Material;
use crate::source::{DashboardData, DateRange, MetricSource};
use parking_lot::RwLock;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// What happened to a completed fetch
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadOutcome {
    /// The response replaced the current data
    Applied { materials: usize },
    /// A newer request was issued meanwhile; the response was dropped
    Stale { generation: u64, latest: u64 },
}

/// Central data store for the dashboard
///
/// Thread-safe; the TUI shares it behind an `Arc` with its loader tasks.
pub struct DashboardStore {
    /// Latest applied fetch (Arc for cheap snapshots)
    data: RwLock<Option<Arc<DashboardData>>>,

    /// Also guards generation checks so start/apply never interleave
    load_state: RwLock<LoadState>,

    /// Generation of the most recently issued request
    generation: AtomicU64,

    /// Range of the most recently issued request
    range: RwLock<Option<DateRange>>,

    /// Range the applied data was fetched for
    applied_range: RwLock<Option<DateRange>>,

    event_bus: EventBus,
}

impl Default for DashboardStore {
    fn default() -> Self {
        Self::new()
    }
}

impl DashboardStore {
    pub fn new() -> Self {
        Self {
            data: RwLock::new(None),
            load_state: RwLock::new(LoadState::Idle),
            generation: AtomicU64::new(0),
            range: RwLock::new(None),
            applied_range: RwLock::new(None),
            event_bus: EventBus::default_capacity(),
        }
    }

    pub fn event_bus(&self) -> &EventBus {
        &self.event_bus
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state.read().clone()
    }

    pub fn latest_generation(&self) -> u64 {
        self.generation.load(Ordering::SeqCst)
    }

    /// Range of the latest request, if any
    ///
    /// Moves as soon as a load starts; use [`Self::applied_range`] for the
    /// range the current data belongs to.
    pub fn range(&self) -> Option<DateRange> {
        *self.range.read()
    }

    /// Range of the data currently held, if any
    ///
    /// Only a successful, non-stale load moves it.
    pub fn applied_range(&self) -> Option<DateRange> {
        *self.applied_range.read()
    }

    /// Latest applied data, if any
    pub fn data(&self) -> Option<Arc<DashboardData>> {
        self.data.read().clone()
    }

    pub fn materials(&self) -> Vec<Material> {
        self.data
            .read()
            .as_ref()
            .map(|d| d.materials.clone())
            .unwrap_or_default()
    }

    pub fn material_count(&self) -> usize {
        self.data
            .read()
            .as_ref()
            .map(|d| d.materials.len())
            .unwrap_or(0)
    }

    /// Fetch `range` from `source` and apply it if still the latest request
    ///
    /// Single attempt, no retry. A failure of the latest request sets
    /// [`LoadState::Failed`] and is returned; previous data is kept.
    pub async fn load<S: MetricSource>(
        &self,
        source: &S,
        range: DateRange,
    ) -> Result<LoadOutcome, CoreError> {
        let generation = self.begin(range);
        info!(generation, start = range.start_ms, end = range.end_ms, "Loading dashboard data");

        let result = source.fetch(range).await;
        self.finish(generation, range, result)
    }

    fn begin(&self, range: DateRange) -> u64 {
        let mut state = self.load_state.write();
        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        *state = LoadState::Loading;
        *self.range.write() = Some(range);
        drop(state);

        self.event_bus.publish(DataEvent::LoadStarted { generation });
        generation
    }

    fn finish(
        &self,
        generation: u64,
        range: DateRange,
        result: Result<DashboardData, CoreError>,
    ) -> Result<LoadOutcome, CoreError> {
        let mut state = self.load_state.write();
        let latest = self.generation.load(Ordering::SeqCst);

        if generation != latest {
            drop(state);
            warn!(generation, latest, "Discarding stale dashboard response");
            self.event_bus
                .publish(DataEvent::StaleResponseDiscarded { generation, latest });
            return Ok(LoadOutcome::Stale { generation, latest });
        }

        match result {
            Ok(data) => {
                let materials = data.materials.len();
                *self.data.write() = Some(Arc::new(data));
                *self.applied_range.write() = Some(range);
                *state = LoadState::Ready;
                drop(state);

                info!(generation, materials, "Dashboard data loaded");
                self.event_bus.publish(DataEvent::LoadCompleted {
                    generation,
                    materials,
                });
                Ok(LoadOutcome::Applied { materials })
            }
            Err(e) => {
                let message = e.user_message();
                *state = LoadState::Failed {
                    message: message.clone(),
                };
                drop(state);

                warn!(generation, error = %e, "Dashboard load failed");
                self.event_bus
                    .publish(DataEvent::LoadFailed { generation, message });
                Err(e)
            }
        }
    }

    /// Drop all data and return to idle
    pub fn clear(&self) {
        let mut state = self.load_state.write();
        *self.data.write() = None;
        *self.applied_range.write() = None;
        *state = LoadState::Idle;
        debug!("Dashboard store cleared");
    }
}
