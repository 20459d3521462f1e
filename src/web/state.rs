use std::sync::Arc;

use crate::countries::LifeExpectancyTable;
use crate::snapshot::SnapshotStore;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn SnapshotStore>,
    pub countries: Arc<LifeExpectancyTable>,
}

impl AppState {
    pub fn new(store: Arc<dyn SnapshotStore>, countries: Arc<LifeExpectancyTable>) -> Self {
        Self { store, countries }
    }
}
