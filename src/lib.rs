// ============================================================================
// Life in Weeks Library
// ============================================================================

pub mod config;
pub mod core;
pub mod countries;
pub mod snapshot;
pub mod web;
pub mod weeks;

// Re-export main types for convenience
pub use config::AppConfig;
pub use crate::core::{CountryTableError, SnapshotError, SnapshotResult};
pub use countries::{CountryRecord, LifeExpectancyTable};
pub use snapshot::{InMemorySnapshotStore, SnapshotEntry, SnapshotStore};
pub use web::{AppState, build_router};
pub use weeks::{CellState, WeekBreakdown, WeekCell, WeekCells, compute};
