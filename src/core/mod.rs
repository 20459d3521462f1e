pub mod error;

pub use error::{CountryTableError, SnapshotError, SnapshotResult};
