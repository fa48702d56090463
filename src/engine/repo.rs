//! Repositories: all database operations in one place.

mod intervals;
mod workers;

pub use intervals::{IntervalRepo, INTERVAL_SELECT};
pub use workers::{WorkerRepo, WORKER_SELECT};
