use std::collections::TryReserveError;
use thiserror::Error;

/// Errors from table construction and growth.
///
/// A missing key is never an error; lookups and removals report absence
/// through `Option`/`bool`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("initial capacity must be at least 1")]
    ZeroCapacity,
    #[error("max load factor must lie strictly between 0 and 1, got {0}")]
    InvalidLoadFactor(f64),
    #[error("growth factor must be at least 2, got {0}")]
    InvalidGrowthFactor(usize),
    #[error("table capacity overflowed usize")]
    CapacityOverflow,
    #[error("failed to allocate a slot array of {capacity} slots")]
    AllocationFailed {
        capacity: usize,
        #[source]
        source: TryReserveError,
    },
}
