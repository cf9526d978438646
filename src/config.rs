//! Table sizing knobs.

use crate::error::Error;

/// Sizing configuration for a [`Table`](crate::Table).
///
/// The defaults reproduce the classic behavior: 30 slots up front, grow when
/// an insert would push occupancy past 75%, and double on each growth.
#[derive(Copy, Clone, Debug, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// Slots allocated when the table is created. Must be at least 1.
    pub initial_capacity: usize,
    /// Occupancy (live plus tombstoned slots over capacity) that an insert
    /// may not exceed without growing first. Must lie in `(0, 1)`.
    pub max_load_factor: f64,
    /// Capacity multiplier applied on each growth. Must be at least 2.
    pub growth_factor: usize,
}

impl Config {
    pub const DEFAULT_CAPACITY: usize = 30;
    pub const DEFAULT_MAX_LOAD_FACTOR: f64 = 0.75;
    pub const DEFAULT_GROWTH_FACTOR: usize = 2;

    pub const fn new() -> Self {
        Self {
            initial_capacity: Self::DEFAULT_CAPACITY,
            max_load_factor: Self::DEFAULT_MAX_LOAD_FACTOR,
            growth_factor: Self::DEFAULT_GROWTH_FACTOR,
        }
    }

    pub fn with_initial_capacity(mut self, initial_capacity: usize) -> Self {
        self.initial_capacity = initial_capacity;
        self
    }

    pub fn with_max_load_factor(mut self, max_load_factor: f64) -> Self {
        self.max_load_factor = max_load_factor;
        self
    }

    pub fn with_growth_factor(mut self, growth_factor: usize) -> Self {
        self.growth_factor = growth_factor;
        self
    }

    /// Checks every field against its documented range.
    pub fn validate(&self) -> Result<(), Error> {
        if self.initial_capacity == 0 {
            return Err(Error::ZeroCapacity);
        }
        // Written so that NaN fails too.
        if !(self.max_load_factor > 0.0 && self.max_load_factor < 1.0) {
            return Err(Error::InvalidLoadFactor(self.max_load_factor));
        }
        if self.growth_factor < 2 {
            return Err(Error::InvalidGrowthFactor(self.growth_factor));
        }
        Ok(())
    }

    /// Whether writing one more slot into a table of `capacity` slots with
    /// `length` written slots would exceed the load factor.
    #[inline]
    pub(crate) fn needs_growth(&self, length: usize, capacity: usize) -> bool {
        (length + 1) as f64 > self.max_load_factor * capacity as f64
    }

    pub(crate) fn grown_capacity(&self, capacity: usize) -> Result<usize, Error> {
        capacity
            .checked_mul(self.growth_factor)
            .ok_or(Error::CapacityOverflow)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::new()
    }
}
