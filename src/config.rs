//! # Lifecycle core configuration.
//!
//! Provides [`Config`] centralized settings for lifecycle streams, the tree
//! event bus and subscriber queues.
//!
//! Config is used in three ways:
//! 1. **Interactor creation**: `Interactor::with_config(name, logic, &config)`
//! 2. **Presenter lifecycle**: `PresenterLifecycle::with_config(&config)`
//! 3. **Tree events**: `Bus::from_config(&config)` and `SubscriberSet`
//!
//! ## Sentinel values
//! - `lifecycle_capacity = 0` and `bus_capacity = 0` are clamped to 1
//! - `subscriber_queue = 0` → each subscriber's own preference is used

/// Global configuration for the lifecycle core.
///
/// ## Field semantics
/// - `lifecycle_capacity`: ring size of each lifecycle stream's broadcast channel (min 1)
/// - `bus_capacity`: tree event bus ring buffer size (min 1)
/// - `subscriber_queue`: queue size forced on every subscriber (`0` = per-subscriber preference)
///
/// ## Notes
/// All fields are public for flexibility. Prefer using helper accessors to avoid
/// sprinkling sentinel checks (`0`) across the codebase.
#[derive(Clone, Debug)]
pub struct Config {
    /// Capacity of the broadcast channel behind every lifecycle stream.
    ///
    /// A cycle publishes two events, so small values are fine. Receivers that
    /// lag behind more than this many events skip the oldest ones.
    pub lifecycle_capacity: usize,

    /// Capacity of the tree event bus ring buffer.
    pub bus_capacity: usize,

    /// Per-subscriber queue capacity override.
    ///
    /// - `0` = use [`Subscribe::queue_capacity`](crate::Subscribe::queue_capacity)
    /// - `n > 0` = every subscriber gets a queue of `n`
    pub subscriber_queue: usize,
}

impl Config {
    /// Returns a lifecycle channel capacity clamped to a minimum of 1.
    #[inline]
    pub fn lifecycle_capacity_clamped(&self) -> usize {
        self.lifecycle_capacity.max(1)
    }

    /// Returns a bus capacity clamped to a minimum of 1.
    #[inline]
    pub fn bus_capacity_clamped(&self) -> usize {
        self.bus_capacity.max(1)
    }

    /// Returns the forced subscriber queue capacity as an `Option`.
    ///
    /// - `None` → per-subscriber preference
    /// - `Some(n)` → forced capacity
    #[inline]
    pub fn subscriber_queue_override(&self) -> Option<usize> {
        if self.subscriber_queue == 0 {
            None
        } else {
            Some(self.subscriber_queue)
        }
    }
}

impl Default for Config {
    /// Default configuration:
    ///
    /// - `lifecycle_capacity = 16`
    /// - `bus_capacity = 1024`
    /// - `subscriber_queue = 0` (per-subscriber preference)
    fn default() -> Self {
        Self {
            lifecycle_capacity: 16,
            bus_capacity: 1024,
            subscriber_queue: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_capacities_are_clamped() {
        let cfg = Config {
            lifecycle_capacity: 0,
            bus_capacity: 0,
            subscriber_queue: 0,
        };
        assert_eq!(cfg.lifecycle_capacity_clamped(), 1);
        assert_eq!(cfg.bus_capacity_clamped(), 1);
        assert_eq!(cfg.subscriber_queue_override(), None);
    }

    #[test]
    fn test_subscriber_queue_override() {
        let cfg = Config {
            subscriber_queue: 8,
            ..Config::default()
        };
        assert_eq!(cfg.subscriber_queue_override(), Some(8));
    }
}
