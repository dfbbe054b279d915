//! Batch processing utilities.
//!
//! Every analytic in this crate is a pure function, so batches over many
//! assets can be mapped in parallel. Uses rayon when the `parallel` feature
//! is enabled.

use serde::{Deserialize, Serialize};

/// Controls how batch computations are scheduled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BatchConfig {
    /// Enable parallel processing (requires 'parallel' feature).
    pub parallel: bool,

    /// Minimum batch size to trigger parallel processing.
    /// Below this threshold, sequential is faster due to thread overhead.
    pub parallel_threshold: usize,
}

impl Default for BatchConfig {
    fn default() -> Self {
        Self {
            parallel: true,
            parallel_threshold: 16,
        }
    }
}

impl BatchConfig {
    /// Creates a config that always uses sequential processing.
    #[must_use]
    pub fn sequential() -> Self {
        Self {
            parallel: false,
            ..Self::default()
        }
    }

    /// Sets the threshold for parallel processing.
    #[must_use]
    pub fn with_threshold(mut self, threshold: usize) -> Self {
        self.parallel_threshold = threshold;
        self
    }

    /// Returns true if a batch of `len` items should run in parallel.
    pub fn should_parallelize(&self, len: usize) -> bool {
        self.parallel && len >= self.parallel_threshold
    }
}

/// Maps a function over items, conditionally using parallel iteration.
///
/// Output order always matches input order.
#[allow(unused_variables)]
pub fn maybe_parallel_map<T, U, F>(items: &[T], config: &BatchConfig, f: F) -> Vec<U>
where
    T: Sync,
    U: Send,
    F: Fn(&T) -> U + Sync + Send,
{
    #[cfg(feature = "parallel")]
    {
        use rayon::prelude::*;
        if config.should_parallelize(items.len()) {
            return items.par_iter().map(f).collect();
        }
    }

    items.iter().map(f).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_order_preserved() {
        let items: Vec<u32> = (0..100).collect();
        let config = BatchConfig::default().with_threshold(1);
        let doubled = maybe_parallel_map(&items, &config, |x| x * 2);
        assert_eq!(doubled, items.iter().map(|x| x * 2).collect::<Vec<_>>());
    }

    #[test]
    fn test_threshold() {
        let config = BatchConfig::default();
        assert!(!config.should_parallelize(2));
        assert!(config.should_parallelize(16));
        assert!(!BatchConfig::sequential().should_parallelize(1_000));
    }
}
