use crate::error::{Error, Result};

/// Default number of entries fetched from the tree in a single batch
/// by [`Iter`], [`Range`] and [`Reverse`].
///
/// [`Iter`]: crate::Iter
/// [`Range`]: crate::Range
/// [`Reverse`]: crate::Reverse
pub const ITER_LIMIT: usize = 100;

/// Configuration for a single [`Llrb`] instance.
///
/// [`Llrb`]: crate::Llrb
#[derive(Clone, Debug, PartialEq)]
pub struct Config {
    iter_limit: usize,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            iter_limit: ITER_LIMIT,
        }
    }
}

impl Config {
    /// Number of entries collected per batch while iterating. Iterators
    /// hold a borrowed reference to the tree and refill their buffer
    /// each time a batch is exhausted.
    pub fn set_iter_limit(&mut self, limit: usize) -> &mut Self {
        self.iter_limit = limit;
        self
    }

    #[inline]
    pub fn iter_limit(&self) -> usize {
        self.iter_limit
    }

    /// Check that every parameter is usable.
    pub fn validate<K>(&self) -> Result<(), K> {
        if self.iter_limit == 0 {
            let msg = "iter_limit must be greater than zero".to_string();
            return Err(Error::InvalidArgument(msg));
        }
        Ok(())
    }
}
