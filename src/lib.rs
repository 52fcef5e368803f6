//! Ordered symbol table built on a left-leaning red-black tree.
//!
//! Apart from get, put and delete, [`Llrb`] answers order queries like
//! min, max, floor, ceiling, rank and select in logarithmic time, and can
//! list keys in sort order, within a range, or level by level.

mod config;
mod depth;
mod error;
mod llrb;

pub use crate::config::{Config, ITER_LIMIT};
pub use crate::depth::Depth;
pub use crate::error::{Error, Result};
pub use crate::llrb::{Iter, Llrb, Node, Range, Reverse, Stats};

#[cfg(test)]
mod depth_test;
