use std::{
    borrow::Borrow,
    cmp::{self, Ord, Ordering},
    collections::VecDeque,
    mem,
    ops::{Bound, Deref, DerefMut, RangeBounds},
};

use rand::Rng;
use tracing::{debug, trace};

use crate::config::Config;
use crate::depth::Depth;
use crate::error::{Error, Result};

/// Llrb is an ordered symbol table, implemented as
/// [left-leaning-red-black][llrb] tree. Every node caches the size of
/// its sub-tree, which gives logarithmic rank and select on top of the
/// usual get, put and delete.
///
/// [llrb]: https://en.wikipedia.org/wiki/Left-leaning_red-black_tree
#[derive(Clone)]
pub struct Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    name: String,
    config: Config,
    root: Option<Box<Node<K, V>>>,
}

/// Different ways to construct a new Llrb instance.
impl<K, V> Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Create an empty instance of Llrb, identified by `name`.
    /// Applications can choose unique names.
    pub fn new<S>(name: S) -> Llrb<K, V>
    where
        S: AsRef<str>,
    {
        Llrb {
            name: name.as_ref().to_string(),
            config: Default::default(),
            root: Default::default(),
        }
    }

    /// Create an empty instance of Llrb with custom configuration.
    pub fn with_config<S>(name: S, config: Config) -> Result<Llrb<K, V>, K>
    where
        S: AsRef<str>,
    {
        config.validate::<K>()?;
        let mut llrb = Llrb::new(name);
        llrb.config = config;
        Ok(llrb)
    }

    /// Create a new instance of Llrb tree and load it with entries
    /// from `iter`. Note that iterator should return (key, value) tuples,
    /// where key must be ``unique``, a duplicate key fails the load
    /// with [`Error::OverwriteKey`].
    pub fn load_from<S, I>(name: S, iter: I) -> Result<Llrb<K, V>, K>
    where
        S: AsRef<str>,
        I: Iterator<Item = (K, V)>,
    {
        let mut llrb = Llrb::new(name);
        for (key, value) in iter {
            llrb.create(key, value)?;
        }
        debug!(name = %llrb.name, entries = llrb.len(), "loaded llrb");
        Ok(llrb)
    }
}

/// Maintenance API.
impl<K, V> Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Identify this instance. Applications can choose unique names while
    /// creating Llrb instances.
    #[inline]
    pub fn id(&self) -> String {
        self.name.clone()
    }

    #[inline]
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Return number of entries in this instance.
    #[inline]
    pub fn len(&self) -> usize {
        size(self.root_deref())
    }

    /// Check whether this index is empty.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.root.is_none()
    }

    /// Return the number of links on the longest path from root to
    /// a leaf. An empty tree has height -1 and a single entry has
    /// height 0.
    pub fn height(&self) -> isize {
        height(self.root_deref())
    }

    /// Return quickly with basic statistics, only entries() method is valid
    /// with this statistics.
    pub fn stats(&self) -> Stats {
        Stats::new(self.len(), mem::size_of::<Node<K, V>>())
    }

    /// Drop all entries.
    pub fn clear(&mut self) {
        let entries = self.len();
        self.root = None;
        debug!(name = %self.name, entries, "cleared llrb");
    }

    #[inline]
    fn root_deref(&self) -> Option<&Node<K, V>> {
        self.root.as_ref().map(Deref::deref)
    }

    // locate the node for key, without cloning its value.
    fn lookup<Q>(&self, key: &Q) -> Option<&Node<K, V>>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = self.root_deref();
        while let Some(nref) = node {
            node = match nref.key.borrow().cmp(key) {
                Ordering::Less => nref.right_deref(),
                Ordering::Greater => nref.left_deref(),
                Ordering::Equal => return Some(nref),
            };
        }
        None
    }
}

type Upsert<K, V> = (Box<Node<K, V>>, Option<V>);

type Delete<K, V> = (Option<Box<Node<K, V>>>, Option<V>);

// remaining sub-tree and the detached node.
type Detach<K, V> = (Option<Box<Node<K, V>>>, Box<Node<K, V>>);

/// Write operations on Llrb instance.
impl<K, V> Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Create a new {key, value} entry in the index. If key is already
    /// present return error, leaving the index untouched.
    pub fn create(&mut self, key: K, value: V) -> Result<(), K> {
        if self.contains(&key) {
            return Err(Error::OverwriteKey);
        }
        self.put(key, value);
        Ok(())
    }

    /// Set value for key. If there is an existing entry for key,
    /// overwrite the old value with new value and return the old value.
    pub fn put(&mut self, key: K, value: V) -> Option<V> {
        let (mut root, old_value) = Llrb::upsert(self.root.take(), key, value);
        root.set_black();
        self.root = Some(root);
        old_value
    }

    /// Put with an explicit "no value". `Some(value)` is same as
    /// [`Llrb::put`], `None` removes the key, same as [`Llrb::delete`].
    /// Either way return the previous value, if any.
    pub fn assign(&mut self, key: K, value: Option<V>) -> Option<V> {
        match value {
            Some(value) => self.put(key, value),
            None => self.delete(&key),
        }
    }

    /// Delete key from this instance and return its value. If key is
    /// not present, then delete is effectively a no-op.
    pub fn delete<Q>(&mut self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if !self.contains(key) {
            return None;
        }

        let mut root = self.root.take()?;
        if !is_red(root.left_deref()) && !is_red(root.right_deref()) {
            root.set_red();
        }
        let (root, old_value) = Llrb::do_delete(root, key);
        self.root = blacken(root);
        old_value
    }

    /// Delete the smallest key from this instance and return the entry.
    pub fn delete_min(&mut self) -> Result<(K, V), K> {
        let mut root = match self.root.take() {
            Some(root) => root,
            None => {
                trace!(name = %self.name, "delete_min on empty llrb");
                return Err(Error::Underflow);
            }
        };
        if !is_red(root.left_deref()) && !is_red(root.right_deref()) {
            root.set_red();
        }
        let (root, node) = Llrb::do_delete_min(root);
        self.root = blacken(root);
        Ok(node.into_entry())
    }

    /// Delete the largest key from this instance and return the entry.
    pub fn delete_max(&mut self) -> Result<(K, V), K> {
        let mut root = match self.root.take() {
            Some(root) => root,
            None => {
                trace!(name = %self.name, "delete_max on empty llrb");
                return Err(Error::Underflow);
            }
        };
        if !is_red(root.left_deref()) && !is_red(root.right_deref()) {
            root.set_red();
        }
        let (root, node) = Llrb::do_delete_max(root);
        self.root = blacken(root);
        Ok(node.into_entry())
    }

    /// Validate LLRB tree with following rules:
    ///
    /// * Red links lean left, no right child is red.
    /// * From root to any leaf, no consecutive reds allowed in its path.
    /// * Number of blacks should be same under left child and right child.
    /// * Make sure keys are in sorted order.
    /// * Cached sub-tree sizes add up.
    /// * rank() and select() are inverse of each other.
    ///
    /// Additionally return full statistics on the tree. Refer to [`Stats`]
    /// for more information.
    pub fn validate(&self) -> Result<Stats, K> {
        let mut depths = Depth::new();
        match self.do_validate(&mut depths) {
            Ok(blacks) => {
                let mut stats = self.stats();
                stats.set_blacks(blacks);
                stats.set_depths(depths);
                Ok(stats)
            }
            Err(err) => {
                debug!(name = %self.name, entries = self.len(), "llrb validation failed");
                Err(err)
            }
        }
    }

    /// Short form of [`Llrb::validate`], for test harness.
    pub fn check(&self) -> bool {
        self.validate().is_ok()
    }
}

/// Read operations on Llrb instance.
impl<K, V> Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    /// Get the value for key.
    pub fn get<Q>(&self, key: &Q) -> Option<V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.lookup(key).map(|nref| nref.value.clone())
    }

    /// Check whether key is present in this index.
    pub fn contains<Q>(&self, key: &Q) -> bool
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.lookup(key).is_some()
    }

    /// Return the smallest key.
    pub fn min(&self) -> Result<K, K> {
        let mut nref = self.root_deref().ok_or(Error::EmptyTable)?;
        while let Some(left) = nref.left_deref() {
            nref = left;
        }
        Ok(nref.key.clone())
    }

    /// Return the largest key.
    pub fn max(&self) -> Result<K, K> {
        let mut nref = self.root_deref().ok_or(Error::EmptyTable)?;
        while let Some(right) = nref.right_deref() {
            nref = right;
        }
        Ok(nref.key.clone())
    }

    /// Return the largest key less than or equal to `key`.
    pub fn floor<Q>(&self, key: &Q) -> Result<K, K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = Some(self.root_deref().ok_or(Error::EmptyTable)?);
        let mut floor = None;
        while let Some(nref) = node {
            node = match nref.key.borrow().cmp(key) {
                Ordering::Equal => return Ok(nref.key.clone()),
                Ordering::Greater => nref.left_deref(),
                Ordering::Less => {
                    floor = Some(nref);
                    nref.right_deref()
                }
            };
        }
        floor.map(|n| n.key.clone()).ok_or(Error::NotFound)
    }

    /// Return the smallest key greater than or equal to `key`.
    pub fn ceiling<Q>(&self, key: &Q) -> Result<K, K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut node = Some(self.root_deref().ok_or(Error::EmptyTable)?);
        let mut ceiling = None;
        while let Some(nref) = node {
            node = match nref.key.borrow().cmp(key) {
                Ordering::Equal => return Ok(nref.key.clone()),
                Ordering::Less => nref.right_deref(),
                Ordering::Greater => {
                    ceiling = Some(nref);
                    nref.left_deref()
                }
            };
        }
        ceiling.map(|n| n.key.clone()).ok_or(Error::NotFound)
    }

    /// Return the key that has exactly `rank` smaller keys in this index.
    /// `rank` must be in `0..len()`.
    pub fn select(&self, rank: usize) -> Result<K, K> {
        let n = self.len();
        if rank >= n {
            let msg = format!("select rank {} out of range 0..{}", rank, n);
            return Err(Error::InvalidArgument(msg));
        }

        let (mut node, mut rank) = (self.root_deref(), rank);
        while let Some(nref) = node {
            let nleft = size(nref.left_deref());
            node = match rank.cmp(&nleft) {
                Ordering::Less => nref.left_deref(),
                Ordering::Equal => return Ok(nref.key.clone()),
                Ordering::Greater => {
                    rank -= nleft + 1;
                    nref.right_deref()
                }
            };
        }
        let msg = format!("select ran past leaf for {} entries", n);
        Err(Error::SizeMismatch(msg))
    }

    /// Return the number of keys strictly less than `key`, `key` need not
    /// be present in the index.
    pub fn rank<Q>(&self, key: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let (mut node, mut rank) = (self.root_deref(), 0);
        while let Some(nref) = node {
            node = match nref.key.borrow().cmp(key) {
                Ordering::Greater => nref.left_deref(),
                Ordering::Equal => return rank + size(nref.left_deref()),
                Ordering::Less => {
                    rank += size(nref.left_deref()) + 1;
                    nref.right_deref()
                }
            };
        }
        rank
    }

    /// Return all keys in ascending order.
    pub fn keys(&self) -> Vec<K> {
        let mut acc = Vec::with_capacity(self.len());
        collect_keys(self.root_deref(), &mut acc);
        acc
    }

    /// Return all keys within the closed interval `[low, high]`, in
    /// ascending order. Empty if `low > high`.
    pub fn keys_between<Q>(&self, low: &Q, high: &Q) -> Vec<K>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut acc = vec![];
        if low <= high {
            collect_between(self.root_deref(), low, high, &mut acc);
        }
        acc
    }

    /// Return the number of keys within the closed interval `[low, high]`.
    pub fn len_between<Q>(&self, low: &Q, high: &Q) -> usize
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if low > high {
            0
        } else if self.lookup(high).is_some() {
            self.rank(high) - self.rank(low) + 1
        } else {
            self.rank(high) - self.rank(low)
        }
    }

    /// Return all keys in breadth first order, root first.
    pub fn level_order(&self) -> Vec<K> {
        let mut acc = Vec::with_capacity(self.len());
        let mut queue: VecDeque<&Node<K, V>> = VecDeque::new();
        queue.extend(self.root_deref());
        while let Some(nref) = queue.pop_front() {
            acc.push(nref.key.clone());
            queue.extend(nref.left_deref());
            queue.extend(nref.right_deref());
        }
        acc
    }

    /// Return a random entry from this index.
    pub fn random<R: Rng>(&self, rng: &mut R) -> Option<(K, V)> {
        let mut nref = self.root_deref()?;

        let mut at_depth = rng.gen::<u8>() % 40;
        loop {
            let next = if rng.gen::<bool>() {
                nref.left_deref()
            } else {
                nref.right_deref()
            };
            match next {
                Some(next) if at_depth > 0 => {
                    at_depth -= 1;
                    nref = next;
                }
                _ => break Some((nref.key.clone(), nref.value.clone())),
            }
        }
    }

    /// Return an iterator over all entries in this instance.
    pub fn iter(&self) -> Iter<K, V> {
        Iter {
            inner: Range::new(
                self.root_deref(),
                Bound::Unbounded,
                Bound::Unbounded,
                self.config.iter_limit(),
            ),
        }
    }

    /// Range over all entries from low to high.
    pub fn range<Q, R>(&self, range: R) -> Range<K, V>
    where
        K: Borrow<Q>,
        R: RangeBounds<Q>,
        Q: Ord + ToOwned<Owned = K> + ?Sized,
    {
        let low = to_owned_bound(range.start_bound());
        let high = to_owned_bound(range.end_bound());
        Range::new(self.root_deref(), low, high, self.config.iter_limit())
    }
}

impl<K, V> Llrb<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    fn upsert(node: Option<Box<Node<K, V>>>, key: K, value: V) -> Upsert<K, V> {
        let mut node = match node {
            None => return (Node::new(key, value, false /*black*/), None),
            Some(node) => node,
        };

        let old_value = match node.key.cmp(&key) {
            Ordering::Greater => {
                let (left, o) = Llrb::upsert(node.left.take(), key, value);
                node.left = Some(left);
                o
            }
            Ordering::Less => {
                let (right, o) = Llrb::upsert(node.right.take(), key, value);
                node.right = Some(right);
                o
            }
            Ordering::Equal => Some(mem::replace(&mut node.value, value)),
        };
        (Llrb::walkuprot_23(node), old_value)
    }

    // caller makes sure that key is present in the sub-tree.
    fn do_delete<Q>(mut node: Box<Node<K, V>>, key: &Q) -> Delete<K, V>
    where
        K: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        if node.key.borrow().gt(key) {
            let left = node.left_deref();
            if !is_red(left) && !is_red(left.and_then(Node::left_deref)) {
                node = Llrb::move_red_left(node);
            }
            let old_value = match node.left.take() {
                Some(left) => {
                    let (left, old_value) = Llrb::do_delete(left, key);
                    node.left = left;
                    old_value
                }
                None => None,
            };
            return (Some(Llrb::balance(node)), old_value);
        }

        if is_red(node.left_deref()) {
            node = Llrb::rotate_right(node);
        }

        if node.key.borrow().eq(key) && node.right.is_none() {
            let left = node.left.take();
            return (left, Some(node.into_entry().1));
        }

        let right = node.right_deref();
        if !is_red(right) && !is_red(right.and_then(Node::left_deref)) {
            node = Llrb::move_red_right(node);
        }

        let old_value = match node.right.take() {
            Some(right) if node.key.borrow().eq(key) => {
                // splice in the successor, the smallest key on the right.
                let (right, succ) = Llrb::do_delete_min(right);
                node.right = right;
                let (key, value) = succ.into_entry();
                node.key = key;
                Some(mem::replace(&mut node.value, value))
            }
            Some(right) => {
                let (right, old_value) = Llrb::do_delete(right, key);
                node.right = right;
                old_value
            }
            None => None,
        };
        (Some(Llrb::balance(node)), old_value)
    }

    fn do_delete_min(mut node: Box<Node<K, V>>) -> Detach<K, V> {
        if node.left.is_none() {
            return (node.right.take(), node);
        }

        let left = node.left_deref();
        if !is_red(left) && !is_red(left.and_then(Node::left_deref)) {
            node = Llrb::move_red_left(node);
        }
        match node.left.take() {
            Some(left) => {
                let (left, min_node) = Llrb::do_delete_min(left);
                node.left = left;
                (Some(Llrb::balance(node)), min_node)
            }
            None => (node.right.take(), node),
        }
    }

    fn do_delete_max(mut node: Box<Node<K, V>>) -> Detach<K, V> {
        if is_red(node.left_deref()) {
            node = Llrb::rotate_right(node);
        }

        if node.right.is_none() {
            return (node.left.take(), node);
        }

        let right = node.right_deref();
        if !is_red(right) && !is_red(right.and_then(Node::left_deref)) {
            node = Llrb::move_red_right(node);
        }
        match node.right.take() {
            Some(right) => {
                let (right, max_node) = Llrb::do_delete_max(right);
                node.right = right;
                (Some(Llrb::balance(node)), max_node)
            }
            None => (node.left.take(), node),
        }
    }

    fn do_validate(&self, depths: &mut Depth) -> Result<usize, K> {
        let blacks = Llrb::validate_tree(self.root_deref(), false, 0, 0, depths)?;

        let keys = self.keys();
        for pair in keys.windows(2) {
            if pair[0] >= pair[1] {
                return Err(Error::SortError(pair[0].clone(), pair[1].clone()));
            }
        }
        for (i, key) in keys.iter().enumerate() {
            let rank = self.rank(key);
            if rank != i {
                let msg = format!("rank() {} for key at position {}", rank, i);
                return Err(Error::RankSelect(msg));
            }
            if self.select(i)? != *key {
                let msg = format!("select({}) does not match in-order key", i);
                return Err(Error::RankSelect(msg));
            }
        }
        Ok(blacks)
    }

    fn validate_tree(
        node: Option<&Node<K, V>>,
        fromred: bool,
        mut nb: usize,
        depth: usize,
        depths: &mut Depth,
    ) -> Result<usize, K> {
        let node = match node {
            None => {
                depths.sample(depth);
                return Ok(nb);
            }
            Some(node) => node,
        };

        let red = !node.is_black();
        if fromred && red {
            return Err(Error::ConsecutiveReds);
        }
        if is_red(node.right_deref()) {
            return Err(Error::RightLeaningRed);
        }
        if !red {
            nb += 1;
        }
        let (left, right) = (node.left_deref(), node.right_deref());
        let lblacks = Llrb::validate_tree(left, red, nb, depth + 1, depths)?;
        let rblacks = Llrb::validate_tree(right, red, nb, depth + 1, depths)?;
        if lblacks != rblacks {
            let err = format!("left: {} right: {}", lblacks, rblacks);
            return Err(Error::UnbalancedBlacks(err));
        }
        if let Some(left) = left {
            if left.key.ge(&node.key) {
                let (lkey, parent) = (left.key.clone(), node.key.clone());
                return Err(Error::SortError(lkey, parent));
            }
        }
        if let Some(right) = right {
            if right.key.le(&node.key) {
                let (rkey, parent) = (right.key.clone(), node.key.clone());
                return Err(Error::SortError(rkey, parent));
            }
        }
        let n = size(left) + size(right) + 1;
        if node.size != n {
            let err = format!("cached: {} children: {}", node.size, n);
            return Err(Error::SizeMismatch(err));
        }
        Ok(lblacks)
    }

    //--------- rotation routines for 2-3 algorithm ----------------

    // applied on every node while unwinding from insert.
    fn walkuprot_23(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        if is_red(node.right_deref()) && !is_red(node.left_deref()) {
            node = Llrb::rotate_left(node);
        }
        let left = node.left_deref();
        if is_red(left) && is_red(left.and_then(Node::left_deref)) {
            node = Llrb::rotate_right(node);
        }
        if is_red(node.left_deref()) && is_red(node.right_deref()) {
            Llrb::flip(node.deref_mut())
        }
        node.update_size();
        node
    }

    // applied on every node while unwinding from delete.
    fn balance(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        if is_red(node.right_deref()) {
            node = Llrb::rotate_left(node);
        }
        let left = node.left_deref();
        if is_red(left) && is_red(left.and_then(Node::left_deref)) {
            node = Llrb::rotate_right(node);
        }
        if is_red(node.left_deref()) && is_red(node.right_deref()) {
            Llrb::flip(node.deref_mut());
        }
        node.update_size();
        node
    }

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //             /    (r)                 (r)  \
    //            /       \                 /     \
    //          left       x             node      xr
    //                    / \            /  \
    //                  xl   xr       left   xl
    //
    // x takes over the sub-tree, hence its size.
    fn rotate_left(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        debug_assert!(is_red(node.right_deref()), "rotate_left(): black link");
        let mut x = match node.right.take() {
            Some(x) => x,
            None => return node,
        };
        node.right = x.left.take();
        x.black = node.black;
        node.set_red();
        x.size = node.size;
        node.update_size();
        x.left = Some(node);
        x
    }

    //              (i)                       (i)
    //               |                         |
    //              node                       x
    //              /  \                      / \
    //            (r)   \                   (r)  \
    //           /       \                 /      \
    //          x       right             xl      node
    //         / \                                / \
    //       xl   xr                             xr  right
    //
    fn rotate_right(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        debug_assert!(is_red(node.left_deref()), "rotate_right(): black link");
        let mut x = match node.left.take() {
            Some(x) => x,
            None => return node,
        };
        node.left = x.right.take();
        x.black = node.black;
        node.set_red();
        x.size = node.size;
        node.update_size();
        x.right = Some(node);
        x
    }

    //        (x)                   (!x)
    //         |                     |
    //        node                  node
    //        / \                   / \
    //      (y) (z)              (!y) (!z)
    //     /      \              /      \
    //   left    right         left    right
    //
    fn flip(node: &mut Node<K, V>) {
        if let Some(left) = node.left.as_mut() {
            left.toggle_link();
        }
        if let Some(right) = node.right.as_mut() {
            right.toggle_link();
        }
        node.toggle_link();
    }

    // borrow a red link from the right sibling so that the left child
    // or its left child is red before stepping left.
    fn move_red_left(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        Llrb::flip(node.deref_mut());
        if is_red(node.right_deref().and_then(Node::left_deref)) {
            if let Some(right) = node.right.take() {
                node.right = Some(Llrb::rotate_right(right));
            }
            node = Llrb::rotate_left(node);
            Llrb::flip(node.deref_mut());
        }
        node
    }

    // mirror of move_red_left, before stepping right.
    fn move_red_right(mut node: Box<Node<K, V>>) -> Box<Node<K, V>> {
        Llrb::flip(node.deref_mut());
        if is_red(node.left_deref().and_then(Node::left_deref)) {
            node = Llrb::rotate_right(node);
            Llrb::flip(node.deref_mut());
        }
        node
    }
}

fn blacken<K, V>(root: Option<Box<Node<K, V>>>) -> Option<Box<Node<K, V>>>
where
    K: Clone + Ord,
    V: Clone,
{
    root.map(|mut root| {
        root.set_black();
        root
    })
}

fn is_red<K, V>(node: Option<&Node<K, V>>) -> bool
where
    K: Clone + Ord,
    V: Clone,
{
    node.map_or(false, |node| !node.is_black())
}

fn size<K, V>(node: Option<&Node<K, V>>) -> usize
where
    K: Clone + Ord,
    V: Clone,
{
    node.map_or(0, |node| node.size)
}

fn height<K, V>(node: Option<&Node<K, V>>) -> isize
where
    K: Clone + Ord,
    V: Clone,
{
    match node {
        None => -1,
        Some(node) => {
            let (left, right) = (node.left_deref(), node.right_deref());
            1 + cmp::max(height(left), height(right))
        }
    }
}

fn collect_keys<K, V>(node: Option<&Node<K, V>>, acc: &mut Vec<K>)
where
    K: Clone + Ord,
    V: Clone,
{
    if let Some(node) = node {
        collect_keys(node.left_deref(), acc);
        acc.push(node.key.clone());
        collect_keys(node.right_deref(), acc);
    }
}

fn collect_between<K, V, Q>(node: Option<&Node<K, V>>, low: &Q, high: &Q, acc: &mut Vec<K>)
where
    K: Clone + Ord + Borrow<Q>,
    V: Clone,
    Q: Ord + ?Sized,
{
    let node = match node {
        None => return,
        Some(node) => node,
    };

    let key: &Q = node.key.borrow();
    if low < key {
        collect_between(node.left_deref(), low, high, acc);
    }
    if low <= key && key <= high {
        acc.push(node.key.clone());
    }
    if high > key {
        collect_between(node.right_deref(), low, high, acc);
    }
}

fn to_owned_bound<Q>(bound: Bound<&Q>) -> Bound<Q::Owned>
where
    Q: ToOwned + ?Sized,
{
    match bound {
        Bound::Included(key) => Bound::Included(key.to_owned()),
        Bound::Excluded(key) => Bound::Excluded(key.to_owned()),
        Bound::Unbounded => Bound::Unbounded,
    }
}

fn above_low<K: Ord>(key: &K, low: &Bound<K>) -> bool {
    match low {
        Bound::Included(low) => key.ge(low),
        Bound::Excluded(low) => key.gt(low),
        Bound::Unbounded => true,
    }
}

fn below_high<K: Ord>(key: &K, high: &Bound<K>) -> bool {
    match high {
        Bound::Included(high) => key.le(high),
        Bound::Excluded(high) => key.lt(high),
        Bound::Unbounded => true,
    }
}

/// Iterate over every entry in ascending order, refer to [`Llrb::iter`].
pub struct Iter<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    inner: Range<'a, K, V>,
}

impl<'a, K, V> Iterator for Iter<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        self.inner.next()
    }
}

/// Iterate over entries within a range in ascending order, refer to
/// [`Llrb::range`]. Entries are cloned out of the tree in batches of
/// [`Config::iter_limit`].
pub struct Range<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    root: Option<&'a Node<K, V>>,
    batch: std::vec::IntoIter<(K, V)>,
    low: Bound<K>,
    high: Bound<K>,
    cursor: Option<Bound<K>>, // moving lower bound, None once exhausted.
    limit: usize,
}

impl<'a, K, V> Range<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    fn new(root: Option<&'a Node<K, V>>, low: Bound<K>, high: Bound<K>, limit: usize) -> Self {
        Range {
            root,
            batch: vec![].into_iter(),
            cursor: Some(low.clone()),
            low,
            high,
            limit,
        }
    }

    /// Iterate over the same range in descending order.
    pub fn rev(self) -> Reverse<'a, K, V> {
        Reverse {
            root: self.root,
            batch: vec![].into_iter(),
            cursor: Some(self.high),
            low: self.low,
            limit: self.limit,
        }
    }

    fn range_iter(
        &self,
        node: Option<&Node<K, V>>,
        low: &Bound<K>,
        acc: &mut Vec<(K, V)>, // accumulator for batch of nodes
    ) -> bool {
        let node = match node {
            None => return true,
            Some(node) => node,
        };

        let (left, right) = (node.left_deref(), node.right_deref());
        if !above_low(&node.key, low) {
            return self.range_iter(right, low, acc);
        }
        if !below_high(&node.key, &self.high) {
            return self.range_iter(left, low, acc);
        }

        if !self.range_iter(left, low, acc) {
            return false;
        }
        acc.push((node.key.clone(), node.value.clone()));
        if acc.len() >= self.limit {
            return false;
        }
        self.range_iter(right, low, acc)
    }
}

impl<'a, K, V> Iterator for Range<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(item) = self.batch.next() {
            return Some(item);
        }

        let low = self.cursor.take()?;
        let mut acc: Vec<(K, V)> = Vec::with_capacity(self.limit);
        let more = !self.range_iter(self.root, &low, &mut acc);
        if more {
            self.cursor = acc.last().map(|x| Bound::Excluded(x.0.clone()));
        }
        self.batch = acc.into_iter();
        self.batch.next()
    }
}

/// Iterate over entries within a range in descending order, refer to
/// [`Range::rev`].
pub struct Reverse<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    root: Option<&'a Node<K, V>>,
    batch: std::vec::IntoIter<(K, V)>,
    low: Bound<K>,
    cursor: Option<Bound<K>>, // moving upper bound, None once exhausted.
    limit: usize,
}

impl<'a, K, V> Reverse<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    fn reverse_iter(
        &self,
        node: Option<&Node<K, V>>,
        high: &Bound<K>,
        acc: &mut Vec<(K, V)>, // accumulator for batch of nodes
    ) -> bool {
        let node = match node {
            None => return true,
            Some(node) => node,
        };

        let (left, right) = (node.left_deref(), node.right_deref());
        if !below_high(&node.key, high) {
            return self.reverse_iter(left, high, acc);
        }
        if !above_low(&node.key, &self.low) {
            return self.reverse_iter(right, high, acc);
        }

        if !self.reverse_iter(right, high, acc) {
            return false;
        }
        acc.push((node.key.clone(), node.value.clone()));
        if acc.len() >= self.limit {
            return false;
        }
        self.reverse_iter(left, high, acc)
    }
}

impl<'a, K, V> Iterator for Reverse<'a, K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    type Item = (K, V);

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(item) = self.batch.next() {
            return Some(item);
        }

        let high = self.cursor.take()?;
        let mut acc: Vec<(K, V)> = Vec::with_capacity(self.limit);
        let more = !self.reverse_iter(self.root, &high, &mut acc);
        if more {
            self.cursor = acc.last().map(|x| Bound::Excluded(x.0.clone()));
        }
        self.batch = acc.into_iter();
        self.batch.next()
    }
}

/// Node corresponds to a single entry in Llrb instance.
#[derive(Clone)]
pub struct Node<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    key: K,
    value: V,
    black: bool,                    // store: color of link from parent
    size: usize,                    // store: number of nodes in sub-tree
    left: Option<Box<Node<K, V>>>,  // store: left child
    right: Option<Box<Node<K, V>>>, // store: right child
}

// Primary operations on a single node.
impl<K, V> Node<K, V>
where
    K: Clone + Ord,
    V: Clone,
{
    // CREATE operation
    fn new(key: K, value: V, black: bool) -> Box<Node<K, V>> {
        Box::new(Node {
            key,
            value,
            black,
            size: 1,
            left: None,
            right: None,
        })
    }

    // consume a detached node.
    fn into_entry(self: Box<Self>) -> (K, V) {
        let node = *self;
        (node.key, node.value)
    }

    #[inline]
    fn left_deref(&self) -> Option<&Node<K, V>> {
        self.left.as_ref().map(Deref::deref)
    }

    #[inline]
    fn right_deref(&self) -> Option<&Node<K, V>> {
        self.right.as_ref().map(Deref::deref)
    }

    #[inline]
    fn update_size(&mut self) {
        self.size = size(self.left_deref()) + size(self.right_deref()) + 1;
    }

    #[inline]
    fn set_red(&mut self) {
        self.black = false
    }

    #[inline]
    fn set_black(&mut self) {
        self.black = true
    }

    #[inline]
    fn toggle_link(&mut self) {
        self.black = !self.black
    }

    #[inline]
    fn is_black(&self) -> bool {
        self.black
    }
}

/// Statistics on [`Llrb`] tree. Serves two purpose:
///
/// * To get partial but quick statistics via [`Llrb::stats`] method.
/// * To get full statistics via [`Llrb::validate`] method.
#[derive(Default, Debug)]
pub struct Stats {
    entries: usize, // number of entries in the tree.
    node_size: usize,
    blacks: Option<usize>,
    depths: Option<Depth>,
}

impl Stats {
    fn new(entries: usize, node_size: usize) -> Stats {
        Stats {
            entries,
            node_size,
            blacks: Default::default(),
            depths: Default::default(),
        }
    }

    #[inline]
    fn set_blacks(&mut self, blacks: usize) {
        self.blacks = Some(blacks)
    }

    #[inline]
    fn set_depths(&mut self, depths: Depth) {
        self.depths = Some(depths)
    }

    /// Return number entries in [`Llrb`] instance.
    #[inline]
    pub fn entries(&self) -> usize {
        self.entries
    }

    /// Return node-size, including over-head for `Llrb<k,V>`. Although
    /// the node overhead is constant, the node size varies based on
    /// key and value types. EG:
    ///
    /// ```
    /// use llrb_symtab::Llrb;
    /// let llrb: Llrb<u64,u64> = Llrb::new("myinstance");
    ///
    /// // size of key: 8 bytes
    /// // size of value: 8 bytes
    /// // overhead is 32 bytes, color, sub-tree size and two children
    /// assert_eq!(llrb.stats().node_size(), 48);
    /// ```
    #[inline]
    pub fn node_size(&self) -> usize {
        self.node_size
    }

    /// Return number of black links from root to leaf, same along
    /// every path.
    #[inline]
    pub fn blacks(&self) -> Option<usize> {
        self.blacks
    }

    /// Return [`Depth`] statistics, available only after validate().
    pub fn depths(&self) -> Option<Depth> {
        self.depths.clone().filter(|d| d.samples() > 0)
    }
}
