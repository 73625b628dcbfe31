use std::borrow::Borrow;
use std::fmt::{Debug, Formatter};
use std::hash::{Hash, Hasher};
use std::mem;

use crate::config::Config;
use crate::error::{Result, SkipListError};
use crate::graph::{NodeGraph, NodeId, Payload};
use crate::iter::{IntoIter, Iter};
use crate::level::{GeometricLevels, LevelGenerator};

/// `SkipListSet` is an ordered set stored in a skip list, as described in
/// William Pugh's 1990 paper ["Skip Lists: A Probabilistic Alternative to
/// Balanced Trees"].
///
/// Elements are kept in the natural order of `T`. Each element occupies a
/// tower of nodes whose height is drawn from the level generator `L` when the
/// element is inserted.
///
/// ["Skip Lists: A Probabilistic Alternative to Balanced Trees"]: https://15721.courses.cs.cmu.edu/spring2018/papers/08-oltpindexes1/pugh-skiplists-cacm1990.pdf
#[derive(Clone)]
pub struct SkipListSet<T, L = GeometricLevels> {
    graph: NodeGraph<T>,
    len: usize,
    levels: L,
}

impl<T: Ord> SkipListSet<T> {
    /// Create a new, empty set with fair-coin tower heights.
    pub fn new() -> SkipListSet<T> {
        SkipListSet::with_levels(GeometricLevels::new())
    }

    /// Create a new, empty set configured by `config`.
    ///
    /// # Returns
    ///
    /// The set, or `InvalidArgument` if the configuration is out of range.
    pub fn with_config(config: &Config) -> Result<SkipListSet<T>> {
        Ok(SkipListSet::with_levels(config.level_generator()?))
    }
}

impl<T, L> SkipListSet<T, L> {
    /// The number of elements in the set.
    pub fn len(&self) -> usize {
        self.len
    }

    /// True if the set holds no elements.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// The number of levels currently in the node graph.
    ///
    /// Grows as elements are inserted and only shrinks on
    /// [`clear`](Self::clear) or [`rebalance`](Self::rebalance).
    pub fn height(&self) -> usize {
        self.graph.height()
    }

    /// Get an iterator over the elements in ascending order.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter::new(&self.graph, self.len)
    }

    /// Remove every element and return to a single empty level.
    pub fn clear(&mut self) {
        log::debug!(
            "clearing skip list set of {} elements over {} levels",
            self.len,
            self.graph.height()
        );
        self.graph = NodeGraph::new();
        self.len = 0;
    }

    /// The smallest element.
    ///
    /// # Returns
    ///
    /// The element, or `Empty` if the set has no elements.
    pub fn first(&self) -> Result<&T> {
        let first = self
            .graph
            .next(self.graph.bottom_head())
            .ok_or(SkipListError::Empty)?;
        self.graph.value(first).ok_or(SkipListError::Empty)
    }

    /// The largest element.
    ///
    /// # Returns
    ///
    /// The element, or `Empty` if the set has no elements.
    pub fn last(&self) -> Result<&T> {
        let last = self
            .graph
            .previous(self.graph.bottom_tail())
            .ok_or(SkipListError::Empty)?;
        self.graph.value(last).ok_or(SkipListError::Empty)
    }

    /// Copy the elements, in ascending order, into an array sized to the set.
    pub fn to_array(&self) -> Box<[T]>
    where
        T: Clone,
    {
        self.to_vec().into_boxed_slice()
    }

    /// Copy the elements into a vector in ascending order.
    pub fn to_vec(&self) -> Vec<T>
    where
        T: Clone,
    {
        let mut values = Vec::with_capacity(self.len);
        values.extend(self.iter().cloned());
        values
    }

    /// Move the elements into a vector in ascending order.
    pub fn into_vec(self) -> Vec<T> {
        self.graph.into_values()
    }

    /// Not supported: a skip list set cannot keep only the elements of
    /// another collection.
    pub fn retain_all<I>(&mut self, _values: I) -> Result<bool>
    where
        I: IntoIterator,
    {
        Err(SkipListError::Unsupported("retain_all"))
    }

    /// Not supported: range views are not provided.
    pub fn sub_set(&self, _from: &T, _to: &T) -> Result<SkipListSet<T, L>> {
        Err(SkipListError::Unsupported("sub_set"))
    }

    /// Not supported: range views are not provided.
    pub fn head_set(&self, _to: &T) -> Result<SkipListSet<T, L>> {
        Err(SkipListError::Unsupported("head_set"))
    }

    /// Not supported: range views are not provided.
    pub fn tail_set(&self, _from: &T) -> Result<SkipListSet<T, L>> {
        Err(SkipListError::Unsupported("tail_set"))
    }
}

impl<T, L> SkipListSet<T, L>
where
    T: Ord,
{
    /// Move right along a level for as long as the next node holds a value
    /// smaller than `value`.
    fn advance_while_less<Q>(&self, mut current: NodeId, value: &Q) -> NodeId
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        while let Some(next) = self.graph.next(current) {
            match self.graph.value(next) {
                Some(candidate) if candidate.borrow() < value => current = next,
                _ => break,
            }
        }
        current
    }

    /// Search from the top level down and return the rightmost bottom-level
    /// node smaller than `value`, or the bottom head sentinel.
    fn find_predecessor<Q>(&self, value: &Q) -> NodeId
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.graph.head();
        loop {
            current = self.advance_while_less(current, value);
            match self.graph.below(current) {
                Some(below) => current = below,
                None => return current,
            }
        }
    }

    /// The node to the right of `predecessor` if it holds `value`.
    fn matching_successor<Q>(&self, predecessor: NodeId, value: &Q) -> Option<NodeId>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let next = self.graph.next(predecessor)?;
        let candidate = self.graph.value(next)?;
        (candidate.borrow() == value).then_some(next)
    }

    /// Get the stored element equal to `value`.
    ///
    /// # Arguments
    ///
    /// - value: the value to search for, in any form `T` borrows as
    ///
    /// # Returns
    ///
    /// A reference to the element if present.
    pub fn get<Q>(&self, value: &Q) -> Option<&T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let predecessor = self.find_predecessor(value);
        let found = self.matching_successor(predecessor, value)?;
        self.graph.value(found)
    }

    /// Check if the set contains `value`.
    ///
    /// Note that the `Ord` implementation of `Q` must match that of `T`.
    ///
    /// # Returns
    ///
    /// True if the value is present, false otherwise.
    pub fn contains<Q>(&self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let predecessor = self.find_predecessor(value);
        self.matching_successor(predecessor, value).is_some()
    }

    /// Check if the set contains every one of `values`.
    pub fn contains_all<'q, Q, I>(&self, values: I) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized + 'q,
        I: IntoIterator<Item = &'q Q>,
    {
        values.into_iter().all(|value| self.contains(value))
    }

    /// Remove `value` and hand the stored element back.
    ///
    /// Descends from the top level and splices the element's node out of
    /// every level it occupies on the way down, in a single pass.
    ///
    /// # Returns
    ///
    /// The removed element if it was present.
    pub fn take<Q>(&mut self, value: &Q) -> Option<T>
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        let mut current = self.graph.head();
        let mut taken = None;
        loop {
            current = self.advance_while_less(current, value);
            if let Some(found) = self.matching_successor(current, value) {
                if let Payload::Value(element) = self.graph.unlink(found) {
                    taken = Some(element);
                }
            }
            match self.graph.below(current) {
                Some(below) => current = below,
                None => break,
            }
        }
        if taken.is_some() {
            self.len -= 1;
        }
        taken
    }

    /// Remove `value` from the set.
    ///
    /// The height of the graph never shrinks here; levels left empty stay
    /// until the next [`rebalance`](Self::rebalance) or
    /// [`clear`](Self::clear).
    ///
    /// # Returns
    ///
    /// True if the value was present, false otherwise.
    pub fn remove<Q>(&mut self, value: &Q) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized,
    {
        self.take(value).is_some()
    }

    /// Remove every one of `values` that is present. Missing values are
    /// skipped.
    ///
    /// # Returns
    ///
    /// Always true.
    pub fn remove_all<'q, Q, I>(&mut self, values: I) -> bool
    where
        T: Borrow<Q>,
        Q: Ord + ?Sized + 'q,
        I: IntoIterator<Item = &'q Q>,
    {
        for value in values {
            self.remove(value);
        }
        true
    }

    /// Audit the node graph.
    ///
    /// Checks that every level is strictly ascending between its sentinels,
    /// that every tower is stacked unbroken from level 1, and that the bottom
    /// level holds exactly [`len`](Self::len) elements.
    ///
    /// # Returns
    ///
    /// `Corrupt` describing the first violation found.
    pub fn validate(&self) -> Result<()> {
        let bottom = self.graph.validate()?;
        if bottom != self.len {
            return Err(SkipListError::Corrupt {
                level: 1,
                reason: "bottom level does not match the element count",
            });
        }
        if exceeds_capacity(self.len, self.graph.height()) {
            return Err(SkipListError::Corrupt {
                level: self.graph.height(),
                reason: "too few levels for the element count",
            });
        }
        Ok(())
    }
}

impl<T, L> SkipListSet<T, L>
where
    T: Ord,
    L: LevelGenerator,
{
    /// Create a new, empty set drawing tower heights from `levels`.
    ///
    /// ```
    /// use skipset::SkipListSet;
    ///
    /// // Every element gets a tower of two levels.
    /// let mut set = SkipListSet::with_levels(|| 2_usize);
    /// set.insert("b");
    /// set.insert("a");
    /// assert_eq!(set.height(), 2);
    /// assert_eq!(set.iter().copied().collect::<Vec<_>>(), ["a", "b"]);
    /// ```
    pub fn with_levels(levels: L) -> SkipListSet<T, L> {
        SkipListSet {
            graph: NodeGraph::new(),
            len: 0,
            levels,
        }
    }

    /// Insert `value` into the set.
    ///
    /// # Arguments
    ///
    /// - value: the element to insert
    ///
    /// # Returns
    ///
    /// True if the element was added, false if an equal element was already
    /// present. A rejected duplicate leaves the set untouched.
    pub fn insert(&mut self, value: T) -> bool {
        let predecessor = self.find_predecessor(&value);
        if self.matching_successor(predecessor, &value).is_some() {
            return false;
        }

        let tower = self.levels.random_level().max(1);
        let len = self.len + 1;
        while tower > self.graph.height() || exceeds_capacity(len, self.graph.height()) {
            self.graph.grow();
        }

        let base = self
            .graph
            .splice_after(predecessor, Payload::Value(value), None);
        let mut below = base;
        let mut current = predecessor;
        for _ in 1..tower {
            current = match self.graph.ascend(current) {
                Some(above) => above,
                None => unreachable!("the graph is at least as tall as every tower"),
            };
            below = self
                .graph
                .splice_after(current, Payload::Tower(base), Some(below));
        }
        self.len = len;
        true
    }

    /// Insert a value that may be absent.
    ///
    /// # Returns
    ///
    /// As [`insert`](Self::insert), or `InvalidArgument` if `value` is `None`.
    pub fn try_insert(&mut self, value: Option<T>) -> Result<bool> {
        match value {
            Some(value) => Ok(self.insert(value)),
            None => Err(SkipListError::InvalidArgument(
                "cannot insert an absent value".to_string(),
            )),
        }
    }

    /// Insert every one of `values`.
    ///
    /// # Returns
    ///
    /// True if at least one element was newly added.
    pub fn insert_all<I>(&mut self, values: I) -> bool
    where
        I: IntoIterator<Item = T>,
    {
        let mut modified = false;
        for value in values {
            modified |= self.insert(value);
        }
        modified
    }

    /// Rebuild the node graph from scratch with freshly drawn tower heights.
    ///
    /// Keeps the same elements in the same order. This is the only way to
    /// give back levels emptied by removals.
    pub fn rebalance(&mut self) {
        if self.is_empty() {
            return;
        }
        let old_height = self.graph.height();
        let values = mem::replace(&mut self.graph, NodeGraph::new()).into_values();
        self.len = 0;
        for value in values {
            self.insert(value);
        }
        log::debug!(
            "rebalanced skip list set of {} elements from {} to {} levels",
            self.len,
            old_height,
            self.graph.height()
        );
    }
}

/// True if `len` elements call for more than `height` levels, that is
/// `len >= 2^height`.
fn exceeds_capacity(len: usize, height: usize) -> bool {
    u32::try_from(height)
        .ok()
        .and_then(|height| 1usize.checked_shl(height))
        .map_or(false, |capacity| len >= capacity)
}

impl<T: Ord> Default for SkipListSet<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Debug, L> Debug for SkipListSet<T, L> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}

impl<T: PartialEq, L> PartialEq for SkipListSet<T, L> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq, L> Eq for SkipListSet<T, L> {
    // Nothing needs to be implemented here.
}

impl<T: Hash, L> Hash for SkipListSet<T, L> {
    fn hash<H: Hasher>(&self, state: &mut H) {
        state.write_usize(self.len);
        for value in self.iter() {
            value.hash(state);
        }
    }
}

impl<T, L> IntoIterator for SkipListSet<T, L> {
    type Item = T;
    type IntoIter = IntoIter<T>;
    fn into_iter(self) -> Self::IntoIter {
        IntoIter::new(self.into_vec())
    }
}

impl<'a, T, L> IntoIterator for &'a SkipListSet<T, L> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;
    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl<T: Ord, L: LevelGenerator> Extend<T> for SkipListSet<T, L> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        self.insert_all(iter);
    }
}

impl<T: Ord> FromIterator<T> for SkipListSet<T> {
    fn from_iter<I>(iter: I) -> Self
    where
        I: IntoIterator<Item = T>,
    {
        let mut set = Self::new();
        set.insert_all(iter);
        set
    }
}

impl<T: Ord, const N: usize> From<[T; N]> for SkipListSet<T> {
    fn from(values: [T; N]) -> Self {
        let mut set = Self::new();
        set.insert_all(values);
        set
    }
}

#[cfg(test)]
mod test {
    use std::collections::BTreeSet;

    use super::*;

    fn seeded<T: Ord>(seed: u64) -> SkipListSet<T> {
        SkipListSet::with_levels(GeometricLevels::seeded(seed))
    }

    fn collected<L>(set: &SkipListSet<i32, L>) -> Vec<i32> {
        set.iter().copied().collect()
    }

    #[test]
    fn test_insert_remove_scenario() {
        let mut set = seeded(1);
        for value in [1, 3, 5, 7, 9] {
            assert!(set.insert(value));
            set.validate().unwrap();
        }
        assert_eq!(set.len(), 5);
        assert_eq!(set.first(), Ok(&1));
        assert_eq!(set.last(), Ok(&9));
        assert_eq!(collected(&set), vec![1, 3, 5, 7, 9]);

        assert!(set.remove(&5));
        set.validate().unwrap();
        assert!(!set.contains(&5));
        assert_eq!(collected(&set), vec![1, 3, 7, 9]);
        assert_eq!(set.len(), 4);

        assert!(set.insert(5));
        set.validate().unwrap();
        assert_eq!(collected(&set), vec![1, 3, 5, 7, 9]);
        assert_eq!(set.len(), 5);
    }

    #[test]
    fn test_duplicates_collapse() {
        let set: SkipListSet<i32> = vec![4, 2, 2, 8].into_iter().collect();
        assert_eq!(set.len(), 3);
        assert_eq!(collected(&set), vec![2, 4, 8]);
        set.validate().unwrap();
    }

    #[test]
    fn test_duplicate_insert_rejected() {
        let mut set = seeded(2);
        assert!(set.insert(10));
        let height = set.height();
        assert!(!set.insert(10));
        assert_eq!(set.len(), 1);
        assert_eq!(set.height(), height);
        set.validate().unwrap();
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let mut set = seeded(3);
        set.insert_all([1, 2, 3]);
        let before = set.clone();
        assert!(!set.remove(&4));
        assert!(!set.remove(&0));
        assert_eq!(set, before);
        assert_eq!(set.len(), 3);
        set.validate().unwrap();

        let mut empty: SkipListSet<i32> = seeded(3);
        assert!(!empty.remove(&1));
        assert_eq!(empty.take(&1), None);
    }

    #[test]
    fn test_take_returns_stored_value() {
        let mut set: SkipListSet<String> = seeded(4);
        set.insert("kiwi".to_string());
        set.insert("lime".to_string());
        assert_eq!(set.get("kiwi").map(String::as_str), Some("kiwi"));
        assert_eq!(set.take("kiwi"), Some("kiwi".to_string()));
        assert_eq!(set.take("kiwi"), None);
        assert_eq!(set.len(), 1);
        set.validate().unwrap();
    }

    #[test]
    fn test_empty_set() {
        let mut set: SkipListSet<i32> = seeded(5);
        assert!(set.is_empty());
        assert_eq!(set.first(), Err(SkipListError::Empty));
        assert_eq!(set.last(), Err(SkipListError::Empty));
        assert_eq!(set.iter().next(), None);

        set.insert_all(0..100);
        set.clear();
        assert_eq!(set.first(), Err(SkipListError::Empty));
        assert_eq!(set.last(), Err(SkipListError::Empty));
        assert_eq!(set.iter().count(), 0);
    }

    #[test]
    fn test_clear_is_idempotent() {
        let mut set = seeded(6);
        set.insert_all(0..1_000);
        assert!(set.height() > 1);
        set.clear();
        assert_eq!((set.len(), set.height()), (0, 1));
        set.validate().unwrap();
        set.clear();
        assert_eq!((set.len(), set.height()), (0, 1));
        set.validate().unwrap();
        assert!(set.insert(1));
        assert_eq!(collected(&set), vec![1]);
    }

    #[test]
    fn test_height_tracks_len() {
        // Even if every tower has height 1 the graph keeps len < 2^height.
        let mut set = SkipListSet::with_levels(|| 1_usize);
        for value in 0..1_000 {
            set.insert(value);
            assert!(set.len() < 1 << set.height());
        }
        assert_eq!(set.height(), 10);
        set.validate().unwrap();
    }

    #[test]
    fn test_fixed_towers() {
        let mut heights = vec![1_usize, 3, 2, 1].into_iter();
        let mut set = SkipListSet::with_levels(move || heights.next().unwrap_or(1));
        set.insert_all([40, 10, 30, 20]);
        set.validate().unwrap();
        assert_eq!(set.height(), 3);
        assert_eq!(collected(&set), vec![10, 20, 30, 40]);

        // 10 is the only element on level 3. Removing it empties that level
        // without lowering the height.
        assert!(set.remove(&10));
        set.validate().unwrap();
        assert_eq!(set.height(), 3);
        assert_eq!(collected(&set), vec![20, 30, 40]);
    }

    #[test]
    fn test_rebalance_keeps_elements() {
        let mut set = seeded(7);
        set.insert_all((0..500).map(|value| value * 3));
        let evens: Vec<i32> = (0..500).filter(|value| value % 2 == 0).map(|v| v * 3).collect();
        set.remove_all(&evens);
        let before = collected(&set);
        set.rebalance();
        set.validate().unwrap();
        assert_eq!(collected(&set), before);
        assert_eq!(set.len(), 250);

        let mut empty: SkipListSet<i32> = seeded(7);
        empty.rebalance();
        assert_eq!((empty.len(), empty.height()), (0, 1));
    }

    #[test]
    fn test_rebalance_sheds_empty_levels() {
        // Tall towers for the first four draws, flat ones afterwards.
        let mut draws = 0;
        let mut set = SkipListSet::with_levels(move || {
            draws += 1;
            if draws <= 4 {
                6_usize
            } else {
                1
            }
        });
        set.insert_all(0..4);
        assert_eq!(set.height(), 6);
        set.remove_all(&[0, 1, 2]);
        assert_eq!(set.height(), 6);
        set.validate().unwrap();

        set.rebalance();
        assert_eq!(set.height(), 1);
        assert_eq!(collected(&set), vec![3]);
        set.validate().unwrap();
    }

    #[test]
    fn test_bulk_helpers() {
        let mut set: SkipListSet<i32> = seeded(8);
        assert!(set.insert_all([5, 1, 3]));
        assert!(!set.insert_all([5, 1]));
        assert!(set.contains_all(&[1, 3, 5]));
        assert!(!set.contains_all(&[1, 2]));
        assert!(set.contains_all(std::iter::empty::<&i32>()));
        assert!(set.remove_all(&[1, 42]));
        assert_eq!(collected(&set), vec![3, 5]);
        assert_eq!(&*set.to_array(), &[3, 5]);
        assert_eq!(set.to_vec(), vec![3, 5]);
        assert_eq!(set.into_vec(), vec![3, 5]);
    }

    #[test]
    fn test_try_insert_rejects_absent() {
        let mut set = seeded(9);
        assert_eq!(set.try_insert(Some(1)), Ok(true));
        assert_eq!(set.try_insert(Some(1)), Ok(false));
        assert!(matches!(
            set.try_insert(None),
            Err(SkipListError::InvalidArgument(_))
        ));
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_unsupported_operations() {
        let mut set = seeded(10);
        set.insert_all([1, 2, 3]);
        assert_eq!(
            set.retain_all([1]),
            Err(SkipListError::Unsupported("retain_all"))
        );
        assert_eq!(
            set.sub_set(&1, &3).err(),
            Some(SkipListError::Unsupported("sub_set"))
        );
        assert_eq!(
            set.head_set(&2).err(),
            Some(SkipListError::Unsupported("head_set"))
        );
        assert_eq!(
            set.tail_set(&2).err(),
            Some(SkipListError::Unsupported("tail_set"))
        );
        assert_eq!(set.len(), 3);
    }

    #[test]
    fn test_skip_list_set_end_to_end() {
        let mut set = seeded(11);
        let mut model = BTreeSet::new();
        let top = 1_000;
        for k in 0..top {
            if k % 2 == 0 {
                assert!(!set.contains(&k));
                assert!(set.insert(k));
                model.insert(k);
                assert!(set.contains(&k));
            }
        }
        for k in (1..top).rev() {
            if k % 2 == 1 {
                assert!(set.insert(k));
                model.insert(k);
            }
        }
        set.validate().unwrap();
        assert!(set.iter().eq(model.iter()));

        for k in (0..top).step_by(3) {
            assert_eq!(set.remove(&k), model.remove(&k));
        }
        set.validate().unwrap();
        assert!(set.iter().eq(model.iter()));
        assert_eq!(set.len(), model.len());

        for k in 0..top {
            assert_eq!(set.remove(&k), model.remove(&k));
            assert!(!set.contains(&k));
        }
        assert!(set.is_empty());
        set.validate().unwrap();
    }

    #[test]
    fn test_trait_surface() {
        let a = SkipListSet::from([3, 1, 2]);
        let b: SkipListSet<i32> = [2, 3, 1, 1].into_iter().collect();
        assert_eq!(a, b);
        assert_eq!(format!("{a:?}"), "{1, 2, 3}");

        let mut c = a.clone();
        c.validate().unwrap();
        c.extend([4]);
        assert_ne!(a, c);
        assert_eq!(a.len(), 3);

        let mut total = 0;
        for value in &c {
            total += value;
        }
        assert_eq!(total, 10);
    }
}
