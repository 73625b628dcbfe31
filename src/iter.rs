use std::iter::FusedIterator;

use crate::error::{Result, SkipListError};
use crate::graph::{NodeGraph, NodeId};

/// Cursor over the elements of a [`SkipListSet`](crate::SkipListSet) in
/// ascending order.
///
/// Created by [`SkipListSet::iter`](crate::SkipListSet::iter). It walks the
/// bottom level from just after the head sentinel to the tail sentinel and
/// cannot be rewound; call `iter` again for a fresh pass.
pub struct Iter<'a, T> {
    graph: &'a NodeGraph<T>,
    current: NodeId,
    remaining: usize,
}

impl<'a, T> Iter<'a, T> {
    pub(crate) fn new(graph: &'a NodeGraph<T>, len: usize) -> Iter<'a, T> {
        Iter {
            graph,
            current: graph.bottom_head(),
            remaining: len,
        }
    }

    fn upcoming(&self) -> Option<(NodeId, &'a T)> {
        let next = self.graph.next(self.current)?;
        self.graph.value(next).map(|value| (next, value))
    }

    /// Whether another element follows.
    pub fn has_next(&self) -> bool {
        self.upcoming().is_some()
    }

    /// The element the next `advance` would return, without moving.
    pub fn peek(&self) -> Option<&'a T> {
        self.upcoming().map(|(_, value)| value)
    }

    /// Move to the next element and return it.
    ///
    /// # Returns
    ///
    /// The element, or `NoSuchElement` once the cursor has passed the last
    /// one.
    pub fn advance(&mut self) -> Result<&'a T> {
        let (next, value) = self.upcoming().ok_or(SkipListError::NoSuchElement)?;
        self.current = next;
        self.remaining -= 1;
        Ok(value)
    }

    /// Removing through the cursor is not supported; use
    /// [`SkipListSet::remove`](crate::SkipListSet::remove).
    pub fn remove(&mut self) -> Result<()> {
        Err(SkipListError::Unsupported("Iter::remove"))
    }
}

impl<T> Clone for Iter<'_, T> {
    fn clone(&self) -> Self {
        Iter {
            graph: self.graph,
            current: self.current,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    fn next(&mut self) -> Option<&'a T> {
        self.advance().ok()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<T> ExactSizeIterator for Iter<'_, T> {}

impl<T> FusedIterator for Iter<'_, T> {}

/// Owning iterator over the elements of a
/// [`SkipListSet`](crate::SkipListSet) in ascending order.
#[derive(Debug)]
pub struct IntoIter<T> {
    values: std::vec::IntoIter<T>,
}

impl<T> IntoIter<T> {
    pub(crate) fn new(values: Vec<T>) -> IntoIter<T> {
        IntoIter {
            values: values.into_iter(),
        }
    }
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.values.next()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.values.size_hint()
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.values.next_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> FusedIterator for IntoIter<T> {}
