//! The multi-level node graph underneath a [`SkipListSet`](crate::SkipListSet).
//!
//! ```text
//! Level 3:  HEAD ─────────────────────────► 50 ─────────────────► TAIL
//!             │                              │                      │
//! Level 2:  HEAD ────────► 20 ──────────────► 50 ─────────────────► TAIL
//!             │             │                │                      │
//! Level 1:  HEAD ──► 10 ──► 20 ──► 30 ──────► 50 ──► 60 ──────────► TAIL
//! ```
//!
//! Nodes live in a slab and refer to each other by [`NodeId`]. Every level
//! is a doubly linked row bounded by a head and a tail sentinel, and the
//! nodes holding the same element are stacked with `above`/`below` links.
//! Only the level 1 node of a tower owns the element; the nodes above it
//! point back at that base node.

use std::cmp::Ordering;

use slab::Slab;

use crate::error::{Result, SkipListError};

/// Stable index of a node in the graph's slab.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) struct NodeId(usize);

#[derive(Debug, Clone)]
pub(crate) enum Payload<T> {
    /// Head or tail of a level.
    Sentinel,
    /// Level 1 node of a tower, owning the element.
    Value(T),
    /// Upper node of a tower, pointing at its level 1 node.
    Tower(NodeId),
}

#[derive(Debug, Clone)]
struct Node<T> {
    payload: Payload<T>,
    level: usize,
    next: Option<NodeId>,
    previous: Option<NodeId>,
    above: Option<NodeId>,
    below: Option<NodeId>,
}

impl<T> Node<T> {
    fn new(payload: Payload<T>, level: usize) -> Node<T> {
        Node {
            payload,
            level,
            next: None,
            previous: None,
            above: None,
            below: None,
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct NodeGraph<T> {
    nodes: Slab<Node<T>>,
    head: NodeId,
    tail: NodeId,
    bottom_head: NodeId,
    bottom_tail: NodeId,
    height: usize,
}

impl<T> NodeGraph<T> {
    /// A single level holding nothing but its two sentinels.
    pub(crate) fn new() -> NodeGraph<T> {
        let mut nodes = Slab::with_capacity(2);
        let head = NodeId(nodes.insert(Node::new(Payload::Sentinel, 1)));
        let tail = NodeId(nodes.insert(Node::new(Payload::Sentinel, 1)));
        let mut graph = NodeGraph {
            nodes,
            head,
            tail,
            bottom_head: head,
            bottom_tail: tail,
            height: 1,
        };
        graph.node_mut(head).next = Some(tail);
        graph.node_mut(tail).previous = Some(head);
        graph
    }

    fn node(&self, id: NodeId) -> &Node<T> {
        &self.nodes[id.0]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node<T> {
        &mut self.nodes[id.0]
    }

    /// Head sentinel of the top level.
    pub(crate) fn head(&self) -> NodeId {
        self.head
    }

    pub(crate) fn bottom_head(&self) -> NodeId {
        self.bottom_head
    }

    pub(crate) fn bottom_tail(&self) -> NodeId {
        self.bottom_tail
    }

    pub(crate) fn height(&self) -> usize {
        self.height
    }

    pub(crate) fn next(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).next
    }

    pub(crate) fn previous(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).previous
    }

    pub(crate) fn below(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).below
    }

    /// The element a node stands for, `None` for sentinels.
    pub(crate) fn value(&self, id: NodeId) -> Option<&T> {
        match &self.node(id).payload {
            Payload::Sentinel => None,
            Payload::Value(value) => Some(value),
            Payload::Tower(base) => match &self.node(*base).payload {
                Payload::Value(value) => Some(value),
                _ => None,
            },
        }
    }

    /// Put a new, empty level on top of the graph.
    pub(crate) fn grow(&mut self) {
        let level = self.height + 1;
        let (old_head, old_tail) = (self.head, self.tail);

        let mut head = Node::new(Payload::Sentinel, level);
        head.below = Some(old_head);
        let head = NodeId(self.nodes.insert(head));
        let mut tail = Node::new(Payload::Sentinel, level);
        tail.below = Some(old_tail);
        tail.previous = Some(head);
        let tail = NodeId(self.nodes.insert(tail));

        self.node_mut(head).next = Some(tail);
        self.node_mut(old_head).above = Some(head);
        self.node_mut(old_tail).above = Some(tail);
        self.head = head;
        self.tail = tail;
        self.height = level;
        log::trace!("skip list grew to {level} levels");
    }

    /// Splice a new node into the level of `predecessor`, directly to its
    /// right, optionally stacking it on top of `below`.
    ///
    /// On return `predecessor`, the new node and the old successor are all
    /// linked both ways, and `below` points up at the new node.
    pub(crate) fn splice_after(
        &mut self,
        predecessor: NodeId,
        payload: Payload<T>,
        below: Option<NodeId>,
    ) -> NodeId {
        let successor = self.node(predecessor).next;
        let mut node = Node::new(payload, self.node(predecessor).level);
        node.previous = Some(predecessor);
        node.next = successor;
        node.below = below;
        let id = NodeId(self.nodes.insert(node));

        self.node_mut(predecessor).next = Some(id);
        if let Some(successor) = successor {
            self.node_mut(successor).previous = Some(id);
        }
        if let Some(below) = below {
            self.node_mut(below).above = Some(id);
        }
        id
    }

    /// Splice `id` out of its level and free it, handing back its payload.
    ///
    /// On return the old neighbours are linked to each other both ways and
    /// no vertical link refers to `id`. Towers are taken apart top down, so
    /// the node above has already been unlinked by then.
    pub(crate) fn unlink(&mut self, id: NodeId) -> Payload<T> {
        let node = self.nodes.remove(id.0);
        if let Some(previous) = node.previous {
            self.node_mut(previous).next = node.next;
        }
        if let Some(next) = node.next {
            self.node_mut(next).previous = node.previous;
        }
        if let Some(below) = node.below {
            self.node_mut(below).above = None;
        }
        debug_assert!(node.above.is_none());
        node.payload
    }

    /// Find the insertion predecessor one level up from a node on this
    /// level: walk left until a node with an `above` link and step up.
    pub(crate) fn ascend(&self, id: NodeId) -> Option<NodeId> {
        let mut current = Some(id);
        while let Some(node) = current {
            if let Some(above) = self.node(node).above {
                return Some(above);
            }
            current = self.node(node).previous;
        }
        None
    }

    /// Take the graph apart, returning its elements in ascending order.
    pub(crate) fn into_values(mut self) -> Vec<T> {
        let mut bases = Vec::new();
        let mut current = self.node(self.bottom_head).next;
        while let Some(id) = current {
            if matches!(self.node(id).payload, Payload::Value(_)) {
                bases.push(id);
            }
            current = self.node(id).next;
        }

        let mut values = Vec::with_capacity(bases.len());
        for id in bases {
            if let Payload::Value(value) = self.nodes.remove(id.0).payload {
                values.push(value);
            }
        }
        values
    }
}

impl<T: Ord> NodeGraph<T> {
    /// Walk every level top down and check the structural invariants.
    ///
    /// Returns the number of elements on the bottom level.
    pub(crate) fn validate(&self) -> Result<usize> {
        let corrupt = |level: usize, reason: &'static str| SkipListError::Corrupt { level, reason };

        let mut level = self.height;
        let mut level_head = Some(self.head);
        let mut upper: Option<(NodeId, NodeId)> = None;
        let mut bottom_count = 0;

        while let Some(head) = level_head {
            if level == 0 {
                return Err(corrupt(0, "more levels than the recorded height"));
            }
            let head_node = self.node(head);
            if !matches!(head_node.payload, Payload::Sentinel) {
                return Err(corrupt(level, "level does not start with a sentinel"));
            }
            if head_node.level != level || head_node.previous.is_some() {
                return Err(corrupt(level, "misplaced head sentinel"));
            }

            let mut previous_value: Option<&T> = None;
            let mut count = 0;
            let mut current = head;
            let tail = loop {
                let next = self
                    .node(current)
                    .next
                    .ok_or_else(|| corrupt(level, "level does not end with a sentinel"))?;
                let node = self.node(next);
                if node.previous != Some(current) {
                    return Err(corrupt(level, "horizontal links disagree"));
                }
                if node.level != level {
                    return Err(corrupt(level, "node carries the wrong level"));
                }
                if matches!(node.payload, Payload::Sentinel) {
                    if node.next.is_some() {
                        return Err(corrupt(level, "tail sentinel has a right neighbour"));
                    }
                    break next;
                }

                let value = self
                    .value(next)
                    .ok_or_else(|| corrupt(level, "tower has no base value"))?;
                if let Some(previous) = previous_value {
                    if previous.cmp(value) != Ordering::Less {
                        return Err(corrupt(level, "values out of order"));
                    }
                }
                match (level, &node.payload, node.below) {
                    (1, Payload::Value(_), None) => {}
                    (1, _, _) => return Err(corrupt(level, "bottom node does not own its value")),
                    (_, Payload::Tower(_), Some(below)) => {
                        if self.node(below).above != Some(next) {
                            return Err(corrupt(level, "vertical links disagree"));
                        }
                        if self.value(below).map(|b| b.cmp(value)) != Some(Ordering::Equal) {
                            return Err(corrupt(level, "tower changes value"));
                        }
                    }
                    _ => return Err(corrupt(level, "upper node is not stacked on its tower")),
                }
                if let Some(above) = node.above {
                    if self.node(above).below != Some(next) {
                        return Err(corrupt(level, "vertical links disagree"));
                    }
                }

                previous_value = Some(value);
                count += 1;
                current = next;
            };

            match upper {
                None => {
                    if head != self.head || tail != self.tail || head_node.above.is_some() {
                        return Err(corrupt(level, "top sentinels are not recorded"));
                    }
                }
                Some((upper_head, upper_tail)) => {
                    if head_node.above != Some(upper_head)
                        || self.node(tail).above != Some(upper_tail)
                        || self.node(upper_tail).below != Some(tail)
                    {
                        return Err(corrupt(level, "sentinels are not stacked"));
                    }
                }
            }

            if level == 1 {
                if head != self.bottom_head || tail != self.bottom_tail {
                    return Err(corrupt(level, "bottom sentinels are not recorded"));
                }
                bottom_count = count;
            }
            upper = Some((head, tail));
            level_head = head_node.below;
            level -= 1;
        }

        if level != 0 {
            return Err(corrupt(level, "fewer levels than the recorded height"));
        }
        Ok(bottom_count)
    }
}
