//! Doubly linked sequence with borrow-checked cursors.
//!
//! Nodes live in an index arena owned by the sequence: a `Vec` of slots and a
//! free list of vacated indices. Links are slot indices, so no `unsafe` is
//! needed. Every push hands back a [`NodeId`] stamped with the slot's
//! generation; once that node is removed the handle goes stale and lookups
//! through it return `None` even after the slot is reused. [`Sequence::clear`]
//! releases the arena itself and moves the sequence to a new epoch, so
//! handles from before the clear stay stale too.
//!
//! Traversal state lives outside the sequence. Any number of [`Cursor`]s and
//! [`Iter`]s may read concurrently, while a [`CursorMut`] holds the sequence
//! exclusively and is the only way to remove nodes mid-traversal.

use alloc::vec::Vec;
use core::fmt;
use core::iter::FusedIterator;
use core::ops::Deref;

use crate::common::CollectionError;
use crate::hash::same_ref;

/// Stable handle to a node inside a [`Sequence`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct NodeId {
    index: usize,
    generation: u32,
}

#[derive(Clone)]
struct Node<T> {
    value: T,
    prev: Option<usize>,
    next: Option<usize>,
}

#[derive(Clone)]
struct Slot<T> {
    generation: u32,
    node: Option<Node<T>>,
}

/// Doubly linked list owning its nodes.
#[derive(Clone)]
pub struct Sequence<T> {
    slots: Vec<Slot<T>>,
    free: Vec<usize>,
    head: Option<usize>,
    tail: Option<usize>,
    len: usize,
    // generation given to fresh slots; raised past every issued handle on clear
    epoch: u32,
}

impl<T> Sequence<T> {
    /// Create an empty sequence.
    pub const fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            tail: None,
            len: 0,
            epoch: 0,
        }
    }

    /// Empty sequence with room for `capacity` nodes; the first `capacity`
    /// pushes do not allocate.
    pub fn try_with_capacity(capacity: usize) -> Result<Self, CollectionError> {
        let mut seq = Self::new();
        if seq.slots.try_reserve_exact(capacity).is_err() {
            log::error!("sequence: unable to allocate {} nodes", capacity);
            return Err(CollectionError::AllocationFailed {
                requested: capacity,
            });
        }
        Ok(seq)
    }

    /// Number of elements, O(1).
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    fn node(&self, index: usize) -> Option<&Node<T>> {
        self.slots.get(index)?.node.as_ref()
    }

    #[inline]
    fn node_mut(&mut self, index: usize) -> Option<&mut Node<T>> {
        self.slots.get_mut(index)?.node.as_mut()
    }

    #[inline]
    fn resolve(&self, id: NodeId) -> Option<usize> {
        let slot = self.slots.get(id.index)?;
        (slot.generation == id.generation && slot.node.is_some()).then_some(id.index)
    }

    fn alloc(&mut self, node: Node<T>) -> NodeId {
        match self.free.pop() {
            Some(index) => {
                let slot = &mut self.slots[index];
                slot.node = Some(node);
                NodeId {
                    index,
                    generation: slot.generation,
                }
            }
            None => {
                let generation = self.epoch;
                self.slots.push(Slot {
                    generation,
                    node: Some(node),
                });
                NodeId {
                    index: self.slots.len() - 1,
                    generation,
                }
            }
        }
    }

    /// Append `value` at the tail. O(1).
    pub fn push_back(&mut self, value: T) -> NodeId {
        let id = self.alloc(Node {
            value,
            prev: self.tail,
            next: None,
        });
        match self.tail.and_then(|tail| self.node_mut(tail)) {
            Some(old_tail) => old_tail.next = Some(id.index),
            None => self.head = Some(id.index),
        }
        self.tail = Some(id.index);
        self.len += 1;
        id
    }

    /// Prepend `value` at the head. O(1).
    pub fn push_front(&mut self, value: T) -> NodeId {
        let id = self.alloc(Node {
            value,
            prev: None,
            next: self.head,
        });
        match self.head.and_then(|head| self.node_mut(head)) {
            Some(old_head) => old_head.prev = Some(id.index),
            None => self.tail = Some(id.index),
        }
        self.head = Some(id.index);
        self.len += 1;
        id
    }

    /// Like [`push_back`](Self::push_back), but reports allocation failure
    /// instead of aborting. The sequence is unchanged on error.
    pub fn try_push_back(&mut self, value: T) -> Result<NodeId, CollectionError> {
        if self.free.is_empty() && self.slots.try_reserve(1).is_err() {
            let requested = self.slots.len() + 1;
            log::error!("sequence: unable to allocate node {}", requested);
            return Err(CollectionError::AllocationFailed { requested });
        }
        Ok(self.push_back(value))
    }

    /// Unlink the node at `index`, relinking its neighbours.
    fn unlink(&mut self, index: usize) -> Option<T> {
        let slot = self.slots.get_mut(index)?;
        let node = slot.node.take()?;
        slot.generation = slot.generation.wrapping_add(1);
        // a slot left off the free list is reclaimed by the next `clear`
        if self.free.try_reserve(1).is_ok() {
            self.free.push(index);
        }

        match node.prev.and_then(|prev| self.node_mut(prev)) {
            Some(prev) => prev.next = node.next,
            None => self.head = node.next,
        }
        match node.next.and_then(|next| self.node_mut(next)) {
            Some(next) => next.prev = node.prev,
            None => self.tail = node.prev,
        }
        self.len -= 1;
        Some(node.value)
    }

    /// Remove and return the head element.
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.head?;
        self.unlink(head)
    }

    /// Remove and return the tail element.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.tail?;
        self.unlink(tail)
    }

    pub fn front(&self) -> Option<&T> {
        self.node(self.head?).map(|n| &n.value)
    }

    pub fn back(&self) -> Option<&T> {
        self.node(self.tail?).map(|n| &n.value)
    }

    pub fn front_mut(&mut self) -> Option<&mut T> {
        let head = self.head?;
        self.node_mut(head).map(|n| &mut n.value)
    }

    pub fn back_mut(&mut self) -> Option<&mut T> {
        let tail = self.tail?;
        self.node_mut(tail).map(|n| &mut n.value)
    }

    /// Element behind `id`, or `None` if the handle is stale.
    pub fn get(&self, id: NodeId) -> Option<&T> {
        self.node(self.resolve(id)?).map(|n| &n.value)
    }

    pub fn get_mut(&mut self, id: NodeId) -> Option<&mut T> {
        let index = self.resolve(id)?;
        self.node_mut(index).map(|n| &mut n.value)
    }

    /// Returns `true` while the node behind `id` is still linked.
    pub fn contains(&self, id: NodeId) -> bool {
        self.resolve(id).is_some()
    }

    /// Unlink the node behind `id` and return its element.
    pub fn remove(&mut self, id: NodeId) -> Option<T> {
        let index = self.resolve(id)?;
        self.unlink(index)
    }

    fn position_ref(&self, value: &T) -> Option<usize>
    where
        T: Deref,
    {
        let mut cursor = self.head;
        while let Some(index) = cursor {
            let node = self.node(index)?;
            if same_ref(&node.value, value) {
                return Some(index);
            }
            cursor = node.next;
        }
        None
    }

    /// Remove the first element pointing at the same target as `value`.
    ///
    /// Comparison is by address of the dereferenced target, never by
    /// equality, so two distinct but equal payloads are told apart. Returns
    /// whether an element was removed. O(n).
    pub fn remove_ref(&mut self, value: &T) -> bool
    where
        T: Deref,
    {
        match self.position_ref(value) {
            Some(index) => self.unlink(index).is_some(),
            None => false,
        }
    }

    /// First element matching `pred`, mutably.
    pub fn find_mut<P>(&mut self, mut pred: P) -> Option<&mut T>
    where
        P: FnMut(&T) -> bool,
    {
        let mut cursor = self.head;
        let mut found = None;
        while let Some(index) = cursor {
            let node = self.node(index)?;
            if pred(&node.value) {
                found = Some(index);
                break;
            }
            cursor = node.next;
        }
        self.node_mut(found?).map(|n| &mut n.value)
    }

    /// Drop every element and release the node storage. Outstanding
    /// `NodeId`s become stale.
    pub fn clear(&mut self) {
        self.epoch = self
            .slots
            .iter()
            .map(|slot| slot.generation)
            .max()
            .map_or(self.epoch, |g| g.wrapping_add(1));
        self.slots = Vec::new();
        self.free = Vec::new();
        self.head = None;
        self.tail = None;
        self.len = 0;
    }

    #[cfg(test)]
    pub(crate) fn node_capacity(&self) -> usize {
        self.slots.capacity()
    }

    /// Iterator over shared references, head to tail.
    pub fn iter(&self) -> Iter<'_, T> {
        Iter {
            seq: self,
            front: self.head,
            back: self.tail,
            remaining: self.len,
        }
    }

    /// Read-only cursor that starts detached; call `seek_first` or
    /// `seek_last` to position it.
    pub fn cursor(&self) -> Cursor<'_, T> {
        Cursor {
            seq: self,
            current: None,
        }
    }

    pub fn cursor_front(&self) -> Cursor<'_, T> {
        Cursor {
            seq: self,
            current: self.head,
        }
    }

    pub fn cursor_back(&self) -> Cursor<'_, T> {
        Cursor {
            seq: self,
            current: self.tail,
        }
    }

    /// Exclusive cursor, detached until positioned.
    pub fn cursor_mut(&mut self) -> CursorMut<'_, T> {
        CursorMut {
            seq: self,
            current: None,
        }
    }

    pub fn cursor_front_mut(&mut self) -> CursorMut<'_, T> {
        let current = self.head;
        CursorMut { seq: self, current }
    }

    pub fn cursor_back_mut(&mut self) -> CursorMut<'_, T> {
        let current = self.tail;
        CursorMut { seq: self, current }
    }
}

impl<T> Default for Sequence<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for Sequence<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.iter()).finish()
    }
}

impl<T: PartialEq> PartialEq for Sequence<T> {
    fn eq(&self, other: &Self) -> bool {
        self.len == other.len && self.iter().eq(other.iter())
    }
}

impl<T: Eq> Eq for Sequence<T> {}

impl<T> FromIterator<T> for Sequence<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        let mut seq = Sequence::new();
        seq.extend(iter);
        seq
    }
}

impl<T> Extend<T> for Sequence<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push_back(value);
        }
    }
}

/// Borrowing iterator over a [`Sequence`].
pub struct Iter<'a, T> {
    seq: &'a Sequence<T>,
    front: Option<usize>,
    back: Option<usize>,
    remaining: usize,
}

impl<'a, T> Clone for Iter<'a, T> {
    fn clone(&self) -> Self {
        Iter {
            seq: self.seq,
            front: self.front,
            back: self.back,
            remaining: self.remaining,
        }
    }
}

impl<'a, T> Iterator for Iter<'a, T> {
    type Item = &'a T;

    #[inline]
    fn next(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.seq.node(self.front?)?;
        self.front = node.next;
        self.remaining -= 1;
        Some(&node.value)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.remaining, Some(self.remaining))
    }
}

impl<'a, T> DoubleEndedIterator for Iter<'a, T> {
    #[inline]
    fn next_back(&mut self) -> Option<Self::Item> {
        if self.remaining == 0 {
            return None;
        }
        let node = self.seq.node(self.back?)?;
        self.back = node.prev;
        self.remaining -= 1;
        Some(&node.value)
    }
}

impl<'a, T> ExactSizeIterator for Iter<'a, T> {}
impl<'a, T> FusedIterator for Iter<'a, T> {}

impl<'a, T> IntoIterator for &'a Sequence<T> {
    type Item = &'a T;
    type IntoIter = Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Owning iterator over a [`Sequence`].
pub struct IntoIter<T> {
    seq: Sequence<T>,
}

impl<T> Iterator for IntoIter<T> {
    type Item = T;

    fn next(&mut self) -> Option<T> {
        self.seq.pop_front()
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        (self.seq.len, Some(self.seq.len))
    }
}

impl<T> DoubleEndedIterator for IntoIter<T> {
    fn next_back(&mut self) -> Option<T> {
        self.seq.pop_back()
    }
}

impl<T> ExactSizeIterator for IntoIter<T> {}

impl<T> IntoIterator for Sequence<T> {
    type Item = T;
    type IntoIter = IntoIter<T>;

    fn into_iter(self) -> Self::IntoIter {
        IntoIter { seq: self }
    }
}

/// Read-only cursor over a [`Sequence`].
///
/// Stepping past either end leaves the cursor detached. A detached cursor
/// stays detached under `move_next`/`move_prev`; only `seek_first` or
/// `seek_last` re-attach it.
pub struct Cursor<'a, T> {
    seq: &'a Sequence<T>,
    current: Option<usize>,
}

impl<'a, T> Clone for Cursor<'a, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<'a, T> Copy for Cursor<'a, T> {}

impl<'a, T> Cursor<'a, T> {
    /// Element under the cursor.
    pub fn current(&self) -> Option<&'a T> {
        let seq = self.seq;
        seq.node(self.current?).map(|n| &n.value)
    }

    /// Handle of the node under the cursor.
    pub fn node_id(&self) -> Option<NodeId> {
        let index = self.current?;
        let generation = self.seq.slots.get(index)?.generation;
        Some(NodeId { index, generation })
    }

    pub fn seek_first(&mut self) -> Option<&'a T> {
        self.current = self.seq.head;
        self.current()
    }

    pub fn seek_last(&mut self) -> Option<&'a T> {
        self.current = self.seq.tail;
        self.current()
    }

    pub fn move_next(&mut self) -> Option<&'a T> {
        let seq = self.seq;
        self.current = self.current.and_then(|i| seq.node(i)).and_then(|n| n.next);
        self.current()
    }

    pub fn move_prev(&mut self) -> Option<&'a T> {
        let seq = self.seq;
        self.current = self.current.and_then(|i| seq.node(i)).and_then(|n| n.prev);
        self.current()
    }
}

/// Exclusive cursor over a [`Sequence`], able to remove nodes while
/// traversing.
///
/// Same boundary rules as [`Cursor`]. Every removal keeps the cursor on a
/// linked node or detached; it never points at a freed slot.
pub struct CursorMut<'a, T> {
    seq: &'a mut Sequence<T>,
    current: Option<usize>,
}

impl<'a, T> CursorMut<'a, T> {
    pub fn current(&self) -> Option<&T> {
        self.seq.node(self.current?).map(|n| &n.value)
    }

    pub fn current_mut(&mut self) -> Option<&mut T> {
        let index = self.current?;
        self.seq.node_mut(index).map(|n| &mut n.value)
    }

    pub fn node_id(&self) -> Option<NodeId> {
        let index = self.current?;
        let generation = self.seq.slots.get(index)?.generation;
        Some(NodeId { index, generation })
    }

    /// Position on the head and return it; detaches on an empty sequence.
    pub fn seek_first(&mut self) -> Option<&T> {
        self.current = self.seq.head;
        self.current()
    }

    /// Position on the tail and return it; detaches on an empty sequence.
    pub fn seek_last(&mut self) -> Option<&T> {
        self.current = self.seq.tail;
        self.current()
    }

    pub fn move_next(&mut self) -> Option<&T> {
        self.current = self
            .current
            .and_then(|i| self.seq.node(i))
            .and_then(|n| n.next);
        self.current()
    }

    pub fn move_prev(&mut self) -> Option<&T> {
        self.current = self
            .current
            .and_then(|i| self.seq.node(i))
            .and_then(|n| n.prev);
        self.current()
    }

    /// Remove the element under the cursor and move on to its successor.
    /// Returns `None` when detached.
    pub fn pop_current(&mut self) -> Option<T> {
        let index = self.current?;
        let next = self.seq.node(index)?.next;
        let value = self.seq.unlink(index)?;
        self.current = next;
        Some(value)
    }

    /// Remove the head; a cursor standing on it moves to the new head.
    pub fn pop_front(&mut self) -> Option<T> {
        let head = self.seq.head?;
        let value = self.seq.unlink(head)?;
        if self.current == Some(head) {
            self.current = self.seq.head;
        }
        Some(value)
    }

    /// Remove the tail; a cursor standing on it moves to the new tail.
    pub fn pop_back(&mut self) -> Option<T> {
        let tail = self.seq.tail?;
        let value = self.seq.unlink(tail)?;
        if self.current == Some(tail) {
            self.current = self.seq.tail;
        }
        Some(value)
    }

    /// Identity removal as in [`Sequence::remove_ref`]. When the cursor
    /// stands on the removed node it advances to the successor.
    pub fn remove_ref(&mut self, value: &T) -> bool
    where
        T: Deref,
    {
        let Some(index) = self.seq.position_ref(value) else {
            return false;
        };
        let next = self.seq.node(index).and_then(|n| n.next);
        if self.seq.unlink(index).is_none() {
            return false;
        }
        if self.current == Some(index) {
            self.current = next;
        }
        true
    }

    pub fn as_sequence(&self) -> &Sequence<T> {
        self.seq
    }
}
