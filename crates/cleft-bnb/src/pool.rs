// Copyright (c) 2025 Felix Kahle.
//
// Permission is hereby granted, free of charge, to any person obtaining
// a copy of this software and associated documentation files (the
// "Software"), to deal in the Software without restriction, including
// without limitation the rights to use, copy, modify, merge, publish,
// distribute, sublicense, and/or sell copies of the Software, and to
// permit persons to whom the Software is furnished to do so, subject to
// the following conditions:
//
// The above copyright notice and this permission notice shall be
// included in all copies or substantial portions of the Software.
//
// THE SOFTWARE IS PROVIDED "AS IS", WITHOUT WARRANTY OF ANY KIND,
// EXPRESS OR IMPLIED, INCLUDING BUT NOT LIMITED TO THE WARRANTIES OF
// MERCHANTABILITY, FITNESS FOR A PARTICULAR PURPOSE AND
// NONINFRINGEMENT. IN NO EVENT SHALL THE AUTHORS OR COPYRIGHT HOLDERS BE
// LIABLE FOR ANY CLAIM, DAMAGES OR OTHER LIABILITY, WHETHER IN AN ACTION
// OF CONTRACT, TORT OR OTHERWISE, ARISING FROM, OUT OF OR IN CONNECTION
// WITH THE SOFTWARE OR THE USE OR OTHER DEALINGS IN THE SOFTWARE.

//! Active node pool
//!
//! `ActivePool` holds every sub-problem that has been inspected but not yet
//! branched on. The search needs three very different access patterns on the
//! same collection:
//!
//! - depth-first selection pops the most recently queued node,
//! - best-first selection removes the node with the best bound from anywhere,
//! - stripping drops every node a new incumbent has made useless.
//!
//! The pool is a singly linked list threaded through a slot arena. Pushing and
//! popping at the front are O(1), removal after a linear scan is O(1) because
//! the scan tracks the predecessor, and freed slots are recycled through a free
//! list so a long search does not keep growing the arena.

/// A single arena slot. `entry` is `None` while the slot sits on the free list.
#[derive(Clone, Debug)]
struct Slot<E> {
    entry: Option<E>,
    next: Option<usize>,
}

/// LIFO list of active entries with arbitrary removal.
#[derive(Clone, Debug)]
pub struct ActivePool<E> {
    /// Arena of list cells.
    slots: Vec<Slot<E>>,
    /// Indices of vacant slots in `slots`.
    free: Vec<usize>,
    /// Most recently pushed entry.
    head: Option<usize>,
    len: usize,
    /// Largest `len` observed since the last `clear`.
    max_len: usize,
}

impl<E> Default for ActivePool<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> ActivePool<E> {
    /// Creates a new, empty `ActivePool`.
    #[inline]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            free: Vec::new(),
            head: None,
            len: 0,
            max_len: 0,
        }
    }

    /// Returns the number of entries in the pool.
    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the pool holds no entries.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Returns the largest number of simultaneous entries since the last `clear`.
    #[inline]
    pub fn max_len(&self) -> usize {
        self.max_len
    }

    /// Pushes an entry to the front of the list.
    #[inline]
    pub fn push_front(&mut self, entry: E) {
        let cell = Slot {
            entry: Some(entry),
            next: self.head,
        };
        let index = match self.free.pop() {
            Some(index) => {
                self.slots[index] = cell;
                index
            }
            None => {
                self.slots.push(cell);
                self.slots.len() - 1
            }
        };

        self.head = Some(index);
        self.len += 1;
        self.max_len = self.max_len.max(self.len);
    }

    /// Removes and returns the most recently pushed entry.
    #[inline]
    pub fn pop_front(&mut self) -> Option<E> {
        let head = self.head?;
        self.unlink(None, head)
    }

    /// Returns a reference to the most recently pushed entry.
    #[cfg(test)]
    #[inline]
    pub fn front(&self) -> Option<&E> {
        self.head.and_then(|index| self.slots[index].entry.as_ref())
    }

    /// Returns the smallest key over all entries, or `None` if the pool is empty.
    pub fn min_key_by<K, F>(&self, mut key: F) -> Option<K>
    where
        K: PartialOrd,
        F: FnMut(&E) -> K,
    {
        let mut best: Option<K> = None;
        for entry in self.iter() {
            let candidate = key(entry);
            match &best {
                Some(current) if !(candidate < *current) => {}
                _ => best = Some(candidate),
            }
        }
        best
    }

    /// Removes and returns the entry with the smallest key.
    ///
    /// Ties go to the entry closest to the front, so among equally good
    /// entries the most recently queued one wins.
    pub fn take_best_by<K, F>(&mut self, mut key: F) -> Option<E>
    where
        K: PartialOrd,
        F: FnMut(&E) -> K,
    {
        // (predecessor, index, key) of the best entry seen so far
        let mut best: Option<(Option<usize>, usize, K)> = None;
        let mut previous = None;
        let mut cursor = self.head;

        while let Some(index) = cursor {
            let slot = &self.slots[index];
            if let Some(entry) = slot.entry.as_ref() {
                let candidate = key(entry);
                let better = match &best {
                    Some((_, _, current)) => candidate < *current,
                    None => true,
                };
                if better {
                    best = Some((previous, index, candidate));
                }
            }
            previous = Some(index);
            cursor = slot.next;
        }

        let (predecessor, index, _) = best?;
        self.unlink(predecessor, index)
    }

    /// Removes every entry for which `keep` returns `false`.
    ///
    /// Returns the number of removed entries. Removed entries are dropped
    /// immediately.
    pub fn retain<F>(&mut self, mut keep: F) -> usize
    where
        F: FnMut(&E) -> bool,
    {
        let mut removed = 0;
        let mut previous = None;
        let mut cursor = self.head;

        while let Some(index) = cursor {
            let next = self.slots[index].next;
            let keep_entry = self.slots[index].entry.as_ref().is_some_and(&mut keep);
            if keep_entry {
                previous = Some(index);
            } else {
                drop(self.unlink(previous, index));
                removed += 1;
            }
            cursor = next;
        }

        removed
    }

    /// Drops every entry and resets the high-water mark, keeping the arena
    /// allocation for the next search.
    #[inline]
    pub fn clear(&mut self) {
        self.slots.clear();
        self.free.clear();
        self.head = None;
        self.len = 0;
        self.max_len = 0;
    }

    /// Returns an iterator over the entries from front to back.
    #[inline]
    pub fn iter(&self) -> Iter<'_, E> {
        Iter {
            pool: self,
            cursor: self.head,
        }
    }

    /// Detaches the slot at `index` whose predecessor in the list is
    /// `predecessor` and returns its entry.
    #[inline(always)]
    fn unlink(&mut self, predecessor: Option<usize>, index: usize) -> Option<E> {
        let next = self.slots[index].next.take();
        match predecessor {
            Some(previous) => self.slots[previous].next = next,
            None => self.head = next,
        }

        let entry = self.slots[index].entry.take();
        self.free.push(index);
        self.len -= 1;

        debug_assert!(entry.is_some(), "linked slot {} held no entry", index);
        entry
    }
}

/// Iterator over the entries of an `ActivePool`, front to back.
#[derive(Clone, Debug)]
pub struct Iter<'a, E> {
    pool: &'a ActivePool<E>,
    cursor: Option<usize>,
}

impl<'a, E> Iterator for Iter<'a, E> {
    type Item = &'a E;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let index = self.cursor?;
            let slot = &self.pool.slots[index];
            self.cursor = slot.next;
            if let Some(entry) = slot.entry.as_ref() {
                return Some(entry);
            }
        }
    }
}

impl<'a, E> IntoIterator for &'a ActivePool<E> {
    type Item = &'a E;
    type IntoIter = Iter<'a, E>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
