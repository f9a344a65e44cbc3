//! Ordered, index-addressable sequence.
//!
//! Holds the pending queue of every processor and the per-tick rankings
//! built by the dispatching strategies. Insertion at an interior index
//! shifts the tail right; removal shifts it left. Relative order of
//! untouched elements is always preserved.

/// An ordered sequence with explicit insertion positions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderedList<T> {
    items: Vec<T>,
}

impl<T> OrderedList<T> {
    /// Creates an empty list.
    pub fn new() -> Self {
        Self { items: Vec::new() }
    }

    /// Creates an empty list with room for `capacity` items.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
        }
    }

    /// Returns the item at `index`, if any.
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Number of items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether the list is empty.
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Inserts `item` at `index`.
    ///
    /// An index at or past the end appends. Callers only ever compute a
    /// valid interior index or one past the end, so no gap is ever filled.
    pub fn insert_at(&mut self, index: usize, item: T) {
        if index >= self.items.len() {
            self.items.push(item);
        } else {
            self.items.insert(index, item);
        }
    }

    /// Appends `item`.
    pub fn push(&mut self, item: T) {
        self.items.push(item);
    }

    /// Removes and returns the item at `index`.
    pub fn remove_at(&mut self, index: usize) -> Option<T> {
        if index < self.items.len() {
            Some(self.items.remove(index))
        } else {
            None
        }
    }

    /// Removes and returns the head of the list.
    pub fn pop_front(&mut self) -> Option<T> {
        self.remove_at(0)
    }

    /// Replaces the item at `index`, returning the previous one.
    ///
    /// Returns `None` and leaves the list untouched when `index` is out of range.
    pub fn set_at(&mut self, index: usize, item: T) -> Option<T> {
        self.items
            .get_mut(index)
            .map(|slot| std::mem::replace(slot, item))
    }

    /// Position of the first item for which `before` holds, or `len()`.
    ///
    /// This is the insertion point of a linear insertion scan: `before(existing)`
    /// answers "does the new item go in front of `existing`?".
    pub fn insertion_point<F>(&self, mut before: F) -> usize
    where
        F: FnMut(&T) -> bool,
    {
        self.items
            .iter()
            .position(|existing| before(existing))
            .unwrap_or(self.items.len())
    }

    /// Iterates in order.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Views the items as a slice.
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }
}

impl<T: PartialEq> OrderedList<T> {
    /// Index of the first item equal to `item`.
    pub fn find_first(&self, item: &T) -> Option<usize> {
        self.items.iter().position(|existing| existing == item)
    }
}

impl<T> Default for OrderedList<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> FromIterator<T> for OrderedList<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self {
            items: iter.into_iter().collect(),
        }
    }
}

impl<'a, T> IntoIterator for &'a OrderedList<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.iter()
    }
}
