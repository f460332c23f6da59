//! Explicit LIFO stack with balance checking.
//!
//! Every per-window and per-list stack (IDs, clip rects, textures, item
//! widths, groups) goes through [`Stack`] rather than a bare `Vec`, so that
//! popping an empty stack or leaving a scope unbalanced is caught at the
//! point of misuse.

/// A growable LIFO stack.
#[derive(Debug, Clone, PartialEq)]
pub struct Stack<T> {
    items: Vec<T>,
    name: &'static str,
}

impl<T> Stack<T> {
    /// Creates an empty stack. `name` appears in assertion messages.
    #[must_use]
    pub const fn new(name: &'static str) -> Self {
        Self {
            items: Vec::new(),
            name,
        }
    }

    /// Creates an empty stack with preallocated room.
    #[must_use]
    pub fn with_capacity(name: &'static str, capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            name,
        }
    }

    /// Pushes a value.
    #[inline]
    pub fn push(&mut self, value: T) {
        self.items.push(value);
    }

    /// Pops the top value.
    ///
    /// # Panics
    ///
    /// Panics if the stack is empty.
    #[inline]
    pub fn pop(&mut self) -> T {
        match self.items.pop() {
            Some(v) => v,
            None => panic!("{} stack underflow: pop without matching push", self.name),
        }
    }

    /// Returns the top value, if any.
    #[inline]
    #[must_use]
    pub fn top(&self) -> Option<&T> {
        self.items.last()
    }

    /// Mutable access to the top value, if any.
    #[inline]
    pub fn top_mut(&mut self) -> Option<&mut T> {
        self.items.last_mut()
    }

    /// Number of values.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if the stack holds nothing.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Removes every value.
    #[inline]
    pub fn clear(&mut self) {
        self.items.clear();
    }

    /// Removes values above depth `len`.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.items.truncate(len);
    }

    /// Current depth, to be checked later with [`Stack::assert_at`].
    #[inline]
    #[must_use]
    pub fn mark(&self) -> usize {
        self.items.len()
    }

    /// Asserts that the stack is back at a depth previously returned by
    /// [`Stack::mark`].
    ///
    /// # Panics
    ///
    /// Panics if pushes and pops since the mark did not balance.
    #[track_caller]
    pub fn assert_at(&self, mark: usize) {
        assert!(
            self.items.len() == mark,
            "{} stack unbalanced: depth {} but expected {} (missing pop or extra push)",
            self.name,
            self.items.len(),
            mark
        );
    }

    /// Bottom-to-top slice view.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.items
    }

    /// Bottom-to-top iterator.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.items.iter()
    }

    /// Element at depth `index` (0 = bottom).
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.items.get(index)
    }

    /// Mutable element at depth `index` (0 = bottom).
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut T> {
        self.items.get_mut(index)
    }
}

impl<T: Copy> Stack<T> {
    /// Returns a copy of the top value, or `fallback` if empty.
    #[inline]
    #[must_use]
    pub fn top_or(&self, fallback: T) -> T {
        self.items.last().copied().unwrap_or(fallback)
    }
}

impl<T> Default for Stack<T> {
    fn default() -> Self {
        Self::new("anonymous")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_pop_top() {
        let mut s = Stack::new("test");
        s.push(1);
        s.push(2);

        assert_eq!(s.top(), Some(&2));
        assert_eq!(s.pop(), 2);
        assert_eq!(s.top_or(9), 1);
        assert_eq!(s.pop(), 1);
        assert_eq!(s.top_or(9), 9);
    }

    #[test]
    #[should_panic(expected = "clip stack underflow")]
    fn test_pop_empty_panics() {
        let mut s: Stack<u32> = Stack::new("clip");
        s.pop();
    }

    #[test]
    fn test_mark_balanced() {
        let mut s = Stack::new("id");
        s.push(7);
        let mark = s.mark();
        s.push(8);
        s.pop();
        s.assert_at(mark);
    }

    #[test]
    #[should_panic(expected = "id stack unbalanced")]
    fn test_mark_unbalanced_panics() {
        let mut s = Stack::new("id");
        let mark = s.mark();
        s.push(8);
        s.assert_at(mark);
    }
}
