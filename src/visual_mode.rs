//! A history of view modes with push, replace and back.
//!
//! The stack can never be empty: the current mode is held apart from the
//! modes beneath it, so `back` has nothing to pop once only the current mode
//! is left. Which transitions are legal is up to the caller.

/// Mode history for one view. `M` is usually a small `Copy` enum.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VisualMode<M> {
    current: M,
    previous: Vec<M>,
}

impl<M> VisualMode<M> {
    pub fn new(initial: M) -> Self {
        Self {
            current: initial,
            previous: Vec::new(),
        }
    }

    /// The mode on top of the history
    pub fn current(&self) -> &M {
        &self.current
    }

    /// Moves to `mode`. With `replace` the current entry is overwritten and the
    /// history keeps its length; otherwise `mode` is pushed on top.
    pub fn transition(&mut self, mode: M, replace: bool) {
        let left = std::mem::replace(&mut self.current, mode);
        if !replace {
            self.previous.push(left);
        }
    }

    /// Returns to the previous mode. A no-op (returning `false`) when only one
    /// entry remains.
    pub fn back(&mut self) -> bool {
        match self.previous.pop() {
            Some(mode) => {
                self.current = mode;
                true
            }
            None => false,
        }
    }

    /// Drops all history and starts over from `mode`
    pub fn reset(&mut self, mode: M) {
        self.previous.clear();
        self.current = mode;
    }

    /// Number of entries, always at least one
    pub fn len(&self) -> usize {
        self.previous.len() + 1
    }

    /// Oldest entry first, current mode last
    pub fn history(&self) -> impl Iterator<Item = &M> + '_ {
        self.previous.iter().chain(std::iter::once(&self.current))
    }
}
