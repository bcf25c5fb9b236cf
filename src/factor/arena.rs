//! Handle-indexed store of mutable Gaussian beliefs
//!
//! One arena holds variable marginals and another holds per-factor outgoing
//! messages. Both live for exactly one inference call; slots are never freed
//! individually.

use crate::gaussian::Gaussian;
use std::fmt;

/// Dense, monotonically assigned index into a [`DistributionArena`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Handle(usize);

impl Handle {
    pub fn index(self) -> usize {
        self.0
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Growable arena of Gaussians initialised from a configured prior.
#[derive(Debug, Clone)]
pub struct DistributionArena {
    prior: Gaussian,
    slots: Vec<Gaussian>,
}

impl DistributionArena {
    pub fn new(prior: Gaussian) -> Self {
        Self {
            prior,
            slots: Vec::new(),
        }
    }

    /// Append a slot holding the prior and return its handle.
    pub fn next_index(&mut self) -> Handle {
        self.slots.push(self.prior);
        Handle(self.slots.len() - 1)
    }

    fn slot(&self, handle: Handle) -> usize {
        assert!(
            handle.0 < self.slots.len(),
            "handle {handle} out of range for arena with {} slots",
            self.slots.len()
        );
        handle.0
    }

    /// # Panics
    /// On a handle this arena never issued.
    pub fn get(&self, handle: Handle) -> Gaussian {
        self.slots[self.slot(handle)]
    }

    /// # Panics
    /// On a handle this arena never issued.
    pub fn put(&mut self, handle: Handle, value: Gaussian) {
        let slot = self.slot(handle);
        self.slots[slot] = value;
    }

    pub fn put_prior_at(&mut self, handle: Handle) {
        let prior = self.prior;
        self.put(handle, prior);
    }

    /// Discard every slot. Previously issued handles become invalid.
    pub fn reset(&mut self) {
        self.slots.clear();
    }

    pub fn prior(&self) -> Gaussian {
        self.prior
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }
}

impl Default for DistributionArena {
    fn default() -> Self {
        Self::new(Gaussian::UNIFORM)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_index_is_dense() {
        let mut arena = DistributionArena::default();
        assert!(arena.is_empty());

        let first = arena.next_index();
        let second = arena.next_index();
        assert_eq!(first.index(), 0);
        assert_eq!(second.index(), 1);
        assert_eq!(arena.len(), 2);
        assert_eq!(arena.get(second), Gaussian::UNIFORM);
    }

    #[test]
    fn test_put_and_reset_slot_to_prior() {
        let prior = Gaussian::from_mean_and_variance(1.0, 2.0);
        let mut arena = DistributionArena::new(prior);
        let handle = arena.next_index();
        assert_eq!(arena.get(handle), prior);

        let updated = Gaussian::from_precision(3.0, 4.0);
        arena.put(handle, updated);
        assert_eq!(arena.get(handle), updated);

        arena.put_prior_at(handle);
        assert_eq!(arena.get(handle), prior);
    }

    #[test]
    fn test_reset_discards_all_slots() {
        let mut arena = DistributionArena::default();
        arena.next_index();
        arena.next_index();
        arena.reset();
        assert!(arena.is_empty());
        assert_eq!(arena.next_index().index(), 0);
    }

    #[test]
    #[should_panic(expected = "handle #1 out of range")]
    fn test_out_of_range_handle_panics() {
        let mut arena = DistributionArena::default();
        arena.next_index();
        let mut other = DistributionArena::default();
        other.next_index();
        let foreign = other.next_index();
        arena.get(foreign);
    }

    #[test]
    #[should_panic(expected = "handle #0 out of range for arena with 0 slots")]
    fn test_put_after_reset_panics() {
        let mut arena = DistributionArena::default();
        let handle = arena.next_index();
        arena.reset();
        arena.put(handle, Gaussian::UNIFORM);
    }
}
