//! Ring of per-frame GPU resources.

use tracing::trace;

/// Counters over the lifetime of an [`InFlightFrames`] ring.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FrameStats {
    pub submitted: u64,
    pub retired: u64,
    /// Highest number of simultaneously outstanding submissions.
    pub peak_in_flight: usize,
}

impl FrameStats {
    pub const fn outstanding(&self) -> u64 {
        self.submitted - self.retired
    }
}

#[derive(Debug)]
struct Slot<T> {
    resources: T,
    /// Frame number of the submission still using `resources`.
    pending: Option<u64>,
}

/// Fixed ring of frame slots.
///
/// A slot is reused only after its previous submission has been waited on,
/// so outstanding submissions never exceed the slot count.
#[derive(Debug)]
pub struct InFlightFrames<T> {
    slots: Vec<Slot<T>>,
    next: usize,
    stats: FrameStats,
}

impl<T> InFlightFrames<T> {
    /// One slot per resource set.
    ///
    /// # Panics
    /// If `resources` is empty.
    pub fn new(resources: impl IntoIterator<Item = T>) -> Self {
        let slots: Vec<_> = resources
            .into_iter()
            .map(|resources| Slot {
                resources,
                pending: None,
            })
            .collect();
        assert!(!slots.is_empty(), "an in-flight ring needs at least one slot");
        Self {
            slots,
            next: 0,
            stats: FrameStats::default(),
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Pick the next slot, calling `wait` first if it is still in flight.
    ///
    /// On error the slot stays pending and the ring does not advance.
    pub fn acquire<E>(
        &mut self,
        wait: impl FnOnce(&mut T, u64) -> Result<(), E>,
    ) -> Result<usize, E> {
        let index = self.next;
        let slot = &mut self.slots[index];
        if let Some(frame) = slot.pending {
            trace!(slot = index, frame, "waiting for frame slot");
            wait(&mut slot.resources, frame)?;
            slot.pending = None;
            self.stats.retired += 1;
        }
        Ok(index)
    }

    pub fn resources(&self, slot: usize) -> &T {
        &self.slots[slot].resources
    }

    pub fn resources_mut(&mut self, slot: usize) -> &mut T {
        &mut self.slots[slot].resources
    }

    /// Record that `frame` was submitted on `slot` and move to the next slot.
    pub fn mark_submitted(&mut self, slot: usize, frame: u64) {
        debug_assert!(self.slots[slot].pending.is_none());
        self.slots[slot].pending = Some(frame);
        self.stats.submitted += 1;
        self.stats.peak_in_flight = self.stats.peak_in_flight.max(self.outstanding());
        self.next = (slot + 1) % self.slots.len();
    }

    /// Number of slots whose submission has not been waited on.
    pub fn outstanding(&self) -> usize {
        self.slots.iter().filter(|slot| slot.pending.is_some()).count()
    }

    /// Wait on every pending slot, oldest first.
    pub fn retire_all<E>(
        &mut self,
        mut wait: impl FnMut(&mut T, u64) -> Result<(), E>,
    ) -> Result<(), E> {
        let len = self.slots.len();
        for offset in 0..len {
            let slot = &mut self.slots[(self.next + offset) % len];
            if let Some(frame) = slot.pending {
                wait(&mut slot.resources, frame)?;
                slot.pending = None;
                self.stats.retired += 1;
            }
        }
        Ok(())
    }

    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.slots.iter().map(|slot| &slot.resources)
    }

    /// Give the resources back for destruction. Pending state is discarded,
    /// so retire first.
    pub fn into_resources(self) -> impl Iterator<Item = T> {
        self.slots.into_iter().map(|slot| slot.resources)
    }

    pub const fn stats(&self) -> FrameStats {
        self.stats
    }
}
