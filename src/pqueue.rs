//! Fixed-capacity binary min-heap of pending tree nodes.
//!
//! Entries hold an arena index plus a copy of the node's frequency taken at
//! insertion time, so ordering never depends on reading the arena, which may
//! be reallocated between heap operations.
//!
//! Tie-break rules (these fix the exact codes produced for equal frequencies):
//! - sift-up moves an entry above its parent only while the parent's
//!   frequency is strictly greater;
//! - sift-down picks the left child when the children's frequencies are
//!   equal, and stops as soon as the chosen child's frequency is not smaller
//!   than the displaced entry's;
//! - extraction replaces the root with the last entry and sifts it down.

use tracing::trace;

use crate::error::{HufError, HufResult};
use crate::tree::NodeIndex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HeapEntry {
    pub index: NodeIndex,
    pub freq: u64,
}

#[derive(Debug)]
pub struct PriorityQueue {
    entries: Vec<HeapEntry>,
    capacity: usize,
}

#[inline]
fn parent(i: usize) -> usize {
    (i - 1) / 2
}

impl PriorityQueue {
    /// Create a queue that can hold at most `capacity` live entries.
    pub fn with_capacity(capacity: usize) -> HufResult<Self> {
        let mut entries = Vec::new();
        entries.try_reserve_exact(capacity)?;
        Ok(Self { entries, capacity })
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// The current minimum, without removing it.
    pub fn peek(&self) -> Option<HeapEntry> {
        self.entries.first().copied()
    }

    pub fn insert(&mut self, index: NodeIndex, freq: u64) -> HufResult<()> {
        if self.entries.len() == self.capacity {
            return Err(HufError::QueueSizeExceeded {
                capacity: self.capacity,
            });
        }
        self.entries.push(HeapEntry { index, freq });
        self.sift_up(self.entries.len() - 1);
        Ok(())
    }

    pub fn extract_min(&mut self) -> HufResult<HeapEntry> {
        if self.entries.is_empty() {
            return Err(HufError::QueueNotInitialized);
        }
        let min = self.entries.swap_remove(0);
        if !self.entries.is_empty() {
            self.sift_down(0);
        }
        Ok(min)
    }

    /// Remove the two lowest-frequency entries, smallest first.
    pub fn extract_two_min(&mut self) -> HufResult<(HeapEntry, HeapEntry)> {
        if self.entries.len() < 2 {
            return Err(HufError::QueueNotInitialized);
        }
        let first = self.extract_min()?;
        let second = self.extract_min()?;
        trace!(
            left = first.index,
            left_freq = first.freq,
            right = second.index,
            right_freq = second.freq,
            remaining = self.entries.len(),
            "extracted two minimum entries"
        );
        Ok((first, second))
    }

    fn sift_up(&mut self, mut index: usize) {
        let moving = self.entries[index];
        while index > 0 {
            let p = parent(index);
            if self.entries[p].freq <= moving.freq {
                break;
            }
            self.entries[index] = self.entries[p];
            index = p;
        }
        self.entries[index] = moving;
    }

    fn sift_down(&mut self, mut index: usize) {
        let moving = self.entries[index];
        let len = self.entries.len();
        loop {
            let left = 2 * index + 1;
            if left >= len {
                break;
            }
            let right = left + 1;
            let min = if right < len && self.entries[right].freq < self.entries[left].freq {
                right
            } else {
                left
            };
            if self.entries[min].freq >= moving.freq {
                break;
            }
            self.entries[index] = self.entries[min];
            index = min;
        }
        self.entries[index] = moving;
    }

    #[cfg(test)]
    fn is_heap(&self) -> bool {
        (1..self.entries.len()).all(|i| self.entries[parent(i)].freq <= self.entries[i].freq)
    }
}
