//! Fixed-capacity scratch buffers for per-call results
//!
//! Kill bursts happen every few frames; these buffers are reused in place so
//! reporting where kills landed never touches the heap. Owners hand out
//! slices borrowed from themselves, so a report cannot outlive the next
//! mutating call.

use glam::Vec2;

use crate::consts::KILL_POSITION_CAPACITY;

/// Up to `KILL_POSITION_CAPACITY` entries from the latest call, first come
/// first kept
#[derive(Debug, Clone, Copy)]
pub struct ScratchBuffer<T> {
    slots: [T; KILL_POSITION_CAPACITY],
    len: usize,
}

/// Where kills landed
pub type KillPositions = ScratchBuffer<Vec2>;

/// Ids of police cars destroyed, parallel to their [`KillPositions`]
pub type CarIds = ScratchBuffer<u32>;

impl<T: Copy + Default> Default for ScratchBuffer<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Copy + Default> ScratchBuffer<T> {
    pub const CAPACITY: usize = KILL_POSITION_CAPACITY;

    pub fn new() -> Self {
        Self {
            slots: [T::default(); KILL_POSITION_CAPACITY],
            len: 0,
        }
    }

    #[inline]
    pub fn clear(&mut self) {
        self.len = 0;
    }

    /// Record an entry. Returns false once the buffer is full; the caller
    /// keeps counting kills, only the detail is lost.
    #[inline]
    pub fn push(&mut self, item: T) -> bool {
        if self.len == KILL_POSITION_CAPACITY {
            return false;
        }
        self.slots[self.len] = item;
        self.len += 1;
        true
    }

    /// Append as many of `other` as still fit
    pub fn extend_from(&mut self, other: &[T]) {
        for &item in other {
            if !self.push(item) {
                break;
            }
        }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn is_full(&self) -> bool {
        self.len == KILL_POSITION_CAPACITY
    }

    #[inline]
    pub fn as_slice(&self) -> &[T] {
        &self.slots[..self.len]
    }
}
