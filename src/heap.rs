//! Array-backed binary min-heap with push/pop instrumentation.
//!
//! Shared by the Dijkstra baseline and the BMSSP base case. Duplicate
//! entries for one vertex are allowed; callers discard stale ones on pop.

use serde::Serialize;

/// Counters accumulated over a heap's lifetime.
#[repr(C)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct HeapStats {
    pub pushes: u64,
    pub pops: u64,
    pub max_size: u64,
}

#[derive(Debug)]
pub struct MinHeap<T> {
    data: Vec<T>,
    stats: HeapStats,
}

impl<T: Ord> MinHeap<T> {
    pub fn with_capacity(cap: usize) -> Self {
        Self { data: Vec::with_capacity(cap), stats: HeapStats::default() }
    }

    #[inline]
    pub fn push(&mut self, item: T) {
        self.data.push(item);
        self.stats.pushes += 1;
        self.stats.max_size = self.stats.max_size.max(self.data.len() as u64);
        self.sift_up(self.data.len() - 1);
    }

    #[inline]
    pub fn pop(&mut self) -> Option<T> {
        let n = self.data.len();
        if n == 0 {
            return None;
        }
        self.data.swap(0, n - 1);
        let out = self.data.pop();
        self.stats.pops += 1;
        if !self.data.is_empty() {
            self.sift_down(0);
        }
        out
    }

    pub fn peek(&self) -> Option<&T> {
        self.data.first()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    pub fn stats(&self) -> HeapStats {
        self.stats
    }

    /// Unordered view of the queued items.
    pub fn as_slice(&self) -> &[T] {
        &self.data
    }

    #[inline]
    fn sift_up(&mut self, mut i: usize) {
        while i > 0 {
            let p = (i - 1) / 2;
            if self.data[i] < self.data[p] {
                self.data.swap(i, p);
                i = p;
            } else {
                break;
            }
        }
    }

    #[inline]
    fn sift_down(&mut self, mut i: usize) {
        let n = self.data.len();
        loop {
            let l = i * 2 + 1;
            if l >= n {
                break;
            }
            let r = l + 1;
            let b = if r < n && self.data[r] < self.data[l] { r } else { l };
            if self.data[b] < self.data[i] {
                self.data.swap(i, b);
                i = b;
            } else {
                break;
            }
        }
    }
}
