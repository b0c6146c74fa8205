//! Connected clusters of active cells.
//!
//! A cluster is a maximal 4-connected set of interior `+1` cells. The scan
//! runs row-major over the interior and flood-fills (breadth-first) from
//! every unvisited active cell. A fill that never grows past its seed is an
//! isolated cell and is not counted.
//!
//! Connectivity is always 4-neighbor, whichever rule drove the dynamics.
//!
//! # Queue capacity
//!
//! Cells are marked visited when enqueued, so each interior cell enters the
//! queue at most once per scan. A queue of `L * L` slots therefore never
//! overflows; [`WorkQueue::push`] still reports [`Error::QueueOverflow`]
//! rather than wrapping onto live entries.

use crate::neighborhood::VON_NEUMANN_OFFSETS;
use crate::{Error, Lattice, Result};

/// Fixed-capacity FIFO ring buffer of flat grid indices.
#[derive(Debug)]
pub struct WorkQueue {
    slots: Vec<usize>,
    head: usize,
    len: usize,
}

impl WorkQueue {
    /// Reserve a queue holding up to `capacity` entries.
    pub fn with_capacity(capacity: usize) -> Result<Self> {
        let mut slots = Vec::new();
        slots
            .try_reserve_exact(capacity)
            .map_err(|_| Error::Allocation { what: "flood-fill queue", cells: capacity })?;
        slots.resize(capacity, 0);
        Ok(Self { slots, head: 0, len: 0 })
    }

    /// Maximum number of queued entries.
    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of queued entries.
    pub fn len(&self) -> usize {
        self.len
    }

    /// Whether the queue holds nothing.
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    /// Append to the back.
    pub fn push(&mut self, value: usize) -> Result<()> {
        let capacity = self.capacity();
        if self.len == capacity {
            return Err(Error::QueueOverflow { capacity });
        }
        let tail = (self.head + self.len) % capacity;
        self.slots[tail] = value;
        self.len += 1;
        Ok(())
    }

    /// Take from the front.
    pub fn pop(&mut self) -> Option<usize> {
        if self.len == 0 {
            return None;
        }
        let value = self.slots[self.head];
        self.head = (self.head + 1) % self.capacity();
        self.len -= 1;
        Some(value)
    }
}

/// Count clusters of two or more 4-connected active cells.
pub fn count_clusters(lattice: &Lattice) -> Result<usize> {
    let cells = lattice.cells();
    let total = cells.len();
    let stride = lattice.stride() as isize;
    let offsets = VON_NEUMANN_OFFSETS.map(|(dr, dc)| dr * stride + dc);

    let mut visited = Vec::new();
    visited
        .try_reserve_exact(total)
        .map_err(|_| Error::Allocation { what: "visited flags", cells: total })?;
    visited.resize(total, false);

    let mut queue = WorkQueue::with_capacity(lattice.area())?;
    let mut clusters = 0;

    for row in 1..=lattice.size() {
        for col in 1..=lattice.size() {
            let seed = lattice.index(row, col);
            if !cells[seed].is_active() || visited[seed] {
                continue;
            }

            visited[seed] = true;
            queue.push(seed)?;
            let mut grew = false;

            while let Some(current) = queue.pop() {
                for offset in offsets {
                    // Active cells are interior, so every neighbor index is
                    // inside the bordered grid.
                    let next = (current as isize + offset) as usize;
                    if cells[next].is_active() && !visited[next] {
                        visited[next] = true;
                        grew = true;
                        queue.push(next)?;
                    }
                }
            }

            if grew {
                clusters += 1;
            }
        }
    }

    Ok(clusters)
}
