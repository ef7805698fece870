//! Commands applied to the simulation between frames.

use std::collections::VecDeque;

use crate::compute::GridState;

/// A single state mutation requested by input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Command {
    /// Overwrite B = 1 on a disc around a grid coordinate.
    Dose { x: i64, y: i64, radius: i32 },
    /// Map a normalized cursor position onto (feed, kill).
    Explore { nx: f32, ny: f32 },
    /// Leave explore mode and restore default (feed, kill).
    EndExplore,
    /// Reseed the grid and restore default parameters.
    Reset,
}

/// Returned when the queue is at capacity.
#[derive(Debug, Clone, Copy, PartialEq, thiserror::Error)]
#[error("command queue full ({capacity} pending), dropped {command:?}")]
pub struct QueueFull {
    pub capacity: usize,
    pub command: Command,
}

/// Bounded FIFO drained once per frame before integration.
#[derive(Debug, Clone)]
pub struct CommandQueue {
    pending: VecDeque<Command>,
    capacity: usize,
}

impl CommandQueue {
    pub fn new(capacity: usize) -> Self {
        Self {
            pending: VecDeque::with_capacity(capacity),
            capacity,
        }
    }

    /// Enqueue a command, rejecting it when the queue is full.
    pub fn push(&mut self, command: Command) -> Result<(), QueueFull> {
        if self.pending.len() >= self.capacity {
            return Err(QueueFull {
                capacity: self.capacity,
                command,
            });
        }
        self.pending.push_back(command);
        Ok(())
    }

    /// Remove all pending commands in submission order.
    pub fn drain(&mut self) -> std::collections::vec_deque::Drain<'_, Command> {
        self.pending.drain(..)
    }

    pub fn len(&self) -> usize {
        self.pending.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

/// Overwrite B = 1 on the current buffer for every cell with
/// `dx² + dy² <= radius²` around `(gx, gy)`.
///
/// A center outside the grid is a no-op. The disc is clipped at the grid
/// edges rather than wrapped.
pub fn dose(grid: &mut GridState, gx: i64, gy: i64, radius: i32) {
    if radius < 0 || !grid.contains(gx, gy) {
        return;
    }
    let r = radius as i64;
    let r2 = r * r;
    let width = grid.width;

    for dy in -r..=r {
        for dx in -r..=r {
            if dx * dx + dy * dy > r2 {
                continue;
            }
            let nx = gx + dx;
            let ny = gy + dy;
            if grid.contains(nx, ny) {
                grid.current.b[ny as usize * width + nx as usize] = 1.0;
            }
        }
    }
}
