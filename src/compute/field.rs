//! Concentration fields and the double-buffered grid state.

use serde::{Deserialize, Serialize};

/// Two parallel scalar grids: substrate `a` and pigment `b`.
#[derive(Debug, Clone, PartialEq)]
pub struct ConcentrationField {
    pub a: Vec<f32>,
    pub b: Vec<f32>,
}

impl ConcentrationField {
    /// Baseline field: A = 1, B = 0 everywhere.
    pub fn baseline(size: usize) -> Self {
        Self {
            a: vec![1.0; size],
            b: vec![0.0; size],
        }
    }

    /// Reset to the baseline without reallocating.
    pub fn fill_baseline(&mut self) {
        self.a.fill(1.0);
        self.b.fill(0.0);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.a.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.a.is_empty()
    }
}

/// Simulation grid over a fixed W×H torus.
///
/// Integration reads only from `current` and writes only to `next`; the two
/// are exchanged by [`GridState::swap`] after a full sweep.
/// Indexing: `y * width + x`.
pub struct GridState {
    /// Grid width.
    pub width: usize,
    /// Grid height.
    pub height: usize,
    /// Buffer read by the next sweep, dosing and rendering.
    pub current: ConcentrationField,
    /// Buffer written by the sweep in progress.
    pub next: ConcentrationField,
    /// Integration steps since the last reseed.
    pub step: u64,
    /// Simulated time since the last reseed.
    pub time: f32,
}

impl GridState {
    /// Allocate a baseline grid.
    pub fn new(width: usize, height: usize) -> Self {
        let size = width * height;
        Self {
            width,
            height,
            current: ConcentrationField::baseline(size),
            next: ConcentrationField::baseline(size),
            step: 0,
            time: 0.0,
        }
    }

    #[inline]
    pub fn grid_size(&self) -> usize {
        self.width * self.height
    }

    /// Convert (x, y) to flat index.
    #[inline]
    pub fn idx(&self, x: usize, y: usize) -> usize {
        y * self.width + x
    }

    /// Whether signed grid coordinates fall inside the grid.
    #[inline]
    pub fn contains(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Toroidal (west, east) column neighbours of `x`.
    #[inline]
    pub fn wrap_x(&self, x: usize) -> (usize, usize) {
        wrap(x, self.width)
    }

    /// Toroidal (north, south) row neighbours of `y`.
    #[inline]
    pub fn wrap_y(&self, y: usize) -> (usize, usize) {
        wrap(y, self.height)
    }

    /// Exchange current and next buffers by reference.
    #[inline]
    pub fn swap(&mut self) {
        std::mem::swap(&mut self.current, &mut self.next);
    }

    /// Reset both buffers to the baseline and clear counters.
    pub fn reset(&mut self) {
        self.current.fill_baseline();
        self.next.fill_baseline();
        self.step = 0;
        self.time = 0.0;
    }

    #[inline]
    pub fn a(&self, x: usize, y: usize) -> f32 {
        self.current.a[self.idx(x, y)]
    }

    #[inline]
    pub fn b(&self, x: usize, y: usize) -> f32 {
        self.current.b[self.idx(x, y)]
    }

    /// Sum of A over the grid.
    pub fn total_mass_a(&self) -> f64 {
        self.current.a.iter().map(|&v| v as f64).sum()
    }

    /// Sum of B over the grid.
    pub fn total_mass_b(&self) -> f64 {
        self.current.b.iter().map(|&v| v as f64).sum()
    }
}

/// Previous and next index along an axis with wrap-around.
#[inline]
pub fn wrap(i: usize, len: usize) -> (usize, usize) {
    let prev = if i == 0 { len - 1 } else { i - 1 };
    let next = if i + 1 == len { 0 } else { i + 1 };
    (prev, next)
}

/// Field statistics for monitoring.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FieldStats {
    pub mean_a: f32,
    pub mean_b: f32,
    pub min_b: f32,
    pub max_b: f32,
    /// Cells with B above the ink band (0.1).
    pub active_cells: usize,
    pub step: u64,
}

impl FieldStats {
    /// Compute statistics from the current buffer.
    pub fn from_grid(grid: &GridState) -> Self {
        let mut sum_b = 0.0f64;
        let mut min_b = f32::INFINITY;
        let mut max_b = f32::NEG_INFINITY;
        let mut active_cells = 0usize;

        for &v in &grid.current.b {
            sum_b += v as f64;
            min_b = min_b.min(v);
            max_b = max_b.max(v);
            if v > 0.1 {
                active_cells += 1;
            }
        }

        let count = grid.grid_size().max(1) as f64;
        Self {
            mean_a: (grid.total_mass_a() / count) as f32,
            mean_b: (sum_b / count) as f32,
            min_b,
            max_b,
            active_cells,
            step: grid.step,
        }
    }
}
