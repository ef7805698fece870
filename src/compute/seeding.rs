//! Mask-biased initial conditions.

use rand::prelude::*;

use super::{GridState, ShapeMask};
use crate::schema::SeedingConfig;

/// Random source for seeding.
pub struct Seeder {
    rng: StdRng,
}

impl Seeder {
    /// Create from seed.
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Create with random seed.
    pub fn random() -> Self {
        Self {
            rng: StdRng::from_entropy(),
        }
    }

    pub fn from_config(config: &SeedingConfig) -> Self {
        match config.random_seed {
            Some(seed) => Self::new(seed),
            None => Self::random(),
        }
    }

    /// Seeded pigment value: `1 + (r - 0.5) * perturbation`, clamped to [0, 1].
    #[inline]
    fn pigment(&mut self, perturbation: f32) -> f32 {
        let r: f32 = self.rng.gen_range(0.0..1.0);
        (1.0 + (r - 0.5) * perturbation).clamp(0.0, 1.0)
    }

    /// Apply the seeding policy to both buffers of `grid`.
    ///
    /// A = 1 and B = 0 everywhere, then B ≈ 1 on every mask cell, then
    /// `background_density` of all cells are drawn as cluster centers; each
    /// center outside the mask fills a `(2r+1)²` block (clipped at edges).
    pub fn seed(&mut self, grid: &mut GridState, mask: &ShapeMask, config: &SeedingConfig) {
        debug_assert_eq!(mask.width(), grid.width);
        debug_assert_eq!(mask.height(), grid.height);

        grid.reset();
        let width = grid.width;
        let height = grid.height;
        let size = grid.grid_size();
        let b = &mut grid.current.b;

        for (cell, &inside) in b.iter_mut().zip(mask.cells()) {
            if inside {
                *cell = self.pigment(config.perturbation);
            }
        }

        let seed_count = (size as f32 * config.background_density).floor() as usize;
        let r = config.cluster_radius as i64;
        let mut clusters = 0usize;
        for _ in 0..seed_count {
            let sx = self.rng.gen_range(0..width);
            let sy = self.rng.gen_range(0..height);
            if mask.get(sx, sy) {
                continue;
            }
            clusters += 1;
            for dy in -r..=r {
                for dx in -r..=r {
                    let nx = sx as i64 + dx;
                    let ny = sy as i64 + dy;
                    if nx >= 0 && nx < width as i64 && ny >= 0 && ny < height as i64 {
                        b[ny as usize * width + nx as usize] = self.pigment(config.perturbation);
                    }
                }
            }
        }

        grid.next.b.copy_from_slice(&grid.current.b);
        log::debug!(
            "seeded {} mask cells and {} background clusters",
            mask.count(),
            clusters
        );
    }
}
