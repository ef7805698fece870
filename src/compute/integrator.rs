//! Gray-Scott finite-difference integrator.
//!
//! Each step applies, per cell, the 4-neighbour Laplacian with toroidal wrap:
//!
//! ```text
//! reaction = A·B²
//! A' = clamp01(A + dt·(Da·∇²A − reaction + f·(1 − A)))
//! B' = clamp01(B + dt·(Db·∇²B + reaction − (k + f)·B))
//! ```
//!
//! Clamping every step is the only stability safeguard.

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use super::{ConcentrationField, GridState, wrap};
use crate::schema::SimulationParams;

/// Perform one integration step: sweep `current` into `next`, then swap.
pub fn step(grid: &mut GridState, params: &SimulationParams) {
    let width = grid.width;
    let height = grid.height;
    if width == 0 || height == 0 {
        return;
    }

    let current = &grid.current;
    let next = &mut grid.next;

    #[cfg(not(target_arch = "wasm32"))]
    {
        // Native: one task per row. Every row reads the frozen current buffer
        // (including wrapped rows 0 and H-1) and writes only its own slice of next.
        next.a
            .par_chunks_mut(width)
            .zip(next.b.par_chunks_mut(width))
            .enumerate()
            .for_each(|(y, (row_a, row_b))| {
                sweep_row(current, row_a, row_b, y, width, height, params);
            });
    }

    #[cfg(target_arch = "wasm32")]
    {
        // WASM: sequential rows.
        for (y, (row_a, row_b)) in next
            .a
            .chunks_mut(width)
            .zip(next.b.chunks_mut(width))
            .enumerate()
        {
            sweep_row(current, row_a, row_b, y, width, height, params);
        }
    }

    grid.swap();
    grid.step += 1;
    grid.time += params.dt;
}

/// Run `steps` integration steps.
pub fn run(grid: &mut GridState, params: &SimulationParams, steps: usize) {
    for _ in 0..steps {
        step(grid, params);
    }
}

/// Run one rendered frame worth of steps (`params.steps_per_frame`).
pub fn run_frame(grid: &mut GridState, params: &SimulationParams) {
    run(grid, params, params.steps_per_frame);
}

/// Update a single output row from the current field.
#[inline]
fn sweep_row(
    current: &ConcentrationField,
    out_a: &mut [f32],
    out_b: &mut [f32],
    y: usize,
    width: usize,
    height: usize,
    params: &SimulationParams,
) {
    let (north, south) = wrap(y, height);
    let row = y * width;
    let row_n = north * width;
    let row_s = south * width;

    let a_in = &current.a;
    let b_in = &current.b;
    let f = params.feed;
    let k = params.kill;
    let da = params.diffusion_a;
    let db = params.diffusion_b;
    let dt = params.dt;

    for x in 0..width {
        let (west, east) = wrap(x, width);
        let idx = row + x;

        let a = a_in[idx];
        let b = b_in[idx];

        let lap_a =
            a_in[row_n + x] + a_in[row_s + x] + a_in[row + west] + a_in[row + east] - 4.0 * a;
        let lap_b =
            b_in[row_n + x] + b_in[row_s + x] + b_in[row + west] + b_in[row + east] - 4.0 * b;

        let reaction = a * b * b;
        let new_a = a + dt * (da * lap_a - reaction + f * (1.0 - a));
        let new_b = b + dt * (db * lap_b + reaction - (k + f) * b);

        out_a[x] = new_a.clamp(0.0, 1.0);
        out_b[x] = new_b.clamp(0.0, 1.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{Seeder, ShapeMask};
    use crate::schema::SeedingConfig;
    use proptest::prelude::*;

    /// Default parameters with feed and kill switched off.
    fn diffusion_only() -> SimulationParams {
        let defaults = SimulationParams::default();
        SimulationParams::new(
            0.0,
            0.0,
            defaults.diffusion_a,
            defaults.diffusion_b,
            defaults.dt,
            defaults.steps_per_frame,
        )
    }

    fn region_mean(grid: &GridState, include: impl Fn(usize, usize) -> bool) -> f32 {
        let mut sum = 0.0f64;
        let mut count = 0usize;
        for y in 0..grid.height {
            for x in 0..grid.width {
                if include(x, y) {
                    sum += grid.b(x, y) as f64;
                    count += 1;
                }
            }
        }
        (sum / count.max(1) as f64) as f32
    }

    #[test]
    fn test_baseline_is_fixed_point() {
        let mut grid = GridState::new(16, 16);
        run(&mut grid, &SimulationParams::default(), 50);

        assert!(grid.current.a.iter().all(|&v| v == 1.0));
        assert!(grid.current.b.iter().all(|&v| v == 0.0));
        assert_eq!(grid.step, 50);
    }

    #[test]
    fn test_mass_conservation_pure_diffusion_a() {
        // B = 0 removes the reaction term; f = 0 removes the feed.
        let mut grid = GridState::new(32, 24);
        for (i, a) in grid.current.a.iter_mut().enumerate() {
            *a = ((i * 37) % 101) as f32 / 100.0;
        }
        let initial = grid.total_mass_a();

        run(&mut grid, &diffusion_only(), 200);

        let relative_error = (grid.total_mass_a() - initial).abs() / initial;
        assert!(relative_error < 1e-4, "A mass drift {relative_error}");
    }

    #[test]
    fn test_mass_conservation_pure_diffusion_b() {
        // A = 0 removes the reaction term; k + f = 0 removes the decay.
        let mut grid = GridState::new(24, 32);
        grid.current.a.fill(0.0);
        for (i, b) in grid.current.b.iter_mut().enumerate() {
            *b = ((i * 53) % 97) as f32 / 96.0;
        }
        let initial = grid.total_mass_b();

        run(&mut grid, &diffusion_only(), 200);

        // A stays at zero because f = 0.
        assert!(grid.current.a.iter().all(|&v| v == 0.0));
        let relative_error = (grid.total_mass_b() - initial).abs() / initial;
        assert!(relative_error < 1e-4, "B mass drift {relative_error}");
    }

    #[test]
    fn test_toroidal_wrap_reaches_opposite_edges() {
        let mut grid = GridState::new(20, 12);
        grid.current.a.fill(0.0);
        grid.current.b[0] = 1.0;

        step(&mut grid, &diffusion_only());

        // Neighbours across both seams receive mass after a single step.
        assert!(grid.b(19, 0) > 0.0);
        assert!(grid.b(0, 11) > 0.0);
        assert!(grid.b(1, 0) > 0.0);
        assert!((grid.b(19, 0) - grid.b(1, 0)).abs() < 1e-7);
        assert!((grid.b(0, 11) - grid.b(0, 1)).abs() < 1e-7);

        run(&mut grid, &diffusion_only(), 30);
        assert!(grid.b(10, 6) > 0.0, "far cell untouched after 31 steps");
    }

    #[test]
    fn test_step_reads_only_current_buffer() {
        let mut grid = GridState::new(8, 8);
        grid.current.b[27] = 1.0;
        // Garbage in next must not leak into the result.
        grid.next.a.fill(0.5);
        grid.next.b.fill(0.5);

        step(&mut grid, &SimulationParams::default());

        assert!(grid.b(0, 0) == 0.0);
        assert!(grid.b(3, 3) > 0.0);
        assert_eq!(grid.next.b[27], 1.0);
    }

    #[test]
    fn test_single_row_and_column_grids() {
        for (w, h) in [(1, 1), (1, 9), (9, 1)] {
            let mut grid = GridState::new(w, h);
            grid.current.b[0] = 1.0;
            run(&mut grid, &SimulationParams::default(), 5);
            assert!(grid.current.b.iter().all(|v| (0.0..=1.0).contains(v)));
        }
    }

    #[test]
    fn test_end_to_end_pattern_persistence() {
        let mask = ShapeMask::circle(256, 256, 128.0, 128.0, 40.0);
        let mut grid = GridState::new(256, 256);
        let seeding = SeedingConfig {
            background_density: 0.0,
            random_seed: Some(2026),
            ..Default::default()
        };
        Seeder::from_config(&seeding).seed(&mut grid, &mask, &seeding);

        let params = SimulationParams::default();
        for _ in 0..20 {
            run_frame(&mut grid, &params);
        }
        assert_eq!(grid.step, 200);

        let b = &grid.current.b;
        assert!(b.iter().any(|&v| v > 0.0), "B field died out");
        assert!(b.iter().any(|&v| v < 1.0), "B field saturated");

        let inside = region_mean(&grid, |x, y| mask.get(x, y));
        let far = region_mean(&grid, |x, y| x < 32 && y < 32);
        assert!(inside > far, "inside {inside} <= far {far}");
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(32))]

        #[test]
        fn prop_fields_stay_clamped(
            cells in proptest::collection::vec((0.0f32..=1.0, 0.0f32..=1.0), 12 * 10),
            feed in 0.0f32..0.12,
            kill in 0.0f32..0.08,
            steps in 1usize..12,
        ) {
            let mut grid = GridState::new(12, 10);
            for (i, (a, b)) in cells.into_iter().enumerate() {
                grid.current.a[i] = a;
                grid.current.b[i] = b;
            }
            let mut params = SimulationParams::default();
            params.feed = feed;
            params.kill = kill;

            for _ in 0..steps {
                step(&mut grid, &params);
                prop_assert!(grid.current.a.iter().all(|v| (0.0..=1.0).contains(v)));
                prop_assert!(grid.current.b.iter().all(|v| (0.0..=1.0).contains(v)));
            }
        }
    }
}
