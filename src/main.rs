//! Morphogenesis CLI - Run headless simulations from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use rd_morphogenesis::{
    compute::FieldStats,
    render::BufferSurface,
    schema::SimulationConfig,
    simulation::Simulation,
};

/// Host refresh interval used to advance the glow clock.
const FRAME_MS: f64 = 1000.0 / 60.0;

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <config.json|--default> [frames]", args[0]);
        eprintln!();
        eprintln!("Run a Gray-Scott morphogenesis simulation without a display.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  config.json  Path to simulation configuration file");
        eprintln!("  --default    Use the built-in configuration");
        eprintln!("  frames       Number of rendered frames (default: 100)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let frames: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    let config = if args[1] == "--default" {
        SimulationConfig::default()
    } else {
        let config_path = PathBuf::from(&args[1]);
        let config_str = fs::read_to_string(&config_path).unwrap_or_else(|e| {
            eprintln!("Error reading config file: {}", e);
            std::process::exit(1);
        });
        serde_json::from_str(&config_str).unwrap_or_else(|e| {
            eprintln!("Error parsing config: {}", e);
            std::process::exit(1);
        })
    };

    // One display pixel per cell unless the config asks for a cell size
    let scale = config.cell_size.unwrap_or(1);
    let mut surface = BufferSurface::new(config.width * scale, config.height * scale);

    let mut sim = Simulation::new(config).unwrap_or_else(|e| {
        eprintln!("Invalid config: {}", e);
        std::process::exit(1);
    });
    sim.init(&surface);
    if let Err(e) = sim.start(&surface) {
        eprintln!("Error starting simulation: {}", e);
        std::process::exit(1);
    }

    let params = sim.params().copied().unwrap_or_default();
    let (grid_w, grid_h) = sim.grid().map(|g| (g.width, g.height)).unwrap_or_default();
    let mask_cells = sim.mask().map(|m| m.count()).unwrap_or_default();

    println!("Gray-Scott Morphogenesis");
    println!("========================");
    println!("Grid: {}x{} ({} mask cells)", grid_w, grid_h, mask_cells);
    println!("f={:.3} k={:.3}", params.feed, params.kill);
    println!("Da={} Db={} dt={}", params.diffusion_a, params.diffusion_b, params.dt);
    println!("Frames: {} ({} steps/frame)", frames, params.steps_per_frame);
    println!();

    if let Some(stats) = sim.stats() {
        println!("Initial state:");
        print_stats(&stats);
        println!();
    }

    println!("Running simulation...");
    let start = Instant::now();

    for i in 0..frames {
        sim.tick(i as f64 * FRAME_MS, &mut surface);

        // Print progress every 10%
        if (i + 1) % (frames / 10).max(1) == 0 {
            if let Some(stats) = sim.stats() {
                let elapsed = start.elapsed().as_secs_f32();
                println!(
                    "  Frame {}/{}: mean_b={:.4}, active={}, {:.1} frames/s",
                    i + 1,
                    frames,
                    stats.mean_b,
                    stats.active_cells,
                    (i + 1) as f32 / elapsed
                );
            }
        }
    }

    let elapsed = start.elapsed();

    println!();
    if let Some(stats) = sim.stats() {
        println!("Final state:");
        print_stats(&stats);
        println!();
    }
    println!(
        "Time: {:.2}s ({:.1} frames/s, {} frames presented)",
        elapsed.as_secs_f32(),
        frames as f32 / elapsed.as_secs_f32(),
        surface.frames_presented()
    );

    sim.destroy();
}

fn print_stats(stats: &FieldStats) {
    println!("  Step: {}", stats.step);
    println!("  Mean A: {:.6}", stats.mean_a);
    println!("  Mean B: {:.6}", stats.mean_b);
    println!("  B range: [{:.6}, {:.6}]", stats.min_b, stats.max_b);
    println!("  Active cells: {}", stats.active_cells);
}

fn print_example_config() {
    let config = SimulationConfig::default();
    match serde_json::to_string_pretty(&config) {
        Ok(json) => {
            println!("Example configuration (config.json):");
            println!("{}", json);
        }
        Err(e) => {
            eprintln!("Error serializing config: {}", e);
            std::process::exit(1);
        }
    }
}
