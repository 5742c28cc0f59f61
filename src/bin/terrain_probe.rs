//! Headless terrain probe: flies a camera across the grid and reports
//! culling and LOD rebuild statistics.
//!
//! Usage: cargo run --release --bin terrain_probe -- [OPTIONS]
//!
//! Options:
//!   --config <PATH>     Terrain config JSON (default: built-in defaults)
//!   --frames <N>        Frames to simulate (default: 600)
//!   --speed <M>         Camera travel per frame in meters (default: 25)
//!   --altitude <M>      Camera height above the terrain (default: 150)
//!   --budget <N>        Max mesh rebuilds per frame (default: from config)

use std::path::PathBuf;
use std::time::Instant;

use glam::Vec3;

use terrastream::core::{logging, Camera, Result};
use terrastream::scene::NullScene;
use terrastream::terrain::{ChunkGrid, FrameStats, TerrainConfig};

fn main() {
    logging::try_init();

    if let Err(e) = run() {
        log::error!("terrain_probe failed: {}", e);
        std::process::exit(1);
    }
}

fn run() -> Result<()> {
    let args: Vec<String> = std::env::args().collect();
    let config_path = parse_str_arg(&args, "--config").map(PathBuf::from);
    let frames = parse_usize_arg(&args, "--frames").unwrap_or(600);
    let speed = parse_f32_arg(&args, "--speed").unwrap_or(25.0);
    let altitude = parse_f32_arg(&args, "--altitude").unwrap_or(150.0);
    let budget = parse_usize_arg(&args, "--budget");

    let mut config = match &config_path {
        Some(path) => TerrainConfig::load_sync(path)?,
        None => TerrainConfig::default(),
    };
    if budget.is_some() {
        config.max_rebuilds_per_frame = budget;
    }

    println!("=== Terrain Probe ===");
    println!("World:  {}m x {}m", config.world_size, config.world_size);
    println!("Chunks: {}m ({} per side)", config.chunk_size, config.grid_dimension());
    println!("Frames: {} at {}m/frame, {}m altitude", frames, speed, altitude);
    match config.max_rebuilds_per_frame {
        Some(max) => println!("Budget: {} rebuilds/frame", max),
        None => println!("Budget: unlimited"),
    }
    println!();

    let init_start = Instant::now();
    let mut grid = ChunkGrid::from_config(&config, NullScene)?;
    let init_time = init_start.elapsed();

    let half_world = config.world_size * 0.5;
    let mut camera = Camera::look_at(Vec3::new(-half_world, altitude, 0.0), Vec3::new(0.0, 0.0, 0.0), Vec3::Y);

    let mut totals = FrameStats::default();
    let mut worst_frame = 0.0_f64;
    let run_start = Instant::now();

    for frame in 0..frames {
        let x = -half_world + frame as f32 * speed;
        let ground = grid.get_height_at(x, 0.0);
        camera.position = Vec3::new(x, ground + altitude, 0.0);
        camera.point_at(camera.position + Vec3::new(500.0, -altitude, 0.0), Vec3::Y);

        let frame_start = Instant::now();
        let stats = grid.update(&camera);
        let frame_ms = frame_start.elapsed().as_secs_f64() * 1000.0;
        worst_frame = worst_frame.max(frame_ms);

        log::debug!(
            "frame {:>5} x={:>8.1}: {} visible, {} culled, {} rebuilt, {} deferred ({:.2}ms)",
            frame,
            x,
            stats.visible,
            stats.culled,
            stats.rebuilt,
            stats.deferred,
            frame_ms
        );

        totals.visible += stats.visible;
        totals.culled += stats.culled;
        totals.rebuilt += stats.rebuilt;
        totals.deferred += stats.deferred;
    }

    let elapsed = run_start.elapsed().as_secs_f64();
    let frames_f = frames.max(1) as f64;

    log::info!(
        "Probe finished: {} frames in {:.2}s, {} rebuilds, {} deferrals",
        frames,
        elapsed,
        totals.rebuilt,
        totals.deferred
    );

    println!("=== Results ===");
    println!("Init:            {:.1}ms ({} chunks)", init_time.as_secs_f64() * 1000.0, grid.chunk_count());
    println!("Avg visible:     {:.1}", totals.visible as f64 / frames_f);
    println!("Avg culled:      {:.1}", totals.culled as f64 / frames_f);
    println!("Total rebuilds:  {}", totals.rebuilt);
    println!("Total deferred:  {}", totals.deferred);
    println!("Avg frame:       {:.3}ms", elapsed * 1000.0 / frames_f);
    println!("Worst frame:     {:.3}ms", worst_frame);

    grid.dispose();
    Ok(())
}

fn parse_f32_arg(args: &[String], flag: &str) -> Option<f32> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_usize_arg(args: &[String], flag: &str) -> Option<usize> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .and_then(|s| s.parse().ok())
}

fn parse_str_arg(args: &[String], flag: &str) -> Option<String> {
    args.iter().position(|a| a == flag)
        .and_then(|i| args.get(i + 1))
        .cloned()
}
