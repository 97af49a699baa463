//! Terrain LOD demo — runs the per-frame quadtree update over a grid of
//! instances while a camera flies across, logging tree statistics.
//!
//! Usage: cargo run --release --bin terrain_demo -- [OPTIONS]
//!
//! Options:
//!   --grid <N>        Instances per side of the grid (default: 4)
//!   --patch <SIZE>    Patch size per instance in meters (default: 256)
//!   --steps <N>       Max subdivision steps (default: 4)
//!   --frames <N>      Frames to simulate (default: 600)
//!   --seed <SEED>     Generation seed (default: 12345)
//!   --heightmap <P>   Load a grayscale image instead of generating

use std::time::Instant;

use glam::{IVec3, Mat4, Vec3};

use terralod::math::Frustum;
use terralod::terrain::{
    gather_draw_entries, update_batch, FrameContext, Heightmap, HeightmapGenerator,
    TerrainInstance, TerrainParams,
};
use terralod::world::WorldPosition;

fn main() {
    terralod::core::logging::init();

    let args: Vec<String> = std::env::args().collect();
    let grid = parse_u32_arg(&args, "--grid").unwrap_or(4);
    let patch_size = parse_f32_arg(&args, "--patch").unwrap_or(256.0);
    let steps = parse_u32_arg(&args, "--steps").unwrap_or(4);
    let frames = parse_u32_arg(&args, "--frames").unwrap_or(600);
    let seed = parse_u32_arg(&args, "--seed").unwrap_or(12345);
    let heightmap_path = parse_str_arg(&args, "--heightmap");

    let heightmap = match heightmap_path {
        Some(path) => {
            log::info!("loading heightmap from {path}");
            Heightmap::from_image_file(&path).expect("failed to load heightmap")
        }
        None => {
            let params = TerrainParams { seed, ..Default::default() };
            log::info!("generating heightmap (seed {seed})");
            HeightmapGenerator::new(params)
                .generate(256, patch_size)
                .expect("failed to generate heightmap")
        }
    };

    let mut instances: Vec<TerrainInstance> = (0..grid * grid)
        .map(|i| {
            let x = (i % grid) as f32 - (grid as f32 - 1.0) * 0.5;
            let z = (i / grid) as f32 - (grid as f32 - 1.0) * 0.5;
            TerrainInstance::new(
                WorldPosition::from_local(Vec3::new(x * patch_size, 0.0, z * patch_size)),
                patch_size,
                steps,
                &heightmap,
            )
        })
        .collect();

    log::info!(
        "simulating {frames} frames over {} instances ({grid}x{grid}, patch {patch_size}, {steps} steps)",
        instances.len()
    );

    let span = grid as f32 * patch_size;
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 16.0 / 9.0, 0.1, 20_000.0);
    let start = Instant::now();
    let mut draw_entries = Vec::new();

    for frame_index in 0..frames {
        // Fly a slow diagonal pass over the grid.
        let t = frame_index as f32 / frames.max(1) as f32;
        let camera_local = Vec3::new(
            (t - 0.5) * span,
            120.0,
            (t - 0.5) * span * 0.5,
        );
        let view = Mat4::look_at_rh(
            camera_local,
            camera_local + Vec3::new(0.3, -0.4, 1.0),
            Vec3::Y,
        );

        let frame = FrameContext {
            camera_position: WorldPosition::from_local(camera_local),
            camera_cell: IVec3::ZERO,
            frustum: Frustum::from_view_projection(&(proj * view)),
        };

        update_batch(&mut instances, &frame);

        draw_entries.clear();
        for instance in &instances {
            gather_draw_entries(instance, frame.camera_cell, &mut draw_entries);
        }

        if frame_index % 100 == 0 {
            let leaves: usize = instances.iter().map(|i| i.quadtree.leaf_count()).sum();
            let visible_instances = instances.iter().filter(|i| i.visible).count();
            log::info!(
                "frame {frame_index}: {leaves} leaves, {visible_instances} visible instances, {} draw entries",
                draw_entries.len()
            );
        }
    }

    let elapsed = start.elapsed();
    log::info!(
        "{frames} frames in {:.1?} ({:.2} ms/frame)",
        elapsed,
        elapsed.as_secs_f64() * 1000.0 / frames.max(1) as f64
    );
}

fn parse_u32_arg(args: &[String], name: &str) -> Option<u32> {
    arg_value(args, name)?.parse().ok()
}

fn parse_f32_arg(args: &[String], name: &str) -> Option<f32> {
    arg_value(args, name)?.parse().ok()
}

fn parse_str_arg(args: &[String], name: &str) -> Option<String> {
    arg_value(args, name).cloned()
}

fn arg_value<'a>(args: &'a [String], name: &str) -> Option<&'a String> {
    args.iter().position(|a| a == name).and_then(|i| args.get(i + 1))
}
