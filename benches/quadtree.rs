use criterion::{criterion_group, criterion_main, Criterion, black_box};

use glam::{IVec3, Mat4, Vec3};

use terralod::math::Frustum;
use terralod::terrain::{borders, FrameContext, Heightmap, TerrainInstance};
use terralod::world::WorldPosition;

const PATCH_SIZE: f32 = 256.0;
const MAX_STEPS: u32 = 6;

fn test_instance() -> TerrainInstance {
    let heightmap = Heightmap::from_fn(256, |x, y| {
        ((x as f32 * 0.13).sin() + (y as f32 * 0.07).cos()) * 20.0
    })
    .unwrap();
    TerrainInstance::new(
        WorldPosition::from_local(Vec3::ZERO),
        PATCH_SIZE,
        MAX_STEPS,
        &heightmap,
    )
}

fn frame_at(camera_local: Vec3) -> FrameContext {
    let proj = Mat4::perspective_rh(std::f32::consts::FRAC_PI_3, 16.0 / 9.0, 0.1, 20_000.0);
    let view = Mat4::look_at_rh(
        camera_local + Vec3::new(0.0, 200.0, 0.1),
        Vec3::ZERO,
        Vec3::Y,
    );
    FrameContext {
        camera_position: WorldPosition::from_local(camera_local),
        camera_cell: IVec3::ZERO,
        frustum: Frustum::from_view_projection(&(proj * view)),
    }
}

fn bench_update_near_camera(c: &mut Criterion) {
    let mut instance = test_instance();
    let frame = frame_at(Vec3::new(4.0, 0.0, 4.0));
    // Settle the tree to full depth first; the steady-state frame is what
    // runs every frame in practice.
    for _ in 0..MAX_STEPS {
        instance.update(&frame);
    }

    c.bench_function("update_near_camera", |b| {
        b.iter(|| {
            instance.update(black_box(&frame));
        });
    });
}

fn bench_update_far_camera(c: &mut Criterion) {
    let mut instance = test_instance();
    let frame = frame_at(Vec3::new(10_000.0, 0.0, 0.0));
    instance.update(&frame);

    c.bench_function("update_far_camera", |b| {
        b.iter(|| {
            instance.update(black_box(&frame));
        });
    });
}

fn bench_border_pass(c: &mut Criterion) {
    let mut instance = test_instance();
    let frame = frame_at(Vec3::new(4.0, 0.0, 4.0));
    for _ in 0..MAX_STEPS {
        instance.update(&frame);
    }

    c.bench_function("border_pass_settled_tree", |b| {
        b.iter(|| {
            borders::calculate_borders(black_box(&mut instance.quadtree));
        });
    });
}

criterion_group!(
    benches,
    bench_update_near_camera,
    bench_update_far_camera,
    bench_border_pass
);
criterion_main!(benches);
