//! # Tessellation Benchmark
//!
//! Measures:
//! 1. PN patch construction + lattice sampling per triangle
//! 2. A full entity draw (interpolate, interpret, shadow) per level
//!
//! Target: a 400-triangle model at level 4 well under 1ms.

#![allow(missing_docs)]

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tessera_rendering::{
    AliasModel, AliasRenderer, CommandStream, CommandVertex, CompressedVertex, ConfigHandle,
    Keyframe, PatchTriangle, RecordingSink, RenderConfig, RenderEntity, SceneLighting,
    TessellationConfig, TessellationScratch, Tessellator, TriangulationPolicy,
};
use tessera_shared::Vec3;

/// A `size` x `size` grid of vertices wrapped onto a bumpy surface,
/// drawn as one strip per row.
fn grid_model(size: u16) -> AliasModel {
    let mut vertices = Vec::with_capacity(usize::from(size) * usize::from(size));
    for y in 0..size {
        for x in 0..size {
            let z = ((x as f32 * 0.7).sin() * (y as f32 * 0.5).cos() * 8.0 + 16.0) as u16;
            let nx = ((x as f32 * 0.7).cos() * 60.0) as i8;
            vertices.push(CompressedVertex::new([x * 4, y * 4, z], [nx, 0, 110]));
        }
    }

    let frames = vec![
        Keyframe::new("a", Vec3::ONE, Vec3::ZERO, vertices.clone()),
        Keyframe::new("b", Vec3::ONE, Vec3::new(0.0, 0.0, 2.0), vertices),
    ];

    let mut builder = CommandStream::builder();
    for y in 0..size - 1 {
        let row: Vec<CommandVertex> = (0..size)
            .flat_map(|x| {
                let top = i32::from(y * size + x);
                let bottom = top + i32::from(size);
                let u = f32::from(x) / f32::from(size);
                [
                    CommandVertex::new(u, f32::from(y) / f32::from(size), top),
                    CommandVertex::new(u, f32::from(y + 1) / f32::from(size), bottom),
                ]
            })
            .collect();
        builder = builder.strip(&row);
    }

    AliasModel::new("grid", frames, builder.finish(), vec![]).expect("valid model")
}

fn bench_patch(c: &mut Criterion) {
    let mut group = c.benchmark_group("tessellate_triangle");
    let triangle = PatchTriangle {
        positions: [
            Vec3::new(0.0, 0.0, 0.0),
            Vec3::new(16.0, 0.0, 2.0),
            Vec3::new(0.0, 16.0, -2.0),
        ],
        normals: [
            Vec3::new(-0.2, -0.2, 1.0).normalize_or_zero(),
            Vec3::new(0.3, 0.0, 1.0).normalize_or_zero(),
            Vec3::new(0.0, 0.3, 1.0).normalize_or_zero(),
        ],
    };

    for level in [1, 2, 4, 8] {
        let tess = Tessellator::new(true, level, TriangulationPolicy::LatticeStrip);
        let mut scratch = TessellationScratch::new();

        group.bench_with_input(BenchmarkId::new("level", level), &level, |b, _| {
            b.iter(|| {
                scratch.clear();
                let count = tess
                    .tessellate(black_box(&triangle), &mut scratch)
                    .expect("fits");
                tess.triangulate(0, count, &mut scratch.indices).expect("fits");
            });
        });
    }

    group.finish();
}

fn bench_entity_draw(c: &mut Criterion) {
    let mut group = c.benchmark_group("entity_draw");
    let model = grid_model(16);
    let entity = RenderEntity {
        old_frame: 1,
        backlerp: 0.4,
        ..RenderEntity::default()
    };

    for (name, enabled, level) in [("flat", false, 1), ("level_2", true, 2), ("level_4", true, 4)] {
        let config = RenderConfig {
            tessellation: TessellationConfig {
                enabled,
                level,
                triangulation: TriangulationPolicy::LegacyFan,
            },
            shadows: true,
            ..RenderConfig::default()
        };
        let mut renderer = AliasRenderer::new(ConfigHandle::new(config).expect("valid config"));
        let mut sink = RecordingSink::new();
        let scene = SceneLighting::default();

        group.bench_function(name, |b| {
            b.iter(|| {
                sink.clear();
                renderer
                    .draw(Some(black_box(&model)), &entity, None, &scene, &mut sink)
                    .expect("draw succeeds")
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_patch, bench_entity_draw);
criterion_main!(benches);
