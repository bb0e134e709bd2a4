// Copyright 2025 John Brosnihan
//
// Licensed under the Apache License, Version 2.0 (the "License");
// you may not use this file except in compliance with the License.
// You may obtain a copy of the License at
//
//     http://www.apache.org/licenses/LICENSE-2.0
//
// Unless required by applicable law or agreed to in writing, software
// distributed under the License is distributed on an "AS IS" BASIS,
// WITHOUT WARRANTIES OR CONDITIONS OF ANY KIND, either express or implied.
// See the License for the specific language governing permissions and
// limitations under the License.
//! Benchmarks for stepping and rendering the sandbox
//!
//! These benchmarks measure:
//! - One full frame (step + render) for different body counts
//! - SVG serialization of the rendered surface

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use svg_sandbox::{SandboxConfig, Scene};

// Spread boxes on a grid so they start without overlaps
fn setup_scene(body_count: usize) -> Scene {
    let config = SandboxConfig::default().with_size(1600.0, 1200.0);
    let mut scene = Scene::new(config).unwrap();
    let columns = 30;
    for i in 0..body_count {
        let x = 30.0 + (i % columns) as f64 * 50.0;
        let y = 30.0 + (i / columns) as f64 * 50.0;
        scene.click(x, y);
    }
    scene.tick(0.0);
    scene
}

fn bench_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("frame");

    for body_count in [10, 100, 500] {
        group.throughput(Throughput::Elements(body_count as u64));
        group.bench_with_input(
            BenchmarkId::from_parameter(body_count),
            &body_count,
            |b, &count| {
                let mut scene = setup_scene(count);
                let mut now = 0.0;
                b.iter(|| {
                    now += 18.0;
                    black_box(scene.tick(black_box(now)));
                });
            },
        );
    }

    group.finish();
}

fn bench_markup(c: &mut Criterion) {
    let mut scene = setup_scene(200);
    scene.tick(18.0);

    c.bench_function("markup_200", |b| {
        b.iter(|| black_box(scene.svg_markup()));
    });
}

criterion_group!(benches, bench_frame, bench_markup);
criterion_main!(benches);
