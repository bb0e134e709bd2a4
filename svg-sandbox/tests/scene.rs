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
//! Integration tests for the assembled sandbox: falling, stacking, constraints

use approx::assert_relative_eq;
use svg_sandbox::behaviors::VerletConstraints;
use svg_sandbox::plugins::PluginOptions;
use svg_sandbox::render::SvgRenderer;
use svg_sandbox::{BodyHandle, ClickOutcome, SandboxConfig, SandboxError, Scene, Ticker};

fn spawn(scene: &mut Scene, x: f64, y: f64) -> BodyHandle {
    match scene.click(x, y) {
        ClickOutcome::Spawned(handle) => handle,
        other => panic!("expected a spawn, got {:?}", other),
    }
}

fn run(scene: &mut Scene, millis: f64) {
    for now in Ticker::default().take_while(|now| *now <= millis) {
        scene.tick(now);
    }
}

#[test]
fn test_body_falls_and_rests_on_floor() {
    let mut scene = Scene::new(SandboxConfig::default()).unwrap();
    let handle = spawn(&mut scene, 100.0, 100.0);

    run(&mut scene, 3000.0);

    let body = scene.world().body(handle).unwrap();
    assert_relative_eq!(body.state.pos.y, 380.0, epsilon = 0.5);
    assert_relative_eq!(body.state.pos.x, 100.0);
    assert!(body.state.vel.y.abs() < 0.01);
}

#[test]
fn test_stacked_bodies_separate() {
    let mut scene = Scene::new(SandboxConfig::default()).unwrap();
    let lower = spawn(&mut scene, 100.0, 380.0);
    let upper = spawn(&mut scene, 100.0, 350.0);

    run(&mut scene, 1000.0);

    let lower = scene.world().body(lower).unwrap().aabb();
    let upper = scene.world().body(upper).unwrap().aabb();
    assert!(upper.center().y < lower.center().y);
    assert!(lower.overlap_y(&upper) < 1.0);
}

#[test]
fn test_iterations_capped_per_tick() {
    let mut scene = Scene::new(SandboxConfig::default()).unwrap();
    spawn(&mut scene, 100.0, 100.0);
    scene.tick(0.0);

    let report = scene.tick(500.0);
    assert_eq!(report.iterations, 4);
    assert!(report.clamped);
    assert_eq!(scene.tick(506.0).iterations, 1);
}

#[test]
fn test_views_follow_clicks() {
    let mut scene = Scene::new(SandboxConfig::default()).unwrap();
    spawn(&mut scene, 100.0, 100.0);
    spawn(&mut scene, 300.0, 100.0);
    spawn(&mut scene, 500.0, 100.0);
    assert!(matches!(scene.click(300.0, 100.0), ClickOutcome::Removed { .. }));
    scene.tick(0.0);

    let svg = scene.world().renderer_as::<SvgRenderer>().unwrap();
    assert_eq!(svg.surface().child_count(), scene.world().body_count());
    assert_eq!(scene.svg_markup().unwrap().matches("<rect").count(), 2);
}

#[test]
fn test_distance_constraint_holds_bodies_together() {
    let mut scene = Scene::new(SandboxConfig::default()).unwrap();
    let a = spawn(&mut scene, 100.0, 100.0);
    let b = spawn(&mut scene, 200.0, 100.0);

    scene
        .world_mut()
        .behavior_mut::<VerletConstraints>(VerletConstraints::NAME)
        .unwrap()
        .distance_constraint(a, b, 1.0, 100.0);
    run(&mut scene, 500.0);

    let pos_a = scene.world().body(a).unwrap().state.pos;
    let pos_b = scene.world().body(b).unwrap().state.pos;
    assert_relative_eq!((pos_b - pos_a).length(), 100.0, epsilon = 1e-6);

    scene.click(pos_a.x, pos_a.y);
    let verlet = scene
        .world()
        .behavior::<VerletConstraints>(VerletConstraints::NAME)
        .unwrap();
    assert_eq!(verlet.constraint_count(), 0);
}

#[test]
fn test_extra_behaviors_by_name() {
    let mut scene = Scene::new(SandboxConfig::default()).unwrap();
    let err = scene
        .add_behavior("sweep-prune", &PluginOptions::new())
        .unwrap_err();
    assert_eq!(err, SandboxError::DuplicatePlugin("sweep-prune".to_string()));

    let err = scene
        .add_behavior("attractor", &PluginOptions::new())
        .unwrap_err();
    assert_eq!(err, SandboxError::UnknownPlugin("attractor".to_string()));
}

#[test]
fn test_environment_config_errors_surface() {
    let err = SandboxConfig::default()
        .overlay(|key| (key == "SVG_SANDBOX_WIDTH").then(|| "wide".to_string()))
        .unwrap_err();
    assert!(matches!(err, SandboxError::InvalidConfig(_)));
}
