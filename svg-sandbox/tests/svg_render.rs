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
//! Integration tests keeping SVG views in sync with world bodies

use svg_sandbox::plugins::{PluginOptions, PluginRegistry, Renderer};
use svg_sandbox::render::{AttachTarget, SvgRenderer};
use svg_sandbox::{Body, World};

fn world_with_svg() -> World {
    let registry = PluginRegistry::with_builtins().unwrap();
    let options = PluginOptions::new()
        .with_number("width", 800.0)
        .with_number("height", 400.0);
    let mut world = World::new();
    world
        .set_renderer(registry.create_renderer("svg", &options).unwrap())
        .unwrap();
    world
}

fn svg(world: &World) -> &SvgRenderer {
    world.renderer_as::<SvgRenderer>().unwrap()
}

#[test]
fn test_surface_sized_to_container() {
    let world = world_with_svg();
    assert_eq!(
        svg(&world).markup(),
        "<svg xmlns=\"http://www.w3.org/2000/svg\" style=\"width:800;height:400;\"></svg>"
    );
}

#[test]
fn test_view_exists_iff_body_present() {
    let mut world = world_with_svg();
    let a = world.add_body(Body::rectangle(100.0, 100.0, 40.0, 40.0));
    let b = world.add_body(Body::rectangle(200.0, 100.0, 40.0, 40.0));
    let c = world.add_body(Body::rectangle(300.0, 100.0, 40.0, 40.0));
    assert_eq!(svg(&world).surface().child_count(), 3);

    let removed = world.remove_body(b).unwrap();
    let removed_view = removed.view.unwrap();
    assert_eq!(svg(&world).surface().child_count(), 2);
    assert!(!svg(&world).surface().contains_child(removed_view));

    world.render();
    for handle in [a, c] {
        let view = world.body(handle).unwrap().view.unwrap();
        assert!(svg(&world).surface().contains_child(view));
    }
    assert_eq!(svg(&world).markup().matches("<rect").count(), 2);
}

#[test]
fn test_render_writes_positions() {
    let mut world = world_with_svg();
    let handle = world.add_body(Body::rectangle(120.0, 80.0, 40.0, 40.0));
    world.render();
    assert!(svg(&world).markup().contains(
        "<rect width=\"40px\" height=\"40px\" fill=\"#87ceeb\" x=\"120\" y=\"80\"/>"
    ));

    world.body_mut(handle).unwrap().state.pos.x = 130.5;
    world.render();
    assert!(svg(&world).markup().contains("x=\"130.5\" y=\"80\""));
}

#[test]
fn test_hidden_bodies_not_redrawn() {
    let mut world = world_with_svg();
    let handle = world.add_body(Body::rectangle(120.0, 80.0, 40.0, 40.0));
    world.render();

    let body = world.body_mut(handle).unwrap();
    body.hidden = true;
    body.state.pos.x = 500.0;
    world.render();
    assert!(svg(&world).markup().contains("x=\"120\""));
}

#[test]
fn test_attach_detach_round_trip_leaves_surface_unchanged() {
    let mut renderer = SvgRenderer::default();
    let body = Body::rectangle(0.0, 0.0, 40.0, 40.0);
    let first = renderer.create_view(body.geometry(), body.style());
    let second = renderer.create_view(body.geometry(), body.style());
    let before = renderer.surface().children().to_vec();

    renderer.detach(AttachTarget::Element(second));
    renderer.attach(AttachTarget::Element(second));
    assert_eq!(renderer.surface().children(), before.as_slice());

    renderer.attach(AttachTarget::Element(first));
    renderer.attach(AttachTarget::Element(first));
    assert_eq!(renderer.surface().children(), before.as_slice());
}
