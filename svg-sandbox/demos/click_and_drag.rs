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
//! Headless click-and-drag session
//!
//! Spawns a few boxes, throws one of them across the container and prints
//! the SVG document once everything has settled.
//!
//! Run with: cargo run --example click_and_drag

use svg_sandbox::{PointerEvent, SandboxConfig, SandboxError, Scene, Ticker};

fn main() -> Result<(), SandboxError> {
    let config = SandboxConfig::from_env()?;
    let mut scene = Scene::new(config)?;

    for x in [100.0, 220.0, 340.0] {
        scene.click(x, 80.0);
    }

    let mut ticker = Ticker::default();
    let mut frames = 0;
    for now in ticker.by_ref().take(60) {
        scene.tick(now);
        frames += 1;
    }

    // Grab the first box and fling it to the right
    let mut grab = (100.0, 80.0);
    if let Some(handle) = scene.world().bodies().handles().first() {
        if let Some(body) = scene.world().body(*handle) {
            grab = (body.state.pos.x, body.state.pos.y);
        }
    }
    scene.pointer(&PointerEvent::down(grab.0, grab.1));
    for (step, now) in ticker.by_ref().take(10).enumerate() {
        let dx = (step as f64 + 1.0) * 12.0;
        scene.pointer(&PointerEvent::moved(grab.0 + dx, grab.1 - dx * 0.5));
        scene.tick(now);
        frames += 1;
    }
    scene.pointer(&PointerEvent::up(grab.0 + 120.0, grab.1 - 60.0));

    for now in ticker.take(300) {
        scene.tick(now);
        frames += 1;
    }

    println!("{} bodies after {} frames", scene.world().body_count(), frames);
    if let Some(markup) = scene.svg_markup() {
        println!("{}", markup);
    }
    Ok(())
}
